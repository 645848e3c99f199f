//! 认证上下文
//!
//! 把核心库的 `SessionStore` 桥接成 Leptos 信号：整个应用只订阅一次，
//! 之后导航栏、购物车入口、路由守卫都只读信号。

use leptos::prelude::*;
use mebeli::{Session, SessionStore};

/// 当前打开的认证相关对话框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDialog {
    Login,
    Register,
    Account,
}

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: ReadSignal<Session>,
    store: StoredValue<SessionStore, LocalStorage>,
    /// 由导航栏与“加入购物车”等入口打开
    pub dialog: RwSignal<Option<AuthDialog>>,
}

impl AuthContext {
    pub fn new(store: SessionStore) -> Self {
        let (session, set_session) = signal(store.get());
        store
            .subscribe(move |s: &Session| set_session.set(s.clone()))
            .detach();

        Self {
            session,
            store: StoredValue::new_local(store),
            dialog: RwSignal::new(None),
        }
    }

    /// 供路由服务注入
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let session = self.session;
        Signal::derive(move || session.with(Session::is_authenticated))
    }

    pub fn display_name(&self) -> Signal<Option<String>> {
        let session = self.session;
        Signal::derive(move || session.with(|s| s.display_name().map(str::to_string)))
    }

    pub fn open(&self, dialog: AuthDialog) {
        self.dialog.set(Some(dialog));
    }

    pub fn close(&self) {
        self.dialog.set(None);
    }

    pub fn is_open(&self, dialog: AuthDialog) -> Signal<bool> {
        let current = self.dialog;
        Signal::derive(move || current.get() == Some(dialog))
    }

    /// 登出；路由服务监听认证信号，会自动离开受保护页面
    pub fn logout(&self) {
        self.store.with_value(mebeli::auth::logout);
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
