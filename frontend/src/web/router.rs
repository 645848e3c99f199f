//! 路由服务 - History API 封装
//!
//! 所有对 `window.history` 的操作都集中在这里。
//! 导航流程：解析路径 -> 守卫 -> 写入 History -> 更新信号。

use leptos::prelude::*;
use tracing::{debug, info};
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

fn replace_history_state(path: &str) {
    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
    }
}

/// 守卫后的实际目标
fn guard(target: AppRoute, is_auth: bool) -> AppRoute {
    if target.requires_auth() && !is_auth {
        info!(%target, "access denied, redirecting");
        AppRoute::auth_failure_redirect()
    } else {
        target
    }
}

/// 路由服务，认证状态由外部注入
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = guard(requested, is_authenticated.get_untracked());
        if initial != requested {
            replace_history_state(initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn navigate(&self, target: AppRoute) {
        let route = guard(target, self.is_authenticated.get_untracked());
        if route == self.current_route.get_untracked() {
            return;
        }
        debug!(%route, "navigate");
        push_history_state(route.to_path());
        self.set_route.set(route);
    }

    /// 浏览器后退 / 前进，同样经过守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = AppRoute::from_path(&current_path());
            let route = guard(requested, is_authenticated.get_untracked());
            if route != requested {
                replace_history_state(route.to_path());
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同寿命
        closure.forget();
    }

    /// 登出后离开受保护页面
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();
            if !is_auth && route.requires_auth() {
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(redirect.to_path());
                set_route.set(redirect);
                info!(from = %route, "logged out, leaving protected page");
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

#[component]
pub fn Router(is_authenticated: Signal<bool>, children: Children) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

#[component]
pub fn RouterOutlet(matcher: fn(AppRoute) -> AnyView) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
