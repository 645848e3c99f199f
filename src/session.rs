//! 会话存储
//!
//! 进程级（单线程）共享的认证状态：令牌 + 缓存的用户资料。
//! 启动时从持久化存储懒加载一次，之后每次变更都通知所有订阅者；
//! 视图通过订阅感知登录 / 登出，而不是轮询存储事件。

use mebeli_shared::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY, User};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// 当前会话快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

/// 持久化后端（浏览器中为 localStorage）
pub trait SessionPersistence {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

/// 内存实现，测试与非浏览器环境使用
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl SessionPersistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key);
        true
    }
}

type Listener = Rc<dyn Fn(&Session)>;

struct Inner {
    session: Session,
    persistence: Box<dyn SessionPersistence>,
    listeners: BTreeMap<u64, Listener>,
    next_listener: u64,
}

/// 会话存储句柄，clone 成本低，所有 clone 共享同一状态
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<RefCell<Inner>>,
}

impl SessionStore {
    /// 从持久化存储初始化；损坏的用户缓存会被丢弃
    pub fn load(persistence: impl SessionPersistence + 'static) -> Self {
        let token = persistence.get(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = persistence
            .get(STORAGE_USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable cached user profile");
                    persistence.remove(STORAGE_USER_KEY);
                    None
                }
            });

        debug!(authenticated = token.is_some(), "session loaded");

        Self {
            inner: Rc::new(RefCell::new(Inner {
                session: Session { token, user },
                persistence: Box::new(persistence),
                listeners: BTreeMap::new(),
                next_listener: 0,
            })),
        }
    }

    /// 无持久化的空会话
    pub fn in_memory() -> Self {
        Self::load(MemoryPersistence::new())
    }

    pub fn get(&self) -> Session {
        self.inner.borrow().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().session.token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().session.is_authenticated()
    }

    pub fn set_token(&self, token: &str) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.persistence.set(STORAGE_TOKEN_KEY, token);
            inner.session.token = Some(token.to_string());
        }
        self.notify();
    }

    pub fn set_user(&self, user: User) {
        {
            let mut inner = self.inner.borrow_mut();
            match serde_json::to_string(&user) {
                Ok(raw) => {
                    inner.persistence.set(STORAGE_USER_KEY, &raw);
                }
                Err(e) => warn!(error = %e, "could not cache user profile"),
            }
            inner.session.user = Some(user);
        }
        self.notify();
    }

    /// 登出：清除令牌与用户缓存
    pub fn clear(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.persistence.remove(STORAGE_TOKEN_KEY);
            inner.persistence.remove(STORAGE_USER_KEY);
            inner.session = Session::default();
        }
        debug!("session cleared");
        self.notify();
    }

    /// 订阅会话变更；返回的 `Subscription` 被 drop 时自动退订
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.insert(id, Rc::new(listener));
        Subscription {
            id,
            store: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn notify(&self) {
        // 回调期间不持有借用，监听者可以再次读取 store
        let (session, listeners): (Session, Vec<Listener>) = {
            let inner = self.inner.borrow();
            (
                inner.session.clone(),
                inner.listeners.values().cloned().collect(),
            )
        };
        for listener in listeners {
            listener(&session);
        }
    }
}

/// 订阅句柄
pub struct Subscription {
    id: u64,
    store: Weak<RefCell<Inner>>,
}

impl Subscription {
    /// 让订阅与 store 同生命周期（应用根上下文使用）
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner.borrow_mut().listeners.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn user() -> User {
        User {
            id: 1,
            name: "Amina".into(),
            email: "amina@example.com".into(),
            phone_number: Some("0700000000".into()),
        }
    }

    #[test]
    fn loads_token_and_profile_from_persistence() {
        let raw = serde_json::to_string(&user()).unwrap();
        let store = SessionStore::load(
            MemoryPersistence::new()
                .with_item(STORAGE_TOKEN_KEY, "abc")
                .with_item(STORAGE_USER_KEY, &raw),
        );

        let session = store.get();
        assert!(session.is_authenticated());
        assert_eq!(session.display_name(), Some("Amina"));
    }

    #[test]
    fn corrupt_profile_is_dropped() {
        let persistence = MemoryPersistence::new()
            .with_item(STORAGE_TOKEN_KEY, "abc")
            .with_item(STORAGE_USER_KEY, "{not json");
        let store = SessionStore::load(persistence.clone());

        assert!(store.get().user.is_none());
        assert!(store.is_authenticated());
        assert_eq!(persistence.get(STORAGE_USER_KEY), None);
    }

    #[test]
    fn mutations_persist_and_notify_every_listener() {
        let persistence = MemoryPersistence::new();
        let store = SessionStore::load(persistence.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = {
            let seen = seen.clone();
            store.subscribe(move |s| seen.borrow_mut().push(("a", s.is_authenticated())))
        };
        let _b = {
            let seen = seen.clone();
            store.subscribe(move |s| seen.borrow_mut().push(("b", s.is_authenticated())))
        };

        store.set_token("t1");
        assert_eq!(persistence.get(STORAGE_TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(*seen.borrow(), vec![("a", true), ("b", true)]);

        drop(a);
        store.clear();
        assert_eq!(persistence.get(STORAGE_TOKEN_KEY), None);
        assert_eq!(seen.borrow().last(), Some(&("b", false)));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn listener_may_read_the_store() {
        let store = SessionStore::in_memory();
        let observed = Rc::new(Cell::new(false));
        let _sub = {
            let store = store.clone();
            let observed = observed.clone();
            store.clone().subscribe(move |_| observed.set(store.token().is_some()))
        };

        store.set_token("t");
        assert!(observed.get());
    }

    #[test]
    fn set_user_caches_profile_json() {
        let persistence = MemoryPersistence::new();
        let store = SessionStore::load(persistence.clone());
        store.set_user(user());

        let cached: User = serde_json::from_str(&persistence.get(STORAGE_USER_KEY).unwrap()).unwrap();
        assert_eq!(cached, user());
    }
}
