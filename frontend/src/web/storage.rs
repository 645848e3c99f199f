//! LocalStorage 封装
//!
//! 作为会话存储的持久化后端；取不到 `window.localStorage`（隐私模式等）
//! 时所有操作静默失败，会话退化为仅内存。

use mebeli::SessionPersistence;

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionPersistence for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
