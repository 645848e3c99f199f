//! 定时器封装
//!
//! `Timeout` 封装 `setTimeout`，`Interval` 封装 `setInterval`。
//! 两者 drop 时自动清除。`Timeout` 的回调是 once 闭包，触发后由 JS 侧释放，
//! 因此回调里替换掉自身的句柄也是安全的。

use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;

pub struct Timeout {
    handle: Option<i32>,
}

impl Timeout {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        let closure = Closure::once_into_js(callback);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        let handle = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.unchecked_ref(),
                    millis,
                )
                .map_err(|e| warn!(error = ?e, "setTimeout failed"))
                .ok()
        });

        Self { handle }
    }

    pub fn cancel(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 周期性定时器；drop 时清除
pub struct Interval {
    handle: Option<i32>,
    _closure: Closure<dyn Fn()>,
}

impl Interval {
    pub fn new<F>(period: Duration, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        let millis = i32::try_from(period.as_millis()).unwrap_or(i32::MAX);

        let handle = web_sys::window().and_then(|window| {
            window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    millis,
                )
                .map_err(|e| warn!(error = ?e, "setInterval failed"))
                .ok()
        });

        Self {
            handle,
            _closure: closure,
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
            window.clear_interval_with_handle(handle);
        }
    }
}
