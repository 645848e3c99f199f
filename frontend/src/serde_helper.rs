//! `JsValue` 到 Rust 值的转换与 JS 错误包装，用于地图 / 定位等 JS 互操作

use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("serde-wasm-bindgen: {0}")]
    SerdeWasmBindgen(#[from] serde_wasm_bindgen::Error),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for Error {
    fn from(v: JsValue) -> Self {
        let msg = js_sys::Error::from(v.clone())
            .message()
            .as_string()
            .filter(|m| !m.is_empty())
            .or_else(|| v.as_string())
            .unwrap_or_else(|| format!("{:?}", v));
        Error::Js(msg)
    }
}

pub fn from_value<T: DeserializeOwned>(value: JsValue) -> Result<T, Error> {
    serde_wasm_bindgen::from_value(value).map_err(Error::from)
}
