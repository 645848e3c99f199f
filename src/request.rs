use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub use mebeli_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON；空响应体（204 等）依次按 `null`、`{}` 尝试
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = self.body.trim();
        if body.is_empty() {
            return serde_json::from_str("null")
                .or_else(|_| serde_json::from_str("{}"))
                .map_err(ApiError::from);
        }
        serde_json::from_str(body).map_err(ApiError::from)
    }

    /// 提取后端错误体中的 `message` 字段
    pub fn server_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }

    /// 非 2xx 时转换为 `ApiError::Status`
    pub fn into_status_error(self) -> ApiError {
        let message = self
            .server_message()
            .unwrap_or_else(|| fallback_status_message(self.status));
        ApiError::Status {
            status: self.status,
            message,
        }
    }
}

/// 后端没有给出 message 时使用的提示
pub fn fallback_status_message(status: u16) -> String {
    format!("Request failed with status {}", status)
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 JsValue 等类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for std::rc::Rc<C> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_decodes_as_null() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let value: Option<u32> = resp.json().unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn status_error_prefers_server_message() {
        let resp = HttpResponse {
            status: 409,
            body: r#"{"message":"Item out of stock"}"#.into(),
        };
        assert_eq!(
            resp.into_status_error(),
            ApiError::Status {
                status: 409,
                message: "Item out of stock".into()
            }
        );
    }

    #[test]
    fn status_error_falls_back_for_plain_bodies() {
        let resp = HttpResponse {
            status: 502,
            body: "Bad Gateway".into(),
        };
        assert_eq!(
            resp.into_status_error().user_message(),
            "Request failed with status 502"
        );
    }
}
