//! 测试用的 HTTP mock

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};

/// 按 (method, url) 返回预设响应，并记录所有收到的请求
///
/// 同一个 key 可以排队多个响应：依次弹出，最后一个保持不变。
/// 未配置的 key 返回 404。
#[derive(Default)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<(HttpMethod, String), VecDeque<HttpResponse>>>,
    transport_failures: RefCell<HashSet<(HttpMethod, String)>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_raw_response(method, url, status, &body.to_string());
    }

    pub fn mock_raw_response(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.to_string(),
            });
    }

    pub fn mock_transport_error(&self, method: HttpMethod, url: &str) {
        self.transport_failures
            .borrow_mut()
            .insert((method, url.to_string()));
    }

    /// 统计 url 以 `path_suffix` 结尾的请求数
    pub fn count(&self, method: HttpMethod, path_suffix: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(path_suffix))
            .count()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let key = (req.method, req.url.clone());
        self.requests.borrow_mut().push(req);

        if self.transport_failures.borrow().contains(&key) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        let mut responses = self.responses.borrow_mut();
        let Some(queue) = responses.get_mut(&key) else {
            return Ok(HttpResponse {
                status: 404,
                body: format!(r#"{{"message":"no mock for {} {}"}}"#, key.0.as_str(), key.1),
            });
        };

        let resp = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(resp.unwrap_or(HttpResponse {
            status: 500,
            body: String::new(),
        }))
    }
}
