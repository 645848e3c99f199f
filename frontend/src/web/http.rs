//! fetch 传输层
//!
//! 直接使用 `web_sys::fetch` 实现核心库的 `HttpClient`。

use mebeli::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_err(context: &str, e: JsValue) -> ApiError {
    ApiError::Transport(format!("{}: {:?}", context, e))
}

/// 浏览器 fetch 客户端，无状态
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build(req: &HttpRequest) -> ApiResult<Request> {
        let headers = Headers::new().map_err(|e| js_err("create headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_err("set header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts).map_err(|e| js_err("build request", e))
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let request = Self::build(&req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_err("fetch", e))?;
        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_err("not a Response", e))?;

        let status = response.status();
        let text_promise = response.text().map_err(|e| js_err("read body", e))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| js_err("read body", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
