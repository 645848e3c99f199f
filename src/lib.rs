//! 家具商城客户端核心
//!
//! 与平台无关：HTTP 由 `HttpClient` 注入，持久化由 `SessionPersistence` 注入，
//! 地图与定时器通过状态机返回的指令驱动。浏览器端见 `mebeli-frontend`。

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod overlay;
pub mod request;
pub mod route;
pub mod session;
pub mod tracking;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use mebeli_shared as shared;

pub use api::ShopApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, GeoError, RouteError};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use session::{Session, SessionPersistence, SessionStore, Subscription};
