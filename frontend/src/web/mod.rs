//! 原生 Web API 封装
//!
//! 直接基于 `web_sys` / inline JS，不引入 gloo-* 系列 crate。

mod geolocation;
mod http;
pub mod leaflet;
pub mod route;
pub mod router;
mod storage;
mod timer;

pub use geolocation::current_position;
pub use http::FetchClient;
pub use storage::BrowserStorage;
pub use timer::{Interval, Timeout};
