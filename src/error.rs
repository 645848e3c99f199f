//! 错误分类
//!
//! - `ApiError`: 传输失败、非 2xx 状态、响应解析失败、缺少令牌、本地校验拒绝
//! - `GeoError`: 设备定位失败或手动输入的坐标不合法
//! - `RouteError`: 外部路线服务失败

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 网络 / 传输层失败
    #[error("network error: {0}")]
    Transport(String),
    /// 非成功状态码，message 为后端原文
    #[error("request failed ({status}): {message}")]
    Status { status: u16, message: String },
    /// 响应体解析失败
    #[error("could not read server response: {0}")]
    Decode(String),
    /// 需要登录的请求在没有令牌时发起
    #[error("please log in to continue")]
    Unauthenticated,
    /// 本地校验拒绝，请求未发送
    #[error("{0}")]
    Invalid(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::Invalid(msg.into())
    }

    /// 展示给用户的文本；后端返回的 message 原样透出
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::Unauthenticated | ApiError::Invalid(_) => self.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("location is unavailable: {0}")]
    Unavailable(String),
    #[error("enter a valid latitude and longitude")]
    InvalidCoordinates,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("routing service failed: {0}")]
    Service(String),
    #[error("routing service returned no route")]
    NoRoute,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = ApiError::Status {
            status: 400,
            message: "Email already registered".into(),
        };
        assert_eq!(err.user_message(), "Email already registered");
    }
}
