//! 登录 / 注册 / 账户资料
//!
//! 对话框只负责收集表单，流程都在这里：调用 API、写入会话存储。

use crate::api::ShopApi;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, fallback_status_message};
use crate::session::SessionStore;
use mebeli_shared::{LoginRequest, RegisterRequest, UpdateUserRequest, User};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// 留空表示不修改密码
    pub password: String,
    pub confirm_password: String,
}

impl AccountForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone_number.clone().unwrap_or_default(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub message: Option<String>,
    /// 资料拉取失败时为 `None`，登录本身仍然成功
    pub user: Option<User>,
}

/// 登录：保存令牌，随后拉取并缓存用户资料
pub async fn login<C: HttpClient>(api: &ShopApi<C>, form: &LoginForm) -> ApiResult<LoginOutcome> {
    let resp = api
        .login(&LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        })
        .await
        .map_err(|e| match e {
            ApiError::Status { status, message } if message == fallback_status_message(status) => {
                ApiError::Status {
                    status,
                    message: "Invalid credentials".to_string(),
                }
            }
            other => other,
        })?;

    let session = api.session();
    session.set_token(&resp.token);

    let user = match api.current_user().await {
        Ok(user) => {
            session.set_user(user.clone());
            Some(user)
        }
        Err(e) => {
            warn!(error = %e, "logged in but could not fetch profile");
            None
        }
    };

    info!(email = %form.email.trim(), "logged in");
    Ok(LoginOutcome {
        message: resp.message,
        user,
    })
}

/// 注册；两次密码不一致时不发请求
pub async fn register<C: HttpClient>(api: &ShopApi<C>, form: &RegisterForm) -> ApiResult<String> {
    if form.password != form.confirm_password {
        return Err(ApiError::invalid("Passwords do not match"));
    }
    let resp = api
        .register(&RegisterRequest {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            phone_number: form.phone.trim().to_string(),
        })
        .await?;
    info!(email = %form.email.trim(), "registered");
    Ok(resp
        .message
        .unwrap_or_else(|| "Registration successful".to_string()))
}

pub async fn load_account<C: HttpClient>(api: &ShopApi<C>) -> ApiResult<AccountForm> {
    let user = api.current_user().await?;
    api.session().set_user(user.clone());
    Ok(AccountForm::from_user(&user))
}

/// 更新资料；新密码非空时必须与确认一致，留空则不提交密码字段
pub async fn update_account<C: HttpClient>(
    api: &ShopApi<C>,
    form: &AccountForm,
) -> ApiResult<User> {
    let password = form.password.trim();
    if !password.is_empty() && form.password != form.confirm_password {
        return Err(ApiError::invalid(
            "New password and confirm password must match.",
        ));
    }

    let user = api
        .update_user(&UpdateUserRequest {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone_number: form.phone.trim().to_string(),
            password: (!password.is_empty()).then(|| form.password.clone()),
        })
        .await?;
    api.session().set_user(user.clone());
    Ok(user)
}

pub fn logout(session: &SessionStore) {
    session.clear();
    info!("logged out");
}
