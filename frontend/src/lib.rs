//! Mebeli 前端应用
//!
//! Context 驱动：
//! - `web::route` / `web::router`: 路由定义与 History API 路由服务
//! - `auth`: 会话信号与认证对话框状态
//! - `api`: 共享同一会话存储的 API 客户端
//! - `notify`: toast 通知
//! - `components`: UI 组件层

mod api;
mod auth;
pub mod logging;
mod notify;
mod serde_helper;
mod web;

mod components {
    pub mod account;
    pub mod cart;
    pub mod catalog;
    pub mod home;
    mod icons;
    pub mod layout;
    pub mod login;
    mod modal;
    pub mod register;
    pub mod routing_overlay;
    pub mod tracking;
}

use crate::api::ApiContext;
use crate::auth::AuthContext;
use crate::components::account::AccountDialog;
use crate::components::cart::CartPage;
use crate::components::catalog::CatalogPage;
use crate::components::home::HomePage;
use crate::components::layout::Layout;
use crate::components::login::LoginDialog;
use crate::components::register::RegisterDialog;
use crate::components::tracking::TrackOrderPage;
use crate::notify::{Notifier, ToastHost};
use crate::web::{BrowserStorage, FetchClient};

use leptos::prelude::*;
use mebeli::{ClientConfig, SessionStore, ShopApi};
use tracing::info;

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Furniture => view! { <CatalogPage /> }.into_any(),
        AppRoute::TrackOrder => view! { <TrackOrderPage /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 配置
    let config = ClientConfig::from_build_env();
    info!(api = %config.api_base_url, "starting storefront");

    // 2. 会话存储（localStorage 中的 token / user）
    let store = SessionStore::load(BrowserStorage);

    // 3. 上下文：认证、API、通知
    let auth_ctx = AuthContext::new(store.clone());
    provide_context(auth_ctx);
    provide_context(ApiContext::new(ShopApi::new(
        FetchClient,
        &config.api_base_url,
        store,
    )));
    provide_context(Notifier::new(config.notification_timeout()));
    provide_context(config);

    // 4. 认证信号注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            <Layout>
                <RouterOutlet matcher=route_matcher />
            </Layout>
            <LoginDialog />
            <RegisterDialog />
            <AccountDialog />
            <ToastHost />
        </Router>
    }
}
