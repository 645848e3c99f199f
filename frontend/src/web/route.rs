//! 路由定义 - 纯领域模型，不依赖 DOM

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Furniture,
    /// 需要登录
    TrackOrder,
    /// 需要登录
    Cart,
    NotFound,
}

impl AppRoute {
    /// 导航栏中出现的路由，按显示顺序
    pub const NAV: [AppRoute; 4] = [
        AppRoute::Home,
        AppRoute::Furniture,
        AppRoute::TrackOrder,
        AppRoute::Cart,
    ];

    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/home" => Self::Home,
            "/furniture" => Self::Furniture,
            "/track-order" => Self::TrackOrder,
            "/cart" => Self::Cart,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/home",
            Self::Furniture => "/furniture",
            Self::TrackOrder => "/track-order",
            Self::Cart => "/cart",
            Self::NotFound => "/404",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Furniture => "Furniture",
            Self::TrackOrder => "Track Order",
            Self::Cart => "Cart",
            Self::NotFound => "Not Found",
        }
    }

    /// 守卫：该路由是否需要登录
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::TrackOrder | Self::Cart)
    }

    /// 未登录访问受保护页面 / 登出时的去处
    pub fn auth_failure_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
