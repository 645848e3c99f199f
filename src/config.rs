//! 客户端配置
//!
//! 所有值都有默认值；构建时可通过环境变量覆盖（浏览器里没有运行时环境变量），
//! 也可以整体从 JSON 文档加载。

use crate::route::ManeuverRules;
use mebeli_shared::LatLng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3003/api";
/// 内罗毕门店
pub const DEFAULT_SHOP_LOCATION: LatLng = LatLng::new(-1.286389, 36.817223);
pub const DEFAULT_ROUTE_DEBOUNCE_MS: u32 = 300;
pub const DEFAULT_SELECTION_CLEAR_DELAY_MS: u32 = 200;
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u32 = 3000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub shop_location: LatLng,
    pub route_debounce_ms: u32,
    pub selection_clear_delay_ms: u32,
    pub notification_timeout_ms: u32,
    pub maneuver_keywords: ManeuverRules,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            shop_location: DEFAULT_SHOP_LOCATION,
            route_debounce_ms: DEFAULT_ROUTE_DEBOUNCE_MS,
            selection_clear_delay_ms: DEFAULT_SELECTION_CLEAR_DELAY_MS,
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
            maneuver_keywords: ManeuverRules::default(),
        }
    }
}

impl ClientConfig {
    /// 读取构建时变量，读不到或无法解析就用默认值
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            "MEBELI_API_BASE" => option_env!("MEBELI_API_BASE"),
            "MEBELI_SHOP_LAT" => option_env!("MEBELI_SHOP_LAT"),
            "MEBELI_SHOP_LNG" => option_env!("MEBELI_SHOP_LNG"),
            "MEBELI_ROUTE_DEBOUNCE_MS" => option_env!("MEBELI_ROUTE_DEBOUNCE_MS"),
            _ => None,
        })
    }

    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("MEBELI_API_BASE").filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        let lat = parse_var(&lookup, "MEBELI_SHOP_LAT");
        let lng = parse_var(&lookup, "MEBELI_SHOP_LNG");
        if let (Some(lat), Some(lng)) = (lat, lng) {
            let shop = LatLng::new(lat, lng);
            if shop.is_valid() {
                config.shop_location = shop;
            } else {
                warn!(lat, lng, "shop location out of range, using default");
            }
        }

        if let Some(ms) = parse_var(&lookup, "MEBELI_ROUTE_DEBOUNCE_MS") {
            config.route_debounce_ms = ms;
        }

        config
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn route_debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.route_debounce_ms))
    }

    pub fn selection_clear_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.selection_clear_delay_ms))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.notification_timeout_ms))
    }
}

fn parse_var<'a, T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<&'a str>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = raw, "ignoring unparseable config value");
            None
        }
    }
}
