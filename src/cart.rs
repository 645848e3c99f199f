//! 购物车：读取、修改数量、删除、下单
//!
//! 每次修改后整体重新拉取购物车，不做乐观更新。

use crate::api::ShopApi;
use crate::error::{ApiError, ApiResult, GeoError};
use crate::request::HttpClient;
use mebeli_shared::{CartLine, Id, LatLng, OrderConfirmation};
use tracing::{info, warn};

pub fn cart_total(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::line_total).sum()
}

/// 下单结果与下单后重新拉取的购物车
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub confirmation: OrderConfirmation,
    pub lines: Vec<CartLine>,
}

impl CheckoutReceipt {
    pub fn notice(&self) -> String {
        match (self.confirmation.message.as_deref(), self.confirmation.order_number()) {
            (Some(msg), _) => msg.to_string(),
            (None, Some(number)) => format!("Order {} placed", number),
            (None, None) => "Order placed".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct CartService<C> {
    api: ShopApi<C>,
}

impl<C: HttpClient> CartService<C> {
    pub fn new(api: ShopApi<C>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self) -> ApiResult<Vec<CartLine>> {
        self.api.get_cart().await
    }

    /// 数量小于 1 时直接拒绝，不会发出任何请求
    pub async fn update_quantity(&self, line_id: Id, quantity: u32) -> ApiResult<Vec<CartLine>> {
        if quantity < 1 {
            warn!(line_id, quantity, "rejecting cart quantity below 1");
            return Err(ApiError::invalid("Quantity must be at least 1"));
        }
        self.api.update_cart_line(line_id, quantity).await?;
        self.fetch().await
    }

    pub async fn remove(&self, line_id: Id) -> ApiResult<Vec<CartLine>> {
        self.api.remove_cart_line(line_id).await?;
        self.fetch().await
    }

    pub async fn checkout(&self, destination: LatLng) -> ApiResult<CheckoutReceipt> {
        if !destination.is_valid() {
            return Err(ApiError::invalid(GeoError::InvalidCoordinates.to_string()));
        }
        let confirmation = self.api.place_order(destination).await?;
        info!(
            order_number = confirmation.order_number().unwrap_or("-"),
            "order placed"
        );
        let lines = self.fetch().await?;
        Ok(CheckoutReceipt {
            confirmation,
            lines,
        })
    }
}

/// 设备定位优先；定位不可用时改用手动输入的坐标
pub fn resolve_checkout_location(
    device: Result<LatLng, GeoError>,
    manual_lat: &str,
    manual_lng: &str,
) -> Result<LatLng, GeoError> {
    match device {
        Ok(point) if point.is_valid() => return Ok(point),
        Ok(point) => warn!(lat = point.lat, lng = point.lng, "device reported invalid position"),
        Err(e) => warn!(error = %e, "device location unavailable, using manual coordinates"),
    }
    parse_manual(manual_lat, manual_lng)
}

fn parse_manual(lat: &str, lng: &str) -> Result<LatLng, GeoError> {
    let parse = |raw: &str| {
        raw.trim()
            .parse::<f64>()
            .map_err(|_| GeoError::InvalidCoordinates)
    };
    let point = LatLng::new(parse(lat)?, parse(lng)?);
    if point.is_valid() {
        Ok(point)
    } else {
        Err(GeoError::InvalidCoordinates)
    }
}
