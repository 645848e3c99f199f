use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";

pub type Id = u64;

// =========================================================
// 地理坐标 (Geo)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// 坐标有限且落在 WGS84 范围内
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// 后端返回的坐标字段：可能是数字、数字字符串，也可能缺失或为 null；
/// 其他任何 JSON 值落入 `Other`，不会让整个订单列表解析失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Other(serde_json::Value),
}

impl RawCoordinate {
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawCoordinate::Number(n) => *n,
            RawCoordinate::Text(s) => s.trim().parse::<f64>().ok()?,
            RawCoordinate::Missing | RawCoordinate::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        RawCoordinate::Number(value)
    }
}

impl From<&str> for RawCoordinate {
    fn from(value: &str) -> Self {
        RawCoordinate::Text(value.to_string())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: Id,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// 购物车行中冗余保存的商品快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureSnapshot {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Id,
    pub furniture_id: Id,
    pub quantity: u32,
    pub furniture: FurnitureSnapshot,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.furniture.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    InTransit,
    Delivered,
    Failed,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::InTransit => "In transit",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Failed => "Failed",
            OrderStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub furniture_id: Id,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Id,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_price: f64,
    #[serde(default)]
    pub latitude: RawCoordinate,
    #[serde(default)]
    pub longitude: RawCoordinate,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// 订单目的地；任一坐标无法解析时返回 `None`
    pub fn destination(&self) -> Option<LatLng> {
        let point = LatLng::new(self.latitude.parse()?, self.longitude.parse()?);
        point.is_valid().then_some(point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

// =========================================================
// 请求 / 响应体 (Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub furniture_id: Id,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartLineRequest {
    #[serde(skip)]
    pub id: Id,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCartLineRequest {
    #[serde(skip)]
    pub id: Id,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LatLng> for PlaceOrderRequest {
    fn from(point: LatLng) -> Self {
        Self {
            latitude: point.lat,
            longitude: point.lng,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFurniture {
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
}

/// 仅携带提示信息的通用响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// 下单响应：后端可能直接返回订单，也可能包一层 message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderConfirmation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default, rename = "orderNumber")]
    pub order_number: Option<String>,
}

impl OrderConfirmation {
    pub fn order_number(&self) -> Option<&str> {
        self.order_number
            .as_deref()
            .or_else(|| self.order.as_ref().map(|o| o.order_number.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_accepts_numbers_and_numeric_strings() {
        assert_eq!(RawCoordinate::Number(-1.28).parse(), Some(-1.28));
        assert_eq!(RawCoordinate::from(" 36.82 ").parse(), Some(36.82));
        assert_eq!(RawCoordinate::from("abc").parse(), None);
        assert_eq!(RawCoordinate::from("NaN").parse(), None);
        assert_eq!(RawCoordinate::Missing.parse(), None);
    }

    #[test]
    fn order_decodes_mixed_coordinate_shapes() {
        let json = r#"[
            {"id":1,"orderNumber":"ORD-1","status":"in_transit","totalPrice":4500,
             "latitude":"-1.28","longitude":36.82},
            {"id":2,"orderNumber":"ORD-2","status":"placed","totalPrice":10,
             "latitude":null,"longitude":"x"},
            {"id":3,"orderNumber":"ORD-3","status":"on_hold","totalPrice":10}
        ]"#;
        let orders: Vec<Order> = serde_json::from_str(json).unwrap();

        assert_eq!(orders[0].status, OrderStatus::InTransit);
        assert_eq!(orders[0].destination(), Some(LatLng::new(-1.28, 36.82)));
        assert_eq!(orders[1].destination(), None);
        assert_eq!(orders[2].status, OrderStatus::Unknown);
        assert_eq!(orders[2].destination(), None);
    }

    #[test]
    fn non_numeric_coordinate_shapes_decode_without_error() {
        let json = r#"[
            {"id":1,"orderNumber":"ORD-1","status":"placed","totalPrice":10,
             "latitude":-1.3,"longitude":36.8},
            {"id":2,"orderNumber":"ORD-2","status":"placed","totalPrice":10,
             "latitude":true,"longitude":36.8},
            {"id":3,"orderNumber":"ORD-3","status":"placed","totalPrice":10,
             "latitude":-1.3,"longitude":{"value":36.8}},
            {"id":4,"orderNumber":"ORD-4","status":"placed","totalPrice":10,
             "latitude":[-1.3],"longitude":36.8}
        ]"#;
        let orders: Vec<Order> = serde_json::from_str(json).unwrap();

        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].destination(), Some(LatLng::new(-1.3, 36.8)));
        assert_eq!(orders[1].latitude, RawCoordinate::Other(serde_json::Value::Bool(true)));
        assert!(orders[1..].iter().all(|o| o.destination().is_none()));
    }

    #[test]
    fn out_of_range_destination_is_rejected() {
        let order = Order {
            id: 1,
            order_number: "ORD-1".into(),
            status: OrderStatus::Placed,
            total_price: 0.0,
            latitude: RawCoordinate::Number(120.0),
            longitude: RawCoordinate::Number(36.0),
            items: vec![],
            created_at: None,
        };
        assert_eq!(order.destination(), None);
    }

    #[test]
    fn cart_line_uses_camel_case_and_computes_total() {
        let json = r#"{"id":7,"furnitureId":3,"quantity":2,
            "furniture":{"name":"Sofa","price":1000}}"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.furniture_id, 3);
        assert_eq!(line.line_total(), 2000.0);
    }

    #[test]
    fn add_to_cart_body_shape() {
        let body = serde_json::to_value(AddToCartRequest {
            furniture_id: 9,
            quantity: 2,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"furnitureId": 9, "quantity": 2}));
    }

    #[test]
    fn update_user_omits_blank_password() {
        let body = serde_json::to_value(UpdateUserRequest {
            name: "A".into(),
            email: "a@b.c".into(),
            phone_number: "0700".into(),
            password: None,
        })
        .unwrap();
        assert!(body.get("password").is_none());
    }
}
