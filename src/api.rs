use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest};
use crate::session::SessionStore;
use mebeli_shared::protocol::{
    ApiRequest, CurrentUserRequest, GetCartRequest, ListFurnitureRequest, ListOrdersRequest,
};
use mebeli_shared::{
    AddToCartRequest, CartLine, Furniture, HEADER_AUTHORIZATION, Id, LatLng, LoginRequest,
    LoginResponse, MessageResponse, NewFurniture, Order, OrderConfirmation, PlaceOrderRequest,
    RegisterRequest, RemoveCartLineRequest, UpdateCartLineRequest, UpdateUserRequest, User,
};
use tracing::{debug, warn};

/// 商城 REST API 客户端
///
/// 对具体的 HTTP 实现保持泛型，浏览器中注入 fetch 实现，测试中注入 mock。
/// 令牌在每次请求时从会话存储读取，登录 / 登出无需重建客户端。
#[derive(Clone)]
pub struct ShopApi<C> {
    client: C,
    base_url: String,
    session: SessionStore,
}

impl<C: HttpClient> ShopApi<C> {
    pub fn new(client: C, base_url: &str, session: SessionStore) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个类型化请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD)
            .with_header("Accept", "application/json");

        if R::AUTH {
            let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if R::METHOD.has_body() {
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(serde_json::to_value(req)?);
        }

        debug!(method = R::METHOD.as_str(), %path, "api request");
        let resp = self.client.send(http).await.map_err(|e| {
            warn!(method = R::METHOD.as_str(), %path, error = %e, "transport failure");
            e
        })?;

        if !resp.ok() {
            let err = resp.into_status_error();
            warn!(method = R::METHOD.as_str(), %path, error = %err, "api request rejected");
            return Err(err);
        }

        resp.json::<R::Response>()
    }

    // ---------------------------------------------------------
    // Catalog
    // ---------------------------------------------------------

    pub async fn list_furniture(&self) -> ApiResult<Vec<Furniture>> {
        self.send(&ListFurnitureRequest).await
    }

    pub async fn create_furniture(&self, item: &NewFurniture) -> ApiResult<Furniture> {
        self.send(item).await
    }

    // ---------------------------------------------------------
    // Cart
    // ---------------------------------------------------------

    pub async fn get_cart(&self) -> ApiResult<Vec<CartLine>> {
        self.send(&GetCartRequest).await
    }

    pub async fn add_to_cart(&self, furniture_id: Id, quantity: u32) -> ApiResult<MessageResponse> {
        if quantity < 1 {
            return Err(ApiError::invalid("Quantity must be at least 1"));
        }
        self.send(&AddToCartRequest {
            furniture_id,
            quantity,
        })
        .await
    }

    /// 数量小于 1 时本地拒绝，不发请求
    pub async fn update_cart_line(&self, id: Id, quantity: u32) -> ApiResult<MessageResponse> {
        if quantity < 1 {
            return Err(ApiError::invalid("Quantity must be at least 1"));
        }
        self.send(&UpdateCartLineRequest { id, quantity }).await
    }

    pub async fn remove_cart_line(&self, id: Id) -> ApiResult<MessageResponse> {
        self.send(&RemoveCartLineRequest { id }).await
    }

    // ---------------------------------------------------------
    // Orders
    // ---------------------------------------------------------

    pub async fn list_orders(&self) -> ApiResult<Vec<Order>> {
        self.send(&ListOrdersRequest).await
    }

    pub async fn place_order(&self, destination: LatLng) -> ApiResult<OrderConfirmation> {
        self.send(&PlaceOrderRequest::from(destination)).await
    }

    // ---------------------------------------------------------
    // Users
    // ---------------------------------------------------------

    pub async fn login(&self, req: &LoginRequest) -> ApiResult<LoginResponse> {
        self.send(req).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResult<MessageResponse> {
        self.send(req).await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.send(&CurrentUserRequest).await
    }

    pub async fn update_user(&self, req: &UpdateUserRequest) -> ApiResult<User> {
        self.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::test_utils::MockHttpClient;
    use serde_json::json;
    use std::rc::Rc;

    const BASE: &str = "http://shop.test/api";

    fn api_with_token(token: Option<&str>) -> (Rc<MockHttpClient>, ShopApi<Rc<MockHttpClient>>) {
        let client = Rc::new(MockHttpClient::new());
        let session = SessionStore::in_memory();
        if let Some(t) = token {
            session.set_token(t);
        }
        (client.clone(), ShopApi::new(client, &format!("{}/", BASE), session))
    }

    #[tokio::test]
    async fn authenticated_requests_carry_bearer_token() {
        let (client, api) = api_with_token(Some("tok"));
        client.mock_response(HttpMethod::Get, &format!("{}/orders", BASE), 200, json!([]));

        api.list_orders().await.unwrap();

        let reqs = client.requests.borrow();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].header("Authorization"), Some("Bearer tok"));
        assert_eq!(reqs[0].body, None);
    }

    #[tokio::test]
    async fn authenticated_request_without_token_is_not_sent() {
        let (client, api) = api_with_token(None);

        let err = api.get_cart().await.unwrap_err();

        assert_eq!(err, ApiError::Unauthenticated);
        assert!(client.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn public_catalog_needs_no_token() {
        let (client, api) = api_with_token(None);
        client.mock_response(
            HttpMethod::Get,
            &format!("{}/furniture", BASE),
            200,
            json!([{"id":1,"name":"Sofa","price":45000,"category":"sofa","images":["a.jpg"]}]),
        );

        let items = api.list_furniture().await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(client.requests.borrow()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn create_furniture_posts_item_with_token() {
        let (client, api) = api_with_token(Some("admin"));
        client.mock_response(
            HttpMethod::Post,
            &format!("{}/furniture", BASE),
            201,
            json!({"id":7,"name":"Oak Table","price":18000,"category":"table","images":[]}),
        );

        let created = api
            .create_furniture(&NewFurniture {
                name: "Oak Table".into(),
                price: 18000.0,
                category: "table".into(),
                description: None,
                images: vec![],
            })
            .await
            .unwrap();

        assert_eq!(created.id, 7);
        let reqs = client.requests.borrow();
        assert_eq!(reqs[0].header("Authorization"), Some("Bearer admin"));
        let body: serde_json::Value = serde_json::from_str(reqs[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name":"Oak Table","price":18000.0,"category":"table","images":[]})
        );
    }

    #[tokio::test]
    async fn quantity_below_one_is_rejected_locally() {
        let (client, api) = api_with_token(Some("tok"));

        let err = api.update_cart_line(3, 0).await.unwrap_err();

        assert!(matches!(err, ApiError::Invalid(_)));
        assert_eq!(client.count(HttpMethod::Put, "/cart/3"), 0);
    }

    #[tokio::test]
    async fn update_cart_line_puts_quantity_only() {
        let (client, api) = api_with_token(Some("tok"));
        client.mock_response(HttpMethod::Put, &format!("{}/cart/3", BASE), 200, json!({}));

        api.update_cart_line(3, 4).await.unwrap();

        let reqs = client.requests.borrow();
        let body: serde_json::Value = serde_json::from_str(reqs[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"quantity": 4}));
        assert_eq!(reqs[0].header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn server_message_propagates_on_failure() {
        let (client, api) = api_with_token(None);
        client.mock_response(
            HttpMethod::Post,
            &format!("{}/users/login", BASE),
            401,
            json!({"message": "Invalid credentials"}),
        );

        let err = api
            .login(&LoginRequest {
                email: "a@b.c".into(),
                password: "x".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn transport_failure_maps_to_transport_error() {
        let (client, api) = api_with_token(None);
        client.mock_transport_error(HttpMethod::Get, &format!("{}/furniture", BASE));

        let err = api.list_furniture().await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_success_body_is_accepted() {
        let (client, api) = api_with_token(Some("tok"));
        client.mock_raw_response(HttpMethod::Delete, &format!("{}/cart/9", BASE), 204, "");

        let resp = api.remove_cart_line(9).await.unwrap();

        assert_eq!(resp.message, None);
    }
}
