use crate::{
    AddToCartRequest, CartLine, Furniture, Id, LoginRequest, LoginResponse, MessageResponse,
    NewFurniture, Order, OrderConfirmation, PlaceOrderRequest, RegisterRequest,
    RemoveCartLineRequest, UpdateCartLineRequest, UpdateUserRequest, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request must carry the bearer token.
    const AUTH: bool;
    /// The URL path relative to the API base.
    fn path(&self) -> String;
}

// =========================================================
// Catalog
// =========================================================

/// List the furniture catalog
#[derive(Debug, Serialize, Deserialize)]
pub struct ListFurnitureRequest;

impl ApiRequest for ListFurnitureRequest {
    type Response = Vec<Furniture>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: bool = false;
    fn path(&self) -> String {
        "/furniture".to_string()
    }
}

impl ApiRequest for NewFurniture {
    type Response = Furniture;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/furniture".to_string()
    }
}

// =========================================================
// Cart
// =========================================================

/// Fetch the cart lines of the current shopper
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCartRequest;

impl ApiRequest for GetCartRequest {
    type Response = Vec<CartLine>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/cart".to_string()
    }
}

impl ApiRequest for AddToCartRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/cart".to_string()
    }
}

impl ApiRequest for UpdateCartLineRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTH: bool = true;
    fn path(&self) -> String {
        cart_line_path(self.id)
    }
}

impl ApiRequest for RemoveCartLineRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const AUTH: bool = true;
    fn path(&self) -> String {
        cart_line_path(self.id)
    }
}

fn cart_line_path(id: Id) -> String {
    format!("/cart/{}", id)
}

// =========================================================
// Orders
// =========================================================

/// List the orders of the current shopper
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOrdersRequest;

impl ApiRequest for ListOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/orders".to_string()
    }
}

impl ApiRequest for PlaceOrderRequest {
    type Response = OrderConfirmation;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/orders".to_string()
    }
}

// =========================================================
// Users
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = false;
    fn path(&self) -> String {
        "/users/login".to_string()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: bool = false;
    fn path(&self) -> String {
        "/users/register".to_string()
    }
}

/// Fetch the profile behind the bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/users/me".to_string()
    }
}

impl ApiRequest for UpdateUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTH: bool = true;
    fn path(&self) -> String {
        "/users/update".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_line_paths_carry_the_id() {
        assert_eq!(UpdateCartLineRequest { id: 4, quantity: 2 }.path(), "/cart/4");
        assert_eq!(RemoveCartLineRequest { id: 4 }.path(), "/cart/4");
    }

    #[test]
    fn only_writes_carry_bodies() {
        assert!(!<ListOrdersRequest as ApiRequest>::METHOD.has_body());
        assert!(<PlaceOrderRequest as ApiRequest>::METHOD.has_body());
        assert!(<UpdateCartLineRequest as ApiRequest>::METHOD.has_body());
        assert!(!<RemoveCartLineRequest as ApiRequest>::METHOD.has_body());
    }

    #[test]
    fn login_and_register_are_public() {
        assert!(!<LoginRequest as ApiRequest>::AUTH);
        assert!(!<RegisterRequest as ApiRequest>::AUTH);
        assert!(<CurrentUserRequest as ApiRequest>::AUTH);
    }
}
