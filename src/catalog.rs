//! 商品目录：分类过滤、图片翻页、数量选择

use crate::api::ShopApi;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use mebeli_shared::{Furniture, Id, MessageResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    All,
    Sofas,
    Beds,
    Tables,
    Cabinets,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::All,
        Category::Sofas,
        Category::Beds,
        Category::Tables,
        Category::Cabinets,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Sofas => "Sofas",
            Category::Beds => "Beds",
            Category::Tables => "Tables",
            Category::Cabinets => "Cabinets",
        }
    }

    /// 商品 category 字段中要匹配的标签；`All` 不过滤
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Category::All => None,
            Category::Sofas => Some("sofa"),
            Category::Beds => Some("bed"),
            Category::Tables => Some("table"),
            Category::Cabinets => Some("cabinet"),
        }
    }

    pub fn matches(&self, item: &Furniture) -> bool {
        match self.tag() {
            None => true,
            Some(tag) => item.category.to_lowercase().contains(tag),
        }
    }
}

pub fn filter_by_category(items: &[Furniture], category: Category) -> Vec<&Furniture> {
    items.iter().filter(|item| category.matches(item)).collect()
}

/// 单个商品的图片下标，始终落在 `[0, count-1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageCursor {
    index: usize,
    count: usize,
}

impl ImageCursor {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.count
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.index += 1;
        }
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn current<'a>(&self, images: &'a [String]) -> Option<&'a str> {
        images.get(self.index).map(String::as_str)
    }
}

/// 数量选择器，最小为 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantity(u32);

impl Default for Quantity {
    fn default() -> Self {
        Quantity(1)
    }
}

impl Quantity {
    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1).max(1);
    }

    pub fn reset(&mut self) {
        self.0 = 1;
    }
}

/// 加入购物车；未登录时在发出请求前失败
pub async fn add_to_cart<C: HttpClient>(
    api: &ShopApi<C>,
    furniture_id: Id,
    quantity: Quantity,
) -> ApiResult<MessageResponse> {
    if !api.session().is_authenticated() {
        return Err(ApiError::Unauthenticated);
    }
    let resp = api.add_to_cart(furniture_id, quantity.get()).await?;
    info!(furniture_id, quantity = quantity.get(), "added to cart");
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use crate::session::SessionStore;
    use crate::test_utils::MockHttpClient;
    use serde_json::json;
    use std::rc::Rc;

    fn item(id: Id, category: &str) -> Furniture {
        Furniture {
            id,
            name: format!("Item {}", id),
            price: 100.0,
            category: category.to_string(),
            description: None,
            images: vec![],
        }
    }

    #[test]
    fn category_filter_is_case_insensitive() {
        let items = vec![
            item(1, "Sofa"),
            item(2, "BEDS"),
            item(3, "table"),
            item(4, "Cabinet"),
            item(5, "lamp"),
        ];

        let ids = |c| filter_by_category(&items, c).iter().map(|f| f.id).collect::<Vec<_>>();
        assert_eq!(ids(Category::All), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(Category::Sofas), vec![1]);
        assert_eq!(ids(Category::Beds), vec![2]);
        assert_eq!(ids(Category::Tables), vec![3]);
        assert_eq!(ids(Category::Cabinets), vec![4]);
    }

    #[test]
    fn image_cursor_clamps_to_bounds() {
        let mut cursor = ImageCursor::new(3);
        cursor.prev();
        assert_eq!(cursor.index(), 0);
        cursor.next();
        cursor.next();
        cursor.next();
        assert_eq!(cursor.index(), 2);
        assert!(!cursor.has_next());

        let mut empty = ImageCursor::new(0);
        empty.next();
        assert_eq!(empty.index(), 0);
        assert_eq!(empty.current(&[]), None);
    }

    #[test]
    fn quantity_floors_at_one() {
        let mut q = Quantity::default();
        q.decrement();
        assert_eq!(q.get(), 1);
        q.increment();
        q.increment();
        q.decrement();
        assert_eq!(q.get(), 2);
        q.reset();
        assert_eq!(q.get(), 1);
    }

    #[tokio::test]
    async fn adding_requires_login() {
        let client = Rc::new(MockHttpClient::new());
        let api = ShopApi::new(client.clone(), "http://shop.test/api", SessionStore::in_memory());

        let err = add_to_cart(&api, 1, Quantity::default()).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthenticated);
        assert!(client.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn adding_posts_furniture_id_and_quantity() {
        let client = Rc::new(MockHttpClient::new());
        let session = SessionStore::in_memory();
        session.set_token("tok");
        let api = ShopApi::new(client.clone(), "http://shop.test/api", session);
        client.mock_response(
            HttpMethod::Post,
            "http://shop.test/api/cart",
            201,
            json!({"message": "Added to cart"}),
        );

        let mut q = Quantity::default();
        q.increment();
        let resp = add_to_cart(&api, 9, q).await.unwrap();

        assert_eq!(resp.message.as_deref(), Some("Added to cart"));
        let body: serde_json::Value =
            serde_json::from_str(client.requests.borrow()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"furnitureId": 9, "quantity": 2}));
    }
}
