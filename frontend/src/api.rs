use crate::web::FetchClient;
use leptos::prelude::*;
use mebeli::ShopApi;
use mebeli::cart::CartService;

/// 浏览器中使用的 API 客户端
pub type Api = ShopApi<FetchClient>;

#[derive(Clone, Copy)]
pub struct ApiContext(StoredValue<Api, LocalStorage>);

impl ApiContext {
    pub fn new(api: Api) -> Self {
        Self(StoredValue::new_local(api))
    }
}

/// 取一份客户端的克隆（共享同一个会话存储），可移入 `spawn_local`
pub fn use_api() -> Api {
    use_context::<ApiContext>()
        .expect("ApiContext should be provided")
        .0
        .get_value()
}

pub fn use_cart_service() -> CartService<FetchClient> {
    CartService::new(use_api())
}
