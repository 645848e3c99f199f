use mebeli::cart::{CartService, cart_total};
use mebeli::catalog::{Quantity, add_to_cart};
use mebeli::overlay::OverlayAction;
use mebeli::route::{RawRoute, RawSummary};
use mebeli::test_utils::MockHttpClient;
use mebeli::tracking::{Panel, TrackingState};
use mebeli::{ClientConfig, HttpMethod, SessionStore, ShopApi};
use mebeli_shared::LatLng;
use serde_json::json;
use std::rc::Rc;

const BASE: &str = "http://shop.test/api";

fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

fn signed_in() -> (Rc<MockHttpClient>, ShopApi<Rc<MockHttpClient>>) {
    let client = Rc::new(MockHttpClient::new());
    let session = SessionStore::in_memory();
    session.set_token("tok");
    (client.clone(), ShopApi::new(client, BASE, session))
}

#[tokio::test]
async fn add_items_checkout_and_cart_is_empty_afterwards() {
    let (client, api) = signed_in();
    client.mock_response(HttpMethod::Post, &url("/cart"), 201, json!({"message": "Added"}));
    client.mock_response(
        HttpMethod::Get,
        &url("/cart"),
        200,
        json!([
            {"id": 1, "furnitureId": 10, "quantity": 2,
             "furniture": {"name": "Sofa X", "price": 1000}},
            {"id": 2, "furnitureId": 20, "quantity": 1,
             "furniture": {"name": "Bed Y", "price": 2500}}
        ]),
    );
    client.mock_response(HttpMethod::Get, &url("/cart"), 200, json!([]));
    client.mock_response(
        HttpMethod::Post,
        &url("/orders"),
        201,
        json!({"message": "Order placed", "orderNumber": "ORD-1001"}),
    );

    let mut two = Quantity::default();
    two.increment();
    add_to_cart(&api, 10, two).await.unwrap();
    add_to_cart(&api, 20, Quantity::default()).await.unwrap();

    let cart = CartService::new(api.clone());
    let lines = cart.fetch().await.unwrap();
    assert_eq!(cart_total(&lines), 4500.0);

    let receipt = cart.checkout(LatLng::new(-1.28, 36.82)).await.unwrap();

    assert_eq!(receipt.confirmation.order_number(), Some("ORD-1001"));
    assert!(receipt.lines.is_empty());
    assert_eq!(cart_total(&receipt.lines), 0.0);

    let order_req = client
        .requests
        .borrow()
        .iter()
        .find(|r| r.method == HttpMethod::Post && r.url.ends_with("/orders"))
        .cloned()
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(order_req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"latitude": -1.28, "longitude": 36.82}));
}

#[tokio::test]
async fn zero_quantity_edit_never_reaches_the_server() {
    let (client, api) = signed_in();
    let cart = CartService::new(api);

    assert!(cart.update_quantity(1, 0).await.is_err());
    assert_eq!(client.count(HttpMethod::Put, "/cart/1"), 0);
    assert_eq!(client.count(HttpMethod::Get, "/cart"), 0);
}

#[tokio::test]
async fn tracking_skips_bad_coordinates_and_ignores_stale_routes() {
    let (client, api) = signed_in();
    client.mock_response(
        HttpMethod::Get,
        &url("/orders"),
        200,
        json!([
            {"id": 1, "orderNumber": "A", "status": "in_transit", "totalPrice": 10,
             "latitude": -1.30, "longitude": 36.80},
            {"id": 2, "orderNumber": "B", "status": "placed", "totalPrice": 10,
             "latitude": "-1.25", "longitude": "36.85"},
            {"id": 3, "orderNumber": "C", "status": "placed", "totalPrice": 10,
             "latitude": "n/a", "longitude": 36.85},
            {"id": 4, "orderNumber": "D", "status": "placed", "totalPrice": 10,
             "latitude": true, "longitude": 36.85},
            {"id": 5, "orderNumber": "E", "status": "placed", "totalPrice": 10,
             "latitude": -1.25, "longitude": {"lng": 36.85}}
        ]),
    );

    let mut tracking = TrackingState::from_config(&ClientConfig::default());
    tracking.load_orders(api.list_orders().await);
    assert_eq!(tracking.orders().len(), 5);
    assert_eq!(tracking.markers().len(), 2);

    let ticket = |action: OverlayAction| match action {
        OverlayAction::Schedule(t) => t,
        OverlayAction::ReportNone => panic!("expected a route request"),
    };

    let a = ticket(tracking.select(1).unwrap().action);
    let req_a = tracking.debounce_elapsed(a).unwrap();
    assert_eq!(req_a.from, ClientConfig::default().shop_location);

    let b = ticket(tracking.select(2).unwrap().action);
    tracking.debounce_elapsed(b).unwrap();

    let route = |m: f64| RawRoute {
        summary: RawSummary {
            total_distance: m,
            total_time: 600.0,
        },
        instructions: vec![],
    };

    assert!(!tracking.route_found(a, route(1200.0)));
    assert!(tracking.route_found(b, route(3400.0)));
    match tracking.panel() {
        Panel::Route(order, result) => {
            assert_eq!(order.order_number, "B");
            assert_eq!(result.distance, "3.4 km");
            assert_eq!(result.duration, "10 min");
        }
        other => panic!("unexpected panel {:?}", other),
    }

    let cleared = tracking.clear_selection();
    assert!(cleared.remove_previous);
    assert_eq!(tracking.panel(), Panel::NoSelection);
}
