//! 订单追踪地图的驱动
//!
//! `TrackingState` 只产出指令，这里负责执行：移除旧路线控件、
//! 管理 debounce 与延迟清除两个定时器、创建路线控件并把结果回传。
//! 所有地图对象都是带 Drop 的句柄，视图卸载时整体释放。

use crate::components::catalog::format_price;
use crate::web::Timeout;
use crate::web::leaflet::{LeafletMap, MarkerHandle, RoutingHandle};
use leptos::prelude::*;
use mebeli::overlay::{OverlayAction, OverlayCommand, RouteTicket};
use mebeli::route::RawRoute;
use mebeli::tracking::{ClearTicket, DestinationMarker, TrackingState};
use mebeli::{ApiError, ClientConfig, RouteError};
use mebeli::shared::{Id, Order};
use std::time::Duration;
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

/// 字段按声明顺序 drop：先停定时器，再移除图层，最后销毁地图
#[derive(Default)]
struct MapResources {
    debounce: Option<Timeout>,
    clear: Option<Timeout>,
    routing: Option<RoutingHandle>,
    markers: Vec<MarkerHandle>,
    shop: Option<MarkerHandle>,
    map: Option<LeafletMap>,
}

#[derive(Clone, Copy)]
pub struct RoutingOverlay {
    state: RwSignal<TrackingState>,
    resources: StoredValue<MapResources, LocalStorage>,
    debounce: Duration,
    clear_delay: Duration,
}

impl RoutingOverlay {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            state: RwSignal::new(TrackingState::from_config(config)),
            resources: StoredValue::new_local(MapResources::default()),
            debounce: config.route_debounce(),
            clear_delay: config.selection_clear_delay(),
        }
    }

    pub fn state(&self) -> ReadSignal<TrackingState> {
        self.state.read_only()
    }

    /// 在容器上创建地图；重复调用无效
    pub fn attach_map(&self, container: &JsValue) {
        let attached = self
            .resources
            .try_with_value(|r| r.map.is_some())
            .unwrap_or(true);
        if attached {
            return;
        }

        let shop = self.state.with_untracked(TrackingState::shop_location);
        let map = match LeafletMap::new(container, shop) {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "map unavailable, tracking degrades to the order list");
                return;
            }
        };
        let shop_marker = map.add_shop_marker(shop, "<b>Mebeli shop</b><br/>Orders ship from here");

        self.resources.update_value(|r| {
            r.shop = shop_marker;
            r.map = Some(map);
        });
        self.render_markers();
    }

    pub fn load_orders(&self, result: Result<Vec<Order>, ApiError>) {
        let Some(command) = self.state.try_update(|s| s.load_orders(result)) else {
            return;
        };
        self.render_markers();
        if let Some(command) = command {
            self.apply(command);
        }
    }

    pub fn select(&self, order_id: Id) {
        // 新的选中会让待执行的延迟清除失效
        self.resources.try_update_value(|r| r.clear = None);
        if let Some(Some(command)) = self.state.try_update(|s| s.select(order_id)) {
            self.apply(command);
        }
    }

    pub fn clear_selection(&self) {
        self.resources.try_update_value(|r| r.clear = None);
        if let Some(command) = self.state.try_update(TrackingState::clear_selection) {
            self.apply(command);
        }
    }

    /// 视图卸载：作废 ticket 并释放全部地图对象
    pub fn teardown(&self) {
        if let Some(had_line) = self.state.try_update(TrackingState::teardown) {
            debug!(had_line, "tracking view torn down");
        }
        self.resources
            .try_update_value(|r| *r = MapResources::default());
    }

    fn popup_closed(&self) {
        let Some(ticket) = self.state.try_update(TrackingState::popup_closed) else {
            return;
        };
        let this = *self;
        let timer = Timeout::new(self.clear_delay, move || this.clear_elapsed(ticket));
        // 替换即取消上一个延迟清除
        self.resources.try_update_value(|r| r.clear = Some(timer));
    }

    fn clear_elapsed(&self, ticket: ClearTicket) {
        self.resources.try_update_value(|r| r.clear = None);
        if let Some(Some(command)) = self.state.try_update(|s| s.clear_elapsed(ticket)) {
            self.apply(command);
        }
    }

    fn apply(&self, command: OverlayCommand) {
        self.resources.try_update_value(|r| {
            r.debounce = None;
            if command.remove_previous {
                r.routing = None;
            }
        });

        match command.action {
            OverlayAction::ReportNone => {}
            OverlayAction::Schedule(ticket) => {
                let this = *self;
                let timer = Timeout::new(self.debounce, move || this.debounce_elapsed(ticket));
                self.resources.try_update_value(|r| r.debounce = Some(timer));
            }
        }
    }

    fn debounce_elapsed(&self, ticket: RouteTicket) {
        self.resources.try_update_value(|r| r.debounce = None);
        let Some(Some(request)) = self.state.try_update(|s| s.debounce_elapsed(ticket)) else {
            return;
        };

        let this = *self;
        let handle = self.resources.try_with_value(|r| {
            r.map.as_ref().map(|map| {
                map.add_route(request.from, request.to, move |result| {
                    this.route_result(ticket, result)
                })
            })
        });

        match handle.flatten() {
            Some(Some(control)) => {
                self.resources.try_update_value(|r| r.routing = Some(control));
            }
            Some(None) => self.route_result(
                ticket,
                Err(RouteError::Service("routing control unavailable".to_string())),
            ),
            None => self.route_result(
                ticket,
                Err(RouteError::Service("map unavailable".to_string())),
            ),
        }
    }

    fn route_result(&self, ticket: RouteTicket, result: Result<RawRoute, RouteError>) {
        match result {
            Ok(raw) => {
                self.state.try_update(|s| s.route_found(ticket, raw));
            }
            Err(e) => {
                self.state.try_update(|s| s.route_failed(ticket, e));
            }
        }
    }

    /// 订单变化后重建目的地标记
    fn render_markers(&self) {
        let markers = self
            .state
            .with_untracked(|s| s.markers().to_vec());

        let this = *self;
        let handles = self.resources.try_with_value(|r| {
            let Some(map) = r.map.as_ref() else {
                return Vec::new();
            };
            markers
                .iter()
                .filter_map(|marker| {
                    let id = marker.order_id;
                    map.add_destination_marker(
                        marker.position,
                        &popup_html(marker),
                        move || this.select(id),
                        move || this.popup_closed(),
                    )
                })
                .collect()
        });

        if let Some(handles) = handles {
            self.resources.try_update_value(|r| r.markers = handles);
        }
    }
}

fn popup_html(marker: &DestinationMarker) -> String {
    format!(
        "<b>Order {}</b><br/>Status: {}<br/>Total: {}",
        escape_html(&marker.order_number),
        marker.status.label(),
        format_price(marker.total_price),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
