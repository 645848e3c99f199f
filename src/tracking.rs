//! 订单追踪视图状态
//!
//! 持有订单、当前选中订单与路线结果，并组合路线叠加层状态机。
//! 不变量：路线结果只在产生它的选中订单仍被选中时有效；
//! 任何选中变化都会先清除旧路线，再请求新路线。

use crate::config::ClientConfig;
use crate::error::{ApiError, RouteError};
use crate::overlay::{OverlayCommand, RouteOutcome, RouteOverlay, RouteRequest, RouteTicket};
use crate::route::{ManeuverRules, RawRoute, RouteResult};
use mebeli_shared::{Id, LatLng, Order, OrderStatus};
use tracing::{debug, error, info};

/// 地图上的目的地标记
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationMarker {
    pub order_id: Id,
    pub order_number: String,
    pub status: OrderStatus,
    pub total_price: f64,
    pub position: LatLng,
}

/// 只为坐标可解析的订单生成标记，其余静默跳过
pub fn destination_markers(orders: &[Order]) -> Vec<DestinationMarker> {
    orders
        .iter()
        .filter_map(|order| match order.destination() {
            Some(position) => Some(DestinationMarker {
                order_id: order.id,
                order_number: order.order_number.clone(),
                status: order.status,
                total_price: order.total_price,
                position,
            }),
            None => {
                debug!(order_id = order.id, "skipping order without usable coordinates");
                None
            }
        })
        .collect()
}

/// 延迟清除选中的凭据；新的选中会让它失效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearTicket(u64);

/// 路线面板显示内容
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel<'a> {
    /// 提示点击标记
    NoSelection,
    /// 已选中，路线尚未就绪，不显示旧路线
    AwaitingRoute(&'a Order),
    /// 路线计算失败；提示重新点击标记重试
    RouteUnavailable(&'a Order),
    Route(&'a Order, &'a RouteResult),
}

#[derive(Debug, Clone)]
pub struct TrackingState {
    orders: Vec<Order>,
    markers: Vec<DestinationMarker>,
    selected: Option<Id>,
    route: Option<RouteResult>,
    route_failed: bool,
    overlay: RouteOverlay,
    clear_generation: u64,
    pending_clear: Option<ClearTicket>,
}

impl TrackingState {
    pub fn new(shop: LatLng, rules: ManeuverRules) -> Self {
        Self {
            orders: Vec::new(),
            markers: Vec::new(),
            selected: None,
            route: None,
            route_failed: false,
            overlay: RouteOverlay::new(shop, rules),
            clear_generation: 0,
            pending_clear: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.shop_location, config.maneuver_keywords.clone())
    }

    pub fn shop_location(&self) -> LatLng {
        self.overlay.origin()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn markers(&self) -> &[DestinationMarker] {
        &self.markers
    }

    pub fn selected_order(&self) -> Option<&Order> {
        let id = self.selected?;
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// 订单加载结果；失败时记录日志并退化为“没有目的地”
    ///
    /// 如果之前选中的订单已不在可显示的标记中，返回清除指令。
    pub fn load_orders(&mut self, result: Result<Vec<Order>, ApiError>) -> Option<OverlayCommand> {
        let orders = match result {
            Ok(orders) => orders,
            Err(e) => {
                error!(error = %e, "failed to fetch orders");
                Vec::new()
            }
        };

        self.markers = destination_markers(&orders);
        self.orders = orders;
        info!(
            orders = self.orders.len(),
            markers = self.markers.len(),
            "orders loaded"
        );

        let still_visible = self
            .selected
            .is_some_and(|id| self.markers.iter().any(|m| m.order_id == id));
        if self.selected.is_some() && !still_visible {
            return Some(self.clear_selection());
        }
        None
    }

    /// 选中目的地标记；与当前选中相同时不做任何事，
    /// 除非上一次路线计算失败，此时重新请求
    pub fn select(&mut self, order_id: Id) -> Option<OverlayCommand> {
        self.cancel_pending_clear();

        if self.selected == Some(order_id) && !self.route_failed {
            return None;
        }
        let Some(position) = self
            .markers
            .iter()
            .find(|m| m.order_id == order_id)
            .map(|m| m.position)
        else {
            debug!(order_id, "ignoring selection of an order without a marker");
            return None;
        };

        self.selected = Some(order_id);
        self.route = None;
        self.route_failed = false;
        Some(self.overlay.set_destination(Some(position)))
    }

    /// 弹窗关闭：安排一次延迟清除，调用方在延迟后回传 ticket
    pub fn popup_closed(&mut self) -> ClearTicket {
        self.clear_generation += 1;
        let ticket = ClearTicket(self.clear_generation);
        self.pending_clear = Some(ticket);
        ticket
    }

    /// 延迟到期；ticket 已被新的选中取消时返回 `None`
    pub fn clear_elapsed(&mut self, ticket: ClearTicket) -> Option<OverlayCommand> {
        if self.pending_clear != Some(ticket) {
            return None;
        }
        self.pending_clear = None;
        Some(self.clear_selection())
    }

    /// 立即清除选中；同时清除路线
    pub fn clear_selection(&mut self) -> OverlayCommand {
        self.cancel_pending_clear();
        self.selected = None;
        self.route = None;
        self.route_failed = false;
        self.overlay.set_destination(None)
    }

    pub fn debounce_elapsed(&mut self, ticket: RouteTicket) -> Option<RouteRequest> {
        self.overlay.debounce_elapsed(ticket)
    }

    pub fn is_current(&self, ticket: RouteTicket) -> bool {
        self.overlay.is_current(ticket)
    }

    /// 路线结果到达；返回是否被采纳
    pub fn route_found(&mut self, ticket: RouteTicket, raw: RawRoute) -> bool {
        match self.overlay.complete(ticket, Ok(raw)) {
            RouteOutcome::Applied(result) if self.selected.is_some() => {
                self.route = Some(result);
                true
            }
            _ => false,
        }
    }

    /// 路线失败：路线保持为空，面板改为重试提示
    pub fn route_failed(&mut self, ticket: RouteTicket, err: RouteError) {
        if let RouteOutcome::Failed(_) = self.overlay.complete(ticket, Err(err)) {
            self.route = None;
            self.route_failed = self.selected.is_some();
        }
    }

    pub fn panel(&self) -> Panel<'_> {
        match (self.selected_order(), self.route.as_ref()) {
            (None, _) => Panel::NoSelection,
            (Some(order), None) if self.route_failed => Panel::RouteUnavailable(order),
            (Some(order), None) => Panel::AwaitingRoute(order),
            (Some(order), Some(route)) => Panel::Route(order, route),
        }
    }

    /// 视图卸载：作废所有待执行的工作，返回是否有路线控件需要移除
    pub fn teardown(&mut self) -> bool {
        self.cancel_pending_clear();
        self.selected = None;
        self.route = None;
        self.route_failed = false;
        self.overlay.teardown()
    }

    fn cancel_pending_clear(&mut self) {
        if self.pending_clear.take().is_some() {
            self.clear_generation += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayAction;
    use crate::route::RawSummary;
    use mebeli_shared::RawCoordinate;

    const SHOP: LatLng = LatLng::new(-1.286389, 36.817223);

    fn order(id: Id, lat: RawCoordinate, lng: RawCoordinate) -> Order {
        Order {
            id,
            order_number: format!("ORD-{}", id),
            status: OrderStatus::InTransit,
            total_price: 4500.0,
            latitude: lat,
            longitude: lng,
            items: vec![],
            created_at: None,
        }
    }

    fn loaded() -> TrackingState {
        let mut state = TrackingState::new(SHOP, ManeuverRules::default());
        state.load_orders(Ok(vec![
            order(1, RawCoordinate::Number(-1.30), RawCoordinate::Number(36.80)),
            order(2, "-1.25".into(), "36.85".into()),
            order(3, "unknown".into(), RawCoordinate::Number(36.85)),
            order(4, RawCoordinate::Missing, RawCoordinate::Missing),
        ]));
        state
    }

    fn raw(meters: f64) -> RawRoute {
        RawRoute {
            summary: RawSummary {
                total_distance: meters,
                total_time: 125.0,
            },
            instructions: vec![],
        }
    }

    fn ticket_of(cmd: Option<OverlayCommand>) -> RouteTicket {
        match cmd.map(|c| c.action) {
            Some(OverlayAction::Schedule(t)) => t,
            other => panic!("expected a scheduled route, got {:?}", other),
        }
    }

    #[test]
    fn orders_with_unparseable_coordinates_get_no_marker() {
        let state = loaded();
        let ids: Vec<Id> = state.markers().iter().map(|m| m.order_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.orders().len(), 4);
    }

    #[test]
    fn fetch_failure_degrades_to_no_destinations() {
        let mut state = TrackingState::new(SHOP, ManeuverRules::default());
        state.load_orders(Err(ApiError::Transport("offline".into())));
        assert!(state.markers().is_empty());
        assert_eq!(state.panel(), Panel::NoSelection);
    }

    #[test]
    fn selecting_unmarked_order_is_ignored() {
        let mut state = loaded();
        assert_eq!(state.select(3), None);
        assert!(state.selected_order().is_none());
    }

    #[test]
    fn selection_shows_prompt_until_route_arrives() {
        let mut state = loaded();
        let t = ticket_of(state.select(1));
        assert!(matches!(state.panel(), Panel::AwaitingRoute(o) if o.id == 1));

        state.debounce_elapsed(t).unwrap();
        assert!(state.route_found(t, raw(1500.0)));
        match state.panel() {
            Panel::Route(o, r) => {
                assert_eq!(o.id, 1);
                assert_eq!(r.distance, "1.5 km");
                assert_eq!(r.duration, "2 min");
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn reselecting_same_order_keeps_route() {
        let mut state = loaded();
        let t = ticket_of(state.select(1));
        state.debounce_elapsed(t).unwrap();
        state.route_found(t, raw(900.0));

        assert_eq!(state.select(1), None);
        assert!(state.route().is_some());
    }

    #[test]
    fn switching_destination_before_route_resolves_never_shows_stale_route() {
        let mut state = loaded();
        let a = ticket_of(state.select(1));
        state.debounce_elapsed(a).unwrap();

        let cmd = state.select(2);
        assert!(cmd.unwrap().remove_previous);
        let b = ticket_of(cmd);
        state.debounce_elapsed(b).unwrap();

        assert!(!state.route_found(a, raw(1000.0)));
        assert!(state.route().is_none());

        assert!(state.route_found(b, raw(7000.0)));
        assert_eq!(state.route().unwrap().distance, "7.0 km");
        assert_eq!(state.selected_order().unwrap().id, 2);
    }

    #[test]
    fn clearing_removes_route_and_line() {
        let mut state = loaded();
        let t = ticket_of(state.select(1));
        state.debounce_elapsed(t).unwrap();
        state.route_found(t, raw(1000.0));

        let cmd = state.clear_selection();
        assert!(cmd.remove_previous);
        assert_eq!(cmd.action, OverlayAction::ReportNone);
        assert!(state.route().is_none());
        assert_eq!(state.panel(), Panel::NoSelection);
    }

    #[test]
    fn delayed_clear_is_cancelled_by_new_selection() {
        let mut state = loaded();
        state.select(1);
        let close = state.popup_closed();
        state.select(2);

        assert_eq!(state.clear_elapsed(close), None);
        assert_eq!(state.selected_order().unwrap().id, 2);
    }

    #[test]
    fn delayed_clear_is_cancelled_by_reselecting_same_marker() {
        let mut state = loaded();
        state.select(1);
        let close = state.popup_closed();
        state.select(1);

        assert_eq!(state.clear_elapsed(close), None);
        assert_eq!(state.selected_order().unwrap().id, 1);
    }

    #[test]
    fn delayed_clear_fires_when_uncontested() {
        let mut state = loaded();
        let t = ticket_of(state.select(1));
        let close = state.popup_closed();

        let cmd = state.clear_elapsed(close).unwrap();
        assert_eq!(cmd.action, OverlayAction::ReportNone);
        assert!(state.selected_order().is_none());
        assert_eq!(state.debounce_elapsed(t), None);
    }

    #[test]
    fn failed_route_shows_retry_prompt() {
        let mut state = loaded();
        let t = ticket_of(state.select(2));
        state.debounce_elapsed(t).unwrap();
        state.route_failed(t, RouteError::Service("timeout".into()));

        assert!(matches!(state.panel(), Panel::RouteUnavailable(o) if o.id == 2));
        assert!(state.route().is_none());
    }

    #[test]
    fn reselecting_after_failure_requests_route_again() {
        let mut state = loaded();
        let first = ticket_of(state.select(1));
        state.debounce_elapsed(first).unwrap();
        state.route_failed(first, RouteError::NoRoute);

        let cmd = state.select(1);
        assert!(cmd.unwrap().remove_previous);
        let retry = ticket_of(cmd);
        assert_ne!(retry, first);
        assert!(matches!(state.panel(), Panel::AwaitingRoute(o) if o.id == 1));

        state.debounce_elapsed(retry).unwrap();
        assert!(state.route_found(retry, raw(2500.0)));
        assert!(matches!(state.panel(), Panel::Route(o, _) if o.id == 1));
        assert_eq!(state.select(1), None);
    }

    #[test]
    fn stale_failure_does_not_mark_new_selection_failed() {
        let mut state = loaded();
        let a = ticket_of(state.select(1));
        state.debounce_elapsed(a).unwrap();
        ticket_of(state.select(2));

        state.route_failed(a, RouteError::NoRoute);
        assert!(matches!(state.panel(), Panel::AwaitingRoute(o) if o.id == 2));
    }

    #[test]
    fn reload_without_selected_order_clears_selection() {
        let mut state = loaded();
        state.select(1);
        let cmd = state.load_orders(Ok(vec![order(2, "-1.25".into(), "36.85".into())]));

        assert_eq!(cmd.unwrap().action, OverlayAction::ReportNone);
        assert!(state.selected_order().is_none());
    }

    #[test]
    fn teardown_releases_everything() {
        let mut state = loaded();
        let t = ticket_of(state.select(1));
        state.debounce_elapsed(t).unwrap();
        state.popup_closed();

        assert!(state.teardown());
        assert!(!state.has_pending_clear());
        assert!(!state.route_found(t, raw(1.0)));
    }
}
