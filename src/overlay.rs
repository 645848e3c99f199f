//! 路线叠加层状态机
//!
//! 不直接接触地图或定时器：每次目的地变化返回一条指令，
//! 由调用方（浏览器中的 Leaflet 驱动）执行。所有异步回调都携带
//! `RouteTicket`，只有当前 ticket 的结果会被采纳。

use crate::error::RouteError;
use crate::route::{ManeuverRules, RawRoute, RouteResult};
use mebeli_shared::LatLng;
use tracing::{debug, warn};

/// 一次路线请求的身份；目的地每变化一次 generation 递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteTicket {
    generation: u64,
}

impl RouteTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// debounce 结束后需要发出的路线请求
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub ticket: RouteTicket,
    pub from: LatLng,
    pub to: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    /// 没有目的地：回调收到空结果，不画线
    ReportNone,
    /// 启动 debounce 定时器，到期后调用 `debounce_elapsed`
    Schedule(RouteTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayCommand {
    /// 先移除上一条路线控件，再做其他事
    pub remove_previous: bool,
    pub action: OverlayAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Applied(RouteResult),
    Failed(RouteError),
    /// 目的地已变化或已清除，结果被丢弃
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Debouncing(RouteTicket),
    Requested(RouteTicket),
    Settled(RouteTicket),
}

#[derive(Debug, Clone)]
pub struct RouteOverlay {
    origin: LatLng,
    rules: ManeuverRules,
    generation: u64,
    destination: Option<LatLng>,
    phase: Phase,
    /// 当前挂在地图上的控件属于哪个 ticket
    line_owner: Option<RouteTicket>,
}

impl RouteOverlay {
    pub fn new(origin: LatLng, rules: ManeuverRules) -> Self {
        Self {
            origin,
            rules,
            generation: 0,
            destination: None,
            phase: Phase::Idle,
            line_owner: None,
        }
    }

    pub fn origin(&self) -> LatLng {
        self.origin
    }

    pub fn destination(&self) -> Option<LatLng> {
        self.destination
    }

    pub fn has_line(&self) -> bool {
        self.line_owner.is_some()
    }

    pub fn is_current(&self, ticket: RouteTicket) -> bool {
        ticket.generation == self.generation && self.destination.is_some()
    }

    /// 目的地变化：旧 ticket 全部失效
    pub fn set_destination(&mut self, to: Option<LatLng>) -> OverlayCommand {
        self.generation += 1;
        let remove_previous = self.line_owner.take().is_some();
        self.destination = to;

        let action = match to {
            None => {
                self.phase = Phase::Idle;
                OverlayAction::ReportNone
            }
            Some(_) => {
                let ticket = RouteTicket {
                    generation: self.generation,
                };
                self.phase = Phase::Debouncing(ticket);
                OverlayAction::Schedule(ticket)
            }
        };

        debug!(generation = self.generation, remove_previous, ?action, "route destination changed");
        OverlayCommand {
            remove_previous,
            action,
        }
    }

    /// debounce 到期；只有仍是当前 ticket 时才返回请求，
    /// 并视为该 ticket 的控件已加到地图上
    pub fn debounce_elapsed(&mut self, ticket: RouteTicket) -> Option<RouteRequest> {
        if self.phase != Phase::Debouncing(ticket) {
            debug!(generation = ticket.generation, "ignoring stale debounce");
            return None;
        }
        let to = self.destination?;
        self.phase = Phase::Requested(ticket);
        self.line_owner = Some(ticket);
        Some(RouteRequest {
            ticket,
            from: self.origin,
            to,
        })
    }

    pub fn complete(
        &mut self,
        ticket: RouteTicket,
        result: Result<RawRoute, RouteError>,
    ) -> RouteOutcome {
        if self.phase != Phase::Requested(ticket) {
            debug!(generation = ticket.generation, current = self.generation, "discarding stale route result");
            return RouteOutcome::Stale;
        }
        self.phase = Phase::Settled(ticket);

        match result {
            Ok(raw) => RouteOutcome::Applied(RouteResult::from_raw(&raw, &self.rules)),
            Err(e) => {
                warn!(generation = ticket.generation, error = %e, "route computation failed");
                RouteOutcome::Failed(e)
            }
        }
    }

    /// 卸载：作废所有 ticket，返回是否还有控件需要移除
    pub fn teardown(&mut self) -> bool {
        self.generation += 1;
        self.destination = None;
        self.phase = Phase::Idle;
        self.line_owner.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: LatLng = LatLng::new(-1.286389, 36.817223);
    const A: LatLng = LatLng::new(-1.30, 36.80);
    const B: LatLng = LatLng::new(-1.25, 36.85);

    fn raw(meters: f64) -> RawRoute {
        RawRoute {
            summary: crate::route::RawSummary {
                total_distance: meters,
                total_time: 600.0,
            },
            instructions: vec![],
        }
    }

    fn scheduled(cmd: OverlayCommand) -> RouteTicket {
        match cmd.action {
            OverlayAction::Schedule(t) => t,
            OverlayAction::ReportNone => panic!("expected a scheduled request"),
        }
    }

    #[test]
    fn first_destination_schedules_without_removal() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let cmd = overlay.set_destination(Some(A));

        assert!(!cmd.remove_previous);
        let ticket = scheduled(cmd);
        let req = overlay.debounce_elapsed(ticket).unwrap();
        assert_eq!(req.from, SHOP);
        assert_eq!(req.to, A);
        assert!(overlay.has_line());
    }

    #[test]
    fn late_response_for_previous_destination_is_discarded() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let a = scheduled(overlay.set_destination(Some(A)));
        overlay.debounce_elapsed(a).unwrap();

        let cmd = overlay.set_destination(Some(B));
        assert!(cmd.remove_previous, "A's line must be removed before B is requested");
        let b = scheduled(cmd);
        overlay.debounce_elapsed(b).unwrap();

        assert_eq!(overlay.complete(a, Ok(raw(1000.0))), RouteOutcome::Stale);
        match overlay.complete(b, Ok(raw(2500.0))) {
            RouteOutcome::Applied(r) => assert_eq!(r.distance, "2.5 km"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rapid_reselection_only_requests_the_last_destination() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let a = scheduled(overlay.set_destination(Some(A)));
        let b = scheduled(overlay.set_destination(Some(B)));

        assert_eq!(overlay.debounce_elapsed(a), None);
        assert!(!overlay.has_line());
        assert_eq!(overlay.debounce_elapsed(b).unwrap().to, B);
    }

    #[test]
    fn clearing_reports_none_and_removes_the_line() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let a = scheduled(overlay.set_destination(Some(A)));
        overlay.debounce_elapsed(a).unwrap();

        let cmd = overlay.set_destination(None);
        assert_eq!(
            cmd,
            OverlayCommand {
                remove_previous: true,
                action: OverlayAction::ReportNone
            }
        );
        assert!(!overlay.is_current(a));
        assert_eq!(overlay.complete(a, Ok(raw(1.0))), RouteOutcome::Stale);
    }

    #[test]
    fn failure_is_reported_once_for_current_ticket() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let a = scheduled(overlay.set_destination(Some(A)));
        overlay.debounce_elapsed(a).unwrap();

        assert_eq!(
            overlay.complete(a, Err(RouteError::NoRoute)),
            RouteOutcome::Failed(RouteError::NoRoute)
        );
        assert_eq!(overlay.complete(a, Ok(raw(1.0))), RouteOutcome::Stale);
    }

    #[test]
    fn teardown_invalidates_pending_work() {
        let mut overlay = RouteOverlay::new(SHOP, ManeuverRules::default());
        let a = scheduled(overlay.set_destination(Some(A)));
        overlay.debounce_elapsed(a).unwrap();

        assert!(overlay.teardown());
        assert!(!overlay.teardown());
        assert_eq!(overlay.complete(a, Ok(raw(1.0))), RouteOutcome::Stale);
    }
}
