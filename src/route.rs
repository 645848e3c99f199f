//! 路线结果的派生：距离 / 时长格式化与转向图标分类

use serde::{Deserialize, Serialize};
use tracing::debug;

// =========================================================
// 路线服务原始数据 (与 Leaflet Routing Machine 的 IRoute 同形)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSummary {
    /// 米
    pub total_distance: f64,
    /// 秒
    pub total_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInstruction {
    #[serde(default)]
    pub text: String,
    /// 米
    #[serde(default)]
    pub distance: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoute {
    pub summary: RawSummary,
    #[serde(default)]
    pub instructions: Vec<RawInstruction>,
}

// =========================================================
// 转向图标
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverIcon {
    Left,
    Right,
    Roundabout,
    Continue,
    Head,
    Ramp,
    Merge,
    /// 未识别的指令
    Proceed,
}

impl ManeuverIcon {
    pub fn css_class(&self) -> &'static str {
        match self {
            ManeuverIcon::Left => "maneuver-left",
            ManeuverIcon::Right => "maneuver-right",
            ManeuverIcon::Roundabout => "maneuver-roundabout",
            ManeuverIcon::Continue => "maneuver-continue",
            ManeuverIcon::Head => "maneuver-head",
            ManeuverIcon::Ramp => "maneuver-ramp",
            ManeuverIcon::Merge => "maneuver-merge",
            ManeuverIcon::Proceed => "maneuver-proceed",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            ManeuverIcon::Left => "↰",
            ManeuverIcon::Right => "↱",
            ManeuverIcon::Roundabout => "⟳",
            ManeuverIcon::Continue => "↑",
            ManeuverIcon::Head => "⇧",
            ManeuverIcon::Ramp => "↗",
            ManeuverIcon::Merge => "⤨",
            ManeuverIcon::Proceed => "•",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub icon: ManeuverIcon,
}

impl KeywordRule {
    pub fn new(keyword: &str, icon: ManeuverIcon) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            icon,
        }
    }
}

/// 关键词 → 图标表，按顺序匹配，先命中者生效，大小写不敏感
///
/// "roundabout" 与 "ramp" 排在 "left" / "right" 之前，
/// 否则 "Take the ramp on the right" 会被归为右转。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<KeywordRule>", into = "Vec<KeywordRule>")]
pub struct ManeuverRules {
    rules: Vec<KeywordRule>,
}

impl From<Vec<KeywordRule>> for ManeuverRules {
    fn from(rules: Vec<KeywordRule>) -> Self {
        Self::new(rules)
    }
}

impl From<ManeuverRules> for Vec<KeywordRule> {
    fn from(rules: ManeuverRules) -> Self {
        rules.rules
    }
}

impl Default for ManeuverRules {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new("roundabout", ManeuverIcon::Roundabout),
            KeywordRule::new("ramp", ManeuverIcon::Ramp),
            KeywordRule::new("merge", ManeuverIcon::Merge),
            KeywordRule::new("left", ManeuverIcon::Left),
            KeywordRule::new("right", ManeuverIcon::Right),
            KeywordRule::new("head", ManeuverIcon::Head),
            KeywordRule::new("continue", ManeuverIcon::Continue),
        ])
    }
}

/// 分类结果；`matched == false` 表示没有关键词命中，退回 `Proceed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maneuver {
    pub icon: ManeuverIcon,
    pub matched: bool,
}

impl ManeuverRules {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| KeywordRule::new(&r.keyword, r.icon))
            .filter(|r| !r.keyword.is_empty())
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn classify(&self, text: &str) -> Maneuver {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| lower.contains(&r.keyword))
            .map(|r| Maneuver {
                icon: r.icon,
                matched: true,
            })
            .unwrap_or(Maneuver {
                icon: ManeuverIcon::Proceed,
                matched: false,
            })
    }
}

// =========================================================
// 格式化
// =========================================================

/// 不足 1 km 用整数米，否则保留一位小数的千米
pub fn format_distance(meters: f64) -> String {
    let meters = meters.max(0.0);
    if meters / 1000.0 < 1.0 {
        format!("{} m", meters.round() as u64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// 路线总距离，始终以千米表示
pub fn format_total_distance(meters: f64) -> String {
    format!("{:.1} km", meters.max(0.0) / 1000.0)
}

/// 四舍五入到分钟
pub fn format_duration(seconds: f64) -> String {
    format!("{} min", (seconds.max(0.0) / 60.0).round() as u64)
}

// =========================================================
// 路线结果
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub text: String,
    pub distance: String,
    pub icon: ManeuverIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    pub distance: String,
    pub duration: String,
    pub steps: Vec<RouteStep>,
}

impl RouteResult {
    pub fn from_raw(raw: &RawRoute, rules: &ManeuverRules) -> Self {
        let steps = raw
            .instructions
            .iter()
            .map(|inst| {
                let maneuver = rules.classify(&inst.text);
                if !maneuver.matched {
                    debug!(text = %inst.text, kind = ?inst.kind, "unclassified route instruction");
                }
                RouteStep {
                    text: inst.text.clone(),
                    distance: format_distance(inst.distance),
                    icon: maneuver.icon,
                }
            })
            .collect();

        Self {
            distance: format_total_distance(raw.summary.total_distance),
            duration: format_duration(raw.summary.total_time),
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_switches_units_at_one_kilometre() {
        assert_eq!(format_distance(850.0), "850 m");
        assert_eq!(format_distance(849.6), "850 m");
        assert_eq!(format_distance(1500.0), "1.5 km");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(f64::NAN), "0 m");
    }

    #[test]
    fn duration_rounds_to_minutes() {
        assert_eq!(format_duration(125.0), "2 min");
        assert_eq!(format_duration(150.0), "3 min");
        assert_eq!(format_duration(20.0), "0 min");
    }

    #[test]
    fn total_distance_stays_in_kilometres() {
        assert_eq!(format_total_distance(850.0), "0.8 km");
        assert_eq!(format_total_distance(12_340.0), "12.3 km");
    }

    #[test]
    fn roundabout_matches_in_any_case() {
        let rules = ManeuverRules::default();
        for text in [
            "Enter the ROUNDABOUT and take the 2nd exit",
            "At the Roundabout, turn right",
        ] {
            assert_eq!(rules.classify(text).icon, ManeuverIcon::Roundabout);
        }
    }

    #[test]
    fn unknown_text_defaults_to_proceed_and_is_flagged() {
        let m = ManeuverRules::default().classify("You have arrived at your destination");
        assert_eq!(m.icon, ManeuverIcon::Proceed);
        assert!(!m.matched);
    }

    #[test]
    fn ordered_rules_resolve_overlapping_keywords() {
        let rules = ManeuverRules::default();
        assert_eq!(rules.classify("Take the ramp on the right").icon, ManeuverIcon::Ramp);
        assert_eq!(rules.classify("Merge left onto A104").icon, ManeuverIcon::Merge);
        assert_eq!(rules.classify("Turn left onto Moi Avenue").icon, ManeuverIcon::Left);
        assert_eq!(rules.classify("Head north on Kenyatta Ave").icon, ManeuverIcon::Head);
        assert_eq!(rules.classify("Continue onto Uhuru Hwy").icon, ManeuverIcon::Continue);
    }

    #[test]
    fn custom_rules_are_normalised() {
        let rules = ManeuverRules::new(vec![
            KeywordRule {
                keyword: "KEEP".into(),
                icon: ManeuverIcon::Continue,
            },
            KeywordRule {
                keyword: String::new(),
                icon: ManeuverIcon::Left,
            },
        ]);
        assert_eq!(rules.rules().len(), 1);
        assert_eq!(rules.classify("Keep straight").icon, ManeuverIcon::Continue);
    }

    #[test]
    fn route_result_from_routing_machine_payload() {
        let raw: RawRoute = serde_json::from_str(
            r#"{"summary":{"totalDistance":4230.5,"totalTime":725},
                "instructions":[
                  {"text":"Head south on Moi Avenue","distance":320.4,"type":"Head"},
                  {"text":"Enter the roundabout","distance":1500,"type":"Roundabout"},
                  {"text":"You have arrived","distance":0,"type":"DestinationReached"}
                ]}"#,
        )
        .unwrap();

        let result = RouteResult::from_raw(&raw, &ManeuverRules::default());

        assert_eq!(result.distance, "4.2 km");
        assert_eq!(result.duration, "12 min");
        assert_eq!(
            result.steps,
            vec![
                RouteStep {
                    text: "Head south on Moi Avenue".into(),
                    distance: "320 m".into(),
                    icon: ManeuverIcon::Head,
                },
                RouteStep {
                    text: "Enter the roundabout".into(),
                    distance: "1.5 km".into(),
                    icon: ManeuverIcon::Roundabout,
                },
                RouteStep {
                    text: "You have arrived".into(),
                    distance: "0 m".into(),
                    icon: ManeuverIcon::Proceed,
                },
            ]
        );
    }
}
