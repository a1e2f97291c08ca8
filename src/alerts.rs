//! Alert evaluation: combine current-cycle indicator readings into a
//! LONG / SHORT / NONE decision and format the notification message.
//!
//! Pure module — no side effects; message dispatch belongs to the notifier.

use crate::errors::RsiWatchError;
use crate::indicators::Bands;
use chrono::Utc;

/// Comparison operator for alert rules. Parsed from its symbol at config
/// load time; unknown symbols are rejected there instead of silently
/// matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Comparator {
    pub fn parse(symbol: &str) -> Result<Self, RsiWatchError> {
        match symbol {
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::Le),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Ge),
            "==" => Ok(Comparator::Eq),
            other => Err(RsiWatchError::configuration(format!(
                "unrecognized comparator '{}', expected one of < <= > >= ==",
                other
            ))),
        }
    }

    pub fn eval(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Lt => value < threshold,
            Comparator::Le => value <= threshold,
            Comparator::Gt => value > threshold,
            Comparator::Ge => value >= threshold,
            Comparator::Eq => value == threshold,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Eq => "==",
        }
    }
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparator bound to a threshold, held static for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertRule {
    pub comparator: Comparator,
    pub threshold: f64,
}

impl AlertRule {
    pub fn new(comparator: Comparator, threshold: f64) -> Self {
        Self {
            comparator,
            threshold,
        }
    }

    /// Logical AND over the readings. An empty list is vacuously true;
    /// decision entry points must guard against empty reading sets.
    pub fn holds_over(&self, readings: &[f64]) -> bool {
        readings
            .iter()
            .all(|&value| self.comparator.eval(value, self.threshold))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Long,
    Short,
    None,
}

impl Decision {
    /// Banner appended to the alert message, matching the original alert
    /// format.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            Decision::Long => Some("==== LONG ===="),
            Decision::Short => Some("==== SHORT ===="),
            Decision::None => None,
        }
    }
}

/// Uniform-comparison policy: every reading must satisfy the long rule for
/// LONG, every reading the short rule for SHORT. An empty reading set never
/// fires.
pub fn evaluate_uniform(readings: &[f64], long_rule: AlertRule, short_rule: AlertRule) -> Decision {
    if readings.is_empty() {
        return Decision::None;
    }
    if long_rule.holds_over(readings) {
        Decision::Long
    } else if short_rule.holds_over(readings) {
        Decision::Short
    } else {
        Decision::None
    }
}

/// Cross-indicator policy: momentum signal gated by a band breakout, which
/// cuts false positives versus RSI alone. Comparisons are numeric.
pub fn evaluate_cross(
    rsi: f64,
    bands: &Bands,
    mark_price: f64,
    down_threshold: f64,
    up_threshold: f64,
) -> Decision {
    if rsi < down_threshold && mark_price >= bands.upper {
        Decision::Long
    } else if rsi > up_threshold && mark_price <= bands.lower {
        Decision::Short
    } else {
        Decision::None
    }
}

/// Build the human-readable alert payload: symbol, mark price, every
/// labelled reading, timestamp, and the decision banner.
pub fn format_alert(
    symbol: &str,
    mark_price: f64,
    readings: &[(String, f64)],
    decision: Decision,
) -> String {
    let mut message = format!("Price alert for {}\nPrice: {}", symbol, mark_price);
    for (label, value) in readings {
        message.push_str(&format!("\n{}: {}", label, value));
    }
    message.push_str(&format!(
        "\nDate: {}",
        Utc::now().format("%H:%M:%S %d-%m-%Y")
    ));
    if let Some(banner) = decision.banner() {
        message.push_str(&format!("\n{}", banner));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparator_parse_roundtrip() {
        for symbol in ["<", "<=", ">", ">=", "=="] {
            let cmp = Comparator::parse(symbol).unwrap();
            assert_eq!(cmp.symbol(), symbol);
        }
    }

    #[test]
    fn comparator_parse_rejects_unknown_symbols() {
        for symbol in ["!=", "<>", "=", "", "lt"] {
            let err = Comparator::parse(symbol).unwrap_err();
            assert!(matches!(err, RsiWatchError::Configuration { .. }));
        }
    }

    #[test]
    fn comparator_eval() {
        assert!(Comparator::Lt.eval(1.0, 2.0));
        assert!(!Comparator::Lt.eval(2.0, 2.0));
        assert!(Comparator::Le.eval(2.0, 2.0));
        assert!(Comparator::Gt.eval(3.0, 2.0));
        assert!(Comparator::Ge.eval(2.0, 2.0));
        assert!(Comparator::Eq.eval(2.0, 2.0));
        assert!(!Comparator::Eq.eval(2.0, 2.5));
    }

    #[test]
    fn rule_is_vacuously_true_on_empty_list() {
        let rule = AlertRule::new(Comparator::Lt, 40.0);
        assert!(rule.holds_over(&[]));
    }

    #[test]
    fn uniform_all_below_down_is_long() {
        let decision = evaluate_uniform(
            &[30.0, 35.0, 38.0],
            AlertRule::new(Comparator::Lt, 40.0),
            AlertRule::new(Comparator::Gt, 60.0),
        );
        assert_eq!(decision, Decision::Long);
    }

    #[test]
    fn uniform_all_above_up_is_short() {
        let decision = evaluate_uniform(
            &[65.0, 72.0, 80.0],
            AlertRule::new(Comparator::Lt, 40.0),
            AlertRule::new(Comparator::Gt, 60.0),
        );
        assert_eq!(decision, Decision::Short);
    }

    #[test]
    fn uniform_mixed_readings_are_none() {
        let decision = evaluate_uniform(
            &[30.0, 72.0],
            AlertRule::new(Comparator::Lt, 40.0),
            AlertRule::new(Comparator::Gt, 60.0),
        );
        assert_eq!(decision, Decision::None);

        let decision = evaluate_uniform(
            &[45.0, 50.0, 55.0],
            AlertRule::new(Comparator::Lt, 40.0),
            AlertRule::new(Comparator::Gt, 60.0),
        );
        assert_eq!(decision, Decision::None);
    }

    #[test]
    fn uniform_empty_readings_never_fire() {
        let decision = evaluate_uniform(
            &[],
            AlertRule::new(Comparator::Lt, 40.0),
            AlertRule::new(Comparator::Gt, 60.0),
        );
        assert_eq!(decision, Decision::None);
    }

    #[test]
    fn cross_long_needs_low_rsi_and_upper_breakout() {
        let bands = Bands {
            upper: 100.0,
            middle: 95.0,
            lower: 90.0,
        };
        assert_eq!(
            evaluate_cross(20.0, &bands, 105.0, 30.0, 70.0),
            Decision::Long
        );
        // Momentum alone is not enough
        assert_eq!(
            evaluate_cross(20.0, &bands, 95.0, 30.0, 70.0),
            Decision::None
        );
    }

    #[test]
    fn cross_short_needs_high_rsi_and_lower_breakout() {
        let bands = Bands {
            upper: 110.0,
            middle: 105.0,
            lower: 100.0,
        };
        assert_eq!(
            evaluate_cross(80.0, &bands, 95.0, 30.0, 70.0),
            Decision::Short
        );
        assert_eq!(
            evaluate_cross(80.0, &bands, 105.0, 30.0, 70.0),
            Decision::None
        );
    }

    #[test]
    fn alert_message_carries_symbol_readings_and_banner() {
        let message = format_alert(
            "BTCUSDT",
            65000.5,
            &[
                ("RSI 15m".to_string(), 25.0),
                ("RSI 1h".to_string(), 30.5),
            ],
            Decision::Long,
        );
        assert!(message.contains("Price alert for BTCUSDT"));
        assert!(message.contains("Price: 65000.5"));
        assert!(message.contains("RSI 15m: 25"));
        assert!(message.contains("RSI 1h: 30.5"));
        assert!(message.contains("Date: "));
        assert!(message.ends_with("==== LONG ===="));
    }
}
