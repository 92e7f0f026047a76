//! Per-user waste thresholds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{RawNumber, decimal::NumberError, two_places};

use crate::validation::{Field, QUANTITY_MAX, ValidationReport, Violation};

/// Severity of a month's waste cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WasteLevel {
    Safe,
    Warning,
    Critical,
}

/// Cost bands for waste charts. `safe < critical` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteThresholds {
    #[serde(rename = "waste_safe_threshold")]
    pub safe: Decimal,
    #[serde(rename = "waste_critical_threshold")]
    pub critical: Decimal,
}

impl Default for WasteThresholds {
    fn default() -> Self {
        Self {
            safe: two_places(Decimal::ONE_HUNDRED),
            critical: two_places(Decimal::from(300)),
        }
    }
}

impl WasteThresholds {
    /// `<= safe` is safe, `>= critical` is critical, anything between is a warning.
    pub fn classify(&self, cost: Decimal) -> WasteLevel {
        if cost <= self.safe {
            WasteLevel::Safe
        } else if cost >= self.critical {
            WasteLevel::Critical
        } else {
            WasteLevel::Warning
        }
    }

    pub fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        check_bound(Field::SafeThreshold, self.safe, &mut report);
        check_bound(Field::CriticalThreshold, self.critical, &mut report);
        if report.is_valid() && self.safe >= self.critical {
            report.error(Field::SafeThreshold, Violation::NotBelowCritical);
        }
        if report.is_valid() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

fn check_bound(field: Field, value: Decimal, report: &mut ValidationReport) {
    if value < Decimal::ZERO {
        report.error(field, Violation::MustNotBeNegative);
    }
    if value > QUANTITY_MAX {
        report.error(field, Violation::ExceedsMaximum { max: QUANTITY_MAX });
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsPatch {
    #[serde(default, rename = "waste_safe_threshold")]
    pub safe: Option<RawNumber>,
    #[serde(default, rename = "waste_critical_threshold")]
    pub critical: Option<RawNumber>,
}

impl ThresholdsPatch {
    pub fn apply(&self, current: WasteThresholds) -> Result<WasteThresholds, ValidationReport> {
        let mut report = ValidationReport::new();
        let safe = merge(Field::SafeThreshold, self.safe.as_ref(), current.safe, &mut report);
        let critical = merge(
            Field::CriticalThreshold,
            self.critical.as_ref(),
            current.critical,
            &mut report,
        );
        if !report.is_valid() {
            return Err(report);
        }
        let merged = WasteThresholds { safe, critical };
        merged.validate()?;
        Ok(merged)
    }
}

fn merge(
    field: Field,
    raw: Option<&RawNumber>,
    current: Decimal,
    report: &mut ValidationReport,
) -> Decimal {
    let Some(raw) = raw else {
        return current;
    };
    match raw.parse() {
        Ok(value) => two_places(value),
        Err(NumberError::NotANumber) => {
            report.error(field, Violation::NotANumber);
            current
        }
        Err(NumberError::OutOfRange) => {
            report.error(field, Violation::ExceedsMaximum { max: QUANTITY_MAX });
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn classification_bands() {
        let t = WasteThresholds::default();
        assert_eq!(t.classify(dec!(100)), WasteLevel::Safe);
        assert_eq!(t.classify(dec!(100.01)), WasteLevel::Warning);
        assert_eq!(t.classify(dec!(299.99)), WasteLevel::Warning);
        assert_eq!(t.classify(dec!(300)), WasteLevel::Critical);
    }

    #[test]
    fn patch_merges_partially() {
        let patch = ThresholdsPatch {
            safe: Some(RawNumber::from(50.0)),
            critical: None,
        };
        let merged = patch.apply(WasteThresholds::default()).unwrap();
        assert_eq!(merged.safe, dec!(50));
        assert_eq!(merged.critical, dec!(300));
    }

    #[test]
    fn safe_must_stay_below_critical() {
        let patch = ThresholdsPatch {
            safe: Some(RawNumber::from(400.0)),
            critical: None,
        };
        let report = patch.apply(WasteThresholds::default()).unwrap_err();
        assert_eq!(report.errors()[0].violation, Violation::NotBelowCritical);
    }

    #[test]
    fn negatives_and_garbage_are_rejected() {
        let patch = ThresholdsPatch {
            safe: Some(RawNumber::from(-1.0)),
            critical: Some(RawNumber::from("muito")),
        };
        let report = patch.apply(WasteThresholds::default()).unwrap_err();
        assert!(report.has(Field::CriticalThreshold));
    }

    #[test]
    fn serializes_with_setting_names() {
        let json = serde_json::to_value(WasteThresholds::default()).unwrap();
        assert_eq!(json["waste_safe_threshold"], "100.00");
        assert_eq!(json["waste_critical_threshold"], "300.00");
    }
}
