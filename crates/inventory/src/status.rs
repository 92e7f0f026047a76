//! Stock status classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{Locale, two_places};

/// Health bucket for an item's stock relative to its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Low,
    Medium,
    Good,
}

impl StockStatus {
    pub const ALL: [StockStatus; 4] = [
        StockStatus::Critical,
        StockStatus::Low,
        StockStatus::Medium,
        StockStatus::Good,
    ];

    pub fn code(self) -> &'static str {
        match self {
            StockStatus::Critical => "critical",
            StockStatus::Low => "low",
            StockStatus::Medium => "medium",
            StockStatus::Good => "good",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|st| st.code() == s)
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::PtBr, StockStatus::Critical) => "Crítico",
            (Locale::PtBr, StockStatus::Low) => "Baixo",
            (Locale::PtBr, StockStatus::Medium) => "Médio",
            (Locale::PtBr, StockStatus::Good) => "OK",
            (Locale::En, StockStatus::Critical) => "Critical",
            (Locale::En, StockStatus::Low) => "Low",
            (Locale::En, StockStatus::Medium) => "Medium",
            (Locale::En, StockStatus::Good) => "OK",
        }
    }
}

/// Classification result: bucket plus fill percentage (0..=100, two places).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockHealth {
    pub status: StockStatus,
    pub percentage: Decimal,
}

/// Classify `quantity` against `min_stock`.
///
/// Thresholds are compared exactly (`q*10 <= m*3` rather than `q/m <= 0.3`).
/// A zero minimum can never be breached, so such items are always `good`.
pub fn classify(quantity: Decimal, min_stock: Decimal) -> StockHealth {
    let hundred = Decimal::ONE_HUNDRED;
    if min_stock <= Decimal::ZERO {
        return StockHealth {
            status: StockStatus::Good,
            percentage: two_places(hundred),
        };
    }

    let ten = Decimal::TEN;
    let status = if quantity * ten <= min_stock * Decimal::from(3) {
        StockStatus::Critical
    } else if quantity * ten <= min_stock * Decimal::from(6) {
        StockStatus::Low
    } else if quantity <= min_stock {
        StockStatus::Medium
    } else {
        StockStatus::Good
    };

    let percentage = if quantity >= min_stock {
        hundred
    } else {
        (quantity.max(Decimal::ZERO) * hundred) / min_stock
    };

    StockHealth {
        status,
        percentage: two_places(percentage),
    }
}
