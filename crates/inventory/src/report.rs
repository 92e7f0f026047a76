//! Reporting: dashboard counters, 30-day summary and the 6-month chart series.
//!
//! All functions are read-only computations over one consistent snapshot of
//! items, movements and waste rows; callers take the snapshot, this module only
//! derives numbers from it.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use stockroom_core::{ItemId, two_places};

use crate::catalog::Category;
use crate::item::InventoryItem;
use crate::messages::Localizer;
use crate::movement::{MovementKind, StockMovement};
use crate::settings::{WasteLevel, WasteThresholds};
use crate::status::StockStatus;
use crate::waste::WasteRecord;

/// Number of calendar months in each chart series.
pub const WINDOW_MONTHS: usize = 6;
/// Length of the dashboard/report period in days.
pub const PERIOD_DAYS: i64 = 30;
/// Entries in each top-items ranking.
pub const TOP_ITEMS: usize = 5;

/// The trailing calendar months ending with the current one, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    months: Vec<NaiveDate>,
}

impl MonthWindow {
    pub fn trailing(now: DateTime<Utc>, count: usize) -> Self {
        let today = now.date_naive();
        let first = today - Duration::days(i64::from(today.day0()));
        let months = (0..count)
            .rev()
            .map(|back| first - Months::new(back as u32))
            .collect();
        Self { months }
    }

    /// First-of-month dates, oldest first.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Midnight UTC on the first day of the oldest month.
    pub fn start(&self) -> DateTime<Utc> {
        self.months
            .first()
            .copied()
            .unwrap_or_default()
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    /// Index of the month `at` falls in, if it is inside the window.
    pub fn bucket(&self, at: DateTime<Utc>) -> Option<usize> {
        let (year, month) = (at.year(), at.month());
        self.months
            .iter()
            .position(|m| m.year() == year && m.month() == month)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MonthFlow {
    entradas: Decimal,
    saidas: Decimal,
    desperdicio: Decimal,
    /// Sum of `new - previous`; exact for adjustments too.
    net: Decimal,
}

/// One month of the inventory-level chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryLevelPoint {
    pub month: String,
    pub date: NaiveDate,
    /// Total quantity on hand at the end of the month.
    pub value: Decimal,
    pub entradas: Decimal,
    pub saidas: Decimal,
    pub desperdicio: Decimal,
}

/// Reconstruct end-of-month stock totals by walking the ledger backward from
/// the current total.
///
/// `total[last] = current_total` and `total[i] = total[i + 1] - net[i + 1]`.
/// Values are clamped at zero.
pub fn inventory_level_series(
    window: &MonthWindow,
    current_total: Decimal,
    movements: &[StockMovement],
    texts: &Localizer,
) -> Vec<InventoryLevelPoint> {
    let len = window.months().len();
    let mut flows = vec![MonthFlow::default(); len];
    for m in movements {
        let Some(idx) = window.bucket(m.created_at) else {
            continue;
        };
        let flow = &mut flows[idx];
        match m.kind {
            MovementKind::Entrada => flow.entradas += m.quantity,
            MovementKind::Saida => flow.saidas += m.quantity,
            MovementKind::Desperdicio => flow.desperdicio += m.quantity,
            MovementKind::Ajuste => {}
        }
        flow.net += m.delta();
    }

    let mut totals = vec![Decimal::ZERO; len];
    if let Some(last) = totals.last_mut() {
        *last = current_total;
    }
    for i in (0..len.saturating_sub(1)).rev() {
        totals[i] = totals[i + 1] - flows[i + 1].net;
    }

    window
        .months()
        .iter()
        .zip(totals)
        .zip(flows)
        .map(|((date, total), flow)| InventoryLevelPoint {
            month: texts.month_abbrev(date.month()).to_string(),
            date: *date,
            value: two_places(total.max(Decimal::ZERO)),
            entradas: two_places(flow.entradas),
            saidas: two_places(flow.saidas),
            desperdicio: two_places(flow.desperdicio),
        })
        .collect()
}

/// One month of the waste-cost chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WastePoint {
    pub month: String,
    pub date: NaiveDate,
    pub value: Decimal,
    pub level: WasteLevel,
}

/// Waste cost per calendar month, classified against the thresholds.
pub fn waste_series(
    window: &MonthWindow,
    waste: &[WasteRecord],
    thresholds: &WasteThresholds,
    texts: &Localizer,
) -> Vec<WastePoint> {
    let mut sums = vec![Decimal::ZERO; window.months().len()];
    for w in waste {
        if let Some(idx) = window.bucket(w.date) {
            sums[idx] += w.cost;
        }
    }

    window
        .months()
        .iter()
        .zip(sums)
        .map(|(date, sum)| {
            let value = two_places(sum);
            WastePoint {
                month: texts.month_abbrev(date.month()).to_string(),
                date: *date,
                value,
                level: thresholds.classify(value),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub critical: usize,
    pub low: usize,
    pub medium: usize,
    pub good: usize,
}

/// Dashboard header counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_items: usize,
    /// Items at or under their minimum.
    pub low_stock_count: usize,
    pub by_status: StatusCounts,
    pub total_value: Decimal,
    /// Waste cost over the last [`PERIOD_DAYS`] days.
    pub waste_value: Decimal,
}

pub fn dashboard_stats(
    items: &[InventoryItem],
    waste: &[WasteRecord],
    now: DateTime<Utc>,
) -> DashboardStats {
    let since = now - Duration::days(PERIOD_DAYS);
    let mut by_status = StatusCounts::default();
    for item in items {
        match item.health().status {
            StockStatus::Critical => by_status.critical += 1,
            StockStatus::Low => by_status.low += 1,
            StockStatus::Medium => by_status.medium += 1,
            StockStatus::Good => by_status.good += 1,
        }
    }

    DashboardStats {
        total_items: items.len(),
        low_stock_count: items.iter().filter(|i| i.quantity <= i.min_stock).count(),
        by_status,
        total_value: two_places(items.iter().map(InventoryItem::value).sum()),
        waste_value: two_places(
            waste
                .iter()
                .filter(|w| w.date >= since)
                .map(|w| w.cost)
                .sum(),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_value: Decimal,
    /// `0 < quantity <= min_stock`.
    pub low_stock_items: usize,
    /// Out of stock.
    pub critical_stock_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryWaste {
    pub category: Category,
    pub quantity: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WasteSummary {
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub by_category: Vec<CategoryWaste>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementTotals {
    pub total_entries: Decimal,
    pub total_exits: Decimal,
    pub total_waste: Decimal,
    pub adjustments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemUsage {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: Decimal,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopItems {
    /// Highest consumption (`saida`) quantity.
    pub most_used: Vec<ItemUsage>,
    /// Highest waste cost.
    pub most_wasted: Vec<ItemUsage>,
}

/// Printable 30-day report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub inventory_summary: InventorySummary,
    pub waste_summary: WasteSummary,
    pub stock_movements: MovementTotals,
    pub top_items: TopItems,
    pub waste_thresholds: WasteThresholds,
}

fn ranked(mut usage: Vec<ItemUsage>, key: impl Fn(&ItemUsage) -> Decimal) -> Vec<ItemUsage> {
    usage.retain(|u| key(u) > Decimal::ZERO);
    usage.sort_by(|a, b| key(b).cmp(&key(a)).then_with(|| a.name.cmp(&b.name)));
    usage.truncate(TOP_ITEMS);
    usage
}

pub fn period_summary(
    items: &[InventoryItem],
    movements: &[StockMovement],
    waste: &[WasteRecord],
    thresholds: WasteThresholds,
    now: DateTime<Utc>,
    texts: &Localizer,
) -> PeriodSummary {
    let since = now - Duration::days(PERIOD_DAYS);
    let names: HashMap<ItemId, &str> = items.iter().map(|i| (i.id, i.name.as_str())).collect();
    let name_of = |id: ItemId| {
        names
            .get(&id)
            .copied()
            .unwrap_or(texts.removed_item_name())
            .to_string()
    };

    let inventory_summary = InventorySummary {
        total_items: items.len(),
        total_value: two_places(items.iter().map(InventoryItem::value).sum()),
        low_stock_items: items
            .iter()
            .filter(|i| i.quantity > Decimal::ZERO && i.quantity <= i.min_stock)
            .count(),
        critical_stock_items: items.iter().filter(|i| i.quantity.is_zero()).count(),
    };

    let recent_waste: Vec<&WasteRecord> = waste.iter().filter(|w| w.date >= since).collect();
    let mut by_category: Vec<CategoryWaste> = Vec::new();
    for w in &recent_waste {
        match by_category.iter_mut().find(|c| c.category == w.category) {
            Some(entry) => {
                entry.quantity += w.quantity;
                entry.cost += w.cost;
            }
            None => by_category.push(CategoryWaste {
                category: w.category,
                quantity: w.quantity,
                cost: w.cost,
            }),
        }
    }
    for entry in &mut by_category {
        entry.quantity = two_places(entry.quantity);
        entry.cost = two_places(entry.cost);
    }
    by_category.sort_by(|a, b| b.cost.cmp(&a.cost).then_with(|| a.category.cmp(&b.category)));

    let waste_summary = WasteSummary {
        total_quantity: two_places(recent_waste.iter().map(|w| w.quantity).sum()),
        total_cost: two_places(recent_waste.iter().map(|w| w.cost).sum()),
        by_category,
    };

    let recent: Vec<&StockMovement> = movements.iter().filter(|m| m.created_at >= since).collect();
    let total_of = |kind: MovementKind| -> Decimal {
        two_places(
            recent
                .iter()
                .filter(|m| m.kind == kind)
                .map(|m| m.quantity)
                .sum(),
        )
    };
    let stock_movements = MovementTotals {
        total_entries: total_of(MovementKind::Entrada),
        total_exits: total_of(MovementKind::Saida),
        total_waste: total_of(MovementKind::Desperdicio),
        adjustments: recent
            .iter()
            .filter(|m| m.kind == MovementKind::Ajuste)
            .count(),
    };

    let mut used: HashMap<ItemId, (Decimal, Decimal)> = HashMap::new();
    for m in recent.iter().filter(|m| m.kind == MovementKind::Saida) {
        let entry = used.entry(m.item_id).or_default();
        entry.0 += m.quantity;
        entry.1 += m.cost;
    }
    let mut wasted: HashMap<ItemId, (Decimal, Decimal)> = HashMap::new();
    for w in &recent_waste {
        let entry = wasted.entry(w.item_id).or_default();
        entry.0 += w.quantity;
        entry.1 += w.cost;
    }
    let to_usage = |(id, (quantity, cost)): (ItemId, (Decimal, Decimal))| ItemUsage {
        item_id: id,
        name: name_of(id),
        quantity: two_places(quantity),
        cost: two_places(cost),
    };

    let top_items = TopItems {
        most_used: ranked(used.into_iter().map(&to_usage).collect(), |u| u.quantity),
        most_wasted: ranked(wasted.into_iter().map(&to_usage).collect(), |u| u.cost),
    };

    PeriodSummary {
        period_start: since,
        period_end: now,
        inventory_summary,
        waste_summary,
        stock_movements,
        top_items,
        waste_thresholds: thresholds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Unit;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use stockroom_core::{MovementId, WasteId};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn movement(kind: MovementKind, qty: Decimal, prev: Decimal, when: DateTime<Utc>) -> StockMovement {
        StockMovement {
            id: MovementId::new(),
            item_id: ItemId::new(),
            kind,
            quantity: qty,
            previous_quantity: prev,
            new_quantity: kind.resulting_quantity(prev, qty),
            reason: None,
            cost: kind.cost(qty, dec!(1)),
            created_at: when,
        }
    }

    fn waste(item_id: ItemId, category: Category, cost: Decimal, when: DateTime<Utc>) -> WasteRecord {
        WasteRecord {
            id: WasteId::new(),
            item_id,
            item_name: "Alface".to_string(),
            category,
            quantity: dec!(1),
            reason: "Murchou".to_string(),
            cost,
            date: when,
        }
    }

    fn item(name: &str, quantity: Decimal, min_stock: Decimal) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(),
            name: name.to_string(),
            category: Category::Vegetais,
            quantity,
            unit: Unit::Kg,
            min_stock,
            cost_per_unit: dec!(2.00),
            supplier: None,
            image_url: None,
            last_restocked: at(2026, 1, 1),
            created_at: at(2026, 1, 1),
            updated_at: at(2026, 1, 1),
        }
    }

    #[test]
    fn window_spans_year_boundary() {
        let w = MonthWindow::trailing(at(2026, 2, 15), WINDOW_MONTHS);
        let labels: Vec<String> = w.months().iter().map(|d| d.to_string()).collect();
        assert_eq!(
            labels,
            ["2025-09-01", "2025-10-01", "2025-11-01", "2025-12-01", "2026-01-01", "2026-02-01"]
        );
        assert_eq!(w.start(), Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap());
        assert_eq!(w.bucket(at(2025, 8, 31)), None);
        assert_eq!(w.bucket(at(2026, 1, 31)), Some(4));
    }

    #[test]
    fn backward_recursion_matches_worked_example() {
        let now = at(2026, 6, 20);
        let w = MonthWindow::trailing(now, WINDOW_MONTHS);
        let movements = vec![
            movement(MovementKind::Entrada, dec!(10), dec!(20), at(2026, 6, 2)),
            movement(MovementKind::Saida, dec!(5), dec!(30), at(2026, 6, 3)),
        ];
        let series = inventory_level_series(&w, dec!(50), &movements, &Localizer::default());
        assert_eq!(series.len(), WINDOW_MONTHS);
        assert_eq!(series[5].value, dec!(50));
        assert_eq!(series[5].entradas, dec!(10));
        assert_eq!(series[5].saidas, dec!(5));
        assert_eq!(series[4].value, dec!(45));
        assert_eq!(series[0].value, dec!(45));
        assert_eq!(series[5].month, "Jun");
        assert_eq!(series[0].month, "Jan");
    }

    #[test]
    fn adjustments_use_recorded_delta_and_series_clamps() {
        let now = at(2026, 6, 20);
        let w = MonthWindow::trailing(now, WINDOW_MONTHS);
        // +40 in May from an adjustment; current total only 10
        let movements = vec![movement(MovementKind::Ajuste, dec!(48), dec!(8), at(2026, 5, 10))];
        let series = inventory_level_series(&w, dec!(10), &movements, &Localizer::default());
        assert_eq!(series[5].value, dec!(10));
        assert_eq!(series[4].value, dec!(10));
        assert_eq!(series[3].value, dec!(0));
    }

    #[test]
    fn empty_history_is_flat() {
        let w = MonthWindow::trailing(at(2026, 3, 1), WINDOW_MONTHS);
        let series = inventory_level_series(&w, dec!(12.5), &[], &Localizer::default());
        assert!(series.iter().all(|p| p.value == dec!(12.5) && p.entradas.is_zero()));
    }

    #[test]
    fn waste_series_sums_and_classifies() {
        let now = at(2026, 6, 20);
        let w = MonthWindow::trailing(now, WINDOW_MONTHS);
        let id = ItemId::new();
        let rows = vec![
            waste(id, Category::Vegetais, dec!(80), at(2026, 6, 1)),
            waste(id, Category::Vegetais, dec!(40.005), at(2026, 6, 2)),
            waste(id, Category::Carnes, dec!(350), at(2026, 4, 9)),
            waste(id, Category::Carnes, dec!(999), at(2025, 12, 9)),
        ];
        let series = waste_series(&w, &rows, &WasteThresholds::default(), &Localizer::default());
        assert_eq!(series.len(), WINDOW_MONTHS);
        assert_eq!(series[5].value, dec!(120.01));
        assert_eq!(series[5].level, WasteLevel::Warning);
        assert_eq!(series[3].value, dec!(350));
        assert_eq!(series[3].level, WasteLevel::Critical);
        assert_eq!(series[0].value, dec!(0));
        assert_eq!(series[0].level, WasteLevel::Safe);
    }

    #[test]
    fn dashboard_counts() {
        let now = at(2026, 6, 20);
        let items = vec![
            item("Alface", dec!(0), dec!(5)),
            item("Batata", dec!(5), dec!(5)),
            item("Cebola", dec!(50), dec!(5)),
        ];
        let rows = vec![
            waste(items[0].id, Category::Vegetais, dec!(10), at(2026, 6, 10)),
            waste(items[0].id, Category::Vegetais, dec!(99), at(2026, 4, 10)),
        ];
        let stats = dashboard_stats(&items, &rows, now);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.low_stock_count, 2);
        assert_eq!(stats.by_status.critical, 1);
        assert_eq!(stats.by_status.medium, 1);
        assert_eq!(stats.by_status.good, 1);
        assert_eq!(stats.total_value, dec!(110.00));
        assert_eq!(stats.waste_value, dec!(10.00));
    }

    #[test]
    fn summary_ranks_and_falls_back_for_removed_items() {
        let now = at(2026, 6, 20);
        let alface = item("Alface", dec!(0), dec!(5));
        let batata = item("Batata", dec!(3), dec!(5));
        let gone = ItemId::new();

        let mut out_a = movement(MovementKind::Saida, dec!(2), dec!(10), at(2026, 6, 10));
        out_a.item_id = alface.id;
        let mut out_b = movement(MovementKind::Saida, dec!(7), dec!(10), at(2026, 6, 11));
        out_b.item_id = batata.id;
        let mut out_gone = movement(MovementKind::Saida, dec!(1), dec!(10), at(2026, 6, 12));
        out_gone.item_id = gone;
        let old = movement(MovementKind::Entrada, dec!(100), dec!(0), at(2026, 1, 1));

        let rows = vec![
            waste(alface.id, Category::Vegetais, dec!(12), at(2026, 6, 10)),
            waste(gone, Category::Carnes, dec!(40), at(2026, 6, 10)),
        ];

        let summary = period_summary(
            &[alface.clone(), batata.clone()],
            &[out_a, out_b, out_gone, old],
            &rows,
            WasteThresholds::default(),
            now,
            &Localizer::default(),
        );

        assert_eq!(summary.inventory_summary.low_stock_items, 1);
        assert_eq!(summary.inventory_summary.critical_stock_items, 1);
        assert_eq!(summary.stock_movements.total_exits, dec!(10));
        assert!(summary.stock_movements.total_entries.is_zero());
        assert_eq!(summary.waste_summary.total_cost, dec!(52));
        assert_eq!(summary.waste_summary.by_category[0].category, Category::Carnes);

        let used: Vec<&str> = summary.top_items.most_used.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(used, ["Batata", "Alface", "Item removido"]);
        assert_eq!(summary.top_items.most_wasted[0].name, "Item removido");
        assert_eq!(summary.waste_thresholds, WasteThresholds::default());
    }
}
