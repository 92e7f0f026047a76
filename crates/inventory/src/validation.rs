//! Input validation for movements and items.
//!
//! Validators never stop at the first problem: every rule is evaluated and all
//! violations are reported together so a client can fix a form in one pass.
//! Messages are rendered separately by [`crate::Localizer`].

use rust_decimal::Decimal;
use serde::Serialize;
use stockroom_core::{RawNumber, decimal::NumberError, two_places};

use crate::catalog::{Category, Unit};
use crate::item::{ItemDraft, ItemInput};
use crate::movement::MovementKind;

pub const QUANTITY_MAX: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);
pub const COST_MIN: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const KG_MIN_STOCK_MAX: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
pub const MAX_DECIMAL_PLACES: u32 = 2;
pub const REASON_MIN: usize = 5;
pub const REASON_MAX: usize = 500;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const SUPPLIER_MAX: usize = 200;

/// Input field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    #[serde(rename = "type")]
    Kind,
    Quantity,
    Reason,
    Name,
    Category,
    Unit,
    MinStock,
    CostPerUnit,
    Supplier,
    #[serde(rename = "waste_safe_threshold")]
    SafeThreshold,
    #[serde(rename = "waste_critical_threshold")]
    CriticalThreshold,
}

impl Field {
    pub fn code(self) -> &'static str {
        match self {
            Field::Kind => "type",
            Field::Quantity => "quantity",
            Field::Reason => "reason",
            Field::Name => "name",
            Field::Category => "category",
            Field::Unit => "unit",
            Field::MinStock => "min_stock",
            Field::CostPerUnit => "cost_per_unit",
            Field::Supplier => "supplier",
            Field::SafeThreshold => "waste_safe_threshold",
            Field::CriticalThreshold => "waste_critical_threshold",
        }
    }
}

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    Required,
    UnknownValue,
    NotANumber,
    MustBePositive,
    MustNotBeNegative,
    TooManyDecimals,
    ExceedsMaximum { max: Decimal },
    BelowMinimum { min: Decimal },
    InsufficientStock { available: Decimal, unit: Unit },
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidCharacters,
    ResultExceedsMaximum { max: Decimal },
    ImplausibleForUnit { max: Decimal, unit: Unit },
    NotBelowCritical,
    /// Warning only: quantity already at or under its minimum.
    BelowMinStock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub violation: Violation,
}

impl FieldError {
    pub fn new(field: Field, violation: Violation) -> Self {
        Self { field, violation }
    }
}

/// Collected errors (blocking) and warnings (advisory).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
    warnings: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, violation: Violation) -> Self {
        let mut report = Self::new();
        report.error(field, violation);
        report
    }

    pub fn error(&mut self, field: Field, violation: Violation) {
        self.errors.push(FieldError::new(field, violation));
    }

    pub fn warn(&mut self, field: Field, violation: Violation) {
        self.warnings.push(FieldError::new(field, violation));
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[FieldError] {
        &self.warnings
    }

    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// The stock shortfall, if one of the errors is an overdraw.
    pub fn insufficient_stock(&self) -> Option<(Decimal, Unit)> {
        self.errors.iter().find_map(|e| match e.violation {
            Violation::InsufficientStock { available, unit } => Some((available, unit)),
            _ => None,
        })
    }
}

/// Current stock of the item a movement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockContext {
    pub quantity: Decimal,
    pub unit: Unit,
}

/// A movement that passed every rule, normalised to two places.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMovement {
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub reason: Option<String>,
}

fn parse_amount(field: Field, raw: &RawNumber, report: &mut ValidationReport) -> Option<Decimal> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(NumberError::NotANumber) => {
            report.error(field, Violation::NotANumber);
            None
        }
        Err(NumberError::OutOfRange) => {
            report.error(field, Violation::ExceedsMaximum { max: QUANTITY_MAX });
            None
        }
    }
}

/// Sign, precision and ceiling checks shared by every amount.
fn check_amount(
    field: Field,
    value: Decimal,
    allow_zero: bool,
    max: Decimal,
    report: &mut ValidationReport,
) {
    if allow_zero {
        if value < Decimal::ZERO {
            report.error(field, Violation::MustNotBeNegative);
        }
    } else if value <= Decimal::ZERO {
        report.error(field, Violation::MustBePositive);
    }
    if value.normalize().scale() > MAX_DECIMAL_PLACES {
        report.error(field, Violation::TooManyDecimals);
    }
    if value > max {
        report.error(field, Violation::ExceedsMaximum { max });
    }
}

fn check_reason(kind: Option<MovementKind>, reason: Option<&str>, report: &mut ValidationReport) {
    let trimmed = reason.map(str::trim).unwrap_or_default();
    let len = trimmed.chars().count();
    if kind == Some(MovementKind::Desperdicio) {
        if len == 0 {
            report.error(Field::Reason, Violation::Required);
        } else if len < REASON_MIN {
            report.error(Field::Reason, Violation::TooShort { min: REASON_MIN });
        }
    }
    if len > REASON_MAX {
        report.error(Field::Reason, Violation::TooLong { max: REASON_MAX });
    }
}

/// Validate a movement submission against the item's current stock.
pub fn validate_movement(
    kind: &str,
    quantity: &RawNumber,
    reason: Option<&str>,
    stock: StockContext,
) -> Result<ValidMovement, ValidationReport> {
    let mut report = ValidationReport::new();

    let parsed_kind = MovementKind::parse(kind);
    if parsed_kind.is_none() {
        report.error(Field::Kind, Violation::UnknownValue);
    }

    let value = parse_amount(Field::Quantity, quantity, &mut report);
    if let Some(value) = value {
        let allow_zero = parsed_kind == Some(MovementKind::Ajuste);
        check_amount(Field::Quantity, value, allow_zero, QUANTITY_MAX, &mut report);

        match parsed_kind {
            Some(MovementKind::Saida | MovementKind::Desperdicio) => {
                if value > stock.quantity {
                    report.error(
                        Field::Quantity,
                        Violation::InsufficientStock {
                            available: two_places(stock.quantity),
                            unit: stock.unit,
                        },
                    );
                }
            }
            Some(MovementKind::Entrada) => {
                if stock.quantity + value > QUANTITY_MAX {
                    report.error(
                        Field::Quantity,
                        Violation::ResultExceedsMaximum { max: QUANTITY_MAX },
                    );
                }
            }
            Some(MovementKind::Ajuste) | None => {}
        }
    }

    check_reason(parsed_kind, reason, &mut report);

    match (parsed_kind, value) {
        (Some(kind), Some(value)) if report.is_valid() => Ok(ValidMovement {
            kind,
            quantity: two_places(value),
            reason: reason
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }),
        _ => Err(report),
    }
}

fn valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('\u{C0}'..='\u{FF}').contains(&c)
        || c.is_whitespace()
        || matches!(c, '-' | '_' | '.' | '(' | ')' | ',' | '&')
}

/// Validate a create/edit form. On success the warnings travel with the draft.
pub fn validate_item(input: &ItemInput) -> Result<(ItemDraft, ValidationReport), ValidationReport> {
    let mut report = ValidationReport::new();

    let name = input.name.trim();
    let name_len = name.chars().count();
    if name_len == 0 {
        report.error(Field::Name, Violation::Required);
    } else if name_len < NAME_MIN {
        report.error(Field::Name, Violation::TooShort { min: NAME_MIN });
    } else if name_len > NAME_MAX {
        report.error(Field::Name, Violation::TooLong { max: NAME_MAX });
    }
    if name_len > 0 && !name.chars().all(valid_name_char) {
        report.error(Field::Name, Violation::InvalidCharacters);
    }

    let category = if input.category.trim().is_empty() {
        report.error(Field::Category, Violation::Required);
        None
    } else {
        let parsed = Category::parse(&input.category);
        if parsed.is_none() {
            report.error(Field::Category, Violation::UnknownValue);
        }
        parsed
    };

    let unit = if input.unit.trim().is_empty() {
        report.error(Field::Unit, Violation::Required);
        None
    } else {
        let parsed = Unit::parse(&input.unit);
        if parsed.is_none() {
            report.error(Field::Unit, Violation::UnknownValue);
        }
        parsed
    };

    let quantity = parse_amount(Field::Quantity, &input.quantity, &mut report);
    if let Some(q) = quantity {
        check_amount(Field::Quantity, q, true, QUANTITY_MAX, &mut report);
    }

    let min_stock = parse_amount(Field::MinStock, &input.min_stock, &mut report);
    if let Some(m) = min_stock {
        check_amount(Field::MinStock, m, true, QUANTITY_MAX, &mut report);
        if unit == Some(Unit::Kg) && m > KG_MIN_STOCK_MAX {
            report.error(
                Field::MinStock,
                Violation::ImplausibleForUnit {
                    max: KG_MIN_STOCK_MAX,
                    unit: Unit::Kg,
                },
            );
        }
    }

    let cost = parse_amount(Field::CostPerUnit, &input.cost_per_unit, &mut report);
    if let Some(c) = cost {
        check_amount(Field::CostPerUnit, c, false, QUANTITY_MAX, &mut report);
        if c > Decimal::ZERO && c < COST_MIN {
            report.error(Field::CostPerUnit, Violation::BelowMinimum { min: COST_MIN });
        }
    }

    let supplier = input
        .supplier
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(s) = supplier {
        if s.chars().count() > SUPPLIER_MAX {
            report.error(Field::Supplier, Violation::TooLong { max: SUPPLIER_MAX });
        }
    }

    if let (Some(q), Some(m)) = (quantity, min_stock) {
        if m > Decimal::ZERO && q <= m {
            report.warn(Field::Quantity, Violation::BelowMinStock);
        }
    }

    if !report.is_valid() {
        return Err(report);
    }

    match (category, unit, quantity, min_stock, cost) {
        (Some(category), Some(unit), Some(quantity), Some(min_stock), Some(cost)) => {
            let draft = ItemDraft {
                name: name.to_string(),
                category,
                quantity: two_places(quantity),
                unit,
                min_stock: two_places(min_stock),
                cost_per_unit: two_places(cost),
                supplier: supplier.map(str::to_string),
                image_url: input
                    .image_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            };
            Ok((draft, report))
        }
        _ => Err(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn stock(q: Decimal) -> StockContext {
        StockContext {
            quantity: q,
            unit: Unit::Kg,
        }
    }

    fn item_input() -> ItemInput {
        ItemInput {
            name: "Tomate Italiano".to_string(),
            category: "vegetais".to_string(),
            quantity: RawNumber::from(10.0),
            unit: "kg".to_string(),
            min_stock: RawNumber::from(5.0),
            cost_per_unit: RawNumber::from("4.50"),
            supplier: Some("  Hortifruti Central ".to_string()),
            image_url: None,
        }
    }

    #[test]
    fn accepts_valid_outflow() {
        let ok = validate_movement("saida", &RawNumber::from(3.0), None, stock(dec!(10))).unwrap();
        assert_eq!(ok.kind, MovementKind::Saida);
        assert_eq!(ok.quantity.to_string(), "3.00");
        assert_eq!(ok.reason, None);
    }

    #[test]
    fn overdraw_reports_available_stock() {
        let report =
            validate_movement("saida", &RawNumber::from(15.0), None, stock(dec!(10))).unwrap_err();
        let (available, unit) = report.insufficient_stock().unwrap();
        assert_eq!(available.to_string(), "10.00");
        assert_eq!(unit, Unit::Kg);
    }

    #[test]
    fn outflow_of_entire_stock_is_allowed_but_not_a_cent_more() {
        assert!(validate_movement("saida", &RawNumber::from("10"), None, stock(dec!(10))).is_ok());
        let err = validate_movement("saida", &RawNumber::from("10.01"), None, stock(dec!(10)))
            .unwrap_err();
        assert!(err.insufficient_stock().is_some());
    }

    #[test]
    fn waste_needs_a_real_reason() {
        let missing =
            validate_movement("desperdicio", &RawNumber::from(1.0), None, stock(dec!(10)))
                .unwrap_err();
        assert_eq!(missing.errors()[0].violation, Violation::Required);

        let short = validate_movement(
            "desperdicio",
            &RawNumber::from(1.0),
            Some("  abc  "),
            stock(dec!(10)),
        )
        .unwrap_err();
        assert_eq!(short.errors()[0].violation, Violation::TooShort { min: REASON_MIN });

        let ok = validate_movement(
            "desperdicio",
            &RawNumber::from(1.0),
            Some(" Vencido "),
            stock(dec!(10)),
        )
        .unwrap();
        assert_eq!(ok.reason.as_deref(), Some("Vencido"));
    }

    #[test]
    fn collects_every_violation() {
        let long_reason = "x".repeat(REASON_MAX + 1);
        let report = validate_movement(
            "transfer",
            &RawNumber::from("-1.234"),
            Some(&long_reason),
            stock(dec!(10)),
        )
        .unwrap_err();
        assert!(report.has(Field::Kind));
        assert!(report.has(Field::Reason));
        let quantity_errors: Vec<_> = report
            .errors()
            .iter()
            .filter(|e| e.field == Field::Quantity)
            .map(|e| e.violation.clone())
            .collect();
        assert!(quantity_errors.contains(&Violation::MustBePositive));
        assert!(quantity_errors.contains(&Violation::TooManyDecimals));
    }

    #[test]
    fn adjustment_accepts_zero_but_not_negative() {
        assert!(validate_movement("ajuste", &RawNumber::from(0.0), None, stock(dec!(8))).is_ok());
        assert!(validate_movement("ajuste", &RawNumber::from(-1.0), None, stock(dec!(8))).is_err());
        assert!(validate_movement("entrada", &RawNumber::from(0.0), None, stock(dec!(8))).is_err());
    }

    #[test]
    fn rejects_non_numeric_and_oversized() {
        let nan = validate_movement("entrada", &RawNumber::from("abc"), None, stock(dec!(0)))
            .unwrap_err();
        assert_eq!(nan.errors()[0].violation, Violation::NotANumber);

        let big = validate_movement("entrada", &RawNumber::from("1000000"), None, stock(dec!(0)))
            .unwrap_err();
        assert!(big.has(Field::Quantity));

        let overflow =
            validate_movement("entrada", &RawNumber::from("0.02"), None, stock(QUANTITY_MAX))
                .unwrap_err();
        assert_eq!(
            overflow.errors()[0].violation,
            Violation::ResultExceedsMaximum { max: QUANTITY_MAX }
        );
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        assert!(validate_movement("entrada", &RawNumber::from("1.500"), None, stock(dec!(0))).is_ok());
    }

    #[test]
    fn valid_item_produces_trimmed_draft() {
        let (draft, warnings) = validate_item(&item_input()).unwrap();
        assert_eq!(draft.name, "Tomate Italiano");
        assert_eq!(draft.category, Category::Vegetais);
        assert_eq!(draft.supplier.as_deref(), Some("Hortifruti Central"));
        assert!(warnings.warnings().is_empty());
    }

    #[test]
    fn low_initial_quantity_is_only_a_warning() {
        let mut input = item_input();
        input.quantity = RawNumber::from(2.0);
        let (_, report) = validate_item(&input).unwrap();
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].violation, Violation::BelowMinStock);
    }

    #[test]
    fn item_rules() {
        let mut input = item_input();
        input.name = "A".to_string();
        input.category = "armas".to_string();
        input.unit = "KG".to_string();
        input.cost_per_unit = RawNumber::from(0.0);
        input.supplier = Some("s".repeat(SUPPLIER_MAX + 1));
        let report = validate_item(&input).unwrap_err();
        for field in [
            Field::Name,
            Field::Category,
            Field::Unit,
            Field::CostPerUnit,
            Field::Supplier,
        ] {
            assert!(report.has(field), "expected error on {field:?}");
        }
    }

    #[test]
    fn name_charset() {
        let mut input = item_input();
        input.name = "Pão de Açúcar (500g) & Cia.".to_string();
        assert!(validate_item(&input).is_ok());
        input.name = "Queijo <script>".to_string();
        let report = validate_item(&input).unwrap_err();
        assert_eq!(report.errors()[0].violation, Violation::InvalidCharacters);
    }

    #[test]
    fn kg_minimum_must_be_plausible() {
        let mut input = item_input();
        input.min_stock = RawNumber::from(20_000.0);
        input.quantity = RawNumber::from(30_000.0);
        let report = validate_item(&input).unwrap_err();
        assert!(report.has(Field::MinStock));

        input.unit = "unid".to_string();
        assert!(validate_item(&input).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn outflow_is_accepted_iff_stock_covers_it(stock_cents in 0i64..10_000_000, qty_cents in 1i64..10_000_000) {
            let available = Decimal::new(stock_cents, 2);
            let qty = RawNumber::from(Decimal::new(qty_cents, 2));
            let result = validate_movement("saida", &qty, None, stock(available));
            prop_assert_eq!(result.is_ok(), qty_cents <= stock_cents);
        }
    }
}
