//! User-visible text in the deployment locale.

use rust_decimal::Decimal;
use stockroom_core::{Locale, two_places};

use crate::catalog::Unit;
use crate::validation::{Field, FieldError, Violation};

const MONTHS_PT: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Renders messages for one locale and currency symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localizer {
    locale: Locale,
    currency: String,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Locale::PtBr, "R$")
    }
}

fn amount(value: Decimal) -> String {
    two_places(value).to_string()
}

fn signed(value: Decimal) -> String {
    if value.is_sign_negative() && !value.is_zero() {
        amount(value)
    } else {
        format!("+{}", amount(value))
    }
}

impl Localizer {
    pub fn new(locale: Locale, currency: impl Into<String>) -> Self {
        Self {
            locale,
            currency: currency.into(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn money(&self, value: Decimal) -> String {
        format!("{} {}", self.currency, amount(value))
    }

    /// Month abbreviation for a 1-based month number.
    pub fn month_abbrev(&self, month: u32) -> &'static str {
        let table = match self.locale {
            Locale::PtBr => &MONTHS_PT,
            Locale::En => &MONTHS_EN,
        };
        let idx = (month.clamp(1, 12) - 1) as usize;
        table[idx]
    }

    pub fn violation(&self, error: &FieldError) -> String {
        match self.locale {
            Locale::PtBr => violation_pt(error),
            Locale::En => violation_en(error),
        }
    }

    pub fn movement_description(
        &self,
        item_name: &str,
        previous: Decimal,
        new: Decimal,
        unit: Unit,
        reason: Option<&str>,
    ) -> String {
        let base = format!("{item_name}: {} → {} {unit}", amount(previous), amount(new));
        match reason {
            Some(r) if !r.is_empty() => format!("{base} ({r})"),
            _ => base,
        }
    }

    pub fn low_stock_title(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Estoque Baixo",
            Locale::En => "Low Stock",
        }
    }

    pub fn critical_stock_title(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Estoque Crítico!",
            Locale::En => "Critical Stock!",
        }
    }

    pub fn stock_alert_message(
        &self,
        item_name: &str,
        quantity: Decimal,
        min_stock: Decimal,
        unit: Unit,
    ) -> String {
        let min_label = match self.locale {
            Locale::PtBr => "mínimo",
            Locale::En => "minimum",
        };
        format!(
            "{item_name}: {} {unit} ({min_label}: {} {unit})",
            amount(quantity),
            amount(min_stock)
        )
    }

    pub fn waste_title(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Desperdício Registrado",
            Locale::En => "Waste Recorded",
        }
    }

    pub fn waste_message(
        &self,
        item_name: &str,
        quantity: Decimal,
        unit: Unit,
        cost: Decimal,
        reason: &str,
    ) -> String {
        format!(
            "{item_name}: {} {unit} - {} ({reason})",
            amount(quantity),
            self.money(cost)
        )
    }

    pub fn item_added(&self, item_name: &str) -> String {
        match self.locale {
            Locale::PtBr => format!("Item adicionado: {item_name}"),
            Locale::En => format!("Item added: {item_name}"),
        }
    }

    pub fn item_updated(&self, item_name: &str) -> String {
        match self.locale {
            Locale::PtBr => format!("Item atualizado: {item_name}"),
            Locale::En => format!("Item updated: {item_name}"),
        }
    }

    pub fn stock_adjusted(&self, item_name: &str, difference: Decimal, unit: Unit) -> String {
        match self.locale {
            Locale::PtBr => format!("Estoque ajustado: {item_name} ({} {unit})", signed(difference)),
            Locale::En => format!("Stock adjusted: {item_name} ({} {unit})", signed(difference)),
        }
    }

    pub fn item_removed(&self, item_name: &str, movement_count: u64) -> String {
        match self.locale {
            Locale::PtBr => format!(
                "Item removido: {item_name} ({movement_count} movimentações no histórico)"
            ),
            Locale::En => {
                format!("Item removed: {item_name} ({movement_count} movements in history)")
            }
        }
    }

    /// Display name for ledger rows whose item no longer exists.
    pub fn removed_item_name(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Item removido",
            Locale::En => "Removed item",
        }
    }

    pub fn initial_stock_reason(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Estoque inicial",
            Locale::En => "Initial stock",
        }
    }

    pub fn validation_failed(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Dados inválidos",
            Locale::En => "Invalid data",
        }
    }

    pub fn not_found(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Item não encontrado",
            Locale::En => "Item not found",
        }
    }

    pub fn notification_not_found(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Notificação não encontrada",
            Locale::En => "Notification not found",
        }
    }

    pub fn stale_write(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "O estoque foi alterado por outra operação. Tente novamente.",
            Locale::En => "Stock was changed by another operation. Please try again.",
        }
    }

    pub fn duplicate_name(&self, item_name: &str) -> String {
        match self.locale {
            Locale::PtBr => format!("Já existe um item com o nome \"{item_name}\""),
            Locale::En => format!("An item named \"{item_name}\" already exists"),
        }
    }

    /// Generic failure text; backend details are never shown to users.
    pub fn operation_failed(&self) -> &'static str {
        match self.locale {
            Locale::PtBr => "Não foi possível concluir a operação. Tente novamente.",
            Locale::En => "The operation could not be completed. Please try again.",
        }
    }
}

fn violation_pt(error: &FieldError) -> String {
    match (&error.field, &error.violation) {
        (Field::Kind, _) => "Tipo de movimentação inválido".to_string(),
        (Field::Reason, Violation::Required) => {
            "Motivo é obrigatório para registro de desperdício".to_string()
        }
        (Field::Reason, Violation::TooShort { min }) => {
            format!("Descreva o motivo com mais detalhes (mínimo {min} caracteres)")
        }
        (Field::Reason, Violation::TooLong { max }) => {
            format!("Motivo deve ter no máximo {max} caracteres")
        }
        (Field::Name, Violation::Required) => "Nome do item é obrigatório".to_string(),
        (Field::Name, Violation::TooShort { min }) => {
            format!("Nome deve ter pelo menos {min} caracteres")
        }
        (Field::Name, Violation::TooLong { max }) => {
            format!("Nome deve ter no máximo {max} caracteres")
        }
        (Field::Name, Violation::InvalidCharacters) => "Nome contém caracteres inválidos".to_string(),
        (Field::Category, Violation::Required) => "Categoria é obrigatória".to_string(),
        (Field::Category, _) => "Categoria inválida".to_string(),
        (Field::Unit, Violation::Required) => "Unidade é obrigatória".to_string(),
        (Field::Unit, _) => "Unidade inválida".to_string(),
        (Field::Supplier, Violation::TooLong { max }) => {
            format!("Fornecedor deve ter no máximo {max} caracteres")
        }
        (_, Violation::NotANumber) => "Valor deve ser um número válido".to_string(),
        (_, Violation::MustBePositive) => "Valor deve ser maior que zero".to_string(),
        (_, Violation::MustNotBeNegative) => "Valor não pode ser negativo".to_string(),
        (_, Violation::TooManyDecimals) => "Máximo de 2 casas decimais permitidas".to_string(),
        (_, Violation::ExceedsMaximum { max }) => format!("Valor máximo permitido: {max}"),
        (_, Violation::BelowMinimum { min }) => format!("Valor mínimo permitido: {min}"),
        (_, Violation::InsufficientStock { available, unit }) => format!(
            "Quantidade insuficiente. Estoque disponível: {} {unit}",
            amount(*available)
        ),
        (_, Violation::ResultExceedsMaximum { max }) => {
            format!("Estoque resultante excederia o máximo permitido ({max})")
        }
        (_, Violation::ImplausibleForUnit { max, unit }) => {
            format!("Estoque mínimo muito alto para {unit} (máximo {max})")
        }
        (_, Violation::NotBelowCritical) => {
            "Limite seguro deve ser menor que o limite crítico".to_string()
        }
        (_, Violation::BelowMinStock) => {
            "Quantidade está abaixo ou igual ao estoque mínimo".to_string()
        }
        (_, Violation::Required) => "Campo obrigatório".to_string(),
        (_, Violation::UnknownValue) => "Valor inválido".to_string(),
        (_, Violation::TooShort { min }) => format!("Mínimo de {min} caracteres"),
        (_, Violation::TooLong { max }) => format!("Máximo de {max} caracteres"),
        (_, Violation::InvalidCharacters) => "Caracteres inválidos".to_string(),
    }
}

fn violation_en(error: &FieldError) -> String {
    match (&error.field, &error.violation) {
        (Field::Kind, _) => "Invalid movement type".to_string(),
        (Field::Reason, Violation::Required) => "A reason is required to record waste".to_string(),
        (Field::Reason, Violation::TooShort { min }) => {
            format!("Describe the reason in more detail (at least {min} characters)")
        }
        (Field::Reason, Violation::TooLong { max }) => {
            format!("Reason must be at most {max} characters")
        }
        (Field::Name, Violation::Required) => "Item name is required".to_string(),
        (Field::Name, Violation::TooShort { min }) => {
            format!("Name must be at least {min} characters")
        }
        (Field::Name, Violation::TooLong { max }) => format!("Name must be at most {max} characters"),
        (Field::Name, Violation::InvalidCharacters) => "Name contains invalid characters".to_string(),
        (Field::Category, Violation::Required) => "Category is required".to_string(),
        (Field::Category, _) => "Invalid category".to_string(),
        (Field::Unit, Violation::Required) => "Unit is required".to_string(),
        (Field::Unit, _) => "Invalid unit".to_string(),
        (Field::Supplier, Violation::TooLong { max }) => {
            format!("Supplier must be at most {max} characters")
        }
        (_, Violation::NotANumber) => "Value must be a valid number".to_string(),
        (_, Violation::MustBePositive) => "Value must be greater than zero".to_string(),
        (_, Violation::MustNotBeNegative) => "Value cannot be negative".to_string(),
        (_, Violation::TooManyDecimals) => "At most 2 decimal places are allowed".to_string(),
        (_, Violation::ExceedsMaximum { max }) => format!("Maximum allowed value: {max}"),
        (_, Violation::BelowMinimum { min }) => format!("Minimum allowed value: {min}"),
        (_, Violation::InsufficientStock { available, unit }) => format!(
            "Insufficient quantity. Available stock: {} {unit}",
            amount(*available)
        ),
        (_, Violation::ResultExceedsMaximum { max }) => {
            format!("Resulting stock would exceed the maximum allowed ({max})")
        }
        (_, Violation::ImplausibleForUnit { max, unit }) => {
            format!("Minimum stock too high for {unit} (maximum {max})")
        }
        (_, Violation::NotBelowCritical) => {
            "Safe threshold must be lower than the critical threshold".to_string()
        }
        (_, Violation::BelowMinStock) => "Quantity is at or below the minimum stock".to_string(),
        (_, Violation::Required) => "Field is required".to_string(),
        (_, Violation::UnknownValue) => "Invalid value".to_string(),
        (_, Violation::TooShort { min }) => format!("At least {min} characters"),
        (_, Violation::TooLong { max }) => format!("At most {max} characters"),
        (_, Violation::InvalidCharacters) => "Invalid characters".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn insufficient_stock_message_cites_available() {
        let texts = Localizer::default();
        let error = FieldError::new(
            Field::Quantity,
            Violation::InsufficientStock {
                available: dec!(10),
                unit: Unit::Kg,
            },
        );
        assert_eq!(
            texts.violation(&error),
            "Quantidade insuficiente. Estoque disponível: 10.00 kg"
        );
    }

    #[test]
    fn movement_description_formats_two_places() {
        let texts = Localizer::default();
        assert_eq!(
            texts.movement_description("Tomate", dec!(10), dec!(7), Unit::Kg, Some("Vencido")),
            "Tomate: 10.00 → 7.00 kg (Vencido)"
        );
        assert_eq!(
            texts.movement_description("Leite", dec!(2), dec!(5.5), Unit::L, None),
            "Leite: 2.00 → 5.50 L"
        );
    }

    #[test]
    fn adjustments_are_signed() {
        let texts = Localizer::default();
        assert_eq!(
            texts.stock_adjusted("Tomate", dec!(2), Unit::Kg),
            "Estoque ajustado: Tomate (+2.00 kg)"
        );
        assert_eq!(
            texts.stock_adjusted("Tomate", dec!(-1.5), Unit::Kg),
            "Estoque ajustado: Tomate (-1.50 kg)"
        );
    }

    #[test]
    fn months_and_money() {
        let pt = Localizer::default();
        let en = Localizer::new(Locale::En, "$");
        assert_eq!(pt.month_abbrev(2), "Fev");
        assert_eq!(en.month_abbrev(2), "Feb");
        assert_eq!(pt.money(dec!(15)), "R$ 15.00");
        assert_eq!(en.money(dec!(0.5)), "$ 0.50");
    }
}
