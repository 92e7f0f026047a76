use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockroom_core::{DomainError, DomainResult, Entity, ItemId, MovementId, two_places};

/// The four ways stock can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Inflow (restock).
    Entrada,
    /// Outflow (consumption).
    Saida,
    /// Outflow recorded as waste.
    Desperdicio,
    /// Absolute set.
    Ajuste,
}

impl MovementKind {
    pub const ALL: [MovementKind; 4] = [
        MovementKind::Entrada,
        MovementKind::Saida,
        MovementKind::Desperdicio,
        MovementKind::Ajuste,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MovementKind::Entrada => "entrada",
            MovementKind::Saida => "saida",
            MovementKind::Desperdicio => "desperdicio",
            MovementKind::Ajuste => "ajuste",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|k| k.code() == s)
    }

    pub fn is_outflow(self) -> bool {
        matches!(self, MovementKind::Saida | MovementKind::Desperdicio)
    }

    /// Stock after applying `quantity` of this kind to `previous`.
    ///
    /// Outflows floor at zero; validation rejects overdraws before this is reached.
    pub fn resulting_quantity(self, previous: Decimal, quantity: Decimal) -> Decimal {
        let next = match self {
            MovementKind::Entrada => previous + quantity,
            MovementKind::Saida | MovementKind::Desperdicio => {
                (previous - quantity).max(Decimal::ZERO)
            }
            MovementKind::Ajuste => quantity,
        };
        two_places(next)
    }

    /// Monetary value of the movement. Only outflows carry a cost.
    pub fn cost(self, quantity: Decimal, cost_per_unit: Decimal) -> Decimal {
        match self {
            MovementKind::Saida | MovementKind::Desperdicio => two_places(quantity * cost_per_unit),
            MovementKind::Entrada | MovementKind::Ajuste => two_places(Decimal::ZERO),
        }
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Immutable ledger entry. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    /// May dangle after the item is deleted.
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub reason: Option<String>,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// `new_quantity - previous_quantity`.
    pub fn delta(&self) -> Decimal {
        self.new_quantity - self.previous_quantity
    }

    /// Check the entry is internally consistent with the transition function.
    pub fn verify(&self) -> DomainResult<()> {
        if self.previous_quantity < Decimal::ZERO || self.new_quantity < Decimal::ZERO {
            return Err(DomainError::invariant("movement quantities must be >= 0"));
        }
        let expected = self.kind.resulting_quantity(self.previous_quantity, self.quantity);
        if expected != self.new_quantity {
            return Err(DomainError::invariant(format!(
                "movement {} records new_quantity {} but {} of {} from {} yields {}",
                self.id, self.new_quantity, self.kind, self.quantity, self.previous_quantity, expected
            )));
        }
        if !self.kind.is_outflow() && !self.cost.is_zero() {
            return Err(DomainError::invariant("only outflows carry a cost"));
        }
        Ok(())
    }
}

impl Entity for StockMovement {
    type Id = MovementId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn test_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn movement(kind: MovementKind, qty: Decimal, prev: Decimal, new: Decimal) -> StockMovement {
        StockMovement {
            id: MovementId::new(),
            item_id: ItemId::new(),
            kind,
            quantity: qty,
            previous_quantity: prev,
            new_quantity: new,
            reason: None,
            cost: kind.cost(qty, dec!(1)),
            created_at: test_time(),
        }
    }

    #[test]
    fn transition_function() {
        assert_eq!(MovementKind::Entrada.resulting_quantity(dec!(10), dec!(5)), dec!(15));
        assert_eq!(MovementKind::Saida.resulting_quantity(dec!(10), dec!(10)), dec!(0));
        assert_eq!(MovementKind::Desperdicio.resulting_quantity(dec!(10), dec!(3)), dec!(7));
        assert_eq!(MovementKind::Ajuste.resulting_quantity(dec!(8), dec!(0)), dec!(0));
        // floor guard
        assert_eq!(MovementKind::Saida.resulting_quantity(dec!(1), dec!(2)), dec!(0));
    }

    #[test]
    fn only_outflows_have_cost() {
        assert_eq!(MovementKind::Desperdicio.cost(dec!(3), dec!(5.00)), dec!(15.00));
        assert_eq!(MovementKind::Saida.cost(dec!(0.333), dec!(3)), dec!(1.00));
        assert!(MovementKind::Entrada.cost(dec!(3), dec!(5)).is_zero());
        assert!(MovementKind::Ajuste.cost(dec!(3), dec!(5)).is_zero());
    }

    #[test]
    fn verify_rejects_inconsistent_entries() {
        assert!(movement(MovementKind::Saida, dec!(3), dec!(10), dec!(7)).verify().is_ok());
        assert!(movement(MovementKind::Saida, dec!(3), dec!(10), dec!(8)).verify().is_err());

        let mut bad_cost = movement(MovementKind::Entrada, dec!(3), dec!(10), dec!(13));
        bad_cost.cost = dec!(1);
        assert!(bad_cost.verify().is_err());
    }

    #[test]
    fn kind_serializes_as_code() {
        let json = serde_json::to_string(&MovementKind::Desperdicio).unwrap();
        assert_eq!(json, "\"desperdicio\"");
        assert_eq!(MovementKind::parse(" ajuste "), Some(MovementKind::Ajuste));
        assert_eq!(MovementKind::parse("transfer"), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn saida_then_entrada_restores_stock(prev in 0i64..100_000_000, take in 1i64..100_000_000) {
            prop_assume!(take <= prev);
            let prev = Decimal::new(prev, 2);
            let take = Decimal::new(take, 2);
            let after_out = MovementKind::Saida.resulting_quantity(prev, take);
            let back = MovementKind::Entrada.resulting_quantity(after_out, take);
            prop_assert_eq!(back, prev);
        }

        #[test]
        fn results_are_never_negative(prev in 0i64..100_000_000, qty in 0i64..100_000_000) {
            let prev = Decimal::new(prev, 2);
            let qty = Decimal::new(qty, 2);
            for kind in MovementKind::ALL {
                prop_assert!(kind.resulting_quantity(prev, qty) >= Decimal::ZERO);
            }
        }
    }
}
