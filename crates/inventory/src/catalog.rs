//! Closed vocabularies for item classification.

use serde::{Deserialize, Serialize};

/// Item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Carnes,
    Laticinios,
    Vegetais,
    Frutas,
    Graos,
    Bebidas,
    Temperos,
    Congelados,
    Padaria,
    Limpeza,
    Descartaveis,
    Outros,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Carnes,
        Category::Laticinios,
        Category::Vegetais,
        Category::Frutas,
        Category::Graos,
        Category::Bebidas,
        Category::Temperos,
        Category::Congelados,
        Category::Padaria,
        Category::Limpeza,
        Category::Descartaveis,
        Category::Outros,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Category::Carnes => "carnes",
            Category::Laticinios => "laticinios",
            Category::Vegetais => "vegetais",
            Category::Frutas => "frutas",
            Category::Graos => "graos",
            Category::Bebidas => "bebidas",
            Category::Temperos => "temperos",
            Category::Congelados => "congelados",
            Category::Padaria => "padaria",
            Category::Limpeza => "limpeza",
            Category::Descartaveis => "descartaveis",
            Category::Outros => "outros",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|c| c.code() == s)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// Unit of measure. Codes are case-sensitive (`L` for litre, `ml` for millilitre).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "unid")]
    Unid,
    #[serde(rename = "cx")]
    Cx,
    #[serde(rename = "pct")]
    Pct,
    #[serde(rename = "dz")]
    Dz,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Kg,
        Unit::G,
        Unit::L,
        Unit::Ml,
        Unit::Unid,
        Unit::Cx,
        Unit::Pct,
        Unit::Dz,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::G => "g",
            Unit::L => "L",
            Unit::Ml => "ml",
            Unit::Unid => "unid",
            Unit::Cx => "cx",
            Unit::Pct => "pct",
            Unit::Dz => "dz",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|u| u.code() == s)
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_parse() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.code()), Some(c));
        }
        for u in Unit::ALL {
            assert_eq!(Unit::parse(u.code()), Some(u));
        }
    }

    #[test]
    fn unit_codes_are_case_sensitive() {
        assert_eq!(Unit::parse("L"), Some(Unit::L));
        assert_eq!(Unit::parse("l"), None);
        assert_eq!(Unit::parse("KG"), None);
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Unit::L).unwrap(), "\"L\"");
        assert_eq!(serde_json::to_string(&Category::Graos).unwrap(), "\"graos\"");
    }
}
