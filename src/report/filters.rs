use serde::Serialize;

/// Dimension categories the report endpoint can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    SmartisId,
    Channel,
    Placement,
}

impl FilterCategory {
    /// Numeric category code used on the wire.
    pub const fn code(self) -> u16 {
        match self {
            FilterCategory::SmartisId => 7071,
            FilterCategory::Channel => 1222,
            FilterCategory::Placement => 1223,
        }
    }
}

/// Single filter clause, serialized as `{"category": N, "value": N, "operand": S}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    category: u16,
    value: i64,
    operand: String,
}

impl Filter {
    /// Equality filter on the given category.
    pub fn new(category: FilterCategory, value: i64) -> Self {
        Self::with_operand(category, value, "=")
    }

    /// Filter with an explicit comparison operand.
    pub fn with_operand(category: FilterCategory, value: i64, operand: impl Into<String>) -> Self {
        Self {
            category: category.code(),
            value,
            operand: operand.into(),
        }
    }
}
