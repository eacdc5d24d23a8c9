//! Combination operations for bonus amounts.
//!
//! Amounts are folded in a fixed stage order: every `Add` amount is summed
//! onto the base, then the value is scaled by the sum of the
//! `MultiplyBase` amounts, then by the sum of the `MultiplyTotal` amounts.
//! A stage with no amounts leaves the value unchanged.

use crate::codec::Ordinal;
use serde::{Deserialize, Serialize};

/// How a bonus amount combines with the value it modifies.
///
/// # Examples
///
/// ```rust
/// use skilltree::Operation;
///
/// assert_eq!(Operation::MultiplyBase.to_value(), 1);
/// assert_eq!(Operation::from_value(2).unwrap(), Operation::MultiplyTotal);
/// assert!(Operation::from_value(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Summed onto the base value.
    #[serde(rename = "addition")]
    Add,
    /// Scales the value after additions.
    #[serde(rename = "multiply_base")]
    MultiplyBase,
    /// Scales the value last.
    #[serde(rename = "multiply_total")]
    MultiplyTotal,
}

impl Ordinal for Operation {
    const WHAT: &'static str = "operation";
    const VALUES: &'static [Self] = &[
        Operation::Add,
        Operation::MultiplyBase,
        Operation::MultiplyTotal,
    ];

    fn name(self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::MultiplyBase => "multiply_base",
            Operation::MultiplyTotal => "multiply_total",
        }
    }
}

impl Operation {
    /// Wire value of this operation.
    pub fn to_value(self) -> i32 {
        self.ordinal()
    }

    pub fn from_value(value: i32) -> Result<Self, crate::CodecError> {
        Self::from_ordinal(value)
    }
}

/// Fold `(operation, amount)` pairs onto `base`.
///
/// # Examples
///
/// ```rust
/// use skilltree::operation::{apply_operations, Operation};
///
/// let value = apply_operations(
///     100.0,
///     [
///         (Operation::Add, 10.0),
///         (Operation::MultiplyBase, 1.5),
///         (Operation::MultiplyTotal, 2.0),
///     ],
/// );
/// assert_eq!(value, 330.0);
/// ```
pub fn apply_operations<I>(base: f64, modifiers: I) -> f64
where
    I: IntoIterator<Item = (Operation, f64)>,
{
    let mut added = 0.0;
    let mut base_multiplier: Option<f64> = None;
    let mut total_multiplier: Option<f64> = None;

    for (operation, amount) in modifiers {
        match operation {
            Operation::Add => added += amount,
            Operation::MultiplyBase => *base_multiplier.get_or_insert(0.0) += amount,
            Operation::MultiplyTotal => *total_multiplier.get_or_insert(0.0) += amount,
        }
    }

    (base + added) * base_multiplier.unwrap_or(1.0) * total_multiplier.unwrap_or(1.0)
}
