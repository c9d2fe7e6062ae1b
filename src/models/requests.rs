//! Request DTOs for the calculation API
//!
//! Defines the query parameters accepted by the arithmetic endpoints.

use crate::dispatch::Operation;
use crate::error::ValidationError;

/// Query string of the arithmetic endpoints (`?x=..&y=..`)
///
/// Both operands are kept as raw strings so that a missing value and a
/// malformed one can be reported separately.
#[derive(Debug, Clone, Default)]
pub struct OperandsQuery {
    /// Left operand
    pub x: Option<String>,
    /// Right operand
    pub y: Option<String>,
}

impl OperandsQuery {
    /// Collects the operands from decoded query pairs.
    ///
    /// The first occurrence of a key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "x" => &mut query.x,
                "y" => &mut query.y,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// Parses both operands for `op`.
    ///
    /// Checks run in order: presence of `x`, presence of `y`, integer
    /// syntax, then a non-zero divisor for division.
    pub fn validate(&self, op: Operation) -> Result<(i64, i64), ValidationError> {
        let x = present(&self.x).ok_or(ValidationError::MissingX)?;
        let y = present(&self.y).ok_or(ValidationError::MissingY)?;

        let x = parse_operand(x)?;
        let y = parse_operand(y)?;

        if op == Operation::Divide && y == 0 {
            return Err(ValidationError::DivideByZero);
        }

        Ok((x, y))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_operand(value: &str) -> Result<i64, ValidationError> {
    value.parse().map_err(|_| ValidationError::NotAnInteger)
}
