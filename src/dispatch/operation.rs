//! Arithmetic operations and cache key derivation.

/// The fixed set of cacheable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// Every supported operation.
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Short name used as the cache key prefix.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "sub",
            Operation::Multiply => "mul",
            Operation::Divide => "div",
        }
    }

    /// Name reported back to HTTP clients.
    pub fn action(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Looks up an operation by its short name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether operand order leaves the result unchanged.
    pub fn is_commutative(self) -> bool {
        matches!(self, Operation::Add | Operation::Multiply)
    }

    /// Computes `x <op> y`.
    ///
    /// Overflow wraps. Division truncates toward zero, so `-7 / 2 == -3`.
    ///
    /// # Panics
    /// Panics on division by zero; callers validate the divisor first.
    pub fn apply(self, x: i64, y: i64) -> i64 {
        match self {
            Operation::Add => x.wrapping_add(y),
            Operation::Subtract => x.wrapping_sub(y),
            Operation::Multiply => x.wrapping_mul(y),
            Operation::Divide => x.wrapping_div(y),
        }
    }
}

/// Builds the cache key `"<name>:<x>:<y>"`.
///
/// Operands of commutative operations are sorted ascending first, so
/// `1 + 2` and `2 + 1` share the key `add:1:2`.
pub fn cache_key(op: Operation, x: i64, y: i64) -> String {
    let (a, b) = if op.is_commutative() && x > y {
        (y, x)
    } else {
        (x, y)
    };
    format!("{}:{}:{}", op.name(), a, b)
}
