use strum::Display;

/// A one-argument math operation
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Display)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum UnaryOpcode {
    Neg,
    Abs,
    Sqrt,
    Cbrt,
    Square,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    #[strum(serialize = "log10")]
    Log10,
    #[strum(serialize = "log2")]
    Log2,
    Floor,
    Ceil,
    Round,
    Sign,
}

impl UnaryOpcode {
    /// Applies the operation to a single value
    #[inline]
    pub fn apply(self, a: f64) -> f64 {
        match self {
            UnaryOpcode::Neg => -a,
            UnaryOpcode::Abs => a.abs(),
            UnaryOpcode::Sqrt => a.sqrt(),
            UnaryOpcode::Cbrt => a.cbrt(),
            UnaryOpcode::Square => a * a,
            UnaryOpcode::Sin => a.sin(),
            UnaryOpcode::Cos => a.cos(),
            UnaryOpcode::Tan => a.tan(),
            UnaryOpcode::Asin => a.asin(),
            UnaryOpcode::Acos => a.acos(),
            UnaryOpcode::Atan => a.atan(),
            UnaryOpcode::Sinh => a.sinh(),
            UnaryOpcode::Cosh => a.cosh(),
            UnaryOpcode::Tanh => a.tanh(),
            UnaryOpcode::Exp => a.exp(),
            UnaryOpcode::Ln => a.ln(),
            UnaryOpcode::Log10 => a.log10(),
            UnaryOpcode::Log2 => a.log2(),
            UnaryOpcode::Floor => a.floor(),
            UnaryOpcode::Ceil => a.ceil(),
            UnaryOpcode::Round => a.round(),
            UnaryOpcode::Sign => {
                if a > 0.0 {
                    1.0
                } else if a < 0.0 {
                    -1.0
                } else {
                    a
                }
            }
        }
    }
}

/// A two-argument math operation
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Display)]
#[strum(serialize_all = "snake_case")]
#[allow(missing_docs)]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mul,
    Div,
    /// Floored modulo; the result takes the sign of the divisor
    Mod,
    Pow,
    Min,
    Max,
    #[strum(serialize = "atan2")]
    Atan2,
}

impl BinaryOpcode {
    /// Applies the operation to a pair of values
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOpcode::Add => a + b,
            BinaryOpcode::Sub => a - b,
            BinaryOpcode::Mul => a * b,
            BinaryOpcode::Div => a / b,
            BinaryOpcode::Mod => a - b * (a / b).floor(),
            BinaryOpcode::Pow => a.powf(b),
            BinaryOpcode::Min => a.min(b),
            BinaryOpcode::Max => a.max(b),
            BinaryOpcode::Atan2 => a.atan2(b),
        }
    }
}
