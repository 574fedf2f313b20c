use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

/// The four arithmetic operators the evaluator names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mult, BinaryOp::Div];

    /// Applies the operator with `T`'s native arithmetic, traps included.
    pub fn apply<T>(self, x: T, y: T) -> T
    where
        T: Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>,
    {
        match self {
            BinaryOp::Add => x + y,
            BinaryOp::Sub => x - y,
            BinaryOp::Mult => x * y,
            BinaryOp::Div => x / y,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mult => "mult",
            BinaryOp::Div => "div",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mult => '*',
            BinaryOp::Div => '/',
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOp(pub String);

impl fmt::Display for UnknownOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operator '{}' (expected add, sub, mult or div)", self.0)
    }
}

impl std::error::Error for UnknownOp {}

impl FromStr for BinaryOp {
    type Err = UnknownOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(BinaryOp::Add),
            "sub" | "-" => Ok(BinaryOp::Sub),
            "mult" | "mul" | "*" => Ok(BinaryOp::Mult),
            "div" | "/" => Ok(BinaryOp::Div),
            other => Err(UnknownOp(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_integers() {
        assert_eq!(BinaryOp::Add.apply(7, 3), 10);
        assert_eq!(BinaryOp::Sub.apply(7, 3), 4);
        assert_eq!(BinaryOp::Mult.apply(7, 3), 21);
        assert_eq!(BinaryOp::Div.apply(7, 3), 2);
    }

    #[test]
    fn test_float_division_by_zero_is_ieee() {
        assert_eq!(BinaryOp::Div.apply(1.0_f64, 0.0), f64::INFINITY);
        assert!(BinaryOp::Div.apply(0.0_f64, 0.0).is_nan());
    }

    #[test]
    fn test_parse_names_and_symbols() {
        for op in BinaryOp::ALL {
            assert_eq!(op.name().parse::<BinaryOp>(), Ok(op));
            assert_eq!(op.symbol().to_string().parse::<BinaryOp>(), Ok(op));
        }
        assert_eq!(" MULT ".parse::<BinaryOp>(), Ok(BinaryOp::Mult));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "pow".parse::<BinaryOp>().unwrap_err();
        assert_eq!(err, UnknownOp("pow".to_string()));
        assert!(err.to_string().contains("pow"));
    }
}
