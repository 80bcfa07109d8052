use std::fmt;
use std::ops::{
    Add,
    Div,
    Mul,
    Sub
};

use crate::math::curve::nonparametriccurve::nonparametriccurve::NonparametricCurve;
use crate::quantity::quantity::Quantity;
use crate::quantity::quantityerror::QuantityError;

/// Elementwise binary operation. Division by zero and other IEEE edge cases
/// yield inf or NaN, never an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithmeticOperation {
    Add,
    Sub,
    Mul,
    Div,
    Pow
}

impl ArithmeticOperation {
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            ArithmeticOperation::Add => lhs + rhs,
            ArithmeticOperation::Sub => lhs - rhs,
            ArithmeticOperation::Mul => lhs * rhs,
            ArithmeticOperation::Div => lhs / rhs,
            ArithmeticOperation::Pow => lhs.powf(rhs)
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "+",
            ArithmeticOperation::Sub => "-",
            ArithmeticOperation::Mul => "*",
            ArithmeticOperation::Div => "/",
            ArithmeticOperation::Pow => "**"
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// Scalar right-hand sides keep the grid and cannot fail. Any sampled
// right-hand side goes through the common grid and returns a Result.
macro_rules! impl_arithmetic_operation {
    ($trait_name:ident, $method:ident, $operation:expr) => {
        impl $trait_name<f64> for &Quantity {
            type Output = Quantity;

            fn $method(self, rhs: f64) -> Quantity {
                self.apply_scalar(rhs, $operation)
            }
        }

        impl $trait_name<f64> for Quantity {
            type Output = Quantity;

            fn $method(self, rhs: f64) -> Quantity {
                self.apply_scalar(rhs, $operation)
            }
        }

        impl<Q> $trait_name<&Q> for &Quantity
            where Q: NonparametricCurve + ?Sized {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: &Q) -> Self::Output {
                self.combine(rhs, $operation)
            }
        }

        impl<Q> $trait_name<&Q> for Quantity
            where Q: NonparametricCurve + ?Sized {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: &Q) -> Self::Output {
                self.combine(rhs, $operation)
            }
        }

        impl $trait_name<Quantity> for &Quantity {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: Quantity) -> Self::Output {
                self.combine(&rhs, $operation)
            }
        }

        impl $trait_name<Quantity> for Quantity {
            type Output = Result<Quantity, QuantityError>;

            fn $method(self, rhs: Quantity) -> Self::Output {
                self.combine(&rhs, $operation)
            }
        }
    };
}

impl_arithmetic_operation!(Add, add, ArithmeticOperation::Add);
impl_arithmetic_operation!(Sub, sub, ArithmeticOperation::Sub);
impl_arithmetic_operation!(Mul, mul, ArithmeticOperation::Mul);
impl_arithmetic_operation!(Div, div, ArithmeticOperation::Div);
