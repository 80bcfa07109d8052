use std::fmt;

use thiserror::Error;

use crate::math::curve::nonparametriccurve::piecewisepolynomial::InterpolationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y")
        }
    }
}

/// Input data that cannot be stored as a pair of flat, equally long sample arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("incorrect data shape: {axis} has shape {shape:?}, expected a one-dimensional sequence")]
    NotOneDimensional {
        axis: Axis,
        shape: Vec<usize>
    },

    #[error("incorrect data shape: x has {x_len} samples but y has {y_len}")]
    LengthMismatch {
        x_len: usize,
        y_len: usize
    },

    #[error("incorrect data shape: a quantity needs at least one sample")]
    Empty,

    #[error("incorrect data shape: nested sequences have different lengths")]
    Ragged,

    #[error("incorrect data shape: expected a number, found {0}")]
    NonNumeric(String),

    #[error("x contains NaN at position {index}")]
    NotANumber {
        index: usize
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("{point} is outside the interpolation domain [{min}, {max}]")]
    OutOfDomain {
        point: f64,
        min: f64,
        max: f64
    },

    #[error("domains [{lhs_min}, {lhs_max}] and [{rhs_min}, {rhs_max}] do not overlap")]
    DisjointDomain {
        lhs_min: f64,
        lhs_max: f64,
        rhs_min: f64,
        rhs_max: f64
    },

    #[error("{kind} interpolation needs at least {required} points, got {actual}")]
    InsufficientPoints {
        kind: InterpolationKind,
        required: usize,
        actual: usize
    },

    #[error("{kind} interpolation does not accept duplicate sample points")]
    DuplicateSamplePoints {
        kind: InterpolationKind
    },

    #[error("linear system of {kind} interpolation is singular")]
    SingularSystem {
        kind: InterpolationKind
    },

    #[error("unknown interpolation kind '{0}'")]
    UnknownInterpolationKind(String)
}
