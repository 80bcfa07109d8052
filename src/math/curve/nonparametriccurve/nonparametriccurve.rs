use crate::math::curve::nonparametriccurve::piecewisepolynomial::{
    InterpolationKind,
    PiecewisePolynomial
};
use crate::quantity::quantityerror::QuantityError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn slope(lhs_pt: &Point2D, rhs_pt: &Point2D) -> f64 {
        (rhs_pt.y - lhs_pt.y) / (rhs_pt.x - lhs_pt.x)
    }
}

/// Anything sampled at discrete points that can be interpolated between them.
///
/// Arithmetic on `Quantity` accepts any implementor as the right-hand
/// operand, so wrappers and other sampled types combine with quantities
/// without going through a concrete type.
pub trait NonparametricCurve {
    /// Sample positions in ascending order.
    fn x(&self) -> &[f64];

    /// Sample values, paired positionally with `x()`.
    fn y(&self) -> &[f64];

    /// `+inf` when there are no samples.
    fn min_x(&self) -> f64 {
        self.x().iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// `-inf` when there are no samples.
    fn max_x(&self) -> f64 {
        self.x().iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    fn points(&self) -> Vec<Point2D> {
        self.x()
            .iter()
            .zip(self.y())
            .map(|(&x, &y)| Point2D::new(x, y))
            .collect()
    }

    fn interpolation(&self, kind: InterpolationKind) -> Result<PiecewisePolynomial, QuantityError> {
        PiecewisePolynomial::new(kind, self.points())
    }
}
