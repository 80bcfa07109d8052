use nalgebra::DVector;

use crate::quantity::quantityerror::QuantityError;

pub trait Curve {
    fn value(&self, x: f64) -> Result<f64, QuantityError>;

    /// Fails on the first point outside the domain.
    fn values(&self, xs: &[f64]) -> Result<Vec<f64>, QuantityError> {
        xs.iter()
            .map(|&x| self.value(x))
            .collect()
    }

    /// Evaluates a single point or a whole vector of points, returning the
    /// same shape that was passed in.
    fn evaluate<Q: CurveQuery>(&self, query: Q) -> Result<Q::Output, QuantityError>
        where Self: Sized {
        query.evaluate_on(self)
    }
}

pub trait CurveQuery {
    type Output;

    fn evaluate_on<C: Curve + ?Sized>(self, curve: &C) -> Result<Self::Output, QuantityError>;
}

impl CurveQuery for f64 {
    type Output = f64;

    fn evaluate_on<C: Curve + ?Sized>(self, curve: &C) -> Result<f64, QuantityError> {
        curve.value(self)
    }
}

impl CurveQuery for &[f64] {
    type Output = Vec<f64>;

    fn evaluate_on<C: Curve + ?Sized>(self, curve: &C) -> Result<Vec<f64>, QuantityError> {
        curve.values(self)
    }
}

impl CurveQuery for &Vec<f64> {
    type Output = Vec<f64>;

    fn evaluate_on<C: Curve + ?Sized>(self, curve: &C) -> Result<Vec<f64>, QuantityError> {
        curve.values(self.as_slice())
    }
}

impl CurveQuery for &DVector<f64> {
    type Output = DVector<f64>;

    fn evaluate_on<C: Curve + ?Sized>(self, curve: &C) -> Result<DVector<f64>, QuantityError> {
        curve.values(self.as_slice()).map(DVector::from_vec)
    }
}
