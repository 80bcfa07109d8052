use std::fmt;

use nalgebra::DVector;
use serde::ser::SerializeStruct;
use serde::{
    Deserialize,
    Serialize,
    Serializer
};

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::NonparametricCurve;
use crate::math::curve::nonparametriccurve::piecewisepolynomial::InterpolationKind;
use crate::quantity::arithmetic::ArithmeticOperation;
use crate::quantity::quantityerror::{
    Axis,
    QuantityError,
    ShapeError
};
use crate::quantity::samples::SampleArray;

/// A one-dimensional quantity given by `(x, y)` sample pairs, sorted by `x`.
///
/// Quantities are never modified after construction. Arithmetic between two
/// quantities evaluates both on a shared grid with linear interpolation and
/// returns a new quantity; arithmetic with a scalar keeps the grid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "QuantityJsonProp")]
pub struct Quantity {
    x: DVector<f64>,
    y: DVector<f64>
}

#[derive(Deserialize)]
struct QuantityJsonProp {
    x: serde_json::Value,
    y: serde_json::Value
}

impl TryFrom<QuantityJsonProp> for Quantity {
    type Error = QuantityError;

    fn try_from(json_prop: QuantityJsonProp) -> Result<Self, Self::Error> {
        let x = SampleArray::from_json(&json_prop.x)?;
        let y = SampleArray::from_json(&json_prop.y)?;
        Quantity::new(x, y)
    }
}

impl Quantity {
    /// Builds a quantity from two one-dimensional, equally long sequences.
    ///
    /// Samples are sorted by `x` with a stable sort, so pairs sharing an `x`
    /// keep their input order.
    ///
    /// # Errors
    ///
    /// `QuantityError::Shape` when either input is not rank-1, the lengths
    /// differ, the input is empty, or `x` contains NaN.
    pub fn new<X, Y>(x: X, y: Y) -> Result<Quantity, QuantityError>
        where X: Into<SampleArray>, Y: Into<SampleArray> {
        let x = x.into().into_vector(Axis::X)?;
        let y = y.into().into_vector(Axis::Y)?;

        if x.len() != y.len() {
            return Err(ShapeError::LengthMismatch { x_len: x.len(), y_len: y.len() }.into());
        }
        if x.is_empty() {
            return Err(ShapeError::Empty.into());
        }
        if let Some(index) = x.iter().position(|v| v.is_nan()) {
            return Err(ShapeError::NotANumber { index }.into());
        }

        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&lhs, &rhs| x[lhs].total_cmp(&x[rhs]));
        let sorted_x: Vec<f64> = order.iter().map(|&i| x[i]).collect();
        let sorted_y: Vec<f64> = order.iter().map(|&i| y[i]).collect();

        tracing::debug!(samples = sorted_x.len(), "quantity constructed");
        Ok(Quantity::from_sorted_parts(sorted_x, sorted_y))
    }

    /// Callers guarantee equal, non-zero lengths and ascending `x`.
    pub(crate) fn from_sorted_parts(x: Vec<f64>, y: Vec<f64>) -> Quantity {
        Quantity {
            x: DVector::from_vec(x),
            y: DVector::from_vec(y)
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Closed interval `[min(x), max(x)]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn value(&self, x: f64) -> Result<f64, QuantityError> {
        self.value_with_kind(x, InterpolationKind::Linear)
    }

    pub fn value_with_kind(&self, x: f64, kind: InterpolationKind) -> Result<f64, QuantityError> {
        self.interpolation(kind)?.value(x)
    }

    /// Shared grid for combining `self` with `other`: the sample points of
    /// the coarser operand inside the overlap of both domains.
    ///
    /// On equal point counts `self`'s points are used. When only one operand
    /// has points inside the overlap, those are used. The grid is empty only
    /// when the domains do not overlap. The grid is ascending even when
    /// `other` lists its samples out of order.
    pub fn common_grid<Q>(&self, other: &Q) -> Vec<f64>
        where Q: NonparametricCurve + ?Sized {
        let lower = self.min_x().max(other.min_x());
        let upper = self.max_x().min(other.max_x());

        let restrict = |xs: &[f64]| -> Vec<f64> {
            xs.iter()
                .copied()
                .filter(|&v| lower <= v && v <= upper)
                .collect()
        };
        let lhs_candidate = restrict(self.x());
        let rhs_candidate = restrict(other.x());

        let use_lhs = if lhs_candidate.is_empty() || rhs_candidate.is_empty() {
            !lhs_candidate.is_empty()
        } else {
            lhs_candidate.len() <= rhs_candidate.len()
        };
        tracing::debug!(
            lower,
            upper,
            lhs_points = lhs_candidate.len(),
            rhs_points = rhs_candidate.len(),
            use_lhs,
            "common grid chosen"
        );
        let mut grid = if use_lhs {
            lhs_candidate
        } else {
            rhs_candidate
        };
        grid.sort_by(f64::total_cmp);
        grid
    }

    /// Applies `operation` pointwise on the common grid, interpolating both
    /// operands linearly.
    ///
    /// # Errors
    ///
    /// `QuantityError::DisjointDomain` when the domains do not overlap, or an
    /// interpolation error raised by `other`.
    pub fn combine<Q>(&self, other: &Q, operation: ArithmeticOperation) -> Result<Quantity, QuantityError>
        where Q: NonparametricCurve + ?Sized {
        let grid = self.common_grid(other);
        if grid.is_empty() {
            let (lhs_min, lhs_max) = self.domain();
            return Err(QuantityError::DisjointDomain {
                lhs_min,
                lhs_max,
                rhs_min: other.min_x(),
                rhs_max: other.max_x()
            });
        }

        let lhs_values = self.interpolation(InterpolationKind::Linear)?.values(&grid)?;
        let rhs_values = other.interpolation(InterpolationKind::Linear)?.values(&grid)?;
        let values: Vec<f64> = lhs_values
            .iter()
            .zip(rhs_values.iter())
            .map(|(&lhs, &rhs)| operation.apply(lhs, rhs))
            .collect();

        tracing::debug!(operation = %operation, grid_points = grid.len(), "quantities combined");
        log_non_finite(&values, operation);
        Ok(Quantity::from_sorted_parts(grid, values))
    }

    /// Applies `operation` to every `y` with `scalar` on the right; `x` is kept.
    pub fn apply_scalar(&self, scalar: f64, operation: ArithmeticOperation) -> Quantity {
        let y = self.y.map(|v| operation.apply(v, scalar));
        log_non_finite(y.as_slice(), operation);
        Quantity {
            x: self.x.clone(),
            y
        }
    }

    pub fn pow<Q>(&self, exponent: &Q) -> Result<Quantity, QuantityError>
        where Q: NonparametricCurve + ?Sized {
        self.combine(exponent, ArithmeticOperation::Pow)
    }

    pub fn powf(&self, exponent: f64) -> Quantity {
        self.apply_scalar(exponent, ArithmeticOperation::Pow)
    }
}

fn log_non_finite(values: &[f64], operation: ArithmeticOperation) {
    let non_finite = values.iter().filter(|v| !v.is_finite()).count();
    if non_finite > 0 {
        tracing::debug!(operation = %operation, non_finite, "arithmetic produced non-finite values");
    }
}

impl NonparametricCurve for Quantity {
    fn x(&self) -> &[f64] {
        self.x.as_slice()
    }

    fn y(&self) -> &[f64] {
        self.y.as_slice()
    }

    fn min_x(&self) -> f64 {
        self.domain().0
    }

    fn max_x(&self) -> f64 {
        self.domain().1
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({:?}, {:?})", self.x.as_slice(), self.y.as_slice())
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
        let mut state = serializer.serialize_struct("Quantity", 2)?;
        state.serialize_field("x", self.x.as_slice())?;
        state.serialize_field("y", self.y.as_slice())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;
    use serde_json::json;

    use super::*;

    #[test]
    fn construction_sorts_pairs_by_x() {
        let quantity = Quantity::new(vec![2.0, 0.0, 1.0], vec![20.0, 0.0, 10.0]).unwrap();
        assert_eq!(quantity.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(quantity.y(), &[0.0, 10.0, 20.0]);
    }

    #[test]
    fn construction_keeps_order_of_equal_x() {
        let quantity = Quantity::new(vec![1.0, 0.0, 1.0], vec![5.0, 0.0, 6.0]).unwrap();
        assert_eq!(quantity.x(), &[0.0, 1.0, 1.0]);
        assert_eq!(quantity.y(), &[0.0, 5.0, 6.0]);
    }

    #[test]
    fn construction_rejects_bad_shapes() {
        let matrix = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(
            Quantity::new(matrix, vec![1.0, 2.0]),
            Err(QuantityError::Shape(ShapeError::NotOneDimensional {
                axis: Axis::X,
                shape: vec![2, 2]
            }))
        );
        assert_eq!(
            Quantity::new(vec![0.0, 1.0], vec![1.0]),
            Err(QuantityError::Shape(ShapeError::LengthMismatch { x_len: 2, y_len: 1 }))
        );
        assert_eq!(
            Quantity::new(Vec::<f64>::new(), Vec::<f64>::new()),
            Err(QuantityError::Shape(ShapeError::Empty))
        );
        assert_eq!(
            Quantity::new(vec![0.0, f64::NAN], vec![1.0, 2.0]),
            Err(QuantityError::Shape(ShapeError::NotANumber { index: 1 }))
        );
        assert!(Quantity::new(3.0_f64, vec![1.0]).is_err());
    }

    #[test]
    fn value_on_and_between_samples() {
        let quantity = Quantity::new([0.0, 1.0, 2.0], [0.0, 10.0, 20.0]).unwrap();
        assert_eq!(quantity.value(1.0).unwrap(), 10.0);
        assert_eq!(quantity.value(2.0).unwrap(), 20.0);
        assert!((quantity.value(0.25).unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(
            quantity.value(2.5),
            Err(QuantityError::OutOfDomain { point: 2.5, min: 0.0, max: 2.0 })
        );
    }

    #[test]
    fn value_with_other_kinds() {
        let quantity = Quantity::new([0.0, 1.0, 2.0], [0.0, 1.0, 0.0]).unwrap();
        assert_eq!(quantity.value_with_kind(0.9, InterpolationKind::Previous).unwrap(), 0.0);
        assert_eq!(quantity.value_with_kind(0.9, InterpolationKind::Nearest).unwrap(), 1.0);
        assert!(quantity.value_with_kind(0.5, InterpolationKind::NaturalCubic).unwrap() > 0.5);
    }

    #[test]
    fn common_grid_prefers_coarser_operand() {
        let a = Quantity::new([0.0, 1.0, 2.0], [0.0, 10.0, 20.0]).unwrap();
        let b = Quantity::new([0.0, 2.0], [5.0, 5.0]).unwrap();
        assert_eq!(a.common_grid(&b), vec![0.0, 2.0]);
        assert_eq!(b.common_grid(&a), vec![0.0, 2.0]);
    }

    #[test]
    fn common_grid_is_restricted_to_overlap() {
        let a = Quantity::new([0.0, 1.0, 2.0, 3.0, 4.0], [0.0; 5]).unwrap();
        let b = Quantity::new([1.5, 2.5, 3.5, 5.0], [0.0; 4]).unwrap();
        // overlap [1.5, 4]: a gives [2, 3, 4], b gives [1.5, 2.5, 3.5]
        assert_eq!(a.common_grid(&b), vec![2.0, 3.0, 4.0]);
        assert_eq!(b.common_grid(&a), vec![1.5, 2.5, 3.5]);
    }

    struct Table {
        x: Vec<f64>,
        y: Vec<f64>
    }

    impl NonparametricCurve for Table {
        fn x(&self) -> &[f64] {
            &self.x
        }

        fn y(&self) -> &[f64] {
            &self.y
        }
    }

    #[test]
    fn common_grid_is_ascending_for_unordered_operand() {
        let quantity = Quantity::new([0.0, 1.0, 1.5, 2.0, 2.25, 3.0], [1.0; 6]).unwrap();
        let table = Table { x: vec![2.5, 0.5, 1.25], y: vec![30.0, 10.0, 20.0] };
        assert_eq!(quantity.common_grid(&table), vec![0.5, 1.25, 2.5]);
    }

    #[test]
    fn common_grid_skips_an_operand_without_points_in_overlap() {
        let wide = Quantity::new([0.0, 10.0], [0.0, 10.0]).unwrap();
        let narrow = Quantity::new([2.0, 3.0, 4.0], [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(wide.common_grid(&narrow), vec![2.0, 3.0, 4.0]);
        let sum = (&wide + &narrow).unwrap();
        assert_eq!(sum.x(), &[2.0, 3.0, 4.0]);
        assert_eq!(sum.y(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn combine_reports_disjoint_domains() {
        let a = Quantity::new([0.0, 1.0], [1.0, 1.0]).unwrap();
        let b = Quantity::new([5.0, 6.0], [2.0, 2.0]).unwrap();
        assert!(a.common_grid(&b).is_empty());
        assert_eq!(
            a.combine(&b, ArithmeticOperation::Add),
            Err(QuantityError::DisjointDomain {
                lhs_min: 0.0,
                lhs_max: 1.0,
                rhs_min: 5.0,
                rhs_max: 6.0
            })
        );
    }

    #[test]
    fn touching_domains_share_one_point() {
        let a = Quantity::new([0.0, 1.0], [1.0, 3.0]).unwrap();
        let b = Quantity::new([1.0, 2.0], [2.0, 0.0]).unwrap();
        let product = (&a * &b).unwrap();
        assert_eq!(product.x(), &[1.0]);
        assert_eq!(product.y(), &[6.0]);
    }

    #[test]
    fn scalar_operations_keep_grid() {
        let quantity = Quantity::new([1.0, 2.0], [4.0, 9.0]).unwrap();
        let squared_root = quantity.powf(0.5);
        assert_eq!(squared_root.x(), quantity.x());
        assert_eq!(squared_root.y(), &[2.0, 3.0]);
        assert_eq!(quantity.len(), 2);
        assert_eq!(quantity.domain(), (1.0, 2.0));
    }

    #[test]
    fn pow_between_quantities() {
        let base = Quantity::new([0.0, 1.0, 2.0], [2.0, 2.0, 2.0]).unwrap();
        let exponent = Quantity::new([0.0, 2.0], [1.0, 3.0]).unwrap();
        let result = base.pow(&exponent).unwrap();
        assert_eq!(result.x(), &[0.0, 2.0]);
        assert_eq!(result.y(), &[2.0, 8.0]);
    }

    #[test]
    fn display_lists_samples() {
        let quantity = Quantity::new([1.0, 0.0], [3.5, 2.0]).unwrap();
        assert_eq!(quantity.to_string(), "Quantity([0.0, 1.0], [2.0, 3.5])");
    }

    #[test]
    fn serde_validates_like_new() {
        let quantity: Quantity = serde_json::from_value(json!({"x": [1.0, 0.0], "y": [1.0, 0.0]})).unwrap();
        assert_eq!(quantity.x(), &[0.0, 1.0]);
        assert_eq!(
            serde_json::to_value(&quantity).unwrap(),
            json!({"x": [0.0, 1.0], "y": [0.0, 1.0]})
        );

        let nested = serde_json::from_value::<Quantity>(json!({"x": [[0.0, 1.0]], "y": [0.0, 1.0]}));
        assert!(nested.is_err());
    }
}
