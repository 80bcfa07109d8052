use quantity1d::math::curve::curve::Curve;
use quantity1d::math::curve::nonparametriccurve::nonparametriccurve::NonparametricCurve;
use quantity1d::math::curve::nonparametriccurve::piecewisepolynomial::InterpolationKind;
use quantity1d::quantity::arithmetic::ArithmeticOperation;
use quantity1d::quantity::quantity::Quantity;
use quantity1d::quantity::quantityerror::QuantityError;

/// Tabulated data that is not a `Quantity` but exposes the same samples.
struct Spectrum {
    energies: Vec<f64>,
    counts: Vec<f64>
}

impl NonparametricCurve for Spectrum {
    fn x(&self) -> &[f64] {
        &self.energies
    }

    fn y(&self) -> &[f64] {
        &self.counts
    }
}

/// A quantity carrying extra data, standing where a subtype would.
struct LabelledQuantity {
    label: &'static str,
    quantity: Quantity
}

impl NonparametricCurve for LabelledQuantity {
    fn x(&self) -> &[f64] {
        self.quantity.x()
    }

    fn y(&self) -> &[f64] {
        self.quantity.y()
    }
}

#[test]
fn add_on_coarser_grid() {
    let a = Quantity::new([0.0, 1.0, 2.0], [0.0, 10.0, 20.0]).unwrap();
    let b = Quantity::new([0.0, 2.0], [5.0, 5.0]).unwrap();
    let sum = (&a + &b).unwrap();
    assert_eq!(sum.x(), &[0.0, 2.0]);
    assert_eq!(sum.y(), &[5.0, 25.0]);
    assert_eq!(sum.to_string(), "Quantity([0.0, 2.0], [5.0, 25.0])");
}

#[test]
fn operands_are_left_untouched() {
    let a = Quantity::new([0.0, 1.0, 2.0], [0.0, 10.0, 20.0]).unwrap();
    let b = Quantity::new([0.0, 2.0], [5.0, 5.0]).unwrap();
    let a_before = a.clone();
    let b_before = b.clone();
    let _ = (&a * &b).unwrap();
    let _ = &a + 1.0;
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn scalar_division_by_zero() {
    let quantity = Quantity::new([1.0, 2.0], [4.0, 9.0]).unwrap();
    let divided = &quantity / 0.0;
    assert_eq!(divided.x(), &[1.0, 2.0]);
    assert!(divided.y().iter().all(|v| *v == f64::INFINITY));

    let with_zero = Quantity::new([1.0, 2.0], [0.0, 9.0]).unwrap() / 0.0;
    assert!(with_zero.y()[0].is_nan());
}

#[test]
fn disjoint_domains_fail() {
    let a = Quantity::new([0.0, 1.0], [1.0, 1.0]).unwrap();
    let b = Quantity::new([5.0, 6.0], [2.0, 2.0]).unwrap();
    for operation in [
        ArithmeticOperation::Add,
        ArithmeticOperation::Sub,
        ArithmeticOperation::Mul,
        ArithmeticOperation::Div,
        ArithmeticOperation::Pow
    ] {
        assert!(matches!(
            a.combine(&b, operation),
            Err(QuantityError::DisjointDomain { .. })
        ));
    }
    assert!((&b - &a).is_err());
}

#[test]
fn subtraction_and_division_reverse() {
    let a = Quantity::new([0.0, 1.0, 2.0], [1.0, 2.0, 4.0]).unwrap();
    let b = Quantity::new([0.0, 1.0, 2.0], [2.0, 2.0, 2.0]).unwrap();
    let forward = (&a - &b).unwrap();
    let backward = (&b - &a).unwrap();
    for (lhs, rhs) in forward.y().iter().zip(backward.y()) {
        assert_eq!(*lhs, -*rhs);
    }

    let ratio = (&a / &b).unwrap();
    let inverse = (&b / &a).unwrap();
    for (lhs, rhs) in ratio.y().iter().zip(inverse.y()) {
        assert!((lhs * rhs - 1.0).abs() < 1e-12);
    }
}

#[test]
fn any_sampled_type_is_an_operand() {
    let quantity = Quantity::new([0.0, 0.75, 1.0, 1.5, 2.0, 3.0], [1.0; 6]).unwrap();
    let spectrum = Spectrum { energies: vec![0.5, 2.5], counts: vec![10.0, 30.0] };

    let scaled = (&quantity * &spectrum).unwrap();
    assert_eq!(scaled.x(), &[0.5, 2.5]);
    assert_eq!(scaled.y(), &[10.0, 30.0]);

    let labelled = LabelledQuantity {
        label: "background",
        quantity: Quantity::new([0.0, 3.0], [0.5, 0.5]).unwrap()
    };
    assert_eq!(labelled.label, "background");
    let corrected = (&quantity - &labelled).unwrap();
    assert_eq!(corrected.x(), &[0.0, 3.0]);
    assert_eq!(corrected.y(), &[0.5, 0.5]);
}

#[test]
fn unordered_operand_gives_sorted_result() {
    let quantity = Quantity::new([0.0, 1.0, 1.5, 2.0, 3.0], [1.0; 5]).unwrap();
    let spectrum = Spectrum { energies: vec![2.5, 0.5], counts: vec![30.0, 10.0] };

    let scaled = (&quantity * &spectrum).unwrap();
    assert_eq!(scaled.x(), &[0.5, 2.5]);
    assert_eq!(scaled.y(), &[10.0, 30.0]);
    assert_eq!(scaled.domain(), (0.5, 2.5));

    // the result must behave as a regular operand afterwards
    let doubled = (&scaled + &scaled).unwrap();
    assert_eq!(doubled.y(), &[20.0, 60.0]);
}

#[test]
fn interpolation_is_reproducible() {
    let quantity = Quantity::new([0.0, 0.3, 1.7, 2.0], [1.0, -2.0, 0.5, 3.0]).unwrap();
    let queries: Vec<f64> = (0..=20).map(|i| i as f64 / 10.0).collect();
    let first = quantity.interpolation(InterpolationKind::Linear).unwrap().values(&queries).unwrap();
    let second = quantity.interpolation(InterpolationKind::Linear).unwrap().values(&queries).unwrap();
    assert_eq!(first, second);
}

#[test]
fn interpolation_rejects_any_point_outside() {
    let quantity = Quantity::new([0.0, 1.0], [0.0, 1.0]).unwrap();
    let interpolation = quantity.interpolation(InterpolationKind::Linear).unwrap();
    let queries = vec![0.5, 1.5];
    assert_eq!(
        interpolation.evaluate(&queries),
        Err(QuantityError::OutOfDomain { point: 1.5, min: 0.0, max: 1.0 })
    );
}
