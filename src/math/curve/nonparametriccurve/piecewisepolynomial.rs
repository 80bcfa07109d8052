use std::fmt;
use std::str::FromStr;

use nalgebra::{
    DMatrix,
    DVector
};
use serde::{
    Deserialize,
    Serialize
};

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::quantity::quantityerror::QuantityError;

// ─────────────────────────────────────────────
// Subpolynomial
// ─────────────────────────────────────────────

struct Subpolynomial {
    coefs: Vec<f64>,
    lhs_x: f64
}

impl Subpolynomial {
    fn new(coefs: Vec<f64>, lhs_x: f64) -> Subpolynomial {
        Subpolynomial { coefs, lhs_x }
    }

    /// Horner form in (x - lhs_x), highest order first.
    fn value(&self, x: f64) -> f64 {
        let x_diff = x - self.lhs_x;
        let mut result = self.coefs[0];
        for &beta in &self.coefs[1..] {
            result = f64::mul_add(result, x_diff, beta);
        }
        result
    }
}

// ─────────────────────────────────────────────
// Flat / Linear
// ─────────────────────────────────────────────

fn generate_forward_flat_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    points[..points.len().saturating_sub(1)]
        .iter()
        .map(|pt| vec![pt.y()])
        .collect()
}

fn generate_backward_flat_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    points[1.min(points.len())..]
        .iter()
        .map(|pt| vec![pt.y()])
        .collect()
}

// Zero-width segments between duplicate x get an infinite slope. They are
// never evaluated because a query equal to a knot is answered by the knot.
fn generate_linear_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    points
        .windows(2)
        .map(|pair| vec![Point2D::slope(&pair[0], &pair[1]), pair[0].y()])
        .collect()
}

// ─────────────────────────────────────────────
// Cubic helpers
// ─────────────────────────────────────────────

fn segment_widths(points: &[Point2D]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| pair[1].x() - pair[0].x())
        .collect()
}

/// Coefficients from the second derivatives `m[0..=n]` at the knots, stored
/// as [d, c, b, a] for a + b*(x-x_i) + c*(x-x_i)^2 + d*(x-x_i)^3.
fn cubic_coefs_from_moments(points: &[Point2D], h: &[f64], m: &[f64]) -> Vec<Vec<f64>> {
    (0..h.len())
        .map(|i| {
            let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
            let c = m[i] / 2.0;
            let b = (points[i + 1].y() - points[i].y()) / h[i]
                  - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
            let a = points[i].y();
            vec![d, c, b, a]
        })
        .collect()
}

/// Same layout as `cubic_coefs_from_moments`, from first derivatives `t[0..=n]`.
fn cubic_coefs_from_hermite(points: &[Point2D], h: &[f64], t: &[f64]) -> Vec<Vec<f64>> {
    (0..h.len())
        .map(|i| {
            let dy = points[i + 1].y() - points[i].y();
            let a = points[i].y();
            let b = t[i];
            let c = (3.0 * dy / h[i] - 2.0 * t[i] - t[i + 1]) / h[i];
            let d = (-2.0 * dy / h[i] + t[i] + t[i + 1]) / (h[i] * h[i]);
            vec![d, c, b, a]
        })
        .collect()
}

// ─────────────────────────────────────────────
// Natural cubic spline
// ─────────────────────────────────────────────
//
// Interior rows come from C2 continuity:
//   h[i-1]*m[i-1] + 2*(h[i-1]+h[i])*m[i] + h[i]*m[i+1]
//     = 6*( (y[i+1]-y[i])/h[i] - (y[i]-y[i-1])/h[i-1] )
// and the end rows pin m[0] = m[n] = 0.

fn generate_natural_cubic_coef_list(points: &[Point2D]) -> Result<Vec<Vec<f64>>, QuantityError> {
    let h = segment_widths(points);
    let n = h.len();
    let mut mat = DMatrix::<f64>::zeros(n + 1, n + 1);
    let mut rhs = DVector::<f64>::zeros(n + 1);

    for i in 1..n {
        mat[(i, i - 1)] = h[i - 1];
        mat[(i, i)]     = 2.0 * (h[i - 1] + h[i]);
        mat[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (
            (points[i + 1].y() - points[i].y()) / h[i]
          - (points[i].y()     - points[i - 1].y()) / h[i - 1]
        );
    }
    mat[(0, 0)] = 1.0;
    mat[(n, n)] = 1.0;

    let m = mat
        .lu()
        .solve(&rhs)
        .ok_or(QuantityError::SingularSystem { kind: InterpolationKind::NaturalCubic })?;
    Ok(cubic_coefs_from_moments(points, &h, m.as_slice()))
}

// ─────────────────────────────────────────────
// PCHIP (Fritsch-Carlson, monotone)
// ─────────────────────────────────────────────
//
// Interior slopes are a weighted harmonic mean of the neighbouring secants,
// or 0 at a local extremum. End slopes use the one-sided three-point
// estimate, clipped so the curve does not overshoot.

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn pchip_end_slope(h0: f64, h1: f64, s0: f64, s1: f64) -> f64 {
    let raw = ((2.0 * h0 + h1) * s0 - h0 * s1) / (h0 + h1);
    if sign(raw) != sign(s0) {
        0.0
    } else if sign(s0) != sign(s1) && raw.abs() > 3.0 * s0.abs() {
        3.0 * s0
    } else {
        raw
    }
}

fn generate_pchip_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    let h = segment_widths(points);
    let n = h.len();
    let s: Vec<f64> = (0..n)
        .map(|i| (points[i + 1].y() - points[i].y()) / h[i])
        .collect();

    let mut t = vec![0.0_f64; n + 1];

    if n == 1 {
        t[0] = s[0];
        t[1] = s[0];
        return cubic_coefs_from_hermite(points, &h, &t);
    }

    for i in 1..n {
        if s[i - 1] * s[i] > 0.0 {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            t[i] = (w1 + w2) / (w1 / s[i - 1] + w2 / s[i]);
        }
    }
    t[0] = pchip_end_slope(h[0], h[1], s[0], s[1]);
    t[n] = pchip_end_slope(h[n - 1], h[n - 2], s[n - 1], s[n - 2]);

    cubic_coefs_from_hermite(points, &h, &t)
}

// ─────────────────────────────────────────────
// InterpolationKind
// ─────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    #[default]
    Linear,
    /// Value of the closer knot; the lower one on a tie.
    Nearest,
    /// Value of the knot to the left.
    Previous,
    /// Value of the knot to the right.
    Next,
    /// Cubic spline with zero curvature at both ends.
    #[serde(rename = "cubic")]
    NaturalCubic,
    #[serde(rename = "pchip")]
    PiecewiseCubicHermite
}

impl InterpolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationKind::Linear                => "linear",
            InterpolationKind::Nearest               => "nearest",
            InterpolationKind::Previous              => "previous",
            InterpolationKind::Next                  => "next",
            InterpolationKind::NaturalCubic          => "cubic",
            InterpolationKind::PiecewiseCubicHermite => "pchip"
        }
    }

    fn necessary_points(&self) -> usize {
        match self {
            InterpolationKind::NaturalCubic | InterpolationKind::PiecewiseCubicHermite => 2,
            _ => 1
        }
    }

    fn accepts_duplicates(&self) -> bool {
        !matches!(
            self,
            InterpolationKind::NaturalCubic | InterpolationKind::PiecewiseCubicHermite
        )
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InterpolationKind {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear"   => Ok(InterpolationKind::Linear),
            "nearest"  => Ok(InterpolationKind::Nearest),
            "previous" => Ok(InterpolationKind::Previous),
            "next"     => Ok(InterpolationKind::Next),
            "cubic"    => Ok(InterpolationKind::NaturalCubic),
            "pchip"    => Ok(InterpolationKind::PiecewiseCubicHermite),
            _ => Err(QuantityError::UnknownInterpolationKind(s.to_owned()))
        }
    }
}

// ─────────────────────────────────────────────
// PiecewisePolynomial
// ─────────────────────────────────────────────

/// Interpolant over sorted knots. Evaluation never extrapolates.
pub struct PiecewisePolynomial {
    kind: InterpolationKind,
    x_data: Vec<f64>,
    y_data: Vec<f64>,
    subpolynomial_list: Vec<Subpolynomial>
}

impl PiecewisePolynomial {
    /// Points are sorted by x first; equal x keep their given order.
    pub fn new(
        kind: InterpolationKind,
        mut points: Vec<Point2D>,
    ) -> Result<PiecewisePolynomial, QuantityError> {
        points.sort_by(|lhs, rhs| lhs.x().total_cmp(&rhs.x()));

        if points.len() < kind.necessary_points() {
            return Err(QuantityError::InsufficientPoints {
                kind,
                required: kind.necessary_points(),
                actual: points.len()
            });
        }
        if !kind.accepts_duplicates() && points.windows(2).any(|pair| pair[0].x() == pair[1].x()) {
            return Err(QuantityError::DuplicateSamplePoints { kind });
        }

        let coef_list = match kind {
            InterpolationKind::Linear                => generate_linear_coef_list(&points),
            InterpolationKind::Nearest               => Vec::new(),
            InterpolationKind::Previous              => generate_forward_flat_coef_list(&points),
            InterpolationKind::Next                  => generate_backward_flat_coef_list(&points),
            InterpolationKind::NaturalCubic          => generate_natural_cubic_coef_list(&points)?,
            InterpolationKind::PiecewiseCubicHermite => generate_pchip_coef_list(&points)
        };

        let subpolynomial_list = coef_list
            .into_iter()
            .zip(points.iter())
            .map(|(coefs, pt)| Subpolynomial::new(coefs, pt.x()))
            .collect();

        Ok(PiecewisePolynomial {
            kind,
            x_data: points.iter().map(Point2D::x).collect(),
            y_data: points.iter().map(Point2D::y).collect(),
            subpolynomial_list
        })
    }

    fn nearest(&self, i: usize, x: f64) -> f64 {
        let midpoint = (self.x_data[i] + self.x_data[i + 1]) / 2.0;
        if x <= midpoint {
            self.y_data[i]
        } else {
            self.y_data[i + 1]
        }
    }
}

impl NonparametricCurve for PiecewisePolynomial {
    fn x(&self) -> &[f64] {
        &self.x_data
    }

    fn y(&self) -> &[f64] {
        &self.y_data
    }

    fn min_x(&self) -> f64 {
        self.x_data[0]
    }

    fn max_x(&self) -> f64 {
        self.x_data[self.x_data.len() - 1]
    }
}

impl Curve for PiecewisePolynomial {
    fn value(&self, x: f64) -> Result<f64, QuantityError> {
        let (min, max) = (self.min_x(), self.max_x());
        if !(min <= x && x <= max) {
            return Err(QuantityError::OutOfDomain { point: x, min, max });
        }

        let idx = self.x_data.partition_point(|&knot| knot < x);
        if self.x_data[idx] == x {
            return Ok(self.y_data[idx]);
        }

        // min < x < max, so the segment [idx - 1, idx] exists and has width
        let i = idx - 1;
        match self.kind {
            InterpolationKind::Nearest => Ok(self.nearest(i, x)),
            _ => Ok(self.subpolynomial_list[i].value(x))
        }
    }
}
