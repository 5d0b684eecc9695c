//! Curve geometry consumed by the dynamics core.
//!
//! The engine never owns a curve equation; it queries position, slope,
//! curvature, and nearest-point information through the [`PathGeometry`]
//! trait. Any curve representation satisfies the trait; the bundled
//! [`sampled::SampledPath`] adapter turns a parametric equation into one.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub mod sampled;
pub mod shapes;

/// Local differential data at a point on the curve.
#[derive(Debug, Clone, Copy)]
pub struct PathPoint {
    /// Slope dy/dx. Non-finite at a vertical tangent; consumers guard.
    pub k: f64,
    /// +1 if x increases with the path parameter at this point, -1 otherwise.
    pub direction: f64,
    /// Signed radius of curvature: positive concave-up, negative
    /// concave-down, non-finite on straight sections.
    pub radius: f64,
}

/// Parameter range of a curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathDomain {
    pub p_min: f64,
    pub p_max: f64,
    /// Whether the curve joins back on itself. Closed curves wrap the
    /// parameter; open curves clamp it.
    pub closed: bool,
}

impl PathDomain {
    pub fn span(&self) -> f64 {
        self.p_max - self.p_min
    }

    /// Brings a parameter back into the domain: modular wrap for closed
    /// curves, clamp for open ones.
    pub fn contain(&self, p: f64) -> f64 {
        if self.closed {
            let span = self.span();
            if span <= 0.0 {
                return self.p_min;
            }
            let mut wrapped = (p - self.p_min) % span;
            if wrapped < 0.0 {
                wrapped += span;
            }
            self.p_min + wrapped
        } else {
            p.clamp(self.p_min, self.p_max)
        }
    }
}

/// Read-only queries against a fixed curve.
pub trait PathGeometry {
    /// Position of the curve at parameter `p`.
    fn position_at(&self, p: f64) -> Vector2<f64>;

    /// Slope, orientation, and signed radius of curvature at `p`.
    fn slope_at(&self, p: f64) -> PathPoint;

    /// Parameter of the curve point nearest to `pos`, with its local data.
    /// A `seed` restricts the search to the neighborhood of a previous
    /// answer, keeping the query cheap when motion is continuous.
    fn nearest_point(&self, pos: Vector2<f64>, seed: Option<f64>) -> (f64, PathPoint);

    /// Parameter range and closed-loop flag.
    fn domain(&self) -> PathDomain;

    /// Height of the curve over `x`, for the free-flight containment test.
    /// Only meaningful where the curve is single-valued in x.
    fn y_at(&self, x: f64) -> f64;

    /// The lowest y the curve reaches; the zero of potential energy.
    fn lowest_y(&self) -> f64;
}

/// Unit tangent for slope `k`, oriented toward increasing x.
/// A non-finite slope means a vertical tangent.
pub fn unit_tangent(k: f64) -> Vector2<f64> {
    if k.is_finite() {
        let inv = 1.0 / (1.0 + k * k).sqrt();
        Vector2::new(inv, k * inv)
    } else {
        Vector2::new(0.0, 1.0)
    }
}

/// sin of the tangent angle for slope `k`, with the vertical-tangent guard.
pub fn sin_slope(k: f64) -> f64 {
    if k.is_finite() {
        k / (1.0 + k * k).sqrt()
    } else {
        1.0
    }
}

/// cos of the tangent angle for slope `k`; zero at a vertical tangent.
pub fn cos_slope(k: f64) -> f64 {
    if k.is_finite() {
        1.0 / (1.0 + k * k).sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{cos_slope, sin_slope, unit_tangent, PathDomain};

    #[test]
    fn contain_wraps_closed_domains() {
        let domain = PathDomain {
            p_min: 0.0,
            p_max: 10.0,
            closed: true,
        };
        assert!((domain.contain(12.5) - 2.5).abs() < 1e-12);
        assert!((domain.contain(-1.0) - 9.0).abs() < 1e-12);
        assert!((domain.contain(10.0) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn contain_clamps_open_domains() {
        let domain = PathDomain {
            p_min: -2.0,
            p_max: 3.0,
            closed: false,
        };
        assert_eq!(domain.contain(5.0), 3.0);
        assert_eq!(domain.contain(-7.0), -2.0);
        assert_eq!(domain.contain(1.0), 1.0);
    }

    #[test]
    fn tangent_handles_vertical_slope() {
        let t = unit_tangent(f64::INFINITY);
        assert_eq!(t.x, 0.0);
        assert_eq!(t.y, 1.0);
        assert_eq!(sin_slope(f64::NAN), 1.0);
        assert_eq!(cos_slope(f64::INFINITY), 0.0);
    }

    #[test]
    fn tangent_is_unit_length() {
        for &k in &[0.0, 0.5, -3.0, 100.0] {
            let t = unit_tangent(k);
            assert!((t.norm() - 1.0).abs() < 1e-12);
            assert!((sin_slope(k).powi(2) + cos_slope(k).powi(2) - 1.0).abs() < 1e-12);
        }
    }
}
