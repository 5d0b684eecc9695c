//! Stock parametric curves used by tests, demos, and drivers.

use super::sampled::ParametricPath;

/// Two hills flanking a valley at t = 0: y = t^2 - t^4/8.
///
/// The valley bottom sits at the origin with radius of curvature 1/2; the
/// hilltops are at t = ±2, y = 2.
#[derive(Debug, Clone, Copy)]
pub struct HumpPath {
    pub half_width: f64,
}

impl Default for HumpPath {
    fn default() -> Self {
        Self { half_width: 2.6 }
    }
}

impl ParametricPath for HumpPath {
    fn x_at(&self, t: f64) -> f64 {
        t
    }
    fn y_at(&self, t: f64) -> f64 {
        t * t - t.powi(4) / 8.0
    }
    fn t_range(&self) -> (f64, f64) {
        (-self.half_width, self.half_width)
    }
}

/// A closed circular loop of the given radius, lowest point at the origin,
/// traversed counterclockwise starting from the bottom.
#[derive(Debug, Clone, Copy)]
pub struct LoopPath {
    pub radius: f64,
}

impl Default for LoopPath {
    fn default() -> Self {
        Self { radius: 2.0 }
    }
}

impl ParametricPath for LoopPath {
    fn x_at(&self, t: f64) -> f64 {
        self.radius * t.sin()
    }
    fn y_at(&self, t: f64) -> f64 {
        self.radius * (1.0 - t.cos())
    }
    fn t_range(&self) -> (f64, f64) {
        (0.0, std::f64::consts::TAU)
    }
    fn is_closed(&self) -> bool {
        true
    }
}

/// A straight incline through the origin with constant slope.
#[derive(Debug, Clone, Copy)]
pub struct RampPath {
    pub slope: f64,
    pub half_width: f64,
}

impl Default for RampPath {
    fn default() -> Self {
        Self {
            slope: 0.0,
            half_width: 4.0,
        }
    }
}

impl ParametricPath for RampPath {
    fn x_at(&self, t: f64) -> f64 {
        t
    }
    fn y_at(&self, t: f64) -> f64 {
        self.slope * t
    }
    fn t_range(&self) -> (f64, f64) {
        (-self.half_width, self.half_width)
    }
}
