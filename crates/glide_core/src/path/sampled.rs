//! Table-sampled curve geometry.
//!
//! [`SampledPath`] densely samples a closed-form parametric curve once at
//! construction and afterwards answers every [`PathGeometry`] query from
//! the table: positions by linear interpolation, slope and curvature by
//! central differences, nearest points by scan plus exact projection onto
//! the neighboring table segments.

use anyhow::{bail, Result};
use nalgebra::Vector2;

use super::{PathDomain, PathGeometry, PathPoint};

/// A curve given in closed form as `(x(t), y(t))` over a parameter range.
pub trait ParametricPath {
    fn x_at(&self, t: f64) -> f64;
    fn y_at(&self, t: f64) -> f64;
    /// Inclusive parameter range. For closed curves the endpoint must map
    /// back onto the start point.
    fn t_range(&self) -> (f64, f64);
    fn is_closed(&self) -> bool {
        false
    }
}

/// Default number of table samples.
pub const DEFAULT_SAMPLES: usize = 1501;

/// Sampled realization of a [`ParametricPath`].
pub struct SampledPath {
    ps: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    domain: PathDomain,
    lowest: f64,
    x_monotonic: bool,
}

impl SampledPath {
    pub fn new(curve: &dyn ParametricPath) -> Result<Self> {
        Self::with_samples(curve, DEFAULT_SAMPLES)
    }

    pub fn with_samples(curve: &dyn ParametricPath, samples: usize) -> Result<Self> {
        if samples < 8 {
            bail!("Sampled path requires at least 8 samples, got {}.", samples);
        }
        let (t0, t1) = curve.t_range();
        if !(t1 > t0) || !t0.is_finite() || !t1.is_finite() {
            bail!("Parametric range [{}, {}] is not a valid interval.", t0, t1);
        }

        let h = (t1 - t0) / (samples - 1) as f64;
        let mut ps = Vec::with_capacity(samples);
        let mut xs = Vec::with_capacity(samples);
        let mut ys = Vec::with_capacity(samples);
        for i in 0..samples {
            let t = t0 + h * i as f64;
            let x = curve.x_at(t);
            let y = curve.y_at(t);
            if !x.is_finite() || !y.is_finite() {
                bail!("Curve evaluates to a non-finite point at t = {}.", t);
            }
            ps.push(t);
            xs.push(x);
            ys.push(y);
        }

        let lowest = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let increasing = xs.windows(2).all(|w| w[1] > w[0]);
        let decreasing = xs.windows(2).all(|w| w[1] < w[0]);

        Ok(Self {
            ps,
            xs,
            ys,
            domain: PathDomain {
                p_min: t0,
                p_max: t1,
                closed: curve.is_closed(),
            },
            lowest,
            x_monotonic: increasing || decreasing,
        })
    }

    fn len(&self) -> usize {
        self.ps.len()
    }

    /// Index of the sample at or just below `p` (after containment).
    fn index_below(&self, p: f64) -> usize {
        let p = self.domain.contain(p);
        let h = self.domain.span() / (self.len() - 1) as f64;
        let idx = ((p - self.domain.p_min) / h).floor() as usize;
        idx.min(self.len() - 2)
    }

    /// Neighbor indices for centered differences at sample `i`, wrapping on
    /// closed curves and falling back to one-sided stencils at open ends.
    fn stencil(&self, i: usize) -> (usize, usize) {
        let last = self.len() - 1;
        if self.domain.closed {
            // sample `last` duplicates sample 0
            let prev = if i == 0 { last - 1 } else { i - 1 };
            let next = if i >= last { 1 } else { i + 1 };
            (prev, next)
        } else {
            (i.saturating_sub(1), (i + 1).min(last))
        }
    }

    fn slope_at_index(&self, i: usize) -> f64 {
        let (a, b) = self.stencil(i);
        let dx = self.xs[b] - self.xs[a];
        let dy = self.ys[b] - self.ys[a];
        if dx == 0.0 {
            f64::INFINITY.copysign(if dy == 0.0 { 1.0 } else { dy })
        } else {
            dy / dx
        }
    }

    fn point_at_index(&self, i: usize) -> PathPoint {
        let (a, b) = self.stencil(i);
        let dx = self.xs[b] - self.xs[a];
        let k = self.slope_at_index(i);
        let direction = if dx >= 0.0 { 1.0 } else { -1.0 };

        // curvature from the change of slope across the stencil
        let ka = self.slope_at_index(a);
        let kb = self.slope_at_index(b);
        let dxab = self.xs[b] - self.xs[a];
        let radius = if !k.is_finite() || !ka.is_finite() || !kb.is_finite() || dxab == 0.0 {
            f64::INFINITY
        } else {
            let ypp = (kb - ka) / dxab;
            // below rounding noise the section is straight
            if ypp.abs() < 1e-9 {
                f64::INFINITY
            } else {
                (1.0 + k * k).powf(1.5) / ypp
            }
        };

        PathPoint {
            k,
            direction,
            radius,
        }
    }

    /// Exact nearest point on the polyline segment `(i, i+1)`, returned as
    /// (parameter, squared distance).
    fn project_on_segment(&self, i: usize, pos: Vector2<f64>) -> (f64, f64) {
        let a = Vector2::new(self.xs[i], self.ys[i]);
        let b = Vector2::new(self.xs[i + 1], self.ys[i + 1]);
        let ab = b - a;
        let len2 = ab.norm_squared();
        let s = if len2 == 0.0 {
            0.0
        } else {
            ((pos - a).dot(&ab) / len2).clamp(0.0, 1.0)
        };
        let nearest = a + ab * s;
        let p = self.ps[i] + (self.ps[i + 1] - self.ps[i]) * s;
        (p, (pos - nearest).norm_squared())
    }
}

impl PathGeometry for SampledPath {
    fn position_at(&self, p: f64) -> Vector2<f64> {
        let p = self.domain.contain(p);
        let i = self.index_below(p);
        let denom = self.ps[i + 1] - self.ps[i];
        let s = if denom == 0.0 {
            0.0
        } else {
            (p - self.ps[i]) / denom
        };
        Vector2::new(
            self.xs[i] + (self.xs[i + 1] - self.xs[i]) * s,
            self.ys[i] + (self.ys[i + 1] - self.ys[i]) * s,
        )
    }

    fn slope_at(&self, p: f64) -> PathPoint {
        let i = self.index_below(p);
        // pick the nearer of the two bracketing samples
        let i = if self.domain.contain(p) - self.ps[i] > self.ps[i + 1] - self.domain.contain(p) {
            i + 1
        } else {
            i
        };
        self.point_at_index(i)
    }

    fn nearest_point(&self, pos: Vector2<f64>, seed: Option<f64>) -> (f64, PathPoint) {
        let last = self.len() - 1;
        let (lo, hi) = match seed {
            Some(seed_p) => {
                let center = self.index_below(seed_p);
                let window = (self.len() / 20).max(4);
                if self.domain.closed {
                    // scan everything on closed curves if the window would
                    // have to wrap; the table is cheap to walk
                    (0, last)
                } else {
                    (center.saturating_sub(window), (center + window).min(last))
                }
            }
            None => (0, last),
        };

        let mut best_i = lo;
        let mut best_d = f64::INFINITY;
        for i in lo..=hi {
            let dx = self.xs[i] - pos.x;
            let dy = self.ys[i] - pos.y;
            let d = dx * dx + dy * dy;
            if d < best_d {
                best_d = d;
                best_i = i;
            }
        }

        // refine against the segments on both sides of the best sample
        let mut best_p = self.ps[best_i];
        let mut best = f64::INFINITY;
        if best_i > 0 {
            let (p, d) = self.project_on_segment(best_i - 1, pos);
            if d < best {
                best = d;
                best_p = p;
            }
        }
        if best_i < last {
            let (p, d) = self.project_on_segment(best_i, pos);
            if d < best {
                best_p = p;
            }
        }

        (best_p, self.slope_at(best_p))
    }

    fn domain(&self) -> PathDomain {
        self.domain
    }

    fn y_at(&self, x: f64) -> f64 {
        if self.x_monotonic {
            let ascending = self.xs[self.len() - 1] > self.xs[0];
            let (first, last) = (self.xs[0], self.xs[self.len() - 1]);
            let (xmin, xmax) = if ascending { (first, last) } else { (last, first) };
            let x = x.clamp(xmin, xmax);
            // binary search for the bracketing segment
            let mut lo = 0;
            let mut hi = self.len() - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                let left = if ascending {
                    self.xs[mid] <= x
                } else {
                    self.xs[mid] >= x
                };
                if left {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let dx = self.xs[hi] - self.xs[lo];
            if dx == 0.0 {
                self.ys[lo]
            } else {
                self.ys[lo] + (self.ys[hi] - self.ys[lo]) * (x - self.xs[lo]) / dx
            }
        } else {
            // multi-valued in x: answer from the sample nearest in x
            let mut best = 0;
            let mut best_d = f64::INFINITY;
            for i in 0..self.len() {
                let d = (self.xs[i] - x).abs();
                if d < best_d {
                    best_d = d;
                    best = i;
                }
            }
            self.ys[best]
        }
    }

    fn lowest_y(&self) -> f64 {
        self.lowest
    }
}
