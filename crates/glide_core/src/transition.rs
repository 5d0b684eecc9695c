//! Track → free transition: the geometric stability test.
//!
//! Evaluated once per accepted step while on the track. The body leaves
//! the curve when the acceleration the curve can supply toward its center
//! of curvature no longer matches the centripetal acceleration the
//! current speed requires.
//!
//! Sign conventions, re-derived from the two canonical cases rather than
//! taken on faith:
//! - valley (radius > 0, center of curvature above the curve): the track
//!   pushes toward the center, so gravity alone can never detach the
//!   body; only a spring pulling it off the surface can. `a_avail` counts
//!   toward-center acceleration, so gravity enters negated.
//! - hill (radius < 0, center below): gravity supplies the centripetal
//!   pull; the body departs once `v^2/|r|` exceeds what gravity plus the
//!   spring provide.

use anyhow::Result;

use crate::dynamics::SimParams;
use crate::error::SimError;
use crate::path::{cos_slope, unit_tangent, PathGeometry};
use crate::spring::Spring;
use crate::state::Mode;

/// Largest excursion of a direction cosine beyond [-1, 1] that is treated
/// as floating-point drift and clamped; anything larger is a fault.
const COSINE_DRIFT_TOLERANCE: f64 = 1e-6;

pub(crate) fn clamp_unit(value: f64, p: f64) -> Result<f64, SimError> {
    if value.abs() <= 1.0 {
        Ok(value)
    } else if value.abs() <= 1.0 + COSINE_DRIFT_TOLERANCE {
        Ok(value.clamp(-1.0, 1.0))
    } else {
        Err(SimError::TrigDomain { value, p })
    }
}

/// Tests whether the body at `(p, v)` can stay on the curve. Returns the
/// initial free-flight state when it cannot.
pub fn check_departure(
    geometry: &dyn PathGeometry,
    spring: Option<&Spring>,
    params: &SimParams,
    p: f64,
    v: f64,
) -> Result<Option<Mode>> {
    let pt = geometry.slope_at(p);
    let r = pt.radius;
    // straight sections cannot demand centripetal acceleration; a cusp
    // (zero radius) has no usable concavity sign
    if !r.is_finite() || r == 0.0 {
        return Ok(None);
    }

    let mut a_avail = params.gravity * cos_slope(pt.k);
    if r > 0.0 {
        a_avail = -a_avail;
    }

    if let Some(spring) = spring {
        let pos = geometry.position_at(p);
        let anchor = spring.anchor();
        let side = if pt.k.is_finite() {
            let intercept = pos.y - pt.k * pos.x;
            (anchor.y - (pt.k * anchor.x + intercept)).signum()
        } else {
            // vertical tangent: the tangent "line" is x = pos.x and the
            // above-side normal points toward -x
            (pos.x - anchor.x).signum()
        };

        let axis = spring.vector(pos);
        let len = axis.norm();
        if len > 0.0 && spring.stiffness() > 0.0 && side != 0.0 {
            let tangent = unit_tangent(pt.k);
            let cos_s = clamp_unit(axis.dot(&tangent) / len, p)?;
            let sin_s = (1.0 - cos_s * cos_s).max(0.0).sqrt();
            let toward_center =
                side * spring.stretch(pos) * spring.stiffness() * sin_s / params.mass;
            a_avail += if r > 0.0 {
                toward_center
            } else {
                -toward_center
            };
        }
    }

    let a_req = (v * v / r).abs();
    let departs = (r < 0.0 && a_avail < a_req) || (r > 0.0 && a_avail > a_req);
    if !departs {
        return Ok(None);
    }

    let mut pos = geometry.position_at(p);
    let surface = geometry.y_at(pos.x);
    if surface.is_finite() && pos.y < surface {
        pos.y = surface;
    }
    let velocity = unit_tangent(pt.k) * (v * pt.direction);
    tracing::debug!(p, v, a_avail, a_req, "body leaves the track");

    Ok(Some(Mode::Free {
        x: pos.x,
        y: pos.y,
        vx: velocity.x,
        vy: velocity.y,
    }))
}
