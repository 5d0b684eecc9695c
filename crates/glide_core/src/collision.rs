//! Free-flight containment test and impulse-based collision response.

use nalgebra::Vector2;
use serde::Serialize;

use crate::dynamics::SimParams;
use crate::path::{unit_tangent, PathGeometry};
use crate::state::Mode;

/// Diagnostic record of one contact. Never consulted for re-entrant
/// decisions; drivers read it for telemetry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CollisionEvent {
    /// Simulation time at detection.
    pub time: f64,
    /// Path-parameter estimate seeding the resolver's nearest-point search.
    pub path_estimate: f64,
    /// Body position at detection.
    pub x: f64,
    pub y: f64,
    /// Impulse magnitude, filled in by the resolver.
    pub impulse: Option<f64>,
}

/// Result of testing a free-flight position against the curve.
#[derive(Debug, Clone, Copy)]
pub enum Containment {
    /// Above the curve, inside its horizontal extent.
    Clear,
    /// Ran past the end of an open curve: not a geometry collision. The
    /// caller clamps the body to this x and zeroes its velocity.
    OutOfRange { x: f64 },
    /// Penetrated beneath the curve.
    Penetrating(CollisionEvent),
}

/// Tests whether a free body at `(x, y)` has left the legal region.
pub fn check_containment(
    geometry: &dyn PathGeometry,
    x: f64,
    y: f64,
    time: f64,
    seed: f64,
) -> Containment {
    let domain = geometry.domain();
    if !domain.closed {
        let a = geometry.position_at(domain.p_min).x;
        let b = geometry.position_at(domain.p_max).x;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if x < lo {
            return Containment::OutOfRange { x: lo };
        }
        if x > hi {
            return Containment::OutOfRange { x: hi };
        }
    }

    let surface = geometry.y_at(x);
    if surface.is_finite() && y < surface {
        Containment::Penetrating(CollisionEvent {
            time,
            path_estimate: seed,
            x,
            y,
            impulse: None,
        })
    } else {
        Containment::Clear
    }
}

/// Outcome of resolving one collision.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub mode: Mode,
    /// Refined path parameter at the contact point.
    pub path_param: f64,
    /// Magnitude of the impulse applied to the body.
    pub impulse: f64,
    /// Whether the body reattached to the curve.
    pub relatched: bool,
}

/// Reflects the body's velocity about the local tangent and decides
/// whether it re-latches onto the curve.
pub fn resolve_collision(
    geometry: &dyn PathGeometry,
    params: &SimParams,
    event: &CollisionEvent,
    vx: f64,
    vy: f64,
) -> Resolution {
    let pos = Vector2::new(event.x, event.y);
    let (p, pt) = geometry.nearest_point(pos, Some(event.path_estimate));

    let velocity = Vector2::new(vx, vy);
    let tangential = if pt.k.is_finite() {
        let factor = (vx + pt.k * vy) / (1.0 + pt.k * pt.k);
        Vector2::new(factor, factor * pt.k)
    } else {
        Vector2::new(0.0, vy)
    };
    let normal = velocity - tangential;
    let reflected = tangential - params.elasticity * normal;
    let impulse = normal.norm() * (1.0 + params.elasticity) * params.mass;

    let bounce = params.elasticity * normal.norm();
    let total = reflected.norm();
    let relatched = total == 0.0 || bounce / total < params.stickiness;

    let mode = if relatched {
        let tangent = unit_tangent(pt.k);
        let v = tangential.dot(&tangent) * pt.direction;
        Mode::Track { p, v }
    } else {
        // stays airborne; lift out of the surface if still beneath it
        let surface = geometry.y_at(event.x);
        let y = if surface.is_finite() && event.y < surface {
            surface
        } else {
            event.y
        };
        Mode::Free {
            x: event.x,
            y,
            vx: reflected.x,
            vy: reflected.y,
        }
    };

    tracing::debug!(
        time = event.time,
        p,
        impulse,
        relatched,
        "collision resolved"
    );

    Resolution {
        mode,
        path_param: p,
        impulse,
        relatched,
    }
}
