//! Energy accounting for the observer surface.

use serde::{Deserialize, Serialize};

use crate::dynamics::{body_kinematics, SimParams};
use crate::path::PathGeometry;
use crate::spring::Spring;
use crate::state::Mode;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnergyInfo {
    pub potential: f64,
    pub kinetic: f64,
    pub total: f64,
}

/// Computes the current energies. Potential is measured from the
/// geometry's lowest point; `pe_offset` is a display calibration added to
/// the reported value only and never feeds back into the dynamics.
pub fn energy_info(
    geometry: &dyn PathGeometry,
    spring: Option<&Spring>,
    params: &SimParams,
    mode: &Mode,
    pe_offset: f64,
) -> EnergyInfo {
    let (pos, vel) = body_kinematics(geometry, mode);

    let kinetic = 0.5 * params.mass * vel.norm_squared();
    let mut potential = params.mass * params.gravity * (pos.y - geometry.lowest_y()) + pe_offset;
    if let Some(spring) = spring {
        potential += spring.potential_energy(pos);
    }

    EnergyInfo {
        potential,
        kinetic,
        total: potential + kinetic,
    }
}

#[cfg(test)]
mod tests {
    use super::energy_info;
    use crate::dynamics::SimParams;
    use crate::path::sampled::SampledPath;
    use crate::path::shapes::HumpPath;
    use crate::path::PathGeometry;
    use crate::spring::Spring;
    use crate::state::Mode;
    use nalgebra::Vector2;

    #[test]
    fn track_energy_measures_from_the_lowest_point() {
        let path = SampledPath::new(&HumpPath::default()).expect("path should build");
        let params = SimParams::default();
        // hilltop, at rest: pure potential
        let info = energy_info(&path, None, &params, &Mode::Track { p: 2.0, v: 0.0 }, 0.0);
        assert!(info.kinetic == 0.0);
        // hilltop is at y = 2, valley floor at 0
        let expected = params.mass * params.gravity * (2.0 - path.lowest_y());
        assert!(
            (info.potential - expected).abs() < 0.05,
            "potential {} vs {}",
            info.potential,
            expected
        );
        assert_eq!(info.total, info.potential + info.kinetic);
    }

    #[test]
    fn free_energy_includes_both_velocity_components() {
        let path = SampledPath::new(&HumpPath::default()).expect("path should build");
        let params = SimParams::default();
        let mode = Mode::Free {
            x: 0.0,
            y: 1.0,
            vx: 3.0,
            vy: 4.0,
        };
        let info = energy_info(&path, None, &params, &mode, 0.0);
        assert!((info.kinetic - 12.5).abs() < 1e-12);
    }

    #[test]
    fn offset_shifts_the_report_only() {
        let path = SampledPath::new(&HumpPath::default()).expect("path should build");
        let params = SimParams::default();
        let mode = Mode::Track { p: 0.5, v: 2.0 };
        let base = energy_info(&path, None, &params, &mode, 0.0);
        let shifted = energy_info(&path, None, &params, &mode, 10.0);
        assert!((shifted.potential - base.potential - 10.0).abs() < 1e-12);
        assert!((shifted.kinetic - base.kinetic).abs() < 1e-12);
    }

    #[test]
    fn spring_energy_counts_as_potential() {
        let path = SampledPath::new(&HumpPath::default()).expect("path should build");
        let params = SimParams::default();
        let spring = Spring::new(Vector2::new(0.0, 3.0), 1.0, 4.0, 0.0).expect("valid spring");
        let mode = Mode::Track { p: 0.0, v: 0.0 };
        let with = energy_info(&path, Some(&spring), &params, &mode, 0.0);
        let without = energy_info(&path, None, &params, &mode, 0.0);
        // stretch = 3 - 1 = 2, PE = 0.5 * 4 * 4 = 8
        assert!((with.potential - without.potential - 8.0).abs() < 1e-6);
    }
}
