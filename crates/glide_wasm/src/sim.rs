//! The WASM-facing simulation wrapper.

use glide_core::dynamics::SimParams;
use glide_core::path::sampled::SampledPath;
use glide_core::path::shapes::{HumpPath, LoopPath, RampPath};
use glide_core::path::PathGeometry;
use glide_core::sim::{RollerSim, SolverKind};
use glide_core::spring::Spring;
use glide_core::state::Mode;
use nalgebra::Vector2;
use wasm_bindgen::prelude::*;

fn build_path(name: &str) -> Option<Box<dyn PathGeometry>> {
    let built = match name {
        "hump" => SampledPath::new(&HumpPath::default()),
        "loop" => SampledPath::new(&LoopPath::default()),
        "flat" => SampledPath::new(&RampPath::default()),
        "ramp" => SampledPath::new(&RampPath {
            slope: 0.5,
            half_width: 4.0,
        }),
        _ => return None,
    };
    built.ok().map(|p| Box::new(p) as Box<dyn PathGeometry>)
}

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

#[wasm_bindgen]
pub struct WasmSim {
    sim: RollerSim,
}

#[wasm_bindgen]
impl WasmSim {
    #[wasm_bindgen(constructor)]
    pub fn new(
        path_name: &str,
        start_x: f64,
        start_y: f64,
        solver_name: &str,
    ) -> Result<WasmSim, JsValue> {
        console_error_panic_hook::set_once();

        let geometry =
            build_path(path_name).ok_or_else(|| JsValue::from_str("Unknown path"))?;
        let solver = match solver_name {
            "rk4" => SolverKind::Rk4,
            "modified_euler" => SolverKind::ModifiedEuler,
            _ => return Err(JsValue::from_str("Unknown solver")),
        };

        let mut sim = RollerSim::new(
            geometry,
            Vector2::new(start_x, start_y),
            SimParams::default(),
        )
        .map_err(to_js)?;
        sim.set_solver(solver);

        Ok(WasmSim { sim })
    }

    pub fn advance(&mut self, dt: f64) -> Result<(), JsValue> {
        self.sim.advance(dt).map_err(to_js)
    }

    pub fn time(&self) -> f64 {
        self.sim.time()
    }

    /// All named variables in observer order.
    pub fn state(&self) -> Vec<f64> {
        self.sim.state().values()
    }

    pub fn var_names(&self) -> Vec<String> {
        let vars = self.sim.state();
        (0..vars.len()).map(|i| vars.name(i).to_string()).collect()
    }

    /// Discontinuity counter for one variable.
    pub fn seq(&self, index: usize) -> f64 {
        self.sim.state().seq(index) as f64
    }

    pub fn is_computed(&self, index: usize) -> bool {
        self.sim.state().is_computed(index)
    }

    /// 0 while latched on the track, 1 in free flight.
    pub fn mode_flag(&self) -> f64 {
        self.sim.mode().flag()
    }

    pub fn set_param(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        if name == "pe_offset" {
            self.sim.set_pe_offset(value);
            return Ok(());
        }
        let mut params = *self.sim.params();
        match name {
            "gravity" => params.gravity = value,
            "damping" => params.damping = value,
            "mass" => params.mass = value,
            "elasticity" => params.elasticity = value,
            "stickiness" => params.stickiness = value,
            _ => return Err(JsValue::from_str("Unknown parameter")),
        }
        self.sim.set_params(params).map_err(to_js)
    }

    pub fn set_spring(
        &mut self,
        anchor_x: f64,
        anchor_y: f64,
        rest_length: f64,
        stiffness: f64,
        damping: f64,
    ) -> Result<(), JsValue> {
        let spring = Spring::new(
            Vector2::new(anchor_x, anchor_y),
            rest_length,
            stiffness,
            damping,
        )
        .map_err(to_js)?;
        self.sim.set_spring(Some(spring));
        Ok(())
    }

    pub fn clear_spring(&mut self) {
        self.sim.set_spring(None);
    }

    /// Places the body on the track at parameter `p` with speed `v`.
    pub fn place_on_track(&mut self, p: f64, v: f64) {
        self.sim.set_mode(Mode::Track { p, v });
    }

    /// Launches the body into free flight.
    pub fn launch(&mut self, x: f64, y: f64, vx: f64, vy: f64) {
        self.sim.set_mode(Mode::Free { x, y, vx, vy });
    }

    pub fn energy(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.sim.energy())
            .map_err(|err| JsValue::from_str(&format!("Failed to serialize energy: {err}")))
    }

    /// Interleaved x,y samples of the curve for the rendering layer.
    pub fn path_outline(&self, samples: usize) -> Vec<f64> {
        let samples = samples.max(2);
        let domain = self.sim.geometry().domain();
        let step = domain.span() / (samples - 1) as f64;
        let mut out = Vec::with_capacity(samples * 2);
        for i in 0..samples {
            let pos = self.sim.geometry().position_at(domain.p_min + step * i as f64);
            out.push(pos.x);
            out.push(pos.y);
        }
        out
    }
}
