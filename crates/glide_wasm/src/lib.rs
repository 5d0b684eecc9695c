//! WASM bindings exposing the glide_core simulation to a JS driver.
//!
//! The driver owns the clock and the rendering; this crate only maps the
//! core's observer surface and control operations across the boundary.

mod sim;

pub use sim::WasmSim;
