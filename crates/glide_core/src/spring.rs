//! Linear spring-damper between a fixed anchor and the simulated body.
//!
//! The pairing with the body is fixed at construction; the spring never
//! needs to check at evaluation time which body a force belongs to.

use anyhow::{bail, Result};
use nalgebra::Vector2;

#[derive(Debug, Clone)]
pub struct Spring {
    anchor: Vector2<f64>,
    rest_length: f64,
    stiffness: f64,
    damping: f64,
}

impl Spring {
    pub fn new(
        anchor: Vector2<f64>,
        rest_length: f64,
        stiffness: f64,
        damping: f64,
    ) -> Result<Self> {
        if rest_length < 0.0 {
            bail!("Spring rest length must be non-negative, got {}.", rest_length);
        }
        if stiffness < 0.0 {
            bail!("Spring stiffness must be non-negative, got {}.", stiffness);
        }
        if damping < 0.0 {
            bail!("Spring damping must be non-negative, got {}.", damping);
        }
        Ok(Self {
            anchor,
            rest_length,
            stiffness,
            damping,
        })
    }

    pub fn anchor(&self) -> Vector2<f64> {
        self.anchor
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Vector from the anchor to the body.
    pub fn vector(&self, body: Vector2<f64>) -> Vector2<f64> {
        body - self.anchor
    }

    /// Signed extension beyond rest length; negative when compressed.
    pub fn stretch(&self, body: Vector2<f64>) -> f64 {
        self.vector(body).norm() - self.rest_length
    }

    /// Force exerted on the body: elastic pull along the spring axis plus
    /// axial damping against the body's velocity. Zero at zero length.
    pub fn force_on(&self, body: Vector2<f64>, velocity: Vector2<f64>) -> Vector2<f64> {
        let axis = self.vector(body);
        let len = axis.norm();
        if len == 0.0 {
            return Vector2::zeros();
        }
        let unit = axis / len;
        let elastic = -self.stiffness * (len - self.rest_length);
        let axial_speed = velocity.dot(&unit);
        (elastic - self.damping * axial_speed) * unit
    }

    /// Elastic energy stored at the body's position.
    pub fn potential_energy(&self, body: Vector2<f64>) -> f64 {
        let stretch = self.stretch(body);
        0.5 * self.stiffness * stretch * stretch
    }
}
