//! Fixed-step numerical integrators.

use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic 4th-order Runge-Kutta with a running stage accumulator.
pub struct Rk4<T: Scalar> {
    k: Vec<T>,
    acc: Vec<T>,
    trial: Vec<T>,
}

impl<T: Scalar> Rk4<T> {
    pub fn new(dim: usize) -> Self {
        let zero = T::from_f64(0.0).unwrap();
        Self {
            k: vec![zero; dim],
            acc: vec![zero; dim],
            trial: vec![zero; dim],
        }
    }

    fn resize(&mut self, dim: usize) {
        let zero = T::from_f64(0.0).unwrap();
        self.k.resize(dim, zero);
        self.acc.resize(dim, zero);
        self.trial.resize(dim, zero);
    }
}

impl<T: Scalar> Steppable<T> for Rk4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, state: &mut [T], dt: T) {
        let dim = state.len();
        self.resize(dim);

        let zero = T::from_f64(0.0).unwrap();
        let half = T::from_f64(0.5).unwrap();
        let two = T::from_f64(2.0).unwrap();
        let sixth = T::from_f64(1.0 / 6.0).unwrap();

        for v in self.k.iter_mut() {
            *v = zero;
        }

        // stage 1: k = f(0, y), acc = k
        system.apply(zero, state, &mut self.k);
        self.acc.copy_from_slice(&self.k);

        // stage 2: k = f(dt/2, y + dt/2 k), acc += 2k
        for i in 0..dim {
            self.trial[i] = state[i] + dt * half * self.k[i];
            self.k[i] = zero;
        }
        system.apply(dt * half, &self.trial, &mut self.k);
        for i in 0..dim {
            self.acc[i] = self.acc[i] + two * self.k[i];
        }

        // stage 3: same midpoint, against the stage-2 slope
        for i in 0..dim {
            self.trial[i] = state[i] + dt * half * self.k[i];
            self.k[i] = zero;
        }
        system.apply(dt * half, &self.trial, &mut self.k);
        for i in 0..dim {
            self.acc[i] = self.acc[i] + two * self.k[i];
        }

        // stage 4: k = f(dt, y + dt k), acc += k
        for i in 0..dim {
            self.trial[i] = state[i] + dt * self.k[i];
            self.k[i] = zero;
        }
        system.apply(dt, &self.trial, &mut self.k);

        for i in 0..dim {
            state[i] = state[i] + dt * sixth * (self.acc[i] + self.k[i]);
        }
    }
}

/// Midpoint method: one Euler probe to the interval center, then a full
/// step on the centered slope. Second-order accurate.
pub struct ModifiedEuler<T: Scalar> {
    k: Vec<T>,
    trial: Vec<T>,
}

impl<T: Scalar> ModifiedEuler<T> {
    pub fn new(dim: usize) -> Self {
        let zero = T::from_f64(0.0).unwrap();
        Self {
            k: vec![zero; dim],
            trial: vec![zero; dim],
        }
    }

    fn resize(&mut self, dim: usize) {
        let zero = T::from_f64(0.0).unwrap();
        self.k.resize(dim, zero);
        self.trial.resize(dim, zero);
    }
}

impl<T: Scalar> Steppable<T> for ModifiedEuler<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, state: &mut [T], dt: T) {
        let dim = state.len();
        self.resize(dim);

        let zero = T::from_f64(0.0).unwrap();
        let half = T::from_f64(0.5).unwrap();

        for v in self.k.iter_mut() {
            *v = zero;
        }
        system.apply(zero, state, &mut self.k);
        for i in 0..dim {
            self.trial[i] = state[i] + dt * half * self.k[i];
            self.k[i] = zero;
        }
        system.apply(dt * half, &self.trial, &mut self.k);
        for i in 0..dim {
            state[i] = state[i] + dt * self.k[i];
        }
    }
}
