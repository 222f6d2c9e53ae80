//! Discrete-time stepping shared by every model recurrence.

/// A period map `x[t+1] = f(t, x[t])` over a fixed-size state.
pub trait PeriodMap {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Writes the state leaving `period` into `next`, given the state entering it.
    fn apply(&self, period: usize, state: &[f64], next: &mut [f64]);
}

/// Iterates a [`PeriodMap`] one period at a time.
pub struct DiscreteMap {
    next: Vec<f64>,
}

impl DiscreteMap {
    pub fn new(dim: usize) -> Self {
        Self {
            next: vec![0.0; dim],
        }
    }

    /// Advances `state` through `period` in place.
    pub fn step(&mut self, system: &impl PeriodMap, period: usize, state: &mut [f64]) {
        system.apply(period, state, &mut self.next);
        state.copy_from_slice(&self.next);
    }

    /// Iterates the map from `initial` at period 0 and returns `len` states,
    /// the first of which is `initial` itself.
    pub fn orbit(&mut self, system: &impl PeriodMap, initial: &[f64], len: usize) -> Vec<Vec<f64>> {
        let mut states = Vec::with_capacity(len);
        if len == 0 {
            return states;
        }

        let mut state = initial.to_vec();
        states.push(state.clone());
        for period in 0..len - 1 {
            self.step(system, period, &mut state);
            states.push(state.clone());
        }
        states
    }
}
