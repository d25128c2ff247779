use itertools::izip;

use crate::{
    func::{ErrorFn, LearningRateFn},
    layer::dot,
};

/// One online update of a single linear unit.
pub trait LinearStep {
    /// Reads `current`, writes every weight of `next` and returns the loss of
    /// the example before the update.
    fn step(&mut self, current: &[f64], next: &mut [f64], input: &[f64], expected: f64) -> f64;
}

/// Plain squared-loss gradient descent with a constant learning rate.
#[derive(Clone, Debug)]
pub struct SquaredLossStep {
    learning_rate_fn: LearningRateFn,
}

impl SquaredLossStep {
    pub fn new(gamma0: f64) -> Self {
        SquaredLossStep {
            learning_rate_fn: LearningRateFn::Constant(gamma0),
        }
    }
}

impl LinearStep for SquaredLossStep {

    fn step(&mut self, current: &[f64], next: &mut [f64], input: &[f64], expected: f64) -> f64 {
        let actual = dot(current, input);
        let error_signal = ErrorFn::SquaredError.get_error_derivative(expected, actual);
        let scale = self.learning_rate_fn.get_learning_rate(0.0) * error_signal;
        for (target, &w, &x) in izip!(next.iter_mut(), current, input) {
            *target = w - scale * x;
        }
        ErrorFn::SquaredError.get_error(expected, actual)
    }

}

/// Logistic margin loss with L2 shrinkage and a decaying learning rate.
///
/// The step counter starts at 1 and keeps counting across epochs.
#[derive(Clone, Debug)]
pub struct MarginStep {
    learning_rate_fn: LearningRateFn,
    shrinkage: f64,
    t: f64,
}

impl MarginStep {

    pub fn new(gamma0: f64, c: f64, s: f64) -> Self {
        MarginStep {
            learning_rate_fn: LearningRateFn::InverseDecay { gamma0, c },
            shrinkage: 2.0 / (s * s),
            t: 1.0,
        }
    }

    #[inline]
    pub fn steps_taken(&self) -> f64 {
        self.t - 1.0
    }

}

impl LinearStep for MarginStep {

    fn step(&mut self, current: &[f64], next: &mut [f64], input: &[f64], expected: f64) -> f64 {
        let actual = dot(current, input);
        let a = ErrorFn::LogisticMargin.get_error_derivative(expected, actual);
        let rate = self.learning_rate_fn.get_learning_rate(self.t);
        for (target, &w, &x) in izip!(next.iter_mut(), current, input) {
            *target = w - rate * (a * x + self.shrinkage * w);
        }
        self.t += 1.0;
        ErrorFn::LogisticMargin.get_error(expected, actual)
    }

}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_squared_loss_golden_step() {
        let current = [0.0, 0.0];
        let mut next = [f64::NAN; 2];
        let loss = SquaredLossStep::new(0.1).step(&current, &mut next, &[1.0, 1.0], 1.0);
        assert_eq!(loss, 0.5);
        assert_abs_diff_eq!(next[0], 0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(next[1], 0.1, epsilon = 1e-15);
    }

    #[test]
    fn test_squared_loss_second_example() {
        let current = [0.1, 0.1];
        let mut next = [0.0; 2];
        SquaredLossStep::new(0.1).step(&current, &mut next, &[1.0, -1.0], -1.0);
        // dot = 0, error signal = 1
        assert_abs_diff_eq!(next[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(next[1], 0.2, epsilon = 1e-15);
    }

    #[test]
    fn test_margin_golden_step() {
        let mut step = MarginStep::new(0.1, 1.0, 1.0);
        let current = [0.0, 0.0];
        let mut next = [0.0; 2];
        let loss = step.step(&current, &mut next, &[1.0, 1.0], 1.0);
        assert_abs_diff_eq!(loss, f64::ln(2.0), epsilon = 1e-15);
        let rate = 0.1 / 1.1;
        assert_abs_diff_eq!(next[0], rate * 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(next[1], rate * 0.5, epsilon = 1e-15);
        assert_eq!(step.steps_taken(), 1.0);
    }

    #[test]
    fn test_margin_shrinkage_and_decay() {
        let mut step = MarginStep::new(0.5, 2.0, 1.0);
        step.t = 3.0;
        let current = [1.0];
        let mut next = [0.0];
        // input 0 isolates the shrinkage term
        step.step(&current, &mut next, &[0.0], 1.0);
        let rate = 0.5 / (1.0 + 0.5 * 3.0 / 2.0);
        assert_abs_diff_eq!(next[0], 1.0 - rate * 2.0, epsilon = 1e-15);
        assert_eq!(step.t, 4.0);
    }

}
