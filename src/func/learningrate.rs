#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LearningRateFn {
    Constant(f64),
    /// `gamma0 / (1 + gamma0 * t / c)`
    InverseDecay {
        gamma0: f64,
        c: f64,
    }
}

impl LearningRateFn {

    pub fn get_learning_rate(&self, step: f64) -> f64 {
        match self {
            &LearningRateFn::Constant(val) => val,
            &LearningRateFn::InverseDecay { gamma0, c } => gamma0 / (1.0 + gamma0 * step / c),
        }
    }

}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_learning_rates() {
        assert_eq!(LearningRateFn::Constant(0.1).get_learning_rate(1000.0), 0.1);
        let decay = LearningRateFn::InverseDecay { gamma0: 0.5, c: 2.0 };
        assert_eq!(decay.get_learning_rate(0.0), 0.5);
        assert_eq!(decay.get_learning_rate(4.0), 0.25);
        assert!(decay.get_learning_rate(10.0) < decay.get_learning_rate(9.0));
    }

}
