#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActivationFn {
    LogisticSigmoid {
        steepness: f64,
    }
}

impl ActivationFn {

    pub fn standard_logistic_sigmoid() -> Self {
        ActivationFn::LogisticSigmoid {
            steepness: 1.0,
        }
    }

    pub fn get_activation(&self, n: f64) -> f64 {
        match self {
            &ActivationFn::LogisticSigmoid { steepness } => {
                1.0 / (1.0 + f64::exp(-steepness * n))
            },
        }
    }

    /// Derivative expressed through the activation value `z` itself.
    pub fn get_activation_derivative_from_output(&self, z: f64) -> f64 {
        match self {
            &ActivationFn::LogisticSigmoid { steepness } => steepness * z * (1.0 - z),
        }
    }

}
