use crate::{
    data::{ShuffleMode, FEATURE_COUNT},
    error::{Error, Result},
    net::NetConfig,
};

/// Per-example objective optimized by the training engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Objective {
    /// `w -= gamma0 * (yp - y) * dyp/dw`; the only objective for hidden layers.
    SquaredLoss,
    /// Logistic margin loss with L2 shrinkage `2 / s^2` and learning rate
    /// `gamma0 / (1 + gamma0 * t / c)`. Linear only.
    MarginRegularized {
        c: f64,
        s: f64,
    },
}

impl Objective {
    pub fn default_margin_regularized() -> Self {
        Objective::MarginRegularized {
            c: 1024.0,
            s: 10e5,
        }
    }
}

#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(pattern = "owned", build_fn(validate = "Self::validate"))]
pub struct TrainingOptions {
    #[builder(default = "FEATURE_COUNT")]
    pub feature_count: usize,
    #[builder(default = "0")]
    pub layer_count: usize,
    #[builder(default = "FEATURE_COUNT / 2")]
    pub layer_node_count: usize,
    #[builder(default = "200")]
    pub epochs: usize,
    #[builder(default = "0.01")]
    pub gamma0: f64,
    #[builder(default = "Objective::SquaredLoss")]
    pub objective: Objective,
    #[builder(default = "ShuffleMode::Compat")]
    pub shuffle: ShuffleMode,
    #[builder(default)]
    pub seed: Option<String>,
}

impl TrainingOptionsBuilder {

    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(0) = self.feature_count {
            return Err("feature count must be greater than 0".to_string());
        }
        if let Some(0) = self.epochs {
            return Err("number of epochs must be greater than 0".to_string());
        }
        if let Some(gamma0) = self.gamma0 {
            if !(gamma0 > 0.0) {
                return Err("gamma0 must be positive".to_string());
            }
        }
        let layer_count = self.layer_count.unwrap_or(0);
        if layer_count > 0 {
            if let Some(0) = self.layer_node_count {
                return Err("layer node count must be greater than 0".to_string());
            }
        }
        if let Some(Objective::MarginRegularized { c, s }) = self.objective {
            if !(c > 0.0) {
                return Err("C must be positive".to_string());
            }
            if !(s > 0.0) {
                return Err("s must be positive".to_string());
            }
            if layer_count > 0 {
                return Err("the margin-regularized objective has no hidden layers".to_string());
            }
        }
        Ok(())
    }

    /// Like `build`, with the message wrapped in the crate error.
    pub fn finish(self) -> Result<TrainingOptions> {
        self.build().map_err(Error::Config)
    }

}

impl TrainingOptions {

    pub fn net_config(&self) -> Result<NetConfig> {
        NetConfig::new(self.feature_count, self.layer_count, self.layer_node_count)
    }

}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TrainingOptionsBuilder::default().finish().unwrap();
        assert_eq!(options.feature_count, FEATURE_COUNT);
        assert_eq!(options.layer_count, 0);
        assert_eq!(options.epochs, 200);
        assert_eq!(options.gamma0, 0.01);
        assert_eq!(options.objective, Objective::SquaredLoss);
        assert_eq!(options.shuffle, ShuffleMode::Compat);
        assert_eq!(options.seed, None);
        assert!(options.net_config().unwrap().is_linear());
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert!(TrainingOptionsBuilder::default().epochs(0).finish().is_err());
        assert!(TrainingOptionsBuilder::default().gamma0(0.0).finish().is_err());
        assert!(TrainingOptionsBuilder::default().gamma0(-1.0).finish().is_err());
        assert!(TrainingOptionsBuilder::default().gamma0(f64::NAN).finish().is_err());
        assert!(TrainingOptionsBuilder::default().feature_count(0).finish().is_err());
        assert!(TrainingOptionsBuilder::default().layer_count(2).layer_node_count(0).finish().is_err());
        assert!(TrainingOptionsBuilder::default()
            .objective(Objective::MarginRegularized { c: 0.0, s: 1.0 })
            .finish().is_err());
        assert!(TrainingOptionsBuilder::default()
            .objective(Objective::MarginRegularized { c: 1.0, s: -1.0 })
            .finish().is_err());
    }

    #[test]
    fn test_margin_requires_linear() {
        let result = TrainingOptionsBuilder::default()
            .layer_count(1)
            .objective(Objective::default_margin_regularized())
            .finish();
        match result {
            Err(Error::Config(_)) => (),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(TrainingOptionsBuilder::default()
            .objective(Objective::default_margin_regularized())
            .finish().is_ok());
    }

    #[test]
    fn test_zero_node_count_ignored_without_hidden_layers() {
        let options = TrainingOptionsBuilder::default().layer_node_count(0).finish().unwrap();
        assert_eq!(options.net_config().unwrap().weight_buffer_size(), Some(FEATURE_COUNT));
    }

}
