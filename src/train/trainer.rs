use std::time::{Duration, Instant};

use log::{debug, info};
use rand_xorshift::XorShiftRng;

use crate::{
    buffer::WeightBuffer,
    data::ExampleSet,
    error::{Error, Result},
    initializer::RandomInitializer,
    net::NetConfig,
    predict::Predictor,
    stats::{Evaluation, Stats},
    train::{
        backprop::network_step,
        buffers::TrainingBuffers,
        linear::{LinearStep, MarginStep, SquaredLossStep},
        options::{Objective, TrainingOptions},
        pingpong::PingPong,
    },
    utils::new_rng,
};

pub struct TrainingResult {
    /// Per-example loss over the last epoch.
    pub error_stats: Stats,
    pub epochs: usize,
    pub steps: usize,
    pub duration: Duration,
}

/// Epoch-based stochastic trainer. Every buffer it needs is allocated by
/// `new`; running epochs allocates nothing.
pub struct Trainer {
    options: TrainingOptions,
    config: NetConfig,
    buffers: TrainingBuffers,
    shuffle_rng: XorShiftRng,
}

impl Trainer {

    pub fn new(options: TrainingOptions) -> Result<Self> {
        let config = options.net_config()?;
        let buffers = TrainingBuffers::for_net(&config)?;
        let shuffle_seed = options.seed.as_ref().map(|seed| format!("{}/shuffle", seed));
        Ok(Trainer {
            shuffle_rng: new_rng(shuffle_seed.as_ref().map(String::as_str)),
            options,
            config,
            buffers,
        })
    }

    #[inline]
    pub fn options(&self) -> &TrainingOptions {
        &self.options
    }

    #[inline]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Weight buffer for this topology filled uniformly from `[-1, 1]`.
    pub fn new_weights(&self) -> Result<WeightBuffer> {
        let mut initializer = match &self.options.seed {
            Some(seed) => RandomInitializer::new_with_seed(&format!("{}/weights", seed)),
            None => RandomInitializer::new_from_entropy(),
        };
        let mut weights = WeightBuffer::allocate(&self.config)?;
        weights.fill(&mut initializer);
        Ok(weights)
    }

    fn linear_step(&self) -> Box<dyn LinearStep> {
        match self.options.objective {
            Objective::SquaredLoss => Box::new(SquaredLossStep::new(self.options.gamma0)),
            Objective::MarginRegularized { c, s } => Box::new(MarginStep::new(self.options.gamma0, c, s)),
        }
    }

    pub fn train(&mut self, examples: &mut ExampleSet, weights: &mut WeightBuffer) -> Result<TrainingResult> {
        let epochs = self.options.epochs;
        self.run_epochs(examples, weights, epochs)
    }

    /// Shuffles and steps through `examples` `epochs` times. The final weights
    /// are left in `weights`.
    pub fn run_epochs(
        &mut self,
        examples: &mut ExampleSet,
        weights: &mut WeightBuffer,
        epochs: usize,
    ) -> Result<TrainingResult> {

        if examples.feature_count() != self.config.feature_count() {
            return Err(Error::Config(format!(
                "examples have {} features, network expects {}",
                examples.feature_count(), self.config.feature_count()
            )));
        }
        if weights.config() != &self.config {
            return Err(Error::Config("weight buffer does not match the network topology".to_string()));
        }

        info!(
            "training {} hidden layers of {} nodes over {} examples for {} epochs, gamma0 = {}, objective = {:?}",
            self.config.layer_count(), self.config.layer_node_count(), examples.len(),
            epochs, self.options.gamma0, self.options.objective
        );

        let start_time = Instant::now();

        let mut linear_step = if self.config.is_linear() {
            Some(self.linear_step())
        } else {
            None
        };

        let config = &self.config;
        let gamma0 = self.options.gamma0;
        let TrainingBuffers { spare_weights, cache, deltas, error_stats } = &mut self.buffers;
        let mut pingpong = PingPong::new(weights, spare_weights);

        for epoch in 0..epochs {

            examples.shuffle(&mut self.shuffle_rng, self.options.shuffle);
            error_stats.reset();

            for (input, expected) in examples.iter() {
                let (current, next) = pingpong.pair();
                let loss = match linear_step.as_mut() {
                    Some(step) => step.step(current.as_slice(), next.layer_mut(0), input, expected),
                    None => network_step(config, current, next, cache, deltas, input, expected, gamma0),
                };
                error_stats.report(loss);
                pingpong.swap();
            }

            debug!("epoch {}: mean error = {}, max error = {}", epoch + 1, error_stats.mean(), error_stats.max());
        }

        let steps = pingpong.swaps();
        pingpong.finish();

        let duration = start_time.elapsed();
        info!("finished {} steps in {}s", steps, duration.as_secs_f32());

        Ok(TrainingResult {
            error_stats: error_stats.clone(),
            epochs,
            steps,
            duration,
        })
    }

}

/// Trains a fresh network on all but one fold and evaluates it on the held-out
/// fold, once per fold.
pub fn cross_validate(options: &TrainingOptions, examples: &ExampleSet, folds: usize) -> Result<Vec<Evaluation>> {
    let mut evaluations = Vec::with_capacity(folds);
    for fold in 0..folds {
        let (mut train, test) = examples.fold(folds, fold)?;
        let mut trainer = Trainer::new(options.clone())?;
        let mut weights = trainer.new_weights()?;
        trainer.train(&mut train, &mut weights)?;
        let evaluation = Predictor::new(trainer.config())?.evaluate(&weights, &test)?;
        info!("fold {} of {}: {}", fold + 1, folds, evaluation);
        evaluations.push(evaluation);
    }
    Ok(evaluations)
}
