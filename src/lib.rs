//! Online classifiers over sparse `index:value` examples: a regularized linear
//! unit and a fixed-width multilayer network trained by stochastic
//! backpropagation, both over a single flat weight buffer.
//!
//! ```no_run
//! use sparse_net::{ExampleSet, LabelMode, Predictor, Trainer, TrainingOptionsBuilder};
//!
//! # fn main() -> sparse_net::Result<()> {
//! let options = TrainingOptionsBuilder::default().layer_count(1).layer_node_count(16).finish()?;
//! let mut examples = ExampleSet::load("train.txt", options.feature_count, LabelMode::Sign)?;
//! let mut trainer = Trainer::new(options)?;
//! let mut weights = trainer.new_weights()?;
//! trainer.train(&mut examples, &mut weights)?;
//! let evaluation = Predictor::new(trainer.config())?.evaluate(&weights, &examples)?;
//! println!("{}", evaluation);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate quick_error;

#[macro_use]
extern crate derive_builder;

mod buffer;
mod data;
mod error;
mod func;
mod initializer;
mod layer;
mod net;
mod predict;
mod stats;
mod train;
mod utils;

pub use crate::{
    buffer::{ForwardCache, RowBuffer, WeightBuffer},
    data::{load_ids, parse_example, read_ids, ExampleSet, LabelMode, ShuffleMode, FEATURE_COUNT, MAX_EXAMPLES},
    error::{AllocSite, Error, Result},
    func::{ActivationFn, ErrorFn, LearningRateFn},
    initializer::RandomInitializer,
    net::NetConfig,
    predict::{write_report, write_report_to, Label, Predictor},
    stats::{ConfusionMatrix, Evaluation, Stats},
    train::{
        compute_deltas,
        cross_validate,
        network_step,
        propagate,
        LinearStep,
        MarginStep,
        Objective,
        PingPong,
        SquaredLossStep,
        Trainer,
        TrainingBuffers,
        TrainingOptions,
        TrainingOptionsBuilder,
        TrainingResult,
    },
};
