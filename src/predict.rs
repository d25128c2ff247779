use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::{
    buffer::WeightBuffer,
    data::ExampleSet,
    error::{try_alloc, AllocSite, Error, Result},
    layer::{dot, forward_hidden},
    net::NetConfig,
    stats::{ConfusionMatrix, Evaluation},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {

    #[inline]
    pub fn from_output(output: f64) -> Self {
        if output >= 0.0 {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        *self == Label::Positive
    }

    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            Label::Positive => 1.0,
            Label::Negative => -1.0,
        }
    }

}

/// Forward-only evaluation of trained weights. Owns two scratch rows that the
/// hidden layers alternate between, so predicting never allocates.
pub struct Predictor {
    config: NetConfig,
    buffer_a: Vec<f64>,
    buffer_b: Vec<f64>,
}

impl Predictor {

    pub fn new(config: &NetConfig) -> Result<Self> {
        let width = if config.is_linear() {
            0
        } else {
            config.layer_node_count().checked_add(1).ok_or(Error::OutOfMemory(AllocSite::Scratch))?
        };
        Ok(Predictor {
            config: *config,
            buffer_a: try_alloc(0.0, width, AllocSite::Scratch)?,
            buffer_b: try_alloc(0.0, width, AllocSite::Scratch)?,
        })
    }

    #[inline]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    fn check_weights(&self, weights: &WeightBuffer) -> Result<()> {
        if weights.config() != &self.config {
            return Err(Error::Config("weight buffer does not match the network topology".to_string()));
        }
        Ok(())
    }

    fn check_features(&self, feature_count: usize) -> Result<()> {
        if feature_count != self.config.feature_count() {
            return Err(Error::Config(format!(
                "examples have {} features, network expects {}",
                feature_count, self.config.feature_count()
            )));
        }
        Ok(())
    }

    /// Raw network output for one example.
    pub fn output(&mut self, weights: &WeightBuffer, input: &[f64]) -> Result<f64> {
        self.check_weights(weights)?;
        self.check_features(input.len())?;
        Ok(self.forward(weights, input))
    }

    #[inline]
    pub fn predict(&mut self, weights: &WeightBuffer, input: &[f64]) -> Result<Label> {
        self.output(weights, input).map(Label::from_output)
    }

    fn forward(&mut self, weights: &WeightBuffer, input: &[f64]) -> f64 {

        if self.config.is_linear() {
            return dot(weights.layer(0), input);
        }

        let activation_fn = self.config.activation_fn();
        let mut previous = &mut self.buffer_a;
        let mut current = &mut self.buffer_b;

        forward_hidden(activation_fn, weights.layer(0), self.config.input_width(0), input, current);
        for layer in 1..self.config.layer_count() {
            std::mem::swap(&mut previous, &mut current);
            forward_hidden(activation_fn, weights.layer(layer), self.config.input_width(layer), previous, current);
        }
        dot(weights.output_layer(), current)
    }

    /// Confusion counts relative to the positive class. Labels are read by sign.
    pub fn evaluate(&mut self, weights: &WeightBuffer, examples: &ExampleSet) -> Result<Evaluation> {
        self.check_weights(weights)?;
        self.check_features(examples.feature_count())?;
        let mut matrix = ConfusionMatrix::new();
        for (input, label) in examples {
            let estimated = Label::from_output(self.forward(weights, input));
            matrix.record(estimated.is_positive(), label > 0.0);
        }
        Ok(matrix.evaluation())
    }

    pub fn write_predictions(
        &mut self,
        weights: &WeightBuffer,
        examples: &ExampleSet,
        ids: Option<&[String]>,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let writer = csv::Writer::from_path(path)?;
        self.write_predictions_to(weights, examples, ids, writer)
    }

    /// One `example_id,label` row per example, the label written as 1 or 0.
    ///
    /// With `ids` the n-th id names the n-th example and both lists must have
    /// the same length; without, examples are numbered from 0.
    pub fn write_predictions_to<W: Write>(
        &mut self,
        weights: &WeightBuffer,
        examples: &ExampleSet,
        ids: Option<&[String]>,
        mut writer: csv::Writer<W>,
    ) -> Result<()> {
        self.check_weights(weights)?;
        self.check_features(examples.feature_count())?;
        if let Some(ids) = ids {
            if ids.len() != examples.len() {
                return Err(Error::Parse(
                    ids.len().min(examples.len()) + 1,
                    format!("{} example ids for {} examples", ids.len(), examples.len()),
                ));
            }
        }

        let mut numbered = String::new();
        for (index, (input, _)) in examples.iter().enumerate() {
            let example_id = match ids {
                Some(ids) => ids[index].as_str(),
                None => {
                    numbered.clear();
                    numbered.push_str(&index.to_string());
                    numbered.as_str()
                },
            };
            let label = if Label::from_output(self.forward(weights, input)).is_positive() { 1 } else { 0 };
            writer.serialize(PredictionRecord { example_id, label })?;
        }
        writer.flush()?;
        Ok(())
    }

}

#[derive(Serialize)]
struct PredictionRecord<'a> {
    example_id: &'a str,
    label: u8,
}

#[derive(Serialize)]
struct ReportRecord<'a> {
    dataset: &'a str,
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1: f64,
    true_positive: u32,
    true_negative: u32,
    false_positive: u32,
    false_negative: u32,
}

impl<'a> ReportRecord<'a> {
    fn new(dataset: &'a str, evaluation: &Evaluation) -> Self {
        ReportRecord {
            dataset,
            accuracy: evaluation.accuracy,
            precision: evaluation.precision,
            recall: evaluation.recall,
            f1: evaluation.f1,
            true_positive: evaluation.true_positive,
            true_negative: evaluation.true_negative,
            false_positive: evaluation.false_positive,
            false_negative: evaluation.false_negative,
        }
    }
}

pub fn write_report(rows: &[(&str, Evaluation)], path: impl AsRef<Path>) -> Result<()> {
    write_report_to(rows, csv::Writer::from_path(path)?)
}

pub fn write_report_to<W: Write>(rows: &[(&str, Evaluation)], mut writer: csv::Writer<W>) -> Result<()> {
    for (dataset, evaluation) in rows {
        writer.serialize(ReportRecord::new(dataset, evaluation))?;
    }
    writer.flush()?;
    Ok(())
}
