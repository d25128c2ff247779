use std::{f64, fmt};

use serde::Serialize;

#[derive(Clone)]
pub struct Stats {
    sum: f64,
    count: u32,
    max: f64,
    min: f64
}

impl fmt::Debug for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), std::fmt::Error> {
        f.debug_struct("Stats")
            .field("count", &self.count)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("sum", &self.sum)
            .field("mean", &self.mean())
            .finish()
    }
}

impl Stats {

    pub fn new() -> Self {
        Stats {
            sum: 0.0,
            count: 0,
            max: f64::NAN,
            min: f64::NAN
        }
    }

    #[inline]
    pub fn report(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        if self.min.is_nan() || self.min > value {
            self.min = value;
        }
        if self.max.is_nan() || self.max < value {
            self.max = value;
        }
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
        self.max = f64::NAN;
        self.min = f64::NAN;
    }
}


/// Confusion counts relative to the positive class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfusionMatrix {
    count: u32,
    true_positive: u32,
    true_negative: u32,
    false_positive: u32,
    false_negative: u32,
}

impl ConfusionMatrix {

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, estimated: bool, actual: bool) {
        if estimated {
            if actual {
                self.true_positive += 1;
            } else {
                self.false_positive += 1;
            }
        } else {
            if actual {
                self.false_negative += 1;
            } else {
                self.true_negative += 1;
            }
        }
        self.count += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> u32 { self.count }
    pub fn true_positive(&self) -> u32 { self.true_positive }
    pub fn true_negative(&self) -> u32 { self.true_negative }
    pub fn false_positive(&self) -> u32 { self.false_positive }
    pub fn false_negative(&self) -> u32 { self.false_negative }

    pub fn accuracy(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.true_positive + self.true_negative) as f64 / self.count as f64
    }

    /// Precision and recall fall back to 1 when their false count is 0 and there
    /// are no true positives, and to 0 otherwise.
    pub fn precision(&self) -> f64 {
        if self.true_positive > 0 {
            self.true_positive as f64 / (self.true_positive + self.false_positive) as f64
        } else if self.false_positive == 0 {
            1.0
        } else {
            0.0
        }
    }

    pub fn recall(&self) -> f64 {
        if self.true_positive > 0 {
            self.true_positive as f64 / (self.true_positive + self.false_negative) as f64
        } else if self.false_negative == 0 {
            1.0
        } else {
            0.0
        }
    }

    pub fn f1(&self) -> f64 {
        if self.true_positive == 0 {
            return 0.0;
        }
        let p = self.precision();
        let r = self.recall();
        2.0 * p * r / (p + r)
    }

    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            accuracy: self.accuracy(),
            precision: self.precision(),
            recall: self.recall(),
            f1: self.f1(),
            true_positive: self.true_positive,
            true_negative: self.true_negative,
            false_positive: self.false_positive,
            false_negative: self.false_negative,
        }
    }

}

/// Metrics of one pass over a labelled example set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positive: u32,
    pub true_negative: u32,
    pub false_positive: u32,
    pub false_negative: u32,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}\t{:.3}\t{:.3}\t{:.3}", self.accuracy, self.precision, self.recall, self.f1)
    }
}
