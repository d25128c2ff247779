use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::{Copied, Zip};
use std::path::Path;
use std::slice::{ChunksExact, Iter};

use log::info;
use rand::Rng;

use crate::error::{AllocSite, Error, Result};

/// Feature slots per example, bias slot included.
pub const FEATURE_COUNT: usize = 361;

/// Upper bound on the examples one set may hold.
pub const MAX_EXAMPLES: usize = 0x2000;

/// How the integer label at the start of a line becomes a target value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelMode {
    /// Positive integers map to +1, everything else to -1.
    Sign,
    /// The integer is kept as a real-valued target; 0 maps to -1.
    Raw,
}

impl LabelMode {
    pub fn label_for(&self, raw: i64) -> f64 {
        match self {
            LabelMode::Sign => if raw > 0 { 1.0 } else { -1.0 },
            LabelMode::Raw => if raw == 0 { -1.0 } else { raw as f64 },
        }
    }
}

/// How an epoch reorders the examples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShuffleMode {
    /// Every index swaps with a partner drawn from the whole range. Slightly
    /// biased, kept for run-to-run compatibility with earlier tooling.
    Compat,
    /// Fisher-Yates over a shrinking range.
    Uniform,
}

/// Parses one line into `row` and returns its label.
///
/// `row[0]` becomes the bias constant 1, every other slot is reset to 0 and
/// then set from the `index:value` tokens as `1 - exp(-value)`.
pub fn parse_example(line_number: usize, line: &str, mode: LabelMode, row: &mut [f64]) -> Result<f64> {

    let mut tokens = line.split_whitespace();

    let label_token = tokens.next()
        .ok_or_else(|| Error::Parse(line_number, "missing label".to_string()))?;
    let raw_label = label_token.parse::<i64>()
        .map_err(|_| Error::Parse(line_number, format!("unable to parse label: {}", label_token)))?;

    row[0] = 1.0;
    for element in row[1..].iter_mut() {
        *element = 0.0;
    }

    for token in tokens {
        let mut parts = token.splitn(2, ':');
        let index = parts.next().and_then(|s| s.parse::<usize>().ok());
        let value = parts.next().and_then(|s| s.parse::<i64>().ok());
        match (index, value) {
            (Some(index), Some(value)) if index >= 1 && index < row.len() => {
                row[index] = 1.0 - f64::exp(-(value as f64));
            },
            (Some(index), Some(_)) => {
                return Err(Error::Parse(line_number, format!(
                    "feature index {} outside [1, {})", index, row.len()
                )));
            },
            _ => {
                return Err(Error::Parse(line_number, format!("unable to parse token: {}", token)));
            },
        }
    }

    Ok(mode.label_for(raw_label))
}

/// Examples stored row-major in one flat feature buffer, with a parallel label
/// vector.
#[derive(Clone, Debug)]
pub struct ExampleSet {
    feature_count: usize,
    features: Vec<f64>,
    labels: Vec<f64>,
}

impl ExampleSet {

    pub fn with_capacity(feature_count: usize, capacity: usize) -> Result<Self> {
        if feature_count == 0 {
            return Err(Error::Config("feature count must be greater than 0".to_string()));
        }
        if capacity > MAX_EXAMPLES {
            return Err(Error::TooManyExamples(MAX_EXAMPLES));
        }
        let mut set = ExampleSet {
            feature_count,
            features: Vec::new(),
            labels: Vec::new(),
        };
        set.reserve(capacity)?;
        Ok(set)
    }

    /// Loads every example of a file in the sparse `label index:value ...` format.
    pub fn load(path: impl AsRef<Path>, feature_count: usize, mode: LabelMode) -> Result<Self> {
        let mut set = Self::with_capacity(feature_count, 0)?;
        set.reload(path, mode)?;
        Ok(set)
    }

    /// Replaces the contents with the examples of another file, reusing storage.
    pub fn reload(&mut self, path: impl AsRef<Path>, mode: LabelMode) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let count = self.reload_from_reader(BufReader::new(file), mode)?;
        info!("loaded {} examples from {}", count, path.display());
        Ok(count)
    }

    /// Any parse failure aborts the load and leaves the set empty.
    pub fn reload_from_reader<R: BufRead>(&mut self, reader: R, mode: LabelMode) -> Result<usize> {
        self.clear();
        let result = self.read_lines(reader, mode);
        if result.is_err() {
            self.clear();
        }
        result.map(|_| self.len())
    }

    fn read_lines<R: BufRead>(&mut self, reader: R, mode: LabelMode) -> Result<()> {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            self.push_line(index + 1, &line, mode)?;
        }
        Ok(())
    }

    fn push_line(&mut self, line_number: usize, line: &str, mode: LabelMode) -> Result<()> {
        if self.len() == MAX_EXAMPLES {
            return Err(Error::TooManyExamples(MAX_EXAMPLES));
        }
        self.reserve(1)?;
        let start = self.features.len();
        self.features.resize(start + self.feature_count, 0.0);
        match parse_example(line_number, line, mode, &mut self.features[start..]) {
            Ok(label) => {
                self.labels.push(label);
                Ok(())
            },
            Err(err) => {
                self.features.truncate(start);
                Err(err)
            },
        }
    }

    /// Appends an already-encoded example. `features` must include the bias slot.
    pub fn push(&mut self, features: &[f64], label: f64) -> Result<()> {
        if features.len() != self.feature_count {
            return Err(Error::Config(format!(
                "expected {} features, got {}", self.feature_count, features.len()
            )));
        }
        if self.len() == MAX_EXAMPLES {
            return Err(Error::TooManyExamples(MAX_EXAMPLES));
        }
        self.reserve(1)?;
        self.features.extend_from_slice(features);
        self.labels.push(label);
        Ok(())
    }

    fn reserve(&mut self, additional: usize) -> Result<()> {
        let feature_slots = additional.checked_mul(self.feature_count)
            .ok_or(Error::OutOfMemory(AllocSite::Features))?;
        self.features.try_reserve(feature_slots)
            .map_err(|_| Error::OutOfMemory(AllocSite::Features))?;
        self.labels.try_reserve(additional)
            .map_err(|_| Error::OutOfMemory(AllocSite::Labels))?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.features.clear();
        self.labels.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    #[inline]
    pub fn features(&self, index: usize) -> &[f64] {
        &self.features[index * self.feature_count..(index + 1) * self.feature_count]
    }

    #[inline]
    pub fn label(&self, index: usize) -> f64 {
        self.labels[index]
    }

    #[inline]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn iter(&self) -> ExampleIter {
        self.features.chunks_exact(self.feature_count)
            .zip(self.labels.iter().copied())
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        let f = self.feature_count;
        let (head, tail) = self.features.split_at_mut(high * f);
        head[low * f..(low + 1) * f].swap_with_slice(&mut tail[..f]);
        self.labels.swap(i, j);
    }

    /// Reorders examples and labels together.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R, mode: ShuffleMode) {
        let count = self.len();
        if count < 2 {
            return;
        }
        match mode {
            ShuffleMode::Compat => {
                for i in 0..count {
                    let j = rng.gen_range(0, count);
                    self.swap(i, j);
                }
            },
            ShuffleMode::Uniform => {
                for i in (1..count).rev() {
                    let j = rng.gen_range(0, i + 1);
                    self.swap(i, j);
                }
            },
        }
    }

    /// Splits into `(train, test)`; example `i` is a test example when
    /// `i % folds == fold`.
    pub fn fold(&self, folds: usize, fold: usize) -> Result<(ExampleSet, ExampleSet)> {
        if folds < 2 || fold >= folds {
            return Err(Error::Config(format!("invalid fold {} of {}", fold, folds)));
        }
        let test_count = (self.len() + folds - 1 - fold) / folds;
        let mut train = Self::with_capacity(self.feature_count, self.len() - test_count)?;
        let mut test = Self::with_capacity(self.feature_count, test_count)?;
        for (i, (features, label)) in self.iter().enumerate() {
            if i % folds == fold {
                test.push(features, label)?;
            } else {
                train.push(features, label)?;
            }
        }
        Ok((train, test))
    }

}

/// Reads one example id per non-blank line, in file order.
pub fn load_ids(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let ids = read_ids(BufReader::new(File::open(path)?))?;
    info!("loaded {} example ids from {}", ids.len(), path.display());
    Ok(ids)
}

pub fn read_ids<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

pub type ExampleIter<'a> = Zip<ChunksExact<'a, f64>, Copied<Iter<'a, f64>>>;

impl<'a> IntoIterator for &'a ExampleSet {
    type Item = (&'a [f64], f64);
    type IntoIter = ExampleIter<'a>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::{Cursor, Write};
    use crate::utils::new_rng;

    fn set_from(text: &str, feature_count: usize) -> Result<ExampleSet> {
        let mut set = ExampleSet::with_capacity(feature_count, 0)?;
        set.reload_from_reader(Cursor::new(text), LabelMode::Sign)?;
        Ok(set)
    }

    #[test]
    fn test_read_ids() {
        let ids = read_ids(Cursor::new("17\n\n  42 \nx-9\n")).unwrap();
        assert_eq!(ids, vec!["17", "42", "x-9"]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a\nb\n").unwrap();
        assert_eq!(load_ids(file.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_example() {
        let mut row = vec![9.0; 8];
        let label = parse_example(1, "1 1:3 5:0", LabelMode::Sign, &mut row).unwrap();
        assert_eq!(label, 1.0);
        assert_eq!(row[0], 1.0);
        assert_abs_diff_eq!(row[1], 1.0 - f64::exp(-3.0), epsilon = 1e-15);
        assert_eq!(row[5], 0.0);
        for &j in &[2, 3, 4, 6, 7] {
            assert_eq!(row[j], 0.0);
        }
    }

    #[test]
    fn test_label_modes() {
        let mut row = vec![0.0; 4];
        assert_eq!(parse_example(1, "0 1:1", LabelMode::Sign, &mut row).unwrap(), -1.0);
        assert_eq!(parse_example(1, "0 1:1", LabelMode::Raw, &mut row).unwrap(), -1.0);
        assert_eq!(parse_example(1, "3", LabelMode::Sign, &mut row).unwrap(), 1.0);
        assert_eq!(parse_example(1, "3", LabelMode::Raw, &mut row).unwrap(), 3.0);
        assert_eq!(parse_example(1, "-2", LabelMode::Sign, &mut row).unwrap(), -1.0);
        assert_eq!(parse_example(1, "-2", LabelMode::Raw, &mut row).unwrap(), -2.0);
    }

    #[test]
    fn test_parse_errors() {
        let mut row = vec![0.0; 4];
        for line in &["", "x 1:1", "1 1", "1 a:1", "1 1:b", "1 0:1", "1 4:1", "1 1:2.5"] {
            match parse_example(7, line, LabelMode::Sign, &mut row) {
                Err(Error::Parse(7, _)) => (),
                other => panic!("{:?} parsed as {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_reload_skips_blank_lines() {
        let set = set_from("1 1:1\n\n0 2:2\n   \n1\n", 4).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.labels(), &[1.0, -1.0, 1.0]);
        assert_eq!(set.features(2), &[1.0, 0.0, 0.0, 0.0]);
        assert_abs_diff_eq!(set.features(1)[2], 1.0 - f64::exp(-2.0), epsilon = 1e-15);
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        match set_from("1 1:1\n1 bad\n1 2:1\n", 4) {
            Err(Error::Parse(2, _)) => (),
            other => panic!("unexpected: {:?}", other.map(|s| s.len())),
        }
        let mut set = set_from("1 1:1\n", 4).unwrap();
        assert!(set.reload_from_reader(Cursor::new("1 1:1\n1 9:1\n"), LabelMode::Sign).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_too_many_examples() {
        let mut text = String::new();
        for _ in 0..MAX_EXAMPLES + 1 {
            text.push_str("1 1:1\n");
        }
        match set_from(&text, 2) {
            Err(Error::TooManyExamples(MAX_EXAMPLES)) => (),
            other => panic!("unexpected: {:?}", other.map(|s| s.len())),
        }
        assert!(ExampleSet::with_capacity(2, MAX_EXAMPLES + 1).is_err());
        assert_eq!(set_from(&text[6..], 2).unwrap().len(), MAX_EXAMPLES);
    }

    #[test]
    fn test_load_and_reload_from_file() {
        let mut train = tempfile::NamedTempFile::new().unwrap();
        writeln!(train, "1 1:1 2:2").unwrap();
        writeln!(train, "0 3:1").unwrap();
        let mut test = tempfile::NamedTempFile::new().unwrap();
        writeln!(test, "1 3:4").unwrap();

        let mut set = ExampleSet::load(train.path(), 4, LabelMode::Sign).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.reload(test.path(), LabelMode::Sign).unwrap(), 1);
        assert_eq!(set.len(), 1);
        assert_abs_diff_eq!(set.features(0)[3], 1.0 - f64::exp(-4.0), epsilon = 1e-15);
    }

    #[test]
    fn test_missing_file() {
        match ExampleSet::load("/nonexistent/data.train", 4, LabelMode::Sign) {
            Err(Error::Io(_)) => (),
            other => panic!("unexpected: {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_shuffle_keeps_pairs() {
        for &mode in &[ShuffleMode::Compat, ShuffleMode::Uniform] {
            let mut set = ExampleSet::with_capacity(3, 50).unwrap();
            for i in 0..50 {
                set.push(&[1.0, i as f64, -(i as f64)], i as f64).unwrap();
            }
            let mut rng = new_rng(Some("shuffle"));
            set.shuffle(&mut rng, mode);
            let mut seen: Vec<f64> = Vec::new();
            for (features, label) in &set {
                assert_eq!(features, &[1.0, label, -label]);
                seen.push(label);
            }
            assert_ne!(seen, (0..50).map(|i| i as f64).collect::<Vec<f64>>());
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(seen, (0..50).map(|i| i as f64).collect::<Vec<f64>>());
        }
    }

    #[test]
    fn test_shuffle_compat_is_repeatable() {
        let mut a = ExampleSet::with_capacity(1, 10).unwrap();
        for i in 0..10 {
            a.push(&[1.0], i as f64).unwrap();
        }
        let mut b = a.clone();
        a.shuffle(&mut new_rng(Some("x")), ShuffleMode::Compat);
        b.shuffle(&mut new_rng(Some("x")), ShuffleMode::Compat);
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn test_fold() {
        let mut set = ExampleSet::with_capacity(2, 7).unwrap();
        for i in 0..7 {
            set.push(&[1.0, i as f64], i as f64).unwrap();
        }
        let (train, test) = set.fold(3, 1).unwrap();
        assert_eq!(test.labels(), &[1.0, 4.0]);
        assert_eq!(train.labels(), &[0.0, 2.0, 3.0, 5.0, 6.0]);
        assert_eq!(test.features(1), &[1.0, 4.0]);
        assert!(set.fold(1, 0).is_err());
        assert!(set.fold(3, 3).is_err());
    }

}
