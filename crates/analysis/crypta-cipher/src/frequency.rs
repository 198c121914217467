//! Character Frequency Model
//!
//! Relative character frequencies of a reference corpus, used to score how
//! much a candidate decryption looks like the corpus language.

use crypta_config::AnalysisConfig;
use crypta_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Character frequency distribution built from reference text.
///
/// A character seen `k` times out of `N` characters has frequency `k / N`.
/// Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyModel {
    frequencies: HashMap<char, f64>,
    total_chars: usize,
}

impl FrequencyModel {
    /// Count every character of `text` and normalize by the total count
    pub fn build(text: &str) -> Self {
        let mut counts: HashMap<char, usize> = HashMap::new();
        let mut total_chars = 0;

        for c in text.chars() {
            *counts.entry(c).or_insert(0) += 1;
            total_chars += 1;
        }

        let frequencies = counts
            .into_iter()
            .map(|(c, n)| (c, n as f64 / total_chars as f64))
            .collect();

        Self {
            frequencies,
            total_chars,
        }
    }

    /// Build from a corpus file.
    ///
    /// Invalid UTF-8 is replaced, not rejected, one U+FFFD per invalid byte
    /// exactly as [`score`](Self::score) decodes candidates.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| Error::IoError(format!("{}: {}", path.display(), e)))?;
        let model = Self::build(&decode_chars(&bytes).collect::<String>());

        tracing::debug!(
            path = %path.display(),
            chars = model.total_chars,
            distinct = model.len(),
            "Built frequency model"
        );
        Ok(model)
    }

    /// Build from the corpus named in the analysis config
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let path = config.corpus_path.as_ref().ok_or(Error::MissingCorpus)?;
        Self::from_path(path)
    }

    /// Frequency of `c`, 0.0 if the corpus never contained it
    pub fn frequency(&self, c: char) -> f64 {
        self.frequencies.get(&c).copied().unwrap_or(0.0)
    }

    /// Number of characters in the source corpus
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Number of distinct characters
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Mean per-character frequency of a candidate buffer.
    ///
    /// The buffer is decoded as UTF-8 with every invalid byte counted as one
    /// U+FFFD. Unknown characters contribute 0.0. Empty input scores 0.0.
    pub fn score(&self, candidate: &[u8]) -> f64 {
        let (sum, count) = decode_chars(candidate)
            .fold((0.0, 0usize), |(sum, count), c| (sum + self.frequency(c), count + 1));

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Top N most frequent characters, ties broken by character order
    pub fn top_chars(&self, n: usize) -> Vec<(char, f64)> {
        let mut sorted: Vec<_> = self.frequencies.iter().map(|(&c, &f)| (c, f)).collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        sorted.truncate(n);
        sorted
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::SerializationError(e.to_string()))
    }

    /// Load a model shipped as JSON, rejecting one that could not have come
    /// from [`build`](Self::build)
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self =
            serde_json::from_str(json).map_err(|e| Error::SerializationError(e.to_string()))?;
        model.check_consistent()?;
        Ok(model)
    }

    fn check_consistent(&self) -> Result<()> {
        if self.total_chars == 0 || self.frequencies.is_empty() {
            if self.total_chars != 0 || !self.frequencies.is_empty() {
                return Err(Error::SerializationError(format!(
                    "{} frequencies for {} characters",
                    self.frequencies.len(),
                    self.total_chars
                )));
            }
            return Ok(());
        }

        let total = self.total_chars as f64;
        let mut sum = 0.0;
        for (&c, &frequency) in &self.frequencies {
            if !frequency.is_finite() || frequency < 0.0 {
                return Err(Error::SerializationError(format!(
                    "frequency of {:?} is {}",
                    c, frequency
                )));
            }
            let count = frequency * total;
            if (count - count.round()).abs() > 1e-6 {
                return Err(Error::SerializationError(format!(
                    "frequency of {:?} is not a count out of {}",
                    c, self.total_chars
                )));
            }
            sum += frequency;
        }

        if (sum - 1.0).abs() > 1e-9 {
            return Err(Error::SerializationError(format!("frequencies sum to {}", sum)));
        }
        Ok(())
    }
}

/// Decode bytes as UTF-8, yielding U+FFFD for each byte of an invalid sequence
pub(crate) fn decode_chars(bytes: &[u8]) -> impl Iterator<Item = char> + '_ {
    bytes.utf8_chunks().flat_map(|chunk| {
        chunk.valid().chars().chain(
            std::iter::repeat(char::REPLACEMENT_CHARACTER).take(chunk.invalid().len()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_exact_ratios() {
        let model = FrequencyModel::build("HELLO WORLD");
        assert_eq!(model.total_chars(), 11);
        assert_eq!(model.frequency('L'), 3.0 / 11.0);
        assert_eq!(model.frequency('O'), 2.0 / 11.0);
        assert_eq!(model.frequency(' '), 1.0 / 11.0);
        assert_eq!(model.frequency('z'), 0.0);
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let model = FrequencyModel::build(include_str!("../testdata/english.txt"));
        let sum: f64 = model.frequencies.values().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {}", sum);
    }

    #[test]
    fn test_counts_code_points_not_bytes() {
        let model = FrequencyModel::build("éée");
        assert_eq!(model.total_chars(), 3);
        assert_eq!(model.frequency('é'), 2.0 / 3.0);
        assert_eq!(model.frequency('e'), 1.0 / 3.0);
    }

    #[test]
    fn test_empty_model_scores_zero() {
        let model = FrequencyModel::build("");
        assert!(model.is_empty());
        assert_eq!(model.total_chars(), 0);
        assert_eq!(model.score(b"anything"), 0.0);
    }

    #[test]
    fn test_score_empty_candidate() {
        let model = FrequencyModel::build("abc");
        let score = model.score(b"");
        assert_eq!(score, 0.0);
        assert!(!score.is_nan());
    }

    #[test]
    fn test_score_is_mean_frequency() {
        let model = FrequencyModel::build("aab");
        // (2/3 + 1/3 + 0) / 3
        let expected = (2.0 / 3.0 + 1.0 / 3.0 + 0.0) / 3.0;
        assert!((model.score(b"abz") - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_utf8_counts_each_byte() {
        let model = FrequencyModel::build("aaaa");
        // 'a' plus two invalid bytes: 1.0 / 3
        assert!((model.score(&[b'a', 0xFF, 0xFE]) - 1.0 / 3.0).abs() < 1e-12);

        let chars: Vec<char> = decode_chars(&[0xE2, 0x82, b'x']).collect();
        assert_eq!(
            chars,
            vec![char::REPLACEMENT_CHARACTER, char::REPLACEMENT_CHARACTER, 'x']
        );
    }

    #[test]
    fn test_top_chars() {
        let model = FrequencyModel::build("AAABBC");
        let top = model.top_chars(2);
        assert_eq!(top[0].0, 'A');
        assert_eq!(top[1].0, 'B');
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_english_space_dominates() {
        let model = FrequencyModel::build(include_str!("../testdata/english.txt"));
        assert_eq!(model.top_chars(1)[0].0, ' ');
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abba\xFF").unwrap();

        let model = FrequencyModel::from_path(file.path()).unwrap();
        assert_eq!(model.total_chars(), 5);
        assert_eq!(model.frequency('a'), 2.0 / 5.0);
        assert_eq!(model.frequency(char::REPLACEMENT_CHARACTER), 1.0 / 5.0);
    }

    #[test]
    fn test_from_path_truncated_sequence() {
        // E2 82 starts a 3-byte sequence that 'x' cuts short
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\xE2\x82x").unwrap();

        let model = FrequencyModel::from_path(file.path()).unwrap();
        assert_eq!(model.total_chars(), 4);
        assert_eq!(model.total_chars(), decode_chars(b"a\xE2\x82x").count());
        assert_eq!(model.frequency(char::REPLACEMENT_CHARACTER), 2.0 / 4.0);
        assert_eq!(model.frequency('x'), 1.0 / 4.0);
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrequencyModel::from_path(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_from_config_without_corpus() {
        let err = FrequencyModel::from_config(&AnalysisConfig::default()).unwrap_err();
        assert_eq!(err, Error::MissingCorpus);
    }

    #[test]
    fn test_json_roundtrip() {
        let model = FrequencyModel::build("the quick brown fox");
        let restored = FrequencyModel::from_json(&model.to_json().unwrap()).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn test_from_json_accepts_built_models() {
        let json = r#"{"frequencies":{"a":0.25,"b":0.75},"total_chars":4}"#;
        let model = FrequencyModel::from_json(json).unwrap();
        assert_eq!(model, FrequencyModel::build("abbb"));

        let empty = FrequencyModel::from_json(r#"{"frequencies":{},"total_chars":0}"#).unwrap();
        assert_eq!(empty, FrequencyModel::build(""));

        let english = FrequencyModel::build(include_str!("../testdata/english.txt"));
        assert_eq!(FrequencyModel::from_json(&english.to_json().unwrap()).unwrap(), english);
    }

    #[test]
    fn test_from_json_rejects_inconsistent_models() {
        let cases = [
            // does not sum to 1
            r#"{"frequencies":{"a":0.7},"total_chars":1}"#,
            // negative frequency
            r#"{"frequencies":{"a":1.5,"b":-0.5},"total_chars":2}"#,
            // 0.5 of 3 characters is not a whole count
            r#"{"frequencies":{"a":0.5,"b":0.5},"total_chars":3}"#,
            r#"{"frequencies":{},"total_chars":4}"#,
            r#"{"frequencies":{"a":1.0},"total_chars":0}"#,
        ];

        for json in cases {
            assert!(
                matches!(FrequencyModel::from_json(json), Err(Error::SerializationError(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            FrequencyModel::from_json("{not json"),
            Err(Error::SerializationError(_))
        ));
    }
}
