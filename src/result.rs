use std::time::Duration;

use crate::config::CompressorConfig;
use crate::constants::Token;
use crate::decompressor::Decompressor;
use crate::dictionary::Dictionary;

/// Wall-clock time spent in each compression stage, accumulated across
/// hierarchical passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
  pub discovery: Duration,
  pub subsumption: Duration,
  pub selection: Duration,
  pub dictionary: Duration,
  pub serialization: Duration,
  pub total: Duration,
}

/// Counters describing what a compression operation did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompressionMetrics {
  /// Passes that produced substitutions.
  pub n_passes: usize,
  /// Candidates discovered across all passes, pre-pruning.
  pub n_candidates: usize,
  /// Candidates removed by subsumption pruning.
  pub n_candidates_pruned: usize,
  /// Occurrences substituted across all passes.
  pub n_occurrences_selected: usize,
  /// Final dictionary entry count.
  pub n_dictionary_entries: usize,
  /// `compressed_length / original_length`; 1.0 when nothing compressed.
  pub ratio: f64,
}

/// The immutable outcome of one compression operation.
#[derive(Clone, Debug)]
pub struct CompressionResult {
  /// The input, untouched.
  pub original: Vec<Token>,
  /// The working sequence after all substitutions (no dictionary framing).
  pub body: Vec<Token>,
  /// The full serialized stream: dictionary frame plus body, or the
  /// original sequence verbatim when compression did not pay off.
  pub serialized: Vec<Token>,
  /// Meta-token definitions, topologically ordered, dependencies first.
  pub dictionary: Dictionary,
  pub timings: StageTimings,
  pub metrics: Option<CompressionMetrics>,
  /// The configuration used, kept so the result is self-describing (a
  /// stream can only be parsed knowing whether length markers were
  /// embedded).
  pub config: CompressorConfig,
}

impl CompressionResult {
  pub fn original_length(&self) -> usize {
    self.original.len()
  }

  pub fn compressed_length(&self) -> usize {
    self.serialized.len()
  }

  /// `compressed_length / original_length`, or 1.0 for empty input.
  pub fn compression_ratio(&self) -> f64 {
    if self.original.is_empty() {
      1.0
    } else {
      self.serialized.len() as f64 / self.original.len() as f64
    }
  }

  /// Whether the serialized stream is strictly shorter than the input.
  pub fn is_compressed(&self) -> bool {
    self.serialized.len() < self.original.len()
  }

  /// Round-trip self-test: decompresses `serialized` and compares with
  /// `original`. Results produced with a static dictionary need
  /// [`verify_with`][Self::verify_with] instead.
  pub fn verify(&self) -> bool {
    match Decompressor::from_config(&self.config) {
      Ok(decompressor) => self.verify_with(&decompressor),
      Err(_) => false,
    }
  }

  /// Round-trip self-test through a caller-built decompressor.
  pub fn verify_with(&self, decompressor: &Decompressor) -> bool {
    decompressor
      .decompress(&self.serialized)
      .map_or(false, |recovered| recovered == self.original)
  }
}
