use std::time::Duration;

use crate::constants::{
  DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEN, DEFAULT_META_POOL_SIZE,
  DEFAULT_MIN_IMPROVEMENT, DEFAULT_MIN_LEN, MAX_LEN_MARKER, MAX_META_POOL_SIZE,
};
use crate::errors::{TocoError, TocoResult};

/// Which pattern discovery strategy to run.
///
/// All strategies honor the same output contract: candidates with
/// non-overlapping positions, pre-filtered by the compressibility
/// inequality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiscoveryMode {
  /// Suffix-array + LCP-interval discovery. Finds every repeated
  /// subsequence within the length bounds in `O(n log n)`.
  #[default]
  SuffixArray,
  /// Hash-grouped fixed-width windows, one sweep per pattern length.
  /// Simpler and sometimes faster on short inputs.
  SlidingWindow,
  /// Iterative adjacent-pair merging. Only discovers patterns built from
  /// frequent pairs, but degrades gracefully on low-repetition inputs.
  Bpe,
}

/// Which occurrence selection algorithm to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionMode {
  /// Savings-density greedy with quota refinement. `O(m log m)`.
  Greedy,
  /// Weighted interval scheduling by dynamic programming, then quota
  /// refinement. `O(m log m)`, maximizes amortized savings.
  #[default]
  Optimal,
  /// Beam search over take/skip decisions, keeping up to `beam_width`
  /// partial selections.
  Beam,
}

/// All configuration available for a compression operation.
///
/// The same config must be supplied to [`decompress`][crate::decompress] so
/// the parser knows whether length markers were embedded.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct CompressorConfig {
  /// Inclusive lower bound on pattern length (default 2).
  ///
  /// Must be at least 2; a length-1 "pattern" can never satisfy the
  /// compressibility inequality.
  pub min_len: usize,
  /// Inclusive upper bound on pattern length (default 8).
  pub max_len: usize,
  /// Pattern discovery strategy (default suffix array).
  pub discovery: DiscoveryMode,
  /// Occurrence selection algorithm (default optimal).
  pub selection: SelectionMode,
  /// Number of partial selections retained by beam selection (default 8).
  pub beam_width: usize,
  /// Whether to run multiple passes so that later dictionary entries may
  /// reference earlier meta-tokens (default true).
  pub hierarchical_enabled: bool,
  /// Maximum number of passes when hierarchical compression is enabled
  /// (default 3).
  pub max_depth: usize,
  /// Early-stop threshold on the per-pass length reduction fraction
  /// (default 0.02). A pass shrinking the working sequence by less than
  /// this fraction ends the hierarchical loop.
  pub min_improvement: f64,
  /// Whether each dictionary entry embeds a `LEN(k)` marker before its
  /// subsequence (default true). Adds 1 token of overhead per entry and
  /// makes the stream parseable even when entries reference meta-tokens.
  pub length_markers_enabled: bool,
  /// Maximum meta-tokens allocatable per operation (default 500).
  /// Exhausting the pool fails the operation with `CapacityExceeded`.
  pub meta_pool_size: usize,
  /// Minimum count of independent positions a subsumed candidate needs to
  /// survive pruning. `None` (the default) means the candidate's own
  /// compressibility threshold `C_min`.
  pub min_independent: Option<usize>,
  /// Whether to decompress the produced stream and assert token-by-token
  /// equality with the input before returning (default false).
  pub verify: bool,
  /// Optional soft deadline. The engine polls a monotonic clock between
  /// stages and fails with `Timeout` once the deadline has elapsed; it
  /// never interrupts a stage mid-flight.
  pub deadline: Option<Duration>,
}

impl Default for CompressorConfig {
  fn default() -> Self {
    Self {
      min_len: DEFAULT_MIN_LEN,
      max_len: DEFAULT_MAX_LEN,
      discovery: DiscoveryMode::default(),
      selection: SelectionMode::default(),
      beam_width: DEFAULT_BEAM_WIDTH,
      hierarchical_enabled: true,
      max_depth: DEFAULT_MAX_DEPTH,
      min_improvement: DEFAULT_MIN_IMPROVEMENT,
      length_markers_enabled: true,
      meta_pool_size: DEFAULT_META_POOL_SIZE,
      min_independent: None,
      verify: false,
      deadline: None,
    }
  }
}

impl CompressorConfig {
  /// Sets [`min_len`][CompressorConfig::min_len] and
  /// [`max_len`][CompressorConfig::max_len].
  pub fn with_len_range(mut self, min_len: usize, max_len: usize) -> Self {
    self.min_len = min_len;
    self.max_len = max_len;
    self
  }

  /// Sets [`discovery`][CompressorConfig::discovery].
  pub fn with_discovery(mut self, discovery: DiscoveryMode) -> Self {
    self.discovery = discovery;
    self
  }

  /// Sets [`selection`][CompressorConfig::selection].
  pub fn with_selection(mut self, selection: SelectionMode) -> Self {
    self.selection = selection;
    self
  }

  /// Sets [`beam_width`][CompressorConfig::beam_width].
  pub fn with_beam_width(mut self, beam_width: usize) -> Self {
    self.beam_width = beam_width;
    self
  }

  /// Sets [`hierarchical_enabled`][CompressorConfig::hierarchical_enabled].
  pub fn with_hierarchical_enabled(mut self, enabled: bool) -> Self {
    self.hierarchical_enabled = enabled;
    self
  }

  /// Sets [`max_depth`][CompressorConfig::max_depth].
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Sets [`min_improvement`][CompressorConfig::min_improvement].
  pub fn with_min_improvement(mut self, min_improvement: f64) -> Self {
    self.min_improvement = min_improvement;
    self
  }

  /// Sets [`length_markers_enabled`][CompressorConfig::length_markers_enabled].
  pub fn with_length_markers_enabled(mut self, enabled: bool) -> Self {
    self.length_markers_enabled = enabled;
    self
  }

  /// Sets [`meta_pool_size`][CompressorConfig::meta_pool_size].
  pub fn with_meta_pool_size(mut self, meta_pool_size: usize) -> Self {
    self.meta_pool_size = meta_pool_size;
    self
  }

  /// Sets [`min_independent`][CompressorConfig::min_independent].
  pub fn with_min_independent(mut self, min_independent: Option<usize>) -> Self {
    self.min_independent = min_independent;
    self
  }

  /// Sets [`verify`][CompressorConfig::verify].
  pub fn with_verify(mut self, verify: bool) -> Self {
    self.verify = verify;
    self
  }

  /// Sets [`deadline`][CompressorConfig::deadline].
  pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
    self.deadline = deadline;
    self
  }

  /// Per-entry overhead δ contributed by length markers.
  pub(crate) fn marker_overhead(&self) -> usize {
    if self.length_markers_enabled {
      1
    } else {
      0
    }
  }

  pub(crate) fn validate(&self) -> TocoResult<()> {
    if self.min_len < 2 {
      return Err(TocoError::invalid_config(format!(
        "min pattern length must be at least 2 (was {})",
        self.min_len,
      )));
    }
    if self.max_len < self.min_len {
      return Err(TocoError::invalid_config(format!(
        "max pattern length must be at least min pattern length (was {} < {})",
        self.max_len, self.min_len,
      )));
    }
    if self.length_markers_enabled && self.max_len > MAX_LEN_MARKER {
      return Err(TocoError::invalid_config(format!(
        "max pattern length must fit the length marker range (was {}, limit {})",
        self.max_len, MAX_LEN_MARKER,
      )));
    }
    if self.selection == SelectionMode::Beam && self.beam_width == 0 {
      return Err(TocoError::invalid_config(
        "beam width must be positive for beam selection",
      ));
    }
    if self.max_depth == 0 {
      return Err(TocoError::invalid_config(
        "max depth must be positive",
      ));
    }
    if !self.min_improvement.is_finite() || self.min_improvement < 0.0 {
      return Err(TocoError::invalid_config(format!(
        "min improvement must be finite and non-negative (was {})",
        self.min_improvement,
      )));
    }
    if self.meta_pool_size == 0 || self.meta_pool_size > MAX_META_POOL_SIZE {
      return Err(TocoError::invalid_config(format!(
        "meta pool size must be in [1, {}] (was {})",
        MAX_META_POOL_SIZE, self.meta_pool_size,
      )));
    }
    if self.hierarchical_enabled && !self.length_markers_enabled {
      // without markers an entry whose sub contains a meta-token cannot be
      // re-parsed, so the combination is unrepresentable on the wire
      return Err(TocoError::invalid_config(
        "hierarchical compression requires length markers",
      ));
    }
    Ok(())
  }
}
