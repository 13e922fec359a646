use std::time::Instant;

use crate::config::CompressorConfig;
use crate::constants::{is_reserved, Token};
use crate::decompressor::Decompressor;
use crate::dictionary::{self, Dictionary, MetaAllocator};
use crate::discovery;
use crate::errors::{TocoError, TocoResult};
use crate::priority::{self, PriorityProvider};
use crate::result::{CompressionMetrics, CompressionResult, StageTimings};
use crate::selection;
use crate::static_dict::StaticDictionary;
use crate::subsumption;
use crate::wire;

/// Top-level entry point for compressing token sequences.
///
/// A compressor is a pure function of its configuration: it holds no state
/// across [`compress`][Self::compress] calls, and every call allocates a
/// fresh meta-token pool.
///
/// ```
/// use toco::{Compressor, CompressorConfig, Token};
/// # use toco::errors::TocoResult;
///
/// # fn main() -> TocoResult<()> {
/// let tokens: Vec<Token> = vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3];
/// let compressor = Compressor::from_config(CompressorConfig::default())?;
/// let result = compressor.compress(&tokens)?;
/// assert!(result.is_compressed());
/// assert!(result.compressed_length() < tokens.len());
/// # Ok(())
/// # }
/// ```
pub struct Compressor {
  config: CompressorConfig,
  static_dict: Option<StaticDictionary>,
  priority_providers: Vec<Box<dyn PriorityProvider>>,
  warm_start: Vec<Vec<Token>>,
}

struct Pass {
  body: Vec<Token>,
  entries: Vec<dictionary::DictEntry>,
  n_candidates: usize,
  n_pruned: usize,
  n_selected: usize,
}

impl Compressor {
  /// Will return an error if the config is invalid.
  pub fn from_config(config: CompressorConfig) -> TocoResult<Self> {
    config.validate()?;
    Ok(Self {
      config,
      static_dict: None,
      priority_providers: Vec::new(),
      warm_start: Vec::new(),
    })
  }

  /// Injects a static dictionary, pre-substituted into every input before
  /// dynamic discovery and flagged on the wire.
  pub fn with_static_dictionary(mut self, static_dict: StaticDictionary) -> Self {
    self.static_dict = Some(static_dict);
    self
  }

  /// Registers a priority scorer; contributions from all providers are
  /// summed into each candidate's priority before selection.
  pub fn with_priority_provider(mut self, provider: Box<dyn PriorityProvider>) -> Self {
    self.priority_providers.push(provider);
    self
  }

  /// Seeds depth-0 discovery with subsequences from a previous result, so
  /// cross-document pattern reuse stays a caller concern.
  pub fn with_warm_start(mut self, subsequences: Vec<Vec<Token>>) -> Self {
    self.warm_start = subsequences;
    self
  }

  pub fn config(&self) -> &CompressorConfig {
    &self.config
  }

  /// Runs the full pipeline: per-pass discovery → subsumption → selection →
  /// substitution, iterated hierarchically, then serialization with the
  /// non-expansion guarantee and (optionally) round-trip verification.
  pub fn compress(&self, tokens: &[Token]) -> TocoResult<CompressionResult> {
    let op_start = Instant::now();
    let deadline = self.config.deadline.map(|limit| op_start + limit);
    let mut timings = StageTimings::default();

    if let Some(&bad) = tokens.iter().find(|&&t| is_reserved(t)) {
      return Err(TocoError::reserved_token(format!(
        "input contains engine-reserved token {}",
        bad,
      )));
    }

    let static_dict_used = self
      .static_dict
      .as_ref()
      .map_or(false, |dict| !dict.is_empty());
    let mut working = match &self.static_dict {
      Some(dict) if static_dict_used => dict.apply(tokens),
      _ => tokens.to_vec(),
    };

    let first_meta = self
      .static_dict
      .as_ref()
      .map_or(0, |dict| dict.reserved_meta_indices());
    let mut allocator = MetaAllocator::new(first_meta, self.config.meta_pool_size);
    let mut accumulated = Dictionary::default();
    let mut metrics = CompressionMetrics::default();

    let max_depth = if self.config.hierarchical_enabled {
      self.config.max_depth
    } else {
      1
    };
    for depth in 0..max_depth {
      check_deadline(deadline)?;
      let before_len = working.len();
      let warm: &[Vec<Token>] = if depth == 0 { &self.warm_start } else { &[] };
      let Some(pass) =
        self.run_pass(&working, warm, depth, deadline, &mut allocator, &mut timings)?
      else {
        break;
      };

      metrics.n_candidates += pass.n_candidates;
      metrics.n_candidates_pruned += pass.n_pruned;
      metrics.n_occurrences_selected += pass.n_selected;
      metrics.n_passes += 1;
      for entry in pass.entries {
        accumulated.push(entry);
      }
      working = pass.body;

      let improvement = (before_len - working.len()) as f64 / before_len as f64;
      if improvement < self.config.min_improvement {
        break;
      }
    }

    accumulated.sort_topological();
    #[cfg(debug_assertions)]
    dictionary::assert_topological(accumulated.entries());

    let stage_start = Instant::now();
    let serialized = wire::serialize(
      static_dict_used,
      &accumulated,
      &working,
      self.config.length_markers_enabled,
    );
    timings.serialization += stage_start.elapsed();

    // non-expansion guarantee: a stream no shorter than the input is
    // discarded in favor of the input itself
    let result = if serialized.len() >= tokens.len() {
      metrics.n_dictionary_entries = 0;
      metrics.ratio = 1.0;
      timings.total = op_start.elapsed();
      CompressionResult {
        original: tokens.to_vec(),
        body: tokens.to_vec(),
        serialized: tokens.to_vec(),
        dictionary: Dictionary::default(),
        timings,
        metrics: Some(metrics),
        config: self.config.clone(),
      }
    } else {
      metrics.n_dictionary_entries = accumulated.len();
      metrics.ratio = serialized.len() as f64 / tokens.len() as f64;
      timings.total = op_start.elapsed();
      CompressionResult {
        original: tokens.to_vec(),
        body: working,
        serialized,
        dictionary: accumulated,
        timings,
        metrics: Some(metrics),
        config: self.config.clone(),
      }
    };

    if self.config.verify {
      let mut decompressor = Decompressor::from_config(&self.config)?;
      if let Some(dict) = &self.static_dict {
        decompressor = decompressor.with_static_dictionary(dict.clone());
      }
      let recovered = decompressor.decompress(&result.serialized)?;
      if recovered != tokens {
        return Err(TocoError::verification_failed(format!(
          "round trip produced {} tokens where {} were expected",
          recovered.len(),
          tokens.len(),
        )));
      }
    }

    Ok(result)
  }

  /// One pass over the working sequence. Returns `None` when the pass is a
  /// no-op (nothing compressible), which short-circuits the engine.
  fn run_pass(
    &self,
    working: &[Token],
    warm_start: &[Vec<Token>],
    depth: usize,
    deadline: Option<Instant>,
    allocator: &mut MetaAllocator,
    timings: &mut StageTimings,
  ) -> TocoResult<Option<Pass>> {
    let stage_start = Instant::now();
    let mut candidates = discovery::discover(working, &self.config, warm_start);
    timings.discovery += stage_start.elapsed();
    let n_candidates = candidates.len();
    priority::apply_providers(&mut candidates, &self.priority_providers, working);

    check_deadline(deadline)?;
    let stage_start = Instant::now();
    let candidates = subsumption::prune(
      candidates,
      self.config.marker_overhead(),
      self.config.min_independent,
    );
    timings.subsumption += stage_start.elapsed();
    let n_pruned = n_candidates - candidates.len();

    check_deadline(deadline)?;
    let stage_start = Instant::now();
    let selected = selection::select(&candidates, &self.config);
    timings.selection += stage_start.elapsed();
    if selected.is_empty() || selected.savings <= 0 {
      return Ok(None);
    }

    let stage_start = Instant::now();
    let (body, entries) = dictionary::substitute(working, &selected, allocator, depth)?;
    timings.dictionary += stage_start.elapsed();

    // positive savings already imply the entries cost less than the body
    // shrank; treat equality as a no-op anyway
    let growth: usize = entries
      .iter()
      .map(|entry| 1 + self.config.marker_overhead() + entry.sub.len())
      .sum();
    if working.len() - body.len() <= growth {
      return Ok(None);
    }

    Ok(Some(Pass {
      n_selected: selected.occurrences.len(),
      body,
      entries,
      n_candidates,
      n_pruned,
    }))
  }
}

fn check_deadline(deadline: Option<Instant>) -> TocoResult<()> {
  match deadline {
    Some(limit) if Instant::now() >= limit => Err(TocoError::timeout(
      "deadline elapsed between compression stages",
    )),
    _ => Ok(()),
  }
}
