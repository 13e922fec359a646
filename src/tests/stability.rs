//! Determinism and cross-config stability.

use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::constants::Token;
use crate::errors::TocoResult;
use crate::{
  compress, decompress, discover_patterns, Compressor, CompressorConfig, DiscoveryMode,
  SelectionMode,
};

fn noisy_repeats(seed: u64, len: usize) -> Vec<Token> {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
  let mut tokens = Vec::with_capacity(len);
  while tokens.len() < len {
    let motif: Vec<Token> = (0..rng.gen_range(2..=5))
      .map(|_| rng.gen_range(0..6))
      .collect();
    for _ in 0..rng.gen_range(1..=4) {
      tokens.extend_from_slice(&motif);
    }
    tokens.push(rng.gen_range(0..6));
  }
  tokens.truncate(len);
  tokens
}

#[test]
fn test_separate_compressor_instances_agree() -> TocoResult<()> {
  let tokens = noisy_repeats(11, 300);
  let config = CompressorConfig::default();
  let a = Compressor::from_config(config.clone())?.compress(&tokens)?;
  let b = Compressor::from_config(config)?.compress(&tokens)?;
  assert_eq!(a.serialized, b.serialized);
  assert_eq!(a.dictionary, b.dictionary);
  assert_eq!(a.body, b.body);
  Ok(())
}

#[test]
fn test_discovery_output_order_stable() -> TocoResult<()> {
  let tokens = noisy_repeats(12, 250);
  let first = discover_patterns(&tokens, 2, 8)?;
  let second = discover_patterns(&tokens, 2, 8)?;
  assert_eq!(first, second);
  for candidate in &first {
    assert!(candidate.len() >= 2);
    assert!(candidate.len() <= 8);
    for w in candidate.positions.windows(2) {
      assert!(w[1] >= w[0] + candidate.len());
    }
  }
  Ok(())
}

#[test]
fn test_decompression_ignores_producing_algorithm() -> TocoResult<()> {
  // the stream only depends on the marker layout, so any config with the
  // same marker setting can decode it
  let tokens = noisy_repeats(13, 200);
  let reader = CompressorConfig::default();
  for discovery in [
    DiscoveryMode::SuffixArray,
    DiscoveryMode::SlidingWindow,
    DiscoveryMode::Bpe,
  ] {
    for selection in [
      SelectionMode::Greedy,
      SelectionMode::Optimal,
      SelectionMode::Beam,
    ] {
      let writer = CompressorConfig::default()
        .with_discovery(discovery)
        .with_selection(selection);
      let result = compress(&tokens, &writer)?;
      assert_eq!(
        decompress(&result.serialized, &reader)?,
        tokens,
        "discovery={:?} selection={:?}",
        discovery,
        selection,
      );
    }
  }
  Ok(())
}

#[test]
fn test_beam_width_changes_search_not_correctness() -> TocoResult<()> {
  let tokens = noisy_repeats(14, 200);
  for beam_width in [1, 2, 8, 32] {
    let config = CompressorConfig::default()
      .with_selection(SelectionMode::Beam)
      .with_beam_width(beam_width);
    let result = compress(&tokens, &config)?;
    assert!(result.compressed_length() <= tokens.len());
    assert_eq!(decompress(&result.serialized, &config)?, tokens);
  }
  Ok(())
}

#[test]
fn test_max_depth_one_matches_flat() -> TocoResult<()> {
  let tokens = noisy_repeats(15, 300);
  let flat = compress(
    &tokens,
    &CompressorConfig::default().with_hierarchical_enabled(false),
  )?;
  let depth_one = compress(&tokens, &CompressorConfig::default().with_max_depth(1))?;
  assert_eq!(flat.serialized, depth_one.serialized);
  Ok(())
}
