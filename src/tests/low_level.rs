//! Builder-level tests: static dictionaries, priority providers, and
//! warm-started discovery through the `Compressor`/`Decompressor` API.

use crate::candidate::Candidate;
use crate::constants::{meta_token, Token, STATIC_DICT_MARKER};
use crate::errors::TocoResult;
use crate::{
  verify, Compressor, CompressorConfig, Decompressor, DiscoveryMode, PriorityProvider,
  SelectionMode, StaticDictionary,
};

#[test]
fn test_static_dictionary_round_trip() -> TocoResult<()> {
  let tokens: Vec<Token> = vec![5, 6, 7, 0, 5, 6, 7, 1, 5, 6, 7, 2];
  let entries = vec![(meta_token(0), vec![5, 6, 7])];
  let config = CompressorConfig::default().with_verify(true);

  let compressor = Compressor::from_config(config.clone())?
    .with_static_dictionary(StaticDictionary::new(entries.clone())?);
  let result = compressor.compress(&tokens)?;

  assert_eq!(result.serialized.first(), Some(&STATIC_DICT_MARKER));
  assert!(result.compressed_length() < tokens.len());
  assert_eq!(
    result.body,
    vec![meta_token(0), 0, meta_token(0), 1, meta_token(0), 2],
  );

  let decompressor = Decompressor::from_config(&config)?
    .with_static_dictionary(StaticDictionary::new(entries)?);
  assert_eq!(decompressor.decompress(&result.serialized)?, tokens);
  assert!(result.verify_with(&decompressor));

  // without the static dictionary the stream is unreadable
  assert!(!verify(&tokens, &result));
  Ok(())
}

#[test]
fn test_dynamic_metas_allocated_after_static() -> TocoResult<()> {
  // the static entry handles (5, 6, 7); (8, 9) is left for dynamic discovery
  let mut tokens: Vec<Token> = Vec::new();
  for _ in 0..4 {
    tokens.extend_from_slice(&[5, 6, 7, 8, 9, 8, 9]);
  }
  let entries = vec![(meta_token(0), vec![5, 6, 7])];
  let config = CompressorConfig::default().with_verify(true);

  let compressor = Compressor::from_config(config.clone())?
    .with_static_dictionary(StaticDictionary::new(entries.clone())?);
  let result = compressor.compress(&tokens)?;

  // every dynamic entry sits above the static index
  for entry in result.dictionary.entries() {
    assert!(entry.meta > meta_token(0));
  }

  let decompressor = Decompressor::from_config(&config)?
    .with_static_dictionary(StaticDictionary::new(entries)?);
  assert_eq!(decompressor.decompress(&result.serialized)?, tokens);
  Ok(())
}

struct Boost {
  sub: Vec<Token>,
  by: i32,
}

impl PriorityProvider for Boost {
  fn score(&self, candidate: &Candidate, _tokens: &[Token]) -> i32 {
    if candidate.sub == self.sub {
      self.by
    } else {
      0
    }
  }
}

#[test]
fn test_priority_provider_biases_greedy_selection() -> TocoResult<()> {
  let mut tokens: Vec<Token> = Vec::new();
  for _ in 0..6 {
    tokens.extend_from_slice(&[1, 2, 3, 4]);
  }
  let config = CompressorConfig::default()
    .with_len_range(2, 4)
    .with_selection(SelectionMode::Greedy)
    .with_hierarchical_enabled(false)
    .with_min_independent(Some(0));

  // unbiased, the length-4 pattern wins on savings density
  let neutral = Compressor::from_config(config.clone())?.compress(&tokens)?;
  assert!(neutral
    .dictionary
    .lookup(meta_token(0))
    .is_some_and(|sub| sub == [1, 2, 3, 4]));

  // a boost to (2, 3, 4) outweighs the density gap
  let biased = Compressor::from_config(config.clone())?
    .with_priority_provider(Box::new(Boost {
      sub: vec![2, 3, 4],
      by: 1,
    }))
    .compress(&tokens)?;
  assert!(biased
    .dictionary
    .lookup(meta_token(0))
    .is_some_and(|sub| sub == [2, 3, 4]));

  assert_eq!(crate::decompress(&biased.serialized, &config)?, tokens);
  Ok(())
}

#[test]
fn test_warm_start_recovers_patterns_bpe_misses() -> TocoResult<()> {
  // (9, 1, 5) repeats, but no adjacent pair repeats often enough for a
  // BPE merge to pay
  let tokens: Vec<Token> = vec![
    9, 1, 5, 2, 2, 9, 1, 5, 3, 3, 9, 1, 5, 4, 4, 9, 1, 5, 6, 6,
  ];
  let config = CompressorConfig::default().with_discovery(DiscoveryMode::Bpe);

  let cold = Compressor::from_config(config.clone())?.compress(&tokens)?;
  assert_eq!(cold.serialized, tokens);

  let warmed = Compressor::from_config(config.clone())?
    .with_warm_start(vec![vec![9, 1, 5]])
    .compress(&tokens)?;
  assert!(warmed.compressed_length() < tokens.len());
  assert_eq!(
    warmed.dictionary.lookup(meta_token(0)),
    Some([9, 1, 5].as_slice()),
  );
  assert_eq!(crate::decompress(&warmed.serialized, &config)?, tokens);
  Ok(())
}

#[test]
fn test_compressor_exposes_config() -> TocoResult<()> {
  let config = CompressorConfig::default().with_max_depth(2);
  let compressor = Compressor::from_config(config)?;
  assert_eq!(compressor.config().max_depth, 2);
  Ok(())
}
