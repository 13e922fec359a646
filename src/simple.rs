use crate::candidate::Candidate;
use crate::compressor::Compressor;
use crate::config::CompressorConfig;
use crate::constants::{is_reserved, Token};
use crate::decompressor::Decompressor;
use crate::discovery;
use crate::errors::{TocoError, TocoResult};
use crate::result::CompressionResult;

/// Takes in tokens and an exact configuration and returns the compression
/// result, including the serialized stream.
///
/// Will return an error if the config is invalid, the input contains
/// reserved ids, the meta-token pool is exhausted, or (with `verify` set)
/// the round trip fails.
pub fn compress(tokens: &[Token], config: &CompressorConfig) -> TocoResult<CompressionResult> {
  Compressor::from_config(config.clone())?.compress(tokens)
}

/// Takes in a serialized stream and the configuration it was produced with
/// and returns the original tokens.
///
/// Works for hierarchical and non-hierarchical streams alike; a stream with
/// no dictionary frame is returned unchanged.
pub fn decompress(serialized: &[Token], config: &CompressorConfig) -> TocoResult<Vec<Token>> {
  Decompressor::from_config(config)?.decompress(serialized)
}

/// Runs pattern discovery alone, for inspection: every candidate within the
/// length bounds that clears the compressibility pre-filter, with its
/// non-overlapping positions.
pub fn discover_patterns(
  tokens: &[Token],
  min_len: usize,
  max_len: usize,
) -> TocoResult<Vec<Candidate>> {
  let config = CompressorConfig::default().with_len_range(min_len, max_len);
  config.validate()?;
  if let Some(&bad) = tokens.iter().find(|&&t| is_reserved(t)) {
    return Err(TocoError::reserved_token(format!(
      "input contains engine-reserved token {}",
      bad,
    )));
  }
  Ok(discovery::discover(tokens, &config, &[]))
}

/// Round-trip predicate: decompresses `result.serialized` (under the config
/// the result was produced with) and compares with `tokens`.
pub fn verify(tokens: &[Token], result: &CompressionResult) -> bool {
  match Decompressor::from_config(&result.config) {
    Ok(decompressor) => decompressor
      .decompress(&result.serialized)
      .map_or(false, |recovered| recovered == tokens),
    Err(_) => false,
  }
}
