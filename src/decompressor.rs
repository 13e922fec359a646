use std::collections::{HashMap, HashSet};

use crate::config::CompressorConfig;
use crate::constants::{is_meta, is_reserved, Token};
use crate::errors::{TocoError, TocoResult};
use crate::static_dict::StaticDictionary;
use crate::wire;

/// Decompresses streams produced by [`Compressor`][crate::Compressor],
/// independent of which discovery/selection algorithms produced them;
/// hierarchical and flat dictionaries expand the same way.
///
/// ```
/// use toco::{CompressorConfig, Decompressor, Token};
/// # use toco::errors::TocoResult;
///
/// # fn main() -> TocoResult<()> {
/// let config = CompressorConfig::default();
/// let tokens: Vec<Token> = vec![1, 2, 1, 2, 1, 2, 1, 2, 1, 2];
/// let result = toco::compress(&tokens, &config)?;
/// let decompressor = Decompressor::from_config(&config)?;
/// assert_eq!(decompressor.decompress(&result.serialized)?, tokens);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Decompressor {
  length_markers: bool,
  static_dict: Option<StaticDictionary>,
}

impl Decompressor {
  /// Will return an error if the config is invalid.
  pub fn from_config(config: &CompressorConfig) -> TocoResult<Self> {
    config.validate()?;
    Ok(Self {
      length_markers: config.length_markers_enabled,
      static_dict: None,
    })
  }

  /// Supplies the static dictionary that was applied at compression time.
  pub fn with_static_dictionary(mut self, static_dict: StaticDictionary) -> Self {
    self.static_dict = Some(static_dict);
    self
  }

  /// Parses the dictionary frame and expands every meta-token reference
  /// recursively, memoizing expansions by meta-token id.
  ///
  /// A stream with no dictionary frame is returned as-is, so raw token
  /// sequences decompress to themselves.
  pub fn decompress(&self, serialized: &[Token]) -> TocoResult<Vec<Token>> {
    let parsed = wire::parse(serialized, self.length_markers)?;
    if parsed.static_dict_used && self.static_dict.is_none() {
      return Err(TocoError::malformed(
        "stream was compressed with a static dictionary but none was supplied",
      ));
    }

    let map: HashMap<Token, Vec<Token>> = parsed.entries.into_iter().collect();
    let mut memo: HashMap<Token, Vec<Token>> = HashMap::new();
    let mut visiting: HashSet<Token> = HashSet::new();

    let mut out = Vec::with_capacity(parsed.body.len());
    for &token in parsed.body {
      if !is_reserved(token) {
        out.push(token);
      } else if is_meta(token) {
        let expansion = self.expand(token, &map, &mut memo, &mut visiting)?;
        out.extend_from_slice(&expansion);
      } else {
        return Err(TocoError::malformed(format!(
          "reserved token {} in body",
          token,
        )));
      }
    }
    Ok(out)
  }

  fn expand(
    &self,
    meta: Token,
    map: &HashMap<Token, Vec<Token>>,
    memo: &mut HashMap<Token, Vec<Token>>,
    visiting: &mut HashSet<Token>,
  ) -> TocoResult<Vec<Token>> {
    if let Some(done) = memo.get(&meta) {
      return Ok(done.clone());
    }
    if !visiting.insert(meta) {
      return Err(TocoError::malformed(format!(
        "cyclic dictionary reference through meta-token {}",
        meta,
      )));
    }

    let sub: Vec<Token> = match map.get(&meta) {
      Some(sub) => sub.clone(),
      None => self
        .static_dict
        .as_ref()
        .and_then(|d| d.lookup(meta))
        .ok_or_else(|| {
          TocoError::malformed(format!(
            "reference to undefined meta-token {}",
            meta,
          ))
        })?
        .to_vec(),
    };

    let mut expanded = Vec::with_capacity(sub.len());
    for &token in &sub {
      if !is_reserved(token) {
        expanded.push(token);
      } else if is_meta(token) {
        let inner = self.expand(token, map, memo, visiting)?;
        expanded.extend_from_slice(&inner);
      } else {
        return Err(TocoError::malformed(format!(
          "reserved token {} inside dictionary entry for {}",
          token, meta,
        )));
      }
    }

    visiting.remove(&meta);
    memo.insert(meta, expanded.clone());
    Ok(expanded)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{len_marker, meta_token, DICT_END, DICT_START};
  use crate::errors::ErrorKind;

  fn default_decompressor() -> Decompressor {
    Decompressor::from_config(&CompressorConfig::default()).unwrap()
  }

  #[test]
  fn test_raw_stream_round_trips() {
    let tokens: Vec<Token> = vec![3, 1, 4, 1, 5];
    assert_eq!(
      default_decompressor().decompress(&tokens).unwrap(),
      tokens,
    );
  }

  #[test]
  fn test_nested_expansion_memoized() {
    let (m0, m1) = (meta_token(0), meta_token(1));
    let stream = vec![
      DICT_START,
      m0,
      len_marker(2),
      1,
      2,
      m1,
      len_marker(3),
      m0,
      m0,
      3,
      DICT_END,
      m1,
      m1,
    ];
    assert_eq!(
      default_decompressor().decompress(&stream).unwrap(),
      vec![1, 2, 1, 2, 3, 1, 2, 1, 2, 3],
    );
  }

  #[test]
  fn test_cycle_rejected() {
    let (m0, m1) = (meta_token(0), meta_token(1));
    let stream = vec![
      DICT_START,
      m0,
      len_marker(2),
      m1,
      5,
      m1,
      len_marker(2),
      m0,
      6,
      DICT_END,
      m0,
    ];
    let err = default_decompressor().decompress(&stream).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedCompressedStream);
  }

  #[test]
  fn test_undefined_meta_rejected() {
    let stream = vec![DICT_START, DICT_END, meta_token(7)];
    let err = default_decompressor().decompress(&stream).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedCompressedStream);
  }

  #[test]
  fn test_static_marker_requires_dictionary() {
    let stream = vec![
      crate::constants::STATIC_DICT_MARKER,
      DICT_START,
      DICT_END,
      meta_token(0),
    ];
    let err = default_decompressor().decompress(&stream).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MalformedCompressedStream);

    let dict =
      crate::static_dict::StaticDictionary::new(vec![(meta_token(0), vec![8, 9])]).unwrap();
    let decompressor = default_decompressor().with_static_dictionary(dict);
    assert_eq!(decompressor.decompress(&stream).unwrap(), vec![8, 9]);
  }
}
