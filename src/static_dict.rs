//! Caller-supplied static dictionaries.
//!
//! A static dictionary is an immutable `{meta-token → subsequence}` map
//! applied before dynamic discovery: its subsequences are substituted into
//! the input (longest match first) and the stream gains a
//! `STATIC_DICT_MARKER` so the decompressor knows to consult the same map.

use crate::constants::{is_meta, is_reserved, meta_index, Token};
use crate::errors::{TocoError, TocoResult};

#[derive(Clone, Debug, Default)]
pub struct StaticDictionary {
  entries: Vec<(Token, Vec<Token>)>,
}

impl StaticDictionary {
  /// Validates and freezes caller-supplied entries.
  ///
  /// Every meta must come from the meta-token range, every subsequence must
  /// hold at least two raw (unreserved) tokens, and metas must be unique.
  pub fn new(entries: Vec<(Token, Vec<Token>)>) -> TocoResult<Self> {
    for (i, (meta, sub)) in entries.iter().enumerate() {
      if !is_meta(*meta) {
        return Err(TocoError::invalid_config(format!(
          "static dictionary key {} is not a meta-token",
          meta,
        )));
      }
      if sub.len() < 2 {
        return Err(TocoError::invalid_config(format!(
          "static dictionary entry for {} is shorter than 2 tokens",
          meta,
        )));
      }
      if sub.iter().any(|&t| is_reserved(t)) {
        return Err(TocoError::invalid_config(format!(
          "static dictionary entry for {} contains reserved tokens",
          meta,
        )));
      }
      if entries[..i].iter().any(|(other, _)| other == meta) {
        return Err(TocoError::invalid_config(format!(
          "duplicate static dictionary key {}",
          meta,
        )));
      }
    }
    Ok(Self { entries })
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn lookup(&self, meta: Token) -> Option<&[Token]> {
    self
      .entries
      .iter()
      .find(|(m, _)| *m == meta)
      .map(|(_, sub)| sub.as_slice())
  }

  /// One past the highest meta index in use; dynamic allocation starts here.
  pub(crate) fn reserved_meta_indices(&self) -> usize {
    self
      .entries
      .iter()
      .map(|(meta, _)| meta_index(*meta) + 1)
      .max()
      .unwrap_or(0)
  }

  /// Substitutes every entry into `tokens`, longest subsequence first at
  /// each position.
  pub(crate) fn apply(&self, tokens: &[Token]) -> Vec<Token> {
    let mut by_len: Vec<usize> = (0..self.entries.len()).collect();
    by_len.sort_by_key(|&i| (std::cmp::Reverse(self.entries[i].1.len()), self.entries[i].0));

    let mut out = Vec::with_capacity(tokens.len());
    let mut cursor = 0;
    'outer: while cursor < tokens.len() {
      for &i in &by_len {
        let (meta, sub) = &self.entries[i];
        if tokens[cursor..].starts_with(sub) {
          out.push(*meta);
          cursor += sub.len();
          continue 'outer;
        }
      }
      out.push(tokens[cursor]);
      cursor += 1;
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::constants::{meta_token, DICT_START};
  use crate::errors::ErrorKind;

  #[test]
  fn test_apply_longest_first() {
    let dict = StaticDictionary::new(vec![
      (meta_token(0), vec![1, 2]),
      (meta_token(1), vec![1, 2, 3]),
    ])
    .unwrap();
    assert_eq!(
      dict.apply(&[1, 2, 3, 0, 1, 2, 0]),
      vec![meta_token(1), 0, meta_token(0), 0],
    );
    assert_eq!(dict.reserved_meta_indices(), 2);
  }

  #[test]
  fn test_invalid_entries_rejected() {
    let invalid = vec![
      vec![(DICT_START, vec![1, 2])],
      vec![(meta_token(0), vec![1])],
      vec![(meta_token(0), vec![1, DICT_START])],
      vec![
        (meta_token(0), vec![1, 2]),
        (meta_token(0), vec![3, 4]),
      ],
    ];
    for entries in invalid {
      let err = StaticDictionary::new(entries).unwrap_err();
      assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }
  }
}
