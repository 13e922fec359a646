//! Token-level framing of the compressed stream:
//! `[STATIC_DICT_MARKER] DICT_START entry* DICT_END body`.
//!
//! Entries are written back-to-back with no separators. With length markers
//! each entry reads `meta LEN(len) t_1 … t_len`; without them an entry's sub
//! runs until the next meta-token or `DICT_END`, which is unambiguous only
//! while subs contain no meta-tokens (config validation forbids the
//! hierarchical + marker-free combination for exactly this reason).

use crate::constants::{
  is_len_marker, is_meta, len_marker, len_marker_value, Token, DICT_END, DICT_START,
  STATIC_DICT_MARKER,
};
use crate::dictionary::Dictionary;
use crate::errors::{TocoError, TocoResult};

pub(crate) fn serialize(
  static_dict_used: bool,
  dictionary: &Dictionary,
  body: &[Token],
  length_markers: bool,
) -> Vec<Token> {
  let overhead = usize::from(length_markers);
  let mut out =
    Vec::with_capacity(3 + dictionary.serialized_len(overhead) + body.len());
  if static_dict_used {
    out.push(STATIC_DICT_MARKER);
  }
  out.push(DICT_START);
  for entry in dictionary.entries() {
    out.push(entry.meta);
    if length_markers {
      out.push(len_marker(entry.sub.len()));
    }
    out.extend_from_slice(&entry.sub);
  }
  out.push(DICT_END);
  out.extend_from_slice(body);
  out
}

/// A parsed stream: dictionary entries in stream order plus the body slice.
pub(crate) struct Parsed<'a> {
  pub static_dict_used: bool,
  pub entries: Vec<(Token, Vec<Token>)>,
  pub body: &'a [Token],
}

/// Splits a stream into dictionary entries and body.
///
/// A stream that does not begin with a dictionary frame is returned whole as
/// the body (raw token sequences decompress to themselves); stray reserved
/// tokens in such a body surface later, during expansion.
pub(crate) fn parse(serialized: &[Token], length_markers: bool) -> TocoResult<Parsed> {
  let static_dict_used = serialized.first() == Some(&STATIC_DICT_MARKER);
  let dict_offset = usize::from(static_dict_used);

  if serialized.get(dict_offset) != Some(&DICT_START) {
    if static_dict_used {
      return Err(TocoError::malformed(
        "static dictionary marker not followed by DICT_START",
      ));
    }
    return Ok(Parsed {
      static_dict_used: false,
      entries: Vec::new(),
      body: serialized,
    });
  }

  let mut entries: Vec<(Token, Vec<Token>)> = Vec::new();
  let mut i = dict_offset + 1;
  loop {
    let token = *serialized
      .get(i)
      .ok_or_else(|| TocoError::malformed("missing DICT_END"))?;
    if token == DICT_END {
      i += 1;
      break;
    }
    if !is_meta(token) {
      return Err(TocoError::malformed(format!(
        "expected meta-token at dictionary entry start, found {}",
        token,
      )));
    }
    if entries.iter().any(|(meta, _)| *meta == token) {
      return Err(TocoError::malformed(format!(
        "duplicate dictionary entry for meta-token {}",
        token,
      )));
    }
    i += 1;

    let sub = if length_markers {
      let marker = *serialized
        .get(i)
        .ok_or_else(|| TocoError::malformed("missing length marker"))?;
      if !is_len_marker(marker) {
        return Err(TocoError::malformed(format!(
          "expected length marker after meta-token {}, found {}",
          token, marker,
        )));
      }
      let len = len_marker_value(marker);
      if len == 0 {
        return Err(TocoError::malformed("zero-length dictionary entry"));
      }
      i += 1;
      let sub = serialized
        .get(i..i + len)
        .ok_or_else(|| TocoError::malformed("length marker overruns the stream"))?;
      if sub.iter().any(|&t| t == DICT_START || t == DICT_END || is_len_marker(t)) {
        return Err(TocoError::malformed(format!(
          "inconsistent length marker for meta-token {}",
          token,
        )));
      }
      i += len;
      sub.to_vec()
    } else {
      let start = i;
      while let Some(&t) = serialized.get(i) {
        if is_meta(t) || t == DICT_END {
          break;
        }
        i += 1;
      }
      if i == start {
        return Err(TocoError::malformed("empty dictionary entry"));
      }
      serialized[start..i].to_vec()
    };
    entries.push((token, sub));
  }

  Ok(Parsed {
    static_dict_used,
    entries,
    body: &serialized[i..],
  })
}
