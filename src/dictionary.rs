//! Dictionary construction and body substitution.

use crate::constants::{meta_token, Token};
use crate::errors::{TocoError, TocoResult};
use crate::selection::Selection;

/// One dictionary entry: a meta-token and the subsequence it denotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DictEntry {
  pub meta: Token,
  pub sub: Vec<Token>,
  /// Hierarchical pass that produced this entry. An entry's sub may only
  /// reference meta-tokens from strictly lower generations, which
  /// structurally precludes reference cycles.
  pub(crate) generation: usize,
}

/// An ordered list of dictionary entries whose reference graph is a DAG,
/// emitted dependencies-first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dictionary {
  entries: Vec<DictEntry>,
}

impl Dictionary {
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[DictEntry] {
    &self.entries
  }

  /// The subsequence a meta-token denotes, if defined.
  pub fn lookup(&self, meta: Token) -> Option<&[Token]> {
    self
      .entries
      .iter()
      .find(|entry| entry.meta == meta)
      .map(|entry| entry.sub.as_slice())
  }

  pub(crate) fn push(&mut self, entry: DictEntry) {
    self.entries.push(entry);
  }

  /// Token count of the serialized entries, delimiters excluded.
  pub(crate) fn serialized_len(&self, overhead: usize) -> usize {
    self
      .entries
      .iter()
      .map(|entry| 1 + overhead + entry.sub.len())
      .sum()
  }

  /// Re-sorts entries so dependencies come first: ascending generation,
  /// then ascending meta id. Entries only reference strictly lower
  /// generations, so this is a topological order of the reference DAG.
  pub(crate) fn sort_topological(&mut self) {
    self
      .entries
      .sort_by_key(|entry| (entry.generation, entry.meta));
  }
}

/// Allocates meta-token ids sequentially from a bounded pool.
pub(crate) struct MetaAllocator {
  next: usize,
  limit: usize,
}

impl MetaAllocator {
  /// `first` reserves the low indices (e.g. for a static dictionary's
  /// metas); `limit` is the configured pool size.
  pub fn new(first: usize, limit: usize) -> Self {
    Self { next: first, limit }
  }

  pub fn allocate(&mut self) -> TocoResult<Token> {
    if self.next >= self.limit {
      return Err(TocoError::capacity_exceeded(format!(
        "meta-token pool exhausted (size {})",
        self.limit,
      )));
    }
    let token = meta_token(self.next);
    self.next += 1;
    Ok(token)
  }
}

/// Substitutes the selected occurrences into `tokens`, emitting each
/// occurrence's meta-token in place of its range. Returns the body and the
/// entries created for this pass, in allocation order.
///
/// Occurrences are grouped by pattern; patterns are assigned meta-tokens in
/// order of first selected occurrence, which keeps allocation deterministic.
pub(crate) fn substitute(
  tokens: &[Token],
  selection: &Selection,
  allocator: &mut MetaAllocator,
  generation: usize,
) -> TocoResult<(Vec<Token>, Vec<DictEntry>)> {
  let mut meta_of_pattern: Vec<Option<Token>> = Vec::new();
  let mut entries = Vec::new();
  let mut body = Vec::with_capacity(tokens.len());

  let mut cursor = 0usize;
  for occ in &selection.occurrences {
    debug_assert!(occ.start >= cursor);
    body.extend_from_slice(&tokens[cursor..occ.start]);

    if meta_of_pattern.len() <= occ.pattern {
      meta_of_pattern.resize(occ.pattern + 1, None);
    }
    let meta = match meta_of_pattern[occ.pattern] {
      Some(meta) => meta,
      None => {
        let meta = allocator.allocate()?;
        meta_of_pattern[occ.pattern] = Some(meta);
        entries.push(DictEntry {
          meta,
          sub: tokens[occ.start..occ.end()].to_vec(),
          generation,
        });
        meta
      }
    };
    body.push(meta);
    cursor = occ.end();
  }
  body.extend_from_slice(&tokens[cursor..]);

  Ok((body, entries))
}

/// Defensive check that `entries` are in dependency order: a referenced
/// meta-token that is itself an entry must already have appeared. References
/// to metas outside the list (a static dictionary's) are fine anywhere.
#[cfg(debug_assertions)]
pub(crate) fn assert_topological(entries: &[DictEntry]) {
  use std::collections::HashSet;

  use crate::constants::{is_meta, Token};

  let keys: HashSet<Token> = entries.iter().map(|entry| entry.meta).collect();
  let mut defined: HashSet<Token> = HashSet::new();
  for entry in entries {
    for &token in &entry.sub {
      if is_meta(token) && keys.contains(&token) {
        assert!(
          defined.contains(&token),
          "entry {} references {} before its definition",
          entry.meta,
          token,
        );
      }
    }
    defined.insert(entry.meta);
  }
}
