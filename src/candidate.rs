use crate::constants::Token;

/// A repeated pattern found by discovery: a subsequence together with a
/// non-overlapping set of start positions in the working sequence.
///
/// Invariants: `sub.len() >= 2`, `positions.len() >= 2`, positions strictly
/// ascending with `positions[i + 1] >= positions[i] + sub.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
  /// The repeated subsequence. Never contains dictionary delimiters; may
  /// contain meta-tokens from earlier hierarchical passes.
  pub sub: Vec<Token>,
  /// Strictly ascending, pairwise non-overlapping start offsets.
  pub positions: Vec<usize>,
  /// Signed tie-break hint, 0 by default; external scorers may adjust it
  /// before selection.
  pub priority: i32,
}

impl Candidate {
  pub(crate) fn new(sub: Vec<Token>, positions: Vec<usize>) -> Self {
    debug_assert!(sub.len() >= 2);
    debug_assert!(positions.len() >= 2);
    debug_assert!(positions
      .windows(2)
      .all(|w| w[1] >= w[0] + sub.len()));
    Self {
      sub,
      positions,
      priority: 0,
    }
  }

  /// The pattern length `L`.
  pub fn len(&self) -> usize {
    self.sub.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sub.is_empty()
  }

  /// The occurrence count `C` available to selection.
  pub fn count(&self) -> usize {
    self.positions.len()
  }
}

/// One concrete placement of a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Occurrence {
  pub start: usize,
  pub len: usize,
  /// Index into the candidate list this occurrence was exploded from.
  pub pattern: usize,
  pub priority: i32,
}

impl Occurrence {
  pub fn end(&self) -> usize {
    self.start + self.len
  }
}
