//! Subsumption pruning.
//!
//! A candidate `b` is subsumed by a longer candidate `a` when `b.sub` is a
//! contiguous subsequence of `a.sub` and every position of `b` lies inside
//! one of `a`'s positions. Subsumed candidates are redundant with their
//! subsumers and survive only with enough independent (uncovered) positions
//! to pay for their own dictionary entry.

use crate::candidate::Candidate;
use crate::constants::Token;
use crate::cost;

fn is_contiguous_subsequence(needle: &[Token], haystack: &[Token]) -> bool {
  needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Whether `position` of a length-`sub_len` pattern lies inside one of the
/// subsumer's occurrences.
fn covered_by(position: usize, sub_len: usize, subsumer: &Candidate) -> bool {
  let slack = subsumer.len() - sub_len;
  // positions are ascending, so a binary search would do; candidate position
  // lists are short enough that a scan reads better
  subsumer
    .positions
    .iter()
    .any(|&p| p <= position && position <= p + slack)
}

pub(crate) fn prune(
  candidates: Vec<Candidate>,
  overhead: usize,
  min_independent: Option<usize>,
) -> Vec<Candidate> {
  let n = candidates.len();
  let mut keep = vec![true; n];

  for b in 0..n {
    let threshold =
      min_independent.unwrap_or_else(|| cost::min_occurrences(candidates[b].len(), overhead));

    let subsumers: Vec<usize> = (0..n)
      .filter(|&a| {
        a != b
          && candidates[a].len() > candidates[b].len()
          && is_contiguous_subsequence(&candidates[b].sub, &candidates[a].sub)
          && candidates[b]
            .positions
            .iter()
            .all(|&p| covered_by(p, candidates[b].len(), &candidates[a]))
      })
      .collect();
    if subsumers.is_empty() {
      continue;
    }

    let independent = candidates[b]
      .positions
      .iter()
      .filter(|&&p| {
        !subsumers
          .iter()
          .any(|&a| covered_by(p, candidates[b].len(), &candidates[a]))
      })
      .count();
    if independent < threshold {
      keep[b] = false;
    }
  }

  candidates
    .into_iter()
    .zip(keep)
    .filter_map(|(c, k)| k.then_some(c))
    .collect()
}
