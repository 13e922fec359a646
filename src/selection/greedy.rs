//! Savings-density greedy selection.

use crate::candidate::{Candidate, Occurrence};
use crate::constants::PRIORITY_DENSITY_COEFF;

use super::{fits, occupancy};

fn density(occ: &Occurrence) -> f64 {
  (occ.len as f64 - 1.0) / occ.len as f64 + PRIORITY_DENSITY_COEFF * occ.priority as f64
}

/// Occurrence indices ordered by savings density descending, with the
/// deterministic tie-breaks (ascending start, length, subsequence).
pub(super) fn density_order(candidates: &[Candidate], occurrences: &[Occurrence]) -> Vec<usize> {
  let mut order: Vec<usize> = (0..occurrences.len()).collect();
  order.sort_by(|&i, &j| {
    let (a, b) = (&occurrences[i], &occurrences[j]);
    density(b)
      .partial_cmp(&density(a))
      .unwrap()
      .then(a.start.cmp(&b.start))
      .then(a.len.cmp(&b.len))
      .then(candidates[a.pattern].sub.cmp(&candidates[b.pattern].sub))
  });
  order
}

/// Walks occurrences in density order, accepting each whose range is
/// disjoint from everything accepted so far. Quota enforcement happens in
/// the shared refinement loop afterwards.
pub(super) fn initial(
  candidates: &[Candidate],
  occurrences: &[Occurrence],
  _overhead: usize,
) -> Vec<Occurrence> {
  let mut accepted = Vec::new();
  let mut occupied = occupancy(&accepted);
  for idx in density_order(candidates, occurrences) {
    let occ = &occurrences[idx];
    if fits(&occupied, occ) {
      occupied.insert(occ.start, occ.end());
      accepted.push(*occ);
    }
  }
  accepted
}
