//! Weighted-interval-scheduling selection.
//!
//! Occurrences are scheduled by the classic `O(m log m)` dynamic program
//! over end-sorted intervals with binary-searched predecessors. Each
//! occurrence of a pattern with `count` available positions weighs
//! `(L − 1) − (1 + L + δ)/count`: the per-occurrence gain with the
//! pattern's dictionary overhead amortized across its positions, so the DP
//! cannot be lured into long patterns whose entries cost more than they
//! save. Equal-value decisions resolve to "skip", yielding the selection
//! with fewer occurrences.

use crate::candidate::{Candidate, Occurrence};

pub(super) fn initial(
  candidates: &[Candidate],
  occurrences: &[Occurrence],
  overhead: usize,
) -> Vec<Occurrence> {
  let mut order: Vec<usize> = (0..occurrences.len()).collect();
  order.sort_unstable_by_key(|&i| {
    let occ = &occurrences[i];
    (occ.end(), occ.start, occ.len)
  });
  let ends: Vec<usize> = order.iter().map(|&i| occurrences[i].end()).collect();
  let weights: Vec<f64> = order
    .iter()
    .map(|&i| {
      let occ = &occurrences[i];
      let count = candidates[occ.pattern].count();
      (occ.len as f64 - 1.0) - (1 + occ.len + overhead) as f64 / count as f64
    })
    .collect();

  let m = order.len();
  let mut dp = vec![0.0f64; m + 1];
  let mut take = vec![false; m];
  let mut pred = vec![0usize; m];
  for i in 0..m {
    let start = occurrences[order[i]].start;
    // predecessor: count of sorted occurrences ending at or before `start`
    let p = ends[..i].partition_point(|&end| end <= start);
    pred[i] = p;
    let with = dp[p] + weights[i];
    if with > dp[i] {
      dp[i + 1] = with;
      take[i] = true;
    } else {
      dp[i + 1] = dp[i];
    }
  }

  let mut accepted = Vec::new();
  let mut i = m;
  while i > 0 {
    if take[i - 1] {
      accepted.push(occurrences[order[i - 1]]);
      i = pred[i - 1];
    } else {
      i -= 1;
    }
  }
  accepted.reverse();
  accepted
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_takes_every_compatible_occurrence() {
    let candidates = vec![Candidate::new(vec![1, 2, 3], vec![0, 3, 6, 9, 12])];
    let occurrences = super::super::explode(&candidates);
    let accepted = initial(&candidates, &occurrences, 1);
    assert_eq!(accepted.len(), 5);
  }

  #[test]
  fn test_amortized_weights_prefer_paying_patterns() {
    // the period-6 pattern's entry costs 8 tokens against 10 saved; the
    // period-3 pattern amortizes to the same per-occurrence weight but
    // fields five occurrences
    let candidates = vec![
      Candidate::new(vec![1, 2, 3], vec![0, 3, 6, 9, 12]),
      Candidate::new(vec![1, 2, 3, 1, 2, 3], vec![0, 6]),
    ];
    let occurrences = super::super::explode(&candidates);
    let accepted = initial(&candidates, &occurrences, 1);
    assert!(accepted.iter().all(|o| o.pattern == 0));
    assert_eq!(accepted.len(), 5);
  }

  #[test]
  fn test_zero_weight_occurrences_skipped() {
    // 4 occurrences of a pair with markers: savings 4·1 − 4 = 0, so the
    // amortized weight is 0 and nothing should be taken
    let candidates = vec![Candidate::new(vec![5, 6], vec![0, 2, 4, 6])];
    let occurrences = super::super::explode(&candidates);
    let accepted = initial(&candidates, &occurrences, 1);
    assert!(accepted.is_empty());
  }
}
