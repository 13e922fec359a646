//! Non-overlapping occurrence selection.
//!
//! Each candidate explodes into one occurrence per position; selection picks
//! a pairwise-disjoint subset maximizing net savings, subject to the quota
//! constraint that a pattern contributes nothing unless at least `C_min` of
//! its occurrences are selected together. Three interchangeable algorithms
//! implement the search; a shared refinement loop enforces the quota.

use std::collections::{BTreeMap, HashSet};

use crate::candidate::{Candidate, Occurrence};
use crate::config::{CompressorConfig, SelectionMode};
use crate::constants::MAX_REFINEMENT_ITERS;
use crate::cost;

mod beam;
mod greedy;
mod optimal;

/// A valid selection: occurrences sorted by start, pairwise disjoint, and
/// every represented pattern meets its compressibility quota.
#[derive(Clone, Debug, Default)]
pub(crate) struct Selection {
  pub occurrences: Vec<Occurrence>,
  pub savings: i64,
}

impl Selection {
  pub fn is_empty(&self) -> bool {
    self.occurrences.is_empty()
  }
}

pub(crate) fn select(candidates: &[Candidate], config: &CompressorConfig) -> Selection {
  let occurrences = explode(candidates);
  if occurrences.is_empty() {
    return Selection::default();
  }

  let overhead = config.marker_overhead();
  let accepted = match config.selection {
    SelectionMode::Greedy => {
      let initial = greedy::initial(candidates, &occurrences, overhead);
      refine(initial, candidates, &occurrences, overhead)
    }
    SelectionMode::Optimal => {
      let initial = optimal::initial(candidates, &occurrences, overhead);
      refine(initial, candidates, &occurrences, overhead)
    }
    SelectionMode::Beam => {
      let initial = beam::initial(&occurrences, overhead, config.beam_width);
      strip_under_quota(initial, candidates, overhead)
    }
  };

  finish(accepted, candidates, overhead)
}

fn explode(candidates: &[Candidate]) -> Vec<Occurrence> {
  let mut occurrences = Vec::new();
  for (pattern, candidate) in candidates.iter().enumerate() {
    for &start in &candidate.positions {
      occurrences.push(Occurrence {
        start,
        len: candidate.len(),
        pattern,
        priority: candidate.priority,
      });
    }
  }
  occurrences
}

fn pattern_counts(accepted: &[Occurrence], n_patterns: usize) -> Vec<usize> {
  let mut counts = vec![0usize; n_patterns];
  for occ in accepted {
    counts[occ.pattern] += 1;
  }
  counts
}

/// Savings of `accepted`, counting only patterns that meet their quota.
fn selection_savings(accepted: &[Occurrence], candidates: &[Candidate], overhead: usize) -> i64 {
  pattern_counts(accepted, candidates.len())
    .iter()
    .enumerate()
    .filter(|&(pattern, &count)| {
      count >= cost::min_occurrences(candidates[pattern].len(), overhead)
    })
    .map(|(pattern, &count)| cost::pattern_savings(candidates[pattern].len(), count, overhead))
    .sum()
}

/// Drops occurrences of patterns that failed to reach their quota.
fn strip_under_quota(
  accepted: Vec<Occurrence>,
  candidates: &[Candidate],
  overhead: usize,
) -> Vec<Occurrence> {
  let counts = pattern_counts(&accepted, candidates.len());
  accepted
    .into_iter()
    .filter(|occ| counts[occ.pattern] >= cost::min_occurrences(occ.len, overhead))
    .collect()
}

/// Occupancy index for disjointness checks: start of each accepted range
/// mapped to its end.
fn occupancy(accepted: &[Occurrence]) -> BTreeMap<usize, usize> {
  accepted.iter().map(|o| (o.start, o.end())).collect()
}

fn fits(occupied: &BTreeMap<usize, usize>, occ: &Occurrence) -> bool {
  occupied
    .range(..occ.end())
    .next_back()
    .map_or(true, |(_, &end)| end <= occ.start)
}

/// Quota refinement: repeatedly drop patterns that missed their quota and
/// refill the freed ranges with other occurrences, keeping the best
/// selection (by savings) seen across at most [`MAX_REFINEMENT_ITERS`]
/// iterations. Dropped patterns are banned from re-acceptance so the loop
/// cannot oscillate.
fn refine(
  accepted: Vec<Occurrence>,
  candidates: &[Candidate],
  all: &[Occurrence],
  overhead: usize,
) -> Vec<Occurrence> {
  let refill_order = greedy::density_order(candidates, all);

  let mut current = accepted;
  let mut best = strip_under_quota(current.clone(), candidates, overhead);
  let mut best_savings = selection_savings(&best, candidates, overhead);
  let mut banned: HashSet<usize> = HashSet::new();

  for _ in 0..MAX_REFINEMENT_ITERS {
    let counts = pattern_counts(&current, candidates.len());
    let failing: Vec<usize> = (0..candidates.len())
      .filter(|&pattern| {
        counts[pattern] > 0
          && counts[pattern] < cost::min_occurrences(candidates[pattern].len(), overhead)
      })
      .collect();
    if failing.is_empty() {
      break;
    }
    banned.extend(failing);
    current.retain(|occ| !banned.contains(&occ.pattern));

    let mut occupied = occupancy(&current);
    for &idx in &refill_order {
      let occ = &all[idx];
      if !banned.contains(&occ.pattern) && fits(&occupied, occ) {
        occupied.insert(occ.start, occ.end());
        current.push(*occ);
      }
    }

    let stripped = strip_under_quota(current.clone(), candidates, overhead);
    let savings = selection_savings(&stripped, candidates, overhead);
    if savings > best_savings {
      best = stripped;
      best_savings = savings;
    }
  }

  best
}

fn finish(mut accepted: Vec<Occurrence>, candidates: &[Candidate], overhead: usize) -> Selection {
  accepted.sort_unstable_by_key(|o| o.start);
  debug_assert!(accepted.windows(2).all(|w| w[0].end() <= w[1].start));
  let savings = selection_savings(&accepted, candidates, overhead);
  Selection {
    occurrences: accepted,
    savings,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CompressorConfig;
  use crate::constants::Token;

  fn candidates_for(specs: &[(Vec<Token>, Vec<usize>)]) -> Vec<Candidate> {
    specs
      .iter()
      .map(|(sub, positions)| Candidate::new(sub.clone(), positions.clone()))
      .collect()
  }

  fn assert_disjoint(selection: &Selection) {
    for w in selection.occurrences.windows(2) {
      assert!(w[0].end() <= w[1].start);
    }
  }

  #[test]
  fn test_all_modes_select_single_obvious_pattern() {
    let candidates = candidates_for(&[(vec![1, 2], vec![0, 2, 4, 6, 8])]);
    for mode in [
      SelectionMode::Greedy,
      SelectionMode::Optimal,
      SelectionMode::Beam,
    ] {
      let config = CompressorConfig::default().with_selection(mode);
      let selection = select(&candidates, &config);
      assert_eq!(selection.occurrences.len(), 5, "mode={:?}", mode);
      assert_eq!(selection.savings, 1, "mode={:?}", mode);
      assert_disjoint(&selection);
    }
  }

  #[test]
  fn test_under_quota_pattern_rejected() {
    // 3 occurrences of a pair can never pay for the entry
    let candidates = candidates_for(&[(vec![1, 2], vec![0, 2, 4])]);
    for mode in [
      SelectionMode::Greedy,
      SelectionMode::Optimal,
      SelectionMode::Beam,
    ] {
      let config = CompressorConfig::default().with_selection(mode);
      let selection = select(&candidates, &config);
      assert!(selection.is_empty(), "mode={:?}", mode);
    }
  }

  #[test]
  fn test_optimal_prefers_dense_short_pattern_over_long() {
    // period-3 input: the period-6 pattern has weight but negative economics
    let candidates = candidates_for(&[
      (vec![1, 2, 3], vec![0, 3, 6, 9, 12]),
      (vec![1, 2, 3, 1, 2, 3], vec![0, 6]),
    ]);
    let config = CompressorConfig::default().with_selection(SelectionMode::Optimal);
    let selection = select(&candidates, &config);
    assert_eq!(selection.savings, 5);
    assert!(selection.occurrences.iter().all(|o| o.pattern == 0));
    assert_eq!(selection.occurrences.len(), 5);
  }

  #[test]
  fn test_cross_pattern_overlap_resolved() {
    let candidates = candidates_for(&[
      (vec![1, 2, 3], vec![0, 4, 7, 11]),
      (vec![2, 3, 4, 1, 2, 3], vec![1, 8]),
    ]);
    let config = CompressorConfig::default().with_selection(SelectionMode::Optimal);
    let selection = select(&candidates, &config);
    assert_disjoint(&selection);
    // four short occurrences (savings 3) beat two long ones (savings 2)
    assert_eq!(selection.savings, 3);
    assert_eq!(selection.occurrences.len(), 4);
  }

  #[test]
  fn test_empty_candidates_empty_selection() {
    let selection = select(&[], &CompressorConfig::default());
    assert!(selection.is_empty());
    assert_eq!(selection.savings, 0);
  }
}
