//! Beam-search selection.
//!
//! Walks occurrences in start order; each beam state branches into *skip*
//! and, when the occurrence clears the state's frontier, *take*. A take
//! scores the pattern's per-occurrence gain `L − 1`, paying the one-time
//! dictionary overhead `2 + δ` exactly when the pattern's count crosses
//! into compressibility. The final state is chosen by exact post-quota
//! savings rather than raw score, since a raw score cannot see that an
//! under-quota pattern's takes are worthless.

use std::collections::HashMap;

use crate::candidate::Occurrence;
use crate::cost;

#[derive(Clone, Default)]
struct State {
  score: i64,
  last_end: usize,
  taken: Vec<usize>,
  counts: HashMap<usize, usize>,
}

impl State {
  fn quota_savings(&self, occurrences: &[Occurrence], overhead: usize) -> i64 {
    let mut len_of: HashMap<usize, usize> = HashMap::new();
    for &idx in &self.taken {
      len_of.insert(occurrences[idx].pattern, occurrences[idx].len);
    }
    self
      .counts
      .iter()
      .filter(|&(pattern, &count)| count >= cost::min_occurrences(len_of[pattern], overhead))
      .map(|(pattern, &count)| cost::pattern_savings(len_of[pattern], count, overhead))
      .sum()
  }
}

pub(super) fn initial(
  occurrences: &[Occurrence],
  overhead: usize,
  beam_width: usize,
) -> Vec<Occurrence> {
  let mut order: Vec<usize> = (0..occurrences.len()).collect();
  order.sort_unstable_by_key(|&i| {
    let occ = &occurrences[i];
    (occ.start, occ.len, occ.pattern)
  });

  let mut states = vec![State::default()];
  for &idx in &order {
    let occ = &occurrences[idx];
    let mut next: Vec<State> = Vec::with_capacity(states.len() * 2);
    for state in &states {
      next.push(state.clone());
      if occ.start >= state.last_end {
        let mut taken_state = state.clone();
        let count = taken_state.counts.entry(occ.pattern).or_insert(0);
        *count += 1;
        let crossing = *count == cost::min_occurrences(occ.len, overhead);
        taken_state.score += (occ.len as i64 - 1)
          - if crossing {
            (2 + overhead) as i64
          } else {
            0
          };
        taken_state.last_end = occ.end();
        taken_state.taken.push(idx);
        next.push(taken_state);
      }
    }
    next.sort_by(|a, b| {
      b.score
        .cmp(&a.score)
        .then(a.taken.len().cmp(&b.taken.len()))
        .then(a.last_end.cmp(&b.last_end))
    });
    next.truncate(beam_width);
    states = next;
  }

  let best = states
    .into_iter()
    .max_by(|a, b| {
      a.quota_savings(occurrences, overhead)
        .cmp(&b.quota_savings(occurrences, overhead))
        .then(a.score.cmp(&b.score))
        .then(b.taken.len().cmp(&a.taken.len()))
    })
    .unwrap_or_default();
  best.taken.iter().map(|&idx| occurrences[idx]).collect()
}
