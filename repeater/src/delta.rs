use alloc::vec;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{DeltaOp, InstanceId};

/// Computes the ordered patch turning `old` into `new`.
///
/// Removals come first (descending), then moves, then insertions (ascending). Survivors on a
/// longest increasing subsequence of their target positions stay put, so the number of moves is
/// minimal.
pub(crate) fn diff(old: &[InstanceId], new: &[InstanceId]) -> Vec<DeltaOp> {
    let new_pos: KeyMap<InstanceId, usize> = new.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let old_pos: KeyMap<InstanceId, usize> = old.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut ops = Vec::new();
    for (index, &id) in old.iter().enumerate().rev() {
        if !new_pos.contains_key(&id) {
            ops.push(DeltaOp::Remove { index, id });
        }
    }

    let mut working: Vec<InstanceId> = old
        .iter()
        .copied()
        .filter(|id| new_pos.contains_key(id))
        .collect();
    let targets: Vec<usize> = working.iter().map(|id| new_pos[id]).collect();
    let stable = longest_increasing_mask(&targets);

    let mut placed = vec![false; new.len()];
    let mut floating = Vec::new();
    for ((&id, &target), &keep) in working.iter().zip(&targets).zip(&stable) {
        if keep {
            placed[target] = true;
        } else {
            floating.push((target, id));
        }
    }
    floating.sort_unstable();

    for (target, id) in floating {
        let Some(from) = working.iter().position(|&w| w == id) else {
            continue;
        };
        working.remove(from);
        let to = (0..target)
            .rev()
            .find(|&j| placed[j])
            .and_then(|j| working.iter().position(|&w| w == new[j]))
            .map_or(0, |i| i + 1);
        working.insert(to, id);
        placed[target] = true;
        if from != to {
            ops.push(DeltaOp::Move { from, to, id });
        }
    }

    for (index, &id) in new.iter().enumerate() {
        if !old_pos.contains_key(&id) {
            ops.push(DeltaOp::Insert { index, id });
        }
    }
    ops
}

fn longest_increasing_mask(seq: &[usize]) -> Vec<bool> {
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; seq.len()];
    for (i, &v) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < v);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut mask = vec![false; seq.len()];
    let mut cur = tails.last().copied();
    while let Some(i) = cur {
        mask[i] = true;
        cur = prev[i];
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<InstanceId> {
        raw.iter().map(|&n| InstanceId(n)).collect()
    }

    fn apply(mut view: Vec<InstanceId>, ops: &[DeltaOp]) -> Vec<InstanceId> {
        for op in ops {
            match *op {
                DeltaOp::Remove { index, id } => assert_eq!(view.remove(index), id),
                DeltaOp::Move { from, to, id } => {
                    assert_eq!(view.remove(from), id);
                    view.insert(to, id);
                }
                DeltaOp::Insert { index, id } => view.insert(index, id),
            }
        }
        view
    }

    #[test]
    fn identical_views_produce_no_ops() {
        let v = ids(&[1, 2, 3]);
        assert!(diff(&v, &v).is_empty());
    }

    #[test]
    fn rotation_is_a_single_move() {
        let old = ids(&[1, 2, 3, 4, 5]);
        let new = ids(&[2, 3, 4, 5, 1]);
        let ops = diff(&old, &new);
        assert_eq!(
            ops,
            [DeltaOp::Move {
                from: 0,
                to: 4,
                id: InstanceId(1)
            }]
        );
        assert_eq!(apply(old, &ops), new);
    }

    #[test]
    fn removals_are_descending_and_inserts_ascending() {
        let old = ids(&[1, 2, 3, 4]);
        let new = ids(&[5, 2, 4, 6]);
        let ops = diff(&old, &new);
        assert_eq!(
            ops,
            [
                DeltaOp::Remove {
                    index: 2,
                    id: InstanceId(3)
                },
                DeltaOp::Remove {
                    index: 0,
                    id: InstanceId(1)
                },
                DeltaOp::Insert {
                    index: 0,
                    id: InstanceId(5)
                },
                DeltaOp::Insert {
                    index: 3,
                    id: InstanceId(6)
                },
            ]
        );
        assert_eq!(apply(old, &ops), new);
    }

    #[test]
    fn reversal_applies_cleanly() {
        let old = ids(&[1, 2, 3, 4, 5, 6]);
        let new = ids(&[6, 5, 4, 3, 2, 1]);
        let ops = diff(&old, &new);
        assert_eq!(ops.len(), 5);
        assert_eq!(apply(old, &ops), new);
    }

    #[test]
    fn lis_mask_marks_one_longest_run() {
        let mask = longest_increasing_mask(&[3, 0, 1, 4, 2]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 3);
        assert!(mask[1] && mask[2]);
    }
}
