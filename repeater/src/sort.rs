use alloc::vec::Vec;
use core::cmp::Ordering;

/// Stable bottom-up merge sort that stops at the first comparator error.
///
/// Unlike `slice::sort_by`, this never panics on a comparator that is not a total order; the
/// result is then merely unspecified (but deterministic).
pub(crate) fn try_stable_sort<E>(
    v: &mut Vec<usize>,
    mut cmp: impl FnMut(usize, usize) -> Result<Ordering, E>,
) -> Result<(), E> {
    let n = v.len();
    if n < 2 {
        return Ok(());
    }

    let mut buf = v.clone();
    let mut width = 1;
    while width < n {
        let mut start = 0;
        while start < n {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j, mut k) = (start, mid, start);
            while i < mid && j < end {
                // Take from the right run only when strictly smaller.
                if cmp(v[j], v[i])? == Ordering::Less {
                    buf[k] = v[j];
                    j += 1;
                } else {
                    buf[k] = v[i];
                    i += 1;
                }
                k += 1;
            }
            let rest = mid - i;
            buf[k..k + rest].copy_from_slice(&v[i..mid]);
            k += rest;
            buf[k..k + (end - j)].copy_from_slice(&v[j..end]);
            start = end;
        }
        core::mem::swap(v, &mut buf);
        width *= 2;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn sorts_stably() {
        let keys = [3, 1, 2, 1, 3, 0];
        let mut order: Vec<usize> = (0..keys.len()).collect();
        try_stable_sort::<()>(&mut order, |a, b| Ok(keys[a].cmp(&keys[b]))).unwrap();
        assert_eq!(order, vec![5, 1, 3, 2, 0, 4]);
    }

    #[test]
    fn stops_on_error() {
        let mut order: Vec<usize> = (0..8).collect();
        let err = try_stable_sort(&mut order, |a, _| if a == 3 { Err(a) } else { Ok(Ordering::Equal) });
        assert_eq!(err, Err(3));
    }

    #[test]
    fn inconsistent_comparator_does_not_panic() {
        let mut order: Vec<usize> = (0..33).collect();
        let res = try_stable_sort::<()>(&mut order, |a, b| Ok(if (a + b) % 3 == 0 { Ordering::Less } else { Ordering::Greater }));
        assert!(res.is_ok());
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..33).collect::<Vec<_>>());
    }
}
