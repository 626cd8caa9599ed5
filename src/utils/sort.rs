use core::cmp::Ordering;

/// Ranking comparator: primary key descending, secondary key ascending.
/// Secondary keys are expected to be unique within one ranking, which
/// makes the order total and independent of input order.
#[inline(always)]
pub fn rank_order<P: Ord, S: Ord + ?Sized>(a: (P, &S), b: (P, &S)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Keep the first `n` items under `cmp`, sorted.
/// - `n == 0` returns an empty vec
/// - `n >= len` sorts everything
///
/// Complexity: O(len) selection + O(n log n) for the kept prefix
#[inline]
pub fn top_n_by<T, F>(mut items: Vec<T>, n: usize, cmp: F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    if n == 0 {
        items.clear();
        return items;
    }
    if n < items.len() {
        // 先頭 n 個だけ残してからソート
        items.select_nth_unstable_by(n - 1, &cmp);
        items.truncate(n);
    }
    items.sort_unstable_by(&cmp);
    items
}
