//! Stepping helpers shared by list, combo, text box and page control input.

/// Move `cur` by `delta` within `0..count`, wrapping at both ends.
pub fn step_circular(cur: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let count = count as isize;
    ((cur as isize % count) + delta).rem_euclid(count) as usize
}

/// Like [`step_circular`], but with no current row a forward step lands on
/// the first row and a backward step on the last.
pub fn step_from(cur: Option<usize>, delta: isize, count: usize) -> usize {
    match cur {
        Some(cur) => step_circular(cur, delta, count),
        None if delta > 0 => step_circular(count.saturating_sub(1), delta, count),
        None => step_circular(0, delta, count),
    }
}

/// Move `top` by `delta`, clamped to `0..=max_top`.
pub fn clamp_scroll(top: usize, delta: isize, max_top: usize) -> usize {
    (top as isize + delta).clamp(0, max_top as isize) as usize
}

/// First row of the page that shows `item` when pages are `rows` tall.
pub fn page_top(item: usize, rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    (item / rows) * rows
}
