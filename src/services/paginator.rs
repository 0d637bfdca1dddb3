//! Page arithmetic shared by the result cache and the API.

/// Number of pages needed for `total` items. Zero items, or a zero page
/// size, yield zero pages.
#[must_use]
pub const fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Items `[page * page_size, page * page_size + page_size)`, clipped to the
/// slice. Pages past the end are empty.
#[must_use]
pub fn slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_mul(page_size) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Splits `items` into consecutive pages of `page_size`. The pages are
/// disjoint and together hold every item exactly once.
#[must_use]
pub fn split<T: Clone>(items: &[T], page_size: usize) -> Vec<Vec<T>> {
    if page_size == 0 {
        return Vec::new();
    }
    (0..items.len().div_ceil(page_size))
        .map(|page| slice(items, page, page_size).to_vec())
        .collect()
}
