use serde::Serialize;

/// Cards per page in the project grid (three rows of three)
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// One page worth of items plus how many pages there are in total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Never 0; an empty list still has "page 1 of 1"
    pub page_count: usize,
}

/// Number of pages needed for `total` items, at least 1
pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    let full = total / page_size;
    let partial = usize::from(total % page_size != 0);
    (full + partial).max(1)
}

/// Slice out a 1-based page.
///
/// Does not clamp: asking for a page past the end gives an empty page, so
/// callers that want "last page instead" clamp before calling. Page 0 is
/// read as page 1 and a page size of 0 as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);

    let slice = if start >= items.len() {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(items.len());
        items[start..end].to_vec()
    };

    Page {
        items: slice,
        page_count: page_count(items.len(), page_size),
    }
}
