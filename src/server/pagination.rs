pub const PAGE_SIZE: usize = 10;

/// `?page=N` query parameter, 1-based.
///
/// Built by the `Page` extractor in `server::extract`: the first `page`
/// value wins and anything that is not an integer means page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageQuery {
    pub fn new(page: i64) -> Self {
        Self { page }
    }

    /// Lenient parse of a raw `page` value, surrounding whitespace allowed.
    pub fn parse(raw: &str) -> Self {
        raw.trim().parse().map(Self::new).unwrap_or_default()
    }

    pub fn page(&self) -> i64 {
        self.page
    }
}

// Negative bounds count from the end of the list and are clamped to it, so
// page 0 is always empty and negative pages select windows from the tail.
fn resolve(index: i64, len: i64) -> i64 {
    if index < 0 {
        (len + index).max(0)
    } else {
        index.min(len)
    }
}

/// Returns the items of the requested page; a page past the end is empty.
pub fn paginate<T>(page: &PageQuery, items: Vec<T>) -> Vec<T> {
    let len = items.len() as i64;
    let start = page.page.saturating_sub(1).saturating_mul(PAGE_SIZE as i64);
    let end = start.saturating_add(PAGE_SIZE as i64);
    let (start, end) = (resolve(start, len), resolve(end, len));
    if start >= end {
        return Vec::new();
    }
    items
        .into_iter()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect()
}
