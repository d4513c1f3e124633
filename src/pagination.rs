use serde::Deserialize;

use crate::response::Paginated;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Query string shared by the list endpoints. Everything arrives as raw
/// text so that junk values degrade to "absent" instead of a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ListQuery {
    /// `(page, page_size)`, both at least 1.
    pub fn page_params(&self, default_size: usize) -> (usize, usize) {
        (
            positive(self.page.as_deref()).unwrap_or(1),
            positive(self.page_size.as_deref()).unwrap_or(default_size),
        )
    }

    /// Lowercased search needle, if one was given.
    pub fn needle(&self) -> Option<String> {
        filter_value(&self.search).map(str::to_lowercase)
    }
}

/// Trimmed value, or `None` for missing and blank parameters.
pub fn filter_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn positive(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub fn matches_needle(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Slice `(page-1)*page_size .. +page_size` out of `items`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Paginated<T> {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    Paginated {
        list: items.iter().skip(start).take(page_size).cloned().collect(),
        total: items.len(),
        page,
        page_size,
        total_pages: items.len().div_ceil(page_size),
    }
}
