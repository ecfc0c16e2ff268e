use crate::models::{CareClient, ClientNote};
use chrono::DateTime;

pub const CLIENTS_PER_PAGE: usize = 8;
pub const NOTES_PER_PAGE: usize = 5;
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn numbers(&self) -> Vec<usize> {
        page_numbers(self.current, self.total_pages)
    }
}

pub fn filter_clients<'a>(
    clients: &'a [CareClient],
    search: &str,
    status: &str,
) -> Vec<&'a CareClient> {
    let needle = search.to_lowercase();
    clients
        .iter()
        .filter(|client| {
            let haystack = format!(
                "{} {} {}",
                client.first_name,
                client.last_name,
                client.address.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            let status_ok = status.is_empty() || status == "all" || client.care_status == status;
            haystack.contains(&needle) && status_ok
        })
        .collect()
}

/// Notes whose text or sentiment contains `search`, ordered by creation time.
/// Timestamps that fail to parse sort as the oldest.
pub fn filter_notes<'a>(
    notes: &'a [ClientNote],
    search: &str,
    direction: SortDirection,
) -> Vec<&'a ClientNote> {
    let needle = search.to_lowercase();
    let mut matched: Vec<&ClientNote> = notes
        .iter()
        .filter(|note| {
            note.note_text.to_lowercase().contains(&needle)
                || note.sentiment.to_lowercase().contains(&needle)
        })
        .collect();

    // stable in both directions, equal timestamps keep their input order
    match direction {
        SortDirection::Asc => matched.sort_by_key(|note| timestamp_millis(&note.created_at)),
        SortDirection::Desc => matched.sort_by(|a, b| {
            timestamp_millis(&b.created_at).cmp(&timestamp_millis(&a.created_at))
        }),
    }
    matched
}

pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, per_page);
    let current = page.clamp(1, total_pages.max(1));
    let start = ((current - 1) * per_page).min(total_items);
    let end = (current * per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        current,
        total_pages,
        total_items,
    }
}

/// Page number from a raw query value. Anything that is not a number
/// means page 1; out-of-range numbers are clamped later by [`paginate`].
pub fn requested_page(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(1)
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

/// Up to five page numbers around `current`, shifted to stay within range.
pub fn page_numbers(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages);
    if end + 1 - start < MAX_VISIBLE_PAGES {
        start = (end + 1).saturating_sub(MAX_VISIBLE_PAGES).max(1);
    }
    (start..=end).collect()
}

fn timestamp_millis(value: &str) -> i64 {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.timestamp_millis())
        .unwrap_or(i64::MIN)
}
