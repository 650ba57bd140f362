//! Sorted, paged view over the contact collection.
//!
//! # Responsibility
//! - Derive the visible page (sorted by name, case-insensitive) from the
//!   authoritative collection.
//! - Track the current page across create/update/delete.
//!
//! # Invariants
//! - Pages are 1-based and always within `[1, total_pages]`.
//! - An empty collection has exactly one (empty) page.
//! - Every record appears on exactly one page.

use crate::model::contact::Contact;

/// Records shown per page.
pub const PAGE_SIZE: usize = 5;

/// Number of pages for `count` records; never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

/// Returns the collection in display order.
///
/// Case-insensitive by name, ascending; records with equal keys keep their
/// insertion order.
pub fn sort_for_display(contacts: &[Contact]) -> Vec<Contact> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by_cached_key(|contact| contact.name().to_lowercase());
    sorted
}

/// 1-based inclusive range of visible records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

/// One page of the sorted collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub items: Vec<Contact>,
    pub page: usize,
    pub total_pages: usize,
    /// `None` when the collection is empty.
    pub range: Option<PageRange>,
}

impl PageView {
    /// Navigation controls are only rendered for multi-page collections.
    pub fn show_controls(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Human-readable range line for the list header.
    pub fn summary(&self) -> String {
        match self.range {
            Some(range) => format!(
                "Showing {}-{} of {} contacts",
                range.start, range.end, range.total
            ),
            None => "No contacts yet".to_string(),
        }
    }
}

/// Builds the view for `page` (clamped) of the sorted collection.
pub fn paginate(contacts: &[Contact], page: usize, page_size: usize) -> PageView {
    let page_size = page_size.max(1);
    let count = contacts.len();
    let total_pages = total_pages(count, page_size);
    let page = clamp_page(page, count, page_size);

    if count == 0 {
        return PageView {
            items: Vec::new(),
            page,
            total_pages,
            range: None,
        };
    }

    let start_index = (page - 1) * page_size;
    let end_index = (start_index + page_size).min(count);
    let items = sort_for_display(contacts)
        .into_iter()
        .skip(start_index)
        .take(end_index - start_index)
        .collect();

    PageView {
        items,
        page,
        total_pages,
        range: Some(PageRange {
            start: start_index + 1,
            end: end_index,
            total: count,
        }),
    }
}

/// Current page selection and its mutation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Moves to `page`, clamped to the collection size.
    pub fn go_to(&mut self, page: usize, count: usize) {
        self.current = clamp_page(page, count, self.page_size);
    }

    pub fn next(&mut self, count: usize) {
        self.go_to(self.current.saturating_add(1), count);
    }

    pub fn previous(&mut self, count: usize) {
        self.go_to(self.current.saturating_sub(1), count);
    }

    /// After a create: jump to the last page.
    ///
    /// The new record is not necessarily on that page, since the list is
    /// sorted by name rather than insertion order.
    pub fn after_create(&mut self, count: usize) {
        self.current = total_pages(count, self.page_size);
    }

    /// After a delete: clamp down if the current page no longer exists.
    pub fn after_delete(&mut self, count: usize) {
        self.current = clamp_page(self.current, count, self.page_size);
    }

    /// After an update: the selection is kept.
    pub fn after_update(&mut self) {}

    /// View of the current page.
    pub fn view(&self, contacts: &[Contact]) -> PageView {
        paginate(contacts, self.current, self.page_size)
    }
}
