use crate::model::{Category, TranslationKey};

pub const PAGE_SIZE: usize = 10;

/// Search term, category tag filter, and 1-based page over the mirror.
/// Derivation never mutates the rows it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    search: String,
    tags: Vec<Category>,
    page: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new()
    }
}

impl TableState {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            tags: Vec::new(),
            page: 1,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn tags(&self) -> &[Category] {
        &self.tags
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: &str) {
        self.search.clear();
        self.search.push_str(search);
    }

    pub fn toggle_tag(&mut self, tag: Category) {
        if let Some(position) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(position);
        } else {
            self.tags.push(tag);
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Re-clamps the page into `[1, max(page_count, 1)]`. Call after every
    /// change that can move the matching-row count.
    pub fn clamp_page(&mut self, filtered_len: usize) {
        let count = page_count(filtered_len).max(1);
        self.page = self.page.clamp(1, count);
    }

    pub fn filter<'a>(
        &self,
        rows: &'a [TranslationKey],
        language: &str,
    ) -> Vec<&'a TranslationKey> {
        filter_rows(rows, language, &self.search, &self.tags)
    }
}

/// Case-insensitive substring match against the key or the value for the
/// active language. A row without a value for that language can only match
/// by key; an empty term matches everything.
pub fn row_matches_search(row: &TranslationKey, language: &str, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    if row.key.to_lowercase().contains(&needle) {
        return true;
    }
    row.value_for(language)
        .map(|value| value.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// An empty tag set passes every row; otherwise the row's category must be a
/// member of the set.
pub fn row_matches_tags(row: &TranslationKey, tags: &[Category]) -> bool {
    tags.is_empty() || tags.contains(&row.category)
}

pub fn filter_rows<'a>(
    rows: &'a [TranslationKey],
    language: &str,
    search: &str,
    tags: &[Category],
) -> Vec<&'a TranslationKey> {
    rows.iter()
        .filter(|row| row_matches_search(row, language, search) && row_matches_tags(row, tags))
        .collect()
}

pub fn page_count(filtered_len: usize) -> usize {
    filtered_len.div_ceil(PAGE_SIZE)
}

/// The rows visible on `page` (1-based). An out-of-range page yields an
/// empty slice; callers clamp before rendering.
pub fn page_slice<'a, 'b>(
    filtered: &'b [&'a TranslationKey],
    page: usize,
) -> &'b [&'a TranslationKey] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= filtered.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(filtered.len());
    &filtered[start..end]
}
