use crate::Category;

/// What the list area should show instead of (or as) the article rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    /// A fetch failed and there is nothing to show.
    Error(String),
    /// First load in progress.
    Loading,
    /// Nothing loaded and nothing loading.
    #[default]
    Empty,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFooter {
    #[default]
    None,
    Loading,
    EndOfList,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: ListStatus,
    pub rows: Vec<ArticleRow>,
    pub footer: ListFooter,
    pub error: Option<String>,
    pub category: Option<Category>,
    pub current_page: u32,
    pub has_more_pages: bool,
    pub saved_count: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    /// 1-based position, used by the terminal commands.
    pub number: usize,
    pub title: String,
    pub source: String,
    pub published_at: String,
    pub url: String,
    pub saved: bool,
}
