use crate::view_model::{AppViewModel, ArticleRow, ListFooter, ListStatus};
use crate::{Article, Category};

/// Articles per page; a full page means more pages are probably available.
pub const PAGE_SIZE: usize = 10;

/// Token attached to every fetch so late results can be recognised.
pub type RequestId = u64;

/// What to do with a fetch result that is no longer the latest request of
/// its kind (e.g. a slow refresh resolving after a newer one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResultPolicy {
    /// Drop results from superseded requests.
    #[default]
    Discard,
    /// Apply every result in arrival order; the last one to resolve wins.
    Apply,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsState {
    articles: Vec<Article>,
    saved_articles: Vec<Article>,
    loading: bool,
    error: Option<String>,
    current_page: u32,
    has_more_pages: bool,
    current_category: Option<Category>,
    next_request: RequestId,
    /// Latest refresh/category request; both replace the article list.
    listing_request: Option<RequestId>,
    more_request: Option<RequestId>,
    stale_policy: StaleResultPolicy,
    dirty: bool,
}

impl Default for NewsState {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            saved_articles: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            has_more_pages: true,
            current_category: None,
            next_request: 1,
            listing_request: None,
            more_request: None,
            stale_policy: StaleResultPolicy::default(),
            dirty: false,
        }
    }
}

impl NewsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stale_policy(stale_policy: StaleResultPolicy) -> Self {
        Self {
            stale_policy,
            ..Self::default()
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn saved_articles(&self) -> &[Article] {
        &self.saved_articles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    pub fn current_category(&self) -> Option<Category> {
        self.current_category
    }

    pub fn stale_policy(&self) -> StaleResultPolicy {
        self.stale_policy
    }

    pub fn is_saved(&self, url: &str) -> bool {
        self.saved_articles.iter().any(|saved| saved.url == url)
    }

    pub fn view(&self) -> AppViewModel {
        let rows = self
            .articles
            .iter()
            .enumerate()
            .map(|(index, article)| ArticleRow {
                number: index + 1,
                title: article.title.clone(),
                source: article.source.name.clone(),
                published_at: article.published_at.clone(),
                url: article.url.clone(),
                saved: self.is_saved(&article.url),
            })
            .collect::<Vec<_>>();

        let status = match (&self.error, self.loading, rows.is_empty()) {
            (Some(message), _, true) => ListStatus::Error(message.clone()),
            (None, true, true) => ListStatus::Loading,
            (None, false, true) => ListStatus::Empty,
            _ => ListStatus::Ready,
        };
        let footer = if self.loading && !rows.is_empty() {
            ListFooter::Loading
        } else if !self.has_more_pages && !rows.is_empty() {
            ListFooter::EndOfList
        } else {
            ListFooter::None
        };

        AppViewModel {
            status,
            rows,
            footer,
            error: self.error.clone(),
            category: self.current_category,
            current_page: self.current_page,
            has_more_pages: self.has_more_pages,
            saved_count: self.saved_articles.len(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn issue_request(&mut self) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        request
    }

    /// Starts a request that will replace the list. Any pending load-more is
    /// superseded because its page belongs to the old list.
    pub(crate) fn issue_listing_request(&mut self) -> RequestId {
        let request = self.issue_request();
        self.listing_request = Some(request);
        self.more_request = None;
        request
    }

    pub(crate) fn issue_more_request(&mut self) -> RequestId {
        let request = self.issue_request();
        self.more_request = Some(request);
        request
    }

    pub(crate) fn accepts_listing_result(&self, request: RequestId) -> bool {
        self.stale_policy == StaleResultPolicy::Apply || self.listing_request == Some(request)
    }

    pub(crate) fn accepts_more_result(&self, request: RequestId) -> bool {
        self.stale_policy == StaleResultPolicy::Apply || self.more_request == Some(request)
    }

    pub(crate) fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn begin_category_fetch(&mut self) {
        self.begin_fetch();
        self.current_page = 1;
    }

    pub(crate) fn begin_load_more(&mut self) {
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn replace_articles(&mut self, articles: Vec<Article>) {
        self.has_more_pages = articles.len() >= PAGE_SIZE;
        self.articles = articles;
        self.current_page = 1;
        self.loading = false;
        self.mark_dirty();
    }

    pub(crate) fn set_category(&mut self, category: Category) {
        self.current_category = Some(category);
    }

    /// Appends the articles whose url is not listed yet. Returns how many
    /// were appended.
    pub(crate) fn append_page(&mut self, articles: Vec<Article>) -> usize {
        let mut fresh: Vec<Article> = Vec::with_capacity(articles.len());
        for article in articles {
            let known = self.articles.iter().any(|existing| existing.same_story(&article))
                || fresh.iter().any(|pending| pending.same_story(&article));
            if !known {
                fresh.push(article);
            }
        }

        let appended = fresh.len();
        if appended > 0 {
            self.articles.extend(fresh);
            self.current_page += 1;
            self.has_more_pages = appended >= PAGE_SIZE;
        } else {
            self.has_more_pages = false;
        }
        self.mark_dirty();
        appended
    }

    pub(crate) fn fail_fetch(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.mark_dirty();
    }

    /// Load-more failures leave `loading` alone; that flag belongs to
    /// list-replacing fetches.
    pub(crate) fn fail_load_more(&mut self, message: String) {
        self.error = Some(message);
        self.mark_dirty();
    }

    /// Returns false when an article with the same url is already saved.
    pub(crate) fn save(&mut self, article: Article) -> bool {
        if self.is_saved(&article.url) {
            return false;
        }
        self.saved_articles.push(article);
        self.mark_dirty();
        true
    }

    pub(crate) fn unsave(&mut self, article: &Article) {
        self.saved_articles.retain(|saved| !saved.same_story(article));
        self.mark_dirty();
    }

    pub(crate) fn reset_pagination(&mut self) {
        self.current_page = 1;
        self.has_more_pages = true;
        self.mark_dirty();
    }

    /// Replaces the saved list wholesale, keeping the first entry per url.
    pub(crate) fn hydrate_saved(&mut self, articles: Vec<Article>) -> usize {
        self.saved_articles.clear();
        let mut dropped = 0;
        for article in articles {
            if self.is_saved(&article.url) {
                dropped += 1;
            } else {
                self.saved_articles.push(article);
            }
        }
        self.mark_dirty();
        dropped
    }
}
