use crate::{Article, Category, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application started: hydrate saved articles and fetch the first page.
    AppStarted,
    /// Fetch (or refresh) the unfiltered headline list.
    FetchNews { page: u32 },
    NewsFetched {
        request: RequestId,
        page: u32,
        articles: Vec<Article>,
    },
    NewsFetchFailed { request: RequestId, message: String },
    /// Switch to a category and fetch its first page.
    FetchCategory(Category),
    CategoryFetched {
        request: RequestId,
        category: Category,
        articles: Vec<Article>,
    },
    CategoryFetchFailed { request: RequestId, message: String },
    /// Fetch the next page for infinite scrolling. The caller owns the
    /// in-flight flag and must not send this while a load-more is pending.
    LoadMore { page: u32 },
    MoreNewsFetched {
        request: RequestId,
        page: u32,
        articles: Vec<Article>,
    },
    MoreNewsFetchFailed { request: RequestId, message: String },
    SaveArticle(Article),
    UnsaveArticle(Article),
    /// Save if not saved yet, otherwise unsave (bookmark button).
    ToggleSaved(Article),
    ResetPagination,
    /// Saved list read back from the store at startup.
    SavedArticlesLoaded(Vec<Article>),
}
