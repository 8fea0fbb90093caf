use crate::{Article, Category, RequestId};

/// What a headline request asks the API for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub page: u32,
    pub category: Option<Category>,
}

impl HeadlineQuery {
    /// Page 1 is requested without paging parameters; later pages carry
    /// `page` and `pageSize`.
    pub fn is_paginated(&self) -> bool {
        self.page > 1
    }
}

/// Which transition the result of a fetch feeds back into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose {
    Refresh,
    Category(Category),
    LoadMore,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchHeadlines {
        request: RequestId,
        query: HeadlineQuery,
        purpose: FetchPurpose,
    },
    /// Read the saved list from the store; answered with `Msg::SavedArticlesLoaded`.
    LoadSavedArticles,
    /// Write the full saved list. Fire-and-forget.
    PersistSavedArticles(Vec<Article>),
}
