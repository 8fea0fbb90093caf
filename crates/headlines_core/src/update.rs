use news_logging::{news_debug, news_warn};

use crate::{Article, Effect, FetchPurpose, HeadlineQuery, Msg, NewsState, RequestId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: NewsState, msg: Msg) -> (NewsState, Vec<Effect>) {
    let effects = match msg {
        Msg::AppStarted => {
            let mut effects = vec![Effect::LoadSavedArticles];
            effects.push(start_fetch(&mut state, 1));
            effects
        }
        Msg::FetchNews { page } => vec![start_fetch(&mut state, page)],
        Msg::NewsFetched {
            request,
            page,
            articles,
        } => {
            if accept_listing(&state, request) {
                if page != 1 {
                    news_debug!("request {} returned page {} as a fresh list", request, page);
                }
                state.replace_articles(articles);
            }
            Vec::new()
        }
        Msg::NewsFetchFailed { request, message } | Msg::CategoryFetchFailed { request, message } => {
            if accept_listing(&state, request) {
                state.fail_fetch(message);
            }
            Vec::new()
        }
        Msg::FetchCategory(category) => {
            state.begin_category_fetch();
            let request = state.issue_listing_request();
            vec![Effect::FetchHeadlines {
                request,
                query: HeadlineQuery {
                    page: 1,
                    category: Some(category),
                },
                purpose: FetchPurpose::Category(category),
            }]
        }
        Msg::CategoryFetched {
            request,
            category,
            articles,
        } => {
            if accept_listing(&state, request) {
                state.set_category(category);
                state.replace_articles(articles);
            }
            Vec::new()
        }
        Msg::LoadMore { page } => {
            state.begin_load_more();
            let request = state.issue_more_request();
            vec![Effect::FetchHeadlines {
                request,
                query: HeadlineQuery {
                    page,
                    category: state.current_category(),
                },
                purpose: FetchPurpose::LoadMore,
            }]
        }
        Msg::MoreNewsFetched {
            request,
            page,
            articles,
        } => {
            if accept_more(&state, request) {
                let received = articles.len();
                let appended = state.append_page(articles);
                news_debug!(
                    "page {} returned {} articles, {} new",
                    page,
                    received,
                    appended
                );
            }
            Vec::new()
        }
        Msg::MoreNewsFetchFailed { request, message } => {
            if accept_more(&state, request) {
                state.fail_load_more(message);
            }
            Vec::new()
        }
        Msg::SaveArticle(article) => save(&mut state, article),
        Msg::UnsaveArticle(article) => unsave(&mut state, &article),
        Msg::ToggleSaved(article) => {
            if state.is_saved(&article.url) {
                unsave(&mut state, &article)
            } else {
                save(&mut state, article)
            }
        }
        Msg::ResetPagination => {
            state.reset_pagination();
            Vec::new()
        }
        Msg::SavedArticlesLoaded(articles) => {
            let dropped = state.hydrate_saved(articles);
            if dropped > 0 {
                news_warn!("Dropped {} duplicate saved articles while loading", dropped);
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn start_fetch(state: &mut NewsState, page: u32) -> Effect {
    state.begin_fetch();
    let request = state.issue_listing_request();
    Effect::FetchHeadlines {
        request,
        query: HeadlineQuery {
            page,
            category: None,
        },
        purpose: FetchPurpose::Refresh,
    }
}

fn save(state: &mut NewsState, article: Article) -> Vec<Effect> {
    if state.save(article) {
        vec![Effect::PersistSavedArticles(state.saved_articles().to_vec())]
    } else {
        Vec::new()
    }
}

fn unsave(state: &mut NewsState, article: &Article) -> Vec<Effect> {
    state.unsave(article);
    vec![Effect::PersistSavedArticles(state.saved_articles().to_vec())]
}

fn accept_listing(state: &NewsState, request: RequestId) -> bool {
    let accepted = state.accepts_listing_result(request);
    if !accepted {
        news_debug!("Discarding stale listing result for request {}", request);
    }
    accepted
}

fn accept_more(state: &NewsState, request: RequestId) -> bool {
    let accepted = state.accepts_more_result(request);
    if !accepted {
        news_debug!("Discarding stale load-more result for request {}", request);
    }
    accepted
}
