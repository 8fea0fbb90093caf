use std::sync::Once;

use headlines_core::{
    update, Article, Category, Effect, FetchPurpose, HeadlineQuery, Msg, NewsState, RequestId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(news_logging::initialize_for_tests);
}

fn article(n: usize) -> Article {
    Article::new(
        format!("https://news.example.com/story-{n}"),
        format!("Story {n}"),
    )
}

fn articles(range: std::ops::RangeInclusive<usize>) -> Vec<Article> {
    range.map(article).collect()
}

fn urls(state: &NewsState) -> Vec<String> {
    state.articles().iter().map(|a| a.url.clone()).collect()
}

fn fetch_request(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchHeadlines { request, .. } => Some(*request),
            _ => None,
        })
        .expect("fetch effect")
}

/// Runs fetch-start(1) and fetch-success(1, list).
fn loaded(list: Vec<Article>) -> NewsState {
    let (state, effects) = update(NewsState::new(), Msg::FetchNews { page: 1 });
    let request = fetch_request(&effects);
    let (state, _) = update(
        state,
        Msg::NewsFetched {
            request,
            page: 1,
            articles: list,
        },
    );
    state
}

fn load_more(state: NewsState, list: Vec<Article>) -> NewsState {
    let page = state.current_page() + 1;
    let (state, effects) = update(state, Msg::LoadMore { page });
    let request = fetch_request(&effects);
    let (state, _) = update(
        state,
        Msg::MoreNewsFetched {
            request,
            page,
            articles: list,
        },
    );
    state
}

#[test]
fn app_started_loads_saved_and_fetches_first_page() {
    init_logging();
    let (state, effects) = update(NewsState::new(), Msg::AppStarted);

    assert!(state.is_loading());
    assert_eq!(
        effects,
        vec![
            Effect::LoadSavedArticles,
            Effect::FetchHeadlines {
                request: 1,
                query: HeadlineQuery {
                    page: 1,
                    category: None
                },
                purpose: FetchPurpose::Refresh,
            },
        ]
    );
}

#[test]
fn fetch_start_sets_loading_and_clears_error() {
    init_logging();
    let (state, effects) = update(NewsState::new(), Msg::FetchNews { page: 1 });
    let (state, _) = update(
        state,
        Msg::NewsFetchFailed {
            request: fetch_request(&effects),
            message: "Network Error".to_string(),
        },
    );
    assert_eq!(state.error(), Some("Network Error"));
    assert!(!state.is_loading());

    let (state, _) = update(state, Msg::FetchNews { page: 1 });
    assert!(state.is_loading());
    assert_eq!(state.error(), None);
}

#[test]
fn full_first_page_means_more_pages() {
    init_logging();
    let state = loaded(articles(1..=10));

    assert_eq!(state.articles().len(), 10);
    assert_eq!(state.current_page(), 1);
    assert!(state.has_more_pages());
    assert!(!state.is_loading());
}

#[test]
fn short_first_page_means_no_more_pages() {
    init_logging();
    let state = loaded(articles(1..=7));

    assert_eq!(state.articles().len(), 7);
    assert!(!state.has_more_pages());
}

#[test]
fn empty_fetch_clears_articles_and_pages() {
    init_logging();
    let state = loaded(articles(1..=10));
    let (state, effects) = update(state, Msg::FetchNews { page: 1 });
    let (state, _) = update(
        state,
        Msg::NewsFetched {
            request: fetch_request(&effects),
            page: 1,
            articles: Vec::new(),
        },
    );

    assert!(state.articles().is_empty());
    assert!(!state.has_more_pages());
    assert_eq!(state.current_page(), 1);
}

#[test]
fn fresh_fetch_resets_current_page() {
    init_logging();
    let state = load_more(loaded(articles(1..=10)), articles(11..=20));
    assert_eq!(state.current_page(), 2);

    let (state, effects) = update(state, Msg::FetchNews { page: 1 });
    let (state, _) = update(
        state,
        Msg::NewsFetched {
            request: fetch_request(&effects),
            page: 1,
            articles: articles(1..=10),
        },
    );
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.articles().len(), 10);
}

#[test]
fn fetch_failure_keeps_existing_articles() {
    init_logging();
    let state = loaded(articles(1..=3));
    let (state, effects) = update(state, Msg::FetchNews { page: 1 });
    let (state, _) = update(
        state,
        Msg::NewsFetchFailed {
            request: fetch_request(&effects),
            message: "apiKeyInvalid".to_string(),
        },
    );

    assert_eq!(state.articles().len(), 3);
    assert_eq!(state.error(), Some("apiKeyInvalid"));
    assert!(!state.is_loading());
}

#[test]
fn load_more_appends_only_unseen_urls() {
    init_logging();
    let state = loaded(articles(1..=10));
    assert!(state.has_more_pages());

    // Five overlap with the first page, five are new.
    let state = load_more(state, articles(6..=15));

    let expected: Vec<String> = articles(1..=15).into_iter().map(|a| a.url).collect();
    assert_eq!(urls(&state), expected);
    assert_eq!(state.current_page(), 2);
    // Only five new articles, so the page was not full.
    assert!(!state.has_more_pages());
}

#[test]
fn load_more_with_full_page_of_new_articles_keeps_paging() {
    init_logging();
    let state = loaded(articles(1..=10));
    let state = load_more(state, articles(5..=20));

    assert_eq!(state.articles().len(), 20);
    assert_eq!(state.current_page(), 2);
    assert!(state.has_more_pages());
}

#[test]
fn load_more_with_only_known_articles_stops_paging() {
    init_logging();
    let state = load_more(loaded(articles(1..=10)), articles(11..=20));
    assert_eq!(state.current_page(), 2);

    let state = load_more(state, vec![article(1), article(2)]);

    assert_eq!(state.articles().len(), 20);
    assert_eq!(state.current_page(), 2);
    assert!(!state.has_more_pages());
}

#[test]
fn load_more_never_duplicates_urls_within_a_page() {
    init_logging();
    let state = loaded(articles(1..=3));
    let state = load_more(state, vec![article(4), article(4), article(3), article(5)]);

    assert_eq!(urls(&state).len(), 5);
    let mut deduped = urls(&state);
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), 5);
}

#[test]
fn load_more_clears_error_but_not_loading() {
    init_logging();
    let state = loaded(articles(1..=10));
    let (state, effects) = update(state, Msg::LoadMore { page: 2 });
    assert!(!state.is_loading());

    let (state, _) = update(
        state,
        Msg::MoreNewsFetchFailed {
            request: fetch_request(&effects),
            message: "Network Error".to_string(),
        },
    );
    assert_eq!(state.error(), Some("Network Error"));
    assert!(!state.is_loading());
    assert_eq!(state.articles().len(), 10);
    assert_eq!(state.current_page(), 1);

    let (state, _) = update(state, Msg::LoadMore { page: 2 });
    assert_eq!(state.error(), None);
}

#[test]
fn load_more_uses_current_category() {
    init_logging();
    let (state, effects) = update(NewsState::new(), Msg::FetchCategory(Category::Sports));
    let (state, _) = update(
        state,
        Msg::CategoryFetched {
            request: fetch_request(&effects),
            category: Category::Sports,
            articles: articles(1..=10),
        },
    );

    let (_state, effects) = update(state, Msg::LoadMore { page: 2 });
    assert_eq!(
        effects,
        vec![Effect::FetchHeadlines {
            request: 2,
            query: HeadlineQuery {
                page: 2,
                category: Some(Category::Sports),
            },
            purpose: FetchPurpose::LoadMore,
        }]
    );
}

#[test]
fn category_switch_resets_page_and_stores_category() {
    init_logging();
    let state = load_more(loaded(articles(1..=10)), articles(11..=20));
    assert_eq!(state.current_page(), 2);

    let (state, _) = update(state, Msg::ResetPagination);
    let (state, effects) = update(state, Msg::FetchCategory(Category::Health));
    assert!(state.is_loading());
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.current_category(), None);

    let (state, _) = update(
        state,
        Msg::CategoryFetched {
            request: fetch_request(&effects),
            category: Category::Health,
            articles: articles(100..=103),
        },
    );
    assert_eq!(state.current_category(), Some(Category::Health));
    assert_eq!(state.articles().len(), 4);
    assert_eq!(state.current_page(), 1);
    assert!(!state.has_more_pages());
    assert!(!state.is_loading());
}

#[test]
fn category_failure_records_error() {
    init_logging();
    let (state, effects) = update(NewsState::new(), Msg::FetchCategory(Category::Science));
    let (state, _) = update(
        state,
        Msg::CategoryFetchFailed {
            request: fetch_request(&effects),
            message: "rateLimited".to_string(),
        },
    );

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("rateLimited"));
    assert_eq!(state.current_category(), None);
}

#[test]
fn reset_pagination_restores_defaults() {
    init_logging();
    let state = load_more(loaded(articles(1..=10)), articles(11..=12));
    assert_eq!(state.current_page(), 2);
    assert!(!state.has_more_pages());

    let (state, effects) = update(state, Msg::ResetPagination);
    assert_eq!(state.current_page(), 1);
    assert!(state.has_more_pages());
    assert!(effects.is_empty());
    assert_eq!(state.articles().len(), 12);
}
