use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use headlines_core::{Effect, FetchPurpose, Msg, RequestId};
use headlines_engine::{
    EngineEvent, EngineHandle, EventSink, FileKeyValueStore, KeyValueStore, NewsClient,
    ReqwestNewsClient,
};
use news_logging::{news_debug, news_info, news_warn};

use crate::app::AppEvent;
use crate::config::AppConfig;

type PendingFetches = Arc<Mutex<HashMap<RequestId, FetchPurpose>>>;

/// Turns `Effect`s into engine commands and engine events back into `Msg`s.
pub struct EffectRunner {
    engine: EngineHandle,
    pending: PendingFetches,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, events: mpsc::Sender<AppEvent>) -> anyhow::Result<Self> {
        let client = ReqwestNewsClient::new(config.client.clone())?;
        let store = FileKeyValueStore::new(config.data_dir.clone());
        news_info!("Saved articles are stored in {:?}", store.path());
        Ok(Self::with_parts(Arc::new(client), Arc::new(store), events))
    }

    pub fn with_parts(
        client: Arc<dyn NewsClient>,
        store: Arc<dyn KeyValueStore>,
        events: mpsc::Sender<AppEvent>,
    ) -> Self {
        let pending = PendingFetches::default();
        let sink = MsgSink {
            tx: events,
            pending: pending.clone(),
        };
        let engine = EngineHandle::new(client, store, Arc::new(sink));
        Self { engine, pending }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchHeadlines {
                    request,
                    query,
                    purpose,
                } => {
                    news_debug!(
                        "FetchHeadlines request={} page={} category={:?} purpose={:?}",
                        request,
                        query.page,
                        query.category,
                        purpose
                    );
                    if let Ok(mut pending) = self.pending.lock() {
                        pending.insert(request, purpose);
                    }
                    self.engine.fetch(request, query);
                }
                Effect::LoadSavedArticles => self.engine.load_saved(),
                Effect::PersistSavedArticles(articles) => self.engine.persist_saved(articles),
            }
        }
    }

    /// Waits for queued saved-article writes before returning.
    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
    pending: PendingFetches,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::FetchCompleted {
                request,
                query,
                result,
            } => {
                let purpose = self
                    .pending
                    .lock()
                    .ok()
                    .and_then(|mut pending| pending.remove(&request));
                let Some(purpose) = purpose else {
                    news_warn!("Result for unknown request {}", request);
                    return;
                };
                fetch_result_to_msg(request, query.page, purpose, result)
            }
            EngineEvent::SavedLoaded(articles) => Msg::SavedArticlesLoaded(articles),
        };
        let _ = self.tx.send(AppEvent::Msg(msg));
    }
}

fn fetch_result_to_msg(
    request: RequestId,
    page: u32,
    purpose: FetchPurpose,
    result: Result<Vec<headlines_core::Article>, headlines_engine::NetworkError>,
) -> Msg {
    match (purpose, result) {
        (FetchPurpose::Refresh, Ok(articles)) => Msg::NewsFetched {
            request,
            page,
            articles,
        },
        (FetchPurpose::Refresh, Err(err)) => Msg::NewsFetchFailed {
            request,
            message: err.message,
        },
        (FetchPurpose::Category(category), Ok(articles)) => Msg::CategoryFetched {
            request,
            category,
            articles,
        },
        (FetchPurpose::Category(_), Err(err)) => Msg::CategoryFetchFailed {
            request,
            message: err.message,
        },
        (FetchPurpose::LoadMore, Ok(articles)) => Msg::MoreNewsFetched {
            request,
            page,
            articles,
        },
        (FetchPurpose::LoadMore, Err(err)) => Msg::MoreNewsFetchFailed {
            request,
            message: err.message,
        },
    }
}
