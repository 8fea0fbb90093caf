use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use headlines_core::{Article, HeadlineQuery, RequestId};
use news_logging::{news_debug, news_error, news_info};

use crate::{
    load_saved_articles, persist_saved_articles, EngineEvent, KeyValueStore, NetworkError,
    NewsClient,
};

/// Receives engine results. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Fetch {
        request: RequestId,
        query: HeadlineQuery,
    },
    LoadSaved,
    PersistSaved(Vec<Article>),
}

/// Runs I/O on a background tokio runtime and reports results to a sink.
///
/// Fetches run concurrently. Store commands run one at a time in the order
/// they were sent, so the last persisted list always wins.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(
        client: Arc<dyn NewsClient>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Fetch { request, query } => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let result = fetch_for_query(client.as_ref(), query).await;
                            sink.emit(EngineEvent::FetchCompleted {
                                request,
                                query,
                                result,
                            });
                        });
                    }
                    EngineCommand::LoadSaved => {
                        let articles = runtime.block_on(load_saved_articles(store.as_ref()));
                        sink.emit(EngineEvent::SavedLoaded(articles));
                    }
                    EngineCommand::PersistSaved(articles) => {
                        let result =
                            runtime.block_on(persist_saved_articles(store.as_ref(), &articles));
                        match result {
                            Ok(()) => news_debug!("Persisted {} saved articles", articles.len()),
                            Err(err) => news_error!("Failed to persist saved articles: {}", err),
                        }
                    }
                }
            }
            news_info!("Engine command channel closed; stopping");
        });

        Self {
            cmd_tx: Some(cmd_tx),
            worker: Some(worker),
        }
    }

    pub fn fetch(&self, request: RequestId, query: HeadlineQuery) {
        self.send(EngineCommand::Fetch { request, query });
    }

    pub fn load_saved(&self) {
        self.send(EngineCommand::LoadSaved);
    }

    pub fn persist_saved(&self, articles: Vec<Article>) {
        self.send(EngineCommand::PersistSaved(articles));
    }

    /// Stops accepting commands and waits for queued store work to finish.
    /// Fetches still in flight are dropped.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, command: EngineCommand) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(command);
        }
    }

    fn stop(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Page 1 goes to the unpaged endpoint; later pages use the paginated ones.
async fn fetch_for_query(
    client: &dyn NewsClient,
    query: HeadlineQuery,
) -> Result<Vec<Article>, NetworkError> {
    match (query.category, query.is_paginated()) {
        (None, false) => client.fetch_latest().await,
        (Some(category), false) => client.fetch_latest_by_category(category).await,
        (None, true) => client.fetch_latest_paginated(query.page).await,
        (Some(category), true) => {
            client
                .fetch_latest_paginated_by_category(query.page, category)
                .await
        }
    }
}
