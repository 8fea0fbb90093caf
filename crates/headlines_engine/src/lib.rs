//! Headlines engine: remote API client, key-value persistence and effect execution.
mod client;
mod engine;
mod persist;
mod saved;
mod store;
mod types;

pub use client::{ClientSettings, HeadlineRequest, NewsClient, ReqwestNewsClient};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use persist::{ensure_data_dir, AtomicFileWriter, PersistError};
pub use saved::{load_saved_articles, persist_saved_articles, SAVED_ARTICLES_KEY};
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, STORE_FILENAME};
pub use types::{EngineEvent, FailureKind, NetworkError};
