use headlines_core::Article;
use news_logging::{news_info, news_warn};

use crate::{KeyValueStore, PersistError};

/// Store key holding the JSON array of saved articles.
pub const SAVED_ARTICLES_KEY: &str = "savedArticles";

/// Reads the saved list. A missing key, a read failure or an unparsable blob
/// all yield an empty list; failures are logged.
pub async fn load_saved_articles(store: &dyn KeyValueStore) -> Vec<Article> {
    let blob = match store.get(SAVED_ARTICLES_KEY).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(err) => {
            news_warn!("Failed to load saved articles: {}", err);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Article>>(&blob) {
        Ok(articles) => {
            news_info!("Loaded {} saved articles", articles.len());
            articles
        }
        Err(err) => {
            news_warn!("Failed to parse saved articles: {}", err);
            Vec::new()
        }
    }
}

/// Writes the full saved list. Callers log and drop the error.
pub async fn persist_saved_articles(
    store: &dyn KeyValueStore,
    articles: &[Article],
) -> Result<(), PersistError> {
    let blob =
        serde_json::to_string(articles).map_err(|err| PersistError::Encode(err.to_string()))?;
    store.set(SAVED_ARTICLES_KEY, &blob).await
}
