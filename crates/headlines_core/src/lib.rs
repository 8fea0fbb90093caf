//! Headlines core: article model and the pure news state machine.
mod article;
mod category;
mod effect;
mod id;
mod msg;
mod state;
mod update;
mod view_model;

pub use article::{Article, ArticleSource};
pub use category::{Category, ParseCategoryError};
pub use effect::{Effect, FetchPurpose, HeadlineQuery};
pub use id::ArticleIdGenerator;
pub use msg::Msg;
pub use state::{NewsState, RequestId, StaleResultPolicy, PAGE_SIZE};
pub use update::update;
pub use view_model::{AppViewModel, ArticleRow, ListFooter, ListStatus};
