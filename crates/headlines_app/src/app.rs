use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use headlines_core::{update, Effect, Msg, NewsState, StaleResultPolicy};
use news_logging::{news_debug, news_info, news_warn};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::ui::input::{parse_command, Command};
use crate::ui::render;

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Input(Result<Command, String>),
    Msg(Msg),
    InputClosed,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(&config, event_tx.clone())?;
    spawn_input_reader(event_tx);

    let mut session = Session::new(config.stale_policy);
    let mut stdout = io::stdout();
    writeln!(stdout, "headlines: type `help` for commands")?;

    runner.enqueue(session.dispatch(Msg::AppStarted));
    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Input(Ok(command)) => match session.react(command) {
                Reaction::Dispatch(msgs) => {
                    for msg in msgs {
                        runner.enqueue(session.dispatch(msg));
                    }
                }
                Reaction::Print(text) => write!(stdout, "{text}")?,
                Reaction::Quit => break,
            },
            AppEvent::Input(Err(problem)) => writeln!(stdout, "{problem}")?,
            AppEvent::Msg(msg) => runner.enqueue(session.dispatch(msg)),
            AppEvent::InputClosed => break,
        }

        if session.consume_dirty() {
            write!(stdout, "{}", render::render_list(&session.state().view()))?;
        }
        stdout.flush()?;
    }

    news_info!("Shutting down");
    runner.shutdown();
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    news_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.send(AppEvent::Input(Ok(command))).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(problem) => {
                    if tx.send(AppEvent::Input(Err(problem))).is_err() {
                        return;
                    }
                }
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

#[derive(Debug, PartialEq)]
pub(crate) enum Reaction {
    Dispatch(Vec<Msg>),
    Print(String),
    Quit,
}

/// Owns the news state plus the load-more in-flight flag, which the state
/// deliberately does not track.
pub(crate) struct Session {
    state: NewsState,
    loading_more: bool,
}

impl Session {
    pub(crate) fn new(stale_policy: StaleResultPolicy) -> Self {
        Self {
            state: NewsState::with_stale_policy(stale_policy),
            loading_more: false,
        }
    }

    pub(crate) fn state(&self) -> &NewsState {
        &self.state
    }

    pub(crate) fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        if matches!(
            msg,
            Msg::MoreNewsFetched { .. } | Msg::MoreNewsFetchFailed { .. }
        ) {
            self.loading_more = false;
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }

    pub(crate) fn react(&mut self, command: Command) -> Reaction {
        match command {
            Command::Refresh => match self.state.current_category() {
                Some(category) => {
                    Reaction::Dispatch(vec![Msg::ResetPagination, Msg::FetchCategory(category)])
                }
                None => Reaction::Dispatch(vec![Msg::FetchNews { page: 1 }]),
            },
            Command::More => self.request_more(),
            Command::Category(category) => {
                Reaction::Dispatch(vec![Msg::ResetPagination, Msg::FetchCategory(category)])
            }
            Command::ListCategories => Reaction::Print(render::render_categories()),
            Command::Save(n) => match self.headline(n) {
                Ok(article) => Reaction::Dispatch(vec![Msg::SaveArticle(article)]),
                Err(problem) => Reaction::Print(problem),
            },
            Command::Toggle(n) => match self.headline(n) {
                Ok(article) => Reaction::Dispatch(vec![Msg::ToggleSaved(article)]),
                Err(problem) => Reaction::Print(problem),
            },
            Command::Unsave(n) => match self.state.saved_articles().get(n - 1) {
                Some(article) => Reaction::Dispatch(vec![Msg::UnsaveArticle(article.clone())]),
                None => Reaction::Print(format!("There is no saved article {n}.\n")),
            },
            Command::Saved => Reaction::Print(render::render_saved(self.state.saved_articles())),
            Command::Open(n) => match self.headline(n) {
                Ok(article) => {
                    let saved = self.state.is_saved(&article.url);
                    Reaction::Print(render::render_detail(&article, saved))
                }
                Err(problem) => Reaction::Print(problem),
            },
            Command::OpenSaved(n) => match self.state.saved_articles().get(n - 1) {
                Some(article) => Reaction::Print(render::render_detail(article, true)),
                None => Reaction::Print(format!("There is no saved article {n}.\n")),
            },
            Command::Help => Reaction::Print(format!("{}\n", render::HELP)),
            Command::Quit => Reaction::Quit,
        }
    }

    fn request_more(&mut self) -> Reaction {
        if self.state.is_loading() || self.loading_more {
            news_debug!("Ignoring load-more while a fetch is in flight");
            return Reaction::Print("Still loading…\n".to_string());
        }
        if !self.state.has_more_pages() {
            return Reaction::Print("No more news available.\n".to_string());
        }
        self.loading_more = true;
        Reaction::Dispatch(vec![Msg::LoadMore {
            page: self.state.current_page() + 1,
        }])
    }

    fn headline(&self, n: usize) -> Result<headlines_core::Article, String> {
        self.state
            .articles()
            .get(n - 1)
            .cloned()
            .ok_or_else(|| format!("There is no article {n} in the list.\n"))
    }
}
