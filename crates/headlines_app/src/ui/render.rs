use std::fmt::Write;

use chrono::DateTime;
use headlines_core::{AppViewModel, Article, Category, ListFooter, ListStatus};

pub const HELP: &str = "\
Commands:
  r, refresh          reload the first page
  m, more             load the next page
  c, category <name>  show a category (see `categories`)
  s, save <n>         bookmark article n
  t, toggle <n>       bookmark or un-bookmark article n
  saved               list bookmarked articles
  u, unsave <n>       remove bookmark n from the saved list
  o, open <n>         show article n in full
  os, open-saved <n>  show saved article n in full
  h, help             this text
  q, quit             exit";

/// Renders the headline list the way the main screen shows it.
pub fn render_list(view: &AppViewModel) -> String {
    let mut out = String::new();
    if let Some(category) = view.category {
        let _ = writeln!(out, "== Category: {} ==", category.label());
    }

    match &view.status {
        ListStatus::Error(message) => {
            let _ = writeln!(out, "Error: {message}");
            return out;
        }
        ListStatus::Loading => {
            let _ = writeln!(out, "Loading headlines…");
            return out;
        }
        ListStatus::Empty => {
            let _ = writeln!(out, "No news found.");
            return out;
        }
        ListStatus::Ready => {}
    }

    for row in &view.rows {
        let marker = if row.saved { "[*]" } else { "[ ]" };
        let _ = writeln!(
            out,
            "{:>3}. {} {}\n      {} · {}",
            row.number,
            marker,
            row.title,
            row.source,
            format_date(&row.published_at, "%d %b")
        );
    }

    // Errors from load-more keep the list visible; show them underneath.
    if let Some(message) = &view.error {
        let _ = writeln!(out, "Error: {message}");
    }
    match view.footer {
        ListFooter::Loading => {
            let _ = writeln!(out, "Loading…");
        }
        ListFooter::EndOfList => {
            let _ = writeln!(out, "No more news available.");
        }
        ListFooter::None => {}
    }
    let _ = writeln!(
        out,
        "page {} · {} saved",
        view.current_page, view.saved_count
    );
    out
}

pub fn render_saved(articles: &[Article]) -> String {
    if articles.is_empty() {
        return "You have no saved articles yet. Use `save <n>` to bookmark one.\n".to_string();
    }
    let mut out = String::from("== Saved articles ==\n");
    for (index, article) in articles.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {}\n      {} · {}",
            index + 1,
            article.title,
            article.source.name,
            format_date(&article.published_at, "%d %b %Y")
        );
    }
    out
}

pub fn render_detail(article: &Article, saved: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", article.title);
    let _ = writeln!(
        out,
        "{} · {}{}",
        article.source.name,
        format_date(&article.published_at, "%d %b %Y %H:%M"),
        if saved { " · saved" } else { "" }
    );
    if let Some(author) = &article.author {
        let _ = writeln!(out, "By {author}");
    }
    if let Some(description) = &article.description {
        let _ = writeln!(out, "\n{description}");
    }
    if let Some(content) = &article.content {
        let _ = writeln!(out, "\n{content}");
    }
    let _ = writeln!(out, "\nRead more: {}", article.url);
    out
}

pub fn render_categories() -> String {
    let mut out = String::from("Categories:\n");
    for category in Category::ALL {
        let _ = writeln!(out, "  {:<14} {}", category.as_query_value(), category.label());
    }
    out
}

/// Falls back to the raw value when the API sent something that is not RFC 3339.
fn format_date(published_at: &str, format: &str) -> String {
    DateTime::parse_from_rfc3339(published_at)
        .map(|date| date.format(format).to_string())
        .unwrap_or_else(|_| published_at.to_string())
}
