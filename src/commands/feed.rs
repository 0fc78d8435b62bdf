use std::fmt::Write;
use std::io::IsTerminal;

use anyhow::ensure;
use itertools::Itertools;

use crate::article::Article;
use crate::feed_page::{FeedPageController, FeedQuery, FeedState, Tab};

use super::{App, Style, format_date, spinner};

fn render_tabs(state: &FeedState, style: &Style) -> String {
    let mut tabs = vec![
        ("Your Feed".to_string(), state.tab == Tab::YourFeed),
        ("Global Feed".to_string(), state.tab == Tab::GlobalFeed),
    ];
    if let Some(tag) = &state.tag {
        tabs.push((format!("#{tag}"), state.tab == Tab::Tag));
    }
    tabs.into_iter()
        .map(|(label, active)| {
            if active {
                format!("{}[{label}]{}", style.bold, style.reset)
            } else {
                format!("{}{label}{}", style.dim, style.reset)
            }
        })
        .join("  ")
}

fn format_article(article: &Article, style: &Style) -> String {
    let heart = if article.favorited { "♥" } else { "♡" };
    let mut out = format!(
        "{}{}{}  {}{}{}  {heart} {}\n    {}by {} [{}]{}\n",
        style.accent,
        format_date(&article.created_at),
        style.reset,
        style.bold,
        article.title,
        style.reset,
        article.favorites_count,
        style.dim,
        article.author.username,
        article.slug,
        style.reset,
    );
    if !article.description.is_empty() {
        out.push_str(&format!("    {}\n", article.description));
    }
    out
}

fn render_pages(state: &FeedState, style: &Style) -> String {
    state
        .pages()
        .map(|page| {
            if page.active {
                format!("{}[{}]{}", style.bold, page.number, style.reset)
            } else {
                page.number.to_string()
            }
        })
        .join(" ")
}

pub(crate) fn render_feed(state: &FeedState, color: bool) -> String {
    let style = Style::new(color);
    let mut out = String::new();

    writeln!(out, "{}", render_tabs(state, &style)).unwrap();
    writeln!(out).unwrap();

    if state.articles.is_empty() {
        writeln!(out, "No articles are here... yet.").unwrap();
        writeln!(out).unwrap();
    }
    for article in &state.articles {
        writeln!(out, "{}", format_article(article, &style)).unwrap();
    }

    if state.tags.is_empty() {
        writeln!(out, "Popular tags: none").unwrap();
    } else {
        writeln!(out, "Popular tags: {}", state.tags.iter().join(", ")).unwrap();
    }

    if state.total_pages() > 0 {
        writeln!(out, "Pages: {}", render_pages(state, &style)).unwrap();
    }
    out
}

pub fn cmd_feed(
    app: &App,
    page: Option<&str>,
    tag: Option<&str>,
    tab: Option<&str>,
) -> anyhow::Result<()> {
    let query = FeedQuery::from_params(page, tag, tab);
    if query.tab == Tab::YourFeed {
        ensure!(
            app.session.load()?.is_some(),
            "Log in to see your feed. Run `conduit login` first"
        );
    }

    let color = std::io::stdout().is_terminal();
    let pb = spinner("Loading articles...");
    let mut controller = FeedPageController::new(app.api()?);
    let view = pb.clone();
    controller.subscribe(move |state| view.suspend(|| print!("{}", render_feed(state, color))));

    let result = controller.navigate(query);
    pb.finish_and_clear();
    result?;
    Ok(())
}
