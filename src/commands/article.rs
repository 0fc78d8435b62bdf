use std::fmt::Write;
use std::io::IsTerminal;

use crate::api::ArticleApi;
use crate::article::{Article, Comment};

use super::{App, Style, format_date, spinner};

fn render_article(article: &Article, comments: &[Comment], color: bool) -> String {
    let style = Style::new(color);
    let mut out = String::new();

    writeln!(out, "{}{}{}", style.bold, article.title, style.reset).unwrap();
    writeln!(
        out,
        "{}by {} on {}{}  {} {}",
        style.dim,
        article.author.username,
        format_date(&article.created_at),
        style.reset,
        if article.favorited { "♥" } else { "♡" },
        article.favorites_count
    )
    .unwrap();
    if !article.tag_list.is_empty() {
        let tags: Vec<String> = article.tag_list.iter().map(|t| format!("#{t}")).collect();
        writeln!(out, "{}{}{}", style.accent, tags.join(" "), style.reset).unwrap();
    }
    writeln!(out).unwrap();
    if !article.description.is_empty() {
        writeln!(out, "{}", article.description).unwrap();
        writeln!(out).unwrap();
    }
    if !article.body.is_empty() {
        writeln!(out, "{}", article.body.trim_end()).unwrap();
        writeln!(out).unwrap();
    }

    writeln!(out, "--- Comments ({}) ---", comments.len()).unwrap();
    for comment in comments {
        writeln!(out).unwrap();
        writeln!(
            out,
            "{}{} on {}{}",
            style.dim,
            comment.author.username,
            format_date(&comment.created_at),
            style.reset
        )
        .unwrap();
        writeln!(out, "{}", comment.body.trim_end()).unwrap();
    }
    out
}

/// Fetches an article and its comments concurrently. Both must succeed.
pub(crate) fn fetch_article<A: ArticleApi + ?Sized>(
    api: &A,
    slug: &str,
) -> anyhow::Result<(Article, Vec<Comment>)> {
    let (article, comments) = rayon::join(|| api.get_article(slug), || api.get_comments(slug));
    Ok((article?, comments?))
}

pub fn cmd_article(app: &App, slug: &str) -> anyhow::Result<()> {
    let api = app.api()?;
    let pb = spinner("Loading article...");
    let result = fetch_article(&api, slug);
    pb.finish_and_clear();
    let (article, comments) = result?;
    print!(
        "{}",
        render_article(&article, &comments, std::io::stdout().is_terminal())
    );
    Ok(())
}
