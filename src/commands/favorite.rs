use crate::api::ArticleApi;
use crate::feed_page::toggle_favorite;

use super::App;

pub fn cmd_favorite(app: &App, slug: &str) -> anyhow::Result<()> {
    app.require_user()?;
    let api = app.api()?;
    let mut article = api.get_article(slug)?;
    toggle_favorite(&api, &mut article)?;
    let verb = if article.favorited {
        "Favorited"
    } else {
        "Unfavorited"
    };
    println!(
        "{} \"{}\" ({} favorites)",
        verb, article.title, article.favorites_count
    );
    Ok(())
}
