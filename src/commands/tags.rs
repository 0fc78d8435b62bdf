use crate::api::ArticleApi;

use super::App;

fn render_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "none\n".to_string();
    }
    tags.iter().map(|tag| format!("{tag}\n")).collect()
}

pub fn cmd_tags(app: &App) -> anyhow::Result<()> {
    let tags = app.api()?.list_tags()?;
    print!("{}", render_tags(&tags));
    Ok(())
}
