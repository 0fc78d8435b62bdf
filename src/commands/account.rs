use tracing::info;

use crate::session::User;

use super::App;

fn save_user(app: &App, user: &User) -> anyhow::Result<()> {
    app.session.save(user)?;
    info!(username = %user.username, "session saved");
    Ok(())
}

pub fn cmd_login(app: &App, email: &str, password: &str) -> anyhow::Result<()> {
    let user = app.anonymous_api()?.login(email, password)?;
    save_user(app, &user)?;
    println!("Logged in as {}", user.username);
    Ok(())
}

pub fn cmd_register(app: &App, username: &str, email: &str, password: &str) -> anyhow::Result<()> {
    let user = app.anonymous_api()?.register(username, email, password)?;
    save_user(app, &user)?;
    println!("Registered and logged in as {}", user.username);
    Ok(())
}

pub fn cmd_logout(app: &App) -> anyhow::Result<()> {
    if app.session.clear()? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub fn cmd_whoami(app: &App) -> anyhow::Result<()> {
    let user = app.require_user()?;
    println!("{} <{}>", user.username, user.email);
    Ok(())
}
