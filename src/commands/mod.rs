pub mod account;
pub mod article;
pub mod favorite;
pub mod feed;
pub mod tags;

use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::HttpApi;
use crate::session::{Session, User};

/// Everything a command needs to reach the server and the local session.
pub struct App {
    pub api_url: String,
    pub session: Session,
}

impl App {
    pub fn new(api_url: impl Into<String>, session: Session) -> Self {
        Self {
            api_url: api_url.into(),
            session,
        }
    }

    /// An API client carrying the stored session token, if any.
    pub fn api(&self) -> anyhow::Result<HttpApi> {
        let user = self.session.load()?;
        HttpApi::new(&self.api_url, user.as_ref().map(|u| u.token.as_str()))
    }

    pub fn anonymous_api(&self) -> anyhow::Result<HttpApi> {
        HttpApi::new(&self.api_url, None)
    }

    pub fn require_user(&self) -> anyhow::Result<User> {
        self.session
            .load()?
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `conduit login` first"))
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) struct Style {
    pub bold: &'static str,
    pub dim: &'static str,
    pub accent: &'static str,
    pub reset: &'static str,
}

impl Style {
    pub fn new(color: bool) -> Self {
        if color {
            Self {
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                accent: "\x1b[36m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                bold: "",
                dim: "",
                accent: "",
                reset: "",
            }
        }
    }
}
