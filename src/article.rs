use anyhow::ensure;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a favorite/unfavorite request for an article is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoriteState {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub following: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: u64,
    pub author: Profile,
    #[serde(skip)]
    pub favorite_state: FavoriteState,
}

impl Article {
    /// True while a favorite toggle for this article awaits the server.
    pub fn is_disabled(&self) -> bool {
        self.favorite_state == FavoriteState::Pending
    }

    /// Moves the article to `Pending` and returns whether it was favorited
    /// before the toggle started.
    pub(crate) fn begin_toggle(&mut self) -> anyhow::Result<bool> {
        ensure!(
            self.favorite_state == FavoriteState::Idle,
            "a favorite request for {} is already in flight",
            self.slug
        );
        self.favorite_state = FavoriteState::Pending;
        Ok(self.favorited)
    }

    /// Applies the server-confirmed favorite fields, if any, and returns to `Idle`.
    pub(crate) fn finish_toggle(&mut self, confirmed: Option<&Article>) {
        if let Some(confirmed) = confirmed {
            self.favorited = confirmed.favorited;
            self.favorites_count = confirmed.favorites_count;
        }
        self.favorite_state = FavoriteState::Idle;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: Profile,
}

#[cfg(test)]
pub(crate) fn test_article(slug: &str, favorited: bool, favorites_count: u64) -> Article {
    use chrono::NaiveDate;

    Article {
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        description: format!("About {slug}"),
        body: String::new(),
        tag_list: Vec::new(),
        created_at: NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc(),
        favorited,
        favorites_count,
        author: Profile {
            username: "jake".to_string(),
            image: None,
            bio: None,
            following: false,
        },
        favorite_state: FavoriteState::Idle,
    }
}
