//! Loading one page of the article feed and toggling favorites on it.
//!
//! A page is always fetched as a whole: the article listing and the tag list
//! are requested concurrently and the page only exists once both succeed.
//! Favorite toggles follow disable-then-confirm: the article is marked
//! pending before the request goes out, its favorite fields are only ever
//! taken from the server's reply, and it returns to idle however the request
//! ends.

use anyhow::bail;
use tracing::{debug, warn};

use crate::api::{ArticleApi, ListFilter};
use crate::article::{Article, FavoriteState};

pub const PAGE_LIMIT: u32 = 20;

/// Which listing a feed page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    GlobalFeed,
    YourFeed,
    Tag,
}

impl Tab {
    /// Unknown or missing values fall back to the global feed.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("your_feed") => Tab::YourFeed,
            Some("tag") => Tab::Tag,
            _ => Tab::GlobalFeed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::GlobalFeed => "global_feed",
            Tab::YourFeed => "your_feed",
            Tab::Tag => "tag",
        }
    }
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub page: u32,
    pub tag: Option<String>,
    pub tab: Tab,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            page: 1,
            tag: None,
            tab: Tab::GlobalFeed,
        }
    }
}

impl FeedQuery {
    /// Builds a query from raw navigation parameters. Never fails: a missing
    /// or malformed page becomes 1 and an empty tag is no tag.
    pub fn from_params(page: Option<&str>, tag: Option<&str>, tab: Option<&str>) -> Self {
        Self {
            page: parse_page(page),
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
            tab: Tab::parse(tab),
        }
    }

    pub fn limit(&self) -> u32 {
        PAGE_LIMIT
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(PAGE_LIMIT)
    }

    pub fn filter(&self) -> ListFilter {
        ListFilter {
            offset: self.offset(),
            limit: self.limit(),
            tag: self.tag.clone(),
        }
    }
}

pub fn total_pages(articles_count: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    articles_count.div_ceil(u64::from(limit))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: u64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    pub articles: Vec<Article>,
    pub articles_count: u64,
    pub tags: Vec<String>,
    pub page: u32,
    pub tag: Option<String>,
    pub tab: Tab,
}

impl FeedState {
    pub fn query(&self) -> FeedQuery {
        FeedQuery {
            page: self.page,
            tag: self.tag.clone(),
            tab: self.tab,
        }
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.articles_count, PAGE_LIMIT)
    }

    pub fn pages(&self) -> impl Iterator<Item = PageLink> + '_ {
        (1..=self.total_pages()).map(|number| PageLink {
            number,
            active: number == u64::from(self.page),
        })
    }
}

/// Fetches the listing selected by `query` and the tag list concurrently.
/// Fails if either request fails.
pub fn fetch_page<A: ArticleApi + ?Sized>(api: &A, query: &FeedQuery) -> anyhow::Result<FeedState> {
    let filter = query.filter();
    debug!(tab = query.tab.as_str(), ?filter, "loading feed page");

    let (listing, tags) = rayon::join(
        || match query.tab {
            Tab::YourFeed => api.list_feed(&filter),
            Tab::GlobalFeed | Tab::Tag => api.list_articles(&filter),
        },
        || api.list_tags(),
    );
    let listing = listing?;
    let tags = tags?;

    let mut articles = listing.articles;
    for article in &mut articles {
        article.favorite_state = FavoriteState::Idle;
    }

    Ok(FeedState {
        articles,
        articles_count: listing.articles_count,
        tags,
        page: query.page,
        tag: query.tag.clone(),
        tab: query.tab,
    })
}

fn request_toggle<A: ArticleApi + ?Sized>(
    api: &A,
    slug: &str,
    was_favorited: bool,
) -> anyhow::Result<Article> {
    if was_favorited {
        api.unfavorite(slug)
    } else {
        api.favorite(slug)
    }
}

/// Favorites an unfavorited article or unfavorites a favorited one.
///
/// Rejects an article whose previous toggle is still pending. On failure the
/// error is returned and `favorited`/`favorites_count` keep their old values.
pub fn toggle_favorite<A: ArticleApi + ?Sized>(api: &A, article: &mut Article) -> anyhow::Result<()> {
    let was_favorited = article.begin_toggle()?;
    let result = request_toggle(api, &article.slug, was_favorited);
    article.finish_toggle(result.as_ref().ok());
    if let Err(e) = &result {
        warn!(slug = %article.slug, "favorite toggle failed: {e:#}");
    }
    result.map(|_| ())
}

pub type Listener = Box<dyn Fn(&FeedState) + Send>;

fn notify(listeners: &[Listener], state: &FeedState) {
    for listener in listeners {
        listener(state);
    }
}

/// Owns the currently displayed feed page and tells subscribers whenever it
/// changes.
pub struct FeedPageController<A> {
    api: A,
    state: Option<FeedState>,
    listeners: Vec<Listener>,
}

impl<A: ArticleApi> FeedPageController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: None,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> Option<&FeedState> {
        self.state.as_ref()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&FeedState) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the current page with a freshly fetched one. On failure the
    /// previous page is dropped rather than left on display.
    pub fn load(&mut self, query: FeedQuery) -> anyhow::Result<&FeedState> {
        let state = match fetch_page(&self.api, &query) {
            Ok(state) => state,
            Err(e) => {
                self.state = None;
                return Err(e);
            }
        };
        let state = self.state.insert(state);
        notify(&self.listeners, state);
        Ok(&*state)
    }

    /// Reloads only when page, tag or tab differ from what is displayed.
    /// Returns whether a load happened.
    pub fn navigate(&mut self, query: FeedQuery) -> anyhow::Result<bool> {
        if self.state.as_ref().is_some_and(|s| s.query() == query) {
            return Ok(false);
        }
        self.load(query)?;
        Ok(true)
    }

    /// Toggles the favorite state of an article on the current page,
    /// notifying subscribers when it turns pending and again when it settles.
    pub fn toggle_favorite(&mut self, slug: &str) -> anyhow::Result<()> {
        let Some(state) = self.state.as_mut() else {
            bail!("no feed page is loaded");
        };
        let Some(index) = state.articles.iter().position(|a| a.slug == slug) else {
            bail!("article {} is not on this page", slug);
        };

        let was_favorited = state.articles[index].begin_toggle()?;
        notify(&self.listeners, state);

        let result = request_toggle(&self.api, slug, was_favorited);
        state.articles[index].finish_toggle(result.as_ref().ok());
        notify(&self.listeners, state);

        if let Err(e) = &result {
            warn!(slug, "favorite toggle failed: {e:#}");
        }
        result.map(|_| ())
    }
}
