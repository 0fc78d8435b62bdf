use std::collections::BTreeMap;
use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::article::{Article, Comment};
use crate::session::User;

/// Paging and filtering parameters shared by the two listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub offset: u64,
    pub limit: u32,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub articles_count: u64,
}

/// The article endpoints of a Conduit server.
pub trait ArticleApi: Sync {
    fn list_articles(&self, filter: &ListFilter) -> anyhow::Result<ArticlePage>;
    fn list_feed(&self, filter: &ListFilter) -> anyhow::Result<ArticlePage>;
    fn get_article(&self, slug: &str) -> anyhow::Result<Article>;
    fn get_comments(&self, slug: &str) -> anyhow::Result<Vec<Comment>>;
    fn favorite(&self, slug: &str) -> anyhow::Result<Article>;
    fn unfavorite(&self, slug: &str) -> anyhow::Result<Article>;
    fn list_tags(&self) -> anyhow::Result<Vec<String>>;
}

/// Field-level messages returned with HTTP 422, e.g. `{"email": ["is invalid"]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationErrors(pub BTreeMap<String, Vec<String>>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("\n")?;
                }
                write!(f, "{field} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Deserialize)]
struct ErrorBody {
    errors: ValidationErrors,
}

#[derive(Deserialize)]
struct ArticleBody {
    article: Article,
}

#[derive(Deserialize)]
struct CommentsBody {
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct TagsBody {
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct UserBody<T> {
    user: T,
}

#[derive(Serialize)]
struct LoginForm<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterForm<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// `ArticleApi` over HTTP, plus the user endpoints used to log in.
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<&str>) -> anyhow::Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("invalid API URL {}: {}", base_url, e))?;
        Ok(Self {
            client: crate::http::http_client(token)?,
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API URL cannot have a path: {}", self.base))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn listing(&self, segments: &[&str], filter: &ListFilter) -> anyhow::Result<ArticlePage> {
        let mut url = self.endpoint(segments)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("offset", &filter.offset.to_string())
                .append_pair("limit", &filter.limit.to_string());
            if let Some(tag) = &filter.tag {
                query.append_pair("tag", tag);
            }
        }
        self.send(self.client.get(url))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        let response = request.send()?;
        debug!(url = %response.url(), status = %response.status(), "api response");
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body: ErrorBody = response.json()?;
            return Err(body.errors.into());
        }
        let response = response.error_for_status()?;
        Ok(response.json()?)
    }

    pub fn login(&self, email: &str, password: &str) -> anyhow::Result<User> {
        let url = self.endpoint(&["users", "login"])?;
        let body = UserBody {
            user: LoginForm { email, password },
        };
        let reply: UserBody<User> = self.send(self.client.post(url).json(&body))?;
        Ok(reply.user)
    }

    pub fn register(&self, username: &str, email: &str, password: &str) -> anyhow::Result<User> {
        let url = self.endpoint(&["users"])?;
        let body = UserBody {
            user: RegisterForm {
                username,
                email,
                password,
            },
        };
        let reply: UserBody<User> = self.send(self.client.post(url).json(&body))?;
        Ok(reply.user)
    }
}

impl ArticleApi for HttpApi {
    fn list_articles(&self, filter: &ListFilter) -> anyhow::Result<ArticlePage> {
        self.listing(&["articles"], filter)
    }

    fn list_feed(&self, filter: &ListFilter) -> anyhow::Result<ArticlePage> {
        self.listing(&["articles", "feed"], filter)
    }

    fn get_article(&self, slug: &str) -> anyhow::Result<Article> {
        let url = self.endpoint(&["articles", slug])?;
        let body: ArticleBody = self.send(self.client.get(url))?;
        Ok(body.article)
    }

    fn get_comments(&self, slug: &str) -> anyhow::Result<Vec<Comment>> {
        let url = self.endpoint(&["articles", slug, "comments"])?;
        let body: CommentsBody = self.send(self.client.get(url))?;
        Ok(body.comments)
    }

    fn favorite(&self, slug: &str) -> anyhow::Result<Article> {
        let url = self.endpoint(&["articles", slug, "favorite"])?;
        let body: ArticleBody = self.send(self.client.post(url))?;
        Ok(body.article)
    }

    fn unfavorite(&self, slug: &str) -> anyhow::Result<Article> {
        let url = self.endpoint(&["articles", slug, "favorite"])?;
        let body: ArticleBody = self.send(self.client.delete(url))?;
        Ok(body.article)
    }

    fn list_tags(&self) -> anyhow::Result<Vec<String>> {
        let url = self.endpoint(&["tags"])?;
        let body: TagsBody = self.send(self.client.get(url))?;
        Ok(body.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_api_prefix() {
        let api = HttpApi::new("http://localhost:3000", None).unwrap();
        let url = api.endpoint(&["articles", "feed"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/articles/feed");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpApi::new("http://localhost:3000/conduit/", None).unwrap();
        let url = api.endpoint(&["tags"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/conduit/api/tags");
    }

    #[test]
    fn test_endpoint_escapes_slug() {
        let api = HttpApi::new("http://localhost:3000", None).unwrap();
        let url = api.endpoint(&["articles", "a b/c", "favorite"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/articles/a%20b%2Fc/favorite"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(HttpApi::new("not a url", None).is_err());
    }

    #[test]
    fn test_validation_errors_display() {
        let errors: ValidationErrors = serde_json::from_str(
            r#"{"email": ["has already been taken"], "username": ["can't be blank", "is too short"]}"#,
        )
        .unwrap();
        assert_eq!(
            errors.to_string(),
            "email has already been taken\nusername can't be blank\nusername is too short"
        );
    }
}
