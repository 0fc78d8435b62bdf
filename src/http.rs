use anyhow::Context;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

pub(crate) fn http_client(token: Option<&str>) -> anyhow::Result<reqwest::blocking::Client> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Token {token}"))
            .context("session token is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    reqwest::blocking::Client::builder()
        .user_agent(format!("conduit-feed/{}", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .default_headers(headers)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))
}
