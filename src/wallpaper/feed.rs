//! Peapix Bing feed client

use bytes::Bytes;
use chrono::NaiveDate;
use serde::Deserialize;

use super::error::WallpaperError;

pub const FEED_URL: &str = "https://peapix.com/bing/feed";

/// The feed host rejects requests without a browser-like agent.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:99.0) Gecko/20100101 Firefox/99.0";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub date: NaiveDate,
    pub image_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

/// Raw feed body together with its parsed entries
#[derive(Debug, Clone)]
pub struct Feed {
    pub raw: String,
    pub entries: Vec<FeedEntry>,
}

/// Blocking HTTP GET returning the whole response body.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Bytes, WallpaperError>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, WallpaperError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WallpaperError::network(FEED_URL, e))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Bytes, WallpaperError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| WallpaperError::network(url, e))?;

        if !response.status().is_success() {
            return Err(WallpaperError::network(
                url,
                format!("server returned status {}", response.status()),
            ));
        }

        response.bytes().map_err(|e| WallpaperError::network(url, e))
    }
}

pub fn feed_url(country: &str) -> String {
    format!("{}?country={}", FEED_URL, urlencoding::encode(country))
}

pub fn parse_feed(body: &str) -> Result<Vec<FeedEntry>, WallpaperError> {
    serde_json::from_str(body).map_err(|e| WallpaperError::parse("wallpaper feed", e))
}

/// Fetch and parse the feed for `country` (empty for the global feed)
pub fn fetch_feed<F: Fetcher + ?Sized>(fetcher: &F, country: &str) -> Result<Feed, WallpaperError> {
    let url = feed_url(country);
    let body = fetcher.fetch(&url)?;
    let raw = String::from_utf8(body.to_vec())
        .map_err(|e| WallpaperError::parse("wallpaper feed", e))?;
    let entries = parse_feed(&raw)?;
    Ok(Feed { raw, entries })
}
