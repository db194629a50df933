// src/geocode.rs
//! Address search against OneMap (Singapore's national map service).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::geo::Coord;
use crate::metrics::{GEOCODER_MISSES, GEOCODER_REQUESTS};

/// Best match for a search query.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub building: String,
    pub block: String,
    pub road: String,
    pub postal: String,
    pub coord: Coord,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the service found nothing for `query`.
    async fn search(&self, query: &str) -> Result<Option<Place>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    found: u64,
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SearchResult {
    #[serde(default)]
    building: String,
    #[serde(default)]
    blk_no: String,
    #[serde(default)]
    road_name: String,
    #[serde(default)]
    postal: String,
    latitude: String,
    longitude: String,
}

pub struct OneMapClient {
    client: Client,
    search_url: String,
    timeout: Option<Duration>,
}

impl OneMapClient {
    pub fn new(search_url: &str) -> Self {
        Self {
            client: Client::new(),
            search_url: search_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Geocoder for OneMapClient {
    async fn search(&self, query: &str) -> Result<Option<Place>> {
        let mut req = self.client.get(&self.search_url).query(&[
            ("searchVal", query),
            ("returnGeom", "Y"),
            ("getAddrDetails", "Y"),
            ("pageNum", "1"),
        ]);
        if let Some(t) = self.timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await.context("onemap search request")?;
        info!(status = %resp.status(), url = %resp.url(), "onemap request");
        counter!(GEOCODER_REQUESTS).increment(1);

        let body = resp.text().await.context("onemap search body")?;
        let place = parse_search(&body).with_context(|| format!("onemap search for {query:?}"))?;
        if place.is_none() {
            counter!(GEOCODER_MISSES).increment(1);
        }
        Ok(place)
    }
}

/// Parse a OneMap search body and keep the first result.
pub fn parse_search(body: &str) -> Result<Option<Place>> {
    let resp: SearchResponse = serde_json::from_str(body).context("parse onemap json")?;
    if resp.found == 0 {
        return Ok(None);
    }
    let Some(first) = resp.results.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = first
        .latitude
        .trim()
        .parse()
        .map_err(|_| anyhow!("bad LATITUDE {:?}", first.latitude))?;
    let lon: f64 = first
        .longitude
        .trim()
        .parse()
        .map_err(|_| anyhow!("bad LONGITUDE {:?}", first.longitude))?;

    Ok(Some(Place {
        building: first.building,
        block: first.blk_no,
        road: first.road_name,
        postal: first.postal,
        coord: Coord::new(lat, lon),
    }))
}
