// src/stations/mod.rs
//! Station table: rail station names resolved to coordinates once, cached on
//! disk, and scanned for the station nearest to an office.

pub mod names;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::fsio::write_atomic;
use crate::geo::{geodesic_distance, Coord};
use crate::geocode::Geocoder;

pub use names::load_station_names;

/// Cached as `{"name", "latitude", "longitude"}`; coordinates are null when
/// the geocoder found nothing for the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Station {
    pub fn new(name: impl Into<String>, coord: Option<Coord>) -> Self {
        Self {
            name: name.into(),
            latitude: coord.map(|c| c.lat),
            longitude: coord.map(|c| c.lon),
        }
    }

    pub fn coord(&self) -> Option<Coord> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coord::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub name: &'a str,
    pub meters: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Resolve every name in order, one lookup each. Misses stay in the table
    /// without coordinates.
    pub async fn build(names: &[String], geocoder: &dyn Geocoder) -> Result<Self> {
        let total = names.len();
        let mut stations = Vec::with_capacity(total);
        for (i, name) in names.iter().enumerate() {
            let place = geocoder
                .search(name)
                .await
                .with_context(|| format!("geocoding station {name:?}"))?;
            let coord = match place {
                Some(p) => Some(p.coord),
                None => {
                    warn!(station = %name, "no geocoding result for station");
                    None
                }
            };
            info!(station = %name, progress = %format!("{}/{}", i + 1, total), "station resolved");
            stations.push(Station::new(name.clone(), coord));
        }
        Ok(Self { stations })
    }

    /// `Ok(None)` if no cache exists yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading station cache {}", path.display()))?;
        let table: StationTable = serde_json::from_str(&raw)
            .with_context(|| format!("parsing station cache {}", path.display()))?;
        Ok(Some(table))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self).context("serializing station table")?;
        write_atomic(path, &bytes)
    }

    /// Use the cache at `cache` if present, otherwise build from the names file
    /// and write the cache.
    pub async fn load_or_build(
        cache: &Path,
        names_path: &Path,
        geocoder: &dyn Geocoder,
    ) -> Result<Self> {
        if let Some(table) = Self::load(cache)? {
            info!(stations = table.len(), path = %cache.display(), "station cache loaded");
            return Ok(table);
        }
        info!(path = %cache.display(), "no station cache, building one");
        Self::refresh(cache, names_path, geocoder).await
    }

    /// Rebuild from the names file and overwrite the cache.
    pub async fn refresh(cache: &Path, names_path: &Path, geocoder: &dyn Geocoder) -> Result<Self> {
        let names = load_station_names(names_path)?;
        let table = Self::build(&names, geocoder).await?;
        table.save(cache)?;
        info!(stations = table.len(), path = %cache.display(), "station cache written");
        Ok(table)
    }

    /// Station with the smallest geodesic distance to `origin`; the first one
    /// wins on ties. Stations without coordinates are ignored.
    pub fn nearest(&self, origin: Coord) -> Option<Nearest<'_>> {
        let mut best: Option<Nearest<'_>> = None;
        for st in &self.stations {
            let Some(coord) = st.coord() else { continue };
            let meters = geodesic_distance(origin, coord);
            if best.map_or(true, |b| meters < b.meters) {
                best = Some(Nearest {
                    name: &st.name,
                    meters,
                });
            }
        }
        best
    }
}
