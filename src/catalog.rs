//! Catalog import and lookup.
//!
//! Imports read headerless CSV with the columns `URL,Price,Traffic,DA,Email`.
//! Extra columns are ignored, missing ones take their defaults, and rows with
//! an empty URL are dropped. A successful import replaces the catalog wholesale.

use crate::error::Result;
use crate::field_parsers::number_or_zero;
use crate::models::Site;
use log::{debug, warn};
use std::collections::HashMap;

const URL_COLUMN: usize = 0;
const PRICE_COLUMN: usize = 1;
const TRAFFIC_COLUMN: usize = 2;
const DA_COLUMN: usize = 3;
const EMAIL_COLUMN: usize = 4;

/// Sites parsed from one CSV payload
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub sites: Vec<Site>,
    /// Rows dropped for having no URL
    pub skipped: usize,
}

/// Parses a CSV payload into sites.
///
/// Fails only when the payload is structurally unreadable (for example invalid
/// UTF-8); malformed numbers become 0. A URL seen twice keeps the position of
/// its first row and the values of its last row.
pub fn parse_sites(data: &[u8]) -> Result<ParsedCatalog> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut parsed = ParsedCatalog::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let Some(site) = site_from_record(&record) else {
            debug!("Row {}: empty URL, skipping", row + 1);
            parsed.skipped += 1;
            continue;
        };

        match positions.get(&site.url) {
            Some(&index) => {
                warn!("Row {}: duplicate URL '{}', keeping latest values", row + 1, site.url);
                parsed.sites[index] = site;
            }
            None => {
                positions.insert(site.url.clone(), parsed.sites.len());
                parsed.sites.push(site);
            }
        }
    }

    Ok(parsed)
}

fn site_from_record(record: &csv::StringRecord) -> Option<Site> {
    let url = record.get(URL_COLUMN).unwrap_or_default();
    if url.is_empty() {
        return None;
    }

    Some(Site {
        url: url.to_string(),
        price: number_or_zero(record.get(PRICE_COLUMN)),
        traffic: number_or_zero(record.get(TRAFFIC_COLUMN)),
        da: number_or_zero(record.get(DA_COLUMN)),
        email: record.get(EMAIL_COLUMN).unwrap_or_default().to_string(),
    })
}

/// In-memory site listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    sites: Vec<Site>,
}

impl Catalog {
    pub fn from_sites(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Looks up a site by exact URL
    pub fn get(&self, url: &str) -> Option<&Site> {
        self.sites.iter().find(|site| site.url == url)
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
