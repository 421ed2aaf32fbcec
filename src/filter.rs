//! Search and threshold filtering over the catalog.

use crate::field_parsers::parse_threshold;
use crate::models::Site;
use serde::Deserialize;

/// Raw filter input as typed by the user.
///
/// Thresholds stay strings: empty or non-numeric text imposes no constraint,
/// while `"0"` is a real threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteFilter {
    /// Case-sensitive substring of the URL
    #[serde(rename = "q")]
    pub query: String,
    pub min_da: String,
    pub max_price: String,
    pub min_traffic: String,
}

impl SiteFilter {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn min_da(mut self, value: impl Into<String>) -> Self {
        self.min_da = value.into();
        self
    }

    pub fn max_price(mut self, value: impl Into<String>) -> Self {
        self.max_price = value.into();
        self
    }

    pub fn min_traffic(mut self, value: impl Into<String>) -> Self {
        self.min_traffic = value.into();
        self
    }

    fn compile(&self) -> Criteria<'_> {
        Criteria {
            query: self.query.as_str(),
            min_da: parse_threshold(&self.min_da),
            max_price: parse_threshold(&self.max_price),
            min_traffic: parse_threshold(&self.min_traffic),
        }
    }
}

/// Thresholds parsed once per filter pass
struct Criteria<'a> {
    query: &'a str,
    min_da: Option<f64>,
    max_price: Option<f64>,
    min_traffic: Option<f64>,
}

impl Criteria<'_> {
    fn matches(&self, site: &Site) -> bool {
        if !self.query.is_empty() && !site.url.contains(self.query) {
            return false;
        }
        if self.min_da.is_some_and(|min| site.da < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| site.price > max) {
            return false;
        }
        if self.min_traffic.is_some_and(|min| site.traffic < min) {
            return false;
        }
        true
    }
}

/// Returns the sites matching every criterion of `filter`, in catalog order.
pub fn visible<'a>(sites: &'a [Site], filter: &SiteFilter) -> Vec<&'a Site> {
    let criteria = filter.compile();
    sites.iter().filter(|site| criteria.matches(site)).collect()
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
