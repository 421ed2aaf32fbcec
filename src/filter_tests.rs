//! Unit tests for search and filtering.

use super::*;

fn catalog() -> Vec<Site> {
    vec![
        Site::new("alpha.com", 100.0, 1000.0, 20.0),
        Site::new("beta.io", 250.0, 50000.0, 50.0),
        Site::new("gamma.com", 50.0, 200.0, 49.9),
        Site::new("Alpha-news.org", 400.0, 90000.0, 80.0),
    ]
}

fn urls<'a>(sites: &[&'a Site]) -> Vec<&'a str> {
    sites.iter().map(|s| s.url.as_str()).collect()
}

#[test]
fn empty_filter_returns_full_catalog_in_order() {
    let sites = catalog();
    let result = visible(&sites, &SiteFilter::default());
    assert_eq!(
        urls(&result),
        vec!["alpha.com", "beta.io", "gamma.com", "Alpha-news.org"]
    );
}

#[test]
fn query_is_case_sensitive_substring() {
    let sites = catalog();
    let result = visible(&sites, &SiteFilter::default().query("lpha"));
    assert_eq!(urls(&result), vec!["alpha.com", "Alpha-news.org"]);

    let result = visible(&sites, &SiteFilter::default().query("alpha"));
    assert_eq!(urls(&result), vec!["alpha.com"]);
}

#[test]
fn min_da_is_inclusive() {
    let sites = catalog();
    let result = visible(&sites, &SiteFilter::default().min_da("50"));
    assert_eq!(urls(&result), vec!["beta.io", "Alpha-news.org"]);
    assert!(result.iter().all(|s| s.da >= 50.0));
}

#[test]
fn max_price_is_inclusive() {
    let sites = catalog();
    let result = visible(&sites, &SiteFilter::default().max_price("100"));
    assert_eq!(urls(&result), vec!["alpha.com", "gamma.com"]);
}

#[test]
fn min_traffic_is_inclusive() {
    let sites = catalog();
    let result = visible(&sites, &SiteFilter::default().min_traffic("50000"));
    assert_eq!(urls(&result), vec!["beta.io", "Alpha-news.org"]);
}

#[test]
fn all_criteria_must_match() {
    let sites = catalog();
    let filter = SiteFilter::default()
        .query(".com")
        .min_da("10")
        .max_price("200")
        .min_traffic("500");
    let result = visible(&sites, &filter);
    assert_eq!(urls(&result), vec!["alpha.com"]);
}

#[test]
fn zero_threshold_is_not_ignored() {
    let sites = vec![Site::new("free.com", 0.0, 0.0, 0.0), Site::new("paid.com", 5.0, 0.0, 0.0)];
    let result = visible(&sites, &SiteFilter::default().max_price("0"));
    assert_eq!(urls(&result), vec!["free.com"]);
}

#[test]
fn non_numeric_threshold_means_no_filter() {
    let sites = catalog();
    let filter = SiteFilter::default()
        .min_da("lots")
        .max_price("?")
        .min_traffic("  ");
    assert_eq!(visible(&sites, &filter).len(), sites.len());
}

#[test]
fn deserializes_from_query_params() {
    let filter: SiteFilter = serde_json::from_str(r#"{"q":"beta","min_da":"30"}"#).unwrap();
    assert_eq!(filter, SiteFilter::default().query("beta").min_da("30"));
}
