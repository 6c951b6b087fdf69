use chrono::Utc;
use scraper::{Html, Selector};
use std::fs;

use crate::extractor::ListingExtractor;
use crate::sources::{SelectorSet, SourceDescriptor};

fn ledger_source(summary: Option<&str>) -> SourceDescriptor {
    SourceDescriptor {
        name: "Daily Ledger".to_string(),
        url: "https://ledger.example.com/latest/".to_string(),
        category: "General".to_string(),
        selectors: SelectorSet {
            article: "div.story".to_string(),
            title: "h2.headline".to_string(),
            link: "a.story-link".to_string(),
            summary: summary.map(str::to_string),
        },
    }
}

fn fixture() -> String {
    fs::read_to_string("src/extractor/tests/fixtures/listing.html")
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_listing_page() {
    let extractor = ListingExtractor::new(&ledger_source(Some("p.dek"))).unwrap();
    let candidates = extractor.extract_page(&fixture(), 20, Utc::now());

    assert_eq!(candidates.len(), 3);

    let first = &candidates[0];
    assert_eq!(
        first.title,
        "Scientists celebrate breakthrough in malaria vaccine"
    );
    assert_eq!(
        first.url,
        "https://ledger.example.com/health/malaria-vaccine-breakthrough"
    );
    assert_eq!(
        first.summary.as_deref(),
        Some("A new vaccine showed strong protection in a large trial.")
    );
    assert_eq!(
        first.image_url.as_deref(),
        Some("https://ledger.example.com/images/malaria.jpg")
    );
    assert_eq!(first.read_time, 1);
    assert_eq!(first.source, "Daily Ledger");
    assert_eq!(first.category, "General");

    let second = &candidates[1];
    assert_eq!(second.url, "https://ledger.example.com/business/markets-tumble");
    assert_eq!(second.summary, None);
    // inline placeholder in src falls back to the lazy-load attribute
    assert_eq!(
        second.image_url.as_deref(),
        Some("https://cdn.example.com/markets.png")
    );

    let third = &candidates[2];
    assert_eq!(third.title, "City council approves new park");
    assert_eq!(third.url, "https://ledger.example.com/latest/local/new-park");
    assert_eq!(third.summary, None);
    assert_eq!(third.image_url, None);
}

#[test]
fn test_cap_truncates_containers_before_extraction() {
    let extractor = ListingExtractor::new(&ledger_source(Some("p.dek"))).unwrap();

    let two = extractor.extract_page(&fixture(), 2, Utc::now());
    assert_eq!(two.len(), 2);
    assert!(two[0].title.starts_with("Scientists"));
    assert!(two[1].title.starts_with("Markets"));

    // third container has no title, so a cap of 3 still yields two
    let three = extractor.extract_page(&fixture(), 3, Utc::now());
    assert_eq!(three.len(), 2);

    assert!(extractor.extract_page(&fixture(), 0, Utc::now()).is_empty());
}

#[test]
fn test_missing_title_selector_match_yields_none() {
    let mut source = ledger_source(None);
    source.selectors.title = "h3.nothing-here".to_string();
    let extractor = ListingExtractor::new(&source).unwrap();

    let document = Html::parse_document(&fixture());
    let containers = Selector::parse("div.story").unwrap();
    for container in document.select(&containers) {
        assert!(extractor.extract(container, Utc::now()).is_none());
    }
}

#[test]
fn test_blank_summary_selector_is_ignored() {
    let extractor = ListingExtractor::new(&ledger_source(Some("  "))).unwrap();
    let candidates = extractor.extract_page(&fixture(), 20, Utc::now());
    assert_eq!(candidates.len(), 3);
    assert!(candidates.iter().all(|c| c.summary.is_none()));
}

#[test]
fn test_read_time_from_long_summary() {
    let summary = vec!["update"; 400].join(" ");
    let html = format!(
        r#"<html><body><div class="story"><h2 class="headline">Long read</h2><a class="story-link" href="/long">x</a><p class="dek">{summary}</p></div></body></html>"#
    );
    let extractor = ListingExtractor::new(&ledger_source(Some("p.dek"))).unwrap();
    let candidates = extractor.extract_page(&html, 20, Utc::now());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].read_time, 2);
}

#[test]
fn test_invalid_selector_is_reported() {
    let mut source = ledger_source(None);
    source.selectors.article = "div[".to_string();
    let err = ListingExtractor::new(&source).unwrap_err();
    assert!(err.to_string().contains("article"));
}

#[test]
fn test_malformed_html() {
    let html = r#"<div class="story"><h2 class="headline">Broken <b>markup<div><a class="story-link" href="/broken">go"#;
    let extractor = ListingExtractor::new(&ledger_source(None)).unwrap();
    // html5ever repairs the tree; the call must not panic whatever it produces
    let candidates = extractor.extract_page(html, 20, Utc::now());
    assert!(candidates.len() <= 1);
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let extractor = ListingExtractor::new(&ledger_source(Some("p.dek"))).unwrap();
            let _ = extractor.extract_page(&html, 20, Utc::now());
        }

        #[test]
        fn test_host_relative_links_gain_source_origin(path in "/[a-z0-9]{1,12}(/[a-z0-9]{1,12}){0,3}") {
            let html = format!(
                r#"<div class="story"><h2 class="headline">Headline</h2><a class="story-link" href="{path}">x</a></div>"#
            );
            let extractor = ListingExtractor::new(&ledger_source(None)).unwrap();
            let candidates = extractor.extract_page(&html, 20, Utc::now());
            prop_assert_eq!(candidates.len(), 1);
            prop_assert!(candidates[0].url.starts_with("https://ledger.example.com/"));
            prop_assert_ne!(&candidates[0].url, &path);
        }
    }
}
