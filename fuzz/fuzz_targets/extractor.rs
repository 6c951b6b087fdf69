#![no_main]

use chrono::Utc;
use libfuzzer_sys::fuzz_target;

use newsmood::extractor::ListingExtractor;
use newsmood::sources::{SelectorSet, SourceDescriptor};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);

    let source = SourceDescriptor {
        name: "Fuzz".to_string(),
        url: "https://example.com/news/".to_string(),
        category: "General".to_string(),
        selectors: SelectorSet {
            article: "article, li, div".to_string(),
            title: "h1, h2, h3, a".to_string(),
            link: "a".to_string(),
            summary: Some("p".to_string()),
        },
    };
    let extractor = ListingExtractor::new(&source).unwrap();

    // never panics, never exceeds the cap
    let candidates = extractor.extract_page(&html, 20, Utc::now());
    assert!(candidates.len() <= 20);
});
