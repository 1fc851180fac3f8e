// src/scraping/reducer.rs
//! Narrows rendered HTML down to the container most likely holding the job body

use scraper::{Html, Selector};
use tracing::debug;

/// Tried in order; the first selector whose first match is long enough wins.
const JOB_CONTAINER_SELECTORS: [&str; 7] = [
    "[class*=\"job-detail\"]",
    "[class*=\"job-description\"]",
    "[id*=\"job-detail\"]",
    "[id*=\"job-description\"]",
    "main",
    "article",
    "[role=\"main\"]",
];

const STRIPPED_ELEMENTS: &str = "script, style, noscript, iframe";

/// A container must carry more than this many characters of text.
pub const MIN_CONTAINER_TEXT_LEN: usize = 100;

pub fn reduce_html(html: &str) -> String {
    let mut document = Html::parse_document(html);
    strip_noise(&mut document);

    if let Some(fragment) = find_job_container(&document) {
        return fragment;
    }

    debug!("No job container matched, falling back to body");
    body_html(&document)
}

fn strip_noise(document: &mut Html) {
    let Ok(selector) = Selector::parse(STRIPPED_ELEMENTS) else {
        return;
    };

    let ids: Vec<_> = document.select(&selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn find_job_container(document: &Html) -> Option<String> {
    for selector_str in JOB_CONTAINER_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        if let Some(element) = document.select(&selector).next() {
            let text_len: usize = element.text().map(|t| t.chars().count()).sum();
            if text_len > MIN_CONTAINER_TEXT_LEN {
                debug!("Job container matched {} ({} chars)", selector_str, text_len);
                return Some(element.inner_html());
            }
        }
    }
    None
}

fn body_html(document: &Html) -> String {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(|b| b.inner_html()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text(n: usize) -> String {
        "x".repeat(n)
    }

    #[test]
    fn test_job_detail_class_wins() {
        let html = format!(
            r#"<html><body>
                <main><p>{}</p></main>
                <div class="posting job-details-panel"><p>{}</p></div>
            </body></html>"#,
            long_text(200),
            long_text(150)
        );

        let reduced = reduce_html(&html);
        assert_eq!(reduced, format!("<p>{}</p>", long_text(150)));
    }

    #[test]
    fn test_short_candidate_is_skipped() {
        let html = format!(
            r#"<html><body>
                <div id="job-description-short">too short</div>
                <article><h1>Role</h1><p>{}</p></article>
            </body></html>"#,
            long_text(120)
        );

        let reduced = reduce_html(&html);
        assert!(reduced.contains("<h1>Role</h1>"));
        assert!(!reduced.contains("too short"));
    }

    #[test]
    fn test_first_match_not_best_match() {
        // Only the first `main` is considered, even if a later one is longer.
        let html = format!(
            r#"<html><body>
                <main>short</main>
                <main>{}</main>
                <div role="main">{}</div>
            </body></html>"#,
            long_text(500),
            long_text(101)
        );

        let reduced = reduce_html(&html);
        assert_eq!(reduced, long_text(101));
    }

    #[test]
    fn test_falls_back_to_body() {
        let html = r#"<html><body><div class="job-detail">Small</div><p>Apply today</p></body></html>"#;

        let reduced = reduce_html(html);
        assert!(reduced.contains(r#"<div class="job-detail">Small</div>"#));
        assert!(reduced.contains("<p>Apply today</p>"));
    }

    #[test]
    fn test_scripts_are_stripped_before_measuring() {
        let html = format!(
            r#"<html><body>
                <main><script>var x = "{}";</script><p>tiny</p></main>
                <noscript>enable js</noscript>
                <iframe src="https://ads.example.com"></iframe>
            </body></html>"#,
            long_text(300)
        );

        let reduced = reduce_html(&html);
        assert!(!reduced.contains("<script"));
        assert!(!reduced.contains("noscript"));
        assert!(!reduced.contains("iframe"));
        assert!(reduced.contains("<p>tiny</p>"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let exactly = format!("<html><body><main>{}</main><p>rest</p></body></html>", long_text(100));
        assert!(reduce_html(&exactly).contains("<p>rest</p>"));

        let over = format!("<html><body><main>{}</main><p>rest</p></body></html>", long_text(101));
        assert_eq!(reduce_html(&over), long_text(101));
    }
}
