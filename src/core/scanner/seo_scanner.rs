// src/core/scanner/seo_scanner.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::core::models::{percentage, SeoFindings};

/// Number of checks that make up the SEO score.
const SEO_CHECK_COUNT: usize = 6;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_NAME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("meta[name]").unwrap());
static LINK_REL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("link[rel]").unwrap());

/// Whether the page has a `<title>` with visible text.
fn has_title(doc: &Html) -> bool {
    doc.select(&TITLE_SELECTOR)
        .any(|el| !el.text().collect::<String>().trim().is_empty())
}

/// Whether some `<meta name=...>` matches `name`, ignoring ASCII case.
fn has_meta_named(doc: &Html, name: &str) -> bool {
    doc.select(&META_NAME_SELECTOR)
        .filter_map(|el| el.value().attr("name"))
        .any(|value| value.trim().eq_ignore_ascii_case(name))
}

/// Whether some `<link>` lists `rel` among its space-separated rel tokens.
fn has_link_rel(doc: &Html, rel: &str) -> bool {
    doc.select(&LINK_REL_SELECTOR)
        .filter_map(|el| el.value().attr("rel"))
        .any(|value| value.split_ascii_whitespace().any(|token| token.eq_ignore_ascii_case(rel)))
}

/// Scores the page against the SEO checklist.
///
/// Four checks come from the HTML, the other two from whether `/robots.txt` and
/// `/sitemap.xml` answered. The score is computed once over all six.
pub fn analyze_seo(html: &str, has_robots_txt: bool, has_sitemap: bool) -> SeoFindings {
    let document = Html::parse_document(html);

    let mut findings = SeoFindings {
        has_title: has_title(&document),
        has_description: has_meta_named(&document, "description"),
        has_viewport: has_meta_named(&document, "viewport"),
        has_canonical: has_link_rel(&document, "canonical"),
        has_robots_txt,
        has_sitemap,
        score: 0,
    };
    debug!(?findings, "SEO checks evaluated.");

    let passed = [
        findings.has_title,
        findings.has_description,
        findings.has_viewport,
        findings.has_canonical,
        findings.has_robots_txt,
        findings.has_sitemap,
    ]
    .into_iter()
    .filter(|passed| *passed)
    .count();
    findings.score = percentage(passed, SEO_CHECK_COUNT);

    info!(passed, score = findings.score, "SEO scan finished.");
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_only_page_with_robots_scores_33() {
        let html = "<html><head><title>Example</title></head><body></body></html>";
        let findings = analyze_seo(html, true, false);
        assert!(findings.has_title);
        assert!(!findings.has_description);
        assert!(findings.has_robots_txt);
        assert!(!findings.has_sitemap);
        assert_eq!(findings.score, 33);
    }

    #[test]
    fn attribute_order_quotes_and_case_do_not_matter() {
        let html = r#"<HTML><HEAD>
            <TITLE>Shop</TITLE>
            <meta content="Best shop" NAME='Description'>
            <meta content=width=device-width name=viewport>
            <LINK href="https://example.com/" REL="Canonical">
        </HEAD></HTML>"#;
        let findings = analyze_seo(html, true, true);
        assert!(findings.has_title);
        assert!(findings.has_description);
        assert!(findings.has_viewport);
        assert!(findings.has_canonical);
        assert_eq!(findings.score, 100);
    }

    #[test]
    fn empty_title_does_not_count() {
        let findings = analyze_seo("<html><head><title>   </title></head></html>", false, false);
        assert!(!findings.has_title);
        assert_eq!(findings.score, 0);
    }

    #[test]
    fn canonical_among_other_rel_tokens() {
        let findings = analyze_seo(r#"<link rel="alternate canonical" href="/">"#, false, false);
        assert!(findings.has_canonical);
        assert_eq!(findings.score, 17);
    }

    #[test]
    fn other_meta_names_are_ignored() {
        let html = r#"<meta name="og:description" content="x"><meta property="viewport" content="y">"#;
        let findings = analyze_seo(html, false, false);
        assert!(!findings.has_description);
        assert!(!findings.has_viewport);
    }

    #[test]
    fn empty_body_only_counts_reachability() {
        let findings = analyze_seo("", true, true);
        assert_eq!(findings.score, 33);
    }
}
