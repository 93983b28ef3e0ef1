//! Gather the CSS a page uses: inline `<style>` blocks plus linked sheets.
//!
//! Linked stylesheets are a best-effort enrichment layer. A sheet that
//! fails to fetch, answers non-2xx, or declares a non-CSS content type is
//! skipped without surfacing an error.

use crate::config::AnalyzerConfig;
use crate::fetch::{truncate_body, FetchOptions, Fetcher};
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<style[^>]*>(.*?)</style\s*>").expect("style block regex is valid")
    })
}

fn link_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").expect("link tag regex is valid"))
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)(rel|href)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .expect("attribute regex is valid")
    })
}

/// Fetch linked stylesheets and return the page's CSS corpus.
///
/// Inline CSS comes first, then each fetched sheet in link order, all
/// newline-joined.
pub async fn collect<F: Fetcher + ?Sized>(
    html: &str,
    base_url: &str,
    fetcher: &F,
    config: &AnalyzerConfig,
) -> String {
    let mut corpus = extract_inline_css(html);

    let links: Vec<String> = extract_stylesheet_links(html, base_url)
        .into_iter()
        .take(config.max_stylesheets)
        .collect();
    if links.is_empty() {
        return corpus;
    }

    let options = config.stylesheet_fetch_options();
    // `buffered` keeps link order so ranking ties stay stable.
    let sheets: Vec<Option<String>> = stream::iter(links.iter())
        .map(|url| fetch_stylesheet(fetcher, url, &options, config.stylesheet_max_bytes))
        .buffered(config.max_stylesheets.max(1))
        .collect()
        .await;

    let fetched = sheets.iter().flatten().count();
    debug!("fetched {fetched} of {} stylesheet(s) for {base_url}", links.len());

    for sheet in sheets.into_iter().flatten() {
        corpus.push('\n');
        corpus.push_str(&sheet);
    }
    corpus
}

async fn fetch_stylesheet<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &str,
    options: &FetchOptions,
    max_bytes: usize,
) -> Option<String> {
    let resp = match fetcher.fetch(url, options).await {
        Ok(resp) => resp,
        Err(e) => {
            debug!("skipping stylesheet {url}: {e}");
            return None;
        }
    };
    if !resp.is_success() {
        debug!("skipping stylesheet {url}: HTTP {}", resp.status);
        return None;
    }
    if let Some(ct) = resp.content_type() {
        if !ct.to_ascii_lowercase().contains("text/css") {
            debug!("skipping stylesheet {url}: content-type {ct}");
            return None;
        }
    }
    if resp.body.len() > max_bytes {
        debug!("truncating stylesheet {url} from {} bytes", resp.body.len());
    }
    Some(truncate_body(&resp.body, max_bytes).to_string())
}

/// Bodies of every `<style>` block, verbatim, newline-joined.
pub fn extract_inline_css(html: &str) -> String {
    style_block_re()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolved, de-duplicated `href`s of `<link rel="stylesheet">` tags.
pub fn extract_stylesheet_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();

    for tag in link_tag_re().find_iter(html) {
        let mut rel = None;
        let mut href = None;
        for caps in attribute_re().captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str());
            match caps.get(1).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
                Some("rel") => rel = rel.or(value),
                Some("href") => href = href.or(value),
                _ => {}
            }
        }

        let is_stylesheet = rel.is_some_and(|r| {
            r.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet"))
        });
        if !is_stylesheet {
            continue;
        }

        let Some(resolved) = href.and_then(|h| resolve_url(h, base_url)) else {
            continue;
        };
        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }

    links
}

/// Resolve an `href` against the page URL.
///
/// Handles absolute URLs (returned as-is), protocol-relative URLs,
/// absolute paths, and paths relative to the base path's directory.
/// Returns `None` for empty hrefs and non-HTTP results.
pub fn resolve_url(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim().replace("&amp;", "&");
    if href.is_empty() {
        return None;
    }

    let resolved = match url::Url::parse(&href) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(base_url).ok()?.join(&href).ok()?
        }
        Err(_) => return None,
    };

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_css_concatenated() {
        let html = "<style>a{color:red}</style><p>x</p><STYLE media=\"screen\">b{color:blue}</STYLE>";
        assert_eq!(extract_inline_css(html), "a{color:red}\nb{color:blue}");
    }

    #[test]
    fn test_stylesheet_links_any_attribute_order() {
        let html = r#"
            <link rel="stylesheet" href="/css/main.css">
            <link href='theme.css' rel='stylesheet' media='all'>
            <link rel="icon" href="/favicon.ico">
            <link rel="preload" href="/font.woff2" as="font">
            <link rel="alternate stylesheet" href=https://cdn.example.org/alt.css>
        "#;
        let links = extract_stylesheet_links(html, "https://example.com/blog/post.html");
        assert_eq!(
            links,
            vec![
                "https://example.com/css/main.css",
                "https://example.com/blog/theme.css",
                "https://cdn.example.org/alt.css",
            ]
        );
    }

    #[test]
    fn test_data_attributes_are_not_rel_or_href() {
        let html = r#"<link data-rel="icon" rel=stylesheet data-href="/wrong.css" href="/right.css">"#;
        let links = extract_stylesheet_links(html, "https://example.com/");
        assert_eq!(links, vec!["https://example.com/right.css"]);
    }

    #[test]
    fn test_stylesheet_links_deduplicated() {
        let html = r#"<link rel="stylesheet" href="/a.css"><link rel="stylesheet" href="https://example.com/a.css">"#;
        let links = extract_stylesheet_links(html, "https://example.com/");
        assert_eq!(links, vec!["https://example.com/a.css"]);
    }

    #[test]
    fn test_resolve_url_forms() {
        let base = "https://example.com:8443/docs/guide/index.html";
        assert_eq!(
            resolve_url("/static/site.css", base).as_deref(),
            Some("https://example.com:8443/static/site.css")
        );
        assert_eq!(
            resolve_url("print.css", base).as_deref(),
            Some("https://example.com:8443/docs/guide/print.css")
        );
        assert_eq!(
            resolve_url("//cdn.example.net/x.css", base).as_deref(),
            Some("https://cdn.example.net/x.css")
        );
        assert_eq!(
            resolve_url("http://other.org/y.css", base).as_deref(),
            Some("http://other.org/y.css")
        );
        assert_eq!(
            resolve_url("/css?a=1&amp;b=2", base).as_deref(),
            Some("https://example.com:8443/css?a=1&b=2")
        );
    }

    #[test]
    fn test_resolve_url_rejects_non_http() {
        let base = "https://example.com/";
        assert_eq!(resolve_url("data:text/css,a{}", base), None);
        assert_eq!(resolve_url("", base), None);
        assert_eq!(resolve_url("javascript:void(0)", base), None);
    }
}
