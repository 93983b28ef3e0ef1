//! The `analyze(url)` pipeline.
//!
//! One page fetch, up to a handful of stylesheet fetches, then pure text
//! processing. Every failure is folded into the returned profile; callers
//! always get a well-formed [`StyleProfile`].

use crate::collector;
use crate::color::{rank_colors, strongest_alpha};
use crate::config::AnalyzerConfig;
use crate::extract;
use crate::fetch::{truncate_body, Fetcher, HttpFetcher};
use crate::label;
use crate::rank::rank_fonts;
use crate::sizes::sanitize_font_sizes;
use crate::types::{AnalyzeError, AnalyzeResult, StyleProfile};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, warn};

/// Extracts style profiles from web pages through an injected fetcher.
pub struct Analyzer<F> {
    fetcher: F,
    config: AnalyzerConfig,
}

impl Analyzer<HttpFetcher> {
    /// Analyzer backed by the real HTTP fetcher.
    pub fn with_http(config: AnalyzerConfig) -> Self {
        Self::new(HttpFetcher::new(), config)
    }
}

impl<F: Fetcher> Analyzer<F> {
    pub fn new(fetcher: F, config: AnalyzerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one page. Never fails and never panics across this call:
    /// errors, including internal faults, come back in `profile.error`.
    pub async fn analyze(&self, url: &str) -> StyleProfile {
        match AssertUnwindSafe(self.try_analyze(url)).catch_unwind().await {
            Ok(Ok(profile)) => profile,
            Ok(Err(e)) => {
                warn!("analysis of {url} failed: {e}");
                StyleProfile::failed(&e)
            }
            Err(_) => {
                error!("analysis of {url} panicked");
                StyleProfile::failed(&AnalyzeError::Unexpected)
            }
        }
    }

    /// The pipeline with errors surfaced as `Err`.
    pub async fn try_analyze(&self, url: &str) -> AnalyzeResult<StyleProfile> {
        let url = validate_url(url)?;
        info!("analyzing {url}");

        let resp = self
            .fetcher
            .fetch(url.as_str(), &self.config.page_fetch_options())
            .await
            .map_err(|e| AnalyzeError::FetchFailure(e.to_string()))?;

        if !resp.is_success() {
            return Err(AnalyzeError::HttpError(resp.status));
        }
        if let Some(ct) = resp.content_type() {
            if !is_html_content_type(ct) {
                return Err(AnalyzeError::UnsupportedContentType(ct.to_string()));
            }
        }

        let html = truncate_body(&resp.body, self.config.page_max_bytes);
        let base_url = if resp.final_url.is_empty() {
            url.as_str()
        } else {
            resp.final_url.as_str()
        };

        let css = collector::collect(html, base_url, &self.fetcher, &self.config).await;
        let profile = build_profile(html, &css, &self.config);
        info!(
            "analyzed {url}: {} color(s), {} font(s)",
            profile.colors.len(),
            profile.fonts.len()
        );
        Ok(profile)
    }
}

/// Parse `raw` and require an `http`/`https` scheme.
pub fn validate_url(raw: &str) -> AnalyzeResult<url::Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalyzeError::InvalidInput("URL is empty".to_string()));
    }
    let url = url::Url::parse(trimmed)
        .map_err(|e| AnalyzeError::InvalidInput(format!("invalid URL '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AnalyzeError::InvalidInput(format!(
            "only http/https URLs are allowed, got '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(AnalyzeError::InvalidInput(format!("URL '{trimmed}' has no host")));
    }
    Ok(url)
}

fn is_html_content_type(ct: &str) -> bool {
    let ct = ct.to_ascii_lowercase();
    ct.contains("text/html") || ct.contains("application/xhtml+xml")
}

/// Build a profile from already-collected page HTML and CSS.
///
/// This is the pure half of the pipeline: no I/O happens here.
pub fn build_profile(html: &str, css: &str, config: &AnalyzerConfig) -> StyleProfile {
    let corpus = format!("{html}\n{css}");
    let signals = extract::extract(&corpus);
    debug!(
        "extracted {} color literal(s), {} font declaration(s), {} color var(s), {} size var(s)",
        signals.colors.len(),
        signals.fonts.len(),
        signals.css_vars.colors.len(),
        signals.css_vars.sizes.len()
    );

    let mut colors = rank_colors(&signals.colors, config.rank_color_limit);
    colors.truncate(config.color_limit);

    let alphas = strongest_alpha(&signals.colors);
    let mut labeled_colors =
        label::label_with_alpha(&colors, signals.background.as_deref(), &alphas);
    label::apply_color_overrides(&mut labeled_colors, &signals.css_vars);

    let mut fonts = rank_fonts(&signals.fonts, config.rank_font_limit);
    fonts.truncate(config.font_limit);

    let mut font_sizes = signals.font_sizes;
    label::apply_size_overrides(&mut font_sizes, &signals.css_vars);

    StyleProfile {
        colors,
        labeled_colors,
        fonts,
        font_sizes: sanitize_font_sizes(font_sizes),
        error: None,
    }
}
