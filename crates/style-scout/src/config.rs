//! Analyzer tunables.

use crate::fetch::FetchOptions;
use std::time::Duration;

/// Browser-like user agent; some hosts refuse obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36 StyleScout/0.1";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Limits and timeouts for one analysis.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub page_timeout: Duration,
    pub page_max_redirects: usize,
    /// Page bodies past this many bytes are truncated.
    pub page_max_bytes: usize,
    pub stylesheet_timeout: Duration,
    pub stylesheet_max_redirects: usize,
    /// Each stylesheet body past this many bytes is truncated.
    pub stylesheet_max_bytes: usize,
    /// Only the first N distinct stylesheet links are fetched.
    pub max_stylesheets: usize,
    /// Colors kept while ranking, before the final cut.
    pub rank_color_limit: usize,
    pub color_limit: usize,
    /// Fonts kept while ranking, before the final cut.
    pub rank_font_limit: usize,
    pub font_limit: usize,
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(15),
            page_max_redirects: 3,
            page_max_bytes: 1024 * 1024,
            stylesheet_timeout: Duration::from_secs(12),
            stylesheet_max_redirects: 2,
            stylesheet_max_bytes: 512 * 1024,
            max_stylesheets: 5,
            rank_color_limit: 12,
            color_limit: 8,
            rank_font_limit: 4,
            font_limit: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Headers sent with every request.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
        ]
    }

    pub fn page_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.page_timeout,
            max_redirects: self.page_max_redirects,
            headers: self.request_headers(),
            max_body_bytes: Some(self.page_max_bytes),
        }
    }

    pub fn stylesheet_fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: self.stylesheet_timeout,
            max_redirects: self.stylesheet_max_redirects,
            headers: self.request_headers(),
            max_body_bytes: Some(self.stylesheet_max_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.page_timeout, Duration::from_secs(15));
        assert_eq!(config.stylesheet_timeout, Duration::from_secs(12));
        assert_eq!(config.page_max_bytes, 1_048_576);
        assert_eq!(config.stylesheet_max_bytes, 524_288);
        assert_eq!(config.max_stylesheets, 5);
    }

    #[test]
    fn test_fetch_options_carry_limits() {
        let config = AnalyzerConfig::default();
        let page = config.page_fetch_options();
        assert_eq!(page.max_redirects, 3);
        assert_eq!(page.max_body_bytes, Some(1_048_576));
        let css = config.stylesheet_fetch_options();
        assert_eq!(css.max_redirects, 2);
        assert_eq!(css.timeout, Duration::from_secs(12));
        assert!(css.headers.iter().any(|(k, _)| k == "User-Agent"));
    }
}
