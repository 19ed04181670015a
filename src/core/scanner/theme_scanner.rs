// src/core/scanner/theme_scanner.rs

use tracing::{debug, info};
use crate::core::models::{Page, ThemeOutcome};
use crate::core::scanner::http_scanner::HttpProber;
use once_cell::sync::Lazy;
use regex::Regex;

// Theme assets are served from /wp-content/themes/<slug>/...
static RE_THEME_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/wp-content/themes/([^/]+)/").unwrap());
// The stylesheet header of a WordPress theme declares its display name.
static RE_THEME_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"Theme Name:\s*(.+)").unwrap());

/// Finds the theme slug referenced by a page, if any.
pub fn extract_theme_slug(html: &str) -> Option<&str> {
    RE_THEME_SLUG
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Reads the `Theme Name:` declaration from a theme stylesheet.
pub fn extract_theme_name(css: &str) -> Option<&str> {
    RE_THEME_NAME
        .captures(css)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Detects the WordPress theme of the site at `url`.
///
/// `page` is the document already fetched by the HTTP probe; without it the
/// page is fetched again. The stylesheet is only requested when the page
/// references a theme, and a missing stylesheet keeps the raw slug.
pub async fn detect_theme(prober: &HttpProber, url: &str, page: Option<&Page>) -> ThemeOutcome {
    let fetched;
    let page = match page {
        Some(page) => page,
        None => {
            debug!(url, "No page from the probe, fetching it for theme detection.");
            match prober.fetch(url).await {
                Ok(page) => {
                    fetched = page;
                    &fetched
                }
                Err(failure) => {
                    debug!(url, %failure, "Page fetch failed, theme unknown.");
                    return ThemeOutcome::DetectionFailed;
                }
            }
        }
    };

    let Some(slug) = extract_theme_slug(&page.body) else {
        debug!(url, "No theme path in page, not a WordPress site.");
        return ThemeOutcome::NotWordPress;
    };
    debug!(url, slug, "Theme slug found, fetching stylesheet.");

    let stylesheet_url = format!("{}/wp-content/themes/{}/style.css", url.trim_end_matches('/'), slug);
    match prober.fetch(&stylesheet_url).await {
        Ok(stylesheet) if stylesheet.status == 200 => {
            let name = extract_theme_name(&stylesheet.body).unwrap_or(slug);
            info!(url, theme = name, "WordPress theme detected.");
            ThemeOutcome::Detected(name.to_string())
        }
        Ok(stylesheet) => {
            debug!(status = stylesheet.status, "Stylesheet unavailable, keeping the slug.");
            ThemeOutcome::Detected(slug.to_string())
        }
        Err(failure) => {
            debug!(url = %stylesheet_url, %failure, "Stylesheet fetch failed.");
            ThemeOutcome::DetectionFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ScanConfig;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const WP_PAGE: &str = r#"<html><head>
        <link rel="stylesheet" href="https://shop.example/wp-content/themes/foo-theme/style.css?ver=1.2" />
        </head><body>hello</body></html>"#;

    fn prober() -> HttpProber {
        let config = ScanConfig { timeout_secs: 5.0, ..Default::default() };
        HttpProber::new(Arc::new(config)).unwrap()
    }

    fn page(body: &str) -> Page {
        Page { status: 200, body: body.to_string() }
    }

    #[test]
    fn slug_is_taken_from_the_first_theme_path() {
        assert_eq!(extract_theme_slug(WP_PAGE), Some("foo-theme"));
        assert_eq!(extract_theme_slug("<html>plain</html>"), None);
    }

    #[test]
    fn theme_name_is_trimmed() {
        let css = "/*\nTheme Name:   Twenty Twenty-Four \r\nAuthor: the WordPress team\n*/";
        assert_eq!(extract_theme_name(css), Some("Twenty Twenty-Four"));
        assert_eq!(extract_theme_name("body { color: red }"), None);
    }

    #[tokio::test]
    async fn page_without_theme_path_is_not_wordpress() {
        let outcome = detect_theme(&prober(), "http://unused.invalid", Some(&page("<p>hi</p>"))).await;
        assert_eq!(outcome, ThemeOutcome::NotWordPress);
        assert_eq!(outcome.to_string(), "No WP Theme");
    }

    #[tokio::test]
    async fn declared_name_replaces_the_slug() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-content/themes/foo-theme/style.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("/*\nTheme Name: Foo Deluxe\n*/"))
            .mount(&mock_server)
            .await;

        let outcome = detect_theme(&prober(), &mock_server.uri(), Some(&page(WP_PAGE))).await;
        assert_eq!(outcome, ThemeOutcome::Detected("Foo Deluxe".to_string()));
    }

    #[tokio::test]
    async fn missing_stylesheet_keeps_the_slug() {
        // No mocks mounted: every path answers 404.
        let mock_server = MockServer::start().await;

        let outcome = detect_theme(&prober(), &mock_server.uri(), Some(&page(WP_PAGE))).await;
        assert_eq!(outcome.to_string(), "foo-theme");
    }

    #[tokio::test]
    async fn page_is_fetched_when_the_probe_had_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(WP_PAGE))
            .mount(&mock_server)
            .await;

        let url = format!("{}/", mock_server.uri());
        let outcome = detect_theme(&prober(), &url, None).await;
        assert_eq!(outcome.to_string(), "foo-theme");
    }

    #[tokio::test]
    async fn failed_page_fetch_is_a_detection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = detect_theme(&prober(), &format!("http://127.0.0.1:{port}"), None).await;
        assert_eq!(outcome, ThemeOutcome::DetectionFailed);
        assert_eq!(outcome.to_string(), "Error Detecting");
    }
}
