use url::Url;

/// Extracts the authority used for same-site comparisons
///
/// The result is the lowercase host, followed by `:port` when the URL names a
/// port other than its scheme's default. Userinfo is never included. Returns
/// `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use doc_scraper::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("localhost:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
