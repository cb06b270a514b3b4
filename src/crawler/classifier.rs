//! Site template detection
//!
//! Decides once per crawl, from the seed page, whether pages follow the
//! WordPress templating conventions the templated extractor understands.

use scraper::{Html, Selector};
use std::fmt;

/// Identifier looked for in the generator meta tag
const GENERATOR_MARKER: &str = "wordpress";

/// Asset path that WordPress themes and plugins load from
const ASSET_MARKER: &str = "wp-content";

/// Class names WordPress emits on its own markup
const TEMPLATE_CLASSES: &[&str] = &["wp-content", "wordpress", "wp-block"];

/// Which extraction strategy applies to the pages of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteTemplate {
    /// Unknown site generator; heuristic container selection
    #[default]
    Generic,
    /// WordPress-generated pages; fixed content containers
    Templated,
}

impl SiteTemplate {
    pub fn is_templated(&self) -> bool {
        matches!(self, Self::Templated)
    }
}

impl fmt::Display for SiteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::Templated => write!(f, "wordpress"),
        }
    }
}

/// Classifies a parsed page
///
/// # Detection Order
///
/// 1. `<meta name="generator">` mentioning WordPress
/// 2. A `<link href>` pointing into `wp-content`
/// 3. Any element carrying one of the WordPress marker classes
///
/// The first rule that matches wins; otherwise the page is generic.
pub fn classify(document: &Html) -> SiteTemplate {
    if has_generator_marker(document)
        || has_asset_link(document)
        || has_template_class(document)
    {
        SiteTemplate::Templated
    } else {
        SiteTemplate::Generic
    }
}

fn has_generator_marker(document: &Html) -> bool {
    let Ok(selector) = Selector::parse(r#"meta[name="generator"]"#) else {
        return false;
    };

    document.select(&selector).any(|meta| {
        meta.value()
            .attr("content")
            .map(|content| content.to_lowercase().contains(GENERATOR_MARKER))
            .unwrap_or(false)
    })
}

fn has_asset_link(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("link[href]") else {
        return false;
    };

    document.select(&selector).any(|link| {
        link.value()
            .attr("href")
            .map(|href| href.to_lowercase().contains(ASSET_MARKER))
            .unwrap_or(false)
    })
}

fn has_template_class(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("[class]") else {
        return false;
    };

    document.select(&selector).any(|element| {
        element
            .value()
            .classes()
            .any(|class| TEMPLATE_CLASSES.contains(&class))
    })
}
