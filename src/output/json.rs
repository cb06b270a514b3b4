//! JSON output
//!
//! The page records as a pretty-printed array of `{title, url, content}`.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::output::OutputPaths;
use crate::state::{CrawlResult, PageRecord};
use std::fs;
use std::path::Path;

/// Writes the records as a JSON array
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonOutput;

impl OutputHandler for JsonOutput {
    fn name(&self) -> &'static str {
        "json"
    }

    fn path<'a>(&self, paths: &'a OutputPaths) -> &'a Path {
        &paths.json
    }

    fn render(&self, result: &CrawlResult) -> OutputResult<Option<String>> {
        Ok(Some(serde_json::to_string_pretty(&result.pages)?))
    }
}

/// Reads a JSON output file back into page records
pub fn read_json(path: &Path) -> OutputResult<Vec<PageRecord>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SiteTemplate;
    use crate::state::ResultAggregator;
    use url::Url;

    #[test]
    fn test_json_is_written_and_read_back() {
        let mut agg = ResultAggregator::new();
        agg.record_page(PageRecord::new(
            "Grüße",
            "https://example.com/docs/a",
            "Line one\n\nLine \"two\"",
        ));
        agg.record_page(PageRecord::new("Empty", "https://example.com/docs/b", ""));
        let result = agg.into_result(SiteTemplate::Generic);

        let dir = tempfile::tempdir().unwrap();
        let paths = OutputPaths::for_seed(
            dir.path(),
            &Url::parse("https://example.com/docs/").unwrap(),
        );

        let written = JsonOutput.write(&result, &paths).unwrap();
        assert_eq!(written.as_deref(), Some(paths.json.as_path()));

        let records = read_json(&paths.json).unwrap();
        assert_eq!(records, result.pages);
    }

    #[test]
    fn test_json_shape() {
        let mut agg = ResultAggregator::new();
        agg.record_page(PageRecord::new("T", "https://example.com/", "c"));
        let rendered = JsonOutput
            .render(&agg.into_result(SiteTemplate::Generic))
            .unwrap()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"title": "T", "url": "https://example.com/", "content": "c"}])
        );
    }

    #[test]
    fn test_read_json_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        assert!(read_json(&path).is_err());
    }
}
