//! Task configuration: the shapes a configuration value may take and how it
//! is loaded from disk.
//!
//! A configuration value is one of
//!
//! - a path string: `"index.js"`
//! - a single entry object: `{ "input": "index.js", "output": "README.md" }`
//! - an ordered list mixing both forms
//!
//! and may sit at the top of the JSON document or under an `apidox` key.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Configuration file looked up in the working directory when none is given.
pub const CONFIG_FILENAME: &str = "apidox.json";

/// Key under which the configuration value may be nested.
const TASK_KEY: &str = "apidox";

/// The whole configuration value, resolved once at the entry point.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskConfig {
    Path(String),
    // Must precede `Entry`: serde lets a struct deserialize from a JSON array.
    Entries(Vec<EntrySpec>),
    Entry(ConfigEntry),
}

/// One element of an entry list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    Path(String),
    Entry(ConfigEntry),
}

/// One declarative unit: what to render and where to write it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    /// Glob pattern or literal path. Absent means the entry does nothing.
    pub input: Option<String>,
    /// Explicit output filename, relative to `outdir`.
    pub output: Option<String>,
    /// Output directory prefix, defaulting to the working directory.
    pub outdir: Option<String>,
    #[serde(flatten)]
    pub options: RenderOptions,
}

/// Options handed to the rendering engine and the post-processing steps.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub input_title: Option<InputTitle>,
    #[serde(default)]
    pub full_source_description: bool,
    /// Anchor name (or `""` for "after the TOC") to Markdown snippet.
    pub sections: Option<BTreeMap<String, String>>,
    #[serde(default, deserialize_with = "heading_levels")]
    pub extra_heading_levels: usize,
    #[serde(default)]
    pub dox_options: DoxOptions,
}

/// Upper bound for `extraHeadingLevels`.
pub const MAX_EXTRA_HEADING_LEVELS: usize = 16;

fn heading_levels<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<usize, D::Error> {
    let levels = usize::deserialize(deserializer)?;
    if levels > MAX_EXTRA_HEADING_LEVELS {
        return Err(D::Error::custom(format!(
            "extraHeadingLevels must be at most {MAX_EXTRA_HEADING_LEVELS}, got {levels}"
        )));
    }
    Ok(levels)
}

/// `inputTitle`: a replacement title, or a flag where `false` hides the
/// source attribution line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InputTitle {
    Text(String),
    Enabled(bool),
}

impl RenderOptions {
    /// The explicit title string, if the caller supplied one.
    pub fn title_text(&self) -> Option<&str> {
        match &self.input_title {
            Some(InputTitle::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether the source attribution line is suppressed.
    pub fn hides_source(&self) -> bool {
        matches!(self.input_title, Some(InputTitle::Enabled(false)))
    }
}

/// Options forwarded to the comment parser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoxOptions {
    #[serde(default)]
    pub skip_single_star: bool,
    pub skip_prefixes: Option<Vec<String>>,
    /// Keys the parser does not interpret, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskConfig {
    /// Normalise into the ordered list of entries to process.
    ///
    /// Path shorthands become entries with only `input` set. Entries are
    /// cloned, so later processing never touches the caller's value.
    pub fn entries(&self) -> Vec<ConfigEntry> {
        match self {
            TaskConfig::Path(path) => vec![ConfigEntry::from_input(path)],
            TaskConfig::Entry(entry) => vec![entry.clone()],
            TaskConfig::Entries(specs) => specs
                .iter()
                .map(|spec| match spec {
                    EntrySpec::Path(path) => ConfigEntry::from_input(path),
                    EntrySpec::Entry(entry) => entry.clone(),
                })
                .collect(),
        }
    }
}

impl ConfigEntry {
    pub fn from_input(input: &str) -> Self {
        ConfigEntry {
            input: Some(input.to_string()),
            ..ConfigEntry::default()
        }
    }
}

/// Load a configuration file.
pub fn load(path: &Path) -> Result<TaskConfig> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

/// Parse configuration text; `origin` is only used in error messages.
pub fn parse(text: &str, origin: &Path) -> Result<TaskConfig> {
    let config_err = |source| Error::Config {
        path: origin.to_path_buf(),
        source,
    };
    let mut value: Value = serde_json::from_str(text).map_err(config_err)?;
    if let Some(nested) = value.as_object_mut().and_then(|obj| obj.remove(TASK_KEY)) {
        value = nested;
    }
    serde_json::from_value(value).map_err(config_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> TaskConfig {
        parse(text, Path::new("apidox.json")).unwrap()
    }

    #[test]
    fn path_shorthand() {
        let entries = parse_str(r#""index.js""#).entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].input.as_deref(), Some("index.js"));
        assert!(entries[0].output.is_none());
        assert!(entries[0].outdir.is_none());
    }

    #[test]
    fn single_entry_object() {
        let entries = parse_str(r#"{ "input": "index.js", "output": "README.md", "outdir": "docs" }"#)
            .entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output.as_deref(), Some("README.md"));
        assert_eq!(entries[0].outdir.as_deref(), Some("docs"));
    }

    #[test]
    fn mixed_sequence_keeps_order() {
        let entries = parse_str(r#"["a.js", { "input": "b.js" }, { "output": "c.md" }]"#).entries();
        let inputs: Vec<_> = entries.iter().map(|e| e.input.as_deref()).collect();
        assert_eq!(inputs, vec![Some("a.js"), Some("b.js"), None]);
    }

    #[test]
    fn nested_under_task_key() {
        let entries = parse_str(r#"{ "apidox": { "input": "index.js" } }"#).entries();
        assert_eq!(entries[0].input.as_deref(), Some("index.js"));
    }

    #[test]
    fn input_title_forms() {
        let entries = parse_str(
            r#"[{ "input": "a.js", "inputTitle": "bar" },
                { "input": "a.js", "inputTitle": false },
                { "input": "a.js", "inputTitle": true },
                { "input": "a.js" }]"#,
        )
        .entries();
        assert_eq!(entries[0].options.title_text(), Some("bar"));
        assert!(!entries[0].options.hides_source());
        assert!(entries[1].options.hides_source());
        assert!(!entries[2].options.hides_source());
        assert_eq!(entries[3].options.input_title, None);
    }

    #[test]
    fn render_options() {
        let entries = parse_str(
            r###"{
                "input": "index.js",
                "fullSourceDescription": true,
                "extraHeadingLevels": 2,
                "sections": { "index": "##foo", "": "after toc" },
                "doxOptions": { "skipSingleStar": true, "raw": true }
            }"###,
        )
        .entries();
        let options = &entries[0].options;
        assert!(options.full_source_description);
        assert_eq!(options.extra_heading_levels, 2);
        let sections = options.sections.as_ref().unwrap();
        assert_eq!(sections.get("index").map(String::as_str), Some("##foo"));
        assert_eq!(sections.get("").map(String::as_str), Some("after toc"));
        assert!(options.dox_options.skip_single_star);
        assert_eq!(options.dox_options.extra.get("raw"), Some(&Value::Bool(true)));
    }

    #[test]
    fn oversized_heading_shift_is_rejected() {
        let err = parse(
            r#"{ "input": "index.js", "extraHeadingLevels": 1000 }"#,
            Path::new("apidox.json"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let entries = parse_str(r#"{ "input": "index.js", "extraHeadingLevels": 16 }"#).entries();
        assert_eq!(entries[0].options.extra_heading_levels, MAX_EXTRA_HEADING_LEVELS);
    }

    #[test]
    fn entries_are_copies() {
        let config = parse_str(r#"{ "input": "index.js" }"#);
        let mut entries = config.entries();
        entries[0].options.input_title = Some(InputTitle::Enabled(false));
        match &config {
            TaskConfig::Entry(entry) => assert_eq!(entry.options.input_title, None),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = parse("{ input: ", Path::new("apidox.json")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("apidox.json"));
    }
}
