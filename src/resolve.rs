//! Output resolution: turn one configuration entry into concrete render jobs.
//!
//! - no `input`, or a glob matching nothing: no jobs, nothing read
//! - explicit `output`, one match: one job for that file
//! - explicit `output`, several matches: one job over their concatenated text
//! - no `output`: one job per match, named after the input with a `.md`
//!   extension, under `outdir`

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{ConfigEntry, InputTitle, RenderOptions};
use crate::error::{Error, Result};
use crate::paths;
use crate::workspace::Workspace;

/// Where a job's source text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSource {
    /// One matched file, read when the job is rendered.
    File(PathBuf),
    /// Several matched files, already read and concatenated in match order.
    Merged { files: Vec<PathBuf>, text: String },
}

/// A fully resolved unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub source: JobSource,
    /// Absolute output path.
    pub output: PathBuf,
    pub options: RenderOptions,
}

impl RenderJob {
    /// The matched input files, in order. Never empty.
    pub fn inputs(&self) -> &[PathBuf] {
        match &self.source {
            JobSource::File(path) => std::slice::from_ref(path),
            JobSource::Merged { files, .. } => files,
        }
    }
}

/// Resolve one entry into its jobs, in glob-match order.
///
/// Only merged jobs read files here; single-file jobs are read by the
/// renderer.
pub fn resolve_entry(entry: &ConfigEntry, workspace: &dyn Workspace) -> Result<Vec<RenderJob>> {
    let outdir = paths::resolve(
        workspace.root(),
        Path::new(entry.outdir.as_deref().unwrap_or("")),
    );

    let Some(input) = entry.input.as_deref().filter(|i| !i.is_empty()) else {
        debug!("entry has no input; skipped");
        return Ok(Vec::new());
    };

    let files = match workspace.expand_glob(input) {
        Ok(files) => files,
        Err(Error::Pattern { pattern, source }) => {
            warn!(%pattern, error = %source, "invalid input pattern; entry skipped");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };
    if files.is_empty() {
        debug!(pattern = input, "no files matched; entry skipped");
        return Ok(Vec::new());
    }

    let mut options = entry.options.clone();

    let Some(output) = entry.output.as_deref().filter(|o| !o.is_empty()) else {
        return Ok(files
            .into_iter()
            .map(|file| RenderJob {
                output: paths::resolve(&outdir, &paths::markdown_name(&file)),
                source: JobSource::File(file),
                options: options.clone(),
            })
            .collect());
    };

    let output = paths::resolve(&outdir, Path::new(output));
    let source = match <[PathBuf; 1]>::try_from(files) {
        Ok([file]) => JobSource::File(file),
        Err(files) => {
            let text = read_all(&files, workspace)?;
            // No single file to attribute; only an explicit title survives.
            if options.title_text().is_none() {
                options.input_title = Some(InputTitle::Enabled(false));
            }
            JobSource::Merged { files, text }
        }
    };

    Ok(vec![RenderJob {
        source,
        output,
        options,
    }])
}

/// Concatenate file contents with no separator.
fn read_all(files: &[PathBuf], workspace: &dyn Workspace) -> Result<String> {
    let mut text = String::new();
    for file in files {
        text.push_str(&workspace.read(file)?);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskConfig;
    use crate::workspace::testing::MemoryWorkspace;

    fn fixtures() -> MemoryWorkspace {
        MemoryWorkspace::new()
            .with_file("index.js", "/** index */\n")
            .with_file("test.js", "/** test */\n")
            .with_file("foo/bar.js", "/** bar */\n")
            .with_file("foo/bar2.js", "/** bar2 */\n")
    }

    fn entry(json: &str) -> ConfigEntry {
        let config: TaskConfig = serde_json::from_str(json).unwrap();
        config.entries().remove(0)
    }

    #[test]
    fn explicit_output() {
        let ws = fixtures();
        let jobs = resolve_entry(&entry(r#"{ "input": "index.js", "output": "README.md" }"#), &ws).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, JobSource::File(PathBuf::from("index.js")));
        assert_eq!(jobs[0].output, PathBuf::from("/work/README.md"));
        assert!(ws.read_paths().is_empty());
    }

    #[test]
    fn explicit_output_under_outdir() {
        let ws = fixtures();
        let jobs = resolve_entry(
            &entry(r#"{ "input": "index.js", "output": "foo/README.md", "outdir": "docs" }"#),
            &ws,
        )
        .unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("/work/docs/foo/README.md"));
    }

    #[test]
    fn inferred_output_names() {
        let ws = fixtures();
        let jobs = resolve_entry(&entry(r#"{ "input": "*.js", "outdir": "docs" }"#), &ws).unwrap();
        let outputs: Vec<_> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![PathBuf::from("/work/docs/index.md"), PathBuf::from("/work/docs/test.md")]
        );

        let jobs = resolve_entry(&entry(r#"{ "input": "foo/*.js", "outdir": "docs" }"#), &ws).unwrap();
        let outputs: Vec<_> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("/work/docs/foo/bar.md"),
                PathBuf::from("/work/docs/foo/bar2.md")
            ]
        );
    }

    #[test]
    fn path_shorthand_writes_next_to_input() {
        let ws = fixtures();
        let jobs = resolve_entry(&entry(r#""index.js""#), &ws).unwrap();
        assert_eq!(jobs[0].output, PathBuf::from("/work/index.md"));
    }

    #[test]
    fn merge_with_explicit_output() {
        let ws = fixtures();
        let jobs = resolve_entry(
            &entry(r#"{ "input": "foo/*.js", "outdir": "docs", "output": "multi.md" }"#),
            &ws,
        )
        .unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.output, PathBuf::from("/work/docs/multi.md"));
        assert_eq!(
            job.source,
            JobSource::Merged {
                files: vec![PathBuf::from("foo/bar.js"), PathBuf::from("foo/bar2.js")],
                text: "/** bar */\n/** bar2 */\n".to_string(),
            }
        );
        assert_eq!(job.inputs().len(), 2);
        assert!(job.options.hides_source());
        assert_eq!(ws.read_paths().len(), 2);
    }

    #[test]
    fn merge_keeps_string_title() {
        let ws = fixtures();
        let jobs = resolve_entry(
            &entry(r#"{ "input": "foo/*.js", "output": "multi.md", "inputTitle": "bar" }"#),
            &ws,
        )
        .unwrap();
        assert_eq!(jobs[0].options.title_text(), Some("bar"));
    }

    #[test]
    fn merge_overrides_boolean_title() {
        let ws = fixtures();
        let jobs = resolve_entry(
            &entry(r#"{ "input": "foo/*.js", "output": "multi.md", "inputTitle": true }"#),
            &ws,
        )
        .unwrap();
        assert!(jobs[0].options.hides_source());
    }

    #[test]
    fn no_input_is_a_no_op() {
        let ws = fixtures();
        assert!(resolve_entry(&entry(r#"{ "output": "README.md" }"#), &ws).unwrap().is_empty());
        assert!(resolve_entry(&entry(r#"{ "input": "", "output": "README.md" }"#), &ws).unwrap().is_empty());
        assert!(ws.read_paths().is_empty());
    }

    #[test]
    fn unmatched_glob_is_a_no_op() {
        let ws = fixtures();
        let jobs = resolve_entry(&entry(r#"{ "input": "*.foobar", "output": "README.md" }"#), &ws).unwrap();
        assert!(jobs.is_empty());
        assert!(ws.read_paths().is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_no_op() {
        let ws = fixtures();
        assert!(resolve_entry(&entry(r#"{ "input": "[" }"#), &ws).unwrap().is_empty());
    }

    #[test]
    fn caller_entry_is_untouched() {
        let ws = fixtures();
        let original = entry(r#"{ "input": "foo/*.js", "output": "multi.md" }"#);
        let before = original.options.clone();
        resolve_entry(&original, &ws).unwrap();
        assert_eq!(original.options, before);
    }
}
