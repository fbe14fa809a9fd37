//! Document rendering: one read → render → post-process → write cycle per job.

use std::borrow::Cow;

use tracing::info;

use crate::engine::{Engine, Heading, InputFile, Source};
use crate::error::Result;
use crate::paths;
use crate::resolve::{JobSource, RenderJob};
use crate::sections;
use crate::workspace::Workspace;

/// Render `job` and write the result to its output path.
///
/// Engine and filesystem errors propagate unchanged; nothing is written for a
/// job that fails.
pub fn render_job(job: &RenderJob, engine: &dyn Engine, workspace: &dyn Workspace) -> Result<()> {
    let absolute;
    let (text, input) = match &job.source {
        JobSource::File(path) => {
            absolute = paths::resolve(workspace.root(), path);
            let text = workspace.read(path)?;
            let input = InputFile {
                name: path,
                path: &absolute,
            };
            (Cow::Owned(text), Some(input))
        }
        JobSource::Merged { text, .. } => (Cow::Borrowed(text.as_str()), None),
    };

    let source = Source {
        text: &text,
        input,
        output: &job.output,
    };

    let extra = job.options.extra_heading_levels;
    let mut shift = |heading: Heading| shift_heading(heading, extra);
    let mut markdown = engine.render(&source, &job.options, &mut shift)?;

    if let Some(sections) = &job.options.sections {
        markdown = sections::inject(&markdown, sections);
    }

    workspace.write(&job.output, &markdown)?;
    info!(output = %job.output.display(), inputs = job.inputs().len(), "wrote documentation");
    Ok(())
}

fn shift_heading(heading: Heading, extra: usize) -> Heading {
    Heading {
        depth: heading.depth.saturating_add(extra),
        ..heading
    }
}
