//! Task entry point: walk the configuration in order, resolving each entry
//! and rendering its jobs before moving on to the next.

use tracing::info_span;

use crate::config::TaskConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::render;
use crate::resolve;
use crate::workspace::Workspace;

/// Run every entry of `config`. Returns the number of documents written.
///
/// The first error stops the run; documents already written stay in place.
pub fn run(config: &TaskConfig, engine: &dyn Engine, workspace: &dyn Workspace) -> Result<usize> {
    let mut written = 0;
    for (index, entry) in config.entries().iter().enumerate() {
        let span = info_span!("entry", index, input = entry.input.as_deref().unwrap_or(""));
        let _guard = span.enter();

        for job in resolve::resolve_entry(entry, workspace)? {
            render::render_job(&job, engine, workspace)?;
            written += 1;
        }
    }
    Ok(written)
}
