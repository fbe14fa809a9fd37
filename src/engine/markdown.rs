//! Markdown renderer for parsed comment blocks.
//!
//! Output layout: source description, attribution line, table of contents,
//! then one section per entry closed by a back-link to the TOC.

use std::path::Path;

use tracing::debug;

use crate::config::RenderOptions;
use crate::engine::model::{Entry, Returns};
use crate::engine::parser::{self, ParseOptions};
use crate::engine::{toc, Engine, Heading, Source};
use crate::error::Result;
use crate::paths;

/// Comment prefixes treated as tool directives unless `skipPrefixes` is set.
const DEFAULT_SKIP_PREFIXES: &[&str] = &["jslint", "jshint", "eslint", "global"];

pub struct DoxEngine;

impl Engine for DoxEngine {
    fn render(
        &self,
        source: &Source<'_>,
        options: &RenderOptions,
        on_heading: &mut dyn FnMut(Heading) -> Heading,
    ) -> Result<String> {
        let dox = &options.dox_options;
        for key in dox.extra.keys() {
            debug!(option = %key, "ignoring unrecognised dox option");
        }
        let prefixes: Vec<String> = match &dox.skip_prefixes {
            Some(prefixes) => prefixes.clone(),
            None => DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
        };
        let doc = parser::parse(
            source.text,
            &source.display_name(),
            &ParseOptions {
                skip_single_star: dox.skip_single_star,
                skip_prefixes: &prefixes,
            },
        )?;

        let mut output = String::new();

        let shown = if options.full_source_description {
            doc.description.len()
        } else {
            doc.description.len().min(1)
        };
        for paragraph in &doc.description[..shown] {
            output.push_str(paragraph);
            output.push_str("\n\n");
        }

        if let Some(line) = source_line(source, options) {
            output.push_str(&line);
            output.push_str("\n\n");
        }

        if doc.entries.is_empty() {
            return Ok(output);
        }

        let headings: Vec<Heading> = doc
            .entries
            .iter()
            .map(|entry| {
                on_heading(Heading {
                    depth: 1,
                    text: entry.heading(),
                })
            })
            .collect();
        let anchors: Vec<String> = headings.iter().map(|h| toc::anchor(&h.text)).collect();

        // Table of contents
        output.push_str(toc::TOC_MARKER);
        output.push_str("\n\n");
        for (entry, anchor) in doc.entries.iter().zip(&anchors) {
            output.push_str(&toc::toc_item(&entry.name, anchor));
            output.push('\n');
        }
        output.push('\n');

        for (idx, ((entry, heading), anchor)) in doc
            .entries
            .iter()
            .zip(&headings)
            .zip(&anchors)
            .enumerate()
        {
            if idx > 0 {
                output.push_str(&format!("\n{}\n\n", toc::entry_anchor(anchor)));
            }
            render_entry(&mut output, entry, heading);
        }

        Ok(output)
    }
}

/// `_Source: [title](link)_`, or nothing when attribution is hidden.
///
/// Merged inputs have no file to link, so only an explicit title is shown.
fn source_line(source: &Source<'_>, options: &RenderOptions) -> Option<String> {
    if options.hides_source() {
        return None;
    }
    let title = options.title_text();
    match source.input {
        Some(file) => {
            let from = source.output.parent().unwrap_or(Path::new("/"));
            let link = paths::to_link(&paths::relative_path(from, file.path));
            let title = title
                .map(str::to_string)
                .unwrap_or_else(|| paths::to_link(file.name));
            Some(format!("_Source: [{title}]({link})_"))
        }
        None => title.map(|t| format!("_Source: {t}_")),
    }
}

fn render_entry(buffer: &mut String, entry: &Entry, heading: &Heading) {
    buffer.push_str(&format!("{} {}\n\n", "#".repeat(heading.depth), heading.text));

    if let Some(description) = &entry.description {
        buffer.push_str(&format!("{description}\n\n"));
    }

    if !entry.params.is_empty() {
        buffer.push_str("**Parameters:**\n\n");
        for param in &entry.params {
            let mut line = format!("- `{}`", param.name);
            if let Some(ty) = &param.type_hint {
                line.push_str(&format!(" (`{ty}`)"));
            }
            if param.optional {
                line.push_str(" _optional_");
            }
            if let Some(description) = &param.description {
                line.push(' ');
                line.push_str(description);
            }
            buffer.push_str(&line);
            buffer.push('\n');
        }
        buffer.push('\n');
    }

    if let Some(returns) = entry.returns.as_ref().and_then(render_returns) {
        buffer.push_str(&format!("**Return:**\n\n{returns}\n\n"));
    }

    for example in &entry.examples {
        buffer.push_str(&format!("**Example:**\n\n```javascript\n{example}\n```\n\n"));
    }

    buffer.push_str(toc::TOC_BACKLINK);
    buffer.push('\n');
}

fn render_returns(returns: &Returns) -> Option<String> {
    let parts: Vec<String> = [
        returns.type_hint.as_ref().map(|ty| format!("`{ty}`")),
        returns.description.clone(),
    ]
    .into_iter()
    .flatten()
    .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}
