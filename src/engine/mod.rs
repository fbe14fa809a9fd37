//! Documentation engine: turns commented source text into Markdown.
//!
//! The renderer only talks to the [`Engine`] trait. Headings pass through a
//! caller-supplied callback before they are written, which is how the
//! renderer shifts heading depths without reaching into the engine.

pub mod markdown;
mod model;
mod parser;
pub mod toc;

use std::path::Path;

use crate::config::RenderOptions;
use crate::error::Result;

/// A heading about to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for entry headings.
    pub depth: usize,
    pub text: String,
}

/// A single input file behind a source text.
#[derive(Debug, Clone, Copy)]
pub struct InputFile<'a> {
    /// Path as matched, used as the default attribution title.
    pub name: &'a Path,
    /// Absolute path, used to link from the output.
    pub path: &'a Path,
}

/// Text to document plus where it came from and where it is going.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    pub text: &'a str,
    /// `None` for merged inputs with no single source file.
    pub input: Option<InputFile<'a>>,
    /// Absolute output path.
    pub output: &'a Path,
}

impl Source<'_> {
    /// Name used in error messages.
    pub fn display_name(&self) -> String {
        match self.input {
            Some(file) => file.name.display().to_string(),
            None => "<merged input>".to_string(),
        }
    }
}

/// Trait for rendering source text into Markdown.
pub trait Engine {
    fn render(
        &self,
        source: &Source<'_>,
        options: &RenderOptions,
        on_heading: &mut dyn FnMut(Heading) -> Heading,
    ) -> Result<String>;
}
