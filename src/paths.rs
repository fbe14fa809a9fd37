//! Lexical path helpers. None of these touch the filesystem.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;

/// Canonicalise `.` and `..` segments. An empty result becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.clean()
}

/// Resolve `path` against `base` the way a shell would: absolute paths win,
/// relative ones are joined, and the result is normalised.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    normalize_path(&base.join(path))
}

/// Relative path from directory `from` to `to`. Both should be absolute or
/// both relative to the same root.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from = normalize_path(from);
    let to = normalize_path(to);
    let from_components: Vec<_> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to_components: Vec<_> = to.components().filter(|c| *c != Component::CurDir).collect();

    let common = from_components
        .iter()
        .zip(&to_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..from_components.len() {
        result.push("..");
    }
    for component in &to_components[common..] {
        result.push(component.as_os_str());
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Output name inferred from an input file: same directory and base name,
/// extension replaced with `.md`.
///
/// "index.js" → "index.md", "foo/bar.js" → "foo/bar.md"
pub fn markdown_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}.md");
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Forward-slash rendering of a path for use inside Markdown links.
pub fn to_link(path: &Path) -> String {
    path.components()
        .map(|c| match c {
            Component::RootDir => Cow::Borrowed(""),
            other => other.as_os_str().to_string_lossy(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
