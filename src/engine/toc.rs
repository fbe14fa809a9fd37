//! Anchor and table-of-contents line generation.
//!
//! The section injector matches against these exact shapes, so any change
//! here changes which `sections` keys find their line.

/// Marker line that opens the table of contents.
pub const TOC_MARKER: &str = r#"<a name="tableofcontents"></a>"#;

/// Back-link emitted at the end of every entry.
pub const TOC_BACKLINK: &str = "<sub>Go: [TOC](#tableofcontents)</sub>";

/// Anchor for a heading: lower-cased, keeping only ASCII alphanumerics,
/// `-` and `_`.
///
/// "bdd.config(config)" → "bddconfigconfig"
pub fn anchor(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Prefix of the TOC anchor an entry name is looked up by: lower-cased with
/// dots removed, and filtered like [`anchor`] so names such as `$emit` still
/// line up with their anchor. Anything after it (parameters, member
/// suffixes) is tolerated by the matcher.
pub fn lookup_prefix(name: &str) -> String {
    anchor(name)
}

/// One TOC list item.
pub fn toc_item(name: &str, anchor: &str) -> String {
    format!(r#"- <a name="toc_{anchor}"></a>[{name}](#{anchor})"#)
}

/// Named anchor placed above every entry after the first.
pub fn entry_anchor(anchor: &str) -> String {
    format!(r#"<a name="{anchor}"></a>"#)
}
