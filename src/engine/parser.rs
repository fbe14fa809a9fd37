//! Block-comment parser for JavaScript-family sources.
//!
//! Walks the text line by line, lifting out `/** ... */` (and, unless
//! disabled, `/* ... */`) comments. The first comment not attached to a
//! declaration becomes the source description; later comments become entries
//! when the next line of code declares something recognisable.

use std::sync::LazyLock;

use regex::Regex;

use crate::engine::model::*;
use crate::error::{Error, Result};

// -- Declaration patterns -----------------------------------------------------

// Right-hand sides that make an assignment callable.
const CALLABLE_RHS: &str = r"(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[\w$]+\s*=>)";

static RE_FUNCTION_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([\w$]+)\s*\(").unwrap()
});

static RE_FUNCTION_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^\s*(?:export\s+)?(?:var|let|const)\s+([\w$]+)\s*=\s*{CALLABLE_RHS}"
    ))
    .unwrap()
});

static RE_METHOD_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*([\w$]+(?:\.[\w$]+)+)\s*=\s*{CALLABLE_RHS}")).unwrap()
});

static RE_OBJECT_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*([\w$]+)\s*:\s*{CALLABLE_RHS}")).unwrap()
});

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?class\s+([\w$]+)").unwrap()
});

static RE_CLASS_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:static\s+)?(?:async\s+)?\*?\s*([\w$]+)\s*\([^)]*\)\s*\{").unwrap()
});

static RE_PROPERTY_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([\w$]+(?:\.[\w$]+)+)\s*=(?:[^=]|$)").unwrap());

static RE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:var|let|const)\s+([\w$]+)\s*=(?:[^=]|$)").unwrap()
});

/// Words that look like `name(...) {` but are control flow.
const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "with", "typeof",
];

// -- Public API ---------------------------------------------------------------

/// Parser switches taken from `doxOptions`.
pub struct ParseOptions<'a> {
    pub skip_single_star: bool,
    /// Comments opening with one of these directive words are not documentation.
    pub skip_prefixes: &'a [String],
}

/// Parse `text` into a Document. `source_name` only labels errors.
pub fn parse(text: &str, source_name: &str, options: &ParseOptions<'_>) -> Result<Document> {
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = Document::default();
    let mut seen_comment = false;
    let mut i = 0;

    while i < lines.len() {
        let Some(opening) = lines[i].trim_start().strip_prefix("/*") else {
            i += 1;
            continue;
        };
        let start = i;
        let (style, opening) = comment_style(opening);

        // Collect the body up to the closing `*/`.
        let mut body: Vec<&str> = Vec::new();
        let trailing;
        let mut current = opening;
        loop {
            if let Some(end) = current.find("*/") {
                body.push(&current[..end]);
                trailing = current[end + 2..].trim();
                break;
            }
            body.push(current);
            i += 1;
            if i >= lines.len() {
                return Err(Error::Render {
                    source_name: source_name.to_string(),
                    line: start + 1,
                    message: "unterminated block comment".to_string(),
                });
            }
            current = lines[i];
        }
        i += 1;

        if style == Style::Preserved || (style == Style::SingleStar && options.skip_single_star) {
            continue;
        }

        let body = clean_body(&body);
        let first_text = body.iter().find(|l| !l.trim().is_empty());
        if let Some(first) = first_text {
            let first = first.trim_start();
            if options.skip_prefixes.iter().any(|p| is_directive(first, p)) {
                continue;
            }
        }

        let context_line = if trailing.is_empty() {
            lines[i..].iter().find(|l| !l.trim().is_empty()).copied()
        } else {
            Some(trailing)
        };
        let context = context_line.and_then(detect_context);

        match context {
            None if !seen_comment => {
                let (description, _) = split_block(&body);
                doc.description = paragraphs(&description);
            }
            Some((name, kind)) => {
                if let Some(entry) = build_entry(name, kind, &body) {
                    doc.entries.push(entry);
                }
            }
            None => {}
        }
        seen_comment = true;
    }

    Ok(doc)
}

// -- Comment bodies -----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// `/** ... */`
    Doc,
    /// `/* ... */`
    SingleStar,
    /// `/*! ... */`, never documentation.
    Preserved,
}

/// Classify a comment from the text following its `/*`.
fn comment_style(after_open: &str) -> (Style, &str) {
    if let Some(rest) = after_open.strip_prefix('!') {
        (Style::Preserved, rest)
    } else if after_open.starts_with('*') && !after_open.starts_with("*/") {
        (Style::Doc, &after_open[1..])
    } else {
        (Style::SingleStar, after_open)
    }
}

/// Strip ` * ` gutters and surrounding blank lines.
fn clean_body(raw: &[&str]) -> Vec<String> {
    let mut lines: Vec<String> = raw
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string(),
                None if idx == 0 => trimmed.trim_end().to_string(),
                None => line.trim_end().to_string(),
            }
        })
        .collect();
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// A `@tag payload` line, with continuation lines joined by newlines.
#[derive(Debug)]
struct Tag {
    name: String,
    payload: String,
}

/// Split a body into its leading free text and its tags.
fn split_block(lines: &[String]) -> (Vec<String>, Vec<Tag>) {
    let mut description = Vec::new();
    let mut tags: Vec<Tag> = Vec::new();

    for line in lines {
        let starts_tag = line
            .trim_start()
            .strip_prefix('@')
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()));
        if let Some(rest) = starts_tag {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let name = parts.next().unwrap_or("").to_string();
            let payload = parts.next().unwrap_or("").trim().to_string();
            tags.push(Tag { name, payload });
        } else if let Some(tag) = tags.last_mut() {
            tag.payload.push('\n');
            tag.payload.push_str(line);
        } else {
            description.push(line.clone());
        }
    }

    (description, tags)
}

/// Group lines into blank-line separated paragraphs. Fenced code stays in
/// one paragraph even when it contains blank lines.
fn paragraphs(lines: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in lines {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }
        if line.trim().is_empty() && !in_fence {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

// -- Entries ------------------------------------------------------------------

/// Name and kind declared by a line of code, if any.
fn detect_context(line: &str) -> Option<(String, EntryKind)> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("/*") || trimmed.starts_with("//") {
        return None;
    }

    let patterns: [(&Regex, EntryKind); 8] = [
        (&*RE_FUNCTION_DECL, EntryKind::Function),
        (&*RE_FUNCTION_EXPR, EntryKind::Function),
        (&*RE_METHOD_ASSIGN, EntryKind::Method),
        (&*RE_OBJECT_METHOD, EntryKind::Method),
        (&*RE_CLASS, EntryKind::Class),
        (&*RE_CLASS_METHOD, EntryKind::Method),
        (&*RE_PROPERTY_ASSIGN, EntryKind::Property),
        (&*RE_VARIABLE, EntryKind::Property),
    ];

    for (re, kind) in patterns {
        if let Some(caps) = re.captures(line) {
            let name = &caps[1];
            if KEYWORDS.contains(&name) {
                continue;
            }
            return Some((name.to_string(), kind));
        }
    }
    None
}

/// Build an entry from a comment body. `@private`, `@ignore` and
/// `@api private` drop the entry.
fn build_entry(name: String, kind: EntryKind, body: &[String]) -> Option<Entry> {
    let (description, tags) = split_block(body);
    let description = description.join("\n").trim().to_string();

    let mut entry = Entry {
        name,
        kind,
        description: (!description.is_empty()).then_some(description),
        params: Vec::new(),
        returns: None,
        examples: Vec::new(),
    };

    for tag in tags {
        match tag.name.as_str() {
            "param" | "arg" | "argument" => {
                if let Some(param) = parse_param(&tag.payload) {
                    entry.params.push(param);
                }
            }
            "return" | "returns" => {
                let (type_hint, description) = parse_type_and_rest(&tag.payload);
                entry.returns = Some(Returns {
                    type_hint,
                    description: description.map(|d| collapse(&d)),
                });
            }
            "example" => {
                let example = tag.payload.trim_matches('\n').trim_end().to_string();
                if !example.is_empty() {
                    entry.examples.push(example);
                }
            }
            "private" | "ignore" => return None,
            "api" if tag.payload.trim() == "private" => return None,
            _ => {}
        }
    }

    Some(entry)
}

fn parse_param(payload: &str) -> Option<Param> {
    let (type_hint, rest) = parse_type_and_rest(payload);
    let rest = rest.unwrap_or_default();
    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let raw_name = parts.next()?.trim();
    if raw_name.is_empty() {
        return None;
    }

    let optional = raw_name.starts_with('[');
    let name = raw_name.trim_matches(|c| c == '[' || c == ']');
    let name = name.split('=').next().unwrap_or(name).trim();

    let description = parts
        .next()
        .map(collapse)
        .map(|d| d.trim_start_matches("- ").to_string())
        .filter(|d| !d.is_empty());

    Some(Param {
        name: name.to_string(),
        type_hint,
        optional,
        description,
    })
}

/// Split an optional leading `{Type}` from the rest of a tag payload.
fn parse_type_and_rest(payload: &str) -> (Option<String>, Option<String>) {
    let trimmed = payload.trim();
    if let Some(stripped) = trimmed.strip_prefix('{') {
        if let Some((ty, rest)) = stripped.split_once('}') {
            let ty = ty.trim();
            let rest = rest.trim();
            let ty = (!ty.is_empty()).then(|| ty.to_string());
            let rest = (!rest.is_empty()).then(|| rest.to_string());
            return (ty, rest);
        }
    }
    let rest = (!trimmed.is_empty()).then(|| trimmed.to_string());
    (None, rest)
}

/// Whether `text` opens with the directive word `prefix`, optionally
/// pluralised (`globals`). "globally unique" is prose, not a directive.
fn is_directive(text: &str, prefix: &str) -> bool {
    fn at_boundary(rest: &str) -> bool {
        rest.chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == ':' || c == '-')
    }

    let Some(rest) = text.strip_prefix(prefix) else {
        return false;
    };
    let rest = rest.strip_prefix('s').filter(|r| at_boundary(r)).unwrap_or(rest);
    at_boundary(rest)
}

/// Fold whitespace runs, including continuation newlines, into single spaces.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
