//! Section snippets injected into the generated table of contents.
//!
//! Matching is done on the exact line shapes produced by
//! [`crate::engine::toc`]:
//!
//! - key `""`: the snippet and a blank line go right after the TOC block
//!   (the marker line, its list items and the terminating blank line)
//! - any other key: the snippet and a newline go right before the TOC item
//!   whose anchor starts with the key's lookup prefix and whose link text is
//!   exactly the key
//!
//! Keys that match nothing are skipped.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::engine::toc::{lookup_prefix, TOC_MARKER};

static RE_TOC_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\n\n(?:- .*\n)*\n", regex::escape(TOC_MARKER))).unwrap()
});

/// Insert `sections` into `markdown`, returning the new text.
pub fn inject(markdown: &str, sections: &BTreeMap<String, String>) -> String {
    let Some(block) = RE_TOC_BLOCK.find(markdown) else {
        debug!("no table of contents; sections skipped");
        return markdown.to_string();
    };
    let toc = block.as_str();

    // Offsets are into the original text, so every key sees the same TOC.
    let mut insertions: Vec<(usize, String)> = Vec::new();
    for (key, snippet) in sections {
        if key.is_empty() {
            insertions.push((block.end(), format!("{snippet}\n\n")));
            continue;
        }

        let pattern = format!(
            r#"(?m)^- <a name="toc_{}[^"]*"></a>\[{}\]"#,
            regex::escape(&lookup_prefix(key)),
            regex::escape(key)
        );
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(err) => {
                warn!(section = %key, error = %err, "section key cannot be matched");
                continue;
            }
        };
        match re.find(toc) {
            Some(m) => insertions.push((block.start() + m.start(), format!("{snippet}\n"))),
            None => debug!(section = %key, "no table of contents entry; section skipped"),
        }
    }

    insertions.sort_by_key(|(offset, _)| *offset);

    let extra: usize = insertions.iter().map(|(_, text)| text.len()).sum();
    let mut output = String::with_capacity(markdown.len() + extra);
    let mut last = 0;
    for (offset, text) in insertions {
        output.push_str(&markdown[last..offset]);
        output.push_str(&text);
        last = offset;
    }
    output.push_str(&markdown[last..]);
    output
}
