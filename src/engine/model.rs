//! Data model for parsed comment blocks, independent of output format.

/// Everything extracted from one source text.
#[derive(Debug, Default)]
pub struct Document {
    /// Paragraphs of the leading source description, in order.
    pub description: Vec<String>,
    pub entries: Vec<Entry>,
}

/// A documented declaration.
#[derive(Debug)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub description: Option<String>,
    pub params: Vec<Param>,
    pub returns: Option<Returns>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Function,
    Method,
    Class,
    Property,
}

/// `@param {Type} name description`
#[derive(Debug, Default)]
pub struct Param {
    pub name: String,
    pub type_hint: Option<String>,
    /// Written as `[name]`.
    pub optional: bool,
    pub description: Option<String>,
}

/// `@return {Type} description`
#[derive(Debug, Default)]
pub struct Returns {
    pub type_hint: Option<String>,
    pub description: Option<String>,
}

impl Entry {
    pub fn is_callable(&self) -> bool {
        matches!(self.kind, EntryKind::Function | EntryKind::Method)
    }

    /// Heading text before any interception: `name(a, [b])` for callables,
    /// the bare name otherwise. Dotted parameter names (`options.foo`)
    /// describe members and are left out of the signature.
    pub fn heading(&self) -> String {
        if !self.is_callable() {
            return self.name.clone();
        }
        let params: Vec<String> = self
            .params
            .iter()
            .filter(|p| !p.name.contains('.'))
            .map(|p| {
                if p.optional {
                    format!("[{}]", p.name)
                } else {
                    p.name.clone()
                }
            })
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }
}
