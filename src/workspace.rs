//! File access used by the resolver and renderer: glob expansion, reads and
//! writes, all relative to a workspace root.

use std::fs;
use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::error::{Error, Result};

/// `*` and `?` never cross a `/`, so `*.js` does not reach into `foo/`.
/// Hidden files only match a pattern that spells out the leading dot.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

pub trait Workspace {
    /// Directory that relative inputs, outdirs and outputs resolve against.
    fn root(&self) -> &Path;

    /// Files matching `pattern`, in lexical order. Matches under the root are
    /// returned relative to it.
    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    fn read(&self, path: &Path) -> Result<String>;

    /// Overwrite `path`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The real filesystem.
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsWorkspace { root: root.into() }
    }

    /// Workspace rooted at the process working directory.
    pub fn current() -> Result<Self> {
        let root = std::env::current_dir().map_err(|source| Error::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::new(root))
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let escaped_root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
        };
        let matches = glob::glob_with(&full, GLOB_OPTIONS).map_err(|source| Error::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut files: Vec<PathBuf> = matches
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .map(|p| match p.strip_prefix(&self.root) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => p,
            })
            .collect();
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String> {
        let full = self.root.join(path);
        fs::read_to_string(&full).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let full = self.root.join(path);
        let write_err = |source| Error::Write {
            path: full.clone(),
            source,
        };
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&full, contents).map_err(write_err)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory workspace that records every read and write.

    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use super::*;

    pub struct MemoryWorkspace {
        root: PathBuf,
        files: BTreeMap<PathBuf, String>,
        pub reads: RefCell<Vec<PathBuf>>,
        pub writes: RefCell<Vec<(PathBuf, String)>>,
    }

    impl MemoryWorkspace {
        pub fn new() -> Self {
            MemoryWorkspace {
                root: PathBuf::from("/work"),
                files: BTreeMap::new(),
                reads: RefCell::new(Vec::new()),
                writes: RefCell::new(Vec::new()),
            }
        }

        pub fn with_file(mut self, path: &str, contents: &str) -> Self {
            self.files.insert(PathBuf::from(path), contents.to_string());
            self
        }

        pub fn read_paths(&self) -> Vec<PathBuf> {
            self.reads.borrow().clone()
        }

        pub fn written_paths(&self) -> Vec<PathBuf> {
            self.writes.borrow().iter().map(|(p, _)| p.clone()).collect()
        }

        pub fn written(&self, path: &str) -> Option<String> {
            self.writes
                .borrow()
                .iter()
                .find(|(p, _)| p == Path::new(path))
                .map(|(_, text)| text.clone())
        }
    }

    impl Workspace for MemoryWorkspace {
        fn root(&self) -> &Path {
            &self.root
        }

        fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
            let compiled = glob::Pattern::new(pattern).map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            Ok(self
                .files
                .keys()
                .filter(|p| compiled.matches_path_with(p, GLOB_OPTIONS))
                .cloned()
                .collect())
        }

        fn read(&self, path: &Path) -> Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.files.get(path).cloned().ok_or_else(|| Error::Read {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        fn write(&self, path: &Path, contents: &str) -> Result<()> {
            self.writes
                .borrow_mut()
                .push((path.to_path_buf(), contents.to_string()));
            Ok(())
        }
    }
}
