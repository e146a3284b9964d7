use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::errors::{HarnessError, HarnessResult};
use crate::suite::CaseRegistry;

/// Default naming convention for test files.
pub const DEFAULT_FILE_PATTERN: &str = "test_*.rs";

/// Registration function exposed by a test file.
pub type Registrar = fn(&mut CaseRegistry);

/// Glob-style file name pattern (`*` and `?` wildcards, matched against the
/// file name only).
#[derive(Debug, Clone)]
pub struct FilePattern {
    glob: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(glob: &str) -> HarnessResult<Self> {
        let mut source = String::with_capacity(glob.len() + 8);
        source.push('^');
        for ch in glob.chars() {
            match ch {
                '*' => source.push_str("[^/]*"),
                '?' => source.push_str("[^/]"),
                other => source.push_str(&regex::escape(&other.to_string())),
            }
        }
        source.push('$');
        let regex = Regex::new(&source).map_err(|source| HarnessError::InvalidPattern {
            what: "file",
            pattern: glob.to_string(),
            source,
        })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

/// Lists the files directly inside `dir` whose names match `pattern`.
///
/// Subdirectories are not descended into. Symlinks count when they point at
/// a file. The returned list is sorted so test files are always loaded in the
/// same order.
pub fn scan_test_files(dir: &Path, pattern: &FilePattern) -> HarnessResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| HarnessError::Discovery {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let matched = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matched {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Registration functions of the test files a binary knows about, keyed by
/// file stem (`test_posts.rs` -> `test_posts`).
#[derive(Clone, Default)]
pub struct PluginCatalog {
    plugins: BTreeMap<String, Registrar>,
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.plugins.keys()).finish()
    }
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stem: &str, registrar: Registrar) -> Self {
        self.insert(stem, registrar);
        self
    }

    pub fn insert(&mut self, stem: &str, registrar: Registrar) {
        self.plugins.insert(stem.to_string(), registrar);
    }

    pub fn get(&self, stem: &str) -> Option<Registrar> {
        self.plugins.get(stem).copied()
    }

    /// Looks up the registrar for a file path by its stem.
    pub fn for_file(&self, path: &Path) -> Option<Registrar> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| self.get(stem))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
