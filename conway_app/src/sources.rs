// sources.rs - Where pattern text comes from: the built-in library or a directory of files

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub trait PatternSource {
    /// Short label shown in the pattern picker.
    fn label(&self) -> String;
    fn names(&self) -> Result<Vec<String>>;
    fn fetch(&self, name: &str) -> Result<String>;
}

pub struct Builtin;

impl PatternSource for Builtin {
    fn label(&self) -> String {
        "Built-in".to_string()
    }

    fn names(&self) -> Result<Vec<String>> {
        Ok(conway::patterns::names().map(str::to_string).collect())
    }

    fn fetch(&self, name: &str) -> Result<String> {
        match conway::patterns::find(name) {
            Some(pattern) => Ok(pattern.text.to_string()),
            None => bail!("no built-in pattern named {name:?}"),
        }
    }
}

/// Every regular file in one directory, listed by file name.
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, name: &str) -> Result<PathBuf> {
        // Names come from the picker, but keep lookups inside the directory.
        let file = Path::new(name);
        if file.components().count() != 1 || file.file_name().is_none() {
            bail!("invalid pattern name {name:?}");
        }
        Ok(self.root.join(file))
    }
}

impl PatternSource for Directory {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("reading pattern directory {}", self.root.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn fetch(&self, name: &str) -> Result<String> {
        let path = self.path_of(name)?;
        fs::read_to_string(&path).with_context(|| format!("reading pattern file {}", path.display()))
    }
}
