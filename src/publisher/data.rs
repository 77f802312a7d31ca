use std::path::{Path, PathBuf};

use anyhow::bail;

/// Markdown draft named on the command line.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    /// File name up to its first `.`
    pub stem: String,
    pub source_path: PathBuf,
}

impl Draft {
    /// `filename` may be given with or without its extension: `my-post.md` and
    /// `my-post` both refer to `<source_dir>/my-post.md`.
    pub fn new(filename: &str, source_dir: &Path) -> anyhow::Result<Self> {
        let file_name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = file_name.split('.').next().unwrap_or_default().to_string();
        if stem.is_empty() {
            bail!("cannot derive a post name from {filename:?}");
        }

        let source_path = source_dir.join(format!("{stem}.md"));
        Ok(Self { stem, source_path })
    }

    pub fn markdown_name(&self) -> String {
        format!("{}.md", self.stem)
    }

    pub fn notebook_name(&self) -> String {
        format!("{}.ipynb", self.stem)
    }
}

#[derive(Debug)]
pub(crate) struct Published {
    pub post_path: PathBuf,
    pub notebook_path: Option<PathBuf>,
}
