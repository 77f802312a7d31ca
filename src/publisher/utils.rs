use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::bail;
use regex::Regex;

use crate::timestamp::Timestamp;

/// `<dir>/<YYYY-MM-DD>-<name>`
pub(super) fn dated_path(dir: &Path, timestamp: &Timestamp, name: &str) -> PathBuf {
    dir.join(format!("{}-{}", timestamp.date_prefix(), name))
}

pub(super) fn ensure_dir(dir: &Path, what: &str) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("{what} {dir:?} does not exist or is not a directory.");
    }
    Ok(())
}

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---\r?\n(?:(?s:.*?)\r?\n)?---(\r?\n|$)").expect("valid header pattern")
});

/// Whether `content` already opens with a pandoc-style `---` block.
pub(super) fn has_front_matter(content: &str) -> bool {
    HEADER_PATTERN.is_match(content)
}
