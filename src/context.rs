use std::path::PathBuf;

/// Settings resolved from the command line and environment for one run.
#[derive(Debug)]
pub(crate) struct Context {
    pub source_dir: PathBuf,
    pub posts_dir: PathBuf,
    pub notebook_dir: PathBuf,

    pub author: String,
    pub categories: String,
    pub subtitle: String,

    pub handlebars: handlebars::Handlebars<'static>,
}

pub(crate) const DEFAULT_AUTHOR: &str = "Sam Wong";
pub(crate) const DEFAULT_CATEGORIES: &str = "python tutorial";

#[cfg(test)]
impl Context {
    /// Context rooted at `root`: drafts in `root`, posts in `root/_posts`, notebooks in `root/ipynb`.
    pub fn for_test(root: PathBuf) -> Self {
        Self {
            posts_dir: root.join("_posts"),
            notebook_dir: root.join("ipynb"),
            source_dir: root,
            author: DEFAULT_AUTHOR.to_string(),
            categories: DEFAULT_CATEGORIES.to_string(),
            subtitle: String::new(),
            handlebars: crate::renderer::generate_renderer(None).unwrap(),
        }
    }
}
