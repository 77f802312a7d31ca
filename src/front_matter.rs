use serde::Serialize;

use crate::{context::Context, publisher::data::Draft, timestamp::Timestamp};

const DRAFT_HEADER_IMAGE: &str = "draft-bg.jpg";

/// Flavor of front matter and relocation applied to a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variant {
    /// Stamp in place, keep the file in the drafts directory.
    Draft,
    /// Stamp and move into the posts directory.
    Post,
    /// Like `Post`, and also move the companion notebook.
    Notebook,
}

impl Variant {
    pub fn template_name(&self) -> &'static str {
        match self {
            Variant::Draft => "draft",
            Variant::Post => "post",
            Variant::Notebook => "notebook",
        }
    }

    pub fn removes_source(&self) -> bool {
        !matches!(self, Variant::Draft)
    }
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct FrontMatter {
    pub layout: &'static str,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub author: String,
    pub header_img: String,
    pub categories: String,
    pub comments: bool,
}

impl FrontMatter {
    pub fn new(variant: Variant, draft: &Draft, timestamp: &Timestamp, ctx: &Context) -> Self {
        let (title, subtitle, header_img) = match variant {
            Variant::Draft => (
                format!("[DRAFT] {}", title_from_stem(&draft.stem)),
                draft.markdown_name(),
                format!("img/{DRAFT_HEADER_IMAGE}"),
            ),
            Variant::Post | Variant::Notebook => (
                title_from_stem(&draft.stem),
                ctx.subtitle.clone(),
                format!("img/{}-bg.jpg", draft.stem),
            ),
        };

        FrontMatter {
            layout: "post",
            title,
            subtitle,
            date: timestamp.to_string(),
            author: ctx.author.clone(),
            header_img,
            categories: ctx.categories.clone(),
            comments: variant == Variant::Notebook,
        }
    }
}

/// `my-new-post` -> `My New Post`.
///
/// Separators become spaces; then the first letter of every run of letters is
/// upper-cased and the rest lower-cased. Anything that is not a letter ends a run,
/// so `2nd` becomes `2Nd`.
pub(crate) fn title_from_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}
