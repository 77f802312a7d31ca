use std::path::Path;

use anyhow::Context;
use handlebars::Handlebars;
use log::debug;

use crate::front_matter::{FrontMatter, Variant};

// The blocks end right after the closing `---`; the draft body is appended as is.
const DRAFT_TEMPLATE: &str = concat!(
    "---\n",
    "layout: {{layout}}\n",
    "title:  \"{{title}}\"\n",
    "subtitle:   \"{{subtitle}}\"\n",
    "date:   {{date}}\n",
    "author:     \"{{author}}\"\n",
    "header-img: \"{{header_img}}\"\n",
    "categories: {{categories}}\n",
    "---",
);

const POST_TEMPLATE: &str = concat!(
    "---\n",
    "layout: {{layout}}\n",
    "title:  \"{{title}}\"\n",
    "date:   {{date}}\n",
    "categories: {{categories}}\n",
    "---",
);

const NOTEBOOK_TEMPLATE: &str = concat!(
    "---\n",
    "layout: {{layout}}\n",
    "title:  \"{{title}}\"\n",
    "subtitle:   \"{{subtitle}}\"\n",
    "date:   {{date}}\n",
    "author:     \"{{author}}\"\n",
    "header-img: \"{{header_img}}\"\n",
    "categories: {{categories}}\n",
    "comments: {{comments}}\n",
    "---",
);

const VARIANTS: [Variant; 3] = [Variant::Draft, Variant::Post, Variant::Notebook];

fn default_template(variant: Variant) -> &'static str {
    match variant {
        Variant::Draft => DRAFT_TEMPLATE,
        Variant::Post => POST_TEMPLATE,
        Variant::Notebook => NOTEBOOK_TEMPLATE,
    }
}

/// Registers the built-in front matter templates. `<template_dir>/<variant>.hbs`
/// takes precedence when it exists.
pub(crate) fn generate_renderer(template_dir: Option<&Path>) -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    // front matter is YAML, not HTML
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    for variant in VARIANTS {
        let name = variant.template_name();
        let override_path = template_dir.map(|dir| dir.join(format!("{name}.hbs")));
        match override_path {
            Some(path) if path.is_file() => {
                debug!("using template {path:?} for {name}");
                handlebars
                    .register_template_file(name, &path)
                    .with_context(|| format!("{path:?}"))?;
            }
            _ => {
                handlebars
                    .register_template_string(name, default_template(variant))
                    .with_context(|| format!("built-in {name} template"))?;
            }
        }
    }

    Ok(handlebars)
}

pub(crate) fn render_front_matter(
    handlebars: &Handlebars<'static>,
    variant: Variant,
    front_matter: &FrontMatter,
) -> anyhow::Result<String> {
    handlebars
        .render(variant.template_name(), front_matter)
        .with_context(|| format!("while rendering {} front matter", variant.template_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrontMatter {
        FrontMatter {
            layout: "post",
            title: "My Post".to_string(),
            subtitle: "my-post.md".to_string(),
            date: "2024-01-01 09:08:07".to_string(),
            author: "Sam Wong".to_string(),
            header_img: "img/draft-bg.jpg".to_string(),
            categories: "python tutorial".to_string(),
            comments: true,
        }
    }

    #[test]
    fn post_block_matches_jekyll_layout() {
        let hb = generate_renderer(None).unwrap();
        let block = render_front_matter(&hb, Variant::Post, &sample()).unwrap();
        assert_eq!(
            block,
            "---\nlayout: post\ntitle:  \"My Post\"\ndate:   2024-01-01 09:08:07\ncategories: python tutorial\n---"
        );
    }

    #[test]
    fn draft_block_has_subtitle_author_and_image() {
        let hb = generate_renderer(None).unwrap();
        let block = render_front_matter(&hb, Variant::Draft, &sample()).unwrap();
        assert!(block.contains("subtitle:   \"my-post.md\"\n"));
        assert!(block.contains("author:     \"Sam Wong\"\n"));
        assert!(block.contains("header-img: \"img/draft-bg.jpg\"\n"));
        assert!(!block.contains("comments"));
        assert!(block.ends_with("---"));
    }

    #[test]
    fn notebook_block_has_comments_flag() {
        let hb = generate_renderer(None).unwrap();
        let block = render_front_matter(&hb, Variant::Notebook, &sample()).unwrap();
        assert!(block.contains("comments: true\n---"));
    }

    #[test]
    fn values_are_not_html_escaped() {
        let hb = generate_renderer(None).unwrap();
        let mut fm = sample();
        fm.title = "[DRAFT] Q&A <Rust>".to_string();
        let block = render_front_matter(&hb, Variant::Post, &fm).unwrap();
        assert!(block.contains("title:  \"[DRAFT] Q&A <Rust>\""));
    }

    #[test]
    fn template_dir_overrides_single_variant() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("post.hbs"), "---\ntitle: {{title}}\n---\n").unwrap();

        let hb = generate_renderer(Some(dir.path())).unwrap();
        let post = render_front_matter(&hb, Variant::Post, &sample()).unwrap();
        assert_eq!(post, "---\ntitle: My Post\n---\n");
        // others fall back to the built-in templates
        let draft = render_front_matter(&hb, Variant::Draft, &sample()).unwrap();
        assert!(draft.starts_with("---\nlayout: post\n"));
    }

    #[test]
    fn override_with_unknown_field_fails_to_render() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("post.hbs"), "{{tags}}").unwrap();

        let hb = generate_renderer(Some(dir.path())).unwrap();
        assert!(render_front_matter(&hb, Variant::Post, &sample()).is_err());
    }
}
