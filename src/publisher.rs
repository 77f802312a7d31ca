use std::path::Path;

use anyhow::{bail, Context as _};
use fs_extra::file::CopyOptions;
use log::{info, warn};
use rand::Rng;

use crate::{
    context::Context,
    front_matter::{FrontMatter, Variant},
    renderer::render_front_matter,
    timestamp::Timestamp,
};

use self::data::{Draft, Published};

pub(crate) mod data;
mod utils;

/// Stamps `filename` with front matter and moves it where `variant` wants it.
pub(crate) fn publish(
    ctx: &Context,
    variant: Variant,
    filename: &str,
    date: Option<&str>,
) -> anyhow::Result<Published> {
    publish_with_rng(ctx, variant, filename, date, &mut rand::rng())
}

fn publish_with_rng<R: Rng + ?Sized>(
    ctx: &Context,
    variant: Variant,
    filename: &str,
    date: Option<&str>,
    rng: &mut R,
) -> anyhow::Result<Published> {
    let draft = Draft::new(filename, &ctx.source_dir)?;
    info!("Input:\t{}", draft.source_path.display());

    let timestamp = Timestamp::resolve(date, rng)?;

    let output_path = match variant {
        Variant::Draft => draft.source_path.clone(),
        Variant::Post | Variant::Notebook => {
            utils::ensure_dir(&ctx.posts_dir, "posts directory")?;
            utils::dated_path(&ctx.posts_dir, &timestamp, &draft.markdown_name())
        }
    };
    let notebook = if variant == Variant::Notebook {
        utils::ensure_dir(&ctx.notebook_dir, "notebook directory")?;
        let from = ctx.source_dir.join(draft.notebook_name());
        if !from.is_file() {
            bail!("companion notebook {from:?} does not exist.");
        }
        let to = utils::dated_path(&ctx.notebook_dir, &timestamp, &draft.notebook_name());
        if to.exists() {
            bail!("{to:?} already exists.");
        }
        Some((from, to))
    } else {
        None
    };

    let front_matter = FrontMatter::new(variant, &draft, &timestamp, ctx);
    let block = render_front_matter(&ctx.handlebars, variant, &front_matter)?;

    relocate(&draft, &block, &output_path, variant.removes_source())?;

    let notebook_path = match notebook {
        Some((from, to)) => {
            move_companion(&from, &to)?;
            Some(to)
        }
        None => None,
    };

    Ok(Published {
        post_path: output_path,
        notebook_path,
    })
}

/// Writes `front_matter` followed by the draft body to `output_path`, then
/// removes the draft if asked to. Nothing is rolled back if removal fails.
fn relocate(
    draft: &Draft,
    front_matter: &str,
    output_path: &Path,
    remove_source: bool,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&draft.source_path)
        .with_context(|| format!("while reading {:?}", draft.source_path))?;
    if utils::has_front_matter(&content) {
        warn!(
            "{} already starts with front matter; stamping anyway",
            draft.source_path.display()
        );
    }

    let mut stamped = String::with_capacity(front_matter.len() + content.len());
    stamped.push_str(front_matter);
    stamped.push_str(&content);
    std::fs::write(output_path, stamped)
        .with_context(|| format!("while writing {output_path:?}"))?;
    info!("Output:\t{}", output_path.display());

    if remove_source && output_path != draft.source_path.as_path() {
        std::fs::remove_file(&draft.source_path)
            .with_context(|| format!("while deleting {:?}", draft.source_path))?;
        info!("{} deleted", draft.source_path.display());
    }

    Ok(())
}

/// Moves the notebook next to the other published notebooks. Falls back to
/// copy and delete across filesystems; never overwrites.
fn move_companion(from: &Path, to: &Path) -> anyhow::Result<()> {
    if to.exists() {
        bail!("{to:?} already exists.");
    }
    let options = CopyOptions::new();
    fs_extra::file::move_file(from, to, &options)
        .with_context(|| format!("while moving {from:?} to {to:?}"))?;
    info!("{} moved to {}", from.display(), to.display());

    Ok(())
}
