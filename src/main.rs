use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::bail;
use clap::{command, value_parser, Arg, ArgMatches, Command};
use context::Context;
use front_matter::Variant;
use log::{debug, info};

mod context;
mod front_matter;
mod publisher;
mod renderer;
mod timestamp;

fn filename_arg() -> Arg {
    Arg::new("filename")
        .help("Markdown draft to publish, with or without the .md extension")
        .required(true)
}

fn posts_dir_arg() -> Arg {
    Arg::new("posts_dir")
        .long("posts-dir")
        .help("Directory the stamped post is written to")
        .value_parser(value_parser!(PathBuf))
        .default_value("../_posts")
}

fn cli() -> Command {
    command!()
        .subcommand_required(true)
        .args([
            Arg::new("source_dir")
                .short('C')
                .long("source-dir")
                .help("Directory holding the drafts")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
            Arg::new("template_dir")
                .long("template-dir")
                .help("Directory with draft.hbs / post.hbs / notebook.hbs overriding the built-in front matter")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
            Arg::new("author")
                .long("author")
                .help("Author written into the front matter [env: POST_AUTHOR]")
                .global(true),
            Arg::new("categories")
                .long("categories")
                .help("Categories written into the front matter [env: POST_CATEGORIES]")
                .global(true),
        ])
        .subcommands([
            Command::new("draft")
                .about("Stamp a draft with [DRAFT] front matter in place")
                .arg(filename_arg()),
            Command::new("post")
                .about("Stamp a draft and move it into the posts directory")
                .args([filename_arg(), posts_dir_arg()]),
            Command::new("notebook")
                .about("Publish a draft together with its .ipynb notebook")
                .args([
                    filename_arg(),
                    Arg::new("date")
                        .help("Publish date (YYYY-MM-DD); a random time of day is picked. Defaults to now."),
                    posts_dir_arg(),
                    Arg::new("notebook_dir")
                        .long("notebook-dir")
                        .help("Directory the notebook is moved to")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("../ipynb"),
                    Arg::new("subtitle")
                        .long("subtitle")
                        .help("Subtitle written into the front matter")
                        .default_value(""),
                ]),
        ])
}

fn string_or_env(matches: &ArgMatches, id: &str, var: &str, default: &str) -> String {
    matches
        .get_one::<String>(id)
        .cloned()
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or(default.to_string())
}

fn path_arg(matches: &ArgMatches, id: &str) -> PathBuf {
    matches
        .try_get_one::<PathBuf>(id)
        .ok()
        .flatten()
        .cloned()
        .unwrap_or_default()
}

/// `[INFO] message`
fn format_record<W: Write + ?Sized>(buf: &mut W, record: &log::Record) -> io::Result<()> {
    writeln!(buf, "[{}] {}", record.level(), record.args())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| format_record(buf, record))
        .init();

    let matches = cli().get_matches();
    let (variant, sub) = match matches.subcommand() {
        Some(("draft", sub)) => (Variant::Draft, sub),
        Some(("post", sub)) => (Variant::Post, sub),
        Some(("notebook", sub)) => (Variant::Notebook, sub),
        _ => bail!("unknown subcommand"),
    };
    info!("running {}", variant.template_name());

    let source_dir = path_arg(&matches, "source_dir");
    if !source_dir.is_dir() {
        bail!("source_dir must be a directory.");
    }
    let template_dir = matches.get_one::<PathBuf>("template_dir");
    if let Some(dir) = template_dir {
        if !dir.is_dir() {
            bail!("template_dir must be a directory.");
        }
    }

    let ctx = Context {
        source_dir,
        posts_dir: path_arg(sub, "posts_dir"),
        notebook_dir: path_arg(sub, "notebook_dir"),
        author: string_or_env(&matches, "author", "POST_AUTHOR", context::DEFAULT_AUTHOR),
        categories: string_or_env(
            &matches,
            "categories",
            "POST_CATEGORIES",
            context::DEFAULT_CATEGORIES,
        ),
        subtitle: sub
            .try_get_one::<String>("subtitle")
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_default(),
        handlebars: renderer::generate_renderer(template_dir.map(PathBuf::as_path))?,
    };
    debug!("{ctx:?}");

    let filename: &String = sub
        .get_one("filename")
        .ok_or_else(|| anyhow::anyhow!("filename is required"))?;
    let date = sub
        .try_get_one::<String>("date")
        .ok()
        .flatten()
        .map(String::as_str);

    let published = publisher::publish(&ctx, variant, filename, date)?;
    debug!("post: {}", published.post_path.display());
    if let Some(notebook) = published.notebook_path {
        debug!("notebook: {}", notebook.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn notebook_accepts_optional_date() {
        let m = cli()
            .try_get_matches_from(["pubdraft", "notebook", "my-post", "2024-01-01"])
            .unwrap();
        let (name, sub) = m.subcommand().unwrap();
        assert_eq!(name, "notebook");
        assert_eq!(sub.get_one::<String>("date").unwrap(), "2024-01-01");
        assert_eq!(path_arg(sub, "notebook_dir"), PathBuf::from("../ipynb"));
        assert_eq!(path_arg(sub, "posts_dir"), PathBuf::from("../_posts"));
    }

    #[test]
    fn post_rejects_date_argument() {
        assert!(cli()
            .try_get_matches_from(["pubdraft", "post", "my-post", "2024-01-01"])
            .is_err());
    }

    #[test]
    fn global_options_may_follow_subcommand() {
        let m = cli()
            .try_get_matches_from(["pubdraft", "-C", "drafts", "post", "my-post", "--author", "Ann"])
            .unwrap();
        assert_eq!(path_arg(&m, "source_dir"), PathBuf::from("drafts"));
        assert_eq!(string_or_env(&m, "author", "PUBDRAFT_TEST_UNSET", "x"), "Ann");
        assert_eq!(string_or_env(&m, "categories", "PUBDRAFT_TEST_UNSET", "x"), "x");
    }

    #[test]
    fn empty_env_value_falls_back_to_default() {
        std::env::set_var("PUBDRAFT_TEST_EMPTY_AUTHOR", "");
        let m = cli()
            .try_get_matches_from(["pubdraft", "post", "my-post"])
            .unwrap();
        assert_eq!(
            string_or_env(&m, "author", "PUBDRAFT_TEST_EMPTY_AUTHOR", context::DEFAULT_AUTHOR),
            "Sam Wong"
        );

        std::env::set_var("PUBDRAFT_TEST_SET_AUTHOR", "Ann");
        assert_eq!(
            string_or_env(&m, "author", "PUBDRAFT_TEST_SET_AUTHOR", context::DEFAULT_AUTHOR),
            "Ann"
        );
    }

    #[test]
    fn log_lines_are_prefixed_with_level() {
        let mut out = Vec::new();
        format_record(
            &mut out,
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("Output:\t{}", "../_posts/2024-01-01-my-post.md"))
                .build(),
        )
        .unwrap();
        format_record(
            &mut out,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("stamping anyway"))
                .build(),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[INFO] Output:\t../_posts/2024-01-01-my-post.md\n[WARN] stamping anyway\n"
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(cli().try_get_matches_from(["pubdraft"]).is_err());
    }
}
