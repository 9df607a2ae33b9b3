use std::path::PathBuf;

use anyhow::bail;
use clap::{command, Arg, ArgAction};
use context::Context;
use date::GitDateResolver;
use generator::Generator;

mod context;
mod date;
mod generator;
mod metadata;
mod renderer;
mod section;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args(&[
            Arg::new("article_dir")
                .help("Directory path of articles. A README.md is maintained in every directory holding posts.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
            Arg::new("ignore_path")
                .long("ignore-path")
                .help("Path, relative to article_dir, skipped with its whole subtree. Added to the always ignored `assets`.")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append),
            Arg::new("dry_run")
                .long("dry-run")
                .help("Report the README files that would change without writing them.")
                .action(ArgAction::SetTrue),
            Arg::new("list")
                .long("list")
                .help("Print the collected posts as JSON.")
                .action(ArgAction::SetTrue),
        ])
        .get_matches();

    let Some(article_dir) = matches.get_one::<PathBuf>("article_dir") else {
        bail!("article_dir is required.");
    };
    if !article_dir.is_dir() {
        bail!("article_dir must be a directory.");
    }
    let ignored_paths = matches
        .get_many::<PathBuf>("ignore_path")
        .into_iter()
        .flatten();

    let context = Context::new(article_dir.to_owned())
        .with_ignored_paths(ignored_paths)
        .with_dry_run(matches.get_flag("dry_run"));

    let posts = Generator::new(&context, GitDateResolver::new()).generate()?;

    if matches.get_flag("list") {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    }

    Ok(())
}
