use std::path::PathBuf;

use anyhow::bail;
use clap::{command, Arg, ArgAction};
use context::{Context, SiteMetadata};
use generator::generate;

mod context;
mod document;
mod error;
mod feed;
mod generator;
mod index;
mod listing;
mod loader;
mod renderer;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = command!()
        .args(&[
            Arg::new("article_dir")
                .help("Directory path of markdown posts")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("content"),
            Arg::new("out_dir")
                .help("Directory path of output. Existing contents will be removed.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("out"),
            Arg::new("public_dir")
                .help("Directory path of public. Contents will be copied as it is.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("public"),
            Arg::new("template_dir")
                .help("Directory of template")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("template"),
            Arg::new("allow_partial")
                .long("allow-partial")
                .help("Skip malformed posts instead of failing the build")
                .action(ArgAction::SetTrue),
            Arg::new("strict_tags")
                .long("strict-tags")
                .help("Fail the build when two tags map to the same page")
                .action(ArgAction::SetTrue),
        ])
        .get_matches();

    let dir_arg = |name: &str| -> PathBuf {
        matches
            .get_one::<PathBuf>(name)
            .cloned()
            .unwrap_or_default()
    };

    let article_dir = dir_arg("article_dir");
    if !article_dir.is_dir() {
        bail!("article_dir must be a directory.");
    }
    let out_dir = dir_arg("out_dir");
    if out_dir.exists() && !out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }
    let public_dir = dir_arg("public_dir");
    if public_dir.exists() && !public_dir.is_dir() {
        bail!("if public_dir exists, it must be directory.")
    }
    let template_dir = dir_arg("template_dir");
    if !template_dir.is_dir() {
        bail!("template_dir must be a directory.")
    }

    let ctx = Context {
        article_dir,
        out_dir,
        public_dir,
        template_dir,
        site: SiteMetadata::from_env()?,
        allow_partial: matches.get_flag("allow_partial"),
        strict_tags: matches.get_flag("strict_tags"),
    };

    let report = generate(&ctx)?;
    if !report.warnings.is_empty() {
        log::warn!("finished with {} warning(s)", report.warnings.len());
    }

    Ok(())
}
