/// CLI argument definitions for the `versus` command.
///
/// Two subcommands: `compare` runs the line-count and similarity pipeline
/// over a directory of versions, `import` fetches tagged releases from a
/// git remote into such a directory.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI parser. Verbosity and config file apply to every subcommand.
#[derive(Parser)]
#[command(
    name = "versus",
    version,
    about = "Compare every version of a codebase against every other"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./versus.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source language of the compared versions. Picks both the cloc language
/// filter and the similarity tool.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    Php,
    Javascript,
}

impl Language {
    /// Value passed to cloc's `--force-lang`.
    pub fn cloc_force_lang(self) -> &'static str {
        match self {
            Language::Php => "PHP,php",
            Language::Javascript => "Javascript,js",
        }
    }
}

/// Arguments of `versus compare`.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    /// Language of the codebase
    #[arg(long, value_enum, default_value_t = Language::Php)]
    pub language: Language,

    /// Directory holding one subdirectory per version
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    /// Subdirectory inside each version to analyze (e.g. src)
    #[arg(long)]
    pub input_sub_dir: Option<PathBuf>,

    /// Directory for the reports and caches
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Reuse an existing cloc report instead of running cloc
    #[arg(long)]
    pub use_cloc_cache: bool,

    /// Cloc report used with --use-cloc-cache
    #[arg(long, default_value = "output/cloc.csv")]
    pub cloc_cache_file: PathBuf,

    /// Reuse a previously computed comparison matrix
    #[arg(long)]
    pub use_heatmap_cache: bool,

    /// Matrix cache used with --use-heatmap-cache
    #[arg(long, default_value = "output/heatmap.json")]
    pub heatmap_cache_file: PathBuf,

    /// Comparisons run concurrently per batch (overrides the config file)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `versus import`.
#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Git repository URL (or local path)
    pub url: String,

    /// List the remote tags and exit
    #[arg(long)]
    pub list_tags: bool,

    /// Directory receiving one checkout per tag
    #[arg(long, default_value = "imported")]
    pub output_dir: PathBuf,

    /// Comma-separated tags to import
    #[arg(long)]
    pub tags: Option<String>,

    /// File with one tag per line
    #[arg(long)]
    pub tags_from_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count lines per version and compare every pair of versions
    #[command(long_about = "\
Count lines per version and compare every pair of versions.

Each subdirectory of --input-dir is one version. Versions are ordered
naturally (1.2 before 1.10). For every pair the similarity tool reports the
number of duplicated lines: jsinspect for JavaScript, phpcpd for PHP.

Writes into --output-dir:
  cloc.csv       per-file line counts
  barchart.html  lines of code per version
  heatmap.json   raw comparison matrix (reusable with --use-heatmap-cache)
  heatmap.html   similarity heatmap

Requires cloc, plus npx/jsinspect or php/phpcpd, on the PATH.

Examples:
  versus compare --language php
  versus compare --language javascript --input-sub-dir src
  versus compare --language php --use-cloc-cache --use-heatmap-cache")]
    Compare(CompareArgs),

    /// Import tagged releases from a git repository
    #[command(long_about = "\
Import tagged releases from a git repository.

Every tag is checked out into its own directory under --output-dir, ready
to be used as --input-dir of `versus compare`. Tags that are already
present are skipped.

Examples:
  versus import https://github.com/org/project --list-tags
  versus import https://github.com/org/project --tags v1.0,v1.1
  versus import https://github.com/org/project --tags-from-file tags.txt")]
    Import(ImportArgs),
}
