//! Import tagged releases of a git repository as version directories.
//!
//! Each tag is fetched on its own into `<output_dir>/<tag>` and checked out
//! detached, so the output directory can be used directly as the input of
//! a comparison run.

use std::error::Error;
use std::fs;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{AutotagOption, Direction, FetchOptions, Remote, Repository};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::ImportArgs;
use crate::config::ImportConfig;
use crate::report_helpers;
use crate::version::{compare_versions, sort_versions};

const TAG_PREFIX: &str = "refs/tags/";
const PEELED_SUFFIX: &str = "^{}";

/// A tag advertised by a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteTag {
    pub oid: String,
    pub name: String,
}

/// Tally of one import run.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Tags advertised by the remote at `url`, in natural order. Peeled
/// entries of annotated tags are left out.
pub fn list_tags(url: &str) -> Result<Vec<RemoteTag>, Box<dyn Error>> {
    let mut remote = Remote::create_detached(url)?;
    remote
        .connect(Direction::Fetch)
        .map_err(|e| format!("cannot connect to {url}: {e}"))?;

    let mut tags: Vec<RemoteTag> = remote
        .list()?
        .iter()
        .filter_map(|head| {
            let name = head.name().strip_prefix(TAG_PREFIX)?;
            if name.ends_with(PEELED_SUFFIX) {
                return None;
            }
            Some(RemoteTag {
                oid: head.oid().to_string(),
                name: name.to_string(),
            })
        })
        .collect();
    remote.disconnect()?;

    tags.sort_by(|a, b| compare_versions(&a.name, &b.name));
    Ok(tags)
}

/// Tags requested on the command line. A tags file (one tag per line)
/// takes precedence over the comma-separated list. Blank entries are
/// dropped and the result is in natural order.
pub fn parse_tags(
    tags: Option<&str>,
    tags_file: Option<&Path>,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut parsed: Vec<String> = if let Some(path) = tags_file {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read tags file {}: {e}", path.display()))?;
        content
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    } else if let Some(list) = tags {
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    } else {
        return Err("either --tags or --tags-from-file is required".into());
    };

    sort_versions(&mut parsed);
    Ok(parsed)
}

/// Local paths and `file://` URLs go through libgit2's local transport,
/// which cannot fetch shallow.
fn is_local(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).exists()
}

/// Fetch a single tag from `url` into a new repository at `dest` and check
/// it out. `depth` 0 fetches the full history, and so does any depth for a
/// local repository.
pub fn clone_tag(url: &str, tag: &str, dest: &Path, depth: i32) -> Result<(), Box<dyn Error>> {
    let repo = Repository::init(dest)?;
    let mut remote = repo.remote_anonymous(url)?;

    let mut options = FetchOptions::new();
    options.download_tags(AutotagOption::None);
    if depth > 0 && !is_local(url) {
        options.depth(depth);
    }

    let refname = format!("{TAG_PREFIX}{tag}");
    let refspec = format!("+{refname}:{refname}");
    debug!("fetching {refspec} from {url} (depth {depth})");
    remote
        .fetch(&[refspec.as_str()], Some(&mut options), None)
        .map_err(|e| format!("cannot fetch tag {tag}: {e}"))?;

    let commit = repo
        .find_reference(&refname)
        .map_err(|_| format!("tag {tag} not found on {url}"))?
        .peel_to_commit()?;
    repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))?;
    repo.set_head_detached(commit.id())?;
    Ok(())
}

/// Import every tag into `output_dir`. Tags whose directory already exists
/// are skipped; a failed tag is logged and its partial checkout removed.
pub fn import_tags(
    url: &str,
    tags: &[String],
    output_dir: &Path,
    depth: i32,
) -> Result<ImportStats, Box<dyn Error>> {
    fs::create_dir_all(output_dir)?;
    let mut stats = ImportStats::default();

    for tag in tags {
        let dest = output_dir.join(tag);
        if dest.exists() {
            info!("{} already exists, skipping {tag}", dest.display());
            stats.skipped += 1;
            continue;
        }

        info!("importing {tag} into {}", dest.display());
        match clone_tag(url, tag, &dest, depth) {
            Ok(()) => stats.imported += 1,
            Err(err) => {
                warn!("{tag}: {err}");
                if let Err(e) = fs::remove_dir_all(&dest) {
                    debug!("cannot remove {}: {e}", dest.display());
                }
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

fn print_tags(tags: &[RemoteTag]) {
    for tag in tags {
        println!("{}\t{}", tag.oid, tag.name);
    }
}

fn print_stats(stats: &ImportStats, output_dir: &Path) {
    let separator = report_helpers::separator(40);
    println!("{separator}");
    println!(" {:<20} {:>8}", "Imported", stats.imported);
    println!(" {:<20} {:>8}", "Skipped", stats.skipped);
    println!(" {:<20} {:>8}", "Failed", stats.failed);
    println!("{separator}");
    println!(" Output: {}", output_dir.display());
}

pub fn run(args: &ImportArgs, config: &ImportConfig) -> Result<(), Box<dyn Error>> {
    if args.list_tags {
        print_tags(&list_tags(&args.url)?);
        return Ok(());
    }

    let tags = parse_tags(args.tags.as_deref(), args.tags_from_file.as_deref())?;
    let stats = import_tags(&args.url, &tags, &args.output_dir, config.depth)?;
    print_stats(&stats, &args.output_dir);

    if stats.failed > 0 {
        return Err(format!("{} of {} tags failed to import", stats.failed, tags.len()).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
