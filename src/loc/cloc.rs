use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::cli::Language;
use crate::config::ClocConfig;

/// Build the `cloc` invocation producing a by-file CSV report at `out`.
pub(super) fn command<'a>(
    config: &ClocConfig,
    language: Language,
    dirs: impl IntoIterator<Item = &'a PathBuf>,
    out: &Path,
) -> Command {
    let mut cmd = Command::new(&config.binary);
    cmd.arg(format!("--force-lang={}", language.cloc_force_lang()));
    cmd.args(dirs);
    cmd.args(["--skip-uniqueness", "--csv", "--out"]);
    cmd.arg(out);
    cmd.arg("--by-file");
    cmd
}

pub(super) fn run<'a>(
    config: &ClocConfig,
    language: Language,
    dirs: impl IntoIterator<Item = &'a PathBuf>,
    out: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut cmd = command(config, language, dirs, out);
    debug!(tool = "cloc", "{cmd:?}");

    let status = cmd
        .status()
        .map_err(|e| format!("failed to execute {}: {e}", config.binary))?;
    if !status.success() {
        return Err(format!("{} exited with {status}", config.binary).into());
    }
    if !out.is_file() {
        return Err(format!("{} did not write {}", config.binary, out.display()).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<&OsStr> {
        cmd.get_args().collect()
    }

    #[test]
    fn command_lists_every_version_dir() {
        let dirs = vec![PathBuf::from("input/1.0/src"), PathBuf::from("input/1.1/src")];
        let cmd = command(
            &ClocConfig::default(),
            Language::Php,
            &dirs,
            Path::new("output/cloc.csv"),
        );
        assert_eq!(cmd.get_program(), "cloc");
        assert_eq!(
            args(&cmd),
            vec![
                OsStr::new("--force-lang=PHP,php"),
                OsStr::new("input/1.0/src"),
                OsStr::new("input/1.1/src"),
                OsStr::new("--skip-uniqueness"),
                OsStr::new("--csv"),
                OsStr::new("--out"),
                OsStr::new("output/cloc.csv"),
                OsStr::new("--by-file"),
            ]
        );
    }

    #[test]
    fn command_uses_javascript_flag() {
        let cmd = command(
            &ClocConfig::default(),
            Language::Javascript,
            &Vec::new(),
            Path::new("cloc.csv"),
        );
        assert_eq!(args(&cmd)[0], OsStr::new("--force-lang=Javascript,js"));
    }

    #[test]
    fn run_reports_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClocConfig {
            binary: "definitely-not-a-cloc-binary".to_string(),
        };
        let err = run(
            &config,
            Language::Php,
            &Vec::new(),
            &dir.path().join("cloc.csv"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }
}
