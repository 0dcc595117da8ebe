use std::path::Path;
use std::process::Command;

use crate::cli::Language;
use crate::config::{Config, JsInspectConfig, PhpcpdConfig};

use super::CompareError;
use super::parse::{jsinspect_duplicated_lines, phpcpd_duplicated_lines};

/// An external duplicate detector and how to read its report.
#[derive(Debug, Clone)]
pub enum Tool {
    /// `jsinspect`, JSON report of match groups.
    JsInspect(JsInspectConfig),
    /// `phpcpd`, free-text summary with a duplicated-lines percentage.
    Phpcpd(PhpcpdConfig),
}

impl Tool {
    pub fn for_language(language: Language, config: &Config) -> Self {
        match language {
            Language::Javascript => Tool::JsInspect(config.jsinspect.clone()),
            Language::Php => Tool::Phpcpd(config.phpcpd.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tool::JsInspect(_) => "jsinspect",
            Tool::Phpcpd(_) => "phpcpd",
        }
    }

    /// Build the invocation comparing `left` against `right`.
    pub fn command(&self, left: &Path, right: &Path) -> Command {
        match self {
            Tool::JsInspect(c) => {
                let mut cmd = Command::new(&c.npx);
                cmd.args(["jsinspect", "-r", "json", "-m"])
                    .arg(c.min_instances.to_string())
                    .arg("-t")
                    .arg(c.threshold.to_string())
                    .arg("--ignore")
                    .arg(&c.ignore)
                    .args(["--no-identifiers", "--no-literals", "--truncate", "0"])
                    .arg(left)
                    .arg(right);
                cmd
            }
            Tool::Phpcpd(c) => {
                let mut cmd = Command::new(&c.php);
                cmd.arg("-d")
                    .arg(format!("memory_limit={}", c.memory_limit))
                    .arg(&c.script)
                    .arg("--min-lines")
                    .arg(c.min_lines.to_string())
                    .arg("--min-tokens")
                    .arg(c.min_tokens.to_string())
                    .arg(left)
                    .arg(right);
                cmd
            }
        }
    }

    /// Extract the duplicated line count from the tool's stdout.
    pub fn parse(&self, output: &str) -> Result<u64, CompareError> {
        match self {
            Tool::JsInspect(_) => jsinspect_duplicated_lines(output),
            Tool::Phpcpd(_) => phpcpd_duplicated_lines(output),
        }
    }
}
