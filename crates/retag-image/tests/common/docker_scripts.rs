//! Fake docker executables
//!
//! The generated script appends every invocation to a log file, answers
//! `manifest inspect` from a fixed table, and succeeds on everything else
//! unless told to fail a subcommand.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builder for a fake `docker` script
#[derive(Debug, Default)]
pub struct FakeDocker {
    manifests: Vec<(String, String)>,
    fail_subcommand: Option<String>,
    sleep_secs: Option<u64>,
}

/// Paths of an installed fake docker
pub struct InstalledDocker {
    pub binary: PathBuf,
    pub log: PathBuf,
}

impl InstalledDocker {
    /// Invocations in order, one line of arguments each
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl FakeDocker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, reference: &str, raw: &str) -> Self {
        self.manifests.push((reference.to_string(), raw.to_string()));
        self
    }

    /// Exit non-zero for `docker <subcommand>`
    pub fn failing(mut self, subcommand: &str) -> Self {
        self.fail_subcommand = Some(subcommand.to_string());
        self
    }

    /// Sleep before answering anything
    pub fn sleeping(mut self, secs: u64) -> Self {
        self.sleep_secs = Some(secs);
        self
    }

    /// Write the script into `dir`
    #[cfg(unix)]
    pub fn install(&self, dir: &Path) -> std::io::Result<InstalledDocker> {
        let binary = dir.join("docker");
        let log = dir.join("docker.log");

        let mut cases = String::new();
        for (reference, raw) in &self.manifests {
            cases.push_str(&format!("    \"{}\") echo '{}' ;;\n", reference, raw));
        }

        let sleep = self
            .sleep_secs
            .map(|secs| format!("sleep {}\n", secs))
            .unwrap_or_default();

        let fail = self
            .fail_subcommand
            .as_ref()
            .map(|sub| {
                format!(
                    "if [ \"$1\" = \"{}\" ]; then\n    echo \"denied: requested access to the resource is denied\" >&2\n    exit 1\nfi\n",
                    sub
                )
            })
            .unwrap_or_default();

        let script = format!(
            r#"#!/bin/bash
echo "$*" >> "{log}"
{sleep}if [ "$1" = "manifest" ] && [ "$2" = "inspect" ]; then
    case "$3" in
{cases}    *) echo "no such manifest: $3" >&2; exit 1 ;;
    esac
    exit 0
fi
{fail}exit 0
"#,
            log = log.display(),
            sleep = sleep,
            cases = cases,
            fail = fail,
        );

        let mut file = fs::File::create(&binary)?;
        file.write_all(script.as_bytes())?;

        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&binary)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&binary, perms)?;

        Ok(InstalledDocker { binary, log })
    }
}
