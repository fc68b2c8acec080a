use anyhow::{bail, Context, Result};
use std::env;
use std::process::Command;
use std::string::String;

/// Feature sets exercised by `cargo xtask test`.
pub const FEATURE_MATRIX: &[FeatureSet] = &[
    FeatureSet::new(&[], false),
    FeatureSet::new(&["std"], false),
    FeatureSet::new(&["parallel"], false),
    FeatureSet::new(&["verbose-logging"], true),
];

/// One cargo feature selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    pub features: &'static [&'static str],
    pub default_features: bool,
}

impl FeatureSet {
    pub const fn new(features: &'static [&'static str], default_features: bool) -> Self {
        Self {
            features,
            default_features,
        }
    }

    fn apply(&self, cmd: &mut Command) {
        if !self.default_features {
            cmd.arg("--no-default-features");
        }
        if !self.features.is_empty() {
            cmd.arg("--features").arg(self.features.join(" "));
        }
    }
}

/// Options derived from the host machine used to configure cargo commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub default_features: bool,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }

    fn apply(&self, cmd: &mut Command) {
        if !self.default_features {
            cmd.arg("--no-default-features");
        }
        if let Some(f) = self.features_arg() {
            cmd.arg("--features").arg(f);
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let extra = env::var("SPECFFT_FEATURES").unwrap_or_default();
    compute_config(detect_nproc(), &extra)
}

fn detect_nproc() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
///
/// Single-core hosts build without the worker pool.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features = Vec::new();
    let default_features = nproc > 1;
    if !default_features {
        features.push("std".to_string());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig {
        features,
        default_features,
    }
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("build");
    cfg.apply(&mut cmd);
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("test");
    cfg.apply(&mut cmd);
    cmd
}

/// One `cargo test` invocation per entry of [`FEATURE_MATRIX`].
pub fn matrix_commands() -> Vec<Command> {
    FEATURE_MATRIX
        .iter()
        .map(|set| {
            let mut cmd = Command::new("cargo");
            cmd.args(["test", "-p", "specfft"]);
            set.apply(&mut cmd);
            cmd
        })
        .collect()
}

pub fn clippy_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args([
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["fmt", "--all"]);
    cmd
}

pub fn demo_command(cfg: &BuildConfig, name: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--example", name]);
    cfg.apply(&mut cmd);
    cmd
}

/// Run each command in turn, stopping at the first failure.
pub fn run_all(commands: impl IntoIterator<Item = Command>) -> Result<()> {
    for mut cmd in commands {
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
        if !status.success() {
            let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
            bail!("`cargo {}` exited with {}", args.join(" "), status);
        }
    }
    Ok(())
}
