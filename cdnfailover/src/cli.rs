use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::manifest::{load_manifest, FailoverManifest};
use crate::pipeline::Build;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite every input listed in the manifest into the output directory.
    Build(BuildCli),
    /// Print the markup that replaces one configured marker.
    Snippet(SnippetCli),
}

#[derive(Parser, Debug)]
pub struct BuildCli {
    /// Manifest file (`.toml` or `.json`).
    #[arg(long)]
    pub manifest: PathBuf,
    /// Additional file paths or unix style glob patterns, relative to the manifest root.
    #[arg(long, num_args = 1..)]
    pub input: Vec<String>,
    /// The output directory; overrides `output_dir` from the manifest.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Refer to local files only, with no CDN reference.
    #[arg(long)]
    pub local_only: bool,
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct SnippetCli {
    #[arg(long)]
    pub manifest: PathBuf,
    /// Name of the configured entry.
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub local_only: bool,
}

impl Cli {
    pub fn execute(self) -> Result<ExitCode> {
        match self.command {
            Command::Build(build_cli) => build_cli.execute(),
            Command::Snippet(snippet_cli) => snippet_cli.execute(),
        }
    }
}

impl BuildCli {
    pub fn execute(self) -> Result<ExitCode> {
        let manifest = read_manifest(&self.manifest)?;
        crate::logger::set_verbose(self.verbose || manifest.verbose);
        let mut build = Build::from_manifest(&manifest, manifest_dir(&self.manifest));
        build.inputs.extend(self.input);
        build.local_only |= self.local_only;
        if let Some(output) = self.output {
            build.output_dir = output;
        }
        let report = build
            .run()
            .with_context(|| format!("build failed for {}", self.manifest.display()))?;
        if report.is_success() {
            Ok(ExitCode::SUCCESS)
        } else {
            crate::logger::error(&format!("{} files failed", report.errors.len()));
            Ok(ExitCode::FAILURE)
        }
    }
}

impl SnippetCli {
    pub fn execute(self) -> Result<ExitCode> {
        let manifest = read_manifest(&self.manifest)?;
        let local_only = self.local_only || manifest.uselocalfilesonly;
        let compiled = crate::compile::compile(&manifest.files, local_only);
        let Some(pattern) = compiled.get(&self.name) else {
            anyhow::bail!("no entry named `{}` in {}", self.name, self.manifest.display());
        };
        println!("{}", pattern.replacement);
        Ok(ExitCode::SUCCESS)
    }
}

fn read_manifest(path: &Path) -> Result<FailoverManifest> {
    load_manifest(path).with_context(|| format!("failed to load manifest {}", path.display()))
}

fn manifest_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
