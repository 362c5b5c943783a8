//! Build automation tasks for CATastrophe2
//!
//! Usage:
//!   cargo xtask build-web        # Stage the WASM build in dist/web
//!   cargo xtask build-web --dev  # Same, with a DEV marker on the page
//!   cargo xtask package-itch     # Zip dist/web for itch.io upload
//!
//! The web build embeds its tuning file, so dist/web only needs the page,
//! the wasm binary and macroquad's JS loader.

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const WASM_TARGET: &str = "wasm32-unknown-unknown";
const WASM_NAME: &str = "catastrophe.wasm";
const ITCH_ZIP: &str = "catastrophe-itch.zip";
const MQ_JS_URL: &str = "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for CATastrophe2")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM and stage it in dist/web
    BuildWeb {
        /// Mark the page title and loading text as a dev build
        #[arg(long)]
        dev: bool,
    },
    /// Build the web release and zip it for itch.io
    PackageItch,
}

fn main() -> Result<()> {
    let workspace = Workspace::locate()?;

    match Cli::parse().command {
        Commands::BuildWeb { dev } => workspace.build_web(dev),
        Commands::PackageItch => workspace.package_itch(),
    }
}

/// Paths of the repository this xtask lives in
struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn locate() -> Result<Self> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("xtask must live inside the workspace")?
            .to_path_buf();
        Ok(Self { root })
    }

    fn dist(&self) -> PathBuf {
        self.root.join("dist")
    }

    fn dist_web(&self) -> PathBuf {
        self.dist().join("web")
    }

    /// Run `program` from the workspace root and fail on a non-zero exit.
    fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let status = Command::new(program)
            .current_dir(&self.root)
            .args(args)
            .status()
            .with_context(|| format!("could not start `{}`", program))?;
        if !status.success() {
            bail!("`{} {}` exited with {}", program, args.join(" "), status);
        }
        Ok(())
    }

    fn build_web(&self, dev: bool) -> Result<()> {
        println!("[xtask] building {} for {}", WASM_NAME, WASM_TARGET);
        self.run("cargo", &["build", "--release", "--bin", "catastrophe", "--target", WASM_TARGET])?;

        let wasm = self
            .root
            .join("target")
            .join(WASM_TARGET)
            .join("release")
            .join(WASM_NAME);
        ensure!(wasm.exists(), "cargo finished but {} is missing", wasm.display());

        let out = self.dist_web();
        if out.exists() {
            fs::remove_dir_all(&out).with_context(|| format!("clearing {}", out.display()))?;
        }
        fs::create_dir_all(&out)?;

        fs::copy(&wasm, out.join(WASM_NAME))?;
        let page = fs::read_to_string(self.root.join("web/index.html")).context("reading web/index.html")?;
        let page = if dev { mark_dev(&page) } else { page };
        fs::write(out.join("index.html"), page)?;
        fetch_js_bundle(&out.join("mq_js_bundle.js"))?;

        println!("[xtask] web build staged in {}", out.display());
        Ok(())
    }

    fn package_itch(&self) -> Result<()> {
        self.build_web(false)?;

        let zip = self.dist().join(ITCH_ZIP);
        if zip.exists() {
            fs::remove_file(&zip)?;
        }

        // itch.io wants index.html at the top of the archive
        let status = Command::new("zip")
            .current_dir(self.dist_web())
            .args(["-q", "-r"])
            .arg(&zip)
            .arg(".")
            .status()
            .context("could not start `zip`")?;
        ensure!(status.success(), "zip exited with {}", status);

        println!("[xtask] itch.io package ready: {}", zip.display());
        Ok(())
    }
}

/// Tag the page so a dev upload can't be mistaken for a release.
fn mark_dev(page: &str) -> String {
    page.replacen("<title>CATastrophe2", "<title>[DEV] CATastrophe2", 1)
        .replacen("Loading CATastrophe2...", "Loading CATastrophe2 (DEV)...", 1)
}

fn fetch_js_bundle(dest: &Path) -> Result<()> {
    println!("[xtask] fetching {}", MQ_JS_URL);
    let status = Command::new("curl")
        .args(["--fail", "--silent", "--show-error", "--location", "--output"])
        .arg(dest)
        .arg(MQ_JS_URL)
        .status()
        .context("could not start `curl`")?;
    ensure!(status.success(), "downloading the macroquad JS bundle failed ({})", status);
    Ok(())
}
