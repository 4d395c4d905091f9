//! Build automation tasks for pixelkit games
//!
//! Usage:
//!   cargo xtask build-web          # Build a game for the browser
//!   cargo xtask package-itch       # Zip the web build for itch.io
//!   cargo xtask package-native     # Release build plus assets folder

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Asset list the runtime preloads on the web (see `pixelkit::backend::macroquad`)
const ASSET_MANIFEST: &str = "assets/manifest.txt";

/// Game binary built by default
const DEFAULT_BIN: &str = "space-rocks";

/// macroquad JS loader matching the macroquad version in Cargo.toml
const MQ_JS_BUNDLE: &str = "https://raw.githubusercontent.com/not-fl3/macroquad/v0.4.14/js/mq_js_bundle.js";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for pixelkit games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build WASM and an index.html into dist/web
    BuildWeb {
        /// Game binary to build
        #[arg(long, default_value = DEFAULT_BIN)]
        bin: String,
    },
    /// Create zip file ready for itch.io upload
    PackageItch {
        #[arg(long, default_value = DEFAULT_BIN)]
        bin: String,
    },
    /// Build a native release into dist/native/<platform>
    PackageNative {
        #[arg(long, default_value = DEFAULT_BIN)]
        bin: String,
        /// Target platform: windows, macos, linux
        #[arg(long)]
        platform: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildWeb { bin } => build_web(&bin),
        Commands::PackageItch { bin } => package_itch(&bin),
        Commands::PackageNative { bin, platform } => package_native(&bin, platform),
    }
}

/// Get the project root directory
fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

/// Run a command and check for success
fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().context("Failed to execute command")?;
    if !status.success() {
        anyhow::bail!("Command failed with status: {}", status);
    }
    Ok(())
}

/// Download a file from URL to destination
fn download_file(url: &str, dest: &Path) -> Result<()> {
    println!("Downloading {}...", url);
    run_cmd(
        Command::new("curl")
            .args(["-L", "-o"])
            .arg(dest)
            .arg(url),
    )
}

/// Copy directory recursively
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Copy `assets/` next to the build output, if the game has any
fn copy_assets(root: &Path, dest: &Path) -> Result<()> {
    let assets = root.join("assets");
    if assets.exists() {
        copy_dir_recursive(&assets, &dest.join("assets"))?;
    }
    Ok(())
}

/// Collect files under `dir`, as paths relative to `base`
fn list_files(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            list_files(&path, base, out)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

/// Manifest text: one web path per line, sorted, manifest itself excluded
fn asset_manifest(files: &[PathBuf]) -> String {
    let mut lines: Vec<String> = files
        .iter()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .filter(|line| line != ASSET_MANIFEST)
        .collect();
    lines.sort();
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// Write `assets/manifest.txt` so the web build can preload every asset
fn write_asset_manifest(dist: &Path) -> Result<usize> {
    let assets = dist.join("assets");
    if !assets.exists() {
        return Ok(0);
    }
    let mut files = Vec::new();
    list_files(&assets, dist, &mut files)?;
    let manifest = asset_manifest(&files);
    std::fs::write(dist.join(ASSET_MANIFEST), &manifest)?;
    Ok(manifest.lines().count())
}

/// Page that loads `<bin>.wasm` through the macroquad JS bundle
fn index_html(bin: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{bin}</title>
    <style>
        html, body, canvas {{ margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; background: black; }}
    </style>
</head>
<body>
    <canvas id="glcanvas" tabindex="1"></canvas>
    <script src="mq_js_bundle.js"></script>
    <script>load("{bin}.wasm");</script>
</body>
</html>
"#
    )
}

/// Build WASM for web deployment
fn build_web(bin: &str) -> Result<()> {
    let root = project_root()?;
    let dist = root.join("dist/web");

    println!("Building WASM for {}...", bin);
    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--target", "wasm32-unknown-unknown", "--bin", bin]),
    )?;

    // Clean and create dist folder
    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    println!("Copying files to dist/web...");
    let wasm = format!("{}.wasm", bin);
    std::fs::copy(
        root.join("target/wasm32-unknown-unknown/release").join(&wasm),
        dist.join(&wasm),
    )
    .with_context(|| format!("missing {}", wasm))?;

    std::fs::write(dist.join("index.html"), index_html(bin))?;
    download_file(MQ_JS_BUNDLE, &dist.join("mq_js_bundle.js"))?;
    copy_assets(&root, &dist)?;
    let listed = write_asset_manifest(&dist)?;
    println!("Asset manifest lists {} files", listed);

    println!("Web build complete: dist/web/");
    Ok(())
}

/// Create zip for itch.io
fn package_itch(bin: &str) -> Result<()> {
    build_web(bin)?;

    let root = project_root()?;
    let dist = root.join("dist");
    let zip_name = format!("{}-itch.zip", bin);
    let zip_path = dist.join(&zip_name);

    // Remove old zip if exists
    if zip_path.exists() {
        std::fs::remove_file(&zip_path)?;
    }

    println!("Creating itch.io zip...");
    run_cmd(
        Command::new("zip")
            .current_dir(dist.join("web"))
            .args(["-r", &format!("../{}", zip_name), "."]),
    )?;

    println!("itch.io package ready: dist/{}", zip_name);
    Ok(())
}

/// Native release build
fn package_native(bin: &str, platform: Option<String>) -> Result<()> {
    let root = project_root()?;
    let platform = platform.unwrap_or_else(|| {
        if cfg!(target_os = "windows") {
            "windows".to_string()
        } else if cfg!(target_os = "macos") {
            "macos".to_string()
        } else {
            "linux".to_string()
        }
    });

    let dist = root.join(format!("dist/native/{}", platform));

    println!("Building native release of {} for {}...", bin, platform);

    if dist.exists() {
        std::fs::remove_dir_all(&dist)?;
    }
    std::fs::create_dir_all(&dist)?;

    run_cmd(
        Command::new("cargo")
            .current_dir(&root)
            .args(["build", "--release", "--bin", bin]),
    )?;

    let binary_name = if platform == "windows" {
        format!("{}.exe", bin)
    } else {
        bin.to_string()
    };

    std::fs::copy(
        root.join("target/release").join(&binary_name),
        dist.join(&binary_name),
    )?;
    copy_assets(&root, &dist)?;

    println!("Native build complete: dist/native/{}/", platform);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_loads_named_wasm() {
        let html = index_html("space-rocks");
        assert!(html.contains(r#"load("space-rocks.wasm")"#));
        assert!(html.contains("mq_js_bundle.js"));
    }

    #[test]
    fn test_asset_manifest_lists_web_paths() {
        let files = vec![
            PathBuf::from("assets").join("sprites").join("ship.png"),
            PathBuf::from("assets").join("bg.png"),
            PathBuf::from(ASSET_MANIFEST),
        ];
        assert_eq!(asset_manifest(&files), "assets/bg.png\nassets/sprites/ship.png\n");
    }
}
