//! Custom cargo commands for the docket crate.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask wasm      - Build the browser package
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("wasm") => wasm()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (markers, tests, clippy, wasm, fixture)
  test      Run all Rust tests
  check     Quick check (cargo check + test + clippy)
  wasm      Build the browser package with wasm-pack
  bench     Run benchmarks
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("Docket Verification Suite");
    println!("==========================================\n");

    println!("[1/5] Checking invariant markers...");
    check_invariant_markers()?;
    println!("✓ Invariant markers present\n");

    println!("[2/5] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[3/5] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[4/5] Checking the single-threaded wasm build...");
    run_cargo(&[
        "check",
        "--quiet",
        "--lib",
        "--no-default-features",
        "--features",
        "wasm-single-threaded",
    ])?;
    println!("✓ wasm build checks\n");

    println!("[5/5] Searching the fixture through the CLI...");
    check_fixture()?;
    println!("✓ Fixture searchable\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");
    println!("\nSafe to commit changes.");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Build the browser package (multi-threaded needs nightly + atomics, so default
/// to the single-threaded fallback).
fn wasm() -> Result<()> {
    let root = project_root()?;
    let status = Command::new("wasm-pack")
        .args([
            "build",
            "--target",
            "web",
            "--release",
            "--",
            "--no-default-features",
            "--features",
            "wasm-single-threaded",
        ])
        .current_dir(&root)
        .status()
        .context("Failed to run wasm-pack (is it installed?)")?;

    if !status.success() {
        bail!("wasm-pack build failed");
    }
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

fn check_invariant_markers() -> Result<()> {
    let root = project_root()?;
    let src_dir = root.join("src");

    let output = Command::new("grep")
        .args(["-r", "INVARIANT:", "--include=*.rs"])
        .current_dir(&src_dir)
        .output()
        .context("Failed to run grep")?;

    let count = output.stdout.split(|&b| b == b'\n').filter(|l| !l.is_empty()).count();

    if count < 5 {
        bail!(
            "Expected at least 5 INVARIANT markers, found {}. Someone may have removed safety comments!",
            count
        );
    }

    Ok(())
}

/// The shipped fixture must load and answer a known query.
fn check_fixture() -> Result<()> {
    let root = project_root()?;
    let output = Command::new("cargo")
        .args([
            "run",
            "--quiet",
            "--",
            "--quiet",
            "search",
            "data/fixtures/documents.json",
            "seal",
            "--json",
        ])
        .current_dir(&root)
        .output()
        .context("Failed to run docket search")?;

    if !output.status.success() {
        bail!("docket search failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("\"title\": \"Order\"") {
        bail!("expected the fixture's Order in results, got:\n{}", stdout);
    }
    Ok(())
}
