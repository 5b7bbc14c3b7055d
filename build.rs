//! Build script to stamp the runner with a version and git SHA.
//!
//! - HID_VERSION: version string (defaults to CARGO_PKG_VERSION)
//! - HID_GIT_SHA: commit SHA (defaults to GITHUB_SHA, then `git rev-parse`)

use std::process::Command;

fn main() {
    let version = std::env::var("HID_VERSION").unwrap_or_else(|_| {
        std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".into())
    });
    println!("cargo:rustc-env=HID_VERSION={}", version);

    let git_sha = std::env::var("HID_GIT_SHA")
        .ok()
        .or_else(|| {
            std::env::var("GITHUB_SHA")
                .ok()
                .map(|s| s.chars().take(7).collect())
        })
        .unwrap_or_else(short_head);
    println!("cargo:rustc-env=HID_GIT_SHA={}", git_sha);

    println!("cargo:rerun-if-env-changed=HID_VERSION");
    println!("cargo:rerun-if-env-changed=HID_GIT_SHA");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
}

fn short_head() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".into())
}
