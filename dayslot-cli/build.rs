//! Stamps `--version` with the workspace's git revision.

use std::path::Path;
use std::process::Command;

fn git_revision(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_owned())
}

fn main() {
    let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into());
    let workspace = Path::new(&manifest_dir).join("..");

    let revision = git_revision(&workspace).unwrap_or_else(|| "no-git".to_owned());
    println!("cargo:rustc-env=DAYSLOT_BUILD_SHA={revision}");

    for tracked in [".git/HEAD", ".git/index"] {
        let path = workspace.join(tracked);
        if path.exists() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
    println!("cargo:rerun-if-changed=build.rs");
}
