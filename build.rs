use chrono::Utc;
use std::{env, fs, io, path::PathBuf, process::Command};

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    // Watching paths that do not exist would rerun this script on every build.
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").map_err(io::Error::other)?);
    let git_dir = manifest_dir.join(".git");
    if git_dir.exists() {
        for watched in ["HEAD", "refs/heads", "refs/tags"] {
            let path = git_dir.join(watched);
            if path.exists() {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").map_err(io::Error::other)?);
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    let mut lines = vec![
        "#Selma build properties".to_string(),
        format!("selma.version={}", version),
    ];

    // Git keys are left out when git is unavailable so the runtime fallbacks apply.
    if let Some(full) = git(&["rev-parse", "HEAD"]) {
        lines.push(format!("selma.git.commit-full={}", full));
    }
    if let Some(short) = git(&["rev-parse", "--short", "HEAD"]) {
        lines.push(format!("selma.git.commit-short={}", short));
    }
    if let Some(desc) = git(&["describe", "--tags", "--always", "--dirty"]) {
        lines.push(format!("selma.git.desc={}", desc));
    }

    lines.push(format!("selma.build.timestamp={}", Utc::now().to_rfc3339()));

    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(out_dir.join("selma.properties"), contents)?;

    Ok(())
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}
