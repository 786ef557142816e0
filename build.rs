use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Askama compiles templates into the binary, so template edits need a rebuild.
    watch_files("templates", &["html"]);
    watch_files("assets", &["css"]);

    // Shown in the page footer; tells apart a stale binary from a fresh one.
    let build_id = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "dev".to_string());
    println!("cargo:rustc-env=FRIENDS_MAP_BUILD_ID={}", build_id);
}

fn watch_files(dir: impl AsRef<Path>, extensions: &[&str]) {
    let Ok(entries) = fs::read_dir(dir.as_ref()) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            watch_files(&path, extensions);
        } else if path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| extensions.contains(&ext))
        {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
