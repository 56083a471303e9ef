fn main() {
    // Rerun if any script fixture changes, so #[files] picks up new ones
    println!("cargo:rerun-if-changed=tests/scripts");

    let scripts = std::path::Path::new("tests/scripts");
    if let Ok(entries) = std::fs::read_dir(scripts) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("wast") {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}
