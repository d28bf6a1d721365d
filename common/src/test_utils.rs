use std::path::PathBuf;
use std::sync::OnceLock;

/// Returns the workspace root directory (parent of the calling crate).
fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Creates `test_output/` under the workspace root once per process.
pub fn ensure_test_output_dir() -> PathBuf {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = workspace_root().join("test_output");
        std::fs::create_dir_all(&dir).unwrap_or_else(|e| {
            panic!("Failed to create test output directory {:?}: {}", dir, e)
        });
        dir
    })
    .clone()
}

/// Returns the path to a test output file, e.g. an annotated image dumped by a test.
pub fn test_output_path(name: &str) -> PathBuf {
    ensure_test_output_dir().join(name)
}
