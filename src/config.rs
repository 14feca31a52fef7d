use std::path::PathBuf;

/// Environment variable that overrides the bundled template directory.
pub const TEMPLATE_DIR_ENV: &str = "NEW_NODE_APP_TEMPLATE_DIR";

/// The `templates/` directory shipped alongside the crate.
pub fn bundled_template_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// Everything a run needs besides the project name, resolved once in `main`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub template_directory: PathBuf,
    pub cwd: PathBuf,
}
impl Settings {
    /// Falls back to [`bundled_template_directory`] when no template is given.
    pub fn new(template_directory: Option<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            template_directory: template_directory.unwrap_or_else(bundled_template_directory),
            cwd,
        }
    }
}
