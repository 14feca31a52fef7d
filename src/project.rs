use std::path::{Component, Path, PathBuf};

/// The single input of a generation run: the name of the project to create.
///
/// The name doubles as the target directory name and the `package.json` name, so it
/// must be exactly one normal path segment. No npm naming rules are enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: String,
}
impl ProjectRequest {
    /// Returns `None` when `name` is empty or is not a single normal path segment
    /// (e.g. `.`, `..`, `a/b`, or an absolute path).
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }

        let mut components = Path::new(name).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(segment)), None) if segment == name => Some(Self {
                name: name.to_string(),
            }),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `cwd/name`
    pub fn target_directory(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.name)
    }
}
