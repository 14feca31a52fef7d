use crate::{
    errors::{FileOperation, IoError},
    files::{ContentError, GeneratedFileSpec},
    project::ProjectRequest,
};
use colored::Colorize;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error, Diagnostic)]
pub enum BackfillError {
    #[error("I/O error within backfill")]
    #[diagnostic(code(new_node_app::template::io))]
    Io(#[from] IoError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Content(#[from] ContentError),
}

/// What happened to a single [`GeneratedFileSpec`] during backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

/// Recursively copies every directory and file under `source_directory` into
/// `destination`, preserving relative structure. Returns the number of files copied.
///
/// `destination` is created from the walk's root entry, so a missing or unreadable
/// source fails before anything is written. A failure deeper in the tree leaves the
/// entries copied so far in place.
pub fn copy_tree(source_directory: &Path, destination: &Path) -> Result<usize, IoError> {
    let mut copied = 0;

    for entry in WalkDir::new(source_directory).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error
                    .path()
                    .unwrap_or(source_directory)
                    .to_path_buf();

                Err(IoError::new(FileOperation::Read, path, error.into()))?
            }
        };

        let full_path = entry.path();
        // walkdir only yields paths under its root
        let relative = full_path.strip_prefix(source_directory).unwrap_or(full_path);
        let final_path = destination.join(relative);

        if entry.file_type().is_dir() {
            create_directory(&final_path)?;
        } else {
            if let Some(parent) = final_path.parent() {
                create_directory(parent)?;
            }

            if entry.file_type().is_symlink() {
                copy_symlink(full_path, &final_path)?;
            } else {
                std::fs::copy(full_path, &final_path)
                    .map_err(|error| IoError::new(FileOperation::Copy, full_path.into(), error))?;
            }

            log::debug!("copied {} -> {}", full_path.display(), final_path.display());

            println!("{} {}", "create".green(), final_path.display());

            copied += 1;
        }
    }

    Ok(copied)
}

/// Evaluates each spec against `target` in order. Specs flagged `create_if_missing`
/// are skipped when their path already exists, every other spec is (over)written.
pub fn backfill(
    target: &Path,
    request: &ProjectRequest,
    specs: &[GeneratedFileSpec],
) -> Result<Vec<BackfillOutcome>, BackfillError> {
    let mut outcomes = Vec::with_capacity(specs.len());

    for spec in specs {
        let path = target.join(spec.relative_path);

        if spec.create_if_missing && exists(&path)? {
            log::debug!("{} already present, leaving it untouched", path.display());

            println!("{} {}", "skip".yellow(), path.display());

            outcomes.push(BackfillOutcome::Skipped(path));
            continue;
        }

        let contents = spec.render(request)?;

        if let Some(parent) = path.parent() {
            create_directory(parent)?;
        }

        write_file(&path, contents)?;

        outcomes.push(BackfillOutcome::Created(path));
    }

    Ok(outcomes)
}

/// Recreates the link itself rather than copying what it points to.
#[cfg(unix)]
fn copy_symlink(link: &Path, destination: &Path) -> Result<(), IoError> {
    let pointee = std::fs::read_link(link)
        .map_err(|error| IoError::new(FileOperation::Read, link.into(), error))?;

    std::os::unix::fs::symlink(&pointee, destination)
        .map_err(|error| IoError::new(FileOperation::Copy, link.into(), error))
}

// TODO: recreate links on Windows, which needs symlink_file vs symlink_dir.
#[cfg(not(unix))]
fn copy_symlink(link: &Path, destination: &Path) -> Result<(), IoError> {
    std::fs::copy(link, destination)
        .map(|_| ())
        .map_err(|error| IoError::new(FileOperation::Copy, link.into(), error))
}

fn exists(path: &Path) -> Result<bool, IoError> {
    path.try_exists()
        .map_err(|error| IoError::new(FileOperation::Read, path.into(), error))
}

fn create_directory(path: &Path) -> Result<(), IoError> {
    std::fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))
}

/// Writes `contents` to `path` and reports it on stdout.
fn write_file(path: &Path, contents: String) -> Result<(), IoError> {
    std::fs::write(path, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    let msg = format!("{} {}", "create".green(), path.display());

    println!("{}", &msg);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::GENERATED_FILES;
    use std::fs;

    fn demo() -> ProjectRequest {
        ProjectRequest::new("demo").unwrap()
    }

    #[test]
    fn copy_tree_preserves_structure() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        let target = destination.path().join("demo");

        fs::create_dir_all(source.path().join("src/routes")).unwrap();
        fs::create_dir_all(source.path().join("empty")).unwrap();
        fs::write(source.path().join("src/routes/users.js"), "routes").unwrap();
        fs::write(source.path().join("top.txt"), "top").unwrap();

        let copied = copy_tree(source.path(), &target).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(target.join("src/routes/users.js")).unwrap(),
            "routes"
        );
        assert_eq!(fs::read_to_string(target.join("top.txt")).unwrap(), "top");
        assert!(target.join("empty").is_dir());
    }

    #[test]
    fn copy_tree_fails_before_writing_when_source_is_missing() {
        let workspace = tempfile::tempdir().unwrap();
        let target = workspace.path().join("demo");

        let result = copy_tree(&workspace.path().join("missing"), &target);

        assert!(result.is_err());
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        let target = destination.path().join("demo");

        fs::create_dir_all(source.path().join("shared")).unwrap();
        fs::write(source.path().join("shared/util.js"), "util").unwrap();
        std::os::unix::fs::symlink("shared", source.path().join("lib")).unwrap();

        let copied = copy_tree(source.path(), &target).unwrap();

        assert_eq!(copied, 2);
        assert!(fs::symlink_metadata(target.join("lib"))
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(fs::read_link(target.join("lib")).unwrap(), PathBuf::from("shared"));
        assert_eq!(fs::read_to_string(target.join("lib/util.js")).unwrap(), "util");
    }

    #[test]
    fn backfill_reports_a_write_failure_with_its_path() {
        let target = tempfile::tempdir().unwrap();
        fs::create_dir_all(target.path().join("src/app.js")).unwrap();

        let error = backfill(target.path(), &demo(), &GENERATED_FILES).unwrap_err();

        let BackfillError::Io(ref io) = error else {
            panic!("expected an I/O error, got {error:?}");
        };
        assert_eq!(io.path, target.path().join("src/app.js"));
        assert!(matches!(io.operation, FileOperation::Write));
        // files evaluated before the failure stay on disk
        assert!(target.path().join("package.json").is_file());
        assert!(!target.path().join(".env").exists());
    }

    #[test]
    fn backfill_writes_every_file_into_an_empty_target() {
        let target = tempfile::tempdir().unwrap();

        let outcomes = backfill(target.path(), &demo(), &GENERATED_FILES).unwrap();

        assert!(outcomes
            .iter()
            .all(|o| matches!(o, BackfillOutcome::Created(_))));
        for spec in GENERATED_FILES {
            assert!(target.path().join(spec.relative_path).is_file());
        }
    }

    #[test]
    fn backfill_never_overwrites_existing_files() {
        let target = tempfile::tempdir().unwrap();
        fs::write(target.path().join("package.json"), "{\"name\":\"mine\"}").unwrap();
        fs::write(target.path().join(".env"), "PORT=8080\n").unwrap();

        let outcomes = backfill(target.path(), &demo(), &GENERATED_FILES).unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join("package.json")).unwrap(),
            "{\"name\":\"mine\"}"
        );
        assert_eq!(
            fs::read_to_string(target.path().join(".env")).unwrap(),
            "PORT=8080\n"
        );
        assert_eq!(
            outcomes[0],
            BackfillOutcome::Skipped(target.path().join("package.json"))
        );
        assert_eq!(
            outcomes[5],
            BackfillOutcome::Skipped(target.path().join(".env"))
        );
    }

    #[test]
    fn backfill_always_replaces_sources() {
        let target = tempfile::tempdir().unwrap();
        fs::create_dir_all(target.path().join("src")).unwrap();
        fs::write(target.path().join("src/app.js"), "stale").unwrap();

        backfill(target.path(), &demo(), &GENERATED_FILES).unwrap();

        let app = fs::read_to_string(target.path().join("src/app.js")).unwrap();
        assert_ne!(app, "stale");
        assert!(app.contains("app.use('/users', userRoutes);"));
    }

    #[test]
    fn backfill_is_idempotent_for_create_if_missing_files() {
        let target = tempfile::tempdir().unwrap();

        backfill(target.path(), &demo(), &GENERATED_FILES).unwrap();
        fs::write(target.path().join(".env"), "MONGO_URI=edited\n").unwrap();
        let second = backfill(target.path(), &demo(), &GENERATED_FILES).unwrap();

        assert_eq!(
            fs::read_to_string(target.path().join(".env")).unwrap(),
            "MONGO_URI=edited\n"
        );
        let skipped = second
            .iter()
            .filter(|o| matches!(o, BackfillOutcome::Skipped(_)))
            .count();
        assert_eq!(skipped, 4);
    }
}
