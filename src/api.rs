use crate::{
    errors::IoError,
    files::{ContentError, GENERATED_FILES},
    project::ProjectRequest,
    template::{self, BackfillError, BackfillOutcome},
};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GenerationError {
    #[error("Directory {name} already exists.")]
    #[diagnostic(
        code(new_node_app::already_exists),
        help("Pick another project name or remove the existing path")
    )]
    AlreadyExists { name: String, path: PathBuf },

    #[error("unable to copy template from '{}': {source}", .template.display())]
    #[diagnostic(
        code(new_node_app::copy),
        help("Make sure the template directory exists and is readable")
    )]
    Copy {
        template: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("unable to write generated file: {0}")]
    #[diagnostic(code(new_node_app::write))]
    Write(#[source] IoError),

    #[error("invalid project name: '{name}'")]
    #[diagnostic(
        code(new_node_app::invalid_name),
        help("The project name must be a single directory name, e.g. my-new-app")
    )]
    InvalidName { name: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Render(#[from] ContentError),

    #[error("unexpected I/O error: {0}")]
    #[diagnostic(code(new_node_app::unexpected))]
    Unexpected(#[from] std::io::Error),
}
impl From<BackfillError> for GenerationError {
    fn from(error: BackfillError) -> Self {
        match error {
            BackfillError::Io(io) => Self::Write(io),
            BackfillError::Content(content) => Self::Render(content),
        }
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Generated {
    pub target: PathBuf,
    pub copied: usize,
    pub backfilled: Vec<BackfillOutcome>,
}

/// Creates `cwd/name` from the template tree at `template_directory`, then backfills the
/// well-known project files.
///
/// # Errors
///
/// Returns a [`GenerationError`] if:
///
/// - `name` is not a single path segment.
/// - `cwd/name` already exists. Nothing is written in that case.
/// - The template tree cannot be read or copied. Entries copied before the failure stay
///   on disk.
/// - A generated file cannot be rendered or written.
pub fn generate(
    name: &str,
    template_directory: &Path,
    cwd: &Path,
) -> Result<Generated, GenerationError> {
    let request = ProjectRequest::new(name).ok_or_else(|| GenerationError::InvalidName {
        name: name.to_string(),
    })?;

    let target = request.target_directory(cwd);

    log::debug!("resolved target directory: {}", target.display());

    // not atomic with the copy below
    if target.try_exists()? {
        return Err(GenerationError::AlreadyExists {
            name: request.name().to_string(),
            path: target,
        });
    }

    log::debug!("copying template from: {}", template_directory.display());

    let copied =
        template::copy_tree(template_directory, &target).map_err(|error| GenerationError::Copy {
            template: template_directory.to_path_buf(),
            source: error,
        })?;

    let backfilled = template::backfill(&target, &request, &GENERATED_FILES)?;

    println!(
        "{}",
        format!("Project {} created successfully!", request.name()).green()
    );

    Ok(Generated {
        target,
        copied,
        backfilled,
    })
}
