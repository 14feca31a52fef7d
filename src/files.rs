use crate::project::ProjectRequest;
use indexmap::IndexMap;
use serde::Serialize;
use tera::{Context, Tera};

/// Produces the contents of a generated file for a given request.
pub type ContentFn = fn(&ProjectRequest) -> Result<String, ContentError>;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ContentError {
    #[error("unable to render '{template}'")]
    #[diagnostic(code(new_node_app::files::render))]
    Render {
        template: &'static str,
        #[source]
        source: tera::Error,
    },

    #[error("unable to serialize package manifest")]
    #[diagnostic(code(new_node_app::files::manifest))]
    Manifest(#[from] serde_json::Error),
}

/// Describes one file the generator may write into the target directory.
#[derive(Clone, Copy)]
pub struct GeneratedFileSpec {
    /// Path relative to the target directory, `/` separated.
    pub relative_path: &'static str,
    pub content: ContentFn,
    /// When set, an existing file at `relative_path` is left untouched.
    pub create_if_missing: bool,
}
impl std::fmt::Debug for GeneratedFileSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedFileSpec")
            .field("relative_path", &self.relative_path)
            .field("create_if_missing", &self.create_if_missing)
            .finish_non_exhaustive()
    }
}
impl GeneratedFileSpec {
    pub fn render(&self, request: &ProjectRequest) -> Result<String, ContentError> {
        (self.content)(request)
    }
}

/// The files backfilled after the template copy, in evaluation order.
pub const GENERATED_FILES: [GeneratedFileSpec; 6] = [
    GeneratedFileSpec {
        relative_path: "package.json",
        content: package_json,
        create_if_missing: true,
    },
    GeneratedFileSpec {
        relative_path: ".gitignore",
        content: gitignore,
        create_if_missing: true,
    },
    GeneratedFileSpec {
        relative_path: "README.md",
        content: readme,
        create_if_missing: true,
    },
    GeneratedFileSpec {
        relative_path: "src/app.js",
        content: app_source,
        create_if_missing: false,
    },
    GeneratedFileSpec {
        relative_path: "src/index.js",
        content: index_source,
        create_if_missing: false,
    },
    GeneratedFileSpec {
        relative_path: ".env",
        content: dotenv,
        create_if_missing: true,
    },
];

/// Pinned dependency ranges written into a generated `package.json`.
pub const DEPENDENCIES: [(&str, &str); 4] = [
    ("express", "^4.17.1"),
    ("dotenv", "^10.0.0"),
    ("mongoose", "^6.0.12"),
    ("body-parser", "^1.19.0"),
];

#[derive(Debug, Serialize)]
pub struct Scripts {
    pub start: String,
}

#[derive(Debug, Serialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub main: String,
    pub scripts: Scripts,
    pub dependencies: IndexMap<String, String>,
}
impl PackageManifest {
    pub fn for_project(request: &ProjectRequest) -> Self {
        Self {
            name: request.name().to_string(),
            version: "1.0.0".to_string(),
            main: "src/index.js".to_string(),
            scripts: Scripts {
                start: "node src/index.js".to_string(),
            },
            dependencies: DEPENDENCIES
                .iter()
                .map(|(name, range)| (name.to_string(), range.to_string()))
                .collect(),
        }
    }
}

fn package_json(request: &ProjectRequest) -> Result<String, ContentError> {
    let mut json = serde_json::to_string_pretty(&PackageManifest::for_project(request))?;
    json.push('\n');

    Ok(json)
}

const GITIGNORE: &str = "
node_modules
.DS_Store
.env
";

fn gitignore(_: &ProjectRequest) -> Result<String, ContentError> {
    Ok(GITIGNORE.to_string())
}

const README_TEMPLATE: &str = "# {{ name }}\n\nThis is the {{ name }} project.";

fn readme(request: &ProjectRequest) -> Result<String, ContentError> {
    let mut ctx = Context::new();
    ctx.insert("name", request.name());

    Tera::one_off(README_TEMPLATE, &ctx, false).map_err(|error| ContentError::Render {
        template: "README.md",
        source: error,
    })
}

const APP_SOURCE: &str = r#"
require('dotenv').config();
const express = require('express');
const bodyParser = require('body-parser');
const authMiddleware = require('./middleware/authMiddleware');
const userRoutes = require('./routes/userRoutes');
const { connectDB } = require('./config');

const app = express();
const PORT = process.env.PORT || 3000;

// Middleware
app.use(bodyParser.json());
app.use(authMiddleware); // Apply authentication middleware

// Routes
app.use('/users', userRoutes);

// Connect to MongoDB
connectDB().catch(error => {
    console.error('Error connecting to MongoDB:', error);
    process.exit(1); // Exit the process with a non-zero exit code
});

// Error handling middleware
app.use((err, req, res, next) => {
    console.error(err.stack);
    res.status(500).send('Internal Server Error');
});

// Start the server
app.listen(PORT, () => {
    console.log(`Server is running on port ${PORT}`);
});
"#;

fn app_source(_: &ProjectRequest) -> Result<String, ContentError> {
    Ok(APP_SOURCE.to_string())
}

const INDEX_SOURCE: &str = r#"
require('dotenv').config();
const app = require('./app');

const PORT = process.env.PORT || 3000;

app.listen(PORT, () => {
    console.log(`Server is running on port ${PORT}`);
});
"#;

fn index_source(_: &ProjectRequest) -> Result<String, ContentError> {
    Ok(INDEX_SOURCE.to_string())
}

// Placeholder is written literally, never derived from the environment.
const DOTENV: &str = "MONGO_URI=your_mongo_uri_here\nPORT=3000\n";

fn dotenv(_: &ProjectRequest) -> Result<String, ContentError> {
    Ok(DOTENV.to_string())
}
