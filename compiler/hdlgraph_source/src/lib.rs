//! Acquires the tagged syntax trees from the external parser.
//!
//! This is the only I/O-bound step of the analysis and it happens entirely
//! before it. Any failure here is fatal: a partial parse is of no use to the
//! later passes, so no forest is produced.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use getset::Getters;
use hdlgraph_tree::Forest;
use serde::Deserialize;
use serde_json::Value;

/// The name of the Verible syntax tool executable.
pub const VERIBLE_SYNTAX: &str = "verible-verilog-syntax";

/// The fatal errors that can occur while acquiring the syntax trees.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("failed to execute `{}`: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "`{}` exited with {status}{}",
        .program.display(),
        format_stderr(.stderr)
    )]
    Exit { program: PathBuf, status: std::process::ExitStatus, stderr: String },

    #[error("failed to read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the syntax tree output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();

    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// Produces the tagged-tree document for a batch of source files: a JSON
/// object mapping each file path to that file's parser result.
pub trait SyntaxSource {
    /// Parses the given files in one batch.
    ///
    /// # Errors
    ///
    /// See [`Error`]; every variant aborts the analysis.
    fn parse(&self, files: &[PathBuf]) -> Result<Value, Error>;

    /// Parses the given files and lowers the result into a [`Forest`].
    ///
    /// # Errors
    ///
    /// See [`SyntaxSource::parse`].
    fn forest(&self, files: &[PathBuf]) -> Result<Forest, Error> {
        let output = self.parse(files)?;
        let forest = Forest::from_json(&output);
        dismantle(output);

        Ok(forest)
    }
}

/// Runs the Verible syntax tool as an external batch command.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Verible {
    /// The executable to run.
    #[get = "pub"]
    program: PathBuf,

    /// The arguments passed before the list of files.
    #[get = "pub"]
    arguments: Vec<OsString>,
}

impl Default for Verible {
    fn default() -> Self { Self::new(VERIBLE_SYNTAX) }
}

impl Verible {
    /// Creates a source that runs the given executable with the arguments
    /// that make Verible export its concrete syntax tree as JSON.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self::with_arguments(program, ["--export_json", "--printtree"])
    }

    /// Creates a source that runs the given executable with custom leading
    /// arguments.
    #[must_use]
    pub fn with_arguments(
        program: impl Into<PathBuf>,
        arguments: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        Self {
            program: program.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }
}

impl SyntaxSource for Verible {
    fn parse(&self, files: &[PathBuf]) -> Result<Value, Error> {
        log::info!(
            "running `{}` on {} file(s)",
            self.program.display(),
            files.len()
        );

        let output = Command::new(&self.program)
            .args(&self.arguments)
            .args(files)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        log::debug!(
            "received {} bytes of syntax tree JSON",
            output.stdout.len()
        );

        from_slice(&output.stdout)
    }
}

/// Reads a syntax-tree document that was exported ahead of time.
///
/// The list of files given to [`SyntaxSource::parse`] is ignored; the
/// document already names the files it covers.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct JsonFile {
    /// The path of the exported document.
    #[get = "pub"]
    path: PathBuf,
}

impl JsonFile {
    /// Creates a source reading the document at the given path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl SyntaxSource for JsonFile {
    fn parse(&self, _: &[PathBuf]) -> Result<Value, Error> {
        let content = std::fs::read(&self.path)
            .map_err(|source| Error::Io { path: self.path.clone(), source })?;

        from_slice(&content)
    }
}

/// Drops a parsed document level by level, since dropping a [`Value`]
/// recurses once per nesting level.
fn dismantle(value: Value) {
    let mut stack = vec![value];

    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items),
            Value::Object(fields) => stack.extend(fields.into_values()),
            _ => {}
        }
    }
}

/// Parses a syntax-tree document without a nesting limit.
///
/// Every tree level costs two nesting levels (the node and its `children`
/// array), and a chain of binary operators nests one level per operator.
/// The stack grows on the heap as the document gets deeper.
fn from_slice(bytes: &[u8]) -> Result<Value, Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    deserializer.disable_recursion_limit();

    let value = Value::deserialize(serde_stacker::Deserializer::new(
        &mut deserializer,
    ))?;
    deserializer.end()?;

    Ok(value)
}
