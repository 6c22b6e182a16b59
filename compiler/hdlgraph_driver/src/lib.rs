//! Contains the main `run()` function of the analyzer.

use std::{path::PathBuf, process::ExitCode};

use hdlgraph_diagnostic::{Message, Report, Severity};
use hdlgraph_handler::Storage;
use hdlgraph_semantic::{diagnostic::Diagnostic, inspect::Inspection};
use hdlgraph_source::{JsonFile, SyntaxSource, Verible, VERIBLE_SYNTAX};
use hdlgraph_tree::Forest;

/// The output format of the module graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum,
)]
pub enum Format {
    /// One block per module listing its references and dependencies.
    Text,

    /// A JSON array of module summaries.
    Json,
}

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "hdlgraph",
    about = "Extracts the module hierarchy of a SystemVerilog project",
    author = "Simmypeet"
)]
pub struct Arguments {
    /// The source files to analyse, parsed together in one batch.
    #[clap(required_unless_present = "cst", conflicts_with = "cst")]
    pub files: Vec<PathBuf>,

    /// The syntax tool executable used to parse the source files.
    #[clap(long, default_value = VERIBLE_SYNTAX)]
    pub tool: PathBuf,

    /// Reads a syntax tree previously exported as JSON instead of running
    /// the syntax tool.
    #[clap(long, value_name = "PATH")]
    pub cst: Option<PathBuf>,

    /// The output format of the module graph.
    #[clap(short, long, value_enum, default_value = "text")]
    pub format: Format,

    /// Exits with a failure status if any diagnostic was reported.
    #[clap(long)]
    pub deny_warnings: bool,
}

/// The errors that stop the analysis before a module graph is produced.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum Error {
    /// {0}
    Source(#[from] hdlgraph_source::Error),

    /// failed to render the module graph: {0}
    Render(#[from] serde_json::Error),
}

/// The result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The rendered module graph.
    pub output: String,

    /// The rendered diagnostics, in the order they were reported.
    pub diagnostics: Vec<String>,
}

/// Acquires the syntax trees named by the arguments.
///
/// # Errors
///
/// See [`hdlgraph_source::Error`].
pub fn load(arguments: &Arguments) -> Result<Forest, hdlgraph_source::Error> {
    match &arguments.cst {
        Some(path) => JsonFile::new(path).forest(&arguments.files),
        None => Verible::new(arguments.tool.clone()).forest(&arguments.files),
    }
}

/// Renders the module graph in the given format.
///
/// # Errors
///
/// Returns an error if the JSON serialization fails.
pub fn render(
    inspection: &Inspection,
    format: Format,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Text => Ok(inspection.to_string()),
        Format::Json => {
            serde_json::to_string_pretty(inspection).map(|x| x + "\n")
        }
    }
}

/// Runs the whole analysis without printing anything.
///
/// # Errors
///
/// See [`Error`]; no module graph is produced in that case.
pub fn execute(arguments: &Arguments) -> Result<Analysis, Error> {
    let forest = load(arguments)?;
    log::info!("loaded {} file(s)", forest.files().len());

    let storage = Storage::<Box<dyn Diagnostic>>::new();
    let table = hdlgraph_semantic::resolve(&forest, &storage);

    let output = render(&table.inspect(&forest), arguments.format)?;
    table.teardown();

    let diagnostics = storage
        .into_vec()
        .into_iter()
        .map(|x| x.report(&forest).to_string())
        .collect();

    Ok(Analysis { output, diagnostics })
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(arguments: Arguments) -> ExitCode {
    let analysis = match execute(&arguments) {
        Ok(analysis) => analysis,
        Err(error) => {
            let error = error.to_string();
            let msg = Message::new(Severity::Error, &error);

            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    for diagnostic in &analysis.diagnostics {
        eprintln!("{diagnostic}\n");
    }

    print!("{}", analysis.output);

    if arguments.deny_warnings && !analysis.diagnostics.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
