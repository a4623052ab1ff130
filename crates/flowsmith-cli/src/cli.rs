//! Command-line interface for the flowsmith utility
//!
//! Provides a CLI to compile workflow state diagrams, validate the resulting
//! documents, and cross-reference them against implementation directories.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::colorizer::{colorize_diagram, colorize_report, colorize_warning};
use flowsmith::core::logging::init_logging;
use flowsmith::plugins::{
    rename_states, Conversion, CrossReferenceReport, Orchestrator, OutputFormat, StateRenamer,
    ToolParams, ToolRegistry,
};
use flowsmith::{
    CompilerConfig, Direction, ExtractionStrategy, FsmDocument, InputKind, ProcessorNaming,
};

/// Flowsmith - Compile workflow state diagrams into FSM documents
#[derive(Parser)]
#[command(name = "flowsmith")]
#[command(about = "Compile, validate and cross-reference workflow state diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// JSON configuration file; command flags override its fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a state diagram into an FSM JSON document
    Parse {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the JSON document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any line was skipped
        #[arg(long)]
        strict: bool,
    },

    /// Write an FSM JSON document back out as a state diagram
    Serialize {
        /// Input JSON document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a direction line after the header
        #[arg(long, value_enum)]
        direction: Option<DirectionChoice>,
    },

    /// Validate an FSM JSON document against the action schemas
    Validate {
        /// Input JSON document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Check the structure of a state diagram
    Check {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Do not warn about a missing direction line
        #[arg(long)]
        no_direction: bool,
    },

    /// List the processors and criteria workflows reference
    Extract {
        /// Workflow JSON file or directory
        path: PathBuf,

        /// Report layout
        #[arg(long, value_enum, default_value_t = FormatChoice::List)]
        format: FormatChoice,

        /// Extraction strategy (defaults to the configured one)
        #[arg(long, value_enum)]
        strategy: Option<StrategyChoice>,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Keep processor names exactly as declared
        #[arg(long)]
        as_declared: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that every referenced processor and criterion is implemented
    CrossRef {
        /// Workflow JSON file or directory
        #[arg(long)]
        workflows: PathBuf,

        /// Directory of processor implementations
        #[arg(long)]
        processors: PathBuf,

        /// Directory of criterion implementations
        #[arg(long)]
        criteria: PathBuf,

        /// Which validation flavour to run
        #[arg(long, value_enum, default_value_t = CrossRefMode::Processors)]
        mode: CrossRefMode,

        /// Implementation file extension
        #[arg(long)]
        extension: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate chat-completion batch requests from a diagram (JSON lines)
    Batch {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the JSON lines (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model name to request
        #[arg(long)]
        model: Option<String>,
    },

    /// Detect whether input is diagram text or a JSON document
    Detect {
        /// Input file to analyze (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Rename the states of a document after its diagram was revised
    Rename {
        /// FSM JSON document to rename
        #[arg(long)]
        document: PathBuf,

        /// Diagram the document was built from
        #[arg(long)]
        old: PathBuf,

        /// Revised diagram
        #[arg(long)]
        new: PathBuf,

        /// Output file for the renamed document (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Invoke a registered tool by name
    Tool {
        /// Tool name, e.g. check_diagram
        name: Option<String>,

        /// Tool parameters as a JSON object
        #[arg(long)]
        params: Option<String>,

        /// List registered tools
        #[arg(long)]
        list: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum DirectionChoice {
    Tb,
    Lr,
    Rl,
    Bt,
}

impl From<DirectionChoice> for Direction {
    fn from(value: DirectionChoice) -> Self {
        match value {
            DirectionChoice::Tb => Direction::TopDown,
            DirectionChoice::Lr => Direction::LeftRight,
            DirectionChoice::Rl => Direction::RightLeft,
            DirectionChoice::Bt => Direction::BottomUp,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    List,
    Summary,
    Detailed,
}

impl From<FormatChoice> for OutputFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::List => OutputFormat::List,
            FormatChoice::Summary => OutputFormat::Summary,
            FormatChoice::Detailed => OutputFormat::Detailed,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StrategyChoice {
    Recursive,
    Structured,
}

impl From<StrategyChoice> for ExtractionStrategy {
    fn from(value: StrategyChoice) -> Self {
        match value {
            StrategyChoice::Recursive => ExtractionStrategy::Recursive,
            StrategyChoice::Structured => ExtractionStrategy::Structured,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum CrossRefMode {
    /// Recursive extraction, detailed report, empty workflow directory allowed
    #[default]
    Processors,
    /// Structured extraction, brief report, empty workflow directory is an error
    Implementation,
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct FlowsmithApp {
    orchestrator: Orchestrator,
    color: ColorChoice,
}

impl FlowsmithApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    /// Create a new application instance with a compiler config
    pub fn with_config(config: CompilerConfig) -> Self {
        Self {
            orchestrator: Orchestrator::with_default_detectors(config),
            color: ColorChoice::Auto,
        }
    }

    fn config(&self) -> &CompilerConfig {
        self.orchestrator.config()
    }

    /// Rebuild the orchestrator around an adjusted config
    fn reconfigure(&mut self, config: CompilerConfig) {
        self.orchestrator = Orchestrator::with_default_detectors(config);
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flags
        let log_level_str = std::env::var("FLOWSMITH_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());
        let log_format_str = std::env::var("FLOWSMITH_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Flowsmith v{}", env!("CARGO_PKG_VERSION"));
        }

        if let Some(path) = &cli.config {
            let config = CompilerConfig::from_file(path)
                .map_err(|e| anyhow!("Failed to load config '{}': {}", path.display(), e))?;
            debug!(path = %path.display(), "Loaded compiler config");
            self.reconfigure(config);
        }
        self.color = cli.color;
        let verbose = cli.verbose;

        match cli.command {
            Commands::Parse {
                input,
                output,
                strict,
            } => self.parse_command(input, output, strict, verbose),
            Commands::Serialize {
                input,
                output,
                direction,
            } => self.serialize_command(input, output, direction),
            Commands::Validate { input } => self.validate_command(input, verbose),
            Commands::Check {
                input,
                no_direction,
            } => self.check_command(input, no_direction),
            Commands::Extract {
                path,
                format,
                strategy,
                recursive,
                as_declared,
                json,
            } => {
                let mut config = self.config().clone();
                if let Some(strategy) = strategy {
                    config.extraction.strategy = strategy.into();
                }
                if recursive {
                    config.extraction.recursive = true;
                }
                if as_declared {
                    config.extraction.processor_naming = ProcessorNaming::AsDeclared;
                }
                self.reconfigure(config);
                self.extract_command(&path, format, json)
            }
            Commands::CrossRef {
                workflows,
                processors,
                criteria,
                mode,
                extension,
                json,
            } => {
                if let Some(extension) = extension {
                    let mut config = self.config().clone();
                    config.scan.extension = extension;
                    self.reconfigure(config);
                }
                self.cross_ref_command(&workflows, &processors, &criteria, mode, json)
            }
            Commands::Batch {
                input,
                output,
                model,
            } => {
                if let Some(model) = model {
                    let mut config = self.config().clone();
                    config.batch.model = model;
                    self.reconfigure(config);
                }
                self.batch_command(input, output, verbose)
            }
            Commands::Detect { input } => self.detect_command(input, verbose),
            Commands::Rename {
                document,
                old,
                new,
                output,
            } => self.rename_command(&document, &old, &new, output, verbose),
            Commands::Tool { name, params, list } => self.tool_command(name, params, list),
        }
    }

    /// Handle the parse command
    fn parse_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        strict: bool,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let outcome = self.orchestrator.parse(&content)?;
        for diagnostic in &outcome.diagnostics {
            self.warn(&format!("Skipped {}", diagnostic));
        }
        let document = if strict {
            outcome.into_strict()?
        } else {
            outcome.into_document()
        };
        if verbose {
            eprintln!(
                "Compiled {} state(s) and {} transition(s)",
                document.state_count(),
                document.transition_count()
            );
        }

        self.write_output(output, &document.to_json_pretty()?)
    }

    /// Handle the serialize command
    fn serialize_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        direction: Option<DirectionChoice>,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        let document = FsmDocument::from_json_str(&content)?;

        let mut serializer = flowsmith::plugins::DiagramSerializer::new();
        if let Some(direction) = direction {
            serializer = serializer.with_direction(direction.into());
        }
        let text = serializer.to_diagram(&document);

        let text = if self.should_colorize(&output) {
            colorize_diagram(&text)
        } else {
            text
        };
        self.write_output(output, &text)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let report = self.orchestrator.validate_json(&content)?;
        if report.is_valid() {
            self.print_report("✓ Valid workflow document\n");
            return Ok(());
        }

        let mut text = format!("✗ Invalid workflow document ({} violation(s))\n", report.len());
        for violation in &report.violations {
            text.push_str(&format!("  • {}\n", violation));
        }
        self.print_report(&text);
        Err(anyhow!("Schema validation failed"))
    }

    /// Handle the check command
    fn check_command(&self, input: Option<PathBuf>, no_direction: bool) -> Result<()> {
        let content = self.read_input(input)?;
        let issues = flowsmith::plugins::DiagramChecker::new()
            .with_require_direction(!no_direction)
            .check(&content);

        let errors = issues.iter().filter(|issue| issue.is_error()).count();
        for issue in issues.iter().filter(|issue| !issue.is_error()) {
            self.warn(&format!("Warning: {}", issue));
        }
        if errors == 0 {
            self.print_report("✓ Diagram is valid\n");
            return Ok(());
        }

        let mut text = String::new();
        for issue in issues.iter().filter(|issue| issue.is_error()) {
            text.push_str(&format!("✗ {}\n", issue));
        }
        self.print_report(&text);
        Err(anyhow!("Diagram check found {} error(s)", errors))
    }

    /// Handle the extract command
    fn extract_command(&self, path: &Path, format: FormatChoice, json: bool) -> Result<()> {
        let result = self.orchestrator.extract(path)?;
        for skipped in &result.skipped {
            self.warn(&format!("Skipped malformed file {}", skipped.display()));
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let text = OutputFormat::from(format).render(&result, &self.config().scan.extension);
            self.print_report(&text);
        }
        Ok(())
    }

    /// Handle the cross-ref command
    fn cross_ref_command(
        &self,
        workflows: &Path,
        processors: &Path,
        criteria: &Path,
        mode: CrossRefMode,
        json: bool,
    ) -> Result<()> {
        let report: CrossReferenceReport = match mode {
            CrossRefMode::Processors => {
                self.orchestrator
                    .validate_workflow_processors(workflows, processors, criteria)?
            }
            CrossRefMode::Implementation => {
                self.orchestrator
                    .validate_workflow_implementation(workflows, processors, criteria)?
            }
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            let text = match mode {
                CrossRefMode::Processors => report.render_detailed(),
                CrossRefMode::Implementation => report.render_brief(),
            };
            self.print_report(&text);
        }

        if report.passed {
            Ok(())
        } else {
            Err(anyhow!(
                "{} required component(s) are not implemented",
                report.total_missing()
            ))
        }
    }

    /// Handle the batch command
    fn batch_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        let jsonl = self.orchestrator.generate_batch(&content)?;
        if verbose {
            eprintln!("Generated {} request(s)", jsonl.lines().count());
        }
        self.write_output(output, &jsonl)
    }

    /// Handle the detect command
    fn detect_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match self.orchestrator.detect_input_kind(&content) {
            Ok(kind) => {
                println!("{}", kind);
                Ok(())
            }
            Err(e) => {
                eprintln!("Could not detect input kind: {}", e);
                Err(e)
            }
        }
    }

    /// Handle the rename command
    fn rename_command(
        &self,
        document: &Path,
        old: &Path,
        new: &Path,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let document = FsmDocument::from_json_str(&self.read_input(Some(document.to_path_buf()))?)?;
        let old = self.read_input(Some(old.to_path_buf()))?;
        let new = self.read_input(Some(new.to_path_buf()))?;

        let mapping = StateRenamer::new().positional_mapping(&old, &new);
        if verbose {
            for (from, to) in mapping.iter().filter(|(from, to)| from != to) {
                eprintln!("{} -> {}", from, to);
            }
        }
        let renamed = rename_states(&document, &mapping);
        self.write_output(output, &renamed.to_json_pretty()?)
    }

    /// Handle the tool command
    fn tool_command(&self, name: Option<String>, params: Option<String>, list: bool) -> Result<()> {
        let registry = ToolRegistry::global();
        if list {
            for tool in registry.names() {
                println!("{:<34} {}", tool.as_str(), tool.required_params().join(", "));
            }
            return Ok(());
        }

        let name = name.ok_or_else(|| anyhow!("A tool name is required (or use --list)"))?;
        let params: ToolParams = match params {
            Some(text) => match serde_json::from_str(&text)? {
                Value::Object(map) => map,
                _ => return Err(anyhow!("Tool parameters must be a JSON object")),
            },
            None => ToolParams::new(),
        };

        let output = registry.invoke(&name, self.config(), &params)?;
        self.write_output(None, &output)
    }

    /// Input kind of some text, exposed for callers that script the app
    pub fn detect(&self, content: &str) -> Result<InputKind> {
        self.orchestrator.detect_input_kind(content)
    }

    /// Compile or render content depending on its kind
    pub fn convert(&self, content: &str) -> Result<String> {
        match self.orchestrator.process(content)? {
            Conversion::Document(outcome) => Ok(outcome.document.to_json_pretty()?),
            Conversion::Diagram(text) => Ok(text),
        }
    }

    fn print_report(&self, text: &str) {
        if self.should_colorize(&None) {
            print!("{}", colorize_report(text));
        } else {
            print!("{}", text);
        }
        let _ = io::stdout().flush();
    }

    fn warn(&self, message: &str) {
        let colorize = match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var("NO_COLOR").is_err() && crossterm::tty::IsTty::is_tty(&io::stderr())
            }
        };
        if colorize {
            eprintln!("{}", colorize_warning(message));
        } else {
            eprintln!("{}", message);
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&io::stdout()),
                    Some(p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for FlowsmithApp {
    fn default() -> Self {
        Self::new()
    }
}
