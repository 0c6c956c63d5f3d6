mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use pddlasp_core::{Language, Mode};

use crate::config::{ColorPolicy, Config, LogPriority};

/// Output format for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ParsingMode {
    Strict,
    Compatibility,
}

impl From<ParsingMode> for Mode {
    fn from(mode: ParsingMode) -> Self {
        match mode {
            ParsingMode::Strict => Mode::Strict,
            ParsingMode::Compatibility => Mode::Compatibility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputLanguage {
    Auto,
    Pddl,
    Sas,
}

impl From<InputLanguage> for Language {
    fn from(language: InputLanguage) -> Self {
        match language {
            InputLanguage::Auto => Language::Unknown,
            InputLanguage::Pddl => Language::Pddl,
            InputLanguage::Sas => Language::Sas,
        }
    }
}

/// PDDL to ASP translator.
#[derive(Parser)]
#[command(
    name = "pddlasp",
    version,
    about = "Translate PDDL planning descriptions to answer set programs",
    arg_required_else_help = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOptions {
    /// Treat warnings as errors
    #[arg(long, global = true)]
    warnings_as_errors: bool,

    /// Whether to colorize log output
    #[arg(long, global = true, value_enum)]
    color: Option<ColorPolicy>,

    /// Lowest priority of log messages to show
    #[arg(short = 'p', long, global = true, value_enum)]
    log_priority: Option<LogPriority>,

    /// Parsing mode
    #[arg(long, global = true, value_enum)]
    parsing_mode: Option<ParsingMode>,

    /// Input language
    #[arg(short = 'l', long, global = true, value_enum)]
    language: Option<InputLanguage>,

    /// Configuration file (default: ./pddlasp.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for diagnostics (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,
}

#[derive(Args)]
struct Input {
    /// Input files; standard input is read when none are given
    files: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate PDDL to ASP facts
    Translate(Input),

    /// Normalize PDDL to a simplified form
    Normalize(Input),

    /// Check the syntax of PDDL input
    CheckSyntax(Input),

    /// Print PDDL input in a uniform layout
    Beautify(Input),

    /// Display version information
    Version,
}

impl GlobalOptions {
    /// Command-line flags take precedence over the configuration file.
    fn apply(&self, config: &mut Config) {
        if self.warnings_as_errors {
            config.options.warnings_as_errors = true;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(priority) = self.log_priority {
            config.log_priority = priority;
        }
        if let Some(mode) = self.parsing_mode {
            config.options.parsing_mode = mode.into();
        }
        if let Some(language) = self.language {
            config.options.language = language.into();
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = match config::load_config(cli.global.config.as_deref()) {
        Ok(config) => config,
        Err(msg) => {
            report_error(&msg, cli.global.output);
            process::exit(1);
        }
    };
    cli.global.apply(&mut config);
    init_logger(&config);

    let output = cli.global.output;
    match cli.command {
        Commands::Translate(input) => commands::cmd_translate(&input.files, &config.options, output),
        Commands::Normalize(input) => commands::cmd_normalize(&input.files, &config.options, output),
        Commands::CheckSyntax(input) => {
            commands::cmd_check_syntax(&input.files, &config.options, output)
        }
        Commands::Beautify(input) => commands::cmd_beautify(&input.files, &config.options, output),
        Commands::Version => println!("pddlasp version {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Log lines read `<priority>: <message>` on stderr.
fn init_logger(config: &Config) {
    env_logger::Builder::new()
        .filter_level(config.log_priority.level_filter())
        .write_style(config.color.write_style())
        .format(|buf, record| {
            let mut style = buf.style();
            let priority = match record.level() {
                log::Level::Error => {
                    style.set_color(env_logger::fmt::Color::Red).set_bold(true);
                    "error"
                }
                log::Level::Warn => {
                    style.set_color(env_logger::fmt::Color::Magenta).set_bold(true);
                    "warning"
                }
                log::Level::Info => {
                    style.set_bold(true);
                    "info"
                }
                log::Level::Debug | log::Level::Trace => {
                    style.set_color(env_logger::fmt::Color::Green);
                    "debug"
                }
            };
            writeln!(buf, "{}: {}", style.value(priority), record.args())
        })
        .init();
}

/// Help text on stderr, for inputs the tool cannot make sense of.
pub(crate) fn print_usage() {
    eprintln!("{}", Cli::command().render_help());
}

/// Prints a message that is not a pipeline diagnostic.
pub(crate) fn report_error(msg: &str, output: OutputFormat) {
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "kind": "cli", "message": msg }));
        }
    }
}
