//! CLI argument definitions for the formdef tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formdef",
    version,
    about = "Form-definition field tool - inspect and edit dynamic form documents",
    long_about = "Apply field edits to form-definition JSON documents.\n\n\
                  Edits run through the same engine the interactive editor uses:\n\
                  renames stay collision-free and every settings-context mirror\n\
                  (including validation expressions) stays in sync."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply one property edit to a field and print the updated document.
    Edit(EditArgs),

    /// List the fields of a document in document order.
    Fields(FieldsArgs),

    /// Normalize raw names the way the editor would.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct EditArgs {
    /// Path to the form-definition JSON document.
    #[arg(value_name = "FORM")]
    pub form: PathBuf,

    /// Name of the field to edit.
    #[arg(long = "field", value_name = "NAME")]
    pub field: String,

    /// Property to change (name, label, dataType, options, or any other key).
    #[arg(long = "property", value_name = "PROP")]
    pub property: String,

    /// New value as JSON; bare text is treated as a string.
    #[arg(long = "value", value_name = "VALUE")]
    pub value: String,

    /// Write the updated document here instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Locale being edited (default: the document's default language).
    #[arg(long = "editing-language", value_name = "LOCALE")]
    pub editing_language: Option<String>,

    /// Reserve a name a rename may never produce (repeatable).
    #[arg(long = "reserve", value_name = "NAME")]
    pub reserve: Vec<String>,

    /// Rename the field from its label when editing the default language.
    #[arg(long = "name-from-label")]
    pub name_from_label: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Path to the form-definition JSON document.
    #[arg(value_name = "FORM")]
    pub form: PathBuf,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Raw names to normalize.
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum LogFormatArg {
    #[default]
    Pretty,
    Compact,
    Json,
}
