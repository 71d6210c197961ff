use std::path::PathBuf;

use clap::{arg, command, value_parser, ArgAction, ValueEnum};

use rdcalc::dump::TokenDumpFormat;

#[derive(Debug, Clone)]
pub struct RdcalcConfig {
    pub exprs: Vec<String>,
    pub paths: Vec<PathBuf>,
    pub output: OutputKind,
    pub trailing_input: TrailingInput,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Lexer,
    Eval,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Eval
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Plain,
    Debug,
}

impl From<OutputFormat> for TokenDumpFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Debug => Self::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalOutputFormat {
    Plain,
    Debug,
}

impl From<OutputFormat> for EvalOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => Self::Plain,
            OutputFormat::Debug => Self::Debug,
        }
    }
}

impl Default for EvalOutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Lexer(TokenDumpFormat),
    Eval(EvalOutputFormat),
}

/// What to do with input left over after a complete expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrailingInput {
    Reject,
    Warn,
}

pub fn parse_args_or_exit() -> RdcalcConfig {
    let matches = command!()
        .allow_negative_numbers(true)
        .arg(arg!(exprs: [EXPR] ... "expressions to evaluate"))
        .arg(
            arg!(-f --file <FILE> "evaluate the contents of a file")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append),
        )
        .arg(
            arg!(-s --stage <STAGE> "the stage to stop after")
                .value_parser(value_parser!(Stage))
                .required(false),
        )
        .arg(
            arg!(--format <FORMAT> "the output format")
                .value_parser(value_parser!(OutputFormat)),
        )
        .arg(arg!(--"allow-trailing" "ignore input that follows a complete expression"))
        .get_matches();

    let exprs = matches
        .get_many::<String>("exprs")
        .map(|exprs| exprs.cloned().collect())
        .unwrap_or_default();

    let paths = matches
        .get_many::<PathBuf>("file")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();

    let stage = matches
        .get_one::<Stage>("stage")
        .copied()
        .unwrap_or_default();
    let format = matches.get_one::<OutputFormat>("format").copied();

    let output = match stage {
        Stage::Lexer => OutputKind::Lexer(format.map(Into::into).unwrap_or_default()),
        Stage::Eval => OutputKind::Eval(format.map(Into::into).unwrap_or_default()),
    };

    let trailing_input = if matches.get_flag("allow-trailing") {
        TrailingInput::Warn
    } else {
        TrailingInput::Reject
    };

    RdcalcConfig {
        exprs,
        paths,
        output,
        trailing_input,
    }
}
