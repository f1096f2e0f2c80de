// This file is part of units, a units-of-measurement conversion library.
// Copyright (C) 2026 Mara Lindqvist
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command line argument parser
//!
//! Hand-rolled rather than declarative: the flag set is small and fixed,
//! and several flags alias or override each other (`-t` implies three other
//! settings at once) in ways a derive-based parser fights rather than helps.

use thiserror::Error;

/// What the driver should do once startup finishes loading unit files.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// No operands: read `have`/`want` pairs from standard input.
    #[default]
    Interactive,
    /// One operand: print its definition.
    Definition { have: String },
    /// Two operands: convert `have` into `want`.
    Convert { have: String, want: String },
    /// `-c`/`--check`: run the database integrity check and exit.
    Check { verbose: bool },
}

/// Parsed command line: the [`Mode`] plus every setting that feeds
/// [`units_core::Config`] or file discovery.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    pub mode: Mode,
    pub quiet: bool,
    pub minus: bool,
    pub minus_set: bool,
    pub oldstar: bool,
    pub oldstar_set: bool,
    pub strict: bool,
    pub one_line: bool,
    pub compact: bool,
    pub verbose: bool,
    pub format: Option<String>,
    pub unit_files: Vec<String>,
}

/// Outcome of [`parse`] before any unit file has been loaded.
#[derive(Clone, Debug, PartialEq)]
pub enum Parse {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ArgsError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("option '{0}' requires an argument")]
    MissingArgument(String),
    #[error("too many arguments (maybe you need quotes)")]
    TooManyArguments,
    #[error("arguments are not allowed with --check")]
    ArgumentsWithCheck,
}

/// Parses `argv` (excluding the program name).
pub fn parse(argv: &[String]) -> Result<Parse, ArgsError> {
    let mut options = Options::default();
    let mut check = false;
    let mut check_verbose = false;
    let mut operands = Vec::new();

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "-?" => return Ok(Parse::Help),
            "-V" | "--version" => return Ok(Parse::Version),
            "-q" | "--quiet" | "--silent" => options.quiet = true,
            "-v" | "--verbose" => options.verbose = true,
            "--compact" => options.compact = true,
            "-e" | "--exponential" => options.format = Some("%.6e".to_string()),
            "-s" | "--strict" => options.strict = true,
            "-1" | "--one-line" => options.one_line = true,
            "-m" | "--minus" => {
                options.minus = true;
                options.minus_set = true;
            }
            "-p" | "--product" => {
                options.minus = false;
                options.minus_set = true;
            }
            "--oldstar" => {
                options.oldstar = true;
                options.oldstar_set = true;
            }
            "--newstar" => {
                options.oldstar = false;
                options.oldstar_set = true;
            }
            "-c" | "--check" => check = true,
            "--check-verbose" | "--verbose-check" => {
                check = true;
                check_verbose = true;
            }
            "-t" | "--terse" => {
                options.one_line = true;
                options.quiet = true;
                options.strict = true;
                options.compact = true;
            }
            "-o" | "--output-format" => {
                let value = iter.next().ok_or_else(|| ArgsError::MissingArgument(arg.clone()))?;
                options.format = Some(value.clone());
            }
            "-f" | "--file" => {
                let value = iter.next().ok_or_else(|| ArgsError::MissingArgument(arg.clone()))?;
                options.unit_files.push(value.clone());
            }
            _ if arg.starts_with("--output-format=") => {
                options.format = Some(arg["--output-format=".len()..].to_string());
            }
            _ if arg.starts_with("--file=") => {
                options.unit_files.push(arg["--file=".len()..].to_string());
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(ArgsError::UnknownOption(arg.clone()));
            }
            _ => operands.push(arg.clone()),
        }
    }

    if check {
        if !operands.is_empty() {
            return Err(ArgsError::ArgumentsWithCheck);
        }
        options.mode = Mode::Check { verbose: check_verbose };
        return Ok(Parse::Run(options));
    }

    options.mode = match operands.len() {
        0 => Mode::Interactive,
        1 => {
            options.quiet = true;
            Mode::Definition { have: operands.remove(0) }
        }
        2 => {
            options.quiet = true;
            Mode::Convert {
                have: operands.remove(0),
                want: operands.remove(0),
            }
        }
        _ => return Err(ArgsError::TooManyArguments),
    };
    Ok(Parse::Run(options))
}
