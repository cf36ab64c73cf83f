use std::path::PathBuf;
use std::{fmt, io};

use thiserror::Error;

use crate::encoding::Charset;

/// A single problem found while reading INI text.
///
/// Every variant carries the 1-based line number it was found on. For interpolation errors this is
/// the line where the offending option was declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("section {section} already exists")]
    DuplicateSection { line: usize, section: String },

    #[error("option {option} in section {section} already exists")]
    DuplicateOption {
        line: usize,
        section: String,
        option: String,
    },

    #[error("option {text} is declared outside of a section header")]
    MissingSectionHeader { line: usize, text: String },

    #[error("Invalid: {text}")]
    InvalidLine { line: usize, text: String },

    #[error("Interpolation syntax error in section '{section}', option '{option}': {message}")]
    InterpolationSyntax {
        line: usize,
        section: String,
        option: String,
        message: String,
    },

    #[error(
        "Interpolation error in section '{section}', option '{option}': '{value}' is missing option '{reference}'"
    )]
    InterpolationMissingOption {
        line: usize,
        section: String,
        option: String,
        value: String,
        reference: String,
    },

    #[error(
        "Interpolation depth exceeded processing '{value}' for option '{option}' in section '{section}'"
    )]
    InterpolationDepth {
        line: usize,
        section: String,
        option: String,
        value: String,
    },
}

impl ParseError {
    #[must_use]
    pub fn line(&self) -> usize {
        match *self {
            Self::DuplicateSection { line, .. }
            | Self::DuplicateOption { line, .. }
            | Self::MissingSectionHeader { line, .. }
            | Self::InvalidLine { line, .. }
            | Self::InterpolationSyntax { line, .. }
            | Self::InterpolationMissingOption { line, .. }
            | Self::InterpolationDepth { line, .. } => line,
        }
    }
}

/// All problems found by one read, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub(crate) fn new(errors: Vec<ParseError>) -> Self {
        debug_assert!(!errors.is_empty(), "a failed read must carry at least one error");
        Self(errors)
    }

    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.0
    }
}

impl std::error::Error for ParseErrors {}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Source contains parsing errors:")?;

        for error in &self.0 {
            write!(f, "\n\t[line {}]: {error}", error.line())?;
        }

        Ok(())
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Returned by the query methods of [`crate::Ini`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No section exists with name '{section}'")]
    NoSection { section: String },

    #[error("No option exists with name '{option}' in section '{section}'")]
    NoOption { section: String, option: String },
}

/// Errors from the entry points that touch files or byte streams.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read data")]
    ReadFailure {
        #[from]
        source: io::Error,
    },

    #[error("failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input is not valid {charset}")]
    Decode { charset: Charset },

    #[error(transparent)]
    Parse(#[from] ParseErrors),
}
