#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Read and write INI files in the dialect of Python's `configparser`.
//!
//! ```
//! let ini = ini::Ini::parse("[common]\na = 1\nb = ${a}2\n").expect("valid INI");
//!
//! assert_eq!(ini.get("common", "b"), Ok(Some("12")));
//! assert_eq!(ini.to_string(), "[common]\na = 1\nb = ${a}2\n\n");
//! ```

mod encoding;
mod error;
mod interpolate;
mod options;
mod parser;
mod section;
mod writer;

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use std::{fmt, fs};

use indexmap::IndexMap;
use tracing::debug;

pub use crate::encoding::Charset;
pub use crate::error::{Error, LookupError, ParseError, ParseErrors};
pub use crate::interpolate::MAX_INTERPOLATION_DEPTH;
pub use crate::options::IniOptions;
pub use crate::section::Section;

use crate::parser::{Parsed, Parser};

/// Section name and lower-cased option name.
pub(crate) type OptionKey = (String, String);

/// A parsed INI document.
///
/// An `Ini` only exists as the result of a successful read. Sections and options keep the order
/// they were declared in, which is also the order they are written in.
#[derive(Debug, Clone)]
pub struct Ini {
    options: IniOptions,
    sections: IndexMap<String, Section>,
    raw_values: HashMap<OptionKey, String>,
    line_numbers: HashMap<OptionKey, usize>,
}

impl Ini {
    /// Parse `text` with the default [`IniOptions`].
    ///
    /// # Errors
    ///
    /// Returns every structural or interpolation problem found in `text`.
    pub fn parse(text: &str) -> Result<Self, ParseErrors> {
        Self::parse_with(text, IniOptions::default())
    }

    /// Parse `text`.
    ///
    /// Structural problems are collected over the whole input. If there are none, values are
    /// interpolated (when enabled) and interpolation problems are collected over every option.
    ///
    /// # Errors
    ///
    /// Returns the structural problems if there are any, otherwise the interpolation problems.
    pub fn parse_with(text: &str, options: IniOptions) -> Result<Self, ParseErrors> {
        let Parsed {
            mut sections,
            line_numbers,
        } = Parser::new(text, &options).into_sections()?;

        let raw_values = if options.interpolation() {
            interpolate::interpolate(&mut sections, &line_numbers)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            options,
            sections,
            raw_values,
            line_numbers,
        })
    }

    /// Read and parse everything from `reader`.
    ///
    /// # Errors
    ///
    /// Fails if reading fails, if the bytes are not valid `charset`, or if parsing fails.
    pub fn from_reader<R: Read>(
        reader: &mut R,
        charset: Charset,
        options: IniOptions,
    ) -> Result<Self, Error> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let text = charset.decode(&data).ok_or(Error::Decode { charset })?;
        Ok(Self::parse_with(&text, options)?)
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid `charset`, or does not parse.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        charset: Charset,
        options: IniOptions,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), %charset, "reading INI file");

        let data = fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let text = charset.decode(&data).ok_or(Error::Decode { charset })?;
        Ok(Self::parse_with(&text, options)?)
    }

    /// Write the document as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Propagates errors from `writer`.
    pub fn write<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_string().as_bytes())?;
        writer.flush()
    }

    /// Write the document to the file at `path`, replacing it if it exists.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P, charset: Charset) -> Result<(), Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), %charset, "writing INI file");

        fs::write(path, charset.encode(&self.to_string())).map_err(|source| Error::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Render the document using the writing settings of `options` instead of the ones it was
    /// read with.
    #[must_use]
    pub fn to_string_with(&self, options: &IniOptions) -> String {
        let mut out = String::new();
        // Writing into a `String` cannot fail.
        _ = writer::write_ini(self, options, &mut out);
        out
    }

    /// Look up a value. `Ok(None)` means the option exists without a value.
    ///
    /// # Errors
    ///
    /// Fails if the section or the option does not exist.
    pub fn get(&self, section: &str, option: &str) -> Result<Option<&str>, LookupError> {
        let found = self
            .sections
            .get(section)
            .ok_or_else(|| LookupError::NoSection {
                section: section.to_owned(),
            })?;

        found.get(option).ok_or_else(|| LookupError::NoOption {
            section: section.to_owned(),
            option: option.to_owned(),
        })
    }

    /// Like [`Ini::get`], but a missing option yields `fallback`.
    ///
    /// # Errors
    ///
    /// Fails if the section does not exist.
    pub fn get_or<'a>(
        &'a self,
        section: &str,
        option: &str,
        fallback: &'a str,
    ) -> Result<Option<&'a str>, LookupError> {
        match self.get(section, option) {
            Err(LookupError::NoOption { .. }) => Ok(Some(fallback)),
            result => result,
        }
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// The value of an option as it was read, before interpolation.
    #[must_use]
    pub fn raw_value(&self, section: &str, option: &str) -> Option<&str> {
        self.raw_values
            .get(&(section.to_owned(), option.to_lowercase()))
            .map(String::as_str)
    }

    /// The 1-based line an option was first declared on.
    #[must_use]
    pub fn line_number(&self, section: &str, option: &str) -> Option<usize> {
        self.line_numbers
            .get(&(section.to_owned(), option.to_lowercase()))
            .copied()
    }

    #[must_use]
    pub fn options(&self) -> &IniOptions {
        &self.options
    }
}

impl FromStr for Ini {
    type Err = ParseErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_ini(self, &self.options, f)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookups_distinguish_missing_section_and_option() {
        let ini = Ini::parse("[Section]\nkey = value\n").expect("failed to parse hardcoded INI");

        assert_eq!(ini.get("Section", "KEY"), Ok(Some("value")));
        assert_eq!(
            ini.get("Other", "key"),
            Err(LookupError::NoSection {
                section: "Other".to_owned()
            })
        );
        assert_eq!(
            ini.get("Section", "other"),
            Err(LookupError::NoOption {
                section: "Section".to_owned(),
                option: "other".to_owned()
            })
        );
    }

    #[test]
    fn fallback_only_covers_missing_options() {
        let ini = Ini::parse("[Section]\nkey = value\n").expect("failed to parse hardcoded INI");

        assert_eq!(ini.get_or("Section", "other", "default"), Ok(Some("default")));
        assert_eq!(ini.get_or("Section", "key", "default"), Ok(Some("value")));
        assert!(matches!(
            ini.get_or("Other", "key", "default"),
            Err(LookupError::NoSection { .. })
        ));
    }

    #[test]
    fn multiple_sections() {
        let text = "
; This is a comment

[Version]
Signature = \"$$CHICAGO$$\"

[Section]
key = value
";

        let ini = text.parse::<Ini>().expect("failed to parse hardcoded INI");

        assert_eq!(ini.get("Version", "signature"), Ok(Some("\"$CHICAGO$\"")));
        assert_eq!(ini.raw_value("Version", "Signature"), Some("\"$$CHICAGO$$\""));
        assert_eq!(ini.line_number("Section", "key"), Some(8));
        assert_eq!(
            ini.sections().map(Section::name).collect::<Vec<_>>(),
            ["Version", "Section"]
        );
    }

    #[test]
    fn structural_errors_skip_interpolation() {
        let errors = Ini::parse("[s]\nbad\nref = ${missing}\n").expect_err("input has errors");

        assert_eq!(
            errors.into_errors(),
            vec![ParseError::InvalidLine {
                line: 2,
                text: "bad".to_owned()
            }]
        );
    }

    #[test]
    fn interpolation_can_be_disabled() {
        let options = IniOptions::default().with_interpolation(false);
        let ini = Ini::parse_with("[s]\na = 1\nb = ${a} $oops\n", options)
            .expect("failed to parse hardcoded INI");

        assert_eq!(ini.get("s", "b"), Ok(Some("${a} $oops")));
        assert_eq!(ini.raw_value("s", "b"), None);
    }

    #[test]
    fn from_reader_decodes_utf16() {
        let data = Charset::Utf16Le.encode("[s]\nkey = värde\n");

        let ini = Ini::from_reader(&mut data.as_slice(), Charset::Utf16Le, IniOptions::default())
            .expect("failed to read hardcoded INI");

        assert_eq!(ini.get("s", "key"), Ok(Some("värde")));
    }

    #[test]
    fn from_reader_rejects_invalid_bytes() {
        let data = [b'[', 0xFF, b']'];

        let error = Ini::from_reader(&mut data.as_slice(), Charset::Utf8, IniOptions::default())
            .expect_err("invalid UTF-8 should fail");

        assert!(matches!(error, Error::Decode { charset: Charset::Utf8 }));
    }
}
