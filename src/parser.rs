use std::collections::HashMap;
use std::iter;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::OptionKey;
use crate::error::{ParseError, ParseErrors};
use crate::options::IniOptions;
use crate::section::Section;

/// Option values as read, one entry per physical line, before joining.
type Unjoined = IndexMap<String, IndexMap<String, Vec<String>>>;

/// Everything a successful structural pass produces.
#[derive(Debug)]
pub(crate) struct Parsed {
    pub sections: IndexMap<String, Section>,
    pub line_numbers: HashMap<OptionKey, usize>,
}

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    text: &'a str,
    options: &'a IniOptions,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str, options: &'a IniOptions) -> Self {
        Self { text, options }
    }
}

impl Parser<'_> {
    /// Run the structural pass over every line, then join the collected values.
    ///
    /// Parsing never stops at the first problem. If any line was rejected, every rejection is
    /// returned in line order and nothing else is.
    pub fn into_sections(self) -> Result<Parsed, ParseErrors> {
        let mut state = State::new(self.options);

        for (i, line) in physical_lines(self.text).enumerate() {
            state.process_line(i + 1, line);
        }

        if !state.errors.is_empty() {
            debug!(errors = state.errors.len(), "structural pass rejected input");
            return Err(ParseErrors::new(state.errors));
        }

        let sections = state
            .sections
            .into_iter()
            .map(|(name, options)| {
                let options = options
                    .into_iter()
                    .map(|(option, lines)| (option, join_value(lines)))
                    .collect();
                (name.clone(), Section::new(name, options))
            })
            .collect::<IndexMap<_, _>>();

        debug!(sections = sections.len(), "structural pass finished");

        Ok(Parsed {
            sections,
            line_numbers: state.line_numbers,
        })
    }
}

/// Line-to-line parser state.
#[derive(Debug)]
struct State<'a> {
    options: &'a IniOptions,
    sections: Unjoined,
    line_numbers: HashMap<OptionKey, usize>,
    errors: Vec<ParseError>,
    section: Option<String>,
    option: Option<String>,
    /// Set after a rejected option line. Its continuation lines are dropped.
    discard: bool,
    /// Lines indented deeper than this continue the open option.
    indent: usize,
    line: usize,
}

impl<'a> State<'a> {
    fn new(options: &'a IniOptions) -> Self {
        Self {
            options,
            sections: IndexMap::new(),
            line_numbers: HashMap::new(),
            errors: Vec::new(),
            section: None,
            option: None,
            discard: false,
            indent: 0,
            line: 0,
        }
    }

    fn process_line(&mut self, line_number: usize, raw: &str) {
        self.line = line_number;
        let line = classify(raw, self.options);

        if line.content.is_empty() {
            if self.options.empty_lines_in_values() {
                // A comment line never contributes to a value.
                if !line.commented {
                    if let Some(lines) = self.current_lines() {
                        lines.push(String::new());
                    }
                }
            } else {
                self.indent = usize::MAX;
            }
            return;
        }

        if line.indent > self.indent {
            if self.discard {
                trace!(line = line_number, "dropped continuation of rejected option");
                return;
            }

            if let Some(lines) = self.current_lines() {
                trace!(line = line_number, "continuation line");
                lines.push(line.content.to_owned());
                return;
            }
        }

        self.indent = line.indent;

        if let Some(name) = section_name(line.content) {
            self.open_section(name);
        } else if let Some(section) = self.section.clone() {
            match split_option(line.content, self.options) {
                Some((name, value)) => self.open_option(section, name, value, raw),
                None => self.reject(ParseError::InvalidLine {
                    line: line_number,
                    text: raw.to_owned(),
                }),
            }
        } else {
            self.reject(ParseError::MissingSectionHeader {
                line: line_number,
                text: raw.to_owned(),
            });
        }
    }

    fn current_lines(&mut self) -> Option<&mut Vec<String>> {
        let section = self.section.as_ref()?;
        let option = self.option.as_ref()?;
        self.sections.get_mut(section)?.get_mut(option)
    }

    fn open_section(&mut self, name: &str) {
        // Sections cannot start with a continuation line.
        self.option = None;
        self.discard = false;

        if !self.sections.contains_key(name) {
            debug!(line = self.line, section = name, "opened section");
            self.sections.insert(name.to_owned(), IndexMap::new());
            self.section = Some(name.to_owned());
        } else if self.options.allow_duplicates() {
            debug!(line = self.line, section = name, "reopened section");
            self.section = Some(name.to_owned());
        } else {
            self.section = None;
            self.reject(ParseError::DuplicateSection {
                line: self.line,
                section: name.to_owned(),
            });
        }
    }

    fn open_option(&mut self, section: String, name: &str, value: Option<&str>, raw: &str) {
        self.option = None;
        self.discard = false;

        if name.is_empty() {
            self.discard = true;
            self.reject(ParseError::InvalidLine {
                line: self.line,
                text: raw.to_owned(),
            });
            return;
        }

        let option = name.to_lowercase();
        let Some(options) = self.sections.get_mut(&section) else {
            return;
        };

        if options.contains_key(&option) && !self.options.allow_duplicates() {
            self.discard = true;
            self.reject(ParseError::DuplicateOption {
                line: self.line,
                section,
                option,
            });
            return;
        }

        let lines = value
            .map(|value| vec![value.trim_end().to_owned()])
            .unwrap_or_default();
        options.insert(option.clone(), lines);

        self.line_numbers
            .entry((section, option.clone()))
            .or_insert(self.line);
        self.option = Some(option);
    }

    fn reject(&mut self, error: ParseError) {
        debug!(line = error.line(), %error, "rejected line");
        self.errors.push(error);
    }
}

/// Split `text` at `\n`, `\r\n` or a lone `\r`. A trailing terminator does not start another
/// line.
fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;

    iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let end = rest.find(['\r', '\n']).unwrap_or(rest.len());
        let (line, tail) = rest.split_at(end);
        rest = match tail.strip_prefix("\r\n") {
            Some(tail) => tail,
            None => tail.get(1..).unwrap_or(tail),
        };

        Some(line)
    })
}

/// A physical line with comments and surrounding whitespace removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line<'a> {
    content: &'a str,
    /// Column of the first non-whitespace character of the raw line.
    indent: usize,
    /// Whether any part of the line was removed as a comment.
    commented: bool,
}

fn classify<'a>(raw: &'a str, options: &IniOptions) -> Line<'a> {
    let mut comment_start = inline_comment_start(raw, options.inline_comment_prefixes());

    if comment_start != Some(0) {
        let trimmed = raw.trim();
        if options
            .comment_prefixes()
            .iter()
            .any(|prefix| trimmed.starts_with(prefix.as_str()))
        {
            comment_start = Some(0);
        }
    }

    let content = comment_start.map_or(raw, |i| &raw[..i]).trim();
    let indent = raw.chars().position(|c| !c.is_whitespace()).unwrap_or(0);

    Line {
        content,
        indent,
        commented: comment_start.is_some(),
    }
}

/// Find where an inline comment begins: the earliest prefix occurrence that is either at the
/// start of the line or directly after whitespace.
fn inline_comment_start(line: &str, prefixes: &[String]) -> Option<usize> {
    let mut earliest = None::<usize>;

    for prefix in prefixes {
        for (i, _) in line.match_indices(prefix.as_str()) {
            if i == 0 {
                return Some(0);
            }

            if line[..i].chars().next_back().is_some_and(char::is_whitespace) {
                earliest = Some(earliest.map_or(i, |e| e.min(i)));
                break;
            }
        }
    }

    earliest
}

/// Match `[name]`, where the name is one or more characters other than `]`.
fn section_name(content: &str) -> Option<&str> {
    let name = content.strip_prefix('[')?.strip_suffix(']')?;

    if name.is_empty() || name.contains(']') {
        None
    } else {
        Some(name)
    }
}

/// Split an option line at the earliest delimiter. When two delimiters start at the same
/// position the one configured first wins.
///
/// Returns the right-trimmed name and the trimmed value, or a bare name when no delimiter is
/// present and bare keys are allowed.
fn split_option<'a>(content: &'a str, options: &IniOptions) -> Option<(&'a str, Option<&'a str>)> {
    let delimiter = options
        .delimiters()
        .iter()
        .filter_map(|delimiter| content.find(delimiter.as_str()).map(|i| (i, delimiter.len())))
        .min_by_key(|&(i, _)| i);

    match delimiter {
        Some((i, len)) => Some((content[..i].trim_end(), Some(content[i + len..].trim()))),
        None if options.allow_no_value() => Some((content.trim_end(), None)),
        None => None,
    }
}

/// Drop trailing blank lines and join the rest with `\n`. Nothing left means no value at all.
fn join_value(mut lines: Vec<String>) -> Option<String> {
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
