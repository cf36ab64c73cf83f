/// Settings that control how INI text is read and written.
///
/// The defaults match Python's `configparser.ConfigParser`, except that interpolation uses the
/// `${section:option}` syntax.
///
/// ```
/// use ini::IniOptions;
///
/// let options = IniOptions::default()
///     .with_allow_no_value(true)
///     .with_inline_comment_prefixes([";"]);
///
/// assert!(options.allow_no_value());
/// assert_eq!(options.delimiters(), ["=", ":"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniOptions {
    comment_prefixes: Vec<String>,
    inline_comment_prefixes: Vec<String>,
    delimiters: Vec<String>,
    allow_duplicates: bool,
    allow_no_value: bool,
    empty_lines_in_values: bool,
    interpolation: bool,
    space_around_delimiters: bool,
}

impl Default for IniOptions {
    fn default() -> Self {
        Self {
            comment_prefixes: vec!["#".to_owned(), ";".to_owned()],
            inline_comment_prefixes: Vec::new(),
            delimiters: vec!["=".to_owned(), ":".to_owned()],
            allow_duplicates: false,
            allow_no_value: false,
            empty_lines_in_values: true,
            interpolation: true,
            space_around_delimiters: true,
        }
    }
}

impl IniOptions {
    /// Prefixes that turn a whole line into a comment.
    #[must_use]
    pub fn with_comment_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment_prefixes = collect_non_empty(prefixes);
        self
    }

    /// Prefixes that start a comment after data on the same line. They only count at the start
    /// of a line or after whitespace.
    #[must_use]
    pub fn with_inline_comment_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inline_comment_prefixes = collect_non_empty(prefixes);
        self
    }

    /// Separators between an option name and its value. The first one is used when writing.
    #[must_use]
    pub fn with_delimiters<I, S>(mut self, delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.delimiters = collect_non_empty(delimiters);
        self
    }

    /// Accept repeated sections and options instead of reporting them.
    #[must_use]
    pub fn with_allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    /// Accept option lines that have no delimiter and no value.
    #[must_use]
    pub fn with_allow_no_value(mut self, allow: bool) -> Self {
        self.allow_no_value = allow;
        self
    }

    /// Keep blank lines inside multi-line values. When off, a blank line ends the value.
    #[must_use]
    pub fn with_empty_lines_in_values(mut self, allow: bool) -> Self {
        self.empty_lines_in_values = allow;
        self
    }

    /// Expand `${option}` and `${section:option}` references after reading.
    #[must_use]
    pub fn with_interpolation(mut self, allow: bool) -> Self {
        self.interpolation = allow;
        self
    }

    /// Write `key = value` instead of `key=value`.
    #[must_use]
    pub fn with_space_around_delimiters(mut self, space: bool) -> Self {
        self.space_around_delimiters = space;
        self
    }

    #[must_use]
    pub fn comment_prefixes(&self) -> &[String] {
        &self.comment_prefixes
    }

    #[must_use]
    pub fn inline_comment_prefixes(&self) -> &[String] {
        &self.inline_comment_prefixes
    }

    #[must_use]
    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    #[must_use]
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    #[must_use]
    pub fn allow_no_value(&self) -> bool {
        self.allow_no_value
    }

    #[must_use]
    pub fn empty_lines_in_values(&self) -> bool {
        self.empty_lines_in_values
    }

    #[must_use]
    pub fn interpolation(&self) -> bool {
        self.interpolation
    }

    #[must_use]
    pub fn space_around_delimiters(&self) -> bool {
        self.space_around_delimiters
    }

    /// The delimiter text placed between a key and its value on write.
    pub(crate) fn write_delimiter(&self) -> String {
        let delimiter = self.delimiters.first().map_or("=", String::as_str);

        if self.space_around_delimiters {
            format!(" {delimiter} ")
        } else {
            delimiter.to_owned()
        }
    }
}

fn collect_non_empty<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items
        .into_iter()
        .map(Into::into)
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = IniOptions::default();

        assert_eq!(options.comment_prefixes(), ["#", ";"]);
        assert!(options.inline_comment_prefixes().is_empty());
        assert_eq!(options.delimiters(), ["=", ":"]);
        assert!(!options.allow_duplicates());
        assert!(!options.allow_no_value());
        assert!(options.empty_lines_in_values());
        assert!(options.interpolation());
        assert!(options.space_around_delimiters());
    }

    #[test]
    fn write_delimiter_uses_first_delimiter() {
        let options = IniOptions::default().with_delimiters([":", "="]);
        assert_eq!(options.write_delimiter(), " : ");

        let options = options.with_space_around_delimiters(false);
        assert_eq!(options.write_delimiter(), ":");
    }

    #[test]
    fn empty_prefixes_are_ignored() {
        let options = IniOptions::default().with_inline_comment_prefixes(["", ";"]);

        assert_eq!(options.inline_comment_prefixes(), [";"]);
    }
}
