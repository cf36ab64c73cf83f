use std::fmt::{self, Write};

use crate::Ini;
use crate::options::IniOptions;

/// Render `ini` as INI text using the writing settings in `options`.
///
/// Multi-line values are written as continuation lines indented by one tab. When interpolation
/// is on, the value as it was read (before `${...}` expansion) is written so references survive a
/// round trip.
pub(crate) fn write_ini<W: Write>(ini: &Ini, options: &IniOptions, out: &mut W) -> fmt::Result {
    let delimiter = options.write_delimiter();

    for section in ini.sections() {
        writeln!(out, "[{}]", section.name())?;

        for (option, value) in section {
            let raw = if options.interpolation() {
                ini.raw_value(section.name(), option)
            } else {
                None
            };

            out.write_str(option)?;

            match raw.or(value.as_deref()) {
                Some(value) => {
                    out.write_str(&delimiter)?;
                    out.write_str(&value.replace('\n', "\n\t"))?;
                }
                None if options.allow_no_value() => {}
                // Without bare keys there is no way to express a missing value, so the key is
                // written with an empty one.
                None => out.write_str(&delimiter)?,
            }

            out.write_char('\n')?;
        }

        out.write_char('\n')?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Ini, IniOptions};

    #[test]
    fn multiline_values_become_continuation_lines() {
        let ini = Ini::parse("[Section]\nkey = one\n  two\n\n  three\n")
            .expect("failed to parse hardcoded INI");

        assert_eq!(ini.to_string(), "[Section]\nkey = one\n\ttwo\n\t\n\tthree\n\n");
    }

    #[test]
    fn raw_values_are_written_back() {
        let ini =
            Ini::parse("[common]\na = 1\nb = ${a}2\n").expect("failed to parse hardcoded INI");

        assert_eq!(ini.get("common", "b"), Ok(Some("12")));
        assert_eq!(ini.to_string(), "[common]\na = 1\nb = ${a}2\n\n");
    }

    #[test]
    fn first_delimiter_without_spaces() {
        let options = IniOptions::default()
            .with_delimiters([":", "="])
            .with_space_around_delimiters(false);
        let ini =
            Ini::parse_with("[s]\nkey = value\n", options).expect("failed to parse hardcoded INI");

        assert_eq!(ini.to_string(), "[s]\nkey:value\n\n");
    }

    #[test]
    fn bare_keys_are_written_bare() {
        let options = IniOptions::default().with_allow_no_value(true);
        let ini = Ini::parse_with("[s]\nflag\nempty =\n", options)
            .expect("failed to parse hardcoded INI");

        assert_eq!(ini.to_string(), "[s]\nflag\nempty\n\n");
    }

    #[test]
    fn empty_value_without_bare_keys_keeps_the_delimiter() {
        let ini = Ini::parse("[s]\nempty =\n").expect("failed to parse hardcoded INI");

        assert_eq!(ini.get("s", "empty"), Ok(None));
        assert_eq!(ini.to_string(), "[s]\nempty = \n\n");
    }

    #[test]
    fn missing_value_without_bare_keys_writes_empty_value() {
        let options = IniOptions::default().with_allow_no_value(true);
        let ini = Ini::parse_with("[s]\nflag\n", options).expect("failed to parse hardcoded INI");

        let strict = IniOptions::default();

        assert_eq!(ini.to_string_with(&strict), "[s]\nflag = \n\n");
    }

    #[test]
    fn expanded_values_are_written_when_interpolation_is_off_on_write() {
        let ini = Ini::parse("[s]\na = 1\nb = ${a}\n").expect("failed to parse hardcoded INI");

        let options = IniOptions::default().with_interpolation(false);

        assert_eq!(ini.to_string_with(&options), "[s]\na = 1\nb = 1\n\n");
    }

    #[test]
    fn empty_sections_are_written() {
        let ini = Ini::parse("[a]\n[b]\nk = v\n").expect("failed to parse hardcoded INI");

        assert_eq!(ini.to_string(), "[a]\n\n[b]\nk = v\n\n");
    }
}
