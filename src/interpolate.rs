use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::OptionKey;
use crate::error::{ParseError, ParseErrors};
use crate::section::Section;

/// Deepest chain of nested references that will be followed.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Expand `${option}` and `${section:option}` references in every value, in document order.
///
/// Each expansion sees the values already stored at that point, so options earlier in the
/// document are seen expanded and later ones raw. On success the original value of every
/// expanded option is returned keyed by section and option.
pub(crate) fn interpolate(
    sections: &mut IndexMap<String, Section>,
    line_numbers: &HashMap<OptionKey, usize>,
) -> Result<HashMap<OptionKey, String>, ParseErrors> {
    let keys = sections
        .iter()
        .flat_map(|(name, section)| {
            section
                .iter()
                .map(move |(option, _)| (name.clone(), option.clone()))
        })
        .collect::<Vec<OptionKey>>();

    let mut raw_values = HashMap::with_capacity(keys.len());
    let mut errors = Vec::new();

    for (section, option) in keys {
        let Some(Some(raw)) = sections[section.as_str()]
            .get(&option)
            .map(|value| value.map(str::to_owned))
        else {
            continue;
        };

        let resolver = Resolver {
            sections: &*sections,
            line_numbers,
        };

        match resolver.expand(&section, &option, &raw, 1) {
            Ok(expanded) => {
                if let Some(value) = sections
                    .get_mut(section.as_str())
                    .and_then(|s| s.options_mut().get_mut(&option))
                {
                    *value = Some(expanded);
                }
                raw_values.insert((section, option), raw);
            }
            Err(error) => {
                debug!(%error, "interpolation failed");
                errors.push(error);
            }
        }
    }

    if errors.is_empty() {
        Ok(raw_values)
    } else {
        Err(ParseErrors::new(errors))
    }
}

struct Resolver<'a> {
    sections: &'a IndexMap<String, Section>,
    line_numbers: &'a HashMap<OptionKey, usize>,
}

impl Resolver<'_> {
    /// Expand `value`, which belongs to `option` in `section`. `depth` counts the options
    /// currently being expanded, including this one.
    fn expand(
        &self,
        section: &str,
        option: &str,
        value: &str,
        depth: usize,
    ) -> Result<String, ParseError> {
        let line = self.line_of(section, option);

        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(ParseError::InterpolationDepth {
                line,
                section: section.to_owned(),
                option: option.to_owned(),
                value: value.to_owned(),
            });
        }

        let syntax_error = |message: String| ParseError::InterpolationSyntax {
            line,
            section: section.to_owned(),
            option: option.to_owned(),
            message,
        };

        let mut result = String::with_capacity(value.len());
        let mut chars = value.char_indices();

        while let Some((start, c)) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }

            match chars.next() {
                // Escaped dollar: $$
                Some((_, '$')) => {
                    result.push('$');
                    continue;
                }
                Some((_, '{')) => {}
                _ => {
                    return Err(syntax_error(format!(
                        "'$' must be followed by '$' or '{{', found: {}",
                        &value[start..]
                    )));
                }
            }

            let mut reference = String::new();

            loop {
                match chars.next() {
                    Some((_, '}')) => break,
                    Some((_, ch)) => reference.push(ch),
                    None => {
                        return Err(syntax_error(format!(
                            "bad interpolation variable reference {}",
                            &value[start..]
                        )));
                    }
                }
            }

            let path = reference.split(':').collect::<Vec<_>>();
            let (target_section, target_option) = match path.as_slice() {
                [""] => {
                    return Err(syntax_error(format!(
                        "bad interpolation variable reference {}",
                        &value[start..]
                    )));
                }
                [name] => (section, name.to_lowercase()),
                [other, name] => (*other, name.to_lowercase()),
                _ => {
                    return Err(syntax_error(format!(
                        "More than one ':' found: {reference}"
                    )));
                }
            };

            let Some(found) = self
                .sections
                .get(target_section)
                .and_then(|s| s.get(&target_option))
            else {
                return Err(ParseError::InterpolationMissingOption {
                    line,
                    section: section.to_owned(),
                    option: option.to_owned(),
                    value: value.to_owned(),
                    reference: reference.clone(),
                });
            };

            // A reference to an option without a value expands to nothing.
            let found = found.unwrap_or_default();

            if found.contains('$') {
                trace!(
                    section = target_section,
                    option = %target_option,
                    depth,
                    "nested expansion"
                );
                let nested = self.expand(target_section, &target_option, found, depth + 1)?;
                result.push_str(&nested);
            } else {
                result.push_str(found);
            }
        }

        Ok(result)
    }

    fn line_of(&self, section: &str, option: &str) -> usize {
        self.line_numbers
            .get(&(section.to_owned(), option.to_owned()))
            .copied()
            .unwrap_or_default()
    }
}
