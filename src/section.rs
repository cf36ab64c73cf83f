use indexmap::IndexMap;
use indexmap::map::Iter;

/// A named group of options, in the order they were declared.
///
/// Option names are stored lower-cased; lookups through [`Section::get`] are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: IndexMap<String, Option<String>>,
}

impl Section {
    #[must_use]
    pub(crate) fn new(name: String, options: IndexMap<String, Option<String>>) -> Self {
        Self { name, options }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` if the option does not exist, `Some(None)` if it exists without a value.
    #[must_use]
    pub fn get(&self, option: &str) -> Option<Option<&str>> {
        self.options
            .get(option.to_lowercase().as_str())
            .map(Option::as_deref)
    }

    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.options.contains_key(option.to_lowercase().as_str())
    }

    pub fn iter(&self) -> Iter<'_, String, Option<String>> {
        self.options.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub(crate) fn options_mut(&mut self) -> &mut IndexMap<String, Option<String>> {
        &mut self.options
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = (&'a String, &'a Option<String>);
    type IntoIter = Iter<'a, String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
