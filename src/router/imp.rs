use super::captures::Captures;
use super::error::{LinkError, TemplateError};
use super::Pattern;

use std::fmt;
use std::str::FromStr;

impl Pattern {
    /// Compiles `template` into an anchored matcher.
    ///
    /// Compilation is pure: the same template always yields an equivalent
    /// pattern.
    pub fn compile(template: &str) -> Result<Self, TemplateError> {
        Self::compile_template(template)
    }

    /// Compiles `base` followed by `template`.
    pub fn with_base(base: &str, template: &str) -> Result<Self, TemplateError> {
        let mut joined = String::with_capacity(base.len() + template.len());
        joined.push_str(base.trim_end_matches('/'));
        joined.push_str(template);
        Self::compile_template(&joined)
    }

    /// The template this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in template order. The wildcard is named `rest`.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(|n| &**n)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Matches `path` against the whole pattern.
    ///
    /// Returns `None` when the path does not match; this is the normal
    /// outcome while scanning a route table, not an error.
    pub fn find<'p, 's: 'p>(&'s self, path: &'p str) -> Option<Captures<'p>> {
        self.find_captures(path)
    }

    /// Builds a path by substituting `values` into the placeholders, left to
    /// right.
    ///
    /// Optional groups left without a value are dropped. Values beyond the
    /// last placeholder are appended to the wildcard, separated by `/`.
    pub fn link<I>(&self, values: I) -> Result<String, LinkError>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.build_link(values.into_iter().map(|v| v.to_string()))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for Pattern {}

impl FromStr for Pattern {
    type Err = TemplateError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
