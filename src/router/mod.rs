mod captures;
mod core;
mod error;
mod imp;
mod link;

pub use self::captures::Captures;
pub use self::error::{LinkError, TemplateError};

use regex::Regex;

/// A compiled route template.
///
/// Templates are made of literal text, named placeholders (`:name`), a
/// wildcard (`*`, captured as `rest`) and parenthesized optional groups,
/// which may nest:
///
/// ```
/// use resource_router::Pattern;
///
/// let pattern = Pattern::compile("/:controller(/:action(/:id(.:format)))").unwrap();
/// let caps = pattern.find("/one/two/3.xml").unwrap();
/// assert_eq!(caps.get("format"), Some("xml"));
/// assert!(pattern.find("/one/two/3/4").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: Box<str>,
    tokens: Vec<Token>,
    regex: Regex,
    names: Vec<Box<str>>,
    wildcard: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(Box<str>),
    Param(Box<str>),
    Wildcard,
    Group(Vec<Token>),
}
