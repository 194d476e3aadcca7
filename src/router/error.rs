#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unbalanced optional group at byte {pos}")]
    UnbalancedGroup { pos: usize },

    #[error("placeholder {name:?} appears more than once")]
    DuplicatePlaceholder { name: Box<str> },

    #[error("template does not compile: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("cannot match var pattern for {0}")]
    NoPlaceholder(String),

    #[error("incomplete link: {0}")]
    Incomplete(String),

    #[error("empty value for placeholder {0}")]
    EmptyValue(String),

    #[error("no route registered for {0}")]
    UnknownResource(&'static str),

    #[error("request carries no host to build an absolute url from")]
    MissingHost,
}
