use std::borrow::Cow;
use std::error::Error as StdError;

use http::StatusCode;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// How the dispatcher answers with an [`HttpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Status and `Location` header, rendering is bypassed.
    Redirect,
    /// Status line only.
    NoRender,
    /// Status line, then the error goes through the renderer.
    Render,
}

/// A failure with HTTP semantics.
///
/// Handlers return it (boxed into a [`BoxError`]) to stop dispatch with a
/// specific status. Any other error a handler returns becomes an
/// `InternalServerError`.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("{status}: {location}")]
    Redirection { status: StatusCode, location: String },

    #[error("304 Not Modified")]
    NotModified,

    #[error("{} {reason}", .status.as_u16())]
    Client {
        status: StatusCode,
        reason: Cow<'static, str>,
    },

    #[error("{} {reason}", .status.as_u16())]
    Server {
        status: StatusCode,
        reason: Cow<'static, str>,
        #[source]
        cause: Option<BoxError>,
    },
}

impl HttpError {
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        Self::redirect(StatusCode::MOVED_PERMANENTLY, location)
    }

    /// A redirect. A status outside `3xx` gives an internal error instead.
    pub fn redirect(status: StatusCode, location: impl Into<String>) -> Self {
        if !status.is_redirection() {
            return Self::mismatch(status, "redirection");
        }
        Self::Redirection {
            status,
            location: location.into(),
        }
    }

    pub fn not_modified() -> Self {
        Self::NotModified
    }

    pub fn not_found() -> Self {
        Self::client(StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed() -> Self {
        Self::client(StatusCode::METHOD_NOT_ALLOWED)
    }

    /// A client error. A status outside `4xx` gives an internal error
    /// instead.
    pub fn client(status: StatusCode) -> Self {
        if !status.is_client_error() {
            return Self::mismatch(status, "client error");
        }
        Self::Client {
            status,
            reason: canonical_reason(status),
        }
    }

    /// Wraps an unexpected fault as `500 Internal Server Error`.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::server(StatusCode::INTERNAL_SERVER_ERROR, Some(cause.into()))
    }

    /// A server error. A status outside `5xx` gives an internal error
    /// instead.
    pub fn server(status: StatusCode, cause: Option<BoxError>) -> Self {
        if !status.is_server_error() {
            return Self::mismatch(status, "server error");
        }
        Self::Server {
            status,
            reason: canonical_reason(status),
            cause,
        }
    }

    fn mismatch(status: StatusCode, family: &'static str) -> Self {
        Self::internal(StatusMismatch { status, family })
    }

    /// Replaces the reason phrase of a client or server error.
    pub fn with_reason(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        match &mut self {
            Self::Client { reason, .. } | Self::Server { reason, .. } => *reason = text.into(),
            Self::Redirection { .. } | Self::NotModified => {}
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Redirection { status, .. } => *status,
            Self::NotModified => StatusCode::NOT_MODIFIED,
            Self::Client { status, .. } | Self::Server { status, .. } => *status,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Client { reason, .. } | Self::Server { reason, .. } => &**reason,
            _ => self.status().canonical_reason().unwrap_or(""),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Self::Redirection { .. } => Family::Redirect,
            Self::NotModified => Family::NoRender,
            Self::Client { .. } | Self::Server { .. } => Family::Render,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirection { location, .. } => Some(location.as_str()),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Server { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// View keys tried when rendering this error, most specific first.
    ///
    /// `404` gives `http/not_found`, `http/client_error`, `http/error`.
    pub fn views(&self) -> Vec<Cow<'static, str>> {
        let status = self.status();
        let mut views = Vec::with_capacity(3);
        match status.canonical_reason() {
            Some(reason) => views.push(Cow::Owned(format!("http/{}", snake_case(reason)))),
            None => views.push(Cow::Owned(format!("http/{}", status.as_u16()))),
        }
        if status.is_client_error() {
            views.push(Cow::Borrowed("http/client_error"));
        } else if status.is_server_error() {
            views.push(Cow::Borrowed("http/server_error"));
        }
        views.push(Cow::Borrowed("http/error"));
        views
    }
}

/// An error was built with a status outside its family.
#[derive(Debug, thiserror::Error)]
#[error("{status} is not a {family} status")]
pub struct StatusMismatch {
    pub status: StatusCode,
    pub family: &'static str,
}

/// A handler panicked while the dispatcher was catching panics.
#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {0}")]
pub struct Panicked(pub String);

fn canonical_reason(status: StatusCode) -> Cow<'static, str> {
    Cow::Borrowed(status.canonical_reason().unwrap_or("Unknown"))
}

fn snake_case(reason: &str) -> String {
    reason
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' => Some('_'),
            c if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families() {
        assert_eq!(HttpError::moved_permanently("/a").family(), Family::Redirect);
        assert_eq!(HttpError::not_modified().family(), Family::NoRender);
        assert_eq!(HttpError::not_found().family(), Family::Render);
        assert_eq!(HttpError::internal("boom").family(), Family::Render);
    }

    #[test]
    fn status_and_reason() {
        let e = HttpError::method_not_allowed();
        assert_eq!(e.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(e.reason(), "Method Not Allowed");
        assert_eq!(e.to_string(), "405 Method Not Allowed");

        let e = HttpError::client(StatusCode::GONE).with_reason("Sold Out");
        assert_eq!(e.to_string(), "410 Sold Out");

        let e = HttpError::moved_permanently("/foo");
        assert_eq!(e.to_string(), "301 Moved Permanently: /foo");
        assert_eq!(e.location(), Some("/foo"));
    }

    #[test]
    fn internal_keeps_cause() {
        let e = HttpError::internal("disk on fire");
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.cause().unwrap().to_string(), "disk on fire");
        assert!(e.source().is_some());
    }

    #[test]
    fn status_outside_family() {
        let e = HttpError::client(StatusCode::OK);
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.family(), Family::Render);
        assert!(e.cause().unwrap().is::<StatusMismatch>());

        let e = HttpError::redirect(StatusCode::NOT_FOUND, "/a");
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(e.location().is_none());

        let e = HttpError::server(StatusCode::BAD_REQUEST, None);
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            e.cause().unwrap().to_string(),
            "400 Bad Request is not a server error status"
        );
    }

    #[test]
    fn view_keys() {
        assert_eq!(
            HttpError::not_found().views(),
            vec!["http/not_found", "http/client_error", "http/error"]
        );
        assert_eq!(
            HttpError::internal("x").views(),
            vec!["http/internal_server_error", "http/server_error", "http/error"]
        );
    }
}
