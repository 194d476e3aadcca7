use super::config::Config;
use super::error::HttpError;

use std::borrow::Cow;

use http::{Method, Request};
use percent_encoding::percent_decode_str;

/// Per-request state of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchContext {
    method: Method,
    path: String,
    query: Option<String>,
    conditional: Option<String>,
}

impl DispatchContext {
    /// Normalizes `req` under `config`.
    ///
    /// Fails with a redirect when the path has a trailing slash and with
    /// `404 Not Found` when it lies outside the mount point.
    pub fn from_request<B>(req: &Request<B>, config: &Config) -> Result<Self, HttpError> {
        let uri = req.uri();
        let full = uri.path();
        let query = uri.query().filter(|q| !q.is_empty());

        if config.redirect_trailing_slash {
            if let Some(location) = trailing_slash_redirect(full, query) {
                tracing::debug!(path = full, %location, "redirecting trailing slash");
                return Err(HttpError::moved_permanently(location));
            }
        }

        let path = match config.mount_point() {
            Some(mount) => strip_mount(full, mount).ok_or_else(HttpError::not_found)?,
            None => full,
        };

        let mut method = req.method().clone();
        if let (Some(name), Some(query)) = (config.method_override.as_deref(), query) {
            if let Some(value) = query_param(query, name) {
                match Method::from_bytes(value.to_ascii_uppercase().as_bytes()) {
                    Ok(m) if config.allows(&m) => method = m,
                    _ => {}
                }
            }
        }

        let conditional = req
            .headers()
            .get(&config.conditional_header)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Ok(Self {
            method,
            path: path.to_owned(),
            query: query.map(str::to_owned),
            conditional,
        })
    }

    /// The effective method, after override.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path routes are matched against, relative to the mount point.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Value of the conditional request header, if sent.
    pub fn conditional(&self) -> Option<&str> {
        self.conditional.as_deref()
    }
}

/// `Some(location)` when `path` is longer than `/` and ends with a slash.
fn trailing_slash_redirect(path: &str, query: Option<&str>) -> Option<String> {
    if path.len() < 2 || !path.ends_with('/') {
        return None;
    }
    let mut location = path.trim_end_matches('/').to_owned();
    if location.is_empty() {
        location.push('/');
    }
    if let Some(query) = query {
        location.push('?');
        location.push_str(query);
    }
    Some(location)
}

fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    query.split('&').find_map(|pair| {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next()?;
        let value = kv.next().unwrap_or("");
        if percent_decode_str(key).decode_utf8_lossy() == name {
            Some(percent_decode_str(value).decode_utf8_lossy())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use http::header::IF_MODIFIED_SINCE;

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[test]
    fn trailing_slash() {
        assert_eq!(trailing_slash_redirect("/", None), None);
        assert_eq!(trailing_slash_redirect("/foo", None), None);
        assert_eq!(trailing_slash_redirect("/foo/", None), Some("/foo".into()));
        assert_eq!(
            trailing_slash_redirect("/foo//", Some("a=1")),
            Some("/foo?a=1".into())
        );
        assert_eq!(trailing_slash_redirect("//", None), Some("/".into()));
    }

    #[test]
    fn redirect_before_routing() {
        let config = Config::default();
        let err = DispatchContext::from_request(&request(Method::GET, "/foo/?x=y"), &config)
            .unwrap_err();
        assert_eq!(err.location(), Some("/foo?x=y"));

        let config = Config {
            redirect_trailing_slash: false,
            ..Config::default()
        };
        let ctx = DispatchContext::from_request(&request(Method::GET, "/foo/"), &config).unwrap();
        assert_eq!(ctx.path(), "/foo/");
    }

    #[test]
    fn method_override() {
        let config = Config::default();
        let ctx =
            DispatchContext::from_request(&request(Method::POST, "/a?_method=put"), &config)
                .unwrap();
        assert_eq!(ctx.method(), &Method::PUT);
        assert_eq!(ctx.query(), Some("_method=put"));

        let ctx =
            DispatchContext::from_request(&request(Method::POST, "/a?_method=PATCH"), &config)
                .unwrap();
        assert_eq!(ctx.method(), &Method::POST);

        let config = Config {
            method_override: None,
            ..Config::default()
        };
        let ctx =
            DispatchContext::from_request(&request(Method::POST, "/a?_method=put"), &config)
                .unwrap();
        assert_eq!(ctx.method(), &Method::POST);
    }

    #[test]
    fn mount_point() {
        let config = Config {
            mount: Some("/app/".into()),
            ..Config::default()
        };
        let ctx = DispatchContext::from_request(&request(Method::GET, "/app/x"), &config).unwrap();
        assert_eq!(ctx.path(), "/x");
        let ctx = DispatchContext::from_request(&request(Method::GET, "/app"), &config).unwrap();
        assert_eq!(ctx.path(), "/");

        let err = DispatchContext::from_request(&request(Method::GET, "/application"), &config)
            .unwrap_err();
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn conditional_header() {
        let req = Request::builder()
            .uri("/a")
            .header(IF_MODIFIED_SINCE, "Sun, 06 Nov 1994 08:49:37 GMT")
            .body(())
            .unwrap();
        let ctx = DispatchContext::from_request(&req, &Config::default()).unwrap();
        assert_eq!(ctx.conditional(), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    }

    #[test]
    fn query_params() {
        assert_eq!(query_param("a=1&_method=delete", "_method").unwrap(), "delete");
        assert_eq!(query_param("%5Fmethod=put", "_method").unwrap(), "put");
        assert!(query_param("a=1", "_method").is_none());
    }
}
