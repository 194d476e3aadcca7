use http::header::{HeaderName, IF_MODIFIED_SINCE};
use http::Method;

/// Process-wide dispatch settings, fixed once the dispatcher is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Methods the dispatcher accepts at all; anything else is answered with
    /// `405 Method Not Allowed` once a route matched.
    pub allowed_methods: Vec<Method>,

    /// Query parameter that overrides the request method, `_method` by
    /// default. The override only applies to allowed methods.
    pub method_override: Option<String>,

    /// Redirect `/foo/` to `/foo` with `301 Moved Permanently`.
    pub redirect_trailing_slash: bool,

    /// Request header compared with the resource's `Last-Modified` value.
    pub conditional_header: HeaderName,

    /// Base path the application is served under. It is stripped from
    /// request paths before routing and prepended to generated links.
    pub mount: Option<String>,

    /// Turn panics raised by resources or the renderer into
    /// `500 Internal Server Error`.
    pub catch_panics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::HEAD,
            ],
            method_override: Some("_method".to_owned()),
            redirect_trailing_slash: true,
            conditional_header: IF_MODIFIED_SINCE,
            mount: None,
            catch_panics: true,
        }
    }
}

impl Config {
    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// The mount point without trailing slashes, `None` when it is the root.
    pub(crate) fn mount_point(&self) -> Option<&str> {
        self.mount
            .as_deref()
            .map(|m| m.trim_end_matches('/'))
            .filter(|m| !m.is_empty())
    }
}
