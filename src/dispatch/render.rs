use super::error::{BoxError, HttpError};
use super::resource::ResourceType;

use std::any::Any;
use std::borrow::Cow;

/// What the renderer is asked to present.
pub enum Subject<'a> {
    /// A resource after its method handler ran.
    Resource {
        ty: &'a ResourceType,
        views: &'a [Cow<'static, str>],
        instance: &'a (dyn Any + 'static),
    },
    /// A client or server error.
    Error(&'a HttpError),
}

impl<'a> Subject<'a> {
    /// View keys to try, most specific first.
    pub fn views(&self) -> Vec<Cow<'static, str>> {
        match self {
            Subject::Resource { views, .. } => views.to_vec(),
            Subject::Error(error) => error.views(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match *self {
            Subject::Resource { instance, .. } => instance.downcast_ref(),
            Subject::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&'a HttpError> {
        match *self {
            Subject::Error(e) => Some(e),
            Subject::Resource { .. } => None,
        }
    }
}

/// Produces the response body for a resource or an error.
pub trait Renderer: Send + Sync {
    fn render(&self, subject: &Subject<'_>) -> Result<Vec<u8>, BoxError>;
}

impl<F> Renderer for F
where
    F: Fn(&Subject<'_>) -> Result<Vec<u8>, BoxError> + Send + Sync,
{
    fn render(&self, subject: &Subject<'_>) -> Result<Vec<u8>, BoxError> {
        (self)(subject)
    }
}

/// Renders errors as their status line and resources as an empty body.
#[derive(Debug, Default, Clone, Copy)]
pub struct Plain;

impl Renderer for Plain {
    fn render(&self, subject: &Subject<'_>) -> Result<Vec<u8>, BoxError> {
        Ok(match subject {
            Subject::Error(e) => e.to_string().into_bytes(),
            Subject::Resource { .. } => Vec::new(),
        })
    }
}

/// A store of views addressed by key.
pub trait Views: Send + Sync {
    /// Renders the view stored under `key`, or returns `None` when there is
    /// no such view. `content` is the output of the first step when a
    /// layout is being rendered.
    fn render(
        &self,
        key: &str,
        subject: &Subject<'_>,
        content: Option<&[u8]>,
    ) -> Option<Result<Vec<u8>, BoxError>>;
}

/// Two step view: a content view, then a layout wrapping it.
///
/// The content view is the first of the subject's view keys the store
/// knows. The layout is searched from the directory of the first key up to
/// the root: `shop/products/show` tries `shop/products/layout`,
/// `shop/layout` and `layout`.
pub struct TwoStep<V> {
    views: V,
    layout: Option<Cow<'static, str>>,
}

impl<V: Views> TwoStep<V> {
    pub fn new(views: V) -> Self {
        Self {
            views,
            layout: Some(Cow::Borrowed("layout")),
        }
    }

    pub fn with_layout(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.layout = Some(name.into());
        self
    }

    pub fn without_layout(mut self) -> Self {
        self.layout = None;
        self
    }
}

impl<V: Views> Renderer for TwoStep<V> {
    fn render(&self, subject: &Subject<'_>) -> Result<Vec<u8>, BoxError> {
        let keys = subject.views();

        let mut content = Vec::new();
        for key in keys.iter() {
            if let Some(ret) = self.views.render(key, subject, None) {
                content = ret?;
                break;
            }
        }

        let (layout, first) = match (&self.layout, keys.first()) {
            (Some(layout), Some(first)) => (layout, first),
            _ => return Ok(content),
        };

        for key in layout_candidates(first, layout) {
            if let Some(ret) = self.views.render(&key, subject, Some(&content)) {
                return ret;
            }
        }
        Ok(content)
    }
}

/// Layout keys for `key`, from its own directory up to the root.
pub fn layout_candidates(key: &str, layout: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    let mut dir = key;
    loop {
        dir = match dir.rfind('/') {
            Some(i) => &dir[..i],
            None => "",
        };
        if dir.is_empty() {
            candidates.push(layout.to_owned());
            return candidates;
        }
        candidates.push(format!("{}/{}", dir, layout));
    }
}

/// Converts a type path into a view key: `my_app::FooBar` becomes
/// `my_app/foo_bar`. Generic arguments are ignored.
pub fn class_to_path(type_name: &str) -> String {
    let name = type_name.split('<').next().unwrap_or(type_name);
    let mut path = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.replace("::", "/").chars() {
        if c.is_uppercase() && prev.map_or(false, |p| p.is_alphanumeric() || p == '_') {
            path.push('_');
        }
        path.extend(c.to_lowercase());
        prev = Some(c);
    }
    path
}
