use crate::router::Captures;

use std::iter::{DoubleEndedIterator, ExactSizeIterator, FusedIterator};
use std::str::FromStr;

/// Placeholder values bound to a resource, owned by the request.
///
/// Built from the [`Captures`] of the matching route and handed to
/// [`Resource::init`](super::Resource::init).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pairs: Vec<(Box<str>, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(n, v)| if **n == *name { Some(v.as_str()) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Removes `name` and returns its value.
    pub fn take(&mut self, name: &str) -> Option<String> {
        let pos = self.pairs.iter().position(|(n, _)| **n == *name)?;
        Some(self.pairs.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.pairs.iter(),
        }
    }
}

impl From<&Captures<'_>> for Params {
    fn from(caps: &Captures<'_>) -> Self {
        let pairs = caps
            .iter()
            .map(|(name, value)| ((*name).into(), value.to_string()))
            .collect();
        Self { pairs }
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = IntoIter;
    fn into_iter(self) -> IntoIter {
        IntoIter {
            inner: self.pairs.into_iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    inner: std::slice::Iter<'a, (Box<str>, String)>,
}

pub struct IntoIter {
    inner: std::vec::IntoIter<(Box<str>, String)>,
}

macro_rules! delegate {
    (iter, $method:tt) => {
        fn $method(&mut self) -> Option<Self::Item> {
            let (n, v) = self.inner.$method()?;
            Some((&**n, v.as_str()))
        }
    };

    (into_iter, $method:tt) => {
        fn $method(&mut self) -> Option<Self::Item> {
            let (n, v) = self.inner.$method()?;
            Some((n.into(), v))
        }
    };

    (size_hint) => {
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }
    };

    (len) => {
        fn len(&self) -> usize {
            self.inner.len()
        }
    };
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);
    delegate!(iter, next);
    delegate!(size_hint);
}

impl DoubleEndedIterator for Iter<'_> {
    delegate!(iter, next_back);
}

impl Iterator for IntoIter {
    type Item = (String, String);
    delegate!(into_iter, next);
    delegate!(size_hint);
}

impl DoubleEndedIterator for IntoIter {
    delegate!(into_iter, next_back);
}

impl FusedIterator for Iter<'_> {}
impl FusedIterator for IntoIter {}

impl ExactSizeIterator for Iter<'_> {
    delegate!(len);
}

impl ExactSizeIterator for IntoIter {
    delegate!(len);
}

#[cfg(test)]
mod tests {
    use super::Params;
    use crate::router::Pattern;

    #[test]
    fn from_captures() {
        let pattern = Pattern::compile("/products/:name(.:format)").unwrap();
        let caps = pattern.find("/products/caf%C3%A9.json").unwrap();
        let mut params = Params::from(&caps);

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("name"), Some("café"));
        assert_eq!(params.get("format"), Some("json"));
        assert_eq!(params.take("format"), Some("json".to_owned()));
        assert!(!params.contains("format"));

        let pairs: Vec<(String, String)> = params.into_iter().collect();
        assert_eq!(pairs, vec![("name".to_owned(), "café".to_owned())]);
    }

    #[test]
    fn parse_value() {
        let pattern = Pattern::compile("/items/:id").unwrap();
        let params = Params::from(&pattern.find("/items/42").unwrap());
        assert_eq!(params.parse::<u32>("id"), Some(Ok(42)));
        assert!(params.parse::<u32>("missing").is_none());
        assert_eq!(params.iter().rev().next(), Some(("id", "42")));
    }
}
