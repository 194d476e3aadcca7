use std::borrow::Cow;
use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Placeholder values of a successful match, in template order.
///
/// Only placeholders that took part in the match are present, and every
/// value is already percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'a> {
    pub(super) buf: SmallVec<[(&'a str, Cow<'a, str>); 8]>,
}

impl Captures<'_> {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if name == *k { Some(&**v) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.buf.iter().map(|&(k, _)| k)
    }
}

impl<'a> Deref for Captures<'a> {
    type Target = [(&'a str, Cow<'a, str>)];
    fn deref(&self) -> &Self::Target {
        &*self.buf
    }
}

impl Captures<'_> {
    pub(super) fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }
}
