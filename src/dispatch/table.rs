use super::resource::{Endpoint, Resource, ResourceType, TypedEndpoint};
use crate::router::{Captures, LinkError, Pattern, TemplateError};

use std::any::TypeId;
use std::fmt;

/// A route: a compiled template and the resource answering it.
pub struct Descriptor {
    pattern: Pattern,
    endpoint: Box<dyn Endpoint>,
}

impl Descriptor {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn resource_type(&self) -> &ResourceType {
        self.endpoint.ty()
    }

    /// Builds a path to this route from positional values.
    pub fn link<I>(&self, values: I) -> Result<String, LinkError>
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.pattern.link(values)
    }

    pub(crate) fn endpoint(&self) -> &dyn Endpoint {
        &*self.endpoint
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("pattern", &self.pattern.as_str())
            .field("resource", &self.endpoint.ty().name())
            .finish()
    }
}

/// Ordered routes. The first route whose template matches wins.
#[derive(Debug, Default)]
pub struct RouteTable {
    descriptors: Vec<Descriptor>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.descriptors.iter()
    }

    /// Finds the first route matching `path`.
    pub fn find<'s, 'p>(&'s self, path: &'p str) -> Option<(&'s Descriptor, Captures<'p>)>
    where
        's: 'p,
    {
        self.descriptors
            .iter()
            .find_map(|d| d.pattern.find(path).map(|caps| (d, caps)))
    }

    /// Appends a route for `R`, built with `Default` on each request.
    ///
    /// # Panics
    /// Panics if the template does not compile.
    pub fn insert<R: Resource + Default>(&mut self, template: &str) -> &mut Self {
        if let Err(e) = self.try_insert::<R>(template) {
            panic!("{}: pattern = {:?}", e, template);
        }
        self
    }

    pub fn try_insert<R: Resource + Default>(
        &mut self,
        template: &str,
    ) -> Result<&mut Self, TemplateError> {
        self.try_insert_with(template, R::default)
    }

    /// Appends a route for `R`, built with `make` on each request.
    ///
    /// # Panics
    /// Panics if the template does not compile.
    pub fn insert_with<R, F>(&mut self, template: &str, make: F) -> &mut Self
    where
        R: Resource,
        F: Fn() -> R + Send + Sync + 'static,
    {
        if let Err(e) = self.try_insert_with(template, make) {
            panic!("{}: pattern = {:?}", e, template);
        }
        self
    }

    pub fn try_insert_with<R, F>(&mut self, template: &str, make: F) -> Result<&mut Self, TemplateError>
    where
        R: Resource,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let pattern = Pattern::compile(template)?;
        let endpoint = TypedEndpoint::<R>::new(Box::new(make));
        self.descriptors.push(Descriptor {
            pattern,
            endpoint: Box::new(endpoint),
        });
        Ok(self)
    }

    /// Appends the routes built by `f`, with `base` prepended to each
    /// template.
    ///
    /// # Panics
    /// Panics if a joined template does not compile.
    pub fn nest(&mut self, base: &str, f: impl FnOnce(&mut RouteTable)) -> &mut Self {
        if let Err(e) = self.try_nest(base, f) {
            panic!("{}: prefix = {:?}", e, base);
        }
        self
    }

    pub fn try_nest(
        &mut self,
        base: &str,
        f: impl FnOnce(&mut RouteTable),
    ) -> Result<&mut Self, TemplateError> {
        let mut table = Self::new();
        f(&mut table);

        let mut nested = Vec::with_capacity(table.descriptors.len());
        for d in table.descriptors {
            nested.push(Descriptor {
                pattern: Pattern::with_base(base, d.pattern.as_str())?,
                endpoint: d.endpoint,
            });
        }
        self.descriptors.extend(nested);
        Ok(self)
    }

    /// Builds a path to the first route of `R`.
    pub fn link<R, I>(&self, values: I) -> Result<String, LinkError>
    where
        R: Resource,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let id = TypeId::of::<R>();
        self.descriptors
            .iter()
            .find(|d| d.endpoint.ty().id() == id)
            .ok_or_else(|| LinkError::UnknownResource(std::any::type_name::<R>()))?
            .link(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Methods;

    #[derive(Default)]
    struct A;

    #[derive(Default)]
    struct B;

    impl Resource for A {
        fn methods(_: &mut Methods<Self>) {}
    }

    impl Resource for B {
        fn methods(_: &mut Methods<Self>) {}
    }

    #[test]
    fn first_match_wins() {
        let mut table = RouteTable::new();
        table.insert::<A>("/:name").insert::<B>("/about");

        let (d, caps) = table.find("/about").unwrap();
        assert!(d.resource_type().is::<A>());
        assert_eq!(caps.get("name"), Some("about"));
        assert!(table.find("/a/b").is_none());
    }

    #[test]
    fn nested_base() {
        let mut table = RouteTable::new();
        table.nest("/v1/", |v1| {
            v1.insert::<A>("/a/:id");
        });
        table.insert::<B>("/b");

        let (d, _) = table.find("/v1/a/3").unwrap();
        assert_eq!(d.pattern().as_str(), "/v1/a/:id");
        assert_eq!(table.link::<A, _>(&[3]).unwrap(), "/v1/a/3");
        assert_eq!(table.link::<B, _>(Vec::<String>::new()).unwrap(), "/b");
    }

    #[test]
    fn unknown_resource_link() {
        let table = RouteTable::new();
        assert!(matches!(
            table.link::<A, _>(&["x"]),
            Err(LinkError::UnknownResource(_))
        ));
    }

    #[test]
    fn bad_template() {
        let mut table = RouteTable::new();
        assert!(table.try_insert::<A>("/a(/b").is_err());
        assert!(table.is_empty());
    }
}
