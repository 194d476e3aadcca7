use super::error::{BoxError, HttpError};
use super::params::Params;
use super::render::class_to_path;

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

use http::Method;

/// An HTTP resource: the adapter between a route and application logic.
///
/// A fresh instance is created for every request that matches one of the
/// resource's routes. The dispatcher then calls [`init`](Resource::init)
/// with the bound placeholders and runs the handler registered for the
/// request method.
pub trait Resource: Any + Sized {
    /// Registers the handlers of the methods this resource answers to.
    ///
    /// `HEAD` falls back to the `GET` handler when not registered.
    fn methods(methods: &mut Methods<Self>);

    /// Called after routing, before the method handler.
    fn init(&mut self, params: Params) -> Result<(), BoxError> {
        drop(params);
        Ok(())
    }

    /// Called after the method handler, before the response is rendered.
    fn finalize(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    /// The time this resource was last modified, checked after the handler.
    ///
    /// When it is `Some`, the response carries a `Last-Modified` header and
    /// a matching conditional request is answered with `304 Not Modified`.
    fn last_modified(&self) -> Option<SystemTime> {
        None
    }

    /// View keys tried by the renderer, most specific first.
    fn views() -> Vec<Cow<'static, str>> {
        vec![Cow::Owned(class_to_path(type_name::<Self>()))]
    }
}

pub type Handler<R> = Box<dyn Fn(&mut R) -> Result<(), BoxError> + Send + Sync>;

/// Method handlers of a resource.
pub struct Methods<R> {
    method_map: HashMap<Method, Handler<R>>,
}

impl<R: 'static> Methods<R> {
    pub fn new() -> Self {
        Self {
            method_map: HashMap::new(),
        }
    }

    pub fn on<F, E>(&mut self, method: Method, f: F) -> &mut Self
    where
        F: Fn(&mut R) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        let handler: Handler<R> = Box::new(move |r: &mut R| f(r).map_err(Into::into));
        self.method_map.insert(method, handler);
        self
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.lookup(method).is_some()
    }

    pub fn len(&self) -> usize {
        self.method_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.method_map.is_empty()
    }

    fn lookup(&self, method: &Method) -> Option<&Handler<R>> {
        match self.method_map.get(method) {
            Some(h) => Some(h),
            None if *method == Method::HEAD => self.method_map.get(&Method::GET),
            None => None,
        }
    }
}

impl<R: 'static> Default for Methods<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Methods<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.method_map.keys()).finish()
    }
}

macro_rules! define_method {
    ($name:tt, $method:tt) => {
        pub fn $name<F, E>(&mut self, f: F) -> &mut Self
        where
            F: Fn(&mut R) -> Result<(), E> + Send + Sync + 'static,
            E: Into<BoxError> + 'static,
        {
            self.on(Method::$method, f)
        }
    };
}

impl<R: 'static> Methods<R> {
    define_method!(get, GET);
    define_method!(post, POST);
    define_method!(put, PUT);
    define_method!(delete, DELETE);
    define_method!(head, HEAD);
    define_method!(options, OPTIONS);
    define_method!(patch, PATCH);
}

/// Identity of a resource type, as seen by factories and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType {
    name: &'static str,
    id: TypeId,
}

impl ResourceType {
    pub fn of<R: Any>() -> Self {
        Self {
            name: type_name::<R>(),
            id: TypeId::of::<R>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn is<R: Any>(&self) -> bool {
        self.id == TypeId::of::<R>()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Creates resource instances; lets applications inject dependencies.
///
/// Returning `None` leaves construction to the route's own constructor,
/// which is `Default::default` unless registered with
/// [`RouteTable::insert_with`](super::RouteTable::insert_with).
pub trait Factory: Send + Sync {
    fn create(&self, ty: &ResourceType) -> Option<Box<dyn Any>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl Factory for DefaultFactory {
    fn create(&self, _: &ResourceType) -> Option<Box<dyn Any>> {
        None
    }
}

impl<F> Factory for F
where
    F: Fn(&ResourceType) -> Option<Box<dyn Any>> + Send + Sync,
{
    fn create(&self, ty: &ResourceType) -> Option<Box<dyn Any>> {
        (self)(ty)
    }
}

pub(crate) struct Executed {
    pub(crate) instance: Box<dyn Any>,
    pub(crate) last_modified: Option<SystemTime>,
}

/// A resource type with its handlers, erased behind a route.
pub(crate) trait Endpoint: Send + Sync {
    fn ty(&self) -> &ResourceType;

    fn views(&self) -> &[Cow<'static, str>];

    fn allows(&self, method: &Method) -> bool;

    fn execute(
        &self,
        factory: &dyn Factory,
        method: &Method,
        params: Params,
    ) -> Result<Executed, BoxError>;
}

pub(crate) struct TypedEndpoint<R> {
    ty: ResourceType,
    views: Vec<Cow<'static, str>>,
    make: Box<dyn Fn() -> R + Send + Sync>,
    methods: Methods<R>,
}

impl<R: Resource> TypedEndpoint<R> {
    pub(crate) fn new(make: Box<dyn Fn() -> R + Send + Sync>) -> Self {
        let mut methods = Methods::new();
        R::methods(&mut methods);
        Self {
            ty: ResourceType::of::<R>(),
            views: R::views(),
            make,
            methods,
        }
    }

    fn instantiate(&self, factory: &dyn Factory) -> Result<Box<R>, BoxError> {
        match factory.create(&self.ty) {
            Some(any) => any.downcast::<R>().map_err(|_| {
                BoxError::from(format!("factory created a value that is not a {}", self.ty))
            }),
            None => Ok(Box::new((self.make)())),
        }
    }
}

impl<R: Resource> Endpoint for TypedEndpoint<R> {
    fn ty(&self) -> &ResourceType {
        &self.ty
    }

    fn views(&self) -> &[Cow<'static, str>] {
        &self.views
    }

    fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    fn execute(
        &self,
        factory: &dyn Factory,
        method: &Method,
        params: Params,
    ) -> Result<Executed, BoxError> {
        let handler = self
            .methods
            .lookup(method)
            .ok_or_else(HttpError::method_not_allowed)?;

        let mut resource = self.instantiate(factory)?;
        resource.init(params)?;
        handler(&mut *resource)?;
        resource.finalize()?;

        let last_modified = resource.last_modified();
        Ok(Executed {
            instance: resource,
            last_modified,
        })
    }
}
