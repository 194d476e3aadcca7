mod config;
mod context;
mod core;
mod error;
mod params;
mod render;
mod resource;
mod table;

pub use self::config::Config;
pub use self::context::DispatchContext;
pub use self::error::{BoxError, Family, HttpError, Panicked, StatusMismatch};
pub use self::params::{IntoIter, Iter, Params};
pub use self::render::{class_to_path, layout_candidates, Plain, Renderer, Subject, TwoStep, Views};
pub use self::resource::{DefaultFactory, Factory, Handler, Methods, Resource, ResourceType};
pub use self::table::{Descriptor, RouteTable};

use std::fmt;

type Observer = Box<dyn Fn(&BoxError) + Send + Sync>;
type Initializer = Box<dyn Fn(&mut DispatchContext) -> Result<(), HttpError> + Send + Sync>;

/// Routes requests through a [`RouteTable`] to resources.
///
/// A dispatcher is immutable once built and can be shared across threads.
pub struct Dispatcher {
    table: RouteTable,
    config: Config,
    factory: Box<dyn Factory>,
    renderer: Box<dyn Renderer>,
    observer: Observer,
    initializers: Vec<Initializer>,
}

impl Dispatcher {
    /// A dispatcher with the default configuration, the [`Plain`] renderer
    /// and an error observer that logs faults.
    pub fn new(table: RouteTable) -> Self {
        Self::builder(table).build()
    }

    pub fn builder(table: RouteTable) -> DispatcherBuilder {
        DispatcherBuilder {
            table,
            config: Config::default(),
            factory: None,
            renderer: None,
            observer: None,
            initializers: Vec::new(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("table", &self.table)
            .field("config", &self.config)
            .field("initializers", &self.initializers.len())
            .finish()
    }
}

pub struct DispatcherBuilder {
    table: RouteTable,
    config: Config,
    factory: Option<Box<dyn Factory>>,
    renderer: Option<Box<dyn Renderer>>,
    observer: Option<Observer>,
    initializers: Vec<Initializer>,
}

impl DispatcherBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn factory(mut self, factory: impl Factory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Observes every fault, that is every failure which is not an
    /// [`HttpError`], before it becomes `500 Internal Server Error`.
    pub fn on_error(mut self, f: impl Fn(&BoxError) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    /// Appends a step run on every request before routing, in the order
    /// registered. It may rewrite the method or the path, or stop the
    /// request with an error.
    pub fn initializer(
        mut self,
        f: impl Fn(&mut DispatchContext) -> Result<(), HttpError> + Send + Sync + 'static,
    ) -> Self {
        self.initializers.push(Box::new(f));
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            table: self.table,
            config: self.config,
            factory: self.factory.unwrap_or_else(|| Box::new(DefaultFactory)),
            renderer: self.renderer.unwrap_or_else(|| Box::new(Plain)),
            observer: self.observer.unwrap_or_else(|| Box::new(log_fault)),
            initializers: self.initializers,
        }
    }
}

fn log_fault(fault: &BoxError) {
    tracing::error!(error = %fault, "unhandled fault while dispatching");
}
