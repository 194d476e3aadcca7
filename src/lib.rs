#![forbid(unsafe_code)]

#[macro_use]
mod macros;

pub mod dispatch;
pub mod router;

#[cfg(feature = "hyper-service")]
pub mod hyper_service;

pub use crate::dispatch::{
    BoxError, Config, Dispatcher, DispatcherBuilder, HttpError, Methods, Params, Resource,
    RouteTable,
};
pub use crate::router::{Captures, LinkError, Pattern, TemplateError};

pub use http::Method;
