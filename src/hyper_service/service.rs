use super::{Request, Response};
use crate::dispatch::Dispatcher;

use std::convert::Infallible;
use std::future::{ready, Ready};
use std::sync::Arc;
use std::task::{Context, Poll};

use hyper::service::Service;
use hyper::Body;

/// Serves a shared [`Dispatcher`] over hyper.
///
/// Dispatch is synchronous and every failure is already a response, so the
/// service never fails.
#[derive(Debug, Clone)]
pub struct DispatcherService {
    dispatcher: Arc<Dispatcher>,
}

impl DispatcherService {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl From<Dispatcher> for DispatcherService {
    fn from(dispatcher: Dispatcher) -> Self {
        Self::new(Arc::new(dispatcher))
    }
}

impl Service<Request> for DispatcherService {
    type Response = Response;
    type Error = Infallible;
    type Future = Ready<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let res = self.dispatcher.dispatch(&req).map(Body::from);
        ready(Ok(res))
    }
}

impl Dispatcher {
    /// Wraps the dispatcher into a cloneable hyper service.
    pub fn into_service(self) -> DispatcherService {
        DispatcherService::from(self)
    }
}
