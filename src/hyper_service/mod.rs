#![forbid(unsafe_code)]

mod service;

pub use self::service::DispatcherService;

type Request = hyper::Request<hyper::Body>;
type Response = hyper::Response<hyper::Body>;
