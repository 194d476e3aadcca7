use super::config::Config;
use super::context::DispatchContext;
use super::error::{BoxError, Family, HttpError, Panicked};
use super::params::Params;
use super::render::{Renderer, Subject};
use super::resource::{Executed, Resource};
use super::table::Descriptor;
use super::Dispatcher;
use crate::router::LinkError;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use http::{Request, Response, StatusCode};

enum Completed<'s> {
    Rendered {
        descriptor: &'s Descriptor,
        executed: Executed,
        last_modified: Option<String>,
    },
    NotModified {
        last_modified: String,
    },
}

impl Dispatcher {
    /// Routes `req` to its resource and produces the response.
    ///
    /// Every failure is turned into a response; nothing escapes.
    pub fn dispatch<B>(&self, req: &Request<B>) -> Response<Vec<u8>> {
        let outcome = self.run(req);
        self.respond(outcome)
    }

    /// Builds a path to the first route of `R`, under the mount point.
    pub fn link<R, I>(&self, values: I) -> Result<String, LinkError>
    where
        R: Resource,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let path = self.table.link::<R, I>(values)?;
        Ok(match self.config.mount_point() {
            Some(mount) if path == "/" => mount.to_owned(),
            Some(mount) => format!("{}{}", mount, path),
            None => path,
        })
    }

    /// Builds an absolute URL to the first route of `R`, on the host `req`
    /// was sent to.
    ///
    /// The host is taken from `X-Forwarded-Host`, then `Host`, then the
    /// request URI; the scheme from the request URI, then
    /// `X-Forwarded-Proto`, defaulting to `http`. The port is left out when
    /// it is the scheme's default.
    pub fn url<R, B, I>(&self, req: &Request<B>, values: I) -> Result<String, LinkError>
    where
        R: Resource,
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let origin = origin(req).ok_or(LinkError::MissingHost)?;
        let path = self.link::<R, I>(values)?;
        Ok(format!("{}{}", origin, path))
    }

    fn run<B>(&self, req: &Request<B>) -> Result<Completed<'_>, HttpError> {
        let mut ctx = DispatchContext::from_request(req, &self.config)?;
        for init in self.initializers.iter() {
            self.guard(|| init(&mut ctx).map_err(BoxError::from))?;
        }
        let method = ctx.method();

        let (descriptor, captures) = match self.table.find(ctx.path()) {
            Some(found) => found,
            None => {
                tracing::debug!(%method, path = ctx.path(), "no route matched");
                return Err(HttpError::not_found());
            }
        };

        tracing::debug!(
            %method,
            path = ctx.path(),
            pattern = descriptor.pattern().as_str(),
            resource = descriptor.resource_type().name(),
            "route matched"
        );

        let endpoint = descriptor.endpoint();
        if !self.config.allows(method) || !endpoint.allows(method) {
            tracing::warn!(%method, path = ctx.path(), "method not allowed");
            return Err(HttpError::method_not_allowed());
        }

        let params = Params::from(&captures);
        drop(captures);

        let executed = self.guard(|| endpoint.execute(&*self.factory, method, params))?;

        let last_modified = executed.last_modified.map(httpdate::fmt_http_date);
        if let Some(value) = last_modified.as_deref() {
            if ctx.conditional() == Some(value) {
                return Ok(Completed::NotModified {
                    last_modified: value.to_owned(),
                });
            }
        }

        Ok(Completed::Rendered {
            descriptor,
            executed,
            last_modified,
        })
    }

    fn respond(&self, outcome: Result<Completed<'_>, HttpError>) -> Response<Vec<u8>> {
        match outcome {
            Ok(Completed::Rendered {
                descriptor,
                executed,
                last_modified,
            }) => {
                let endpoint = descriptor.endpoint();
                let subject = Subject::Resource {
                    ty: endpoint.ty(),
                    views: endpoint.views(),
                    instance: &*executed.instance,
                };
                match self.guard(|| self.renderer.render(&subject)) {
                    Ok(body) => {
                        let mut res = Response::new(body);
                        set_last_modified(&mut res, last_modified.as_deref());
                        res
                    }
                    Err(e) => self.respond_error(e),
                }
            }
            Ok(Completed::NotModified { last_modified }) => {
                let mut res = empty(StatusCode::NOT_MODIFIED);
                set_last_modified(&mut res, Some(&last_modified));
                res
            }
            Err(e) => self.respond_error(e),
        }
    }

    fn respond_error(&self, error: HttpError) -> Response<Vec<u8>> {
        let status = error.status();
        match error.family() {
            Family::Redirect => {
                let location = error.location().unwrap_or("/");
                let value = match HeaderValue::from_str(location) {
                    Ok(v) => v,
                    Err(e) => return self.respond_error(self.classify(Box::new(e))),
                };
                let body = format!("{}: {}", error.reason(), location).into_bytes();
                let mut res = Response::new(body);
                *res.status_mut() = status;
                res.headers_mut().insert(LOCATION, value);
                res.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                );
                res
            }
            Family::NoRender => empty(status),
            Family::Render => {
                let subject = Subject::Error(&error);
                // the observer already saw a faulty renderer; keep the status
                let body = self
                    .guard(|| self.renderer.render(&subject))
                    .unwrap_or_default();
                let mut res = Response::new(body);
                *res.status_mut() = status;
                res
            }
        }
    }

    /// Runs `f`, classifying its failure (and its panic, if configured).
    fn guard<T>(&self, f: impl FnOnce() -> Result<T, BoxError>) -> Result<T, HttpError> {
        let ret = if self.config.catch_panics {
            match panic::catch_unwind(AssertUnwindSafe(f)) {
                Ok(ret) => ret,
                Err(payload) => Err(Box::new(Panicked(panic_message(payload))) as BoxError),
            }
        } else {
            f()
        };
        ret.map_err(|e| self.classify(e))
    }

    /// Recognized HTTP errors pass through; anything else is reported to the
    /// observer once and becomes `500 Internal Server Error`.
    fn classify(&self, err: BoxError) -> HttpError {
        match err.downcast::<HttpError>() {
            Ok(e) => *e,
            Err(fault) => {
                (self.observer)(&fault);
                HttpError::internal(fault)
            }
        }
    }
}

fn empty(status: StatusCode) -> Response<Vec<u8>> {
    let mut res = Response::new(Vec::new());
    *res.status_mut() = status;
    res
}

fn set_last_modified(res: &mut Response<Vec<u8>>, value: Option<&str>) {
    if let Some(v) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
        res.headers_mut().insert(LAST_MODIFIED, v);
    }
}

fn origin<B>(req: &Request<B>) -> Option<String> {
    let uri = req.uri();
    let headers = req.headers();

    let scheme = uri
        .scheme_str()
        .or_else(|| first_value(headers, "x-forwarded-proto"))
        .unwrap_or("http");
    let host = first_value(headers, "x-forwarded-host")
        .or_else(|| first_value(headers, "host"))
        .or_else(|| uri.host())?;

    let mut origin = format!("{}://{}", scheme, host);
    let default_port = if scheme.eq_ignore_ascii_case("https") { 443 } else { 80 };
    // "[::1]" has colons but no port
    let has_port = host.rsplit(']').next().map_or(false, |h| h.contains(':'));
    if !has_port {
        if let Some(port) = uri.port_u16().filter(|&p| p != default_port) {
            origin.push(':');
            origin.push_str(&port.to_string());
        }
    }
    Some(origin)
}

/// First entry of a possibly comma separated header, as proxies append.
fn first_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_owned()
    }
}
