// Copyright (c) 2025 Mauka MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Handler chain types and the per-request context that runs them.
//!
//! The router stores only [`Handlers`]. Every other handler shape is turned
//! into a [`Handler`] at registration time through one of the adapters on
//! this type.

use std::fmt;
use std::sync::Arc;

use super::method::Method;
use super::params::PathParameters;

/// Status used when no handler writes one.
pub const STATUS_OK: u16 = 200;
/// Status written by the default not-found handler.
pub const STATUS_NOT_FOUND: u16 = 404;

/// An incoming request as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request method.
    pub method: Method,
    /// Value of the `Host` header, including any port.
    pub host: String,
    /// Request path, without the query string.
    pub path: String,
}

impl Request {
    /// Creates a request.
    pub fn new<H: Into<String>, P: Into<String>>(method: Method, host: H, path: P) -> Self {
        Self {
            method,
            host: host.into(),
            path: path.into(),
        }
    }
}

/// The response being built for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: STATUS_OK,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Creates a response with the given status and body.
    pub fn new<B: Into<Vec<u8>>>(status: u16, body: B) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Returns the first value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets header `name`, replacing any previous value.
    pub fn set_header<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// The body decoded as UTF-8, lossily.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A request handler that produces a whole response from the request and
/// the captured parameters.
pub trait Endpoint: Send + Sync + 'static {
    /// Builds the response.
    fn respond(&self, request: &Request, params: &PathParameters) -> Response;
}

impl<F> Endpoint for F
where
    F: Fn(&Request, &PathParameters) -> Response + Send + Sync + 'static,
{
    fn respond(&self, request: &Request, params: &PathParameters) -> Response {
        self(request, params)
    }
}

type HandlerFn = dyn Fn(&mut Context) + Send + Sync;

/// The canonical handler type stored in route trees.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

/// An ordered handler chain.
pub type Handlers = Arc<[Handler]>;

impl Handler {
    /// Wraps a closure operating on the request context.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Adapts an [`Endpoint`]. The endpoint's response replaces whatever the
    /// chain has written so far.
    pub fn from_endpoint<E: Endpoint>(endpoint: E) -> Self {
        Self::new(move |ctx: &mut Context| {
            let response = endpoint.respond(&ctx.request, &ctx.params);
            ctx.response = response;
        })
    }

    /// A handler that writes `text` to the response body.
    pub fn text<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        Self::new(move |ctx: &mut Context| ctx.write(text.as_bytes()))
    }

    /// Runs the handler.
    pub fn call(&self, ctx: &mut Context) {
        (self.0)(ctx)
    }

    /// Returns `true` if both handles point at the same function.
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0))
    }
}

/// Per-request state: the request, captured parameters, the response under
/// construction and the position in the handler chain.
///
/// A context can be reset and reused for the next request; the parameter
/// buffer keeps its allocation across resets.
#[derive(Debug)]
pub struct Context {
    request: Request,
    params: PathParameters,
    response: Response,
    handlers: Handlers,
    position: usize,
    stopped: bool,
}

impl Context {
    /// Creates a context for `request` with an empty handler chain.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            params: PathParameters::new(),
            response: Response::default(),
            handlers: Arc::from(Vec::new()),
            position: 0,
            stopped: false,
        }
    }

    /// Prepares the context for another request.
    pub fn reset(&mut self, request: Request) {
        self.request = request;
        self.params.clear();
        self.response = Response::default();
        self.handlers = Arc::from(Vec::new());
        self.position = 0;
        self.stopped = false;
    }

    /// The request being served.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Parameters captured from the request path.
    pub fn params(&self) -> &PathParameters {
        &self.params
    }

    /// Shorthand for `params().get(key)`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// The response built so far.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Consumes the context and returns the response.
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: u16) {
        self.response.status = status;
    }

    /// Sets a response header.
    pub fn set_header<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.response.set_header(name, value);
    }

    /// Appends bytes to the response body.
    pub fn write(&mut self, bytes: &[u8]) {
        self.response.body.extend_from_slice(bytes);
    }

    /// Answers with a redirect to `location`.
    pub fn redirect(&mut self, location: &str, status: u16) {
        self.response.set_header("Location", location);
        self.response.status = status;
    }

    /// The handler chain installed for this request.
    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    /// Prevents the remaining handlers of the chain from running.
    pub fn stop_execution(&mut self) {
        self.stopped = true;
    }

    /// Returns `true` once `stop_execution` was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Runs the installed chain in order, starting after the last handler
    /// that ran, until it ends or a handler stops execution.
    pub fn serve(&mut self) {
        while !self.stopped && self.position < self.handlers.len() {
            let handler = self.handlers[self.position].clone();
            self.position += 1;
            handler.call(self);
        }
    }

    pub(crate) fn set_handlers(&mut self, handlers: Handlers) {
        self.handlers = handlers;
        self.position = 0;
    }

    pub(crate) fn lookup_parts(&mut self) -> (&Request, &mut PathParameters) {
        (&self.request, &mut self.params)
    }
}
