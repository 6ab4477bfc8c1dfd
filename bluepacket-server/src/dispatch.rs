//! Dispatch table mapping request packet types to handlers.

use crate::error::{HandlerError, ServerError};
use bluepacket_protocol::Packet;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

type Handler = Box<dyn Fn(Box<dyn Packet>) -> Result<Box<dyn Packet>, ServerError> + Send + Sync>;

type ErrorMapper = Box<dyn Fn(&ServerError) -> Option<Box<dyn Packet>> + Send + Sync>;

/// Request type to handler table plus the error mapper.
///
/// Built once through [`crate::ServerBuilder`] and read-only while
/// serving.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<TypeId, (&'static str, Handler)>,
    error_mapper: Option<ErrorMapper>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the handler for request type `P`, replacing any previous one.
    pub fn on_receive<P, R, F>(&mut self, handler: F)
    where
        P: Packet,
        R: Packet,
        F: Fn(P) -> Result<R, HandlerError> + Send + Sync + 'static,
    {
        let path = std::any::type_name::<P>();
        let name = path.rsplit("::").next().unwrap_or(path);
        let handler: Handler = Box::new(move |packet: Box<dyn Packet>| {
            let request = packet
                .downcast::<P>()
                .ok_or(ServerError::HandlerMissing { packet: name })?;
            match catch_unwind(AssertUnwindSafe(|| handler(*request))) {
                Ok(Ok(response)) => Ok(Box::new(response) as Box<dyn Packet>),
                Ok(Err(e)) => Err(ServerError::HandlerFailed(e)),
                Err(panic) => Err(ServerError::HandlerPanicked(panic_message(panic.as_ref()))),
            }
        });
        self.handlers.insert(TypeId::of::<P>(), (name, handler));
    }

    /// Installs the error mapper. Returning `None` sends no response.
    pub fn on_error<F>(&mut self, mapper: F)
    where
        F: Fn(&ServerError) -> Option<Box<dyn Packet>> + Send + Sync + 'static,
    {
        self.error_mapper = Some(Box::new(mapper));
    }

    /// Runs the handler registered for the request's concrete type.
    pub fn dispatch(&self, request: Box<dyn Packet>) -> Result<Box<dyn Packet>, ServerError> {
        match self.handlers.get(&request.as_any().type_id()) {
            Some((_, handler)) => handler(request),
            None => Err(ServerError::HandlerMissing {
                packet: request.packet_name(),
            }),
        }
    }

    /// Offers an error to the mapper.
    pub fn map_error(&self, error: &ServerError) -> Option<Box<dyn Packet>> {
        self.error_mapper.as_ref().and_then(|mapper| mapper(error))
    }

    pub fn handles<P: Packet>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<P>())
    }

    /// Names of the request types with handlers, sorted.
    pub fn handled_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.handlers.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }

    pub fn has_error_mapper(&self) -> bool {
        self.error_mapper.is_some()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
