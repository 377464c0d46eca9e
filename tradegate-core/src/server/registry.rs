//! Command registry: maps request-type tags to command factories.
//!
//! Populate the registry during application startup (the composition
//! root), then hand it to the facade. At runtime `create()` instantiates
//! the appropriate command for each request.

use std::collections::HashMap;

use crate::model::{Request, RequestType};
use crate::server::command::Command;
use crate::server::ServerError;

/// Factory that produces a ready-to-execute command from a request.
pub type CommandFactory = Box<dyn Fn(Request) -> Box<dyn Command> + Send + Sync>;

/// Registry keyed by the raw request tag.
///
/// Registration is idempotent-overwrite: the latest factory for a tag
/// wins. There is no unregister operation.
#[derive(Default)]
pub struct CommandRegistry {
    factories: HashMap<u32, CommandFactory>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory for the given request type, overwriting any
    /// prior factory for the same type.
    pub fn register(&mut self, request_type: RequestType, factory: CommandFactory) {
        self.factories.insert(request_type.tag(), factory);
    }

    /// Builds the command for a request.
    ///
    /// # Returns
    ///
    /// * `Ok(command)` if a factory is registered for the request's tag.
    /// * `Err(ServerError::UnregisteredType)` otherwise.
    pub fn create(&self, request: Request) -> Result<Box<dyn Command>, ServerError> {
        let tag = request.get_tag();
        let factory = self
            .factories
            .get(&tag)
            .ok_or(ServerError::UnregisteredType(tag))?;
        Ok(factory(request))
    }
}
