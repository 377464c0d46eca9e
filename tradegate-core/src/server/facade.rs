//! Request-dispatch facade: the sole error boundary of the gateway core.

use log::{debug, warn};

use crate::model::{Request, Response};
use crate::server::registry::CommandRegistry;
use crate::server::ServerError;

/// Routes decoded requests through the registry to their command and
/// converts every failure mode into a structured [`Response`].
///
/// No failure from registry lookup or command execution propagates past
/// [`handle`](Self::handle).
pub struct TradingServerFacade {
    registry: CommandRegistry,
}

impl TradingServerFacade {
    /// Creates a facade over an already-populated registry.
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    /// Dispatches one request and always returns a well-formed response.
    pub async fn handle(&self, request: Request) -> Response {
        debug!("dispatching request with tag {}", request.get_tag());

        let command = match self.registry.create(request) {
            Ok(command) => command,
            Err(err @ ServerError::UnregisteredType(_)) => {
                warn!("{}", err);
                return Response::failure(format!("Unknown request type: {}", err));
            }
        };

        match command.execute().await {
            Ok(response) => response,
            Err(err) => {
                warn!("command execution failed: {:#}", err);
                Response::failure(format!("Internal server error: {}", err))
            }
        }
    }
}
