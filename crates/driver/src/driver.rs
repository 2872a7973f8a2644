//! The entry point: turning a connection string into a connection.

use std::sync::Arc;

use tracing::{info_span, Instrument};

use bigquery_driver_configuration::environment::Environment;
use bigquery_driver_configuration::{resolve, ClientSettings, SCHEME};

use crate::client::{BigQueryClientFactory, ClientError, ClientFactory};
use crate::connection::{Connection, LiveConnection};
use crate::context::Context;
use crate::error::Error;

/// Opening this exact string returns [`Connection::Diagnostic`] without parsing anything.
pub const DIAGNOSTIC_TOKEN: &str = "scanner";

/// A driver turns connection strings into connections.
///
/// Opening is synchronous. Drivers hold no per-connection state, so one driver can serve any
/// number of threads at once.
pub trait Driver: Send + Sync {
    /// The name the driver is registered under.
    fn name(&self) -> &str;

    /// Open a connection, blocking the calling thread until the client is ready.
    ///
    /// Live connections drive their client on a runtime of their own, so this must not be
    /// called from within an async runtime; doing so fails with [`Error::NestedRuntime`].
    /// Likewise, a live connection must be dropped outside of any async runtime.
    fn open(&self, uri: &str) -> Result<Connection, Error>;
}

pub struct BigQueryDriver {
    factory: Arc<dyn ClientFactory>,
}

impl BigQueryDriver {
    pub fn new(factory: impl ClientFactory + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// A driver that authenticates with the service account key named in `settings`.
    pub fn from_settings<Env>(settings: ClientSettings, environment: Env) -> Self
    where
        Env: Environment + Send + Sync + 'static,
    {
        Self::new(BigQueryClientFactory::new(settings, environment))
    }

    /// Open a connection whose lifetime is bounded by `parent`.
    ///
    /// Cancelling `parent` while the client is being constructed aborts the construction, and
    /// cancelling it afterwards closes the connection. See [`Driver::open`] for the blocking
    /// behaviour.
    pub fn open_with_context(&self, uri: &str, parent: &Context) -> Result<Connection, Error> {
        if uri == DIAGNOSTIC_TOKEN {
            tracing::debug!("opening diagnostic connection");
            return Ok(Connection::Diagnostic);
        }

        // Note that we don't log validation errors as errors: a bad connection string is the
        // caller's problem, not a fault in the driver.
        let configuration = resolve(uri).map_err(|error| {
            tracing::debug!(%error, "rejected connection string");
            error
        })?;

        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::NestedRuntime);
        }

        let context = parent.child();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        let construct_client = async {
            tokio::select! {
                biased;
                () = context.cancelled() => Err(ClientError::Cancelled),
                result = self.factory.new_client(
                    &context,
                    configuration.project_id(),
                    configuration.scopes(),
                ) => result,
            }
        }
        .instrument(info_span!(
            "Construct client",
            project_id = configuration.project_id(),
            location = configuration.location(),
            data_set = configuration.data_set(),
        ));

        let client = runtime.block_on(construct_client).map_err(|err| {
            tracing::error!(
                meta.signal_type = "log",
                event.domain = "bigquery",
                event.name = "Client construction error",
                name = "Client construction error",
                body = %err,
                error = true,
            );
            Error::ClientConstruction(err)
        })?;

        Ok(Connection::Live(LiveConnection::new(
            runtime,
            context,
            client,
            configuration,
        )))
    }
}

impl Driver for BigQueryDriver {
    fn name(&self) -> &str {
        SCHEME
    }

    fn open(&self, uri: &str) -> Result<Connection, Error> {
        self.open_with_context(uri, &Context::background())
    }
}
