//! Connections handed out by the driver.

use std::fmt;
use std::sync::Arc;

use gcp_bigquery_client::model::dataset_reference::DatasetReference;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::ResultSet;
use tokio::runtime::Runtime;
use tracing::{info_span, Instrument};

use bigquery_driver_configuration::Configuration;

use crate::client::QueryClient;
use crate::context::Context;
use crate::error::Error;

/// A connection returned by the driver.
///
/// Both variants support the same operations; the diagnostic stub never touches the network
/// and refuses anything that would.
#[derive(Debug)]
pub enum Connection {
    Live(LiveConnection),
    Diagnostic,
}

impl Connection {
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Connection::Diagnostic)
    }

    /// The resolved configuration, if this is a live connection.
    pub fn configuration(&self) -> Option<&Configuration> {
        match self {
            Connection::Live(live) => Some(&live.configuration),
            Connection::Diagnostic => None,
        }
    }

    /// Prepare a statement for execution on this connection.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>, Error> {
        match self {
            Connection::Live(live) if live.is_closed() => Err(Error::Closed),
            Connection::Live(live) => Ok(Statement {
                connection: live,
                sql: sql.to_string(),
            }),
            Connection::Diagnostic => Err(Error::Unsupported(
                "preparing statements on a diagnostic connection",
            )),
        }
    }

    /// Transactions are not supported.
    pub fn begin(&mut self) -> Result<(), Error> {
        match self {
            Connection::Live(live) if live.is_closed() => Err(Error::Closed),
            Connection::Live(_) | Connection::Diagnostic => {
                Err(Error::Unsupported("transactions"))
            }
        }
    }

    /// Close the connection. Closing twice is harmless.
    pub fn close(&mut self) -> Result<(), Error> {
        if let Connection::Live(live) = self {
            tracing::debug!(
                project_id = live.configuration.project_id(),
                "closing connection"
            );
            live.context.cancel();
        }
        Ok(())
    }
}

/// A connection backed by a BigQuery client.
///
/// The connection owns the runtime that drives its client, so its methods block the calling
/// thread and must not be called from within an async runtime.
pub struct LiveConnection {
    runtime: Runtime,
    context: Context,
    client: Arc<dyn QueryClient>,
    configuration: Configuration,
}

impl LiveConnection {
    pub(crate) fn new(
        runtime: Runtime,
        context: Context,
        client: Arc<dyn QueryClient>,
        configuration: Configuration,
    ) -> Self {
        Self {
            runtime,
            context,
            client,
            configuration,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The context the connection was opened under. Cancelling it closes the connection.
    pub fn context(&self) -> &Context {
        &self.context
    }

    fn is_closed(&self) -> bool {
        self.context.is_cancelled()
    }
}

impl fmt::Debug for LiveConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveConnection")
            .field("context", &self.context)
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

/// A SQL statement bound to a live connection.
#[derive(Debug)]
pub struct Statement<'a> {
    connection: &'a LiveConnection,
    sql: String,
}

impl Statement<'_> {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Run the statement and return the rows it produced.
    ///
    /// Blocks until the query completes or the connection's context is cancelled. Fails with
    /// [`Error::NestedRuntime`] when called from within an async runtime.
    pub fn query(&self) -> Result<ResultSet, Error> {
        let connection = self.connection;
        if connection.is_closed() {
            return Err(Error::Closed);
        }
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::NestedRuntime);
        }

        let configuration = &connection.configuration;
        let request = query_request(configuration, &self.sql);

        connection.runtime.block_on(async {
            tokio::select! {
                biased;
                () = connection.context.cancelled() => Err(Error::Cancelled),
                result = connection
                    .client
                    .query(configuration.project_id(), request)
                    .instrument(info_span!("Execute query")) => result.map_err(Error::from),
            }
        })
    }
}

/// Build a request that runs `sql` against the configured dataset, in the configured location.
fn query_request(configuration: &Configuration, sql: &str) -> QueryRequest {
    let mut request = QueryRequest::new(sql.to_string());
    request.default_dataset = Some(DatasetReference {
        dataset_id: configuration.data_set().to_string(),
        project_id: configuration.project_id().to_string(),
    });
    if !configuration.location().is_empty() {
        request.location = Some(configuration.location().to_string());
    }
    request
}
