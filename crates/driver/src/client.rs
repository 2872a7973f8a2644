//! Construction of the clients that connections run queries through.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_bigquery_client::error::BQError;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::ResultSet;
use tracing::{info_span, Instrument};

use bigquery_driver_configuration::environment::{self, Environment};
use bigquery_driver_configuration::ClientSettings;

use crate::context::Context;

pub const BIGQUERY_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery.readonly";

/// The client could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("client construction was cancelled")]
    Cancelled,
    #[error("unable to read the service account key: {0}")]
    Credentials(#[from] environment::Error),
    #[error("invalid service account key: {0}")]
    ServiceKey(#[source] std::io::Error),
    #[error("unable to authenticate: {0}")]
    Auth(#[from] yup_oauth2::Error),
    #[error("unable to create bigquery client: {0}")]
    BigQuery(#[from] BQError),
    #[error("{0}")]
    Other(String),
}

/// The part of a BigQuery client that connections use.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn query(&self, project_id: &str, request: QueryRequest) -> Result<ResultSet, BQError>;
}

#[async_trait]
impl QueryClient for gcp_bigquery_client::Client {
    async fn query(&self, project_id: &str, request: QueryRequest) -> Result<ResultSet, BQError> {
        self.job().query(project_id, request).await
    }
}

/// Builds a client for a project, requesting the given permission scopes.
///
/// An empty scope list means the default scope. Implementations may take arbitrarily long;
/// the driver stops polling the returned future once `context` is cancelled.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn new_client(
        &self,
        context: &Context,
        project_id: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn QueryClient>, ClientError>;
}

#[async_trait]
impl<F: ClientFactory + ?Sized> ClientFactory for Arc<F> {
    async fn new_client(
        &self,
        context: &Context,
        project_id: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn QueryClient>, ClientError> {
        (**self).new_client(context, project_id, scopes).await
    }
}

/// Creates `gcp_bigquery_client` clients authenticated with a service account key.
pub struct BigQueryClientFactory<Env: Environment> {
    settings: ClientSettings,
    environment: Env,
}

impl<Env: Environment> BigQueryClientFactory<Env> {
    pub fn new(settings: ClientSettings, environment: Env) -> Self {
        Self {
            settings,
            environment,
        }
    }
}

#[async_trait]
impl<Env: Environment + Send + Sync> ClientFactory for BigQueryClientFactory<Env> {
    async fn new_client(
        &self,
        _context: &Context,
        project_id: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn QueryClient>, ClientError> {
        let service_key = self.settings.service_key(&self.environment)?;
        let service_account_key =
            yup_oauth2::parse_service_account_key(service_key).map_err(ClientError::ServiceKey)?;

        // The client library only distinguishes read-only from read-write access, so explicit
        // scopes are checked by asking for a token with exactly those scopes.
        if !scopes.is_empty() {
            let authenticator =
                yup_oauth2::ServiceAccountAuthenticator::builder(service_account_key.clone())
                    .build()
                    .await
                    .map_err(ClientError::ServiceKey)?;
            authenticator
                .token(scopes)
                .instrument(info_span!("Acquire token"))
                .await?;
        }

        let client = gcp_bigquery_client::Client::from_service_account_key(
            service_account_key,
            is_read_only(scopes),
        )
        .instrument(info_span!("Create bigquery client"))
        .await?;

        tracing::debug!(project_id, "constructed bigquery client");

        Ok(Arc::new(client))
    }
}

fn is_read_only(scopes: &[String]) -> bool {
    !scopes.is_empty() && scopes.iter().all(|scope| scope == BIGQUERY_READONLY_SCOPE)
}
