//! Fake collaborators that never touch the network.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use gcp_bigquery_client::error::BQError;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::ResultSet;

use bigquery_driver::{ClientError, ClientFactory, Context, QueryClient};

/// What a [`RecordingClientFactory`] does when asked for a client.
#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed,
    Fail(String),
    /// Never finish; only cancellation gets the caller out.
    Hang,
}

/// A call made to a [`RecordingClientFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRequest {
    pub project_id: String,
    pub scopes: Vec<String>,
}

/// A client factory that records every request and answers with a fixed outcome.
#[derive(Debug)]
pub struct RecordingClientFactory {
    outcome: Outcome,
    requests: Mutex<Vec<ClientRequest>>,
}

impl RecordingClientFactory {
    pub fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(Outcome::Succeed)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(Outcome::Fail(message.to_string()))
    }

    pub fn hanging() -> Arc<Self> {
        Self::new(Outcome::Hang)
    }

    pub fn requests(&self) -> Vec<ClientRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ClientFactory for RecordingClientFactory {
    async fn new_client(
        &self,
        _context: &Context,
        project_id: &str,
        scopes: &[String],
    ) -> Result<Arc<dyn QueryClient>, ClientError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ClientRequest {
                project_id: project_id.to_string(),
                scopes: scopes.to_vec(),
            });

        match &self.outcome {
            Outcome::Succeed => Ok(Arc::new(HangingClient)),
            Outcome::Fail(message) => Err(ClientError::Other(message.clone())),
            Outcome::Hang => std::future::pending().await,
        }
    }
}

/// A client whose queries never complete.
#[derive(Debug)]
pub struct HangingClient;

#[async_trait]
impl QueryClient for HangingClient {
    async fn query(&self, _project_id: &str, _request: QueryRequest) -> Result<ResultSet, BQError> {
        std::future::pending().await
    }
}
