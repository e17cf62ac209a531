use fert_core::errors::{ErrorInfo, FertError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Sends a GraphQL document and returns the `data` member of the response.
pub trait GraphqlClient {
    /// Executes `document` with `variables`.
    fn query(&self, document: &str, variables: Value) -> Result<Value, FertError>;
}

impl<T: GraphqlClient + ?Sized> GraphqlClient for &T {
    fn query(&self, document: &str, variables: Value) -> Result<Value, FertError> {
        (**self).query(document, variables)
    }
}

/// Wire shape of a GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    /// Payload; absent when the query failed entirely.
    #[serde(default)]
    pub data: Option<Value>,
    /// Errors reported by the server.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    /// Server supplied message.
    pub message: String,
}

impl GraphqlResponse {
    /// Returns `data`, or a transport error when the server reported errors.
    pub fn into_data(self) -> Result<Value, FertError> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|err| err.message).collect();
            return Err(FertError::Transport(
                ErrorInfo::new("fert_source.graphql_errors", messages.join("; "))
                    .with_context("count", messages.len().to_string()),
            ));
        }
        match self.data {
            Some(Value::Null) | None => Err(FertError::Transport(ErrorInfo::new(
                "fert_source.graphql_empty",
                "GraphQL response carried no data",
            ))),
            Some(data) => Ok(data),
        }
    }
}

/// Blocking HTTP GraphQL client.
#[derive(Debug, Clone)]
pub struct HttpGraphqlClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpGraphqlClient {
    /// Creates a client posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::Agent::new(),
        }
    }

    /// Endpoint the client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, code: &str, err: impl ToString) -> FertError {
        FertError::Transport(
            ErrorInfo::new(code, err.to_string()).with_context("endpoint", self.endpoint.clone()),
        )
    }
}

impl GraphqlClient for HttpGraphqlClient {
    fn query(&self, document: &str, variables: Value) -> Result<Value, FertError> {
        debug!(endpoint = %self.endpoint, %variables, "graphql query");
        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(json!({ "query": document, "variables": variables }))
            .map_err(|err| self.transport_error("fert_source.graphql_request", err))?;
        let body: GraphqlResponse = response
            .into_json()
            .map_err(|err| self.transport_error("fert_source.graphql_decode", err))?;
        body.into_data()
    }
}
