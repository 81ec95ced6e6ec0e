use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tl_core::{Collection, RowId};
use tracing::debug;

use crate::{RowStore, StoreError};

/// Default request timeout for store calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the spreadsheet web app.
///
/// Lists are `GET {url}?tab=NAME`; mutations are a `POST {url}` whose body is
/// JSON sent as `text/plain` (the web app rejects preflighted requests).
/// The web app always answers HTTP 200, so an `error` field in the body is
/// treated as a failure too.
#[derive(Clone)]
pub struct HttpRowStore {
    http: reqwest::Client,
    url: String,
}

impl fmt::Debug for HttpRowStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRowStore")
            .field("url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpRowStore {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotConfigured`] if the URL is missing or blank,
    /// or an error if the HTTP client fails to build.
    pub fn new(url: Option<&str>, timeout: Duration) -> Result<Self, StoreError> {
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        let Some(url) = url else {
            return Err(StoreError::NotConfigured);
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoreError::ClientBuild)?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    async fn post(&self, action: Action<'_>) -> Result<(), StoreError> {
        let collection = action.collection;
        let verb = action.action;
        let body = serde_json::to_string(&action)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        debug!(collection = %collection, action = verb, "posting row mutation");

        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                action: verb,
                collection,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: Envelope = serde_json::from_str(&body)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        payload.check()?;
        Ok(())
    }
}

impl RowStore for HttpRowStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Vec<String>>, StoreError> {
        debug!(collection = %collection, "fetching rows");
        let response = self
            .http
            .get(&self.url)
            .query(&[("tab", collection.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                action: "list",
                collection,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: Envelope = serde_json::from_str(&body)
            .map_err(|err| StoreError::InvalidResponse(err.to_string()))?;
        let values = payload.check()?;
        Ok(values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(&self, collection: Collection, row: Vec<String>) -> Result<(), StoreError> {
        self.post(Action {
            tab: collection.as_str(),
            collection,
            id: None,
            row_data: Some(row),
            action: "append",
        })
        .await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &RowId,
        row: Vec<String>,
    ) -> Result<(), StoreError> {
        self.post(Action {
            tab: collection.as_str(),
            collection,
            id: Some(id.as_str()),
            row_data: Some(row),
            action: "update",
        })
        .await
    }

    async fn delete(&self, collection: Collection, id: &RowId) -> Result<(), StoreError> {
        self.post(Action {
            tab: collection.as_str(),
            collection,
            id: Some(id.as_str()),
            row_data: None,
            action: "delete",
        })
        .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Action<'a> {
    tab: &'static str,
    #[serde(skip)]
    collection: Collection,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_data: Option<Vec<String>>,
    action: &'static str,
}

/// Response body shared by every call.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
    #[serde(default)]
    error: Option<Value>,
}

impl Envelope {
    fn check(self) -> Result<Vec<Vec<Value>>, StoreError> {
        if let Some(error) = self.error {
            let message = match error {
                Value::String(message) => message,
                other => other.to_string(),
            };
            return Err(StoreError::Api { message });
        }
        Ok(self.values.unwrap_or_default())
    }
}

/// Renders one spreadsheet cell as the string a record field carries.
fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
        other => other.to_string(),
    }
}
