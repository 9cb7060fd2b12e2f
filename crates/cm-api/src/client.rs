//! Blocking HTTP client for the management API.
//!
//! Every request carries the session token twice, as the `Session-Token`
//! header and as `Authorization: Session <token>`, matching what the
//! server's middleware expects.

use crate::entity::EntityKind;
use cm_common::{Error, RecordId, Result, SessionToken};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Blocking client bound to one server and one session.
pub struct ApiClient {
    base_url: String,
    token: SessionToken,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Create a client for the given server.
    ///
    /// The base URL must not end with a slash; paths are appended as
    /// `/api/{entity}/{op}/`.
    pub fn new(base_url: impl Into<String>, token: SessionToken, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(ApiClient {
            base_url: base_url.into(),
            token,
            http,
        })
    }

    fn url(&self, kind: EntityKind, op: &str) -> String {
        format!("{}/api/{}/{}/", self.base_url, kind.segment(), op)
    }

    fn authed(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        req.header("Session-Token", self.token.expose())
            .header(
                "Authorization",
                format!("Session {}", self.token.expose()),
            )
    }

    fn check_status(
        &self,
        response: reqwest::blocking::Response,
        path: &str,
    ) -> Result<reqwest::blocking::Response> {
        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::SessionRejected {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    /// Fetch all records of one kind.
    pub fn list_all<T: DeserializeOwned>(&self, kind: EntityKind) -> Result<Vec<T>> {
        let url = self.url(kind, "list-all");
        debug!(entity = %kind, "fetching records");

        let response = self
            .authed(self.http.get(&url))
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        let response = self.check_status(response, &url)?;

        response.json().map_err(|e| Error::Decode(e.to_string()))
    }

    /// Create one record from a JSON object of field values.
    pub fn create_new(&self, kind: EntityKind, payload: &serde_json::Value) -> Result<()> {
        if !kind.is_mutable() {
            return Err(Error::ReadOnlyEntity(kind.to_string()));
        }
        let url = self.url(kind, "create-new");
        debug!(entity = %kind, "creating record");

        let response = self
            .authed(self.http.post(&url).json(payload))
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        self.check_status(response, &url)?;
        Ok(())
    }

    /// Update one record, identified by a `{singular}_id` query parameter.
    pub fn edit(&self, kind: EntityKind, id: RecordId, payload: &serde_json::Value) -> Result<()> {
        if !kind.is_mutable() {
            return Err(Error::ReadOnlyEntity(kind.to_string()));
        }
        let url = format!(
            "{}?{}_id={}",
            self.url(kind, "edit"),
            kind.singular(),
            id
        );
        debug!(entity = %kind, %id, "editing record");

        let response = self
            .authed(self.http.put(&url).json(payload))
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        self.check_status(response, &url)?;
        Ok(())
    }

    /// Delete records by ID. The server expects `{"element_ids": [..]}`.
    pub fn delete(&self, kind: EntityKind, ids: &[RecordId]) -> Result<()> {
        if !kind.is_mutable() {
            return Err(Error::ReadOnlyEntity(kind.to_string()));
        }
        if ids.is_empty() {
            return Ok(());
        }
        let url = self.url(kind, "delete");
        debug!(entity = %kind, count = ids.len(), "deleting records");

        let body = json!({ "element_ids": ids });
        let response = self
            .authed(self.http.delete(&url).json(&body))
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        self.check_status(response, &url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(
            "http://127.0.0.1:8000",
            SessionToken::new("tok"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_url_shape() {
        let client = test_client();
        assert_eq!(
            client.url(EntityKind::Customers, "list-all"),
            "http://127.0.0.1:8000/api/customers/list-all/"
        );
        assert_eq!(
            client.url(EntityKind::Niches, "delete"),
            "http://127.0.0.1:8000/api/niches/delete/"
        );
    }

    #[test]
    fn test_mutations_rejected_for_audit() {
        let client = test_client();
        let payload = json!({});

        assert!(matches!(
            client.create_new(EntityKind::Audit, &payload),
            Err(Error::ReadOnlyEntity(_))
        ));
        assert!(matches!(
            client.edit(EntityKind::Audit, RecordId(1), &payload),
            Err(Error::ReadOnlyEntity(_))
        ));
        assert!(matches!(
            client.delete(EntityKind::Audit, &[RecordId(1)]),
            Err(Error::ReadOnlyEntity(_))
        ));
    }

    #[test]
    fn test_delete_empty_is_noop() {
        let client = test_client();
        // No request is made for an empty selection
        assert!(client.delete(EntityKind::Customers, &[]).is_ok());
    }

    #[test]
    fn test_delete_body_shape() {
        let body = json!({ "element_ids": [RecordId(4), RecordId(5)] });
        assert_eq!(body.to_string(), r#"{"element_ids":[4,5]}"#);
    }
}
