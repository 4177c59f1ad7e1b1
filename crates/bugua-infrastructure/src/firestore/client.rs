//! Minimal Firestore REST v1 client.

use super::value::{from_fields, to_fields};
use bugua_core::config::FirestoreConfig;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

const BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("Firestore request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Firestore returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Failed to decode Firestore document: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FirestoreError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FirestoreError::Http { status: 403, .. })
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    fields: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Thin wrapper over the document endpoints of one database.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    api_key: String,
}

impl FirestoreClient {
    pub fn new(config: &FirestoreConfig) -> Self {
        Self::with_base_url(BASE_URL, config)
    }

    /// Points the client at another host, e.g. the Firestore emulator.
    pub fn with_base_url(base_url: &str, config: &FirestoreConfig) -> Self {
        Self {
            client: Client::new(),
            documents_url: format!(
                "{}/projects/{}/databases/{}/documents",
                base_url.trim_end_matches('/'),
                config.project_id,
                config.database()
            ),
            api_key: config.api_key.clone(),
        }
    }

    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url, collection, id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .query(&[("key", self.api_key.as_str())])
    }

    /// Fetches and decodes one document. A missing document is `Ok(None)`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, FirestoreError> {
        let response = self
            .request(Method::GET, self.document_url(collection, id))
            .send()
            .await?;
        match Self::read_document(response).await? {
            Some(doc) => Ok(Some(from_fields(&doc.fields)?)),
            None => Ok(None),
        }
    }

    /// Creates or replaces a whole document.
    pub async fn set<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        value: &T,
    ) -> Result<(), FirestoreError> {
        let body = json!({ "fields": to_fields(value)? });
        let response = self
            .request(Method::PATCH, self.document_url(collection, id))
            .json(&body)
            .send()
            .await?;
        Self::read_document(response).await?;
        Ok(())
    }

    /// Overwrites only `field_paths` of an existing document.
    ///
    /// Returns the full updated document, or `None` if it does not exist.
    pub async fn update_fields<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        fields: Value,
        field_paths: &[&str],
    ) -> Result<Option<T>, FirestoreError> {
        let mut params: Vec<(&str, &str)> = field_paths
            .iter()
            .map(|path| ("updateMask.fieldPaths", *path))
            .collect();
        params.push(("currentDocument.exists", "true"));

        let response = self
            .request(Method::PATCH, self.document_url(collection, id))
            .query(&params)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;
        match Self::read_document(response).await? {
            Some(doc) => Ok(Some(from_fields(&doc.fields)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), FirestoreError> {
        let response = self
            .request(Method::DELETE, self.document_url(collection, id))
            .send()
            .await?;
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(Self::http_error(response).await)
    }

    /// Lists a whole collection, following page tokens.
    ///
    /// Documents that fail to decode are skipped with a warning.
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<T>, FirestoreError> {
        let url = format!("{}/{}", self.documents_url, collection);
        let page_size = PAGE_SIZE.to_string();
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, url.clone())
                .query(&[("pageSize", page_size.as_str())]);
            if let Some(order) = order_by {
                request = request.query(&[("orderBy", order)]);
            }
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::http_error(response).await);
            }
            let page: ListResponse = response.json().await?;

            for doc in page.documents {
                match from_fields(&doc.fields) {
                    Ok(item) => items.push(item),
                    Err(e) => tracing::warn!("[Firestore] Skipping undecodable document in {}: {}", collection, e),
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(items)
    }

    async fn read_document(response: reqwest::Response) -> Result<Option<Document>, FirestoreError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::http_error(response).await);
        }
        Ok(Some(response.json().await?))
    }

    async fn http_error(response: reqwest::Response) -> FirestoreError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read Firestore error body".to_string());
        FirestoreError::Http {
            status,
            message: error_message(&body),
        }
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{status}: {message}")
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(database: Option<&str>) -> FirestoreConfig {
        FirestoreConfig {
            project_id: "bugua-prod".into(),
            api_key: "k".into(),
            database: database.map(str::to_string),
        }
    }

    #[test]
    fn test_document_url() {
        let client = FirestoreClient::new(&config(None));
        assert_eq!(
            client.document_url("divination_results", "117-227-313-426-521_CAREER_MALE"),
            "https://firestore.googleapis.com/v1/projects/bugua-prod/databases/(default)/documents/divination_results/117-227-313-426-521_CAREER_MALE"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = FirestoreClient::with_base_url("http://localhost:8080/v1/", &config(Some("staging")));
        assert!(client
            .document_url("c", "d")
            .starts_with("http://localhost:8080/v1/projects/bugua-prod/databases/staging/"));
    }

    #[test]
    fn test_error_message_prefers_structured_body() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            error_message(body),
            "PERMISSION_DENIED: Missing or insufficient permissions."
        );
        assert_eq!(error_message("gateway down"), "gateway down");
    }
}
