//! Persistence of completed exchanges in Cloud Firestore.

use std::collections::BTreeMap;
use std::fmt::{self, Debug};

use reqwest::{Client, RequestBuilder, Url, header};
use serde::Serialize;
use wednesday_core::persistence::{CaseRecord, CaseStore, PersistError};

/// The collection every record is written to.
pub const COLLECTION: &str = "wednesday_cases";

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone, PartialEq, Eq)]
enum Credentials {
    AccessToken(String),
    ApiKey(String),
}

/// A [`CaseStore`] backed by the Firestore REST API.
///
/// Every record becomes a new document with a generated id. The
/// `timestamp` field is assigned by the server.
#[derive(Clone)]
pub struct FirestoreCaseStore {
    client: Client,
    base_url: String,
    project_id: String,
    credentials: Credentials,
}

impl FirestoreCaseStore {
    /// Creates a store that authenticates with an OAuth access token.
    #[inline]
    pub fn with_access_token<P: Into<String>, T: Into<String>>(
        project_id: P,
        access_token: T,
    ) -> Self {
        Self::new(project_id.into(), Credentials::AccessToken(access_token.into()))
    }

    /// Creates a store that authenticates with an API key.
    #[inline]
    pub fn with_api_key<P: Into<String>, K: Into<String>>(
        project_id: P,
        api_key: K,
    ) -> Self {
        Self::new(project_id.into(), Credentials::ApiKey(api_key.into()))
    }

    /// Sets a custom base URL, e.g. for the emulator.
    #[inline]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn new(project_id: String, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            project_id,
            credentials,
        }
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    fn commit_request(&self, body: &CommitRequest) -> Result<RequestBuilder, PersistError> {
        let base_url = self.base_url.trim_end_matches('/');
        let endpoint =
            format!("{base_url}/{}/documents:commit", self.database_path());
        let url = match &self.credentials {
            Credentials::ApiKey(key) => {
                Url::parse_with_params(&endpoint, [("key", key.as_str())])
            }
            Credentials::AccessToken(_) => Url::parse(&endpoint),
        }
        .map_err(|err| PersistError::new(format!("invalid endpoint: {err}")))?;

        let mut builder = self.client.post(url).json(body);
        if let Credentials::AccessToken(token) = &self.credentials {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        Ok(builder)
    }
}

impl Debug for FirestoreCaseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirestoreCaseStore")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("credentials", &"<deducted>")
            .finish()
    }
}

impl CaseStore for FirestoreCaseStore {
    fn save(
        &self,
        record: CaseRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send + 'static {
        let document_id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}/documents/{COLLECTION}/{document_id}",
            self.database_path()
        );
        let body = create_commit(name, &record);
        let req_builder = self.commit_request(&body);

        async move {
            let resp = req_builder?
                .send()
                .await
                .map_err(|err| PersistError::new(err.without_url().to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(PersistError::new(format!("[{status}] {body}")));
            }
            debug!("persisted exchange as {document_id}");
            Ok(())
        }
    }
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
enum Value {
    StringValue(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Document {
    name: String,
    fields: BTreeMap<&'static str, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: &'static str,
    set_to_server_value: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Precondition {
    exists: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct Write {
    update: Document,
    update_transforms: Vec<FieldTransform>,
    current_document: Precondition,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

fn create_commit(name: String, record: &CaseRecord) -> CommitRequest {
    let fields = BTreeMap::from([
        ("agent_id", Value::StringValue(record.agent_id.clone())),
        ("query", Value::StringValue(record.query.clone())),
        ("response", Value::StringValue(record.response.clone())),
    ]);
    CommitRequest {
        writes: vec![Write {
            update: Document { name, fields },
            update_transforms: vec![FieldTransform {
                field_path: "timestamp",
                set_to_server_value: "REQUEST_TIME",
            }],
            current_document: Precondition { exists: false },
        }],
    }
}
