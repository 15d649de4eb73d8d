use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lk_core::import::CsvPayload;
use lk_core::model::TranslationKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthProvider, SignInSession};
use crate::error::{AuthError, SyncError};
use crate::sync::{Backend, CatalogIndex, CreateRequest, ImportSummary, UpsertRequest};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// REST transport for the localization service and the sign-in provider.
pub struct HttpBackend {
    base_url: String,
    sign_in_url: String,
    agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: String,
}

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Default, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, sign_in_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sign_in_url: sign_in_url.into(),
            agent: ureq::AgentBuilder::new().timeout(CALL_TIMEOUT).build(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str, token: Option<&str>) -> ureq::Request {
        authorize(self.agent.get(&self.url(path)), token)
    }
}

fn authorize(request: ureq::Request, token: Option<&str>) -> ureq::Request {
    match token {
        Some(token) => request.set("Authorization", &format!("Bearer {token}")),
        None => request,
    }
}

/// 401 means the credential is dead, whatever the payload says; everything
/// else is a generic failure.
fn classify(err: ureq::Error) -> SyncError {
    match err {
        ureq::Error::Status(401, _) => SyncError::Unauthorized,
        ureq::Error::Status(code, _) => SyncError::Status(code),
        ureq::Error::Transport(transport) => SyncError::Transport(transport.to_string()),
    }
}

fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, SyncError> {
    response
        .into_json()
        .map_err(|err| SyncError::Decode(err.to_string()))
}

impl Backend for HttpBackend {
    fn fetch_profile(&self, token: &str) -> Result<String, SyncError> {
        let response = self.get("/profile", Some(token)).call().map_err(classify)?;
        let profile: ProfileResponse = read_json(response)?;
        Ok(profile.user)
    }

    fn fetch_catalog_index(&self, token: Option<&str>) -> Result<CatalogIndex, SyncError> {
        let response = self.get("/localizations/", token).call().map_err(classify)?;
        read_json(response)
    }

    fn fetch_translations(
        &self,
        project: &str,
        language: &str,
        token: &str,
    ) -> Result<Vec<TranslationKey>, SyncError> {
        let response = self
            .get(&format!("/localizations/{project}/{language}"), Some(token))
            .call()
            .map_err(classify)?;
        read_json(response)
    }

    fn upsert_translation(
        &self,
        project: &str,
        request: &UpsertRequest,
        token: &str,
    ) -> Result<(), SyncError> {
        authorize(
            self.agent.put(&self.url(&format!("/localizations/{project}"))),
            Some(token),
        )
        .send_json(request)
        .map_err(classify)?;
        Ok(())
    }

    fn create_translation(
        &self,
        project: &str,
        request: &CreateRequest,
        token: &str,
    ) -> Result<(), SyncError> {
        authorize(
            self.agent
                .post(&self.url(&format!("/localizations/{project}"))),
            Some(token),
        )
        .send_json(request)
        .map_err(classify)?;
        Ok(())
    }

    fn delete_translation(&self, project: &str, key: &str, token: &str) -> Result<(), SyncError> {
        authorize(
            self.agent
                .delete(&self.url(&format!("/localizations/{project}/{key}"))),
            Some(token),
        )
        .call()
        .map_err(classify)?;
        Ok(())
    }

    fn bulk_import(
        &self,
        project: &str,
        language: &str,
        file: &CsvPayload,
        token: &str,
    ) -> Result<ImportSummary, SyncError> {
        let (boundary, body) = multipart_form(file);
        let response = authorize(
            self.agent.post(
                &self.url(&format!("/localizations/upload/{project}/{language}")),
            ),
            Some(token),
        )
        .set(
            "Content-Type",
            &format!("multipart/form-data; boundary={boundary}"),
        )
        .send_bytes(&body)
        .map_err(classify)?;
        read_json(response)
    }
}

impl AuthProvider for HttpBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignInSession, AuthError> {
        let result = self
            .agent
            .post(&self.sign_in_url)
            .send_json(SignInBody { email, password });
        match result {
            Ok(response) => {
                let token: TokenResponse = response
                    .into_json()
                    .map_err(|err| AuthError::Transport(err.to_string()))?;
                Ok(SignInSession {
                    access_token: token.access_token,
                })
            }
            Err(ureq::Error::Status(_, response)) => {
                let detail = response
                    .into_json::<ProviderErrorBody>()
                    .ok()
                    .and_then(|body| body.error_description.or(body.message))
                    .unwrap_or_else(|| "invalid credentials".to_string());
                Err(AuthError::Rejected(detail))
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(AuthError::Transport(transport.to_string()))
            }
        }
    }
}

/// Encodes the staged CSV as a single-field multipart body (field name
/// `file`, as the upload endpoint expects).
fn multipart_form(file: &CsvPayload) -> (String, Vec<u8>) {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or(0);
    let boundary = format!("----lockit{stamp:032x}");

    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            sanitize_filename(&file.filename)
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (boundary, body)
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '"' | '\r' | '\n' | '\\'))
        .collect()
}
