use lk_core::import::CsvPayload;
use lk_core::model::{Category, Language, Project, TranslationKey};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::state::AppState;

/// Response of the catalog-index read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogIndex {
    pub projects: Vec<Project>,
    pub languages: Vec<Language>,
}

/// Body of the update call for one key's value in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertRequest {
    pub key: String,
    pub value: String,
    pub description: String,
    pub language: String,
    pub updated_by: String,
}

/// Body of the create call for a brand-new key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    pub key: String,
    pub value: String,
    pub category: Category,
    pub description: String,
    pub language: String,
    pub updated_by: String,
}

/// Server summary of a bulk upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub uploaded: Vec<String>,
}

/// Transport seam for the REST surface. The production implementation is
/// [`crate::http::HttpBackend`]; tests drive the engine through in-memory
/// implementations.
pub trait Backend {
    fn fetch_profile(&self, token: &str) -> Result<String, SyncError>;

    /// Anonymous access is allowed for the index; the header is attached
    /// only when a token is supplied.
    fn fetch_catalog_index(&self, token: Option<&str>) -> Result<CatalogIndex, SyncError>;

    fn fetch_translations(
        &self,
        project: &str,
        language: &str,
        token: &str,
    ) -> Result<Vec<TranslationKey>, SyncError>;

    fn upsert_translation(
        &self,
        project: &str,
        request: &UpsertRequest,
        token: &str,
    ) -> Result<(), SyncError>;

    fn create_translation(
        &self,
        project: &str,
        request: &CreateRequest,
        token: &str,
    ) -> Result<(), SyncError>;

    fn delete_translation(&self, project: &str, key: &str, token: &str) -> Result<(), SyncError>;

    fn bulk_import(
        &self,
        project: &str,
        language: &str,
        file: &CsvPayload,
        token: &str,
    ) -> Result<ImportSummary, SyncError>;
}

/// Single interception point for authorization failures: the session is
/// expired BEFORE the caller sees any other effect of the response, and the
/// failure is swallowed (the signed-out view is the user-visible signal).
/// Every other failure propagates untouched.
fn settle<T>(state: &mut AppState, result: Result<T, SyncError>) -> Result<Option<T>, SyncError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(SyncError::Unauthorized) => {
            expire_session(state);
            Ok(None)
        }
        Err(err) => {
            log::warn!("backend call failed: {err}");
            Err(err)
        }
    }
}

pub(crate) fn expire_session(state: &mut AppState) {
    log::info!("authorization rejected; session expired");
    state.session.set_token(None);
    state.reset_sync_latches();
}

/// Looks up the signed-in user's identity. No-op when signed out.
pub fn fetch_profile<B: Backend>(state: &mut AppState, backend: &B) -> Result<(), SyncError> {
    let Some(token) = state.session.token().map(str::to_string) else {
        return Ok(());
    };
    state.note_profile_attempt(&token);
    state.busy += 1;
    let result = backend.fetch_profile(&token);
    state.busy -= 1;
    if let Some(identity) = settle(state, result)? {
        if state.session.token_is(&token) {
            log::debug!("profile resolved to {identity}");
            state.session.set_user_identity(Some(identity));
        }
    }
    Ok(())
}

/// Loads the available projects and languages.
pub fn fetch_catalog_index<B: Backend>(state: &mut AppState, backend: &B) -> Result<(), SyncError> {
    let token = state.session.token().map(str::to_string);
    state.busy += 1;
    let result = backend.fetch_catalog_index(token.as_deref());
    state.busy -= 1;
    if let Some(index) = settle(state, result)? {
        let current = token
            .as_deref()
            .map_or(true, |issued| state.session.token_is(issued));
        if current {
            log::debug!(
                "catalog index: {} projects, {} languages",
                index.projects.len(),
                index.languages.len()
            );
            state.catalog.set_available_projects(index.projects);
            state.catalog.set_available_languages(index.languages);
            state.note_catalog_loaded();
        }
    }
    Ok(())
}

/// Replaces the mirror with a fresh read for the active pair. The backend is
/// the source of truth; the mirror is never patched locally.
pub fn refresh_translations<B: Backend>(
    state: &mut AppState,
    backend: &B,
) -> Result<(), SyncError> {
    let Some(token) = state.session.token().map(str::to_string) else {
        return Ok(());
    };
    let Some((project, language)) = state
        .catalog
        .selected_pair()
        .map(|(project, language)| (project.to_string(), language.to_string()))
    else {
        return Ok(());
    };
    state.note_mirror_attempt(&project, &language);
    state.busy += 1;
    let result = backend.fetch_translations(&project, &language, &token);
    state.busy -= 1;
    if let Some(rows) = settle(state, result)? {
        apply_mirror(state, &token, (&project, &language), rows);
    }
    Ok(())
}

/// Merge guard for a fetched mirror: a response issued under a token that is
/// no longer live, or for a pair that is no longer selected, is discarded so
/// stale data cannot resurface.
pub(crate) fn apply_mirror(
    state: &mut AppState,
    issued_token: &str,
    pair: (&str, &str),
    rows: Vec<TranslationKey>,
) {
    if !state.session.token_is(issued_token) {
        log::debug!("discarding mirror for {}/{}: session changed", pair.0, pair.1);
        return;
    }
    if state.catalog.selected_pair() != Some(pair) {
        log::debug!(
            "discarding mirror for {}/{}: selection changed",
            pair.0,
            pair.1
        );
        return;
    }
    log::debug!("mirror replaced: {} keys for {}/{}", rows.len(), pair.0, pair.1);
    state.replace_mirror(rows);
    state.note_mirror_synced(pair.0, pair.1);
}

fn mutate<B, F>(state: &mut AppState, backend: &B, call: F) -> Result<(), SyncError>
where
    B: Backend,
    F: FnOnce(&B, &str) -> Result<(), SyncError>,
{
    let Some(token) = state.session.token().map(str::to_string) else {
        return Ok(());
    };
    state.busy += 1;
    let result = call(backend, &token);
    state.busy -= 1;
    match settle(state, result)? {
        // The mutation is only observable through the follow-up read.
        Some(()) => refresh_translations(state, backend),
        None => Ok(()),
    }
}

pub fn upsert_translation<B: Backend>(
    state: &mut AppState,
    backend: &B,
    request: UpsertRequest,
) -> Result<(), SyncError> {
    let Some(project) = state.catalog.selected_project().map(str::to_string) else {
        return Ok(());
    };
    mutate(state, backend, |backend, token| {
        backend.upsert_translation(&project, &request, token)
    })
}

pub fn create_translation<B: Backend>(
    state: &mut AppState,
    backend: &B,
    request: CreateRequest,
) -> Result<(), SyncError> {
    let Some(project) = state.catalog.selected_project().map(str::to_string) else {
        return Ok(());
    };
    mutate(state, backend, |backend, token| {
        backend.create_translation(&project, &request, token)
    })
}

pub fn delete_translation<B: Backend>(
    state: &mut AppState,
    backend: &B,
    key: &str,
) -> Result<(), SyncError> {
    let Some(project) = state.catalog.selected_project().map(str::to_string) else {
        return Ok(());
    };
    mutate(state, backend, |backend, token| {
        backend.delete_translation(&project, key, token)
    })
}

/// Uploads a staged CSV for one target language, then refreshes the mirror.
/// Returns the server's summary unless the session expired mid-flight.
pub fn bulk_import<B: Backend>(
    state: &mut AppState,
    backend: &B,
    language: &str,
    file: &CsvPayload,
) -> Result<Option<ImportSummary>, SyncError> {
    let Some(token) = state.session.token().map(str::to_string) else {
        return Ok(None);
    };
    let Some(project) = state.catalog.selected_project().map(str::to_string) else {
        return Ok(None);
    };
    state.busy += 1;
    let result = backend.bulk_import(&project, language, file, &token);
    state.busy -= 1;
    match settle(state, result)? {
        Some(summary) => {
            refresh_translations(state, backend)?;
            Ok(Some(summary))
        }
        None => Ok(None),
    }
}
