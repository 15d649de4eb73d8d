//! In-memory stand-in for the localization service and the sign-in
//! provider, close enough to the real REST semantics to drive end-to-end
//! flows: per-language value rows, token checks on every call, and a naive
//! CSV import.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use lk_app::auth::{AuthProvider, SignInSession};
use lk_app::error::{AuthError, SyncError};
use lk_app::sync::{Backend, CatalogIndex, CreateRequest, ImportSummary, UpsertRequest};
use lk_core::import::CsvPayload;
use lk_core::model::{Category, Language, Project, TranslationKey, TranslationValue};

pub const EMAIL: &str = "demo@example.com";
pub const PASSWORD: &str = "secret";

pub struct InMemoryBackend {
    store: RefCell<Store>,
}

struct Store {
    token: String,
    token_serial: usize,
    revoked: bool,
    fail_once: Option<(&'static str, SyncError)>,
    projects: Vec<Project>,
    languages: Vec<Language>,
    rows: BTreeMap<String, Vec<TranslationKey>>,
    next_id: usize,
    calls: Vec<String>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(Store {
                token: "tok-1".to_string(),
                token_serial: 1,
                revoked: false,
                fail_once: None,
                projects: vec![Project {
                    id: "website".to_string(),
                    name: "Website".to_string(),
                }],
                languages: vec![
                    Language {
                        id: "fr".to_string(),
                        name: "French".to_string(),
                    },
                    Language {
                        id: "en".to_string(),
                        name: "English".to_string(),
                    },
                    Language {
                        id: "de".to_string(),
                        name: "German".to_string(),
                    },
                ],
                rows: BTreeMap::new(),
                next_id: 1,
                calls: Vec::new(),
            }),
        }
    }

    /// Seeds one catalog row with a value for `language`.
    pub fn seed_row(&self, project: &str, id: &str, key: &str, category: Category, language: &str, value: &str) {
        let mut store = self.store.borrow_mut();
        let mut translations = BTreeMap::new();
        for lang in &store.languages {
            translations.insert(
                lang.id.clone(),
                TranslationValue {
                    value: if lang.id == language { value.to_string() } else { String::new() },
                    updated_at: "2025-06-01T10:00:00Z".to_string(),
                    updated_by: if lang.id == language { EMAIL.to_string() } else { String::new() },
                },
            );
        }
        store.rows.entry(project.to_string()).or_default().push(TranslationKey {
            id: id.to_string(),
            key: key.to_string(),
            category,
            description: None,
            translations,
        });
    }

    /// All bearer-token calls reject until the next sign-in.
    pub fn revoke_token(&self) {
        self.store.borrow_mut().revoked = true;
    }

    /// The next call of the named operation fails with `err`.
    pub fn fail_once(&self, operation: &'static str, err: SyncError) {
        self.store.borrow_mut().fail_once = Some((operation, err));
    }

    pub fn calls(&self) -> Vec<String> {
        self.store.borrow().calls.clone()
    }

    /// Raw value stored for one key in one language, bypassing the wire.
    pub fn stored_value(&self, project: &str, key: &str, language: &str) -> Option<String> {
        let store = self.store.borrow();
        store
            .rows
            .get(project)?
            .iter()
            .find(|row| row.key == key)?
            .translations
            .get(language)
            .map(|translation| translation.value.clone())
    }
}

impl Store {
    fn gate(&mut self, operation: &'static str, detail: String, token: &str) -> Result<(), SyncError> {
        self.calls.push(detail);
        if let Some((target, err)) = self.fail_once.take() {
            if target == operation {
                return Err(err);
            }
            self.fail_once = Some((target, err));
        }
        if self.revoked || token != self.token {
            return Err(SyncError::Unauthorized);
        }
        Ok(())
    }

    fn insert_key(
        &mut self,
        project: &str,
        key: &str,
        value: &str,
        category: Category,
        description: &str,
        language: &str,
    ) -> Result<(), SyncError> {
        let exists = self
            .rows
            .get(project)
            .map(|rows| rows.iter().any(|row| row.key == key))
            .unwrap_or(false);
        if exists {
            // Unique-key conflict surfaces as a server error, never a
            // silent overwrite.
            return Err(SyncError::Status(500));
        }
        let mut translations = BTreeMap::new();
        for lang in &self.languages {
            translations.insert(
                lang.id.clone(),
                TranslationValue {
                    value: if lang.id == language { value.to_string() } else { String::new() },
                    updated_at: "2025-06-02T09:00:00Z".to_string(),
                    updated_by: if lang.id == language { EMAIL.to_string() } else { String::new() },
                },
            );
        }
        let id = format!("gen-{}", self.next_id);
        self.next_id += 1;
        self.rows.entry(project.to_string()).or_default().push(TranslationKey {
            id,
            key: key.to_string(),
            category,
            description: if description.is_empty() { None } else { Some(description.to_string()) },
            translations,
        });
        Ok(())
    }
}

impl Backend for InMemoryBackend {
    fn fetch_profile(&self, token: &str) -> Result<String, SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate("fetch_profile", "profile".to_string(), token)?;
        Ok(EMAIL.to_string())
    }

    fn fetch_catalog_index(&self, token: Option<&str>) -> Result<CatalogIndex, SyncError> {
        let mut store = self.store.borrow_mut();
        // Anonymous reads pass; a presented token must still be live.
        if let Some(token) = token {
            store.gate("fetch_catalog_index", "index".to_string(), token)?;
        } else {
            store.calls.push("index(anonymous)".to_string());
        }
        Ok(CatalogIndex {
            projects: store.projects.clone(),
            languages: store.languages.clone(),
        })
    }

    fn fetch_translations(
        &self,
        project: &str,
        language: &str,
        token: &str,
    ) -> Result<Vec<TranslationKey>, SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate(
            "fetch_translations",
            format!("translations {project}/{language}"),
            token,
        )?;
        // Like the service: each row carries only the requested language.
        let rows = store
            .rows
            .get(project)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|mut row| {
                row.translations.retain(|lang, _| lang == language);
                row
            })
            .collect();
        Ok(rows)
    }

    fn upsert_translation(
        &self,
        project: &str,
        request: &UpsertRequest,
        token: &str,
    ) -> Result<(), SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate(
            "upsert_translation",
            format!(
                "upsert {project} {}={} lang={} by={}",
                request.key, request.value, request.language, request.updated_by
            ),
            token,
        )?;
        if let Some(rows) = store.rows.get_mut(project) {
            if let Some(row) = rows.iter_mut().find(|row| row.key == request.key) {
                row.description = Some(request.description.clone());
                if let Some(translation) = row.translations.get_mut(&request.language) {
                    translation.value = request.value.clone();
                    translation.updated_by = request.updated_by.clone();
                }
            }
        }
        Ok(())
    }

    fn create_translation(
        &self,
        project: &str,
        request: &CreateRequest,
        token: &str,
    ) -> Result<(), SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate(
            "create_translation",
            format!("create {project} {} lang={}", request.key, request.language),
            token,
        )?;
        store.insert_key(
            project,
            &request.key,
            &request.value,
            request.category,
            &request.description,
            &request.language,
        )
    }

    fn delete_translation(&self, project: &str, key: &str, token: &str) -> Result<(), SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate("delete_translation", format!("delete {project}/{key}"), token)?;
        if let Some(rows) = store.rows.get_mut(project) {
            rows.retain(|row| row.key != key);
        }
        Ok(())
    }

    fn bulk_import(
        &self,
        project: &str,
        language: &str,
        file: &CsvPayload,
        token: &str,
    ) -> Result<ImportSummary, SyncError> {
        let mut store = self.store.borrow_mut();
        store.gate(
            "bulk_import",
            format!("import {project}/{language} {}", file.filename),
            token,
        )?;
        if !file.filename.ends_with(".csv") {
            return Err(SyncError::Status(400));
        }
        if !store.languages.iter().any(|lang| lang.id == language) {
            return Err(SyncError::Status(400));
        }

        let text = String::from_utf8(file.bytes.clone())
            .map_err(|_| SyncError::Status(400))?;
        let mut uploaded = Vec::new();
        for line in text.lines().skip(1) {
            let mut fields = line.split(',');
            let key = fields.next().unwrap_or("").trim();
            let value = fields.next().unwrap_or("").trim();
            let category = fields.next().unwrap_or("").trim();
            let description = fields.next().unwrap_or("").trim();
            let Some(category) = Category::parse(category) else {
                continue;
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            store.insert_key(project, key, value, category, description, language)?;
            uploaded.push(key.to_string());
        }
        Ok(ImportSummary { uploaded })
    }
}

impl AuthProvider for InMemoryBackend {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignInSession, AuthError> {
        let mut store = self.store.borrow_mut();
        store.calls.push(format!("sign_in {email}"));
        if email == EMAIL && password == PASSWORD {
            store.token_serial += 1;
            store.token = format!("tok-{}", store.token_serial);
            store.revoked = false;
            Ok(SignInSession {
                access_token: store.token.clone(),
            })
        } else {
            Err(AuthError::Rejected("invalid login credentials".to_string()))
        }
    }
}
