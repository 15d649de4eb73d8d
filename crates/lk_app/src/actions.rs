use lk_core::model::Category;

use crate::auth::AuthProvider;
use crate::error::SyncError;
use crate::state::AppState;
use crate::sync::{self, Backend, CreateRequest, UpsertRequest};

pub enum AppAction {
    SignIn { email: String, password: String },
    SignOut,

    SelectProject(String),
    SelectLanguage(String),

    SetSearch(String),
    ToggleTag(Category),
    SetPage(usize),
    NextPage,
    PrevPage,

    BeginEdit(String),
    SetEditValue(String),
    SetEditDescription(String),
    SaveEdit,
    CancelEdit,

    OpenAddForm,
    SetAddKey(String),
    SetAddValue(String),
    SetAddCategory(Category),
    SetAddDescription(String),
    SubmitAddForm,
    CancelAddForm,

    OpenImport,
    SetImportLanguage(String),
    StageImportFile { filename: String, bytes: Vec<u8> },
    SubmitImport,
    CancelImport,

    DeleteKey(String),
    Refresh,
}

/// Maps a sync-engine outcome onto the state's status/error strings. A
/// swallowed authorization failure lands here as `Ok` with the session
/// already gone, so the success status is skipped.
fn finish(state: &mut AppState, result: Result<(), SyncError>, done: &str) -> Result<(), String> {
    match result {
        Ok(()) => {
            state.last_error = None;
            if state.session.is_authenticated() {
                state.status = done.to_string();
            }
            Ok(())
        }
        Err(err) => {
            let message = err.to_string();
            state.last_error = Some(message.clone());
            Err(message)
        }
    }
}

fn fail(state: &mut AppState, message: &str) -> Result<(), String> {
    state.last_error = Some(message.to_string());
    Err(message.to_string())
}

pub fn dispatch<B>(state: &mut AppState, backend: &B, action: AppAction) -> Result<(), String>
where
    B: Backend + AuthProvider,
{
    match action {
        AppAction::SignIn { email, password } => {
            let email = email.trim().to_string();
            if email.is_empty() || password.is_empty() {
                state.sign_in_error = Some("email and password are required".to_string());
                return Err("email and password are required".to_string());
            }
            state.busy += 1;
            let result = backend.sign_in(&email, &password);
            state.busy -= 1;
            match result {
                Ok(session) => {
                    log::info!("sign-in accepted for {email}");
                    state.sign_in_error = None;
                    state.session.set_token(Some(session.access_token));
                    state.status = "signed in".to_string();
                }
                Err(err) => {
                    let message = err.to_string();
                    state.sign_in_error = Some(message.clone());
                    return Err(message);
                }
            }
        }
        AppAction::SignOut => {
            log::info!("signed out");
            state.session.set_token(None);
            state.reset_sync_latches();
            state.edit.cancel();
            state.add_form.clear();
            state.import_form.clear();
            state.status = "signed out".to_string();
        }

        AppAction::SelectProject(id) => {
            if !state.catalog.set_selected_project(&id) {
                return fail(state, &format!("unknown project: {id}"));
            }
            state.edit.cancel();
            state.sync_view();
        }
        AppAction::SelectLanguage(id) => {
            if !state.catalog.set_selected_language(&id) {
                return fail(state, &format!("unknown language: {id}"));
            }
            state.edit.cancel();
            state.sync_view();
        }

        AppAction::SetSearch(search) => {
            state.table.set_search(&search);
            state.sync_view();
        }
        AppAction::ToggleTag(tag) => {
            state.table.toggle_tag(tag);
            state.sync_view();
        }
        AppAction::SetPage(page) => {
            state.table.set_page(page);
            state.sync_view();
        }
        AppAction::NextPage => {
            state.table.next_page();
            state.sync_view();
        }
        AppAction::PrevPage => {
            state.table.prev_page();
            state.sync_view();
        }

        AppAction::BeginEdit(row_id) => {
            let Some(language) = state.active_language().map(str::to_string) else {
                return Ok(());
            };
            let Some(row) = state.row_by_id(&row_id).cloned() else {
                return fail(state, &format!("no row with id {row_id}"));
            };
            state.edit.begin(&row, &language);
        }
        AppAction::SetEditValue(value) => {
            state.edit.set_value(&value);
        }
        AppAction::SetEditDescription(description) => {
            state.edit.set_description(&description);
        }
        AppAction::SaveEdit => {
            let Some(language) = state.active_language().map(str::to_string) else {
                return Ok(());
            };
            // The row leaves edit mode here, before the request settles.
            let Some(edit) = state.edit.take() else {
                return Ok(());
            };
            let Some(key) = state
                .row_by_id(&edit.row_id)
                .map(|row| row.key.clone())
            else {
                return fail(state, "edited row no longer exists");
            };
            let request = UpsertRequest {
                key,
                value: edit.value,
                description: edit.description,
                language,
                updated_by: state.editor_identity(),
            };
            let result = sync::upsert_translation(state, backend, request);
            return finish(state, result, "translation saved");
        }
        AppAction::CancelEdit => {
            state.edit.cancel();
        }

        AppAction::OpenAddForm => {
            state.add_form.open();
        }
        AppAction::SetAddKey(key) => {
            state.add_form.key = key;
        }
        AppAction::SetAddValue(value) => {
            state.add_form.value = value;
        }
        AppAction::SetAddCategory(category) => {
            state.add_form.category = Some(category);
        }
        AppAction::SetAddDescription(description) => {
            state.add_form.description = description;
        }
        AppAction::SubmitAddForm => {
            let Some(language) = state.active_language().map(str::to_string) else {
                return Ok(());
            };
            let new_key = match state.add_form.submission() {
                Ok(new_key) => new_key,
                Err(message) => return fail(state, message),
            };
            // A valid submission clears and closes the form; the outcome
            // only affects the mirror and the error string.
            state.add_form.clear();
            let request = CreateRequest {
                key: new_key.key,
                value: new_key.value,
                category: new_key.category,
                description: new_key.description,
                language,
                updated_by: state.editor_identity(),
            };
            let result = sync::create_translation(state, backend, request);
            return finish(state, result, "key added");
        }
        AppAction::CancelAddForm => {
            state.add_form.clear();
        }

        AppAction::OpenImport => {
            state.import_form.open();
        }
        AppAction::SetImportLanguage(language) => {
            state.import_form.stage_language(&language);
        }
        AppAction::StageImportFile { filename, bytes } => {
            state.import_form.stage_file(&filename, bytes);
        }
        AppAction::SubmitImport => {
            let (language, file) = match state.import_form.submission() {
                Ok(staged) => staged,
                Err(message) => return fail(state, message),
            };
            state.import_form.clear();
            match sync::bulk_import(state, backend, &language, &file) {
                // As in `finish`: a swallowed auth failure still clears the
                // error, and only a live session gets the success status.
                Ok(summary) => {
                    state.last_error = None;
                    if let Some(summary) = summary {
                        state.status = format!("imported {} keys", summary.uploaded.len());
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    state.last_error = Some(message.clone());
                    return Err(message);
                }
            }
        }
        AppAction::CancelImport => {
            state.import_form.clear();
        }

        AppAction::DeleteKey(key) => {
            let result = sync::delete_translation(state, backend, &key);
            return finish(state, result, "key deleted");
        }
        AppAction::Refresh => {
            state.rearm_loads();
            state.status = "refreshing".to_string();
        }
    }

    Ok(())
}
