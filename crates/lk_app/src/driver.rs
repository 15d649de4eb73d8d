use crate::actions::{self, AppAction};
use crate::auth::AuthProvider;
use crate::reactions;
use crate::state::AppState;
use crate::sync::Backend;

/// Owns the state and the backend, and runs the reaction handlers after
/// every action. The binary and the end-to-end tests both drive the app
/// through this.
pub struct AppDriver<B> {
    state: AppState,
    backend: B,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSnapshot {
    pub authenticated: bool,
    pub user_identity: Option<String>,
    pub selected_project: Option<String>,
    pub selected_language: Option<String>,
    pub total_keys: usize,
    pub filtered_keys: usize,
    pub page: usize,
    pub page_count: usize,
    pub editing_row: Option<String>,
    pub busy: usize,
    pub status: String,
    pub last_error: Option<String>,
    pub sign_in_error: Option<String>,
}

impl<B: Backend + AuthProvider> AppDriver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: AppState::new(),
            backend,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn dispatch(&mut self, action: AppAction) -> Result<(), String> {
        let result = actions::dispatch(&mut self.state, &self.backend, action);
        reactions::run(&mut self.state, &self.backend);
        result
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            authenticated: self.state.session.is_authenticated(),
            user_identity: self.state.session.user_identity().map(str::to_string),
            selected_project: self.state.catalog.selected_project().map(str::to_string),
            selected_language: self.state.catalog.selected_language().map(str::to_string),
            total_keys: self.state.mirror().len(),
            filtered_keys: self.state.filtered_len(),
            page: self.state.table.page(),
            page_count: self.state.page_count(),
            editing_row: self.state.edit.editing_row().map(str::to_string),
            busy: self.state.busy,
            status: self.state.status.clone(),
            last_error: self.state.last_error.clone(),
            sign_in_error: self.state.sign_in_error.clone(),
        }
    }
}
