use lk_core::catalog::CatalogState;
use lk_core::editing::EditState;
use lk_core::forms::AddKeyForm;
use lk_core::import::BulkImportForm;
use lk_core::model::TranslationKey;
use lk_core::session::SessionState;
use lk_core::table::{self, TableState};

/// Whole application state. The sync engine is the only writer of the
/// mirror and the catalog lists; everything else is local UI state mutated
/// through `actions::dispatch`.
pub struct AppState {
    pub session: SessionState,
    pub catalog: CatalogState,
    pub table: TableState,
    pub edit: EditState,
    pub add_form: AddKeyForm,
    pub import_form: BulkImportForm,

    pub sign_in_error: Option<String>,
    pub last_error: Option<String>,
    pub status: String,

    /// Count of backend calls in flight. Shared across operations: zero
    /// means everything settled, nothing finer-grained is promised.
    pub busy: usize,

    mirror: Vec<TranslationKey>,

    // Sync bookkeeping: which pair the mirror reflects, and which loads have
    // already been attempted, so a failing backend cannot cause a hot loop.
    mirror_synced_for: Option<(String, String)>,
    mirror_attempted_for: Option<(String, String)>,
    profile_attempted_for: Option<String>,
    catalog_loaded: bool,
    catalog_attempted: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
            catalog: CatalogState::new(),
            table: TableState::new(),
            edit: EditState::new(),
            add_form: AddKeyForm::new(),
            import_form: BulkImportForm::new(),
            sign_in_error: None,
            last_error: None,
            status: String::new(),
            busy: 0,
            mirror: Vec::new(),
            mirror_synced_for: None,
            mirror_attempted_for: None,
            profile_attempted_for: None,
            catalog_loaded: false,
            catalog_attempted: false,
        }
    }

    pub fn mirror(&self) -> &[TranslationKey] {
        &self.mirror
    }

    pub fn row_by_id(&self, row_id: &str) -> Option<&TranslationKey> {
        self.mirror.iter().find(|row| row.id == row_id)
    }

    /// Replaces the mirror wholesale and re-clamps the page. Only the sync
    /// engine calls this.
    pub(crate) fn replace_mirror(&mut self, rows: Vec<TranslationKey>) {
        self.mirror = rows;
        self.sync_view();
    }

    pub fn active_language(&self) -> Option<&str> {
        self.catalog.selected_language()
    }

    /// Editor identity sent with mutations; empty until the profile lookup
    /// lands.
    pub fn editor_identity(&self) -> String {
        self.session.user_identity().unwrap_or("").to_string()
    }

    pub fn filtered_rows(&self) -> Vec<&TranslationKey> {
        let Some(language) = self.active_language() else {
            return Vec::new();
        };
        self.table.filter(&self.mirror, language)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_rows().len()
    }

    pub fn page_count(&self) -> usize {
        table::page_count(self.filtered_len())
    }

    /// The rows on the current page of the derived view.
    pub fn visible_rows(&self) -> Vec<&TranslationKey> {
        let filtered = self.filtered_rows();
        table::page_slice(&filtered, self.table.page()).to_vec()
    }

    /// Re-clamps the page after anything that can change the matching-row
    /// count (search, tags, selection, mirror replacement).
    pub fn sync_view(&mut self) {
        let len = self.filtered_len();
        self.table.clamp_page(len);
    }

    // --- sync bookkeeping -------------------------------------------------

    pub(crate) fn profile_needed(&self) -> bool {
        match self.session.token() {
            Some(token) => {
                self.session.user_identity().is_none()
                    && self.profile_attempted_for.as_deref() != Some(token)
            }
            None => false,
        }
    }

    pub(crate) fn note_profile_attempt(&mut self, token: &str) {
        self.profile_attempted_for = Some(token.to_string());
    }

    pub(crate) fn catalog_needed(&self) -> bool {
        self.session.is_authenticated() && !self.catalog_loaded && !self.catalog_attempted
    }

    pub(crate) fn note_catalog_attempt(&mut self) {
        self.catalog_attempted = true;
    }

    pub(crate) fn note_catalog_loaded(&mut self) {
        self.catalog_loaded = true;
    }

    pub(crate) fn mirror_needed(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        let Some((project, language)) = self.catalog.selected_pair() else {
            return false;
        };
        let pair = (project.to_string(), language.to_string());
        self.mirror_synced_for != Some(pair.clone()) && self.mirror_attempted_for != Some(pair)
    }

    pub(crate) fn note_mirror_attempt(&mut self, project: &str, language: &str) {
        self.mirror_attempted_for = Some((project.to_string(), language.to_string()));
    }

    pub(crate) fn note_mirror_synced(&mut self, project: &str, language: &str) {
        self.mirror_synced_for = Some((project.to_string(), language.to_string()));
    }

    /// Forgets per-session sync progress. Called when the token is cleared
    /// or replaced so the next session re-reads everything it needs. An
    /// already-loaded catalog index is kept; only the attempt latch re-arms.
    pub(crate) fn reset_sync_latches(&mut self) {
        self.mirror_synced_for = None;
        self.mirror_attempted_for = None;
        self.profile_attempted_for = None;
        self.catalog_attempted = false;
    }

    /// Re-arms every load, including the catalog index. Backs the explicit
    /// refresh action.
    pub(crate) fn rearm_loads(&mut self) {
        self.reset_sync_latches();
        self.catalog_loaded = false;
        self.catalog_attempted = false;
    }
}
