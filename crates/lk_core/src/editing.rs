use crate::model::TranslationKey;

/// Unsaved inline changes for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEdit {
    pub row_id: String,
    pub value: String,
    pub description: String,
}

/// Inline-edit state machine. A row is either viewed or edited; at most one
/// row is in the editing state. Beginning an edit while another row is being
/// edited discards that row's unsaved changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditState {
    active: Option<RowEdit>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&RowEdit> {
        self.active.as_ref()
    }

    pub fn editing_row(&self) -> Option<&str> {
        self.active.as_ref().map(|edit| edit.row_id.as_str())
    }

    pub fn is_editing(&self, row_id: &str) -> bool {
        self.editing_row() == Some(row_id)
    }

    /// Enters edit mode for `row`, seeding the form with the row's current
    /// value for `language` and its description. Any other in-progress edit
    /// is dropped.
    pub fn begin(&mut self, row: &TranslationKey, language: &str) {
        self.active = Some(RowEdit {
            row_id: row.id.clone(),
            value: row.value_for(language).unwrap_or("").to_string(),
            description: row.description_text().to_string(),
        });
    }

    pub fn set_value(&mut self, value: &str) {
        if let Some(edit) = self.active.as_mut() {
            edit.value.clear();
            edit.value.push_str(value);
        }
    }

    pub fn set_description(&mut self, description: &str) {
        if let Some(edit) = self.active.as_mut() {
            edit.description.clear();
            edit.description.push_str(description);
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Leaves edit mode and hands the unsaved changes to the caller. Save
    /// paths use this so the row returns to viewing before any request
    /// settles.
    pub fn take(&mut self) -> Option<RowEdit> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, TranslationValue};
    use std::collections::BTreeMap;

    fn row(id: &str, key: &str, en_value: &str) -> TranslationKey {
        let mut translations = BTreeMap::new();
        translations.insert(
            "en".to_string(),
            TranslationValue {
                value: en_value.to_string(),
                updated_at: String::new(),
                updated_by: String::new(),
            },
        );
        TranslationKey {
            id: id.to_string(),
            key: key.to_string(),
            category: Category::Button,
            description: Some("desc".to_string()),
            translations,
        }
    }

    #[test]
    fn t_edit_001_begin_seeds_form_from_row() {
        let mut edit = EditState::new();
        edit.begin(&row("1", "btn.save", "Save"), "en");
        let active = edit.active().expect("active edit");
        assert_eq!(active.row_id, "1");
        assert_eq!(active.value, "Save");
        assert_eq!(active.description, "desc");
    }

    #[test]
    fn t_edit_002_begin_on_untranslated_row_seeds_empty_value() {
        let mut edit = EditState::new();
        edit.begin(&row("1", "btn.save", "Save"), "fr");
        assert_eq!(edit.active().expect("active edit").value, "");
    }

    #[test]
    fn t_edit_003_begin_on_other_row_discards_unsaved_changes() {
        let mut edit = EditState::new();
        edit.begin(&row("1", "btn.save", "Save"), "en");
        edit.set_value("Save Now");

        edit.begin(&row("2", "btn.cancel", "Cancel"), "en");
        assert!(edit.is_editing("2"));
        assert!(!edit.is_editing("1"));
        assert_eq!(edit.active().expect("active edit").value, "Cancel");
    }

    #[test]
    fn t_edit_004_take_exits_edit_mode() {
        let mut edit = EditState::new();
        edit.begin(&row("1", "btn.save", "Save"), "en");
        edit.set_value("Save Now");

        let taken = edit.take().expect("taken edit");
        assert_eq!(taken.value, "Save Now");
        assert!(edit.active().is_none());
        assert!(edit.take().is_none());
    }

    #[test]
    fn t_edit_005_set_value_without_active_edit_is_noop() {
        let mut edit = EditState::new();
        edit.set_value("ignored");
        edit.set_description("ignored");
        assert!(edit.active().is_none());
    }
}
