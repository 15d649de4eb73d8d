use crate::model::{Language, Project};

/// Language picked automatically when nothing is selected and the list
/// contains it.
pub const DEFAULT_LANGUAGE_ID: &str = "en";

/// Discovered projects/languages plus the active selection. Selections are
/// validated against the lists; replacing a list drops a selection that is
/// no longer present in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    available_projects: Vec<Project>,
    available_languages: Vec<Language>,
    selected_project: Option<String>,
    selected_language: Option<String>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available_projects(&self) -> &[Project] {
        &self.available_projects
    }

    pub fn available_languages(&self) -> &[Language] {
        &self.available_languages
    }

    pub fn selected_project(&self) -> Option<&str> {
        self.selected_project.as_deref()
    }

    pub fn selected_language(&self) -> Option<&str> {
        self.selected_language.as_deref()
    }

    /// Active project+language pair, once both are selected.
    pub fn selected_pair(&self) -> Option<(&str, &str)> {
        Some((self.selected_project()?, self.selected_language()?))
    }

    pub fn set_available_projects(&mut self, projects: Vec<Project>) {
        self.available_projects = projects;
        if let Some(selected) = self.selected_project.clone() {
            if !self
                .available_projects
                .iter()
                .any(|project| project.id == selected)
            {
                self.selected_project = None;
            }
        }
    }

    pub fn set_available_languages(&mut self, languages: Vec<Language>) {
        self.available_languages = languages;
        if let Some(selected) = self.selected_language.clone() {
            if !self
                .available_languages
                .iter()
                .any(|language| language.id == selected)
            {
                self.selected_language = None;
            }
        }
    }

    pub fn set_selected_project(&mut self, id: &str) -> bool {
        if self
            .available_projects
            .iter()
            .any(|project| project.id == id)
        {
            self.selected_project = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn set_selected_language(&mut self, id: &str) -> bool {
        if self
            .available_languages
            .iter()
            .any(|language| language.id == id)
        {
            self.selected_language = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Fills in missing selections once lists are available. A project
    /// defaults to the first in list order; a language prefers
    /// [`DEFAULT_LANGUAGE_ID`] and falls back to the first in list order.
    /// Explicit selections are never overridden. Returns true if anything
    /// was selected.
    pub fn apply_default_selection(&mut self) -> bool {
        let mut changed = false;

        if self.selected_project.is_none() {
            if let Some(first) = self.available_projects.first() {
                self.selected_project = Some(first.id.clone());
                changed = true;
            }
        }

        if self.selected_language.is_none() && !self.available_languages.is_empty() {
            let id = self
                .available_languages
                .iter()
                .find(|language| language.id == DEFAULT_LANGUAGE_ID)
                .or_else(|| self.available_languages.first())
                .map(|language| language.id.clone());
            self.selected_language = id;
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn language(id: &str) -> Language {
        Language {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
        }
    }

    #[test]
    fn t_cat_001_default_language_prefers_en() {
        let mut catalog = CatalogState::new();
        catalog.set_available_languages(vec![language("fr"), language("en"), language("de")]);
        assert!(catalog.apply_default_selection());
        assert_eq!(catalog.selected_language(), Some("en"));
    }

    #[test]
    fn t_cat_002_default_language_falls_back_to_first() {
        let mut catalog = CatalogState::new();
        catalog.set_available_languages(vec![language("fr"), language("de")]);
        assert!(catalog.apply_default_selection());
        assert_eq!(catalog.selected_language(), Some("fr"));
    }

    #[test]
    fn t_cat_003_default_project_is_first_in_list_order() {
        let mut catalog = CatalogState::new();
        catalog.set_available_projects(vec![project("website"), project("mobile")]);
        assert!(catalog.apply_default_selection());
        assert_eq!(catalog.selected_project(), Some("website"));
    }

    #[test]
    fn t_cat_004_defaults_never_override_explicit_selection() {
        let mut catalog = CatalogState::new();
        catalog.set_available_languages(vec![language("fr"), language("en")]);
        assert!(catalog.set_selected_language("fr"));
        assert!(!catalog.apply_default_selection());
        assert_eq!(catalog.selected_language(), Some("fr"));
    }

    #[test]
    fn t_cat_005_defaults_are_idempotent() {
        let mut catalog = CatalogState::new();
        catalog.set_available_projects(vec![project("website")]);
        catalog.set_available_languages(vec![language("de"), language("en")]);
        assert!(catalog.apply_default_selection());
        assert!(!catalog.apply_default_selection());
        assert_eq!(catalog.selected_project(), Some("website"));
        assert_eq!(catalog.selected_language(), Some("en"));
    }

    #[test]
    fn t_cat_006_list_update_drops_vanished_selection() {
        let mut catalog = CatalogState::new();
        catalog.set_available_projects(vec![project("website"), project("mobile")]);
        assert!(catalog.set_selected_project("mobile"));

        catalog.set_available_projects(vec![project("website")]);
        assert_eq!(catalog.selected_project(), None);
    }

    #[test]
    fn t_cat_007_selection_rejects_unknown_ids() {
        let mut catalog = CatalogState::new();
        catalog.set_available_projects(vec![project("website")]);
        assert!(!catalog.set_selected_project("missing"));
        assert_eq!(catalog.selected_project(), None);
    }
}
