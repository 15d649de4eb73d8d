use crate::model::Category;

/// Staged input for a new translation key. `key`, `value` and a category are
/// required; submission with any of them missing is rejected locally and
/// never reaches the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddKeyForm {
    pub open: bool,
    pub key: String,
    pub value: String,
    pub category: Option<Category>,
    pub description: String,
}

/// The required fields of a valid add-key submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKey {
    pub key: String,
    pub value: String,
    pub category: Category,
    pub description: String,
}

impl AddKeyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn submission(&self) -> Result<NewKey, &'static str> {
        let key = self.key.trim();
        let value = self.value.trim();
        if key.is_empty() || value.is_empty() {
            return Err("key and value are required");
        }
        let Some(category) = self.category else {
            return Err("select a category");
        };
        Ok(NewKey {
            key: key.to_string(),
            value: value.to_string(),
            category,
            description: self.description.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_form_001_submission_requires_key_value_category() {
        let mut form = AddKeyForm::new();
        assert!(form.submission().is_err());

        form.key = "btn.save".to_string();
        form.value = "Save".to_string();
        assert_eq!(form.submission(), Err("select a category"));

        form.category = Some(Category::Button);
        let new_key = form.submission().expect("valid submission");
        assert_eq!(new_key.key, "btn.save");
        assert_eq!(new_key.category, Category::Button);
        assert_eq!(new_key.description, "");
    }

    #[test]
    fn t_form_002_whitespace_only_fields_are_missing() {
        let form = AddKeyForm {
            open: true,
            key: "  ".to_string(),
            value: "Save".to_string(),
            category: Some(Category::Button),
            description: String::new(),
        };
        assert_eq!(form.submission(), Err("key and value are required"));
    }

    #[test]
    fn t_form_003_clear_resets_every_field() {
        let mut form = AddKeyForm {
            open: true,
            key: "btn.save".to_string(),
            value: "Save".to_string(),
            category: Some(Category::Button),
            description: "primary action".to_string(),
        };
        form.clear();
        assert_eq!(form, AddKeyForm::default());
    }
}
