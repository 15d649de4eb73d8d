use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// UI-element kind a translation key belongs to. Closed set; the backend
/// stores the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Button,
    Heading,
    Label,
    Input,
    Link,
    Paragraph,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Button,
        Category::Heading,
        Category::Label,
        Category::Input,
        Category::Link,
        Category::Paragraph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Button => "button",
            Category::Heading => "heading",
            Category::Label => "label",
            Category::Input => "input",
            Category::Link => "link",
            Category::Paragraph => "paragraph",
        }
    }

    pub fn parse(raw: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(rename = "project_name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    #[serde(rename = "value")]
    pub name: String,
}

/// One translated value for one language. `updated_at` is an opaque server
/// timestamp string; the client never computes with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationValue {
    pub value: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
    #[serde(rename = "updatedBy", default)]
    pub updated_by: String,
}

/// A catalog row: one key, its category, and per-language values. A language
/// missing from `translations` means the key is untranslated there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationKey {
    pub id: String,
    pub key: String,
    pub category: Category,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub translations: BTreeMap<String, TranslationValue>,
}

impl TranslationKey {
    pub fn value_for(&self, language: &str) -> Option<&str> {
        self.translations
            .get(language)
            .map(|translation| translation.value.as_str())
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
