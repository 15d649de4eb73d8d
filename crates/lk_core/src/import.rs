/// File payload staged for a bulk import. The bytes are opaque here; the
/// backend owns CSV parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Staged bulk-import workflow: a target language and a file, both required
/// before the upload request may be built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkImportForm {
    pub open: bool,
    language: Option<String>,
    file: Option<CsvPayload>,
}

impl BulkImportForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn file(&self) -> Option<&CsvPayload> {
        self.file.as_ref()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn stage_language(&mut self, language: &str) {
        self.language = Some(language.to_string());
    }

    pub fn stage_file(&mut self, filename: &str, bytes: Vec<u8>) {
        self.file = Some(CsvPayload {
            filename: filename.to_string(),
            bytes,
        });
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Both inputs present, or a local validation failure.
    pub fn submission(&self) -> Result<(String, CsvPayload), &'static str> {
        match (&self.language, &self.file) {
            (Some(language), Some(file)) => Ok((language.clone(), file.clone())),
            _ => Err("select a target language and a CSV file"),
        }
    }
}
