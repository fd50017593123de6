use crate::template::TemplateDocument;

/// Result of a successful mutation: the new document and its status lines.
#[derive(Debug, Clone)]
pub struct Applied {
    pub document: TemplateDocument,
    pub messages: Vec<String>,
    /// False when the document is identical to the one passed in.
    pub changed: bool,
}

impl Applied {
    pub(crate) fn new(original: &TemplateDocument, document: TemplateDocument, messages: Vec<String>) -> Self {
        let changed = *original != document;
        Self {
            document,
            messages,
            changed,
        }
    }
}
