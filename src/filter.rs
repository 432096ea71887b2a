/// Case-insensitive filename suffix filter for Markdown documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFilter {
    /// Lowercase extensions including the leading dot
    extensions: Vec<String>,
}

impl MarkdownFilter {
    /// Build a filter from extensions, with or without a leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext))
            .collect();

        Self { extensions }
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}
