use crate::engine::errors::CodecError;
use crate::shared::config::LoadConfig;

pub const DEFAULT_NULL_MEMBER: &str = "@NU#LL$!";

/// Delimiter hierarchy and null sentinel used to split complex text values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    delimiters: Vec<String>,
    null_member: String,
}

impl CodecOptions {
    pub fn new<S: Into<String>>(
        delimiters: impl IntoIterator<Item = S>,
        null_member: &str,
    ) -> Result<Self, CodecError> {
        let delimiters: Vec<String> = delimiters.into_iter().map(Into::into).collect();
        if delimiters.is_empty() || delimiters.iter().any(String::is_empty) {
            return Err(CodecError::NoDelimiters);
        }
        if null_member.is_empty() {
            return Err(CodecError::EmptyNullMember);
        }
        Ok(Self {
            delimiters,
            null_member: null_member.to_string(),
        })
    }

    pub fn from_config(cfg: &LoadConfig) -> Result<Self, CodecError> {
        Self::new(cfg.complex_delimiters.iter().cloned(), &cfg.null_member)
    }

    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    pub fn null_member(&self) -> &str {
        &self.null_member
    }

    /// Delimiter for `level`; levels past the end reuse the last one.
    pub fn delimiter(&self, level: usize) -> &str {
        let last = self.delimiters.len() - 1;
        &self.delimiters[level.min(last)]
    }

    pub fn next_delimiter_index(&self, level: usize) -> usize {
        (level + 1).min(self.delimiters.len() - 1)
    }

    /// Text that encodes as the null member: empty, `"null"`, or the sentinel.
    pub fn is_null_value(&self, text: &str) -> bool {
        text.is_empty() || text == "null" || text == self.null_member
    }
}
