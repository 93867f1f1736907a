use crate::engine::complex::{CodecOptions, DEFAULT_NULL_MEMBER};

pub struct CodecOptionsFactory {
    delimiters: Vec<String>,
    null_member: String,
}

impl CodecOptionsFactory {
    pub fn new() -> Self {
        Self {
            delimiters: vec!["$".into(), "#".into()],
            null_member: DEFAULT_NULL_MEMBER.into(),
        }
    }

    pub fn with_delimiters(mut self, delimiters: &[&str]) -> Self {
        self.delimiters = delimiters.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn with_null_member(mut self, null_member: &str) -> Self {
        self.null_member = null_member.into();
        self
    }

    pub fn create(self) -> CodecOptions {
        CodecOptions::new(self.delimiters, &self.null_member).expect("valid codec options")
    }
}
