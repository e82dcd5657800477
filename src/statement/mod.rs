//! Parsed statement templates and the per-connection registry that owns them.

mod registry;
mod tokenizer;

pub use registry::{StatementRegistry, StmtHandle};
pub use tokenizer::tokenize;

/// How a placeholder's bound value is turned into SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `?`: quoted through `quote_smart`.
    Scalar,
    /// `&`: the value names a file whose contents are quoted and inlined.
    Opaque,
    /// `!`: inserted as-is.
    Verbatim,
}

impl PlaceholderKind {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(PlaceholderKind::Scalar),
            '&' => Some(PlaceholderKind::Opaque),
            '!' => Some(PlaceholderKind::Verbatim),
            _ => None,
        }
    }
}

/// A statement template split into literal fragments around its placeholders.
///
/// There is always exactly one more fragment than there are placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    fragments: Vec<String>,
    kinds: Vec<PlaceholderKind>,
    template: String,
}

impl PreparedStatement {
    pub(crate) fn new(fragments: Vec<String>, kinds: Vec<PlaceholderKind>) -> Self {
        debug_assert_eq!(fragments.len(), kinds.len() + 1);
        let template = fragments.join(" ");
        Self {
            fragments,
            kinds,
            template,
        }
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    #[must_use]
    pub fn kinds(&self) -> &[PlaceholderKind] {
        &self.kinds
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.kinds.len()
    }

    /// Fragments joined by spaces; used in diagnostics.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}
