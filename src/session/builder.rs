use super::{DslListener, EditorSession};
use crate::dsl::{DslMode, EditorMeta};

/// Configures an [`EditorSession`] before it opens.
pub struct SessionBuilder {
    mode: DslMode,
    meta: EditorMeta,
    source: Option<String>,
    listeners: Vec<DslListener>,
}

impl SessionBuilder {
    pub fn new(mode: DslMode, meta: EditorMeta) -> Self {
        Self {
            mode,
            meta,
            source: None,
            listeners: Vec::new(),
        }
    }

    /// Initial DSL text, parsed when the session is built.
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source = Some(text.into());
        self
    }

    /// Registers a listener for regenerated text. May be called more than once.
    pub fn on_dsl_change(mut self, listener: impl FnMut(&str) + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn build(self) -> EditorSession {
        let mut session = EditorSession::new(self.mode, self.meta);
        session.listeners = self.listeners;
        if let Some(source) = self.source {
            session.open(source);
        }
        session
    }
}
