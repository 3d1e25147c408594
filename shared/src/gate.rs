use crate::error::VisitError;

/// Shared-secret switch for edit mode, plus the row currently being edited.
///
/// This only hides the editing UI. The secret ships with the client, so it
/// grants no access control.
#[derive(Debug, Clone)]
pub struct EditGate {
    secret: String,
    open: bool,
    editing: Option<usize>,
}

impl EditGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            open: false,
            editing: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the gate when `supplied` matches the secret exactly. A mismatch
    /// leaves the gate as it was.
    pub fn request_enable(&mut self, supplied: &str) -> bool {
        if supplied == self.secret {
            self.open = true;
            tracing::info!("edit mode enabled");
            true
        } else {
            tracing::warn!("edit key rejected");
            false
        }
    }

    /// Close the gate and drop any pending edit target.
    pub fn disable(&mut self) {
        if self.open {
            tracing::info!("edit mode disabled");
        }
        self.open = false;
        self.editing = None;
    }

    pub fn ensure_open(&self) -> Result<(), VisitError> {
        if self.open {
            Ok(())
        } else {
            Err(VisitError::EditLocked)
        }
    }

    pub fn editing(&self) -> Option<usize> {
        self.editing
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<(), VisitError> {
        self.ensure_open()?;
        self.editing = Some(index);
        Ok(())
    }

    pub fn finish_edit(&mut self) -> Option<usize> {
        self.editing.take()
    }

    /// Keep the pending target pointing at the same row after `removed` is
    /// deleted. Editing the deleted row itself is abandoned.
    pub fn row_removed(&mut self, removed: usize) {
        self.editing = match self.editing {
            Some(index) if index == removed => None,
            Some(index) if index > removed => Some(index - 1),
            other => other,
        };
    }
}
