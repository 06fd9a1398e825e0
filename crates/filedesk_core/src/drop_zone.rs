use crate::{AcceptRule, FileId, OfferedFile, PendingFile, ValidationError};

/// Monotonic source of [`FileId`]s, shared by every drop zone of one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIds {
    next: FileId,
}

impl Default for FileIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl FileIds {
    pub fn next_id(&mut self) -> FileId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One validating entry point for files, parametrized by its accept rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropZone {
    rule: AcceptRule,
}

impl DropZone {
    pub fn new(rule: AcceptRule) -> Self {
        Self { rule }
    }

    /// Validates each offered file in order and hands accepted ones to `on_accepted`.
    ///
    /// Returns the rejections; accepted files keep their relative order.
    pub fn offer<F>(
        &self,
        files: Vec<OfferedFile>,
        ids: &mut FileIds,
        mut on_accepted: F,
    ) -> Vec<ValidationError>
    where
        F: FnMut(PendingFile),
    {
        let mut rejected = Vec::new();
        for file in files {
            match self.rule.validate(&file.name, file.mime.as_deref()) {
                Ok(()) => on_accepted(PendingFile {
                    id: ids.next_id(),
                    name: file.name,
                    path: file.path,
                    size: file.size,
                    mime: file.mime,
                    category: self.rule.category,
                }),
                Err(err) => rejected.push(err),
            }
        }
        rejected
    }
}
