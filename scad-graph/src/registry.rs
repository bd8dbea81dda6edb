//! [`EditorRegistry`]: the ordered set of open editors and the close/confirm
//! contract a host UI drives its tab bar from.

use crate::editor::{Editor, FileInfo};

/// One open editor, named for display (its filename, or a placeholder for
/// an unsaved document).
#[derive(Debug)]
struct Entry {
    editor: Editor,
    label: String,
}

/// Ordered collection of open editors. Holds no UI state itself; a host
/// renders tabs/status bars from [`EditorRegistry::file_infos`] and drives
/// `close` with a user confirmation callback when a document is dirty.
#[derive(Debug, Default)]
pub struct EditorRegistry {
    entries: Vec<Entry>,
    active: usize,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new(), active: 0 }
    }

    /// Open a fresh, empty, untitled editor and make it active.
    pub fn open_untitled(&mut self) -> usize {
        self.entries.push(Entry { editor: Editor::new(), label: "untitled".to_string() });
        self.active = self.entries.len() - 1;
        self.active
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.active)
    }

    pub fn set_active(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn editor(&self, index: usize) -> Option<&Editor> {
        self.entries.get(index).map(|e| &e.editor)
    }

    pub fn editor_mut(&mut self, index: usize) -> Option<&mut Editor> {
        self.entries.get_mut(index).map(|e| &mut e.editor)
    }

    pub fn active_editor(&self) -> Option<&Editor> {
        self.editor(self.active)
    }

    pub fn active_editor_mut(&mut self) -> Option<&mut Editor> {
        let active = self.active;
        self.editor_mut(active)
    }

    /// `FileInfo` for every open editor, in tab order - what a status bar
    /// or tab strip renders from.
    pub fn file_infos(&self) -> Vec<FileInfo> {
        self.entries.iter().map(|e| e.editor.file().clone()).collect()
    }

    /// Close the editor at `index`. If it is dirty, `confirm` is asked
    /// whether to proceed (e.g. "discard unsaved changes?"); the registry
    /// only drops the editor if `confirm` returns `true` for a dirty
    /// document, or unconditionally for a clean one. Returns whether the
    /// editor was actually closed.
    pub fn close(&mut self, index: usize, confirm: impl FnOnce() -> bool) -> bool {
        let Some(entry) = self.entries.get(index) else { return false };
        if entry.editor.is_dirty() && !confirm() {
            return false;
        }
        self.entries.remove(index);
        if self.active >= self.entries.len() && !self.entries.is_empty() {
            self.active = self.entries.len() - 1;
        }
        true
    }

    /// Update the display label shown for editor `index`, e.g. after a
    /// successful SAVE/OPEN changes its `FileInfo::filename`.
    pub fn relabel(&mut self, index: usize, label: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.label = label.into();
        }
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.label.as_str())
    }
}
