//! `CollectionEditor` — an ordered, reorderable list kept in step with storage.
//!
//! Every successful mutation persists the full sequence under the item's
//! storage key before returning, then echoes the sequence to the change
//! callback. A mutation whose write fails is rolled back, so the in-memory
//! order always equals the last persisted order.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CollectionError, StoreError};
use crate::store::LocalPersistence;
use crate::validation::ValidationContext;

use super::item::CollectionItem;

/// Called with the full sequence after each successful mutation.
pub type ChangeCallback<T> = Box<dyn FnMut(&[T]) + Send>;

pub struct CollectionEditor<T: CollectionItem> {
    persistence: LocalPersistence,
    items: Vec<T>,
    form: T::Form,
    form_visible: bool,
    context: ValidationContext,
    on_change: Option<ChangeCallback<T>>,
    /// Every id this editor has seen or handed out; never issued again.
    issued: HashSet<String>,
}

impl<T: CollectionItem> std::fmt::Debug for CollectionEditor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionEditor")
            .field("key", &T::STORAGE_KEY)
            .field("items", &self.items)
            .field("form_visible", &self.form_visible)
            .finish_non_exhaustive()
    }
}

impl<T: CollectionItem> CollectionEditor<T> {
    /// Empty editor; call [`load`](Self::load) to rehydrate.
    pub fn new(persistence: LocalPersistence) -> Self {
        Self {
            persistence,
            items: Vec::new(),
            form: T::Form::default(),
            form_visible: false,
            context: ValidationContext::now(),
            on_change: None,
            issued: HashSet::new(),
        }
    }

    /// Override the validation context (e.g. pin the current year).
    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = context;
        self
    }

    /// Register the owner's change callback.
    pub fn on_change(mut self, callback: impl FnMut(&[T]) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Replace the in-memory list with the saved one. Unreadable data loads as empty.
    pub fn load(&mut self) {
        self.items = self
            .persistence
            .get_json::<Vec<T>>(T::STORAGE_KEY)
            .unwrap_or_default();
        self.issued
            .extend(self.items.iter().map(|item| item.id().to_string()));
        debug!(key = T::STORAGE_KEY, count = self.items.len(), "Collection loaded");
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    // ── Add sub-form ────────────────────────────────────────────────

    pub fn is_form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn show_form(&mut self) {
        self.form_visible = true;
    }

    /// Hide the add sub-form and clear its fields.
    pub fn hide_form(&mut self) {
        self.form_visible = false;
        self.form = T::Form::default();
    }

    pub fn form(&self) -> &T::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut T::Form {
        &mut self.form
    }

    /// Submit the editor's own sub-form.
    pub fn add_from_form(&mut self) -> Result<T, CollectionError> {
        let candidate = self.form.clone();
        self.add(candidate)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Validate `candidate`, append it with a fresh id, and persist.
    ///
    /// On success the add sub-form is hidden and cleared. On a validation
    /// failure nothing changes and the entered fields are kept.
    pub fn add(&mut self, candidate: T::Form) -> Result<T, CollectionError> {
        let id = self.fresh_id();
        let item = T::build(id, &candidate, &self.context)?;

        self.items.push(item.clone());
        if let Err(e) = self.persist() {
            self.items.pop();
            return Err(e.into());
        }

        self.issued.insert(item.id().to_string());
        info!(key = T::STORAGE_KEY, id = item.id(), "Entry added");
        self.hide_form();
        self.notify();
        Ok(item)
    }

    /// Remove the entry at `position`. Out of bounds is a no-op returning `None`.
    pub fn remove_at(&mut self, position: usize) -> Result<Option<T>, StoreError> {
        if position >= self.items.len() {
            debug!(key = T::STORAGE_KEY, position, "Remove out of bounds ignored");
            return Ok(None);
        }

        let removed = self.items.remove(position);
        if let Err(e) = self.persist() {
            self.items.insert(position, removed);
            return Err(e);
        }

        info!(key = T::STORAGE_KEY, id = removed.id(), "Entry removed");
        self.notify();
        Ok(Some(removed))
    }

    /// Move the entry `from_id` to the position currently held by `to_id`.
    ///
    /// Entries in between shift by one. Equal or unknown ids are a no-op.
    /// Returns whether anything moved.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> Result<bool, StoreError> {
        if from_id == to_id {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (self.position(from_id), self.position(to_id)) else {
            debug!(key = T::STORAGE_KEY, from_id, to_id, "Reorder with unknown id ignored");
            return Ok(false);
        };

        move_item(&mut self.items, from, to);
        if let Err(e) = self.persist() {
            move_item(&mut self.items, to, from);
            return Err(e);
        }

        debug!(key = T::STORAGE_KEY, from, to, "Entries reordered");
        self.notify();
        Ok(true)
    }

    /// Forget in-memory entries and the sub-form (storage is cleared separately).
    pub fn reset(&mut self) {
        self.items.clear();
        self.hide_form();
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = format!("{}-{}", T::ID_PREFIX, Uuid::new_v4());
            if !self.issued.contains(&id) {
                return id;
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.persistence
            .set_json(T::STORAGE_KEY, &self.items)
            .inspect_err(|e| warn!(key = T::STORAGE_KEY, "Failed to save collection: {e}"))
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.items);
        }
    }
}

/// Array-move: take the element at `from` out and reinsert it at `to`.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}
