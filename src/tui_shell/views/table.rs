use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use super::super::{ActionCtx, UiEvent, now_ts};
use crate::model::{Record, RecordId};
use crate::remote::Method;
use crate::sync::{SharedRecords, Tracked};

/// Rows of one collection plus the cursor over them.
pub(in crate::tui_shell) struct RecordTable<R> {
    pub(in crate::tui_shell) records: SharedRecords<R>,
    pub(in crate::tui_shell) selected: usize,
    pub(in crate::tui_shell) updated_at: String,
    loading: Arc<AtomicBool>,
}

impl<R: Record> RecordTable<R> {
    pub(in crate::tui_shell) fn new() -> Self {
        Self {
            records: SharedRecords::new(),
            selected: 0,
            updated_at: String::new(),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(in crate::tui_shell) fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub(in crate::tui_shell) fn is_loaded(&self) -> bool {
        self.records.lock().is_loaded()
    }

    pub(in crate::tui_shell) fn refresh(&mut self, ctx: &ActionCtx) {
        if self.loading.swap(true, Ordering::SeqCst) {
            return;
        }
        self.updated_at = now_ts();
        let records = self.records.clone();
        let loading = Arc::clone(&self.loading);
        ctx.client.gateway().dispatch::<Option<Vec<R>>, _, _>(
            Method::Get,
            R::COLLECTION,
            None,
            move |items| {
                let items = items.unwrap_or_default();
                debug!(label = R::LABEL, count = items.len(), "collection loaded");
                records.lock().replace_all(items);
            },
            move || loading.store(false, Ordering::SeqCst),
        );
    }

    pub(in crate::tui_shell) fn delete(&self, id: &RecordId, ctx: &ActionCtx) {
        let records = self.records.clone();
        let events = ctx.events.clone();
        let id = id.clone();
        ctx.client.gateway().dispatch::<serde::de::IgnoredAny, _, _>(
            Method::Delete,
            R::item_path(&id),
            None,
            move |_| {
                records.lock().remove(&id);
                events.send(UiEvent::Status(format!("deleted {} {}", R::LABEL, id.short())));
            },
            || {},
        );
    }

    /// Clamps the cursor to `len` rows and returns it.
    pub(in crate::tui_shell) fn cursor(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.selected.min(len - 1))
        }
    }

    pub(in crate::tui_shell) fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(in crate::tui_shell) fn move_down(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub(in crate::tui_shell) fn rows(&self) -> Vec<Tracked<R>> {
        self.records.snapshot()
    }

    pub(in crate::tui_shell) fn selected_row(&self) -> Option<Tracked<R>> {
        let rows = self.rows();
        let idx = self.cursor(rows.len())?;
        rows.into_iter().nth(idx)
    }

    /// Placeholder line for an empty table.
    pub(in crate::tui_shell) fn empty_label(&self) -> &'static str {
        if !self.is_loaded() && self.is_loading() {
            "(loading...)"
        } else {
            "(empty)"
        }
    }
}
