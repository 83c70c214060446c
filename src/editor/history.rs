//! Linear undo/redo over whole-design transform snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layers::LayerId;
use crate::geometry::Transform;

/// Immutable transform state of every layer at a committed point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    transforms: BTreeMap<LayerId, Transform>,
}

impl DesignSnapshot {
    pub fn from_layers(layers: impl IntoIterator<Item = (LayerId, Transform)>) -> Self {
        Self {
            transforms: layers.into_iter().collect(),
        }
    }

    /// Built-in per-kind defaults.
    pub fn defaults() -> Self {
        Self::from_layers(LayerId::ALL.map(|id| (id, id.default_transform())))
    }

    pub fn transform(&self, id: LayerId) -> Option<Transform> {
        self.transforms.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerId, Transform)> + '_ {
        self.transforms.iter().map(|(id, transform)| (*id, *transform))
    }
}

#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<DesignSnapshot>,
    cursor: usize,
}

impl HistoryStack {
    pub fn new(seed: DesignSnapshot) -> Self {
        Self {
            entries: vec![seed],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the stack is seeded on construction and on `reset`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &DesignSnapshot {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn commit(&mut self, snapshot: DesignSnapshot) {
        let discarded = self.entries.len() - (self.cursor + 1);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
        tracing::debug!(cursor = self.cursor, discarded, "history commit");
    }

    /// Steps back one entry. At the oldest entry this is a no-op that returns
    /// the unchanged current snapshot.
    pub fn undo(&mut self) -> &DesignSnapshot {
        if self.can_undo() {
            self.cursor -= 1;
            tracing::debug!(cursor = self.cursor, "history undo");
        } else {
            tracing::debug!("undo stack empty");
        }
        self.current()
    }

    pub fn redo(&mut self) -> &DesignSnapshot {
        if self.can_redo() {
            self.cursor += 1;
            tracing::debug!(cursor = self.cursor, "history redo");
        } else {
            tracing::debug!("redo stack empty");
        }
        self.current()
    }

    pub fn reset(&mut self, seed: DesignSnapshot) {
        self.entries.clear();
        self.entries.push(seed);
        self.cursor = 0;
        tracing::debug!("history reset");
    }
}
