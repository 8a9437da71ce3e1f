use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};

/// Ordered content lists (for example a screen's playlist rotation),
/// keyed by container id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSequences {
    containers: BTreeMap<String, Vec<String>>,
}

impl ContentSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the items of `container_id`.
    pub fn set(&mut self, container_id: impl Into<String>, items: Vec<String>) {
        self.containers.insert(container_id.into(), items);
    }

    pub fn get(&self, container_id: &str) -> Option<&[String]> {
        self.containers.get(container_id).map(Vec::as_slice)
    }

    pub fn remove(&mut self, container_id: &str) -> Option<Vec<String>> {
        self.containers.remove(container_id)
    }

    /// Moves `item_id` to `new_index` inside `container_id`. Indices past
    /// the end place the item last.
    pub fn reorder(
        &mut self,
        container_id: &str,
        item_id: &str,
        new_index: usize,
    ) -> ScheduleResult<&[String]> {
        let items = self.containers.get_mut(container_id).ok_or_else(|| {
            ScheduleError::NotFound(format!("Content sequence {} not found", container_id))
        })?;

        let current = items.iter().position(|item| item == item_id).ok_or_else(|| {
            ScheduleError::NotFound(format!(
                "Item {} not found in content sequence {}",
                item_id, container_id
            ))
        })?;

        let item = items.remove(current);
        let target = new_index.min(items.len());
        items.insert(target, item);

        Ok(items.as_slice())
    }
}
