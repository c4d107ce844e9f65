use serde::Deserialize;

use crate::error::TaskIndexNotFound;
use crate::status::Status;
use crate::task::Task;

/// Sets `status` on every addressed task. Indices outside `0..len`, negative
/// ones included, are reported and skipped; the rest still apply.
pub(crate) fn apply_indexed(
    tasks: &mut [Task],
    indices: &[i64],
    status: Status,
) -> Vec<TaskIndexNotFound> {
    let mut missing = Vec::new();
    let len = tasks.len();
    for &index in indices {
        let slot = usize::try_from(index).ok();
        match slot.and_then(|slot| tasks.get_mut(slot)) {
            Some(task) => task.status = status,
            None => missing.push(TaskIndexNotFound { index, len }),
        }
    }
    missing
}

pub(crate) fn append_new(tasks: &mut Vec<Task>, new_tasks: Vec<Task>) {
    tasks.extend(new_tasks);
}

/// One run's worth of requested changes.
#[derive(Debug, Default)]
pub(crate) struct Edits {
    pub(crate) restore: Vec<i64>,
    pub(crate) cross: Vec<i64>,
    pub(crate) check: Vec<i64>,
    pub(crate) postpone: Vec<i64>,
    pub(crate) add: Vec<Task>,
}

impl Edits {
    pub(crate) fn is_empty(&self) -> bool {
        self.restore.is_empty()
            && self.cross.is_empty()
            && self.check.is_empty()
            && self.postpone.is_empty()
            && self.add.is_empty()
    }

    /// Applies restore, cross, check, postpone, then appends. Later steps win
    /// when they address the same index.
    pub(crate) fn apply(self, tasks: &mut Vec<Task>) -> Vec<TaskIndexNotFound> {
        let mut missing = Vec::new();
        missing.extend(apply_indexed(tasks, &self.restore, Status::Pending));
        missing.extend(apply_indexed(tasks, &self.cross, Status::Erased));
        missing.extend(apply_indexed(tasks, &self.check, Status::Done));
        missing.extend(apply_indexed(tasks, &self.postpone, Status::Postponed));
        append_new(tasks, self.add);
        missing
    }
}

/// Order in which a page is persisted and displayed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Order {
    /// Line order is kept, so indices stay stable across runs.
    #[default]
    Insertion,
    /// Stable sort by status rank after every run.
    Status,
}

impl Order {
    pub(crate) fn apply(self, tasks: &mut [Task]) {
        if self == Order::Status {
            tasks.sort_by_key(|task| task.status);
        }
    }
}
