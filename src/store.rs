use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::JournalError;
use crate::task::Task;

/// Reads a page. A missing file is an empty page.
pub(crate) fn load_tasks(path: &Path) -> Result<Vec<Task>, JournalError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| JournalError::io(format!("Failed to read {}", path.display()), err))?;

    let mut tasks = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let task = Task::from_line(line).map_err(|reason| JournalError::CorruptTaskLine {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}

/// Replaces the page with `tasks`, one per line and no trailing newline.
/// The content goes to a sibling temp file that is renamed over `path`.
pub(crate) fn store_tasks(path: &Path, tasks: &[Task]) -> Result<(), JournalError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let content = tasks
        .iter()
        .map(Task::to_line)
        .collect::<Vec<_>>()
        .join("\n");

    let mut temp = NamedTempFile::new_in(parent).map_err(|err| {
        JournalError::io(
            format!("Failed to create temp file in {}", parent.display()),
            err,
        )
    })?;
    temp.write_all(content.as_bytes())
        .map_err(|err| JournalError::io("Failed to write temp page", err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| JournalError::io("Failed to sync temp page", err))?;
    temp.persist(path).map_err(|err| {
        JournalError::io(format!("Failed to replace {}", path.display()), err.error)
    })?;
    Ok(())
}
