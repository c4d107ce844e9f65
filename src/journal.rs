use chrono::NaiveDate;
use fs2::FileExt;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::JournalError;
use crate::status::Status;
use crate::store::{load_tasks, store_tasks};

const ARCHIVE_DIR: &str = "archives";
const LOCK_FILE: &str = ".lock";
const GROUPED_TASK_FILE: &str = "tasks.txt";
const PAGE_EXTENSION: &str = ".txt";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a page is stored under the journal root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Layout {
    /// `<root>/YYYY-MM-DD.txt`
    #[default]
    Flat,
    /// `<root>/YYYY-MM-DD/tasks.txt`
    Grouped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PageId(NaiveDate);

impl PageId {
    pub(crate) fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .filter(|date| date.format(DATE_FORMAT).to_string() == value)
            .map(Self)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Migration {
    pub(crate) page: PageId,
    pub(crate) carried: usize,
    pub(crate) archived_to: PathBuf,
}

#[derive(Debug)]
pub(crate) struct Rotation {
    pub(crate) current: PathBuf,
    pub(crate) created: bool,
    pub(crate) migrated: Option<Migration>,
}

#[derive(Clone, Debug)]
pub(crate) struct Journal {
    root: PathBuf,
    layout: Layout,
}

impl Journal {
    pub(crate) fn new(root: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn layout(&self) -> Layout {
        self.layout
    }

    pub(crate) fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    fn storage_name(&self, id: PageId) -> String {
        match self.layout {
            Layout::Flat => format!("{}{}", id, PAGE_EXTENSION),
            Layout::Grouped => id.to_string(),
        }
    }

    /// The file or directory that gets archived for a page.
    pub(crate) fn page_storage(&self, id: PageId) -> PathBuf {
        self.root.join(self.storage_name(id))
    }

    /// The task file of a page.
    pub(crate) fn page_path(&self, id: PageId) -> PathBuf {
        match self.layout {
            Layout::Flat => self.page_storage(id),
            Layout::Grouped => self.page_storage(id).join(GROUPED_TASK_FILE),
        }
    }

    /// Where a page's storage lands once archived.
    pub(crate) fn archived_path(&self, id: PageId) -> PathBuf {
        self.archive_dir().join(self.storage_name(id))
    }

    fn parse_storage_name(&self, name: &str, is_dir: bool) -> Option<PageId> {
        match self.layout {
            Layout::Flat if !is_dir => name.strip_suffix(PAGE_EXTENSION).and_then(PageId::parse),
            Layout::Grouped if is_dir => PageId::parse(name),
            _ => None,
        }
    }

    /// Every non-archived page in the root, oldest first. Entries that are not
    /// pages of the configured layout are ignored.
    pub(crate) fn list_pages(&self) -> Result<Vec<PageId>, JournalError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(|err| {
            JournalError::io(format!("Failed to list {}", self.root.display()), err)
        })?;

        let mut pages = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                JournalError::io(format!("Failed to list {}", self.root.display()), err)
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name == ARCHIVE_DIR {
                continue;
            }
            let is_dir = entry.path().is_dir();
            if let Some(id) = self.parse_storage_name(&name, is_dir) {
                pages.push(id);
            }
        }
        pages.sort();
        Ok(pages)
    }

    /// Pages other than `today`. More than one means the journal is corrupted.
    pub(crate) fn stale_pages(&self, today: PageId) -> Result<Vec<PageId>, JournalError> {
        Ok(self
            .list_pages()?
            .into_iter()
            .filter(|id| *id != today)
            .collect())
    }

    /// Creates the page storage if absent.
    pub(crate) fn open_page(&self, id: PageId) -> Result<(), JournalError> {
        let path = self.page_path(id);
        if path.exists() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }
        store_tasks(&path, &[])
    }

    /// Makes `today` the current page, carrying unfinished work over from the
    /// previous page and archiving it. Fails before touching anything when the
    /// journal holds more than one stale page, the archive slot is taken, or
    /// either page fails to decode.
    pub(crate) fn rotate(&self, today: PageId) -> Result<Rotation, JournalError> {
        let stale = self.stale_pages(today)?;
        if stale.len() > 1 {
            return Err(JournalError::JournalCorrupted {
                pages: stale.iter().map(|id| self.storage_name(*id)).collect(),
            });
        }

        let existed = self.page_path(today).exists();
        let mut migrated = None;
        if let Some(previous) = stale.first().copied() {
            let archived_to = self.archived_path(previous);
            if archived_to.exists() {
                return Err(JournalError::ArchiveCollision { path: archived_to });
            }
            // Both pages must decode before anything is created or written.
            load_tasks(&self.page_path(previous))?;
            load_tasks(&self.page_path(today))?;

            create_dir_all(&self.archive_dir())?;
            if self.layout == Layout::Grouped {
                create_dir_all(&self.page_storage(today))?;
            }

            let carried = postpone(&self.page_path(previous), &self.page_path(today))?;
            let from = self.page_storage(previous);
            fs::rename(&from, &archived_to).map_err(|err| {
                JournalError::io(
                    format!(
                        "Failed to archive {} -> {}",
                        from.display(),
                        archived_to.display()
                    ),
                    err,
                )
            })?;
            migrated = Some(Migration {
                page: previous,
                carried,
                archived_to,
            });
        } else {
            create_dir_all(&self.archive_dir())?;
        }

        self.open_page(today)?;
        Ok(Rotation {
            current: self.page_path(today),
            created: !existed,
            migrated,
        })
    }
}

/// Marks the previous page's pending tasks as postponed and appends a pending
/// copy of every postponed task to the current page. Returns the number of
/// carried tasks.
///
/// The previous page is written before the current one. If the second write
/// fails, a retry against the same previous page recopies the same set.
/// Running it again after both writes succeeded duplicates the carried tasks,
/// which is why `rotate` archives the previous page right after.
pub(crate) fn postpone(previous: &Path, current: &Path) -> Result<usize, JournalError> {
    let mut tasks = load_tasks(previous)?;
    let mut current_tasks = load_tasks(current)?;
    let mut carried = Vec::new();
    for task in tasks.iter_mut() {
        if task.status == Status::Pending {
            task.status = Status::Postponed;
        }
        if task.status == Status::Postponed {
            carried.push(task.reopened());
        }
    }
    store_tasks(previous, &tasks)?;

    let count = carried.len();
    current_tasks.extend(carried);
    store_tasks(current, &current_tasks)?;
    Ok(count)
}

/// Exclusive advisory lock over the journal root, held for a whole run.
#[derive(Debug)]
pub(crate) struct JournalLock {
    file: fs::File,
}

impl JournalLock {
    pub(crate) fn acquire(root: &Path) -> Result<Self, JournalError> {
        create_dir_all(root)?;
        let path = root.join(LOCK_FILE);
        let file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|err| JournalError::io(format!("Failed to open {}", path.display()), err))?;
        file.lock_exclusive()
            .map_err(|err| JournalError::io(format!("Failed to lock {}", path.display()), err))?;
        Ok(Self { file })
    }
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn create_dir_all(path: &Path) -> Result<(), JournalError> {
    fs::create_dir_all(path).map_err(|err| {
        JournalError::io(format!("Failed to create directory {}", path.display()), err)
    })
}
