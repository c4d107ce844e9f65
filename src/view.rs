use regex::{Regex, RegexBuilder};

use crate::error::JournalError;
use crate::status::Status;
use crate::task::Task;

const BOLD: &str = "\x1b[1m";
const END: &str = "\x1b[0m";

#[derive(Debug)]
pub(crate) enum Filter {
    /// Lowercased needle.
    Substring(String),
    Pattern(Regex),
}

impl Filter {
    /// `/expr/` is a case-insensitive regex, anything else a case-insensitive
    /// substring. A lone `/` has no closing delimiter, so it is the substring
    /// `/` rather than an empty regex matching every task.
    pub(crate) fn parse(expression: &str) -> Result<Self, JournalError> {
        let pattern = expression
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'));
        match pattern {
            Some(pattern) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .map(Filter::Pattern)
                .map_err(|err| JournalError::InvalidFilter {
                    expression: expression.to_string(),
                    reason: err.to_string(),
                }),
            None => Ok(Filter::Substring(expression.to_lowercase())),
        }
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        match self {
            Filter::Substring(needle) => text.to_lowercase().contains(needle.as_str()),
            Filter::Pattern(regex) => regex.is_match(text),
        }
    }
}

pub(crate) fn parse_filters(expressions: &[String]) -> Result<Vec<Filter>, JournalError> {
    expressions.iter().map(|expr| Filter::parse(expr)).collect()
}

/// Which index a visible task is shown with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Numbering {
    /// Index in the persisted page; valid input for status edits.
    #[default]
    Position,
    /// 0.. over the visible tasks only.
    Sequential,
}

/// Tasks to display, paired with their display index. Only pending tasks are
/// eligible unless `all` is set; with filters, a task must match at least one.
pub(crate) fn visible<'a>(
    tasks: &'a [Task],
    all: bool,
    filters: &'a [Filter],
    numbering: Numbering,
) -> impl Iterator<Item = (usize, &'a Task)> + 'a {
    tasks
        .iter()
        .enumerate()
        .filter(move |(_, task)| all || task.status == Status::Pending)
        .filter(move |(_, task)| {
            filters.is_empty() || filters.iter().any(|filter| filter.matches(&task.text))
        })
        .enumerate()
        .map(move |(sequence, (position, task))| match numbering {
            Numbering::Position => (position, task),
            Numbering::Sequential => (sequence, task),
        })
}

pub(crate) fn render_line(index: usize, task: &Task, bold: bool) -> String {
    if bold {
        format!("{} {}{}{} {}", index, BOLD, task.status, END, task.text)
    } else {
        format!("{} {} {}", index, task.status, task.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: Status, text: &str) -> Task {
        Task::new(status, text).expect("valid task")
    }

    fn sample() -> Vec<Task> {
        vec![
            task(Status::Done, "Buy milk"),
            task(Status::Pending, "Call Bob"),
            task(Status::Erased, "call alice"),
            task(Status::Pending, "write report"),
            task(Status::Postponed, "bob's taxes"),
        ]
    }

    fn collect(
        tasks: &[Task],
        all: bool,
        filters: &[Filter],
        numbering: Numbering,
    ) -> Vec<(usize, String)> {
        visible(tasks, all, filters, numbering)
            .map(|(index, task)| (index, task.text.clone()))
            .collect()
    }

    #[test]
    fn pending_only_by_default() {
        let tasks = sample();
        assert_eq!(
            collect(&tasks, false, &[], Numbering::Position),
            vec![(1, "Call Bob".to_string()), (3, "write report".to_string())]
        );
    }

    #[test]
    fn sequential_numbering_renumbers_visible_tasks() {
        let tasks = sample();
        assert_eq!(
            collect(&tasks, false, &[], Numbering::Sequential),
            vec![(0, "Call Bob".to_string()), (1, "write report".to_string())]
        );
    }

    #[test]
    fn all_includes_every_status() {
        let tasks = sample();
        let shown = collect(&tasks, true, &[], Numbering::Position);
        assert_eq!(shown.len(), tasks.len());
        assert_eq!(shown[4], (4, "bob's taxes".to_string()));
    }

    #[test]
    fn substring_filter_is_case_insensitive() {
        let tasks = sample();
        let filters = parse_filters(&["BOB".to_string()]).unwrap();
        assert_eq!(
            collect(&tasks, true, &filters, Numbering::Position),
            vec![(1, "Call Bob".to_string()), (4, "bob's taxes".to_string())]
        );
    }

    #[test]
    fn regex_filter_is_case_insensitive() {
        let tasks = sample();
        let filters = parse_filters(&["/^call/".to_string()]).unwrap();
        assert_eq!(
            collect(&tasks, true, &filters, Numbering::Sequential),
            vec![(0, "Call Bob".to_string()), (1, "call alice".to_string())]
        );
    }

    #[test]
    fn any_filter_match_is_enough() {
        let tasks = sample();
        let filters = parse_filters(&["milk".to_string(), "/report$/".to_string()]).unwrap();
        assert_eq!(
            collect(&tasks, true, &filters, Numbering::Position),
            vec![(0, "Buy milk".to_string()), (3, "write report".to_string())]
        );
    }

    #[test]
    fn lone_slash_is_a_substring() {
        let filter = Filter::parse("/").unwrap();
        assert!(matches!(filter, Filter::Substring(_)));
        assert!(filter.matches("either/or"));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let err = Filter::parse("/(unclosed/").unwrap_err();
        assert!(matches!(err, JournalError::InvalidFilter { .. }));
    }

    #[test]
    fn render_line_plain_and_bold() {
        let task = task(Status::Pending, "buy milk");
        assert_eq!(render_line(0, &task, false), "0 • buy milk");
        assert_eq!(render_line(2, &task, true), "2 \x1b[1m•\x1b[0m buy milk");
    }
}
