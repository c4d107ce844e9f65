use std::io::Write;

use crate::app::{quit, Quit, RunContext};
use crate::status::Status;
use crate::store::load_tasks;
use crate::task::Task;

#[derive(Debug, Default)]
struct DoctorReport {
    lines: Vec<String>,
    problems: usize,
}

impl DoctorReport {
    fn ok(&mut self, message: String) {
        self.lines.push(format!("ok: {}", message));
    }

    fn note(&mut self, message: String) {
        self.lines.push(format!("note: {}", message));
    }

    fn problem(&mut self, message: String) {
        self.problems += 1;
        self.lines.push(format!("problem: {}", message));
    }
}

fn status_summary(tasks: &[Task]) -> String {
    Status::ALL
        .iter()
        .map(|status| {
            let count = tasks.iter().filter(|task| task.status == *status).count();
            format!("{}{}", count, status)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn inspect(ctx: &RunContext) -> DoctorReport {
    let journal = &ctx.journal;
    let mut report = DoctorReport::default();
    let root = journal.root();
    if !root.exists() {
        report.note(format!(
            "journal root {} does not exist yet; it is created on the next run",
            root.display()
        ));
        return report;
    }
    if !root.is_dir() {
        report.problem(format!("journal root {} is not a directory", root.display()));
        return report;
    }

    let pages = match journal.list_pages() {
        Ok(pages) => pages,
        Err(err) => {
            report.problem(err.to_string());
            return report;
        }
    };
    report.ok(format!(
        "journal root {} ({:?} layout, {} page(s))",
        root.display(),
        journal.layout(),
        pages.len()
    ));

    for page in &pages {
        let path = journal.page_path(*page);
        match load_tasks(&path) {
            Ok(tasks) => report.ok(format!(
                "page {} has {} task(s): {}",
                page,
                tasks.len(),
                status_summary(&tasks)
            )),
            Err(err) => report.problem(err.to_string()),
        }
    }

    let stale: Vec<_> = pages
        .iter()
        .filter(|page| **page != ctx.today)
        .collect();
    match stale.as_slice() {
        [] => {}
        [previous] => {
            let archived_to = journal.archived_path(**previous);
            if archived_to.exists() {
                report.problem(format!(
                    "page {} cannot be archived: {} already exists",
                    previous,
                    archived_to.display()
                ));
            } else {
                report.note(format!(
                    "page {} will be migrated to {} on the next run",
                    previous, ctx.today
                ));
            }
        }
        many => report.problem(format!(
            "journal directory is corrupted: {} stale pages ({})",
            many.len(),
            many.iter()
                .map(|page| page.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }

    report
}

/// Reports on the journal without taking the lock or writing anything.
pub(crate) fn run_doctor<W: Write>(ctx: &RunContext, out: &mut W) -> Result<(), Quit> {
    let logger = &ctx.logger;
    logger.log("doctor start", &[("root", &ctx.journal.root().display())]);

    let report = inspect(ctx);
    for line in &report.lines {
        if writeln!(out, "{}", line).is_err() {
            return Err(quit(logger, "doctor output failed", 1));
        }
    }

    if report.problems > 0 {
        let message = format!("doctor found {} problem(s)", report.problems);
        eprintln!("{}", message);
        return Err(quit(logger, &message, 1));
    }
    logger.log("doctor ok", &[]);
    Ok(())
}
