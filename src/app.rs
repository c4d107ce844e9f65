use chrono::Local;
use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::{Cli, CliCommand};
use crate::config::{load_config, Config};
use crate::doctor::run_doctor;
use crate::edit::{Edits, Order};
use crate::error::JournalError;
use crate::journal::{Journal, JournalLock, PageId};
use crate::logger::{sanitize_log_value, Logger};
use crate::store::{load_tasks, store_tasks};
use crate::task::Task;
use crate::view::{parse_filters, render_line, visible, Numbering};

const DEFAULT_CONFIG_REL: &str = ".config/bli.yml";

#[derive(Debug)]
pub(crate) struct Quit {
    pub(crate) code: i32,
    #[allow(dead_code)]
    pub(crate) reason: String,
}

impl Quit {
    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code as u8)
    }
}

pub(crate) fn quit(logger: &Logger, reason: &str, code: i32) -> Quit {
    let sanitized = if reason.trim().is_empty() {
        "unknown".to_string()
    } else {
        sanitize_log_value(reason)
    };
    logger.log_transition(&format!("quit reason={}", sanitized));
    Quit {
        code,
        reason: reason.to_string(),
    }
}

fn fail(logger: &Logger, err: JournalError) -> Quit {
    let message = err.to_string();
    eprintln!("Error: {}", message);
    quit(logger, &message, 1)
}

fn home_dir() -> Result<PathBuf, String> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| "Missing HOME environment variable".to_string())
}

fn resolve_today(raw: Option<&str>) -> Result<PageId, String> {
    match raw {
        Some(raw) => PageId::parse(raw)
            .ok_or_else(|| format!("Invalid --today value {:?}: expected YYYY-MM-DD.", raw)),
        None => Ok(PageId::new(Local::now().date_naive())),
    }
}

/// Resolved settings for one invocation.
#[derive(Debug)]
pub(crate) struct RunContext {
    pub(crate) journal: Journal,
    pub(crate) order: Order,
    pub(crate) today: PageId,
    pub(crate) logger: Logger,
}

fn resolve_context(cli: &Cli) -> Result<RunContext, Quit> {
    let early_quit = |message: String| {
        eprintln!("{}", message);
        Quit {
            code: 1,
            reason: message,
        }
    };

    let today = resolve_today(cli.today.as_deref()).map_err(early_quit)?;

    // HOME is only needed for defaults the command line did not override.
    let home = match home_dir() {
        Ok(home) => Some(home),
        Err(_) if cli.config.is_some() && cli.journal.is_some() => None,
        Err(message) => return Err(early_quit(message)),
    };

    let loaded = match (&cli.config, &home) {
        (Some(path), _) => {
            if !path.is_file() {
                return Err(early_quit(format!(
                    "Missing config file: {}",
                    path.display()
                )));
            }
            Some(load_config(path).map_err(early_quit)?)
        }
        (None, Some(home)) => {
            let default_path = home.join(DEFAULT_CONFIG_REL);
            if default_path.is_file() {
                Some(load_config(&default_path).map_err(early_quit)?)
            } else {
                None
            }
        }
        (None, None) => None,
    };
    let (config, warnings) = match loaded {
        Some(loaded) => (loaded.config, loaded.warnings),
        None => (Config::default(), Vec::new()),
    };

    let home = home.unwrap_or_default();
    let root = match &cli.journal {
        Some(root) => root.clone(),
        None => config.journal_root(&home),
    };

    let logger = Logger::new(config.log_path(&home));
    for key in &warnings {
        logger.log("config warning", &[("unknown_key", key)]);
    }

    Ok(RunContext {
        journal: Journal::new(root, config.layout),
        order: config.order,
        today,
        logger,
    })
}

fn collect_edits(cli: &Cli) -> Result<Edits, JournalError> {
    let add = cli
        .add
        .iter()
        .map(|text| Task::pending(text.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Edits {
        restore: cli.restore.clone(),
        cross: cli.cross.clone(),
        check: cli.check.clone(),
        postpone: cli.postpone.clone(),
        add,
    })
}

/// Rotates the journal, applies the requested edits to today's page, stores
/// it, and lists the visible tasks to `out`.
pub(crate) fn run_journal<W: Write>(
    cli: &Cli,
    ctx: &RunContext,
    out: &mut W,
    bold: bool,
) -> Result<(), Quit> {
    let logger = &ctx.logger;
    logger.log(
        "run start",
        &[
            ("root", &ctx.journal.root().display()),
            ("today", &ctx.today),
        ],
    );

    // Reject bad input before the journal is touched.
    let filters = parse_filters(&cli.filter).map_err(|err| fail(logger, err))?;
    let edits = collect_edits(cli).map_err(|err| fail(logger, err))?;

    let lock = JournalLock::acquire(ctx.journal.root()).map_err(|err| fail(logger, err))?;
    logger.log("lock acquired", &[]);

    let rotation = ctx
        .journal
        .rotate(ctx.today)
        .map_err(|err| fail(logger, err))?;
    if rotation.created {
        logger.log("page created", &[("path", &rotation.current.display())]);
    }
    if let Some(migration) = &rotation.migrated {
        logger.log(
            "page migrated",
            &[
                ("page", &migration.page),
                ("carried", &migration.carried),
                ("archived_to", &migration.archived_to.display()),
            ],
        );
    }

    let mut tasks = load_tasks(&rotation.current).map_err(|err| fail(logger, err))?;
    if !edits.is_empty() {
        let added = edits.add.len();
        let missing = edits.apply(&mut tasks);
        for warning in &missing {
            eprintln!("{}", warning);
            logger.log(
                "warning index not found",
                &[("index", &warning.index), ("len", &warning.len)],
            );
        }
        logger.log(
            "edits applied",
            &[("added", &added), ("missing", &missing.len())],
        );
    }
    ctx.order.apply(&mut tasks);
    store_tasks(&rotation.current, &tasks).map_err(|err| fail(logger, err))?;
    logger.log(
        "page stored",
        &[
            ("path", &rotation.current.display()),
            ("tasks", &tasks.len()),
        ],
    );
    drop(lock);

    let numbering = if cli.renumber {
        Numbering::Sequential
    } else {
        Numbering::Position
    };
    let all = cli.all && !cli.no_all;
    for (index, task) in visible(&tasks, all, &filters, numbering) {
        writeln!(out, "{}", render_line(index, task, bold))
            .map_err(|err| fail(logger, JournalError::io("Failed to write output", err)))?;
    }
    Ok(())
}

fn run_with_cli_impl<W: Write>(cli: Cli, out: &mut W, bold: bool) -> Result<(), Quit> {
    let ctx = resolve_context(&cli)?;
    match cli.command {
        Some(CliCommand::Doctor) => run_doctor(&ctx, out),
        None => run_journal(&cli, &ctx, out, bold),
    }
}

pub(crate) fn run_with_args<W: Write>(
    args: Vec<OsString>,
    out: &mut W,
    bold: bool,
) -> Result<(), Quit> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // Render clap errors ourselves so help and usage go through `out`/stderr
            // consistently instead of clap's own terminal writer.
            if err.use_stderr() {
                eprintln!("{err}");
            } else {
                let _ = write!(out, "{err}");
            }
            return Err(Quit {
                code: err.exit_code(),
                reason: "cli_parse".to_string(),
            });
        }
    };
    run_with_cli_impl(cli, out, bold)
}

pub(crate) fn main_with_args(args: Vec<OsString>) -> ExitCode {
    let stdout = io::stdout();
    let bold = stdout.is_terminal();
    let mut out = stdout.lock();
    match run_with_args(args, &mut out, bold) {
        Ok(()) => ExitCode::SUCCESS,
        Err(quit) => quit.exit_code(),
    }
}

pub(crate) fn main() -> ExitCode {
    main_with_args(env::args_os().collect())
}
