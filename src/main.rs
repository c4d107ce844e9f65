use std::process::ExitCode;

mod app;
mod cli;
mod config;
mod doctor;
mod edit;
mod error;
mod journal;
mod logger;
mod status;
mod store;
mod task;
mod view;


fn main() -> ExitCode {
    app::main()
}
