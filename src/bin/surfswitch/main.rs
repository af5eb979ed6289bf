use clap::Parser;
use env_logger::{Builder, Env};
use log::error;

use anyhow::Result;

mod cli;
mod util;

mod cmd_current;
mod cmd_delete;
mod cmd_list;
mod cmd_save;
mod cmd_switch;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug surfswitch switch work
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Current { json } => cmd_current::exec(json),

        cli::Cmd::List { profiles_dir, json } => cmd_list::exec(profiles_dir, json),

        cli::Cmd::Save {
            name,
            overwrite,
            kill,
            profiles_dir,
            json,
        } => cmd_save::exec(name, overwrite, kill, profiles_dir, json),

        cli::Cmd::Switch {
            name,
            kill,
            profiles_dir,
            json,
        } => cmd_switch::exec(name, kill, profiles_dir, json),

        cli::Cmd::Delete { name, profiles_dir } => cmd_delete::exec(name, profiles_dir),
    }
}
