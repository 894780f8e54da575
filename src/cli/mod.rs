pub mod activity;
pub mod output;

use std::path::PathBuf;

use activity::{
    process_add_command, process_delete_command, process_list_command, process_summary_command,
    AddCommand, DeleteCommand, ListCommand, SummaryCommand,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    auth::{authenticate, StaticCredentials},
    store::record_store::CsvRecordStore,
    utils::{dir::default_data_dir, logging::enable_logging},
};

#[derive(Parser, Debug)]
#[command(name = "Worklog", version, long_about = None)]
#[command(about = "Personal time tracker for office and field work", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, short, help = "Username owning the record table")]
    user: String,
    #[arg(long, short, help = "Password checked against the credential table")]
    password: String,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "JSON credential table replacing the built-in one")]
    credentials: Option<PathBuf>,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Record a new activity")]
    Add {
        #[command(flatten)]
        command: AddCommand,
    },
    #[command(about = "Display registered activities")]
    List {
        #[command(flatten)]
        command: ListCommand,
    },
    #[command(about = "Show hours per category and the idle time left in the workday")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
    #[command(about = "Delete one activity by its row in the filtered table")]
    Delete {
        #[command(flatten)]
        command: DeleteCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match &args.dir {
        Some(v) => {
            std::fs::create_dir_all(v)?;
            v.clone()
        }
        None => default_data_dir()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&dir, logging_level, args.log)?;

    let credentials = match &args.credentials {
        Some(path) => StaticCredentials::from_path(path)?,
        None => StaticCredentials::builtin(),
    };
    authenticate(&credentials, &args.user, &args.password)?;

    let store = CsvRecordStore::new(dir.join("records"))?;

    match args.commands {
        Commands::Add { command } => process_add_command(&store, &args.user, command).await,
        Commands::List { command } => process_list_command(&store, &args.user, command).await,
        Commands::Summary { command } => process_summary_command(&store, &args.user, command).await,
        Commands::Delete { command } => process_delete_command(&store, &args.user, command).await,
    }
}
