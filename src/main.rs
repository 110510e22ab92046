// Inherit lint configuration from lib.rs for consistency
#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use clap::Parser;

use archive_tool::archiver;
use archive_tool::cli::commands::{Cli, Command, StateArg};
use archive_tool::cli::output;
use archive_tool::config::{Config, OutputFormat};
use archive_tool::db::{Database, RecordFilter};
use archive_tool::ingest::Scanner;
use archive_tool::models::ScanMode;
use archive_tool::operations;
use archive_tool::reconciler;

fn main() {
    let cli = Cli::parse();
    output::init_logging(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CmdResult {
    let mut config = get_config()?;
    if let Some(db) = &cli.db {
        config = config.with_db_path(db);
    }

    match cli.command {
        Command::Init => cmd_init(&config),
        Command::Scan { path, mode } => cmd_scan(&config, &path, mode),
        Command::Archive { filename } => cmd_archive(&config, &filename),
        Command::Status { json } => cmd_status(&config, json),
        Command::List { state, eligible } => cmd_list(&config, state, eligible),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config() -> Result<Config, Box<dyn std::fmt::Display>> {
    Config::from_cwd().map_err(map_err)
}

fn open_db(config: &Config) -> Result<Database, Box<dyn std::fmt::Display>> {
    Database::open(&config.db_path).map_err(map_err)
}

fn close_db(db: Database) -> CmdResult {
    db.close().map_err(map_err)
}

fn cmd_init(config: &Config) -> CmdResult {
    let existed = config.catalog_exists();
    let db = open_db(config)?;
    close_db(db)?;

    #[derive(serde::Serialize)]
    struct InitOutput {
        catalog: String,
        created: bool,
    }
    println!(
        "{}",
        output::format_json(&InitOutput {
            catalog: config.db_path.to_string_lossy().into_owned(),
            created: !existed,
        })
    );
    Ok(())
}

fn cmd_scan(config: &Config, path: &str, mode: Option<ScanMode>) -> CmdResult {
    let mode = mode.unwrap_or(config.settings.scan.default_mode);
    // Resolve the root before touching the catalog.
    let scanner = Scanner::new(config.work_dir.join(path), mode)
        .map_err(map_err)?
        .with_buffer_size(config.settings.scan.buffer_size)
        .excluding(config.catalog_files());

    let db = open_db(config)?;
    let result = reconciler::run_scan(&db, &scanner);
    close_db(db)?;

    let output: operations::ScanOutput = result.map_err(map_err)?.into();
    println!("{}", output::format_json(&output));
    Ok(())
}

fn cmd_archive(config: &Config, filename: &str) -> CmdResult {
    let destination = config.archive_path(filename);
    let mut db = open_db(config)?;
    let result = archiver::run_archive(&mut db, &destination);
    close_db(db)?;

    let output: operations::ArchiveOutput = result.map_err(map_err)?.into();
    println!("{}", output::format_json(&output));
    Ok(())
}

fn cmd_status(config: &Config, json: bool) -> CmdResult {
    let db = open_db(config)?;
    let status = operations::get_status(&db);
    close_db(db)?;
    let status = status.map_err(map_err)?;

    if json || config.settings.output.format == OutputFormat::Json {
        println!("{}", output::format_json(&status));
    } else {
        println!("{}", operations::render_table(&status));
    }
    Ok(())
}

fn cmd_list(config: &Config, state: Option<StateArg>, eligible: bool) -> CmdResult {
    let filter = RecordFilter {
        state: state.map(Into::into),
        eligible_only: eligible,
    };
    let db = open_db(config)?;
    let result = operations::list_files(&db, &filter);
    close_db(db)?;

    println!("{}", output::format_json(&result.map_err(map_err)?));
    Ok(())
}
