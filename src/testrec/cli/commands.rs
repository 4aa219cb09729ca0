//! # CLI Layer
//!
//! The terminal client for the record library. It is the only place that
//! parses arguments, reads the process environment, talks to stdin/stdout
//! and formats a [`CmdResult`] for humans.
//!
//! `files`, `config` and `create` run without an open database. Every other
//! subcommand opens the configured file first and reports any rows the
//! loader had to repair.

use super::print::{print_config, print_files, print_messages, print_record, print_records};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use std::io;
use std::path::{Path, PathBuf};
use testrec::api::{CmdMessage, CmdResult, ConfigAction, FieldEdit, NewRecord, RecordApi, RecordFilter};
use testrec::commands;
use testrec::config::RecordConfig;
use testrec::error::{RecordError, Result};
use testrec::input::Prompter;
use testrec::store::{Database, FsBackend};
use testrec::validation::{validate_result, validate_system_name, validate_test_type};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TESTREC_LOG";
const HOME_ENV: &str = "TESTREC_HOME";

const EDIT_MENU: [&str; 5] = ["System name", "Test type", "Result", "Save", "Cancel"];

struct AppContext {
    api: RecordApi<FsBackend>,
    max_attempts: u32,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config_dir = config_dir()?;
    let config = RecordConfig::load(&config_dir)?;
    let db_path = cli.db.clone().unwrap_or_else(|| config.database.clone());

    // These never touch the database file.
    match &cli.command {
        Some(Commands::Files { dir }) => return handle_files(dir),
        Some(Commands::Config { key, value }) => {
            return handle_config(&config_dir, key.clone(), value.clone())
        }
        Some(Commands::Create) => return handle_create(&db_path, &config),
        _ => {}
    }

    let mut ctx = init_context(&config_dir, &config, db_path)?;

    match cli.command {
        Some(Commands::List { deleted, all }) => {
            let filter = if all {
                RecordFilter::All
            } else if deleted {
                RecordFilter::Deleted
            } else {
                RecordFilter::Active
            };
            handle_list(&ctx, filter)
        }
        Some(Commands::Show { id }) => handle_show(&ctx, &id),
        Some(Commands::Add {
            system_name,
            test_type,
            result,
        }) => handle_add(&mut ctx, system_name, test_type, result),
        Some(Commands::Update {
            id,
            system_name,
            test_type,
            result,
        }) => handle_update(&mut ctx, &id, system_name, test_type, result),
        Some(Commands::Delete { ids }) => handle_delete(&mut ctx, &ids),
        Some(Commands::Purge { ids, yes }) => handle_purge(&mut ctx, &ids, yes),
        Some(Commands::Recover { ids }) => handle_recover(&mut ctx, &ids),
        Some(Commands::Search { query }) => handle_search(&ctx, &query),
        Some(Commands::Files { .. }) | Some(Commands::Config { .. }) | Some(Commands::Create) => {
            Ok(())
        }
        None => handle_list(&ctx, RecordFilter::Active),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "testrec", "testrec")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| RecordError::Config("could not determine a config directory".to_string()))
}

fn init_context(config_dir: &Path, config: &RecordConfig, db_path: PathBuf) -> Result<AppContext> {
    let db = match Database::open(FsBackend, &db_path, config.capacity) {
        Ok(db) => db,
        Err(e @ RecordError::FileNotFound(_)) => {
            print_messages(&[CmdMessage::info(
                "Run `testrec create` to start a new database, or `testrec files` to find existing ones.",
            )]);
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let api = RecordApi::new(db, config_dir);
    print_messages(&api.load_messages().messages);

    Ok(AppContext {
        api,
        max_attempts: config.max_attempts,
    })
}

fn prompter(max_attempts: u32) -> Prompter<io::StdinLock<'static>, io::Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout(), max_attempts)
}

fn handle_files(dir: &Path) -> Result<()> {
    let result = commands::files::run(&FsBackend, dir)?;
    print_files(&result.database_files);
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(config_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = commands::config::run(config_dir, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_create(db_path: &Path, config: &RecordConfig) -> Result<()> {
    let db = Database::create(FsBackend, db_path, config.capacity)?;
    print_messages(&[CmdMessage::success(format!(
        "Created database {}",
        db.path().display()
    ))]);
    Ok(())
}

fn handle_list(ctx: &AppContext, filter: RecordFilter) -> Result<()> {
    let result = ctx.api.list_records(filter)?;
    print_records(&result.listed_records);
    print_messages(&result.messages);
    Ok(())
}

fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.get_record(id)?;
    for record in &result.listed_records {
        print_record(record);
    }
    Ok(())
}

fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let result = ctx.api.search_records(query)?;
    print_records(&result.listed_records);
    Ok(())
}

fn handle_add(
    ctx: &mut AppContext,
    system_name: Option<String>,
    test_type: Option<String>,
    result: Option<String>,
) -> Result<()> {
    if ctx.api.database().table().is_full() {
        return Err(RecordError::CapacityExceeded(
            ctx.api.database().table().capacity(),
        ));
    }

    let mut input = prompter(ctx.max_attempts);
    let system_name = match system_name {
        Some(name) => name,
        None => input.ask("System name: ", validate_system_name)?,
    };
    let test_type = match test_type {
        Some(kind) => kind,
        None => input.ask("Test type: ", validate_test_type)?,
    };
    let result = match result {
        Some(token) => validate_result(&token)?,
        None => input.ask("Result (Failed/Passed/Pending/Success): ", validate_result)?,
    };

    let outcome = ctx
        .api
        .add_record(NewRecord::new(system_name, test_type, result))?;
    print_messages(&outcome.messages);
    Ok(())
}

fn handle_update(
    ctx: &mut AppContext,
    id: &str,
    system_name: Option<String>,
    test_type: Option<String>,
    result: Option<String>,
) -> Result<()> {
    let mut edits = Vec::new();
    if let Some(name) = system_name {
        edits.push(FieldEdit::SystemName(name));
    }
    if let Some(kind) = test_type {
        edits.push(FieldEdit::TestType(kind));
    }
    if let Some(token) = result {
        edits.push(FieldEdit::Result(validate_result(&token)?));
    }

    let outcome = if edits.is_empty() {
        edit_interactively(ctx, id)?
    } else {
        ctx.api.update_record(id, &edits)?
    };
    print_messages(&outcome.messages);
    Ok(())
}

/// Menu-driven edit session. Leaving early for any reason (an error, running
/// out of attempts, end of input) drops the session, which puts the record
/// back the way it was.
fn edit_interactively(ctx: &mut AppContext, id: &str) -> Result<CmdResult> {
    let mut input = prompter(ctx.max_attempts);
    let mut session = ctx.api.edit_record(id)?;
    let mut result = CmdResult::default();

    loop {
        print_record(session.current());
        match input.choose("Choose a field to update: ", &EDIT_MENU)? {
            0 => {
                let name = input.ask("New system name: ", validate_system_name)?;
                session.apply(FieldEdit::SystemName(name))?;
            }
            1 => {
                let kind = input.ask("New test type: ", validate_test_type)?;
                session.apply(FieldEdit::TestType(kind))?;
            }
            2 => {
                let value = input.ask("New result: ", validate_result)?;
                session.apply(FieldEdit::Result(value))?;
            }
            3 => {
                let modified = session.is_modified();
                let record = session.save()?;
                let message = if modified {
                    CmdMessage::success(format!(
                        "Record updated: #{} {} ({})",
                        record.id, record.system_name, record.test_type
                    ))
                } else {
                    CmdMessage::info(format!("Record {} unchanged", record.id))
                };
                result.add_message(message);
                return Ok(result.with_affected_records(vec![record]));
            }
            _ => {
                let record = session.cancel();
                result.add_message(CmdMessage::info(format!(
                    "Changes to record {} discarded",
                    record.id
                )));
                return Ok(result);
            }
        }
    }
}

fn handle_delete(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let result = ctx.api.delete_records(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_recover(ctx: &mut AppContext, ids: &[String]) -> Result<()> {
    let result = ctx.api.recover_records(ids)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_purge(ctx: &mut AppContext, ids: &[String], yes: bool) -> Result<()> {
    let count = if ids.is_empty() {
        ctx.api.database().table().deleted().count()
    } else {
        ids.len()
    };

    if !yes && count > 0 {
        let mut input = prompter(ctx.max_attempts);
        let question = format!("Permanently remove {} record(s)? [y/N] ", count);
        if !input.confirm(&question)? {
            print_messages(&[CmdMessage::info("Purge aborted.")]);
            return Ok(());
        }
    }

    let result = ctx.api.purge_records(ids)?;
    print_messages(&result.messages);
    Ok(())
}
