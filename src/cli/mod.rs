//! # CLI Adapter
//!
//! Translates command-line arguments into directory calls and renders the
//! results. This is the only module that prints.
//!
//! Each command resolves the content language first (`--language` wins over
//! the persisted choice), makes one directory call and renders the result.
//! On failure it prints a localized message plus a retry hint and returns a
//! failure exit code; retrying is up to the user.

pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use serde::Serialize;

use crate::backend::{MemoryStore, PostgrestStore, TableStore};
use crate::core::config::{self, ResolvedConfig};
use crate::core::i18n::{Text, tr};
use crate::core::language::LanguageStore;
use crate::core::models::Language;
use crate::core::validation::search_query_len;
use crate::directory::{Directory, DirectoryError, MIN_SEARCH_QUERY_LEN};

#[derive(Parser, Debug)]
#[command(name = "tulcea-guide", about = "Tulcea tourism directory")]
pub struct Args {
    /// Content language for this run (does not change the saved choice)
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Read data from a JSON snapshot instead of the remote backend
    #[arg(long, value_name = "FILE")]
    pub fixtures: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List categories
    Categories,
    /// List businesses in a category
    Businesses {
        /// Category id (UUID)
        category_id: String,
    },
    /// Show one business
    Show {
        /// Business id (UUID)
        business_id: String,
    },
    /// List every business with its map position
    Map,
    /// Search businesses by name
    Search {
        query: String,
    },
    /// Show or change the saved language
    Language {
        #[arg(value_enum)]
        code: Option<Language>,
    },
}

/// Failure of a command, before or after reaching the directory.
#[derive(Debug)]
enum CommandError {
    Setup(String),
    Directory(DirectoryError),
    NotFound,
}

impl From<DirectoryError> for CommandError {
    fn from(e: DirectoryError) -> Self {
        CommandError::Directory(e)
    }
}

/// Builds the table store: a snapshot when `--fixtures` is given, else PostgREST.
fn build_store(
    fixtures: Option<&PathBuf>,
    config: &ResolvedConfig,
) -> Result<Arc<dyn TableStore>, String> {
    if let Some(path) = fixtures {
        let store = MemoryStore::load(path).map_err(|e| e.to_string())?;
        return Ok(Arc::new(store));
    }
    let creds = config.backend_credentials().map_err(|e| e.to_string())?;
    let store = PostgrestStore::new(&creds.url, creds.anon_key).map_err(|e| e.to_string())?;
    info!("Using PostgREST backend at {}", store.base_url());
    Ok(Arc::new(store))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CommandError> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| CommandError::Setup(format!("failed to encode JSON: {e}")))
}

/// Runs one directory command and returns the text to print.
pub async fn execute(
    directory: &Directory,
    command: &Command,
    language: Language,
    json: bool,
) -> Result<String, String> {
    run_command(directory, command, language, json)
        .await
        .map_err(|e| describe_failure(&e, language))
}

async fn run_command(
    directory: &Directory,
    command: &Command,
    language: Language,
    json: bool,
) -> Result<String, CommandError> {
    match command {
        Command::Categories => {
            let categories = directory.fetch_categories_with_translations(language).await?;
            if json {
                return to_json(&categories);
            }
            Ok(render::render_categories(&categories, language))
        }
        Command::Businesses { category_id } => {
            let businesses = directory
                .fetch_businesses_by_category(category_id, language)
                .await?;
            if json {
                return to_json(&businesses);
            }
            Ok(render::render_business_list(
                tr(language, Text::Businesses),
                &businesses,
                language,
                Text::NoBusinesses,
            ))
        }
        Command::Show { business_id } => {
            let Some(mut business) = directory.fetch_business_by_id(business_id, language).await?
            else {
                return Err(CommandError::NotFound);
            };

            // Category label is optional; a failure here does not fail the command.
            match directory.fetch_categories_with_translations(language).await {
                Ok(categories) => {
                    business.category_name = categories
                        .into_iter()
                        .find(|c| c.category.id == business.business.category_id)
                        .map(|c| c.name);
                }
                Err(e) => warn!("Category label unavailable: {e}"),
            }

            if json {
                return to_json(&business);
            }
            Ok(render::render_business_detail(&business, language))
        }
        Command::Map => {
            let businesses = directory.fetch_all_businesses(language).await?;
            if json {
                return to_json(&businesses);
            }
            Ok(render::render_map(&businesses, language))
        }
        Command::Search { query } => {
            if search_query_len(query) < MIN_SEARCH_QUERY_LEN && !json {
                return Ok(format!("{}\n", tr(language, Text::SearchTooShort)));
            }
            let results = directory.search_businesses(query, language).await?;
            if json {
                return to_json(&results);
            }
            Ok(render::render_business_list(
                query.trim(),
                &results,
                language,
                Text::NoResults,
            ))
        }
        Command::Language { .. } => Err(CommandError::Setup(
            "language is handled without a backend".to_string(),
        )),
    }
}

fn describe_failure(err: &CommandError, language: Language) -> String {
    match err {
        CommandError::NotFound => format!("{}\n", tr(language, Text::BusinessNotFound)),
        CommandError::Directory(DirectoryError::Validation(msg)) => format!("{msg}\n"),
        CommandError::Directory(e) => format!(
            "{}\n{}\n({e})\n",
            tr(language, Text::LoadFailed),
            tr(language, Text::RetryHint)
        ),
        CommandError::Setup(msg) => format!("{msg}\n"),
    }
}

/// Shows or changes the saved language.
pub fn language_command(store: &LanguageStore, code: Option<Language>) -> Result<String, String> {
    let Some(language) = code else {
        let current = store.current();
        let mut out = format!(
            "{}: {} {} ({})\n",
            tr(current, Text::CurrentLanguage),
            current.flag(),
            current.native_name(),
            current
        );
        for l in Language::ALL {
            let marker = if l == current { '*' } else { ' ' };
            out.push_str(&format!("{marker} {} {} {}\n", l, l.flag(), l.native_name()));
        }
        return Ok(out);
    };

    store
        .set(language)
        .map_err(|e| format!("failed to save language: {e}\n"))?;
    Ok(format!(
        "{} {} {}\n",
        tr(language, Text::LanguageChanged),
        language.flag(),
        language.native_name()
    ))
}

/// Entry point used by the binary.
pub async fn run(args: Args) -> ExitCode {
    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let resolved = config::resolve(&file_config, args.language);
    let languages = LanguageStore::load(&resolved.settings_path, resolved.default_language);

    if let Command::Language { code } = args.command {
        return finish(language_command(&languages, code));
    }

    let language = resolved.language_override.unwrap_or_else(|| languages.current());

    let store = match build_store(args.fixtures.as_ref(), &resolved) {
        Ok(s) => s,
        Err(e) => {
            error!("Startup failed: {e}");
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let directory = Directory::with_timeout(store, resolved.timeout);
    info!(
        "Running {:?} against {} store (language={}, timeout={:?})",
        args.command,
        directory.store_name(),
        language,
        directory.timeout()
    );

    finish(execute(&directory, &args.command, language, args.json).await)
}

fn finish(result: Result<String, String>) -> ExitCode {
    match result {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(msg) => {
            eprint!("{msg}");
            ExitCode::FAILURE
        }
    }
}
