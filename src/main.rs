//! CLI entry point for emudl.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use emudl_core::catalog::{CatalogEntry, PLATFORMS, search_catalog};
use emudl_core::download::{DownloadEngine, HttpClient, JobStatus};
use emudl_core::inventory::{FileCandidate, FileInventory};
use emudl_core::selection::{Selection, select};
use emudl_core::site::{Redirects, build_client};
use tracing::{debug, info};

mod app;
mod cli;

use app::config::{load_default_file_config, resolve_settings};
use app::progress::BarProgress;
use app::terminal;
use cli::Args;

const EXIT_SETUP_ERROR: u8 = 1;
const EXIT_PARTIAL_FAILURE: u8 = 2;
const EXIT_INTERRUPTED: i32 = 130;

enum RunOutcome {
    Complete,
    Failures(usize),
    Aborted,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    terminal::init_tracing(args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    if args.list_platforms {
        terminal::print_platforms();
        return ExitCode::SUCCESS;
    }

    terminal::headline("[+] Welcome to EmuParadise Downloader!");

    tokio::select! {
        result = run(args) => match result {
            Ok(RunOutcome::Complete) => {
                terminal::headline("[+] Games Downloaded! Have Fun!");
                ExitCode::SUCCESS
            }
            Ok(RunOutcome::Failures(count)) => {
                terminal::error_line(&format!("[!] {count} file(s) could not be downloaded"));
                ExitCode::from(EXIT_PARTIAL_FAILURE)
            }
            Ok(RunOutcome::Aborted) => exit_interrupted(),
            Err(error) => {
                terminal::error_line(&format!("[!] {error:#}"));
                ExitCode::from(EXIT_SETUP_ERROR)
            }
        },
        _ = tokio::signal::ctrl_c() => exit_interrupted(),
    }
}

/// Exits immediately; a pending stdin prompt would otherwise hold the runtime open.
fn exit_interrupted() -> ! {
    terminal::error_line("\n[!] Exiting...");
    std::process::exit(EXIT_INTERRUPTED)
}

async fn run(args: Args) -> Result<RunOutcome> {
    let file_config = load_default_file_config()?;
    let settings = resolve_settings(&args, file_config.as_ref())?;
    let game_selection = Selection::parse(&args.games).context("Invalid --games selection")?;
    let file_selection = Selection::parse(&args.files).context("Invalid --files selection")?;

    let platform_index = match args.platform {
        Some(index) => index,
        None => {
            terminal::print_platforms();
            let answer = tokio::task::spawn_blocking(|| {
                terminal::prompt_line("Enter a console number: ")
            })
            .await??;
            let Some(answer) = answer else {
                return Ok(RunOutcome::Aborted);
            };
            answer
                .parse::<usize>()
                .map_err(|_| anyhow!("Not a valid number"))?
        }
    };
    let platform = select(PLATFORMS, platform_index)?;
    info!(platform = platform.name, "searching catalog");

    let client = build_client(&settings.site, Redirects::Follow)?;
    let games = search_catalog(&client, &settings.site, platform.path)
        .await
        .context("Server Error! Try again later")?;
    if games.is_empty() {
        bail!("No Such game!");
    }
    terminal::numbered_list(games.iter().map(|game| game.title.clone()));

    let selected = game_selection
        .resolve(games.len())
        .into_iter()
        .map(|index| select(&games, index))
        .collect::<Result<Vec<_>, _>>()?;

    let inventory = FileInventory::new(&settings.site)?;
    let progress = Arc::new(BarProgress::new(!args.quiet && !args.no_progress));
    let engine =
        DownloadEngine::new(HttpClient::new(&settings.site)?).with_observer(progress.clone());

    let mut failures = 0;
    for entry in selected {
        failures += download_game(
            entry,
            &inventory,
            &engine,
            &progress,
            &file_selection,
            &settings.output_dir,
        )
        .await;
    }

    Ok(if failures == 0 {
        RunOutcome::Complete
    } else {
        RunOutcome::Failures(failures)
    })
}

/// Inventories and downloads one game, returning the number of failed files.
async fn download_game(
    entry: &CatalogEntry,
    inventory: &FileInventory,
    engine: &DownloadEngine,
    progress: &BarProgress,
    file_selection: &Selection,
    output_dir: &Path,
) -> usize {
    println!("[*] Please wait.. ({})", entry.title);
    let files = match inventory.list_files(entry).await {
        Ok(files) => files,
        Err(error) => {
            terminal::error_line(&format!("[!] {}: {error}", entry.title));
            return 1;
        }
    };
    terminal::numbered_list(files.iter().map(describe_file));

    let indices = file_selection.resolve(files.len());
    let files: Arc<[FileCandidate]> = files.into();

    terminal::headline("[+] OK! Please wait while your game is downloading!");
    let mut results = match engine.download(entry, files, &indices, output_dir).await {
        Ok(results) => results,
        Err(error) => {
            terminal::error_line(&format!("[!] {}: {error}", entry.title));
            return 1;
        }
    };

    let mut failures = 0;
    while let Some(result) = results.next().await {
        match result {
            Ok(done) => {
                let line = match done.status {
                    JobStatus::Downloaded { .. } => terminal::downloaded_line(&done.candidate.title),
                    JobStatus::AlreadyPresent => terminal::skipped_line(&done.candidate.title),
                };
                progress.println(&line);
            }
            Err(failure) => {
                failures += 1;
                progress.println(&terminal::failed_line(&failure.to_string()));
            }
        }
    }
    failures
}

fn describe_file(file: &FileCandidate) -> String {
    match file.url {
        Some(_) => format!("{} ({})", file.title, file.size_label),
        None => match &file.resolve_error {
            Some(reason) => format!("{} (no download link found: {reason})", file.title),
            None => format!("{} (no download link found)", file.title),
        },
    }
}
