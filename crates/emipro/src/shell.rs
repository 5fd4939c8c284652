// SPDX-FileCopyrightText: 2026 Emipro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `emipro resume` command implementation.
//!
//! Consumes the pending session named by the payment return address,
//! generates the report with a progress bar, writes the HTML preview and then
//! runs a small readline shell until the user leaves or the preview expires.

use std::path::{Path, PathBuf};

use colored::Colorize;
use emipro_config::model::ExportConfig;
use emipro_config::EmiproConfig;
use emipro_core::{EmiproError, ExportAdapter};
use emipro_export::PdfExporter;
use emipro_flow::{parse_address, ExpiryTimer, ReportFlow, Step, Wizard};
use emipro_report::format_time;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

/// What the user typed at the preview prompt.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Export(Option<PathBuf>),
    Time,
    Restart,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Option<ShellCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    Some(match head {
        "/export" => ShellCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "/time" => ShellCommand::Time,
        "/restart" => ShellCommand::Restart,
        "/quit" | "/exit" => ShellCommand::Quit,
        "/help" => ShellCommand::Help,
        _ => ShellCommand::Unknown(line.to_string()),
    })
}


/// Runs `emipro resume`.
pub async fn run_resume(
    config: EmiproConfig,
    return_url: &str,
    preview: Option<PathBuf>,
) -> Result<(), EmiproError> {
    let address = parse_address(return_url)?;
    let flow = crate::build_flow(config)?;
    let mut wizard = Wizard::new();

    let Some(resumption) = flow.resume(&mut wizard, &address).await else {
        println!(
            "No payment confirmation in {address}. Run {} first.",
            "emipro checkout".yellow()
        );
        return Ok(());
    };
    if let Err(err) = resumption.restored {
        println!(
            "Start over from {} with {}.",
            resumption.address,
            "emipro checkout".yellow()
        );
        return Err(err);
    }
    info!(address = %resumption.address, "payment confirmed, generating report");

    generate_with_progress(&flow, &mut wizard).await?;

    let timer = ExpiryTimer::start(flow.config().session.expiry_secs);
    let preview_path = preview.unwrap_or_else(|| default_preview_path(flow.config()));
    write_preview(&flow, &wizard, &timer, &preview_path).await?;

    run_preview_shell(&flow, &mut wizard, &timer, &preview_path).await
}

async fn generate_with_progress(flow: &ReportFlow, wizard: &mut Wizard) -> Result<(), EmiproError> {
    let mut handle = flow.spawn_generation(wizard)?;
    let bar = ProgressBar::new(wizard.topics().len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(120));

    while handle.progress.changed().await.is_ok() {
        let state = handle.progress.borrow_and_update().clone();
        bar.set_message(state.message.clone());
        bar.set_position(state.completed() as u64);
        wizard.apply_progress(handle.epoch, state);
    }

    match handle.join().await {
        (epoch, Ok(sections)) => {
            bar.finish_with_message(format!("{} sections ready", sections.len()));
            wizard.complete_generation(epoch, sections);
            Ok(())
        }
        (epoch, Err(err)) => {
            bar.abandon_with_message("generation failed".red().to_string());
            wizard.abort_generation(epoch, &err);
            Err(err)
        }
    }
}

fn default_preview_path(config: &EmiproConfig) -> PathBuf {
    Path::new(&config.export.output_dir).join(format!("{}_preview.html", config.export.file_prefix))
}

async fn write_preview(
    flow: &ReportFlow,
    wizard: &Wizard,
    timer: &ExpiryTimer,
    path: &Path,
) -> Result<(), EmiproError> {
    let document = flow
        .preview_document(wizard, timer.remaining())
        .ok_or_else(|| EmiproError::Internal("no report to preview".into()))?;
    tokio::fs::write(path, document)
        .await
        .map_err(|e| EmiproError::Internal(format!("failed to write preview {}: {e}", path.display())))?;
    println!("Preview written to {}", path.display().to_string().bold());
    Ok(())
}

async fn discard_preview(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(error = %e, path = %path.display(), "preview file already gone");
    }
}

async fn run_preview_shell(
    flow: &ReportFlow,
    wizard: &mut Wizard,
    timer: &ExpiryTimer,
    preview_path: &Path,
) -> Result<(), EmiproError> {
    let mut editor = Some(DefaultEditor::new().map_err(|e| {
        EmiproError::Internal(format!("failed to initialize readline: {e}"))
    })?);

    println!(
        "\n{} It will be available for the next {}.",
        "Download your report now!".bold().green(),
        format_time(timer.remaining())
    );
    println!(
        "Commands: {}, {}, {}, {}\n",
        "/export [dir]".yellow(),
        "/time".yellow(),
        "/restart".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "report".green());
    loop {
        let Some(mut rl) = editor.take() else {
            break;
        };
        let line_prompt = prompt.clone();
        let mut read = tokio::task::spawn_blocking(move || {
            let line = rl.readline(&line_prompt);
            (rl, line)
        });

        let joined = tokio::select! {
            _ = timer.expired() => {
                wizard.expire();
                discard_preview(preview_path).await;
                if let Some(notice) = wizard.take_notice() {
                    println!("\n{}", notice.yellow().bold());
                }
                println!("{}", "Press Enter to exit.".dimmed());
                // The blocking read can only finish on input.
                let _ = read.await;
                return Ok(());
            }
            joined = &mut read => joined,
        };

        let (rl, line) =
            joined.map_err(|e| EmiproError::Internal(format!("readline task failed: {e}")))?;
        editor = Some(rl);

        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        if let Some(rl) = editor.as_mut() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match parse_command(&line) {
            None => continue,
            Some(ShellCommand::Export(dir)) => export(flow, wizard, dir).await,
            Some(ShellCommand::Time) => {
                println!("{} remaining", format_time(timer.remaining()).bold());
            }
            Some(ShellCommand::Restart) => {
                timer.cancel();
                wizard.restart();
                discard_preview(preview_path).await;
                println!("Report discarded. Run {} to start a new one.", "emipro checkout".yellow());
                return Ok(());
            }
            Some(ShellCommand::Quit) => break,
            Some(ShellCommand::Help) => {
                println!("/export [dir]  write the PDF (to the configured output directory by default)");
                println!("/time          show the time left before the report expires");
                println!("/restart       discard the report");
                println!("/quit          leave the preview");
            }
            Some(ShellCommand::Unknown(input)) => {
                println!("unknown command `{input}`; type {} for help", "/help".yellow());
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Exports the report, optionally into `dir` instead of the configured directory.
async fn export(flow: &ReportFlow, wizard: &Wizard, dir: Option<PathBuf>) {
    if wizard.step() != Step::Preview {
        println!("No report to export.");
        return;
    }

    let outcome = match dir {
        None => flow.export_pdf(wizard).await,
        Some(dir) => {
            let exporter = PdfExporter::new(&ExportConfig {
                output_dir: dir.display().to_string(),
                ..flow.config().export.clone()
            });
            match flow.export_request(wizard) {
                Ok(request) => exporter.export(request).await,
                Err(e) => Err(e),
            }
        }
    };

    match outcome {
        Ok(output) => println!(
            "Saved {} ({} pages)",
            output.path.display().to_string().bold(),
            output.pages
        ),
        Err(e) => {
            warn!(error = %e, "export failed");
            eprintln!("{}", e.user_message().red());
        }
    }
}
