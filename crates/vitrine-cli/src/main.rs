//! Vitrine CLI: command-line console for the catalog store.
//!
//! Set VITRINE_API_URL (or API_URL). When VITRINE_PASSCODE is set, run
//! `vitrine unlock <passcode>` before any other command.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use vitrine_api_client::ProgressFn;
use vitrine_cli::{init_tracing, progress_bar, render_form};
use vitrine_console::{Console, PendingUpload, SubmissionController, SubmitError};
use vitrine_core::models::{fields, MediaCategory, ResourceKind};
use vitrine_core::validation::{content_type_for_path, RawInput};
use vitrine_core::{AccessGate, ConsoleConfig, ErrorMetadata};

#[derive(Parser)]
#[command(name = "vitrine", about = "Vitrine catalog console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unlock the console with the configured passcode
    Unlock {
        passcode: String,
    },
    /// Forget the stored unlock flag
    Lock,
    /// Show the form fields of a resource kind
    Form {
        /// item or media
        kind: ResourceKind,
    },
    /// List records of a resource kind
    List {
        /// item or media
        kind: ResourceKind,
    },
    /// Create a product
    CreateItem {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[command(flatten)]
        asset: AssetArgs,
    },
    /// Edit a product; fields not given keep their current value
    UpdateItem {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        asset: AssetArgs,
    },
    /// Create a video entry
    CreateMedia {
        /// home or about
        #[arg(long = "type")]
        category: MediaCategory,
        #[command(flatten)]
        asset: AssetArgs,
    },
    /// Edit a video entry; fields not given keep their current value
    UpdateMedia {
        id: String,
        /// home or about
        #[arg(long = "type")]
        category: Option<MediaCategory>,
        #[command(flatten)]
        asset: AssetArgs,
    },
    /// Delete a record and refresh its list
    Delete {
        /// item or media
        kind: ResourceKind,
        id: String,
    },
}

#[derive(clap::Args)]
struct AssetArgs {
    /// Local file to upload as the record's asset
    #[arg(long, conflicts_with = "asset_url")]
    file: Option<PathBuf>,
    /// Already stored asset reference to use as is
    #[arg(long)]
    asset_url: Option<String>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn read_file(path: &Path) -> anyhow::Result<PendingUpload> {
    let content_type = content_type_for_path(path)?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut file = PendingUpload::new(data, content_type);
    if let Some(name) = path.file_name() {
        file = file.with_label(name.to_string_lossy());
    }
    Ok(file)
}

fn stderr_progress() -> ProgressFn {
    Arc::new(|percent| {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "\r{}", progress_bar(percent));
        if percent == 100 {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    })
}

/// Fill the open form from the command line and submit it.
async fn submit(
    controller: &SubmissionController,
    values: Vec<(&str, Option<String>)>,
    asset: AssetArgs,
) -> anyhow::Result<()> {
    for (field, value) in values {
        if let Some(value) = value {
            controller.set_field(field, value)?;
        }
    }
    if let Some(url) = asset.asset_url {
        controller.set_field(controller.kind().asset_field(), url)?;
    }
    if let Some(path) = asset.file {
        controller.select_file(read_file(&path).await?)?;
    }

    match controller.submit().await {
        Ok(outcome) => {
            if let Some(e) = &outcome.cache_refresh_error {
                eprintln!("warning: {}", e);
            }
            print_json(&outcome.resource)
        }
        Err(SubmitError::Validation(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field, message);
            }
            if let Some(view) = controller.view() {
                eprintln!("\n{}", render_form(view.kind, &view.input));
            }
            bail!("The form has errors")
        }
        Err(e) => {
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            bail!(e.client_message())
        }
    }
}

/// Open record `id` for editing, fetching the list first.
async fn open_existing(
    console: &Console,
    controller: &SubmissionController,
    id: &str,
) -> anyhow::Result<()> {
    let cache = console.cache(controller.kind());
    cache.refresh().await?;
    let resource = cache
        .get(id)
        .with_context(|| format!("No {} with id {}", controller.kind(), id))?;
    controller.open_edit(resource)?;
    Ok(())
}

/// Output of commands that need neither configuration nor the store.
fn offline_output(command: &Commands) -> Option<String> {
    match command {
        Commands::Form { kind } => Some(render_form(*kind, &RawInput::new())),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    if let Some(text) = offline_output(&cli.command) {
        println!("{}", text);
        return Ok(());
    }

    let config = ConsoleConfig::from_env()
        .context("Invalid configuration. Check VITRINE_API_URL and VITRINE_REQUEST_TIMEOUT_SECS")?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");
    let gate = AccessGate::from_config(&config);

    match &cli.command {
        Commands::Unlock { passcode } => {
            gate.unlock(passcode)?;
            println!("Unlocked");
            return Ok(());
        }
        Commands::Lock => {
            gate.lock()?;
            println!("Locked");
            return Ok(());
        }
        _ => gate.require_unlocked()?,
    }

    let console = Console::from_config(&config)?;

    match cli.command {
        Commands::List { kind } => {
            let cache = console.cache(kind);
            cache.refresh().await?;
            for resource in cache.resources() {
                println!("{}", resource.summary());
            }
        }
        Commands::CreateItem {
            title,
            description,
            asset,
        } => {
            let controller = console
                .controller(ResourceKind::Item)
                .with_progress(stderr_progress());
            controller.open_create();
            submit(
                &controller,
                vec![
                    (fields::TITLE, Some(title)),
                    (fields::DESCRIPTION, Some(description)),
                ],
                asset,
            )
            .await?;
        }
        Commands::UpdateItem {
            id,
            title,
            description,
            asset,
        } => {
            let controller = console
                .controller(ResourceKind::Item)
                .with_progress(stderr_progress());
            open_existing(&console, &controller, &id).await?;
            submit(
                &controller,
                vec![(fields::TITLE, title), (fields::DESCRIPTION, description)],
                asset,
            )
            .await?;
        }
        Commands::CreateMedia { category, asset } => {
            let controller = console
                .controller(ResourceKind::MediaEntry)
                .with_progress(stderr_progress());
            controller.open_create();
            submit(
                &controller,
                vec![(fields::CATEGORY, Some(category.to_string()))],
                asset,
            )
            .await?;
        }
        Commands::UpdateMedia {
            id,
            category,
            asset,
        } => {
            let controller = console
                .controller(ResourceKind::MediaEntry)
                .with_progress(stderr_progress());
            open_existing(&console, &controller, &id).await?;
            submit(
                &controller,
                vec![(fields::CATEGORY, category.map(|c| c.to_string()))],
                asset,
            )
            .await?;
        }
        Commands::Delete { kind, id } => {
            if let Some(e) = console.cache(kind).delete(&id).await? {
                eprintln!("warning: {}", e);
            }
            println!("Deleted {} {}", kind, id);
        }
        Commands::Unlock { .. } | Commands::Lock | Commands::Form { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn form_is_answered_before_configuration() {
        let cli = Cli::try_parse_from(["vitrine", "form", "media"]).unwrap();
        let text = offline_output(&cli.command).unwrap();
        assert!(text.starts_with("Type [home|about]"));

        let cli = Cli::try_parse_from(["vitrine", "list", "item"]).unwrap();
        assert!(offline_output(&cli.command).is_none());
    }

    #[test]
    fn help_does_not_need_configuration() {
        let err = Cli::try_parse_from(["vitrine", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
