//! Notespace - a terminal note editor with debounced autosave.
//!
//! # Usage
//!
//! ```bash
//! notespace abc123
//! notespace --server https://notes.example abc123
//! notespace                       # scratch mode, nothing persisted
//! notespace --draft-file draft.md # scratch mode with local draft backups
//! ```

use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::SetTitle;

use notespace::app::{App, DraftSnapshot, EditorHooks};
use notespace::config::{
    DEFAULT_LOGO_TEXT, DEFAULT_SERVER_URL, clear_config_flags, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use notespace::remote::NoteRecord;

/// A terminal note editor with debounced autosave
#[derive(Parser, Debug)]
#[command(name = "notespace", version, about, long_about = None)]
struct Cli {
    /// Note id on the server; omit for scratch mode
    #[arg(value_name = "NOTE_ID")]
    note_id: Option<String>,

    /// Server base URL (also NOTESPACE_SERVER)
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Branding string carried in save payloads
    #[arg(long, value_name = "TEXT")]
    logo: Option<String>,

    /// Seed the editor from a markdown file instead of fetching
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Open the note as expired/read-only
    #[arg(long)]
    expired: bool,

    /// Scratch mode: write debounced draft backups to this file
    #[arg(long, value_name = "PATH")]
    draft_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the config file
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Split seed text into title and content: a leading `# ` heading becomes
/// the title, everything after it the content.
fn parse_seed(text: &str) -> NoteRecord {
    if let Some(rest) = text.strip_prefix("# ") {
        let (title, content) = rest.split_once('\n').unwrap_or((rest, ""));
        return NoteRecord {
            title: title.trim_end().to_string(),
            content: content.trim_start_matches('\n').to_string(),
        };
    }
    NoteRecord {
        title: String::new(),
        content: text.to_string(),
    }
}

/// Render a draft snapshot back into the same markdown shape `parse_seed`
/// reads.
fn draft_markdown(snapshot: &DraftSnapshot) -> String {
    if snapshot.title.is_empty() {
        snapshot.content.clone()
    } else {
        format!("# {}\n\n{}", snapshot.title, snapshot.content)
    }
}

/// Write a draft backup, replacing the previous one atomically.
fn write_draft(path: &std::path::Path, snapshot: &DraftSnapshot) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, draft_markdown(snapshot))?;
    std::fs::rename(&tmp, path)
}

fn build_hooks(draft_file: Option<PathBuf>) -> EditorHooks {
    let mut hooks = EditorHooks {
        on_title_change: Some(Box::new(|title: &str| {
            let name = if title.is_empty() { "untitled" } else { title };
            let _ = execute!(stdout(), SetTitle(format!("{name} - notespace")));
        })),
        ..EditorHooks::default()
    };
    if let Some(path) = draft_file {
        hooks.on_draft_update = Some(Box::new(move |snapshot: &DraftSnapshot| {
            if let Err(err) = write_draft(&path, snapshot) {
                tracing::warn!(path = %path.display(), error = %err, "draft backup failed");
            }
        }));
    }
    hooks
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        notespace::config::ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let server_url = effective
        .server
        .clone()
        .or_else(|| std::env::var("NOTESPACE_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let logo_text = effective
        .logo
        .clone()
        .unwrap_or_else(|| DEFAULT_LOGO_TEXT.to_string());

    let seed = match &cli.seed {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read seed file {}", path.display()))?;
            Some(parse_seed(&text))
        }
        None => None,
    };

    let draft_file = if cli.note_id.is_none() {
        effective.draft_file.clone()
    } else {
        None
    };

    // Run the application
    let mut app = App::new(cli.note_id.clone(), server_url)
        .with_seed(seed)
        .with_logo_text(logo_text)
        .with_expired(cli.expired)
        .with_hooks(build_hooks(draft_file));

    app.run().context("Application error")
}
