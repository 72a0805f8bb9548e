use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tourdesk_core::{SchemaView, BOOKING_SCHEMA};
use tourdesk_files::{AttachmentPolicy, AttachmentSlot, ExtensionSet};
use tourdesk_form::{
    lists::label, placeholder, DraftLoad, DraftManager, FileDraftStorage, FormSession, Segment,
    SubmissionClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tourdesk")]
#[command(about = "Tourdesk booking intake CLI")]
struct Cli {
    /// Directory drafts are kept in
    #[arg(long, global = true, env = "TOURDESK_DRAFT_DIR", default_value = ".tourdesk")]
    draft_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the booking schema descriptor
    Schema {
        /// `form` or `submission`
        #[arg(default_value = "submission")]
        view: String,
    },
    /// Validate a booking JSON file
    Validate {
        /// Path to the booking JSON
        file: PathBuf,
        /// `form` or `submission`
        #[arg(long, default_value = "submission")]
        view: String,
    },
    /// Show special-terms templates split into text and placeholders
    Terms {
        /// Template to split instead of the presets
        #[arg(long)]
        text: Option<String>,
    },
    /// Check and encode an attachment, printing its metadata
    Attach {
        /// Path to the document
        path: PathBuf,
        /// Also accept .xlsx and .md
        #[arg(long)]
        rich: bool,
        /// Skip the 10 MB ceiling
        #[arg(long)]
        no_size_limit: bool,
    },
    /// Inspect or delete the saved draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
    /// Submit a booking file to a tourdesk server
    Submit {
        /// Path to the booking JSON (attachment fields are ignored)
        file: PathBuf,
        /// Document to attach
        #[arg(long)]
        attach: PathBuf,
        /// Server base URL
        #[arg(long, env = "TOURDESK_SERVER", default_value = "http://localhost:3000")]
        server: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the draft if it would be restored
    Show,
    /// Delete the draft
    Clear,
}

fn parse_view(view: &str) -> anyhow::Result<SchemaView> {
    view.parse::<SchemaView>().map_err(|e| anyhow::anyhow!(e))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn print_terms(templates: &[String]) {
    for (i, template) in templates.iter().enumerate() {
        println!("{}. {}", label(i), template);
        if !placeholder::has_placeholders(template) {
            continue;
        }
        for segment in placeholder::segment(template) {
            match segment {
                Segment::Literal(text) => println!("     text  {text:?}"),
                Segment::Placeholder(inner) => println!("     field [{inner}]"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let storage = FileDraftStorage::new(cli.draft_dir.clone());
    let drafts = Arc::new(DraftManager::new(Arc::new(storage)));

    match cli.command {
        Some(Commands::Schema { view }) => {
            let descriptor = BOOKING_SCHEMA.descriptor(parse_view(&view)?);
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Some(Commands::Validate { file, view }) => {
            let view = parse_view(&view)?;
            let payload = read_json(&file)?;
            match BOOKING_SCHEMA.validate(view, &payload) {
                Ok(()) => println!("{} is valid ({view:?} view)", file.display()),
                Err(errors) => {
                    for error in errors.iter() {
                        eprintln!("{}: {}", error.field, error.message);
                    }
                    anyhow::bail!("{} field(s) failed validation", errors.len());
                }
            }
        }
        Some(Commands::Terms { text }) => match text {
            Some(text) => print_terms(&[text]),
            None => {
                let presets: Vec<String> = tourdesk_core::constants::PRESET_SPECIAL_TERMS
                    .iter()
                    .map(|t| t.to_string())
                    .collect();
                print_terms(&presets);
            }
        },
        Some(Commands::Attach {
            path,
            rich,
            no_size_limit,
        }) => {
            let extensions = if rich {
                ExtensionSet::Rich
            } else {
                ExtensionSet::Basic
            };
            let mut slot = AttachmentSlot::new(AttachmentPolicy::new(extensions, !no_size_limit));
            match slot.handle_path(&path) {
                Ok(()) => {
                    if let Some(file) = slot.value() {
                        println!("{}", serde_json::to_string_pretty(&file.metadata())?);
                    }
                }
                Err(e) => anyhow::bail!("{}: {e}", path.display()),
            }
        }
        Some(Commands::Draft { action }) => match action {
            DraftAction::Show => match drafts.load()? {
                DraftLoad::Empty => println!("No draft saved."),
                DraftLoad::Discarded(reason) => println!("Discarded stale draft ({reason:?})."),
                restored @ DraftLoad::Restored { .. } => {
                    for notice in restored.notices() {
                        println!("{notice}");
                    }
                    if let DraftLoad::Restored { values, .. } = restored {
                        println!("{}", serde_json::to_string_pretty(&values)?);
                    }
                }
            },
            DraftAction::Clear => {
                drafts.clear()?;
                println!("Draft cleared.");
            }
        },
        Some(Commands::Submit {
            file,
            attach,
            server,
            timeout,
        }) => {
            let booking = tourdesk_core::validate_form(&read_json(&file)?)?;
            let client = SubmissionClient::new(&server, Duration::from_secs(timeout))?;

            let mut session = FormSession::new(drafts, ExtensionSet::Basic);
            session.load_values(booking);
            session.attach_path(&attach)?;

            let res = session.submit(&client).await?;
            println!("{}", serde_json::to_string_pretty(&res)?);
            if !res.success {
                anyhow::bail!("submission rejected: {}", res.message);
            }
            if res.delivery_failed() {
                eprintln!("warning: the booking was stored but the webhook did not receive it");
            }
        }
        None => {
            println!("Use 'tourdesk --help' for commands");
        }
    }

    Ok(())
}
