//! CLI interface for postplan

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::context::{BusinessContext, HttpSheetSource};
use crate::inputs::{InputField, UserInputs};
use crate::llm::OpenAiClient;
use crate::pipeline::{ideas, CalendarPipeline, IdeaPipeline, PostPipeline};
use crate::slots::SlotList;
use crate::store::{JsonFileStore, StateStore};
use crate::vault::{Staging, Vault};

#[derive(Parser)]
#[command(name = "postplan")]
#[command(about = "Social media content planner: idea generation, an idea vault, and calendar assembly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh batch of post ideas from the business profile
    Generate,
    /// Manage the last generated batch of ideas
    Ideas {
        #[command(subcommand)]
        command: IdeaCommands,
    },
    /// Manage the idea vault
    Vault {
        #[command(subcommand)]
        command: VaultCommands,
    },
    /// Stage ideas and assemble a posting calendar
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },
    /// Build a full post (caption and media notes) from a vault idea
    Post {
        /// Vault slot holding the idea
        slot: usize,
        /// Extra post-specific information for the model
        #[arg(short, long, default_value = "")]
        info: String,
        /// Output path for the post document (defaults to a name derived
        /// from the post title)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage saved planning inputs
    Inputs {
        #[command(subcommand)]
        command: InputCommands,
    },
    /// Configure the planner
    Config {
        /// Set the API key for the model endpoint
        #[arg(long)]
        set_api_key: Option<String>,
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set model for a role (usage: --set-model role model_id)
        #[arg(long, value_names = &["role", "model"])]
        set_model: Option<Vec<String>>,
        /// Get model for a role
        #[arg(long)]
        get_model: Option<String>,
        /// List all model assignments
        #[arg(long)]
        list_models: bool,
        /// Set a business-profile sheet URL (usage: --set-sheet tab url)
        #[arg(long, value_names = &["tab", "url"])]
        set_sheet: Option<Vec<String>>,
    },
}

#[derive(Subcommand)]
enum IdeaCommands {
    /// List the ideas from the last generation run
    List,
    /// Save a generated idea into the vault
    Save {
        /// Idea number as shown by `ideas list`
        ordinal: usize,
    },
    /// Discard the last generated batch
    Clear,
}

#[derive(Subcommand)]
enum VaultCommands {
    /// List vault contents
    List,
    /// Add an idea written by hand
    Add {
        /// Idea text
        text: String,
    },
    /// Overwrite a vault slot
    Edit {
        /// Vault slot (1-based)
        slot: usize,
        /// Replacement text
        text: String,
    },
    /// Delete a vault slot
    Delete {
        /// Vault slot (1-based)
        slot: usize,
    },
    /// Copy a vault idea into the calendar staging list
    Promote {
        /// Vault slot (1-based)
        slot: usize,
    },
}

#[derive(Subcommand)]
enum CalendarCommands {
    /// List the staged ideas
    List,
    /// Assemble a calendar from the staged ideas and write an ICS file
    Create {
        /// Output path for the ICS file
        #[arg(short, long, default_value = "calendar.ics")]
        output: PathBuf,
    },
    /// Remove a staged idea
    Remove {
        /// Staging slot (1-based)
        slot: usize,
    },
    /// Clear the whole staging list
    Wipe,
}

#[derive(Subcommand)]
enum InputCommands {
    /// Show the saved planning inputs
    Show,
    /// Set a planning input field
    Set {
        /// Field name (goals, key-dates, media, partnerships, start-date, frequency)
        field: String,
        /// Field value
        value: String,
    },
    /// Condense the partnerships input into a model-written summary
    Summarize,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate => {
            generate_ideas().await?;
        }
        Commands::Ideas { command } => match command {
            IdeaCommands::List => {
                let store = open_store()?;
                let records = ideas::saved_records(&store)?;
                if records.is_empty() {
                    println!("No generated ideas. Run `postplan generate` first.");
                } else {
                    for record in records {
                        println!("Idea {} - {}", record.ordinal, record.title);
                        println!("{}\n", record.body.trim_end());
                    }
                }
            }
            IdeaCommands::Save { ordinal } => {
                let store = open_store()?;
                let records = ideas::saved_records(&store)?;
                let record = records
                    .iter()
                    .find(|r| r.ordinal == ordinal)
                    .with_context(|| format!("No generated idea numbered {}", ordinal))?;
                Vault::new(store).save_idea(&record.body)?;
                println!("Saved idea {} ({}) to the vault.", ordinal, record.title);
            }
            IdeaCommands::Clear => {
                let store = open_store()?;
                ideas::wipe(&store)?;
                println!("Cleared the generated ideas.");
            }
        },
        Commands::Vault { command } => match command {
            VaultCommands::List => {
                let store = open_store()?;
                print_slots("Vault", &Vault::new(store).list()?);
            }
            VaultCommands::Add { text } => {
                let store = open_store()?;
                Vault::new(store).save_idea(&text)?;
                println!("Idea added to the vault.");
            }
            VaultCommands::Edit { slot, text } => {
                let store = open_store()?;
                Vault::new(store).update(slot, &text)?;
                println!("Vault slot {} updated.", slot);
            }
            VaultCommands::Delete { slot } => {
                let store = open_store()?;
                Vault::new(store).delete(slot)?;
                println!("Vault slot {} deleted.", slot);
            }
            VaultCommands::Promote { slot } => {
                let store = open_store()?;
                Vault::new(store).promote(slot)?;
                println!("Vault slot {} staged for the calendar.", slot);
            }
        },
        Commands::Calendar { command } => match command {
            CalendarCommands::List => {
                let store = open_store()?;
                print_slots("Staged", &Staging::new(store).list()?);
            }
            CalendarCommands::Create { output } => {
                create_calendar(&output).await?;
            }
            CalendarCommands::Remove { slot } => {
                let store = open_store()?;
                Staging::new(store).remove(slot)?;
                println!("Staging slot {} removed.", slot);
            }
            CalendarCommands::Wipe => {
                let store = open_store()?;
                Staging::new(store).wipe()?;
                println!("Staging list cleared.");
            }
        },
        Commands::Post { slot, info, output } => {
            build_post(slot, &info, output.as_deref()).await?;
        }
        Commands::Inputs { command } => match command {
            InputCommands::Show => {
                let store = open_store()?;
                let inputs = UserInputs::from_state(&store.load()?);
                print_input("goals", &inputs.goals);
                print_input("key-dates", &inputs.key_dates);
                print_input("media", &inputs.media);
                print_input("partnerships", &inputs.partnerships);
                print_input("start-date", &inputs.start_date);
                print_input("frequency", &inputs.frequency);
                print_input("partnerships summary", &inputs.partnerships_summary);
            }
            InputCommands::Set { field, value } => {
                let field = InputField::parse(&field).with_context(|| {
                    format!(
                        "Unknown field '{}'. Available fields: {}",
                        field,
                        InputField::names().join(", ")
                    )
                })?;
                let store = open_store()?;
                crate::inputs::set_input(&store, field, &value)?;
                println!("Input saved.");
            }
            InputCommands::Summarize => {
                let config = Config::load()?;
                let store = open_store()?;
                let client = OpenAiClient::from_config(&config, &config.models.summary)?;
                let summary =
                    crate::pipeline::summarize_partnerships(&client, &store).await?;
                println!("{}", summary);
            }
        },
        Commands::Config {
            set_api_key,
            show,
            set_model,
            get_model,
            list_models,
            set_sheet,
        } => {
            if let Some(key) = set_api_key {
                crate::config::set_api_key(&key)?;
            } else if let Some(args) = set_model {
                if args.len() >= 2 {
                    crate::config::set_model(&args[0], &args[1])?;
                } else {
                    eprintln!("Usage: --set-model <role> <model_id>");
                    println!(
                        "Available roles: {}",
                        crate::config::ModelsConfig::roles().join(", ")
                    );
                }
            } else if let Some(role) = get_model {
                crate::config::get_model(&role)?;
            } else if list_models {
                crate::config::list_models()?;
            } else if let Some(args) = set_sheet {
                if args.len() >= 2 {
                    crate::config::set_sheet_url(&args[0], &args[1])?;
                } else {
                    eprintln!("Usage: --set-sheet <tab> <url>");
                    println!(
                        "Available tabs: {}",
                        crate::config::SheetsConfig::tabs().join(", ")
                    );
                }
            } else if show {
                crate::config::show_config()?;
            } else {
                println!("Configuration options:");
                println!("  --set-api-key <key>      Set the model API key");
                println!("  --show                   Display current configuration");
                println!("  --set-model <role> <id>  Set model for a role");
                println!("  --get-model <role>       Get model for a role");
                println!("  --list-models            List all model assignments");
                println!("  --set-sheet <tab> <url>  Set a business-profile sheet URL");
                println!();
                println!(
                    "Model roles: {}",
                    crate::config::ModelsConfig::roles().join(", ")
                );
                println!(
                    "Sheet tabs:  {}",
                    crate::config::SheetsConfig::tabs().join(", ")
                );
            }
        }
    }

    Ok(())
}

fn open_store() -> Result<JsonFileStore> {
    let config = Config::load()?;
    Ok(JsonFileStore::new(config.store.session_file_path()?))
}

fn print_slots(label: &str, list: &SlotList) {
    if list.occupied() == 0 {
        println!("{} list is empty.", label);
        return;
    }
    for (i, slot) in list.slots().iter().enumerate() {
        if slot.trim().is_empty() {
            continue;
        }
        println!("{} {}:", label, i + 1);
        println!("{}\n", slot.trim_end());
    }
}

fn print_input(name: &str, value: &str) {
    if value.trim().is_empty() {
        println!("{:<21} (not set)", format!("{}:", name));
    } else {
        println!("{:<21} {}", format!("{}:", name), value);
    }
}

async fn generate_ideas() -> Result<()> {
    let config = Config::load()?;
    let store = open_store()?;
    let client = OpenAiClient::from_config(&config, &config.models.ideas)?;

    println!("Fetching business profile...");
    let source = HttpSheetSource::new();
    let ctx = BusinessContext::fetch(&source, &config.sheets).await?;

    println!("Generating post ideas with {}...", config.models.ideas);
    let pipeline = IdeaPipeline::new(client, store);
    let records = pipeline.generate(&ctx).await?;

    if records.is_empty() {
        println!("The model returned no parseable ideas. Try again.");
        return Ok(());
    }

    for record in &records {
        println!("Idea {} - {}", record.ordinal, record.title);
        println!("{}\n", record.body.trim_end());
    }
    println!(
        "Saved {} ideas. Keep one with `postplan ideas save <n>`.",
        records.len()
    );

    Ok(())
}

async fn create_calendar(output: &std::path::Path) -> Result<()> {
    let config = Config::load()?;
    let store = open_store()?;

    {
        let staged = Staging::new(open_store()?).list()?;
        if staged.occupied() == 0 {
            anyhow::bail!(
                "The staging list is empty. Promote vault ideas with `postplan vault promote <slot>` first."
            );
        }
    }

    let client = OpenAiClient::from_config(&config, &config.models.calendar)?;
    println!("Assembling calendar with {}...", config.models.calendar);

    let pipeline = CalendarPipeline::new(client, store);
    let events = pipeline.assemble().await?;

    for event in &events {
        println!("{}  {}", event.start.format("%Y-%m-%d %H:%M"), event.title);
    }

    let ics = crate::export::render_calendar(&events);
    std::fs::write(output, ics)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} events to {}", events.len(), output.display());

    Ok(())
}

async fn build_post(
    slot: usize,
    info: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let config = Config::load()?;
    let store = open_store()?;

    let vault = Vault::new(store).list()?;
    let idea = match vault.get(slot) {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => anyhow::bail!("No idea in vault slot {}", slot),
    };

    println!("Fetching business profile...");
    let source = HttpSheetSource::new();
    let ctx = BusinessContext::fetch(&source, &config.sheets).await?;

    let client = OpenAiClient::from_config(&config, &config.models.post)?;
    println!("Building post with {}...", config.models.post);

    let pipeline = PostPipeline::new(client);
    let doc = pipeline.build(&idea, info, &ctx).await?;
    let rendered = crate::export::render_post_document(&doc);

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(crate::export::post_file_name(&doc)),
    };
    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote post to {}", path.display());

    Ok(())
}
