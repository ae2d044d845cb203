use clap::{Parser, Subcommand};
use preset_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "presets")]
#[command(about = "Recipe conversion preset resolver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Rule revision to apply (current, legacy)
    #[arg(long, global = true)]
    variant: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog groups and their tags
    Groups,

    /// Resolve a selection and show what was adjusted
    Resolve {
        tags: Vec<String>,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Tags that cannot be selected alongside the given ones
    Disabled { tags: Vec<String> },

    /// Tags that cannot be unselected while the given ones are active
    Locked { tags: Vec<String> },

    /// Display labels for tags
    Label { tags: Vec<String> },

    /// Toggle a tag in the saved selection
    Toggle { tag: String },

    /// Show the saved selection
    Show,

    /// Reset the saved selection
    Clear,

    /// Build a conversion request payload
    Request {
        /// Tags to convert with (defaults to the saved selection)
        tags: Vec<String>,

        #[arg(long)]
        min_calories: Option<f64>,
        #[arg(long)]
        max_calories: Option<f64>,
        #[arg(long)]
        min_protein: Option<f64>,
        #[arg(long)]
        max_protein: Option<f64>,
        #[arg(long)]
        min_carbs: Option<f64>,
        #[arg(long)]
        max_carbs: Option<f64>,
        #[arg(long)]
        min_fat: Option<f64>,
        #[arg(long)]
        max_fat: Option<f64>,

        /// Allergen to exclude (repeatable)
        #[arg(long = "exclude-allergen")]
        exclude_allergens: Vec<String>,

        /// Response language, e.g. "sv" or "en"
        #[arg(long)]
        locale: Option<String>,

        /// Append the request to the local journal
        #[arg(long)]
        record: bool,
    },

    /// Show recently recorded requests
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    preset_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let variant = match cli.variant {
        Some(ref v) => v.parse::<RuleVariant>()?,
        None => config.rules.variant,
    };

    let catalog = get_default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let rules = RuleSet::from_catalog(catalog, variant);
    tracing::debug!("Using {} rules with data dir {:?}", variant, data_dir);
    let selection_path = data_dir.join("selection.json");
    let journal_path = data_dir.join("requests.jsonl");

    match cli.command {
        Commands::Groups => cmd_groups(catalog),
        Commands::Resolve { tags, json } => cmd_resolve(&tags, json, &rules),
        Commands::Disabled { tags } => {
            print_tags(&disabled_for(&Selection::from_strs(&tags), &rules));
            Ok(())
        }
        Commands::Locked { tags } => {
            print_tags(&locked_for(&Selection::from_strs(&tags), &rules));
            Ok(())
        }
        Commands::Label { tags } => {
            for tag in &tags {
                println!("{}", label_for(&Tag::parse(tag)));
            }
            Ok(())
        }
        Commands::Toggle { tag } => cmd_toggle(&selection_path, &Tag::parse(&tag), &rules),
        Commands::Show => cmd_show(&selection_path, &rules),
        Commands::Clear => {
            SavedSelection::clear(&selection_path)?;
            println!("✓ Selection cleared");
            Ok(())
        }
        Commands::Request {
            tags,
            min_calories,
            max_calories,
            min_protein,
            max_protein,
            min_carbs,
            max_carbs,
            min_fat,
            max_fat,
            exclude_allergens,
            locale,
            record,
        } => {
            let nutrition = NutritionTargets {
                min_calories,
                max_calories,
                min_protein,
                max_protein,
                min_carbs,
                max_carbs,
                min_fat,
                max_fat,
            };
            let resolution = if tags.is_empty() {
                SavedSelection::load(&selection_path)?.restore(&rules)
            } else {
                resolve(&Selection::from_strs(&tags), &rules)
            };
            for line in format_adjustments_mutations(&resolution.adjustments) {
                eprintln!("{}", line);
            }

            let allergens = config
                .request
                .exclude_allergens
                .iter()
                .chain(exclude_allergens.iter());
            let locale = locale.unwrap_or_else(|| config.request.locale.clone());
            let request = ConversionRequest::new(&resolution, nutrition, allergens, locale);
            request.validate()?;

            println!("{}", request.to_json()?);

            if record {
                let record = RequestRecord::new(request);
                let mut sink = JsonlSink::new(&journal_path);
                sink.append(&record)?;
                eprintln!("✓ Recorded request {}", record.id);
            }
            Ok(())
        }
        Commands::History { limit } => cmd_history(&journal_path, limit),
    }
}

fn cmd_groups(catalog: &PresetCatalog) -> Result<()> {
    for (group, tags) in catalog.groups() {
        println!("{}", group.title());
        for tag in tags {
            println!("  {:<16} {}", tag.as_str(), label_for(tag));
        }
    }
    Ok(())
}

fn cmd_resolve(tags: &[String], json: bool, rules: &RuleSet) -> Result<()> {
    let resolution = resolve(&Selection::from_strs(tags), rules);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("Resolved: {}", join_ids(resolution.resolved.iter()));
    for line in format_adjustments(&resolution.adjustments) {
        println!("  {}", line);
    }
    Ok(())
}

fn cmd_toggle(selection_path: &Path, tag: &Tag, rules: &RuleSet) -> Result<()> {
    let current = SavedSelection::load(selection_path)?.restore(rules).resolved;

    match toggle(&current, tag, rules) {
        Toggle::Applied(resolution) => {
            SavedSelection::from_resolution(&resolution, rules.variant()).save(selection_path)?;
            println!("Selection: {}", join_ids(resolution.resolved.iter()));
            for line in format_adjustments_mutations(&resolution.adjustments) {
                println!("  {}", line);
            }
        }
        Toggle::Locked(tag) => {
            println!("{} is locked by the current selection", label_for(&tag));
        }
        Toggle::Disabled(tag) => {
            println!("{} conflicts with the current selection", label_for(&tag));
        }
    }
    Ok(())
}

fn cmd_show(selection_path: &Path, rules: &RuleSet) -> Result<()> {
    let saved = SavedSelection::load(selection_path)?;
    let resolution = saved.restore(rules);

    println!("Selection: {}", join_ids(resolution.resolved.iter()));
    let locked = locked_for(&resolution.resolved, rules);
    if !locked.is_empty() {
        println!("Locked:    {}", join_ids(locked.iter()));
    }
    if !resolution.adjustments.auto_disabled.is_empty() {
        println!(
            "Disabled:  {}",
            join_ids(resolution.adjustments.auto_disabled.iter())
        );
    }
    if let Some(saved_at) = saved.saved_at {
        println!("Saved:     {}", saved_at.to_rfc3339());
    }
    Ok(())
}

fn cmd_history(journal_path: &Path, limit: usize) -> Result<()> {
    let records = load_recent_records(journal_path, limit)?;
    if records.is_empty() {
        println!("No recorded requests.");
        return Ok(());
    }

    for record in records {
        let presets = if record.request.presets.is_empty() {
            "(none)".to_string()
        } else {
            record.request.presets.join(", ")
        };
        println!(
            "{}  {}  [{}] {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.id,
            record.request.locale,
            presets
        );
    }
    Ok(())
}

/// Adjustment lines without the derived disabled set
fn format_adjustments_mutations(adjustments: &Adjustments) -> Vec<String> {
    format_adjustments(&Adjustments {
        auto_disabled: Default::default(),
        ..adjustments.clone()
    })
}

fn join_ids<'a>(tags: impl Iterator<Item = &'a Tag>) -> String {
    let ids: Vec<_> = tags.map(|t| t.as_str()).collect();
    if ids.is_empty() {
        "(none)".to_string()
    } else {
        ids.join(", ")
    }
}

fn print_tags(tags: &std::collections::BTreeSet<Tag>) {
    for tag in tags {
        println!("{}", tag);
    }
}
