use activity_core::config::{ConfigOverrides, validate_offset};
use activity_core::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track shop-floor activities", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List activities matching the current filters
    ///
    /// Given filters replace the current ones; `all` clears a filter.
    ///
    /// Example: activities list --search weld --status pending
    List {
        /// Case-insensitive text matched against title and description
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Reset search text and all filters
    ClearFilters,
    /// Show details of an activity
    ///
    /// Example: activities show 2
    Show { id: String },
    /// Create an activity
    ///
    /// Example: activities new --title "Weld inspection" --assign 3 --due 2025-01-20T09:00:00Z
    New {
        #[command(flatten)]
        fields: ActivityFields,
    },
    /// Edit an activity; only the given fields change
    ///
    /// Example: activities edit 2 --status in_progress --progress 30
    Edit {
        id: String,
        #[command(flatten)]
        fields: ActivityFields,
    },
    /// Delete an activity after confirmation
    ///
    /// Example: activities delete 2 --yes
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List employees activities can be assigned to
    Employees,
    /// List equipment activities can reference
    Equipment,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ActivityFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Employee ids, comma separated
    #[arg(long = "assign", value_delimiter = ',')]
    pub assigned_to: Option<Vec<String>>,
    /// Equipment id; an empty value clears it
    #[arg(long = "equipment")]
    pub equipment_id: Option<String>,
    /// Due date (RFC3339)
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long = "estimated")]
    pub estimated_hours: Option<f64>,
    #[arg(long = "actual")]
    pub actual_hours: Option<f64>,
    /// Remove the recorded actual hours
    #[arg(long, conflicts_with = "actual_hours")]
    pub clear_actual: bool,
    #[arg(long)]
    pub progress: Option<u8>,
}

impl ActivityFields {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    SeedPath,
    UtcOffsetHours,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let canonical_field =
        canonicalize_flag_name(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "seed_path" | "seed" => ConfigOverrideTarget::SeedPath,
        "utc_offset_hours" | "utc_offset" => ConfigOverrideTarget::UtcOffsetHours,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(|message| {
            AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {message}"))
        })?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::SeedPath => {
                overrides.seed_path = Some(PathBuf::from(parsed.value));
            }
            ConfigOverrideTarget::UtcOffsetHours => {
                let hours = parsed.value.parse::<i8>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "{CONFIG_OVERRIDE_FLAG}: utc_offset_hours must be a whole number of hours"
                    ))
                })?;
                validate_offset(Some(hours))
                    .map_err(|err| AppError::invalid_input(err.message().to_string()))?;
                overrides.utc_offset_hours = Some(hours);
            }
        }
    }
    Ok(overrides)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
