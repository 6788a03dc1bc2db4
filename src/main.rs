/// Version injected at compile time via APIPROFILE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("APIPROFILE_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use apiprofile::config::{Config, OutputFormat};
use apiprofile::profile::{
    compare_api_versions, get_api_version, get_profile, profile_names, supported_api_version,
    ResourceType,
};
use apiprofile::sdk::{get_client_class, get_versioned_sdk, get_versioned_sdk_path, SdkOptions};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Resolve API versions and SDK paths for API profiles
#[derive(Parser, Debug)]
#[command(name = "apiprofile", version = VERSION, about, long_about = None)]
struct Args {
    /// API profile to use
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the API version pinned for a resource type
    Version { resource: ResourceType },
    /// Check the pinned version against inclusive bounds
    Supported {
        resource: ResourceType,
        #[arg(long)]
        min: Option<String>,
        #[arg(long)]
        max: Option<String>,
    },
    /// Print the versioned SDK module path
    SdkPath { resource: ResourceType },
    /// Resolve `module#attr.attr` requests against the versioned SDK
    Resolve {
        resource: ResourceType,
        /// Requests; none resolves the versioned module itself
        attrs: Vec<String>,
        /// Submodule applied to requests without their own `#`
        #[arg(long = "mod")]
        sub_module: Option<String>,
        /// Fail instead of printing null for missing items
        #[arg(long)]
        unchecked: bool,
    },
    /// Print the client class of a resource type
    Client { resource: ResourceType },
    /// List profiles and their pinned versions
    Profiles,
    /// Compare two version strings
    Compare { a: String, b: String },
    /// Persist the default profile
    SetProfile { name: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("apiprofile started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("apiprofile").join("apiprofile.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".apiprofile").join("apiprofile.log");
    }
    PathBuf::from("apiprofile.log")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let mut config = Config::load();
    let profile = config.effective_profile(args.profile.as_deref());
    let output = config.effective_output(args.output);

    tracing::info!("Using profile: {}, output: {:?}", profile, output);

    let value = run(args.command, &profile, &mut config)?;
    print_value(&value, output)
}

fn run(command: Command, profile: &str, config: &mut Config) -> Result<Value> {
    match command {
        Command::Version { resource } => Ok(json!(get_api_version(profile, resource)?)),
        Command::Supported { resource, min, max } => Ok(json!(supported_api_version(
            profile,
            resource,
            min.as_deref(),
            max.as_deref(),
        )?)),
        Command::SdkPath { resource } => Ok(json!(get_versioned_sdk_path(profile, resource)?)),
        Command::Resolve {
            resource,
            attrs,
            sub_module,
            unchecked,
        } => {
            let mut options = SdkOptions::default();
            if let Some(sub_module) = sub_module.as_deref() {
                options = options.with_module(sub_module);
            }
            if unchecked {
                options = options.unchecked();
            }
            let requests: Vec<&str> = attrs.iter().map(String::as_str).collect();
            let items = get_versioned_sdk(profile, resource, &requests, &options)?.into_items();
            let infos: Vec<_> = items.iter().map(|i| i.as_ref().map(|i| i.info())).collect();
            Ok(serde_json::to_value(infos)?)
        }
        Command::Client { resource } => {
            let info = get_client_class(resource).map(|c| c.info());
            Ok(serde_json::to_value(info)?)
        }
        Command::Profiles => {
            let mut listing: BTreeMap<&str, BTreeMap<String, &str>> = BTreeMap::new();
            for name in profile_names() {
                let Some(pinned) = get_profile(name) else {
                    continue;
                };
                listing.insert(
                    name,
                    pinned.iter().map(|(rt, v)| (rt.to_string(), v)).collect(),
                );
            }
            Ok(serde_json::to_value(listing)?)
        }
        Command::Compare { a, b } => {
            let symbol = match compare_api_versions(&a, &b)? {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            Ok(json!(symbol))
        }
        Command::SetProfile { name } => {
            if get_profile(&name).is_none() {
                anyhow::bail!(
                    "Unknown profile '{}'. Known profiles: {}",
                    name,
                    profile_names().join(", ")
                );
            }
            config.set_profile(&name)?;
            tracing::info!("Default profile set to {}", name);
            Ok(json!(name))
        }
    }
}

fn print_value<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => print!("{}", render_text(&serde_json::to_value(value)?)),
    }
    Ok(())
}

fn render_text(value: &Value) -> String {
    match value {
        Value::Null => "null\n".to_string(),
        Value::String(s) => format!("{}\n", s),
        Value::Array(items) => items.iter().map(render_text).collect(),
        Value::Object(map) if map.contains_key("kind") && map.contains_key("path") => format!(
            "{}\t{}\n",
            map["kind"].as_str().unwrap_or("-"),
            map["path"].as_str().unwrap_or("-")
        ),
        Value::Object(map) => {
            let mut out = String::new();
            for (key, inner) in map {
                out.push_str(&format!("{}\n", key));
                if let Value::Object(pins) = inner {
                    for (rt, version) in pins {
                        out.push_str(&format!("  {:<28} {}\n", rt, version.as_str().unwrap_or("-")));
                    }
                }
            }
            out
        }
        other => format!("{}\n", other),
    }
}
