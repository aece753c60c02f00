use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use avarts::notify::TelegramNotifier;
use avarts::scraper::WebScraper;
use avarts::store::JsonFileStore;
use avarts::watch::{PageLayout, Registry, Watcher};

#[derive(Parser)]
#[command(name = "avarts")]
#[command(about = "Watch public Strava profiles and announce new activities", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
enum Layout {
    Classic,
    NextData,
}

impl From<Layout> for PageLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Classic => PageLayout::Classic,
            Layout::NextData => PageLayout::NextData,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check watched users once and send a Telegram alert per new activity
    Watch {
        #[arg(
            required = true,
            help = "Nicknames to check, as registered in the profiles file"
        )]
        names: Vec<String>,

        #[arg(
            long,
            value_enum,
            default_value = "next-data",
            help = "Which profile page layout to extract"
        )]
        layout: Layout,

        #[arg(
            long,
            default_value = "profiles.json",
            help = "Path to the nickname registry file"
        )]
        profiles: String,

        #[arg(
            long,
            default_value = "activity_history.json",
            help = "Path to the announced-activity history file"
        )]
        history: String,
    },
    /// Fetch and print an athlete's profile (embedded-data layout)
    Athlete {
        #[arg(help = "Numeric Strava athlete id")]
        id: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch and print recent activities (legacy page layout)
    Recent {
        #[arg(help = "Numeric Strava athlete id")]
        id: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Print the local start timestamp of a single activity
    Activity {
        #[arg(help = "Numeric activity id")]
        id: i64,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Watch {
            names,
            layout,
            profiles,
            history,
        } => {
            let registry = Registry::from_file(&profiles).unwrap_or_else(|e| {
                log::error!("Error loading profiles from {}: {}", profiles, e);
                process::exit(1);
            });
            let store = JsonFileStore::open(&history).unwrap_or_else(|e| {
                log::error!("Error opening history file {}: {}", history, e);
                process::exit(1);
            });
            let notifier = TelegramNotifier::from_env().unwrap_or_else(|e| {
                log::error!("Error configuring Telegram: {}", e);
                process::exit(1);
            });

            let mut watcher = Watcher::new(scraper, store, notifier);
            match watcher.run(&registry, &names, layout.into()).await {
                Ok(0) => log::info!("No new activities."),
                Ok(n) => log::info!("Sent {} notification(s).", n),
                Err(e) => {
                    log::error!("Watch run failed: {}", e);
                    process::exit(1);
                }
            }
        }

        Commands::Athlete { id, format } => {
            let athlete = scraper.fetch_athlete(&id).await.unwrap_or_else(|e| {
                log::error!("Error fetching athlete {}: {}", id, e);
                process::exit(1);
            });
            match format {
                OutputFormat::Json => serialize_json(&athlete),
                OutputFormat::Text => print!("{}", athlete),
            }
        }

        Commands::Recent { id, format } => {
            let activities = scraper.fetch_recent_activities(&id).await.unwrap_or_else(|e| {
                log::error!("Error fetching recent activities for {}: {}", id, e);
                process::exit(1);
            });
            match format {
                OutputFormat::Json => serialize_json(&activities),
                OutputFormat::Text => {
                    if activities.is_empty() {
                        println!("No activities to display.");
                    } else {
                        for (i, activity) in activities.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, activity);
                        }
                    }
                }
            }
        }

        Commands::Activity { id } => {
            let start = scraper.fetch_activity_start(id).await.unwrap_or_else(|e| {
                log::error!("Error fetching activity {}: {}", id, e);
                process::exit(1);
            });
            println!("{}", start);
        }
    }
}
