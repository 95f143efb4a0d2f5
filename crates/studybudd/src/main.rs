use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studybudd::commands;
use studybudd::config::{Credentials, DEFAULT_CREDENTIALS_FILE};
use studybudd::sheet::{PlanSheet, DEFAULT_WORKBOOK};

#[derive(Parser)]
#[command(name = "studybudd")]
#[command(
  about = "StudyBudd - AI-Powered Study Planner\nDescribe study activities in plain language, sync them to your calendar, and locate educational institutions"
)]
#[command(version)]
struct Cli {
  /// Path to the credentials file (Gemini key, calendar id, maps key)
  #[arg(long, default_value = DEFAULT_CREDENTIALS_FILE, global = true)]
  credentials: PathBuf,

  /// Path to the study plan workbook
  #[arg(long, default_value = DEFAULT_WORKBOOK, global = true)]
  file: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Describe a study activity in plain language and add it to the plan
  Plan {
    /// Activity description, e.g. "I have a math test tomorrow at 5 pm"
    description: String,
  },
  /// Show the current study plan
  Show,
  /// Edit one event in the plan by id
  Edit {
    /// Event id, e.g. ID-3
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time_start: Option<String>,
    #[arg(long)]
    time_end: Option<String>,
    /// Low, Medium, or High
    #[arg(long)]
    priority: Option<String>,
    #[arg(long)]
    notes: Option<String>,
  },
  /// Push events to Google Calendar (all by default)
  Sync {
    /// Only sync these ids
    #[arg(long, value_delimiter = ',')]
    ids: Vec<String>,
    /// Path to the Google service account key file
    #[arg(long, default_value = studybudd::calendar::DEFAULT_KEY_FILE)]
    key_file: PathBuf,
  },
  /// Print the URL for viewing the configured calendar
  Calendar,
  /// Find the nearest educational institutions or a route to one
  Locate {
    /// Free-text request, e.g. "what is the nearest university from my location?"
    query: String,
    /// Fallback origin as "lat,lon"; looked up from your IP when omitted
    #[arg(long)]
    origin: Option<String>,
    /// Where to write the GeoJSON map output
    #[arg(long, default_value = studybudd::render::DEFAULT_MAP_FILE)]
    map_file: PathBuf,
  },
  /// Generate flashcards for a topic
  Flashcards {
    topic: String,
  },
  /// Generate practice questions for a topic
  Questions {
    topic: String,
    /// Also ask for detailed solutions
    #[arg(long)]
    solutions: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let credentials = Credentials::load(&cli.credentials);
  let sheet = PlanSheet::new(&cli.file);

  match cli.command {
    Commands::Plan { description } => commands::plan::handle(&credentials, &sheet, &description).await,
    Commands::Show => commands::show::handle(&sheet),
    Commands::Edit { id, name, date, time_start, time_end, priority, notes } => {
      let changes = commands::edit::Changes { name, date, time_start, time_end, priority, notes };
      commands::edit::handle(&sheet, &id, changes)
    }
    Commands::Sync { ids, key_file } => {
      commands::sync::handle(&credentials, &sheet, &ids, &key_file).await
    }
    Commands::Calendar => commands::calendar::handle(&credentials),
    Commands::Locate { query, origin, map_file } => {
      commands::locate::handle(&credentials, &query, origin.as_deref(), &map_file).await
    }
    Commands::Flashcards { topic } => commands::flashcards::handle(&credentials, &topic).await,
    Commands::Questions { topic, solutions } => {
      commands::questions::handle(&credentials, &topic, solutions).await
    }
  }
}
