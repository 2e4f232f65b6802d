use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::{
    App, AuthCommand, ConfigCommand, ContactCommand, DewormingCommand, MealCommand, PetCommand,
    ReminderCommand, VaccineCommand, VisitCommand,
};
use petcare::config::Config;

#[derive(Parser)]
#[command(name = "petcare")]
#[command(version)]
#[command(about = "Keep track of your pets' health records", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Use the in-memory demo backend instead of the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and manage your account
    Auth(AuthCommand),

    /// Manage pets and their photos
    Pet(PetCommand),

    /// Manage vaccination records
    Vaccine(VaccineCommand),

    /// Manage deworming records
    Deworming(DewormingCommand),

    /// Manage vet visits
    Visit(VisitCommand),

    /// Manage reminders
    Reminder(ReminderCommand),

    /// Log and review meals
    Meal(MealCommand),

    /// Contact the support team
    Contact(ContactCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petcare=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    let offline = cli.offline || config.offline.value;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let app = App::new(config, offline)?;
    match command {
        Commands::Auth(cmd) => cmd.run(&app).await,
        Commands::Pet(cmd) => cmd.run(&app).await,
        Commands::Vaccine(cmd) => cmd.run(&app).await,
        Commands::Deworming(cmd) => cmd.run(&app).await,
        Commands::Visit(cmd) => cmd.run(&app).await,
        Commands::Reminder(cmd) => cmd.run(&app).await,
        Commands::Meal(cmd) => cmd.run(&app).await,
        Commands::Contact(cmd) => cmd.run(&app).await,
        Commands::Config(cmd) => cmd.run(app.config()),
    }
}
