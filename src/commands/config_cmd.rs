use clap::{Args, Subcommand};

use petcare::config::Config;

use super::{print_json, OutputFormat};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => print_json(config)?,
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        match &config.config_file {
                            Some(path) => println!("Config file: {}", path.display()),
                            None => println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            ),
                        }
                        println!();

                        let rows = [
                            ("api_url", config.api_url.value.clone(), &config.api_url.source),
                            (
                                "data_dir",
                                config.data_dir.value.display().to_string(),
                                &config.data_dir.source,
                            ),
                            ("timezone", config.timezone.value.clone(), &config.timezone.source),
                            ("offline", config.offline.value.to_string(), &config.offline.source),
                        ];
                        for (i, (key, value, source)) in rows.iter().enumerate() {
                            if i > 0 {
                                println!();
                            }
                            println!("{}: {}", key, value);
                            println!("  source: {}", source);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
