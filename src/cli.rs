//! Command-line interface definitions using clap

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{DEFAULT_CONFIG_PATH, StaticConfig};

/// Linkhub - a link-in-bio service
#[derive(Parser)]
#[command(name = "linkhub")]
#[command(version)]
#[command(about = "A link-in-bio service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Write a configuration file with every default value
    GenerateConfig {
        /// Output path (default: config.example.toml)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Write the default configuration to `output`
pub fn generate_config(output: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        anyhow::bail!("File already exists: {} (use --force to overwrite)", path);
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;

    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["linkhub"]);
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_generate_config() {
        let cli = Cli::parse_from(["linkhub", "-c", "/etc/linkhub.toml", "generate-config", "-o", "out.toml"]);
        assert_eq!(cli.config, "/etc/linkhub.toml");
        assert_eq!(
            cli.command,
            Some(Commands::GenerateConfig {
                output: Some("out.toml".to_string()),
                force: false
            })
        );
    }

    #[test]
    fn test_generate_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap().to_string();

        generate_config(Some(path.clone()), false).unwrap();
        assert!(generate_config(Some(path.clone()), false).is_err());
        generate_config(Some(path.clone()), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: StaticConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.server.port, 8080);
    }
}
