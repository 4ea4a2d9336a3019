use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quickprompt_core::request::{MAX_TEMPERATURE, MIN_TEMPERATURE};
use quickprompt_core::Settings;

#[derive(Parser, Debug)]
#[command(name = "quickprompt", version)]
#[command(about = "Send a prompt to the OpenAI completions API and read the answer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// OpenAI API key (falls back to OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Sampling temperature, 0.0 to 2.0
    #[arg(short, long, global = true, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Open the interactive terminal window (default)
    Tui,
    /// Send one prompt and print the response
    Ask {
        /// Prompt text
        prompt: Option<String>,
    },
}

impl Cli {
    /// Flags win over the settings file
    pub fn apply_overrides(&self, mut settings: Settings) -> Settings {
        if let Some(temperature) = self.temperature {
            settings.temperature = Some(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            settings.max_tokens = Some(max_tokens);
        }
        settings
    }
}

fn parse_temperature(value: &str) -> Result<f32, String> {
    let temperature: f32 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(format!(
            "temperature must be between {:.1} and {:.1}",
            MIN_TEMPERATURE, MAX_TEMPERATURE
        ));
    }
    Ok(temperature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["quickprompt"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_with_overrides() {
        let cli = Cli::try_parse_from([
            "quickprompt", "ask", "hello there", "--temperature", "1.5", "-m", "64",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Ask { prompt: Some("hello there".to_string()) })
        );

        let settings = cli.apply_overrides(Settings::default());
        assert_eq!(settings.temperature, Some(1.5));
        assert_eq!(settings.max_tokens(), 64);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(Cli::try_parse_from(["quickprompt", "--temperature", "2.5"]).is_err());
        assert!(Cli::try_parse_from(["quickprompt", "--temperature", "warm"]).is_err());
        assert!(Cli::try_parse_from(["quickprompt", "--max-tokens", "0"]).is_err());
    }
}
