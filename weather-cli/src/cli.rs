use std::{fmt, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use weather_core::{Config, HourlyVariable, VariableSet, WeatherReport};

use crate::{render, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather and the next hours' forecast for a city"
)]
pub struct Cli {
    /// Read settings from this file instead of the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// What to do; defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for a city.
    Show {
        /// City or town name.
        city: String,

        /// Also print the raw forecast API response.
        #[arg(long)]
        raw: bool,

        /// Number of hourly points to chart; defaults to the configured value.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        hours: Option<u32>,
    },

    /// Search repeatedly, with a menu of earlier searches.
    Interactive,

    /// Edit settings interactively.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command.unwrap_or(Command::Interactive) {
            Command::Show { city, raw, hours } => {
                let mut session = Session::from_config(config)?;
                let max_points = hours
                    .map(|h| h as usize)
                    .unwrap_or(session.config().forecast_hours);

                let report = session.search(&city, max_points).await?;
                print!("{}", render::report(&report));

                if raw {
                    println!("\nRaw API response:\n{}", report.raw_json());
                }
            }
            Command::Interactive => interactive(config).await?,
            Command::Configure => configure(config, self.config)?,
        }

        Ok(())
    }
}

enum MenuChoice {
    NewSearch,
    Repeat(String),
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuChoice::NewSearch => f.write_str("New search"),
            MenuChoice::Repeat(name) => f.write_str(name),
            MenuChoice::Quit => f.write_str("Quit"),
        }
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// "New search", the most recent history entries, then "Quit".
fn menu(session: &Session) -> anyhow::Result<MenuChoice> {
    let mut options = vec![MenuChoice::NewSearch];
    options.extend(
        session
            .history()
            .recent(session.config().history_display)
            .map(|name| MenuChoice::Repeat(name.to_string())),
    );
    options.push(MenuChoice::Quit);

    match Select::new("Search history", options).prompt() {
        Ok(choice) => Ok(choice),
        Err(err) if is_cancel(&err) => Ok(MenuChoice::Quit),
        Err(err) => Err(err.into()),
    }
}

async fn interactive(config: Config) -> anyhow::Result<()> {
    let mut session = Session::from_config(config)?;
    println!("Enter a city and press Enter to get weather data.");

    loop {
        let choice = if session.history().is_empty() {
            MenuChoice::NewSearch
        } else {
            menu(&session)?
        };

        let max_points = session.config().forecast_hours;
        let outcome = match choice {
            MenuChoice::NewSearch => {
                let query = match Text::new("Search city (name or town):")
                    .with_placeholder("e.g. Istanbul")
                    .prompt()
                {
                    Ok(query) => query,
                    Err(err) if is_cancel(&err) => break,
                    Err(err) => return Err(err.into()),
                };
                session.search(&query, max_points).await
            }
            // A history pick reuses the place resolved the first time.
            MenuChoice::Repeat(name) => session.revisit(&name, max_points).await,
            MenuChoice::Quit => break,
        };

        match outcome {
            Ok(report) => {
                println!();
                print!("{}", render::report(&report));
                if !offer_raw(&report)? {
                    break;
                }
                println!();
            }
            Err(err) => {
                tracing::debug!(error = ?err, "Search failed");
                eprintln!("{err}");
            }
        }
    }

    Ok(())
}

/// Collapsed by default; expanded on request.
///
/// Returns `false` when the user cancelled the prompt and wants to leave.
fn offer_raw(report: &WeatherReport) -> anyhow::Result<bool> {
    let answer = Confirm::new("Show raw API response?")
        .with_default(false)
        .prompt();

    match confirm_answer(answer)? {
        Some(true) => {
            println!("{}", report.raw_json());
            Ok(true)
        }
        Some(false) => Ok(true),
        None => Ok(false),
    }
}

/// `None` for a cancelled prompt; other prompt failures are errors.
fn confirm_answer(answer: Result<bool, InquireError>) -> anyhow::Result<Option<bool>> {
    match answer {
        Ok(show) => Ok(Some(show)),
        Err(err) if is_cancel(&err) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    config.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.timezone = Text::new("Timezone mode:")
        .with_default(&config.timezone)
        .with_help_message("\"auto\" lets the provider pick the zone from the coordinates")
        .prompt()?;

    config.forecast_hours = CustomType::<usize>::new("Hours shown in charts:")
        .with_default(config.forecast_hours)
        .with_error_message("Please enter a whole number of hours")
        .prompt()?;

    let options = HourlyVariable::all().to_vec();
    let selected: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, v)| config.hourly.contains(**v))
        .map(|(i, _)| i)
        .collect();

    let chosen = MultiSelect::new("Hourly variables:", options)
        .with_default(&selected)
        .prompt()?;
    config.hourly = VariableSet::new(chosen);

    config.validate().context("Settings not saved")?;

    let path = match path {
        Some(path) => path,
        None => Config::config_file_path()?,
    };
    config.save_to(&path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_answer_passes_choice_through() {
        assert_eq!(confirm_answer(Ok(true)).unwrap(), Some(true));
        assert_eq!(confirm_answer(Ok(false)).unwrap(), Some(false));
    }

    #[test]
    fn cancelled_confirm_means_leave() {
        let interrupted = confirm_answer(Err(InquireError::OperationInterrupted)).unwrap();
        assert_eq!(interrupted, None);

        let canceled = confirm_answer(Err(InquireError::OperationCanceled)).unwrap();
        assert_eq!(canceled, None);
    }

    #[test]
    fn other_prompt_failures_are_errors() {
        assert!(confirm_answer(Err(InquireError::NotTTY)).is_err());
    }
}
