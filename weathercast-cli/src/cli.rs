use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use std::{env, sync::Arc};
use weathercast_core::{
    Config, OpenWeatherProvider, RequestState, Units, WeatherCoordinator,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathercast", version, about = "Current weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default units.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Unit system, "metric" or "imperial"; defaults to the configured value.
        #[arg(long)]
        units: Option<String>,
    },

    /// Prompt for cities repeatedly; blank input repeats the last search.
    Interactive {
        /// Unit system, "metric" or "imperial"; defaults to the configured value.
        #[arg(long)]
        units: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(&city, units.as_deref()).await,
            Command::Interactive { units } => interactive(units.as_deref()).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }

    let units = Select::new("Default units:", Units::all().to_vec()).prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.set_units(units);
    config.save()?;

    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(city: &str, units: Option<&str>) -> Result<()> {
    let city = city.trim();
    if city.is_empty() {
        bail!("City name must not be empty.");
    }

    let (coordinator, units) = build_coordinator(units)?;
    let mut updates = coordinator.subscribe();

    {
        let coordinator = Arc::clone(&coordinator);
        let city = city.to_string();
        tokio::spawn(async move { coordinator.request_weather(&city).await });
    }

    loop {
        updates
            .changed()
            .await
            .map_err(|_| anyhow!("request state publisher closed unexpectedly"))?;

        let state = updates.borrow_and_update().clone();
        match state {
            RequestState::Idle => {}
            RequestState::Loading => eprintln!("Fetching weather for {city}..."),
            RequestState::Loaded(record) => {
                println!("{}", record.format_summary(units));
                return Ok(());
            }
            RequestState::Failed(message) => bail!(message),
        }
    }
}

async fn interactive(units: Option<&str>) -> Result<()> {
    let (coordinator, units) = build_coordinator(units)?;

    println!("Enter a city name. Blank input repeats the last search, 'q' quits.");

    loop {
        let input = Text::new("City:").prompt()?;
        let input = input.trim();

        if input.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        if input.is_empty() {
            if !coordinator.refresh().await {
                println!("Nothing searched yet.");
                continue;
            }
        } else {
            coordinator.request_weather(input).await;
        }

        match coordinator.state() {
            RequestState::Loaded(record) => println!("{}", record.format_summary(units)),
            RequestState::Failed(message) => println!("{message}"),
            RequestState::Idle | RequestState::Loading => {}
        }
    }
}

fn build_coordinator(units: Option<&str>) -> Result<(Arc<WeatherCoordinator>, Units)> {
    let config = Config::load()?;
    let api_key = resolve_api_key(&config)?;
    let units = resolve_units(units, &config)?;

    let provider = Arc::new(OpenWeatherProvider::new(api_key));
    let coordinator = Arc::new(WeatherCoordinator::new(provider, units));

    Ok((coordinator, units))
}

fn resolve_api_key(config: &Config) -> Result<String> {
    if let Ok(key) = env::var("OPENWEATHER_API_KEY") {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(key);
        }
    }

    match config.api_key() {
        Some(key) => Ok(key.to_string()),
        None => Err(anyhow!(
            "No API key configured.\n\
             Hint: run `weathercast configure` or set the OPENWEATHER_API_KEY environment variable."
        )),
    }
}

fn resolve_units(flag: Option<&str>, config: &Config) -> Result<Units> {
    match flag {
        Some(value) => Units::try_from(value),
        None => config.units_or_default(),
    }
}
