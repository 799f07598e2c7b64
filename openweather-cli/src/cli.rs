use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use openweather::{DateSpec, Exclude, OneCall, OpenWeather, ResponseBody, Units};
use tracing::info;

use crate::config::{API_KEY_ENV, Config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "openweather", version, about = "OpenWeather One Call CLI")]
pub struct Cli {
    /// API key; overrides the environment and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default options.
    Configure,

    /// Current weather and forecasts.
    Forecast {
        #[command(flatten)]
        at: Coordinates,

        /// Sections to leave out, e.g. `--exclude minutely,alerts`.
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<Exclude>,

        #[arg(long)]
        units: Option<Units>,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Weather at a Unix timestamp.
    Timemachine {
        #[command(flatten)]
        at: Coordinates,

        /// Unix time, UTC.
        #[arg(long, allow_negative_numbers = true)]
        dt: i64,

        #[arg(long)]
        units: Option<Units>,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Aggregated weather for one day.
    DaySummary {
        #[command(flatten)]
        at: Coordinates,

        /// Date as YYYY-MM-DD.
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        units: Option<Units>,

        #[arg(long)]
        lang: Option<String>,
    },

    /// Human-readable weather overview.
    Overview {
        #[command(flatten)]
        at: Coordinates,

        /// Date as YYYY-MM-DD; today if absent.
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        units: Option<Units>,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct Coordinates {
    /// Latitude (-90; 90).
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude (-180; 180).
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let api_key = self.api_key;
        let onecall = || -> Result<OneCall> {
            let key = config.resolve_api_key(api_key.clone(), std::env::var(API_KEY_ENV).ok())?;
            Ok(OpenWeather::new(key).onecall())
        };

        let body: ResponseBody = match self.command {
            Command::Configure => return configure(config.clone()),
            Command::Forecast {
                at,
                exclude,
                units,
                lang,
            } => {
                let lang = config.lang_or_default(lang);
                onecall()?
                    .forecast(
                        at.lat,
                        at.lon,
                        &exclude,
                        config.units_or_default(units),
                        lang.as_deref(),
                    )
                    .await
            }
            Command::Timemachine {
                at,
                dt,
                units,
                lang,
            } => {
                let lang = config.lang_or_default(lang);
                onecall()?
                    .timemachine(at.lat, at.lon, dt, config.units_or_default(units), lang.as_deref())
                    .await
            }
            Command::DaySummary {
                at,
                date,
                units,
                lang,
            } => {
                let lang = config.lang_or_default(lang);
                onecall()?
                    .day_summary(at.lat, at.lon, date, config.units_or_default(units), lang.as_deref())
                    .await
            }
            Command::Overview { at, date, units } => {
                onecall()?
                    .overview(
                        at.lat,
                        at.lon,
                        date.map(DateSpec::from),
                        config.units_or_default(units),
                    )
                    .await
            }
        }
        .context("OpenWeather request failed")?;

        let pretty =
            serde_json::to_string_pretty(&body).context("Failed to format response as JSON")?;
        println!("{pretty}");

        Ok(())
    }
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut choices = vec!["(none)".to_string()];
    choices.extend(Units::all().iter().map(ToString::to_string));
    let units = Select::new("Default units:", choices)
        .prompt()
        .context("Failed to read default units")?;

    let lang = Text::new("Default language (blank for none):")
        .prompt()
        .context("Failed to read default language")?;

    config.api_key = Some(api_key.trim().to_string());
    config.units = units.parse().ok();
    config.lang = Some(lang.trim().to_string()).filter(|l| !l.is_empty());

    let path = config.save()?;
    info!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_parses_exclude_list_and_negative_coordinates() {
        let cli = Cli::parse_from([
            "openweather",
            "forecast",
            "--lat",
            "-33.8688",
            "--lon",
            "151.2093",
            "--exclude",
            "daily,alerts",
            "--units",
            "metric",
        ]);

        match cli.command {
            Command::Forecast {
                at, exclude, units, lang,
            } => {
                assert_eq!(at.lat, -33.8688);
                assert_eq!(exclude, vec![Exclude::Daily, Exclude::Alerts]);
                assert_eq!(units, Some(Units::Metric));
                assert_eq!(lang, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn day_summary_requires_a_valid_date() {
        let err = Cli::try_parse_from([
            "openweather",
            "day-summary",
            "--lat",
            "1",
            "--lon",
            "2",
            "--date",
            "15/03/2024",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn overview_has_no_lang_flag() {
        let err = Cli::try_parse_from([
            "openweather",
            "overview",
            "--lat",
            "1",
            "--lon",
            "2",
            "--lang",
            "kr",
        ])
        .unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn api_key_flag_is_global() {
        let cli = Cli::parse_from([
            "openweather",
            "timemachine",
            "--lat",
            "1",
            "--lon",
            "2",
            "--dt",
            "1710460800",
            "--api-key",
            "FLAG",
        ]);

        assert_eq!(cli.api_key.as_deref(), Some("FLAG"));
        assert!(matches!(cli.command, Command::Timemachine { dt: 1_710_460_800, .. }));
    }
}
