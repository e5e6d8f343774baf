use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{
    CustomUserError, Password, PasswordDisplayMode, Select, Text, validator::Validation,
};
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, info};
use weather_core::{Config, Coordinates, Report, Units, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather conditions for a latitude/longitude")]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// Show current weather; prompts for coordinates that are not given.
    Show(ShowArgs),
}

#[derive(Debug, Default, Args)]
pub struct ShowArgs {
    /// Latitude in degrees, -90..=90.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees, -180..=180.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Unit system; overrides the configured one.
    #[arg(long, value_parser = parse_units)]
    pub units: Option<Units>,

    /// Also print humidity, pressure, sunrise/sunset and friends.
    #[arg(long)]
    pub details: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show(args)) => show(args).await,
            None => show(ShowArgs::default()).await,
        }
    }
}

fn parse_units(s: &str) -> Result<Units, String> {
    Units::try_from(s).map_err(|e| e.to_string())
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(|key: &str| -> Result<Validation, CustomUserError> {
            if key.trim().is_empty() {
                Ok(Validation::Invalid("API key must not be empty".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()
        .context("Failed to read API key")?;

    let options = vec![Units::Imperial, Units::Metric];
    let start = options.iter().position(|u| *u == cfg.units).unwrap_or(0);
    let units = Select::new("Units:", options)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit system")?;

    cfg.set_api_key(api_key);
    cfg.units = units;

    let path = cfg.save()?;
    info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;
    if let Some(units) = args.units {
        cfg.units = units;
    }

    let coords = resolve_coordinates(args.lat, args.lon)?;
    debug!(lat = coords.lat(), lon = coords.lon(), "resolved coordinates");

    let provider = provider_from_config(&cfg)?;

    print!("\nGetting your location's weather data!\n\n");

    let resp = provider.current_conditions(coords).await?;

    let mut report = Report::from_response(&resp, cfg.units);
    if args.details {
        report = report.with_details(&resp, cfg.units);
    }

    print!("{report}");

    Ok(())
}

/// Coordinates from flags, falling back to prompts. Piped stdin is read one value per line.
fn resolve_coordinates(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<Coordinates> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return resolve_with(lat, lon, prompt_terminal);
    }

    let mut lines = stdin.lock();
    let mut out = io::stdout();
    resolve_with(lat, lon, |label| read_line_degrees(&mut lines, &mut out, label))
}

fn resolve_with(
    lat: Option<f64>,
    lon: Option<f64>,
    mut read: impl FnMut(&str) -> anyhow::Result<f64>,
) -> anyhow::Result<Coordinates> {
    let lat = match lat {
        Some(v) => v,
        None => read("latitude")?,
    };
    let lon = match lon {
        Some(v) => v,
        None => read("longitude")?,
    };

    Ok(Coordinates::new(lat, lon)?)
}

fn prompt_terminal(label: &str) -> anyhow::Result<f64> {
    let message = format!("Enter your {label}:");
    let raw = Text::new(&message)
        .prompt()
        .with_context(|| format!("Failed to read {label}"))?;

    parse_degrees(&raw, label)
}

fn read_line_degrees(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
) -> anyhow::Result<f64> {
    write!(out, "Enter your {label}: ")?;
    out.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {label} from standard input"))?;
    if read == 0 {
        bail!("No {label} given on standard input");
    }

    parse_degrees(&line, label)
}

/// Bad input is fatal; there is no re-prompt.
fn parse_degrees(raw: &str, label: &str) -> anyhow::Result<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .with_context(|| format!("Invalid {label} '{trimmed}': expected a number, e.g. 40.7128"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_interactive_show() {
        let cli = Cli::try_parse_from(["weather"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn show_accepts_negative_coordinates_and_units() {
        let cli = Cli::try_parse_from([
            "weather", "show", "--lat", "-33.87", "--lon", "151.21", "--units", "metric", "-v",
        ])
        .expect("parses");

        assert!(cli.verbose);
        match cli.command {
            Some(Command::Show(args)) => {
                assert_eq!(args.lat, Some(-33.87));
                assert_eq!(args.lon, Some(151.21));
                assert_eq!(args.units, Some(Units::Metric));
                assert!(!args.details);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_units_are_rejected() {
        let err = Cli::try_parse_from(["weather", "show", "--units", "kelvin"]).unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn flag_coordinates_skip_prompts() {
        let coords = resolve_with(Some(51.5), Some(-0.12), |label| {
            panic!("should not prompt for {label}")
        })
        .expect("valid");
        assert_eq!(coords.lat(), 51.5);
        assert_eq!(coords.lon(), -0.12);
    }

    #[test]
    fn out_of_range_flag_coordinates_fail() {
        let err = resolve_with(Some(91.0), Some(0.0), |_| unreachable!()).unwrap_err();
        assert!(err.to_string().contains("Invalid coordinates"));
    }

    #[test]
    fn piped_lines_supply_both_coordinates() {
        let mut input = io::Cursor::new("40.7\n-74.0\n");
        let mut out = Vec::new();

        let coords = resolve_with(None, None, |label| {
            read_line_degrees(&mut input, &mut out, label)
        })
        .expect("valid");

        assert_eq!(coords.lat(), 40.7);
        assert_eq!(coords.lon(), -74.0);
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Enter your latitude: Enter your longitude: "
        );
    }

    #[test]
    fn piped_garbage_is_fatal() {
        let mut input = io::Cursor::new("abc\n0\n");
        let mut out = Vec::new();

        let err = resolve_with(None, None, |label| {
            read_line_degrees(&mut input, &mut out, label)
        })
        .unwrap_err();

        assert!(err.to_string().contains("Invalid latitude 'abc'"));
    }

    #[test]
    fn piped_out_of_range_value_is_fatal() {
        let mut input = io::Cursor::new("91\n0\n");
        let mut out = Vec::new();

        let err = resolve_with(None, None, |label| {
            read_line_degrees(&mut input, &mut out, label)
        })
        .unwrap_err();

        assert!(err.to_string().contains("Invalid coordinates"));
    }

    #[test]
    fn exhausted_stdin_is_fatal() {
        let mut input = io::Cursor::new("12.5\n");
        let mut out = Vec::new();

        let err = resolve_with(None, None, |label| {
            read_line_degrees(&mut input, &mut out, label)
        })
        .unwrap_err();

        assert!(err.to_string().contains("No longitude given"));
    }

    #[test]
    fn parse_degrees_trims_and_rejects_text() {
        assert_eq!(parse_degrees("  -12.25 \r\n", "latitude").expect("number"), -12.25);
        assert!(parse_degrees("", "latitude").is_err());
        assert!(parse_degrees("north", "longitude").is_err());
    }
}
