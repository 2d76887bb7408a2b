use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use weather_core::{Config, InputMode, RequestState, WeatherApp, render_state};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or a point on the map")]
pub struct Cli {
    /// weatherapi.com API key; overrides the configured one.
    #[arg(long, env = "WEATHERAPI_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key.
    Configure,

    /// Show current weather for a city or a coordinate pair.
    Show {
        /// City name.
        city: Option<String>,

        /// Latitude; together with --lon it takes precedence over the city.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude.
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Pick locations by name or by clicking points on the map, one after another.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon } => {
                let mut app = build_app(self.api_key)?;
                show(&mut app, city, lat, lon).await
            }
            Command::Interactive => {
                let mut app = build_app(self.api_key)?;
                interactive(&mut app).await
            }
        }
    }
}

fn build_app(api_key: Option<String>) -> anyhow::Result<WeatherApp> {
    let config = Config::load()?.with_api_key_override(api_key);
    WeatherApp::new(&config).map_err(|e| anyhow::anyhow!(e.user_message()))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(key);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn show(
    app: &mut WeatherApp,
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> anyhow::Result<()> {
    let selector = app.selector_mut();
    selector.set_city(city.unwrap_or_default());
    selector.set_latitude(lat);
    selector.set_longitude(lon);

    let state = app.submit().await;
    let out = render_state(state);

    match state {
        RequestState::Error(_) => {
            tracing::warn!(error = %out, "lookup failed");
            bail!(out)
        }
        _ => {
            println!("{out}");
            Ok(())
        }
    }
}

const GET_WEATHER: &str = "Get weather";
const CLICK_MAP: &str = "Click on the map";
const USE_MAP: &str = "Use Map to Select Location";
const USE_CITY: &str = "Use City Name";
const QUIT: &str = "Quit";

async fn interactive(app: &mut WeatherApp) -> anyhow::Result<()> {
    loop {
        let options = match app.mode() {
            InputMode::Manual => vec![GET_WEATHER, USE_MAP, QUIT],
            InputMode::Map => vec![CLICK_MAP, USE_CITY, QUIT],
        };

        let choice = match Select::new("What next?", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                tracing::debug!("menu cancelled, leaving interactive mode");
                break;
            }
            Err(e) => return Err(e).context("Failed to read menu choice"),
        };

        let step = match choice {
            GET_WEATHER => manual_lookup(app).await,
            CLICK_MAP => map_click(app).await,
            USE_MAP | USE_CITY => {
                app.toggle_mode();
                Ok(())
            }
            _ => break,
        };

        match step {
            Ok(()) => {}
            Err(e) if is_cancel(&e) => {
                tracing::debug!(choice, "prompt cancelled, back to menu");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

async fn manual_lookup(app: &mut WeatherApp) -> anyhow::Result<()> {
    let city = Text::new("City name:").with_default(app.selector().city()).prompt()?;
    let lat = Text::new("Latitude (optional):").prompt()?;
    let lon = Text::new("Longitude (optional):").prompt()?;

    let selector = app.selector_mut();
    selector.set_city(city);
    let entered = selector.set_latitude_text(&lat).and_then(|()| selector.set_longitude_text(&lon));
    if let Err(e) = entered {
        println!("{}", e.user_message());
        return Ok(());
    }

    print_state(app).await;
    Ok(())
}

async fn map_click(app: &mut WeatherApp) -> anyhow::Result<()> {
    let input = Text::new("Click at (lat, lon):").with_placeholder("51.5074, -0.1278").prompt()?;

    let Some((lat, lon)) = parse_point(&input) else {
        println!("Enter the point as two numbers, e.g. 51.5074, -0.1278");
        return Ok(());
    };

    println!("Loading...");
    let Some(state) = app.map_click(lat, lon).await else {
        println!("That point is not on the map.");
        return Ok(());
    };
    let out = render_state(state);

    if let Some(tile) = app.selector().map().marker_tile_url() {
        println!("Marker tile: {tile}");
    }
    println!("{out}");
    Ok(())
}

async fn print_state(app: &mut WeatherApp) {
    println!("Loading...");
    let state = app.submit().await;
    println!("{}", render_state(state));
}

fn parse_point(input: &str) -> Option<(f64, f64)> {
    let (lat, lon) = input.split_once(',')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

fn is_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_click_input() {
        assert_eq!(parse_point("51.5074, -0.1278"), Some((51.5074, -0.1278)));
        assert_eq!(parse_point("  1,2 "), Some((1.0, 2.0)));
        assert_eq!(parse_point("51.5074"), None);
        assert_eq!(parse_point("north, south"), None);
    }

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weather", "show", "--lat", "51.5074", "--lon", "-0.1278"])
            .unwrap();

        match cli.command {
            Command::Show { city, lat, lon } => {
                assert_eq!(city, None);
                assert_eq!(lat, Some(51.5074));
                assert_eq!(lon, Some(-0.1278));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn show_without_location_fails_with_hint() {
        let mut config = Config::default();
        config.set_api_key("KEY".into());
        // Never contacted: validation fails before any request.
        config.base_url = "http://127.0.0.1:9".into();
        let mut app = WeatherApp::new(&config).unwrap();

        let err = show(&mut app, Some("  ".into()), None, None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter a city name or select a location on the map."
        );
    }

    #[test]
    fn api_key_flag_is_global() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris", "--api-key", "KEY"]).unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("KEY"));
    }
}
