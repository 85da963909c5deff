use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{
    Confirm, CustomType, CustomUserError, InquireError, Select, Text, validator::Validation,
};
use std::fmt;

use weather_board_core::{
    Config, Coordinates, FavoritesBoard, FixedLocator, RequestMode, WeatherClient, WeatherError,
    WeatherView, build_request, shape_weather, shape_weathers,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-board", version, about = "Local weather and favorite cities")]
pub struct Cli {
    /// Print weather as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Weather service endpoint for this run, overriding the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather at the current location.
    Local {
        /// Latitude in decimal degrees; defaults to the configured home.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List favorite cities with their weather.
    Favorites,

    /// Look up a city and add it to favorites.
    Add {
        /// City name, e.g. "Paris" or "New York".
        name: String,
    },

    /// Remove a favorite by id.
    Remove {
        /// Id shown next to the city in `favorites`.
        id: String,
    },

    /// Interactive board: local weather, favorites, and actions on them.
    Board,

    /// Set the service endpoint and locations interactively.
    Configure,

    /// Print the request a short mode tag (geo, fav, name, del) maps to, without sending it.
    #[command(hide = true)]
    Request {
        tag: String,

        /// `lat,lon` for geo, a city name for name, an id for del.
        #[arg(allow_hyphen_values = true)]
        payload: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        // The flag only applies to this run and never reaches the saved config.
        let endpoint = config.endpoint_with(self.endpoint.as_deref())?;

        let mut app = App {
            client: WeatherClient::new(endpoint, config.fallback_coordinates()),
            config,
            json: self.json,
        };
        let mut board = FavoritesBoard::new();

        match self.command {
            Command::Local { lat, lon } => {
                let coords = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                app.show_local(coords).await
            }
            Command::Favorites => app.show_favorites(&mut board).await.map(|_| ()),
            Command::Add { name } => app.add_city(&mut board, &name).await.map(|_| ()),
            Command::Remove { id } => app.remove_city(&mut board, &id).await,
            Command::Board => BoardSession::new(app).run().await,
            Command::Configure => configure(&mut app.config),
            Command::Request { tag, payload } => {
                let line = describe_request(app.client.endpoint(), &tag, payload.as_deref())
                    .map_err(user_facing)?;
                println!("{line}");
                Ok(())
            }
        }
    }
}

struct App {
    client: WeatherClient,
    config: Config,
    json: bool,
}

impl App {
    fn print_view(
        &self,
        view: &WeatherView,
        to_text: fn(&WeatherView) -> String,
    ) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(view)?);
        } else {
            print!("{}", to_text(view));
        }
        Ok(())
    }

    async fn show_local(&self, coords: Option<Coordinates>) -> anyhow::Result<()> {
        let locator = FixedLocator::new(coords.or(self.config.home));

        let record = self
            .client
            .fetch_local_weather(&locator, self.config.geolocation_timeout())
            .await
            .map_err(user_facing)?;
        let view = shape_weather(&record).map_err(user_facing)?;

        self.print_view(&view, render::local_weather)
    }

    async fn show_favorites(
        &self,
        board: &mut FavoritesBoard,
    ) -> anyhow::Result<Vec<WeatherView>> {
        let favorites = self.client.fetch_favorites().await.map_err(generic_failure)?;
        if favorites.cnt as usize != favorites.list.len() {
            tracing::debug!(
                cnt = favorites.cnt,
                listed = favorites.list.len(),
                "favorites count disagrees with list"
            );
        }

        let views = shape_weathers(&favorites).map_err(generic_failure)?;
        board.on_favorites_loaded(views.len());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&views)?);
        } else {
            print!("{}", render::favorites(&views));
        }

        Ok(views)
    }

    /// Returns `None` when the input was blank and nothing was sent.
    async fn add_city(
        &self,
        board: &mut FavoritesBoard,
        name: &str,
    ) -> anyhow::Result<Option<WeatherView>> {
        if name.trim().is_empty() {
            tracing::debug!("ignoring blank city name");
            return Ok(None);
        }

        let record = self.client.fetch_by_name(name).await.map_err(user_facing)?;
        let view = shape_weather(&record).map_err(user_facing)?;

        if board.on_city_added() && !self.json {
            println!("Favorites:");
        }
        self.print_view(&view, render::favorite_item)?;

        Ok(Some(view))
    }

    async fn remove_city(&self, board: &mut FavoritesBoard, id: &str) -> anyhow::Result<()> {
        let remaining = self.client.delete_favorite(id).await.map_err(generic_failure)?;
        let placeholder = board.on_city_deleted(remaining);

        if self.json {
            println!("{}", serde_json::json!({ "removed": id, "remaining": remaining }));
        } else if placeholder {
            println!("{}", render::NO_FAVORITES);
        } else {
            println!("Removed. {remaining} favorite(s) left.");
        }

        Ok(())
    }
}

/// `METHOD endpoint/path` for a mode given by its short tag.
fn describe_request(
    endpoint: &str,
    tag: &str,
    payload: Option<&str>,
) -> Result<String, WeatherError> {
    let spec = build_request(&RequestMode::from_tag(tag, payload)?)?;
    Ok(format!("{} {}{}", spec.method, endpoint, spec.path))
}

/// Keep the user-facing text, log the cause.
fn user_facing(err: WeatherError) -> anyhow::Error {
    tracing::warn!(error = %err, "weather request failed");
    anyhow!(err.user_message())
}

/// Favorites failures all read the same regardless of cause.
fn generic_failure(err: WeatherError) -> anyhow::Error {
    tracing::warn!(error = %err, "favorites request failed");
    anyhow!("Something went wrong. Please try again.")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Refresh,
    Add,
    Remove,
    Quit,
}

impl Action {
    const ALL: [Action; 4] = [Action::Refresh, Action::Add, Action::Remove, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Refresh => "Refresh local weather",
            Action::Add => "Add city",
            Action::Remove => "Remove city",
            Action::Quit => "Quit",
        })
    }
}

struct FavoriteChoice(WeatherView);

impl fmt::Display for FavoriteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}°C)", self.0.name, self.0.temp)
    }
}

/// Interactive session. Owns the board state and the favorites on screen.
struct BoardSession {
    app: App,
    board: FavoritesBoard,
    shown: Vec<WeatherView>,
}

impl BoardSession {
    fn new(app: App) -> Self {
        Self { app, board: FavoritesBoard::new(), shown: Vec::new() }
    }

    async fn run(mut self) -> anyhow::Result<()> {
        report(self.app.show_local(None).await);
        println!();
        match self.app.show_favorites(&mut self.board).await {
            Ok(views) => self.shown = views,
            Err(err) => eprintln!("{err}"),
        }

        loop {
            println!();
            let action = match Select::new("Action:", Action::ALL.to_vec()).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err).context("Failed to read action"),
            };

            match action {
                Action::Refresh => report(self.app.show_local(None).await),
                Action::Add => self.add().await?,
                Action::Remove => self.remove().await?,
                Action::Quit => break,
            }
        }

        Ok(())
    }

    async fn add(&mut self) -> anyhow::Result<()> {
        let name = match Text::new("City name:").prompt() {
            Ok(name) => name,
            Err(InquireError::OperationCanceled) => return Ok(()),
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        match self.app.add_city(&mut self.board, &name).await {
            Ok(Some(view)) => self.shown.push(view),
            Ok(None) => {}
            Err(err) => eprintln!("{err}"),
        }
        Ok(())
    }

    async fn remove(&mut self) -> anyhow::Result<()> {
        if self.shown.is_empty() {
            println!("{}", render::NO_FAVORITES);
            return Ok(());
        }

        let choices = self.shown.iter().cloned().map(FavoriteChoice).collect();
        let FavoriteChoice(view) = match Select::new("Remove which city?", choices).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled) => return Ok(()),
            Err(err) => return Err(err).context("Failed to read city choice"),
        };

        match self.app.remove_city(&mut self.board, view.id.as_str()).await {
            Ok(()) => self.shown.retain(|shown| shown.id != view.id),
            Err(err) => eprintln!("{err}"),
        }
        Ok(())
    }
}

fn report(result: anyhow::Result<()>) {
    if let Err(err) = result {
        eprintln!("{err}");
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let endpoint = Text::new("Weather service endpoint:")
        .with_default(&config.stored_endpoint())
        .prompt()
        .context("Failed to read endpoint")?;
    config.set_endpoint(&endpoint)?;

    let set_home = Confirm::new("Set a home location (used instead of the fallback)?")
        .with_default(config.home.is_some())
        .prompt()
        .context("Failed to read answer")?;
    config.home = if set_home {
        Some(prompt_coordinates("Home", config.home.unwrap_or(config.fallback_coordinates()))?)
    } else {
        None
    };

    config.fallback = Some(prompt_coordinates("Fallback", config.fallback_coordinates())?);

    let timeout_ms = CustomType::<u64>::new("Geolocation timeout (ms):")
        .with_default(config.geolocation_timeout().as_millis() as u64)
        .with_error_message("Please enter a whole number of milliseconds")
        .prompt()
        .context("Failed to read timeout")?;
    config.geolocation_timeout_ms = Some(timeout_ms);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn prompt_coordinates(label: &str, current: Coordinates) -> anyhow::Result<Coordinates> {
    let latitude = CustomType::<f64>::new(&format!("{label} latitude:"))
        .with_default(current.latitude)
        .with_error_message("Please enter a number between -90 and 90")
        .with_validator(|v: &f64| within(*v, 90.0, "Latitude must be within -90..90"))
        .prompt()
        .context("Failed to read latitude")?;

    let longitude = CustomType::<f64>::new(&format!("{label} longitude:"))
        .with_default(current.longitude)
        .with_error_message("Please enter a number between -180 and 180")
        .with_validator(|v: &f64| within(*v, 180.0, "Longitude must be within -180..180"))
        .prompt()
        .context("Failed to read longitude")?;

    Ok(Coordinates::new(latitude, longitude))
}

fn within(value: f64, limit: f64, message: &str) -> Result<Validation, CustomUserError> {
    if (-limit..=limit).contains(&value) {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_board_core::location::DEFAULT_COORDINATES;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper to create a service weather record
    fn city(id: u64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "weather": [{"description": "clear sky", "icon": "01d"}],
            "main": {"temp": 14.6, "pressure": 1019, "humidity": 55},
            "wind": {"speed": 2.0, "deg": 100},
            "clouds": {"all": 0},
            "coord": {"lat": 48.85, "lon": 2.35}
        })
    }

    fn app(server: &MockServer, json: bool) -> App {
        App {
            client: WeatherClient::new(server.uri(), DEFAULT_COORDINATES),
            config: Config::default(),
            json,
        }
    }

    async fn mount_favorites(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/favourites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn mount_delete(server: &MockServer, id: &str, remaining: u64) {
        Mock::given(method("DELETE"))
            .and(path("/favourites"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(remaining)))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_zero_favorites_leave_board_empty() {
        let mock_server = MockServer::start().await;
        mount_favorites(&mock_server, serde_json::json!({"cnt": 0, "list": []})).await;

        let mut board = FavoritesBoard::new();
        let views = app(&mock_server, false).show_favorites(&mut board).await.unwrap();

        assert!(views.is_empty());
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_loaded_favorites_fill_board() {
        let mock_server = MockServer::start().await;
        mount_favorites(
            &mock_server,
            serde_json::json!({"cnt": 2, "list": [city(1, "Paris"), city(2, "Rome")]}),
        )
        .await;

        let mut board = FavoritesBoard::new();
        let views = app(&mock_server, false).show_favorites(&mut board).await.unwrap();

        assert_eq!(views.len(), 2);
        assert!(!board.is_empty());
    }

    #[tokio::test]
    async fn test_count_without_list_keeps_placeholder() {
        let mock_server = MockServer::start().await;
        mount_favorites(&mock_server, serde_json::json!({"cnt": 2})).await;

        let mut board = FavoritesBoard::new();
        board.on_favorites_loaded(1);
        let views = app(&mock_server, false).show_favorites(&mut board).await.unwrap();

        assert!(views.is_empty());
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_adding_to_empty_board_clears_placeholder() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather/city"))
            .and(query_param("q", "Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(city(2988507, "Paris")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut board = FavoritesBoard::new();
        assert!(board.is_empty());

        let view = app(&mock_server, false).add_city(&mut board, " Paris ").await.unwrap();

        assert_eq!(view.map(|v| v.name).as_deref(), Some("Paris"));
        assert!(!board.is_empty());
        assert!(!board.on_city_added());
    }

    #[tokio::test]
    async fn test_blank_add_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut board = FavoritesBoard::new();
        let view = app(&mock_server, false).add_city(&mut board, "   ").await.unwrap();

        assert!(view.is_none());
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_city_reports_name() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather/city"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let mut board = FavoritesBoard::new();
        let err = app(&mock_server, false).add_city(&mut board, "Atlantis").await.unwrap_err();

        assert_eq!(err.to_string(), "Could not find \"Atlantis\".");
        assert!(board.is_empty());
    }

    #[tokio::test]
    async fn test_deleting_last_city_restores_placeholder() {
        for json in [false, true] {
            let mock_server = MockServer::start().await;
            mount_delete(&mock_server, "42", 0).await;

            let mut board = FavoritesBoard::new();
            board.on_favorites_loaded(1);

            app(&mock_server, json).remove_city(&mut board, "42").await.unwrap();
            assert!(board.is_empty(), "json = {json}");
        }
    }

    #[tokio::test]
    async fn test_deleting_with_cities_left_keeps_board() {
        let mock_server = MockServer::start().await;
        mount_delete(&mock_server, "7", 3).await;

        let mut board = FavoritesBoard::new();
        board.on_favorites_loaded(4);

        app(&mock_server, true).remove_city(&mut board, "7").await.unwrap();
        assert!(!board.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_is_generic_and_keeps_board() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/favourites"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut board = FavoritesBoard::new();
        board.on_favorites_loaded(1);

        let err = app(&mock_server, false).remove_city(&mut board, "1").await.unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
        assert!(!board.is_empty());
    }

    #[test]
    fn describe_request_from_short_tags() {
        let endpoint = "http://localhost:3000";

        assert_eq!(
            describe_request(endpoint, "geo", Some("59.93,30.24")).unwrap(),
            "GET http://localhost:3000/weather/coordinates?lat=59.93&lon=30.24"
        );
        assert_eq!(
            describe_request(endpoint, "del", Some("42")).unwrap(),
            "DELETE http://localhost:3000/favourites?id=42"
        );
        assert_eq!(
            describe_request(endpoint, "fav", None).unwrap(),
            "GET http://localhost:3000/favourites"
        );
    }

    #[test]
    fn describe_request_rejects_unknown_tag() {
        let err = describe_request("http://localhost:3000", "weekly", None).unwrap_err();
        assert_eq!(user_facing(err).to_string(), "Enter valid parameters.");
    }

    #[test]
    fn request_command_accepts_negative_payload() {
        let cli = Cli::try_parse_from(["weather-board", "request", "geo", "-33.87,151.2"]).unwrap();
        match cli.command {
            Command::Request { tag, payload } => {
                assert_eq!(tag, "geo");
                assert_eq!(payload.as_deref(), Some("-33.87,151.2"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_local_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "weather-board",
            "local",
            "--lat",
            "-33.87",
            "--lon",
            "151.2",
        ])
        .unwrap();

        match cli.command {
            Command::Local { lat, lon } => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.2));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn local_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["weather-board", "local", "--lat", "10"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "weather-board",
            "favorites",
            "--json",
            "--endpoint",
            "http://localhost:3000",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:3000"));
        assert!(matches!(cli.command, Command::Favorites));
    }

    #[test]
    fn add_takes_a_name() {
        let cli = Cli::try_parse_from(["weather-board", "add", "New York"]).unwrap();
        match cli.command {
            Command::Add { name } => assert_eq!(name, "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn user_facing_keeps_lookup_message() {
        let err = user_facing(WeatherError::CityNotFound { name: "Atlantis".into() });
        assert_eq!(err.to_string(), "Could not find \"Atlantis\".");
    }

    #[test]
    fn favorites_failures_are_generic() {
        let err = generic_failure(WeatherError::InvalidRequest("x".into()));
        assert_eq!(err.to_string(), "Something went wrong. Please try again.");
    }
}
