use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ClientConfig, HttpStudyApi, StudyService};
use study_core::model::UserId;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUser { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUser { raw } => write!(f, "invalid --user value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    service: StudyService,
    config: ClientConfig,
}

impl UiApp for DesktopApp {
    fn study_service(&self) -> StudyService {
        self.service.clone()
    }

    fn config(&self) -> ClientConfig {
        self.config.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--user <name>] [--export-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", services::DEFAULT_API_URL);
    eprintln!("  --user {}", UserId::DEFAULT);
    eprintln!("  --export-dir .");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_API_URL, STUDY_USER_ID, STUDY_EXPORT_DIR,");
    eprintln!("  STUDY_HTTP_TIMEOUT_SECS, STUDY_EMPTY_HISTORY_DELAY_MS, RUST_LOG");
}

/// Applies command-line overrides on top of the environment configuration.
fn parse_args(
    mut config: ClientConfig,
    args: &mut impl Iterator<Item = String>,
) -> Result<Option<ClientConfig>, Box<dyn std::error::Error>> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--api-url" => {
                let value = require_value(args, "--api-url")?;
                config = config.with_base_url(value)?;
            }
            "--user" => {
                let value = require_value(args, "--user")?;
                let user = UserId::new(value.as_str())
                    .map_err(|_| ArgsError::InvalidUser { raw: value.clone() })?;
                config = config.with_default_user(user);
            }
            "--export-dir" => {
                let value = require_value(args, "--export-dir")?;
                config = config.with_export_dir(PathBuf::from(value));
            }
            "--help" | "-h" => return Ok(None),
            _ => return Err(ArgsError::UnknownArg(arg).into()),
        }
    }
    Ok(Some(config))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let config = ClientConfig::from_env()?;
    let Some(config) = parse_args(config, &mut argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    init_tracing();
    tracing::info!(
        api = %config.base_url,
        user = %config.default_user,
        export_dir = %config.export_dir.display(),
        "starting study planner"
    );

    let api = HttpStudyApi::new(&config)?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        service: StudyService::new(Arc::new(api)),
        config,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Study Planner")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|arg| (*arg).to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse_args(
            ClientConfig::default(),
            &mut args(&["--api-url", "https://study.example", "--user", " ada ", "--export-dir", "out"]),
        )
        .expect("parse")
        .expect("config");
        assert_eq!(config.base_url, "https://study.example");
        assert_eq!(config.default_user.as_str(), "ada");
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn help_and_bad_flags() {
        assert!(
            parse_args(ClientConfig::default(), &mut args(&["--help"]))
                .expect("parse")
                .is_none()
        );
        assert!(parse_args(ClientConfig::default(), &mut args(&["--user"])).is_err());
        assert!(parse_args(ClientConfig::default(), &mut args(&["--user", "  "])).is_err());
        assert!(parse_args(ClientConfig::default(), &mut args(&["--api-url", "ftp://x"])).is_err());
        assert!(parse_args(ClientConfig::default(), &mut args(&["--verbose"])).is_err());
    }
}
