use buut_client::app::App;
use buut_client::config::Config;
use buut_client::presentation::{HomeHolder, LoginHolder, ProfileHolder};
use buut_client::sync;
use buut_client::use_cases::Logout;
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

#[derive(Debug)]
struct LoadedEnvFile {
    path: PathBuf,
    explicit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Sync,
    Profile,
    Bookings,
    Notifications,
    Login,
    Logout,
}

impl Command {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "sync" => Some(Command::Sync),
            "profile" => Some(Command::Profile),
            "bookings" => Some(Command::Bookings),
            "notifications" => Some(Command::Notifications),
            "login" => Some(Command::Login),
            "logout" => Some(Command::Logout),
            _ => None,
        }
    }
}

struct Cli {
    env_file: Option<PathBuf>,
    command: Command,
}

fn parse_cli() -> Result<Cli, String> {
    let mut args = std::env::args_os();
    args.next(); // skip program name

    let mut env_file: Option<PathBuf> = None;
    let mut command: Option<Command> = None;

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--env-file") => {
                if env_file.is_some() {
                    return Err("`--env-file` provided more than once".to_string());
                }
                let value = args
                    .next()
                    .ok_or_else(|| "`--env-file` requires a path argument".to_string())?;
                env_file = Some(PathBuf::from(value));
            }
            Some(s) if s.starts_with("--env-file=") => {
                if env_file.is_some() {
                    return Err("`--env-file` provided more than once".to_string());
                }
                let path_str = &s["--env-file=".len()..];
                if path_str.is_empty() {
                    return Err("`--env-file` requires a path argument".to_string());
                }
                env_file = Some(PathBuf::from(path_str));
            }
            Some(s) if !s.starts_with('-') => {
                if command.is_some() {
                    return Err(format!("unexpected argument: {s}"));
                }
                command = Some(Command::parse(s).ok_or_else(|| format!("unknown command: {s}"))?);
            }
            Some(other) => return Err(format!("unrecognised argument: {other}")),
            None => return Err("argument contains invalid UTF-8".to_string()),
        }
    }

    Ok(Cli {
        env_file,
        command: command.unwrap_or(Command::Sync),
    })
}

/// Load `--env-file`, or `.env` in the working directory when present.
/// Variables already set in the process win over the file.
fn load_env(env_file: Option<PathBuf>) -> Result<Option<LoadedEnvFile>, String> {
    if let Some(path) = env_file {
        if !path.is_file() {
            return Err(format!("env file not found: {}", path.display()));
        }
        dotenvy::from_path(&path).map_err(|e| format!("failed to load {}: {e}", path.display()))?;
        return Ok(Some(LoadedEnvFile { path, explicit: true }));
    }
    let cwd = std::env::current_dir().map_err(|e| format!("unable to read current directory: {e}"))?;
    let default_path = cwd.join(".env");
    if default_path.is_file() {
        dotenvy::from_path(&default_path).map_err(|e| format!("failed to load {}: {e}", default_path.display()))?;
        Ok(Some(LoadedEnvFile {
            path: default_path,
            explicit: false,
        }))
    } else {
        Ok(None)
    }
}

fn run(command: Command) -> Result<(), String> {
    let cfg = Config::from_env().map_err(|e| e.to_string())?;
    info!(
        "Config loaded (api={}, cache={}, booking_interval={}s, notification_interval={}s, sync_enabled={}, auth0={})",
        cfg.api_url,
        cfg.cache_path,
        cfg.booking_sync_interval.as_secs(),
        cfg.notification_sync_interval.as_secs(),
        cfg.sync_enabled,
        cfg.auth0.as_ref().map(|a| a.domain.as_str()).unwrap_or("-"),
    );

    match command {
        Command::Sync => run_sync(&cfg),
        Command::Profile => show_profile(&cfg),
        Command::Bookings => show_bookings(&cfg),
        Command::Notifications => show_notifications(&cfg),
        Command::Login => login(&cfg),
        Command::Logout => logout(&cfg),
    }
}

fn run_sync(cfg: &Config) -> Result<(), String> {
    if !cfg.sync_enabled {
        info!("Sync loops disabled via SYNC_ENABLED={}", cfg.sync_enabled);
        return Ok(());
    }
    let stop = Arc::new(AtomicBool::new(false));
    let handles = sync::spawn_loops(cfg, stop).map_err(|e| e.to_string())?;
    for handle in handles {
        if handle.join().is_err() {
            error!("A sync thread panicked");
        }
    }
    Ok(())
}

fn app(cfg: &Config) -> Result<App, String> {
    App::from_config(cfg).map_err(|e| e.to_string())
}

fn show_profile(cfg: &Config) -> Result<(), String> {
    let app = app(cfg)?;
    let mut profile = ProfileHolder::new(&app);
    profile.load();
    if let Some(e) = profile.state.api_error {
        return Err(e);
    }
    if !profile.state.is_network_available {
        warn!("Offline: showing cached profile");
    }
    let Some(user) = profile.state.user else {
        return Ok(());
    };
    println!("{} {} <{}>", user.first_name, user.last_name, user.email);
    println!("phone: {}", user.phone);
    let r#box = user.address.r#box.as_deref().map(|b| format!(" bus {b}")).unwrap_or_default();
    println!("address: {} {}{}", user.address.street, user.address.house_number, r#box);
    if let Some(born) = user.date_of_birth {
        println!("born: {}", born.date());
    }
    Ok(())
}

fn load_home(app: &App) -> Result<HomeHolder<'_>, String> {
    let mut home = HomeHolder::new(app);
    home.load();
    match &home.state.api_error {
        Some(e) if home.state.is_network_available => Err(e.clone()),
        Some(e) => {
            warn!("{e}");
            Ok(home)
        }
        None => Ok(home),
    }
}

fn show_bookings(cfg: &Config) -> Result<(), String> {
    let app = app(cfg)?;
    let home = load_home(&app)?;
    if home.state.bookings.is_empty() {
        println!("No bookings");
    }
    for b in &home.state.bookings {
        println!(
            "{}  {:<10}  boat={}  battery={}",
            b.date.format("%Y-%m-%d %H:%M"),
            b.time_slot.as_deref().unwrap_or("-"),
            b.boat.as_deref().unwrap_or("-"),
            b.battery.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn show_notifications(cfg: &Config) -> Result<(), String> {
    let app = app(cfg)?;
    let home = load_home(&app)?;
    println!("{} unread", home.state.unread_notifications);
    for n in &home.state.notifications {
        let marker = if n.is_read { " " } else { "*" };
        println!("{marker} {}  {}: {}", n.created_at.format("%Y-%m-%d %H:%M"), n.title, n.message);
    }
    Ok(())
}

fn login(cfg: &Config) -> Result<(), String> {
    let email = std::env::var("BUUT_EMAIL").map_err(|_| "BUUT_EMAIL is not set".to_string())?;
    let password = std::env::var("BUUT_PASSWORD").map_err(|_| "BUUT_PASSWORD is not set".to_string())?;
    let app = app(cfg)?;
    let mut login = LoginHolder::new(&app);
    login.set_email(&email);
    login.set_password(&password);
    if login.on_login() {
        Ok(())
    } else {
        Err(login.state.api_error.unwrap_or_else(|| "Login failed".to_string()))
    }
}

fn logout(cfg: &Config) -> Result<(), String> {
    let app = app(cfg)?;
    let user = app.get_user().execute().map_err(|e| e.to_string())?;
    let signed_in = !user.id.is_empty();
    Logout::new(&app.users, &app.session)
        .execute(signed_in.then_some(&user))
        .map_err(|e| e.to_string())?;
    if !signed_in {
        info!("Nobody signed in");
    }
    Ok(())
}

fn main() {
    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("fatal: {err}");
            std::process::exit(1);
        }
    };
    let loaded_env = match load_env(cli.env_file) {
        Ok(info) => info,
        Err(err) => {
            eprintln!("fatal: {err}");
            std::process::exit(1);
        }
    };

    // Init logging after environment so RUST_LOG from .env is respected.
    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    if let Some(info) = loaded_env.as_ref() {
        let origin = if info.explicit { "CLI-specified" } else { "default" };
        info!("Environment loaded from {} .env file: {}", origin, info.path.display());
    }

    info!(
        "buut-client {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run(cli.command) {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}
