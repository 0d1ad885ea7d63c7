use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;

// Run mode selected by APP_ENV. Anything other than "production" is
// treated as development.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RunMode {
        match lookup("APP_ENV").as_deref() {
            Some("production") => RunMode::Production,
            _ => RunMode::Development,
        }
    }

    // Env file loaded for this mode before configuration is resolved.
    pub fn env_file(&self) -> &'static str {
        match self {
            RunMode::Development => ".env",
            RunMode::Production => ".env.production",
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

// Loads the mode-selected env file into the process environment. A
// missing file is not an error; variables may come from the environment
// directly.
pub fn load_env_file() {
    let mode = RunMode::from_lookup(|key| std::env::var(key).ok());
    let _ = dotenvy::from_filename(mode.env_file());
}

#[derive(Debug)]
pub enum ConfigError {
    MissingDatabaseUrl,
    InvalidPort(String),
}

// Immutable runtime configuration, resolved once at startup and passed
// to the components that need it.
#[derive(Clone, Debug)]
pub struct Config {
    pub run_mode: RunMode,
    pub port: u16,
    pub database_url: String,
    pub frontend_dir: PathBuf,
    pub frontend_dist: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let run_mode = RunMode::from_lookup(&lookup);

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => DEFAULT_PORT,
        };

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;

        let frontend_dir =
            PathBuf::from(lookup("FRONTEND_DIR").unwrap_or_else(|| "frontend".to_string()));
        let frontend_dist =
            PathBuf::from(lookup("FRONTEND_DIST").unwrap_or_else(|| "frontend/dist".to_string()));

        Ok(Config {
            run_mode,
            port,
            database_url,
            frontend_dir,
            frontend_dist,
        })
    }
}
