use std::{env, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BACKEND_URL: &str = "https://backend.doxcert.com";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub spellcheck_wordlist: Option<PathBuf>,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            backend_url: env::var("BACKEND_URL").unwrap_or_else(|_| {
                info!("BACKEND_URL not set, using default: {DEFAULT_BACKEND_URL}");
                DEFAULT_BACKEND_URL.to_string()
            }),
            spellcheck_wordlist: env::var("SPELLCHECK_WORDLIST").ok().map(PathBuf::from),
            secure_cookies: parse_var("COOKIE_SECURE").unwrap_or(false),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("invalid {key} value '{value}', using default");
            None
        }
    }
}
