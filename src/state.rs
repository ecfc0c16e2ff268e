use crate::backend::BackendClient;
use crate::config::Config;
use crate::spelling::{NoSpellCheck, SpellChecker};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub spell_checker: Arc<dyn SpellChecker>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(config: &Config, spell_checker: Option<Arc<dyn SpellChecker>>) -> Self {
        Self {
            backend: BackendClient::new(reqwest::Client::new(), config.backend_url.clone()),
            spell_checker: spell_checker.unwrap_or_else(|| Arc::new(NoSpellCheck)),
            secure_cookies: config.secure_cookies,
        }
    }
}
