use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

/// Browser origins allowed to call the API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Reads `ALLOWED_ORIGINS`, a comma-separated list. `*` allows any origin.
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self { allowed_origins }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}
