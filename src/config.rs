use anyhow::{Result, anyhow};

pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration, read once at startup:
/// - `PORT` (optional, defaults to 8080)
/// - `MONGODB_URI` (mandatory)
///
/// A missing `.env` file is non-fatal by design: deployed environments
/// supply the variables themselves, so `main` only logs the miss.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mongodb_uri = std::env::var("MONGODB_URI")
            .map_err(|_| anyhow!("MONGODB_URI missing in environment"))?;

        Ok(Self { port, mongodb_uri })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so all cases live in one test fn.
    #[test]
    fn from_env_resolves_port_and_uri() {
        unsafe {
            std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");
            std::env::set_var("PORT", "9999");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");

        unsafe {
            std::env::set_var("PORT", "not-a-port");
        }
        assert_eq!(Config::from_env().unwrap().port, DEFAULT_PORT);

        unsafe {
            std::env::remove_var("PORT");
        }
        assert_eq!(Config::from_env().unwrap().port, DEFAULT_PORT);

        unsafe {
            std::env::remove_var("MONGODB_URI");
        }
        assert!(Config::from_env().is_err());
    }
}
