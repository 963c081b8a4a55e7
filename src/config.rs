use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "tasks.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads `DATABASE_URL`, `HOST` and `PORT`, honouring a local `.env` file.
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let database_url =
            dotenvy::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = dotenvy::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match dotenvy::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            database_url,
            host,
            port,
        })
    }

    pub fn new_database_url(database_url: String) -> Self {
        Self {
            database_url,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_database_url_uses_default_bind_address() {
        let config = Config::new_database_url("test.db".to_string());
        assert_eq!(config.database_url, "test.db");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }
}
