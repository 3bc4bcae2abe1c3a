use std::time::Duration;

use clap::Parser;

use sky_common::JwtProperties;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[arg(long, env = "SKY_SERVER_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Postgres URL; employees are kept in memory when absent.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "SKY_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    #[arg(long, env = "SKY_JWT_ADMIN_SECRET", default_value = "itcast", hide_env_values = true)]
    pub jwt_admin_secret: String,

    #[arg(long, env = "SKY_JWT_ADMIN_TTL_MS", default_value_t = 7_200_000)]
    pub jwt_admin_ttl_ms: u64,

    #[arg(long, env = "SKY_JWT_ADMIN_TOKEN_NAME", default_value = "token")]
    pub jwt_admin_token_name: String,

    /// Create the `admin` account on startup if it does not exist.
    #[arg(long, env = "SKY_SEED_ADMIN", default_value_t = true, action = clap::ArgAction::Set)]
    pub seed_admin: bool,

    #[arg(long, env = "SKY_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    #[arg(long, env = "SKY_OTLP_TOKEN", hide_env_values = true)]
    pub otlp_token: Option<String>,

    /// `text` or `json`.
    #[arg(long, env = "SKY_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Args {
    pub fn jwt_properties(&self) -> JwtProperties {
        JwtProperties {
            admin_secret_key: self.jwt_admin_secret.clone(),
            admin_ttl: Duration::from_millis(self.jwt_admin_ttl_ms),
            admin_token_name: self.jwt_admin_token_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sky-server"]).unwrap();
        assert_eq!(args.listen_addr, "0.0.0.0:8080");
        assert!(args.seed_admin);
        let jwt = args.jwt_properties();
        assert_eq!(jwt.admin_ttl, Duration::from_secs(7200));
        assert_eq!(jwt.admin_token_name, "token");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "sky-server",
            "--jwt-admin-ttl-ms",
            "1000",
            "--seed-admin",
            "false",
            "--database-url",
            "postgres://localhost/sky",
        ])
        .unwrap();
        assert!(!args.seed_admin);
        assert_eq!(args.database_url.as_deref(), Some("postgres://localhost/sky"));
        assert_eq!(args.jwt_properties().admin_ttl, Duration::from_secs(1));
    }
}
