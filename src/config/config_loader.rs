use anyhow::{Context, Result};
use uuid::Uuid;

use super::config_model::{Database, DotEnvyConfig, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    let free_plan_id = match std::env::var("FREE_PLAN_ID") {
        Ok(raw) => Uuid::parse_str(&raw).context("FREE_PLAN_ID is invalid")?,
        Err(_) => Uuid::nil(),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        free_plan_id,
    })
}
