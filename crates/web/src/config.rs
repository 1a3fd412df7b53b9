use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use awards_storage::WorkflowConfig;
use awards_storage::config::parse_role_list;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_keys: String,
    pub workflow: WorkflowConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: match std::env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(value) => value
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a number")?,
                Err(_) => 10,
            },
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            workflow: workflow_config(|name| std::env::var(name).ok())?,
        })
    }
}

/// Build the workflow policy from variables, falling back to the defaults for absent ones
pub fn workflow_config(var: impl Fn(&str) -> Option<String>) -> Result<WorkflowConfig> {
    let mut config = WorkflowConfig::default();

    if let Some(value) = var("CRITERIA_WEIGHT_CEILING") {
        let ceiling = Decimal::from_str(value.trim())
            .context("CRITERIA_WEIGHT_CEILING must be a decimal number")?;
        if ceiling <= Decimal::ZERO {
            return Err(anyhow!("CRITERIA_WEIGHT_CEILING must be positive"));
        }
        config = config.with_weight_ceiling(ceiling);
    }

    if let Some(value) = var("SUBMITTER_ROLES") {
        config.submitter_roles = parse_role_list(&value)
            .map_err(anyhow::Error::msg)
            .context("Invalid SUBMITTER_ROLES")?;
    }

    if let Some(value) = var("APPROVER_ROLES") {
        config.approver_roles = parse_role_list(&value)
            .map_err(anyhow::Error::msg)
            .context("Invalid APPROVER_ROLES")?;
    }

    if let Some(value) = var("OVERRIDE_ROLES") {
        config.override_roles = parse_role_list(&value)
            .map_err(anyhow::Error::msg)
            .context("Invalid OVERRIDE_ROLES")?;
    }

    Ok(config)
}
