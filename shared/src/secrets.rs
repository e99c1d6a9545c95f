//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::{Error, ProxyConfig, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Upstream API key stored as JSON in Secrets Manager.
#[derive(Debug, Deserialize)]
struct ApiKeySecret {
    #[serde(alias = "apiKey", alias = "TICKETMASTER_API_KEY")]
    api_key: String,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    // Check cache first
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Secret strings are either the bare key or a JSON object carrying it.
pub fn parse_api_key(secret_string: &str) -> Option<String> {
    let trimmed = secret_string.trim();
    let key = if trimmed.starts_with('{') {
        serde_json::from_str::<ApiKeySecret>(trimmed).ok()?.api_key
    } else {
        trimmed.to_string()
    };
    Some(key).filter(|k| !k.is_empty())
}

/// Resolve the upstream API key: the environment first, then Secrets Manager.
///
/// Returns `Ok(None)` when neither is configured.
pub async fn resolve_api_key(config: &ProxyConfig) -> Result<Option<String>> {
    if let Some(key) = &config.api_key {
        return Ok(Some(key.clone()));
    }
    let Some(secret_arn) = &config.api_key_secret_arn else {
        return Ok(None);
    };

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = SecretsClient::new(&aws_config);
    let secret_string = get_secret(&client, secret_arn).await?;
    Ok(parse_api_key(&secret_string))
}
