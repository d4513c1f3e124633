use std::env;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    /// Path prefix stripped before routing, e.g. `/api`. Empty means no prefix.
    pub api_prefix: String,
    pub jwt_secret: String,
    pub frontend_origin: String,
    /// Artificial delay awaited by every handler before it touches data.
    pub latency: Duration,
    pub upload_latency: Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            api_prefix: normalize_prefix(
                &env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            ),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            latency: Duration::from_millis(parse_or("MOCK_LATENCY_MS", 300)),
            upload_latency: Duration::from_millis(parse_or("MOCK_UPLOAD_LATENCY_MS", 1000)),
            bcrypt_cost: parse_or("BCRYPT_COST", 4),
        }
    }

    /// Zero latency and the cheapest bcrypt cost.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            api_prefix: "/api".to_string(),
            jwt_secret: "test-secret".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            latency: Duration::ZERO,
            upload_latency: Duration::ZERO,
            bcrypt_cost: 4,
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Leading slash, no trailing slash; `/` and blank collapse to no prefix.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_prefix("/api"), "/api");
        assert_eq!(normalize_prefix("api/"), "/api");
        assert_eq!(normalize_prefix(" /v1/api/ "), "/v1/api");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }

    #[test]
    fn unset_numeric_falls_back_to_default() {
        assert_eq!(parse_or("TASKDESK_TEST_UNSET_LATENCY", 300u64), 300);
    }
}
