//! Mock API configuration

use std::net::SocketAddr;

use crate::jwt::JwtConfig;

/// Mock API configuration
#[derive(Debug, Clone)]
pub struct MockApiConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Token signing configuration
    pub jwt: JwtConfig,
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            jwt: JwtConfig::default(),
        }
    }
}

impl MockApiConfig {
    /// Create a new MockApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MOCK_API_BIND_ADDR`: Listen address (default: "0.0.0.0:8000")
    /// - plus the `JWT_*` variables read by [`JwtConfig::from_env`]
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("MOCK_API_BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid MOCK_API_BIND_ADDR: {}", e))?;

        Ok(MockApiConfig {
            bind_addr,
            jwt: JwtConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        unsafe {
            std::env::remove_var("MOCK_API_BIND_ADDR");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
        }

        let config = MockApiConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8000)));
        assert_eq!(config.jwt.access_token_expiry, 900);
        assert_eq!(config.jwt.refresh_token_expiry, 604800);
    }

    #[test]
    #[serial]
    fn test_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("MOCK_API_BIND_ADDR", "127.0.0.1:9000");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
        }

        let config = MockApiConfig::from_env().unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9000)));
        assert_eq!(config.jwt.access_token_expiry, 60);

        unsafe {
            std::env::remove_var("MOCK_API_BIND_ADDR");
            std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRY");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_bind_addr_is_an_error() {
        unsafe {
            std::env::set_var("MOCK_API_BIND_ADDR", "not an address");
        }

        assert!(MockApiConfig::from_env().is_err());

        unsafe {
            std::env::remove_var("MOCK_API_BIND_ADDR");
        }
    }
}
