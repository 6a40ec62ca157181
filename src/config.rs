use anyhow::{Context, Result};
use std::env;

/// Default production control-plane endpoint.
pub const DEFAULT_API_URL: &str = "https://api.tracekit.io";

/// Default directory scanned for build artifacts.
pub const DEFAULT_DIST_DIR: &str = "./dist";

/// Configuration for artifact upload operations
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub app_id: String,
    pub release: String,
    pub dist_dir: String,
    pub api_url: String,
}

impl Config {
    /// Load configuration from environment variables and .env file
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if it exists

        let api_key = env::var("TRACEKIT_API_KEY")
            .context("TRACEKIT_API_KEY not found in environment. Please set it in .env file")?;
        Self::validate_api_key(&api_key)?;

        let app_id = env::var("TRACEKIT_APP_ID")
            .context("TRACEKIT_APP_ID not found in environment. Please set it in .env file")?;
        Self::validate_app_id(&app_id)?;

        // Release defaults to the CI build version, then "dev" for local runs
        let release = env::var("TRACEKIT_RELEASE")
            .or_else(|_| env::var("BUILD_VERSION"))
            .unwrap_or_else(|_| "dev".to_string());
        Self::validate_release(&release)?;

        let dist_dir =
            env::var("TRACEKIT_DIST_DIR").unwrap_or_else(|_| DEFAULT_DIST_DIR.to_string());

        let api_url = env::var("TRACEKIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = Self::validate_api_url(&api_url)?;

        Ok(Self {
            api_key,
            app_id,
            release,
            dist_dir,
            api_url,
        })
    }

    /// Validate the API key format
    fn validate_api_key(api_key: &str) -> Result<()> {
        if api_key.trim().is_empty() {
            anyhow::bail!("TRACEKIT_API_KEY cannot be empty");
        }

        if api_key.chars().any(char::is_whitespace) {
            anyhow::bail!("TRACEKIT_API_KEY must not contain whitespace");
        }

        Ok(())
    }

    /// Validate the app identifier
    fn validate_app_id(app_id: &str) -> Result<()> {
        if app_id.is_empty() {
            anyhow::bail!("TRACEKIT_APP_ID cannot be empty");
        }

        // App ids are URL path segments; keep them to a safe charset
        for c in app_id.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                anyhow::bail!(
                    "TRACEKIT_APP_ID '{}' contains invalid character '{}'. Only letters, numbers, hyphens, and underscores are allowed",
                    app_id,
                    c
                );
            }
        }

        Ok(())
    }

    /// Validate the release label
    fn validate_release(release: &str) -> Result<()> {
        if release.trim().is_empty() {
            anyhow::bail!("Release label cannot be empty");
        }

        if release.contains('/') {
            anyhow::bail!(
                "Release label '{}' must not contain '/' (it is sent as a plain identifier)",
                release
            );
        }

        Ok(())
    }

    /// Validate the API base URL and strip any trailing slash
    fn validate_api_url(api_url: &str) -> Result<String> {
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!(
                "TRACEKIT_API_URL '{}' must start with http:// or https://",
                api_url
            );
        }

        Ok(api_url.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_validation() {
        // Valid keys
        assert!(Config::validate_api_key("tk_live_0123456789abcdef").is_ok());
        assert!(Config::validate_api_key("anything-without-spaces").is_ok());

        // Invalid keys
        assert!(Config::validate_api_key("").is_err()); // Empty
        assert!(Config::validate_api_key("   ").is_err()); // Blank
        assert!(Config::validate_api_key("tk live key").is_err()); // Whitespace
    }

    #[test]
    fn test_app_id_validation() {
        // Valid app ids
        assert!(Config::validate_app_id("my-app").is_ok());
        assert!(Config::validate_app_id("app_42").is_ok());
        assert!(Config::validate_app_id("A1").is_ok());

        // Invalid app ids
        assert!(Config::validate_app_id("").is_err()); // Empty
        assert!(Config::validate_app_id("my app").is_err()); // Space
        assert!(Config::validate_app_id("my/app").is_err()); // Path separator
        assert!(Config::validate_app_id("app!").is_err()); // Punctuation
    }

    #[test]
    fn test_release_validation() {
        // Valid releases
        assert!(Config::validate_release("dev").is_ok());
        assert!(Config::validate_release("1.4.2").is_ok());
        assert!(Config::validate_release("2024-10-01+build.7").is_ok());

        // Invalid releases
        assert!(Config::validate_release("").is_err()); // Empty
        assert!(Config::validate_release("  ").is_err()); // Blank
        assert!(Config::validate_release("release/1.0").is_err()); // Slash
    }

    #[test]
    fn test_api_url_validation() {
        // Valid URLs, trailing slash stripped
        assert_eq!(
            Config::validate_api_url("https://api.tracekit.io").unwrap(),
            "https://api.tracekit.io"
        );
        assert_eq!(
            Config::validate_api_url("https://api.tracekit.io/").unwrap(),
            "https://api.tracekit.io"
        );
        assert_eq!(
            Config::validate_api_url("http://localhost:8080/").unwrap(),
            "http://localhost:8080"
        );

        // Invalid URLs
        assert!(Config::validate_api_url("api.tracekit.io").is_err()); // No scheme
        assert!(Config::validate_api_url("ftp://api.tracekit.io").is_err()); // Wrong scheme
    }
}
