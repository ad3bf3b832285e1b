//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;

/// Presigned upload URLs are valid for one minute
const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u64 = 60;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment (Cloudflare R2)
    Production,
    /// Staging environment (Cloudflare R2)
    Staging,
    /// Development environment (uses `LocalStack`)
    Development {
        /// Optional override for presigned URL expiry in seconds
        presign_expiry_override: Option<u64>,
    },
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => {
                let presign_expiry_override = env::var("PRESIGNED_URL_EXPIRY_SECS")
                    .ok()
                    .and_then(|val| val.parse::<u64>().ok());

                Self::Development {
                    presign_expiry_override,
                }
            }
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the bucket name images are stored in
    ///
    /// # Panics
    ///
    /// Panics if the `R2_BUCKET_NAME` environment variable is not set outside development
    #[must_use]
    pub fn bucket_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("R2_BUCKET_NAME").expect("R2_BUCKET_NAME environment variable is not set")
            }
            Self::Development { .. } => {
                env::var("R2_BUCKET_NAME").unwrap_or_else(|_| "podu-images".to_string())
            }
        }
    }

    /// Base URL the uploaded images are publicly served from, without a trailing slash
    #[must_use]
    pub fn public_base_url(&self) -> String {
        env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Location of the static FOSS tools catalog
    #[must_use]
    pub fn foss_tools_path(&self) -> PathBuf {
        env::var("FOSS_TOOLS_PATH")
            .map_or_else(|_| PathBuf::from("data/foss-tools.json"), PathBuf::from)
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the S3-compatible endpoint the storage client talks to
    ///
    /// # Panics
    ///
    /// Panics if the `R2_ACCOUNT_ID` environment variable is not set outside development
    #[must_use]
    pub fn storage_endpoint_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                let account_id = env::var("R2_ACCOUNT_ID")
                    .expect("R2_ACCOUNT_ID environment variable is not set");
                format!("https://{account_id}.r2.cloudflarestorage.com")
            }
            // LocalStack endpoint for development
            Self::Development { .. } => "http://localhost:4566".to_string(),
        }
    }

    /// Static R2 credentials, if configured
    ///
    /// # Panics
    ///
    /// Panics if the R2 key pair is not set outside development
    #[must_use]
    pub fn storage_credentials(&self) -> Option<Credentials> {
        let access_key_id = env::var("R2_ACCESS_KEY_ID").ok();
        let secret_access_key = env::var("R2_SECRET_ACCESS_KEY").ok();

        match (self, access_key_id, secret_access_key) {
            (_, Some(access_key_id), Some(secret_access_key)) => Some(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "podu-r2",
            )),
            (Self::Production | Self::Staging, _, _) => {
                panic!("R2_ACCESS_KEY_ID and R2_SECRET_ACCESS_KEY environment variables must be set")
            }
            // Development falls back to the default credential chain
            (Self::Development { .. }, _, _) => None,
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .endpoint_url(self.storage_endpoint_url());

        // R2 ignores the region but the signer requires one
        if matches!(self, Self::Production | Self::Staging) {
            config_builder = config_builder.region(Region::from_static("auto"));
        }

        config_builder.build()
    }

    /// S3 service configuration for the image bucket
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        if let Some(credentials) = self.storage_credentials() {
            builder = builder.credentials_provider(credentials);
        }

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Presigned URL expiry time in seconds
    #[must_use]
    pub fn presigned_url_expiry_secs(&self) -> u64 {
        match self {
            Self::Production | Self::Staging => DEFAULT_PRESIGNED_URL_EXPIRY_SECS,
            Self::Development {
                presign_expiry_override,
            } => presign_expiry_override.unwrap_or(DEFAULT_PRESIGNED_URL_EXPIRY_SECS),
        }
    }

    /// TCP port the HTTP server listens on
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but not a valid port number
    pub fn port() -> Result<u16, std::num::ParseIntError> {
        env::var("PORT").map_or(Ok(3000), |p| p.parse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        env::remove_var("APP_ENV");
        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                presign_expiry_override: None
            }
        );

        env::set_var("APP_ENV", " Staging ");
        assert_eq!(Environment::from_env(), Environment::Staging);

        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    #[serial]
    fn test_presigned_url_expiry_secs() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.presigned_url_expiry_secs(), 60);

        let env = Environment::Development {
            presign_expiry_override: Some(5),
        };
        assert_eq!(env.presigned_url_expiry_secs(), 5);

        assert_eq!(Environment::Production.presigned_url_expiry_secs(), 60);
        assert_eq!(Environment::Staging.presigned_url_expiry_secs(), 60);
    }

    #[test]
    #[serial]
    fn test_development_with_env_override() {
        env::set_var("APP_ENV", "development");
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "120");
        assert_eq!(Environment::from_env().presigned_url_expiry_secs(), 120);

        // Invalid values fall back to the default
        env::set_var("PRESIGNED_URL_EXPIRY_SECS", "invalid");
        assert_eq!(Environment::from_env().presigned_url_expiry_secs(), 60);

        env::remove_var("PRESIGNED_URL_EXPIRY_SECS");
        env::remove_var("APP_ENV");
    }

    #[test]
    #[serial]
    fn test_public_base_url_trims_trailing_slash() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };

        env::remove_var("PUBLIC_BASE_URL");
        assert_eq!(env.public_base_url(), "http://localhost:3000");

        env::set_var("PUBLIC_BASE_URL", "https://podu.pics/");
        assert_eq!(env.public_base_url(), "https://podu.pics");

        env::remove_var("PUBLIC_BASE_URL");
    }

    #[test]
    #[serial]
    fn test_storage_endpoint_url() {
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert_eq!(env.storage_endpoint_url(), "http://localhost:4566");

        env::set_var("R2_ACCOUNT_ID", "abc123");
        assert_eq!(
            Environment::Production.storage_endpoint_url(),
            "https://abc123.r2.cloudflarestorage.com"
        );
        env::remove_var("R2_ACCOUNT_ID");
    }

    #[test]
    #[serial]
    fn test_development_credentials_are_optional() {
        env::remove_var("R2_ACCESS_KEY_ID");
        env::remove_var("R2_SECRET_ACCESS_KEY");
        let env = Environment::Development {
            presign_expiry_override: None,
        };
        assert!(env.storage_credentials().is_none());

        env::set_var("R2_ACCESS_KEY_ID", "key");
        env::set_var("R2_SECRET_ACCESS_KEY", "secret");
        assert!(env.storage_credentials().is_some());

        env::remove_var("R2_ACCESS_KEY_ID");
        env::remove_var("R2_SECRET_ACCESS_KEY");
    }
}
