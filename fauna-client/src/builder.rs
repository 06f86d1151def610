use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::env::{self, EnvVar, SystemEnvVars};
use crate::errors::{ConfigurationError, Error, ErrorKind};

pub const DEFAULT_ENDPOINT: &str = "https://db.fauna.com/";

/// A builder used to create clients.
#[derive(Clone, Default)]
pub struct Builder {
    endpoint: Option<Url>,
    secret: Option<String>,
    timeout: Option<Duration>,
}

/// Configuration of the client
///
/// Use [`Builder`][] to create an instance
#[derive(Clone)]
pub struct Config(pub(crate) Arc<ConfigInner>);

pub(crate) struct ConfigInner {
    endpoint: Url,
    secret: Arc<str>,
    timeout: Option<Duration>,
}

impl Builder {
    /// Create an empty builder.
    ///
    /// Nothing is read from the environment, use
    /// [`from_env`](Builder::from_env) for that.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Create a builder initialized from environment variables.
    ///
    /// See [`read_env`](Builder::read_env) for the variables used.
    pub fn from_env() -> Result<Builder, Error> {
        let mut builder = Builder::new();
        builder.read_env(&SystemEnvVars)?;
        Ok(builder)
    }

    /// Read `FAUNA_ENDPOINT`, `FAUNA_SECRET` and `FAUNA_TIMEOUT`.
    ///
    /// Variables that are set override the values configured so far. The
    /// timeout is a human-readable duration such as `30s` or `1m 30s`.
    pub fn read_env(&mut self, vars: &impl EnvVar) -> Result<&mut Self, Error> {
        if let Some(endpoint) = env::get(vars, env::ENDPOINT_VAR)? {
            self.endpoint = Some(
                env::parse_endpoint(env::ENDPOINT_VAR, &endpoint)?);
        }
        if let Some(secret) = env::get(vars, env::SECRET_VAR)? {
            self.secret = Some(secret);
        }
        if let Some(timeout) = env::get(vars, env::TIMEOUT_VAR)? {
            self.timeout = Some(
                env::parse_timeout(env::TIMEOUT_VAR, &timeout)?);
        }
        Ok(self)
    }

    /// Set the URL queries are sent to.
    pub fn endpoint(&mut self, endpoint: &str) -> Result<&mut Self, Error> {
        self.endpoint = Some(env::parse_endpoint("endpoint", endpoint)?);
        Ok(self)
    }

    /// Set the secret (key or token) used to authenticate.
    pub fn secret(&mut self, secret: impl Into<String>) -> &mut Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set the time limit for a single request, including reading the
    /// response.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build client configuration object
    pub fn build(&self) -> Result<Config, Error> {
        let secret = match &self.secret {
            Some(secret) => Arc::from(secret.as_str()),
            None => {
                return Err(ConfigurationError::with_message(format!(
                    "no secret configured, set {} or use Builder::secret",
                    env::SECRET_VAR)));
            }
        };
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => env::parse_endpoint("endpoint", DEFAULT_ENDPOINT)?,
        };
        Ok(Config(Arc::new(ConfigInner {
            endpoint,
            secret,
            timeout: self.timeout,
        })))
    }
}

impl Config {
    pub fn endpoint(&self) -> &Url {
        &self.0.endpoint
    }

    pub fn secret(&self) -> &str {
        &self.0.secret
    }

    pub(crate) fn shared_secret(&self) -> Arc<str> {
        self.0.secret.clone()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.0.timeout
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Builder")
            .field("endpoint", &self.endpoint)
            .field("secret", &self.secret.as_ref().map(|_| "<hidden>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.0.endpoint.as_str())
            .field("timeout", &self.0.timeout)
            .finish_non_exhaustive()
    }
}

#[test]
fn defaults() {
    let config = Builder::new().secret("s3cr3t").build().unwrap();
    assert_eq!(config.endpoint().as_str(), DEFAULT_ENDPOINT);
    assert_eq!(config.secret(), "s3cr3t");
    assert_eq!(config.timeout(), None);
    assert!(!format!("{:?}", config).contains("s3cr3t"));
}

#[test]
fn missing_secret() {
    let err = Builder::new().build().unwrap_err();
    assert!(err.is::<ConfigurationError>());
    assert!(err.to_string().contains("FAUNA_SECRET"));
}

#[test]
fn read_env() {
    let vars = [
        ("FAUNA_ENDPOINT", "http://localhost:8443/"),
        ("FAUNA_SECRET", "from-env"),
        ("FAUNA_TIMEOUT", "2s 500ms"),
    ];
    let mut builder = Builder::new();
    builder.secret("explicit");
    let config = builder.read_env(&vars).unwrap().build().unwrap();
    assert_eq!(config.endpoint().as_str(), "http://localhost:8443/");
    assert_eq!(config.secret(), "from-env");
    assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
}

#[test]
fn bad_env() {
    let err = Builder::new()
        .read_env(&[("FAUNA_TIMEOUT", "eventually")])
        .unwrap_err();
    assert!(err.is::<ConfigurationError>());

    let err = Builder::new()
        .read_env(&[("FAUNA_ENDPOINT", "not a url")])
        .unwrap_err();
    assert!(err.is::<ConfigurationError>());
    assert!(format!("{:#}", err).contains("FAUNA_ENDPOINT"));
}
