use std::borrow::Cow;
use std::collections::HashMap;
use std::env::VarError;
use std::time::Duration;

use url::Url;

use crate::errors::{ConfigurationError, Error, ErrorKind};

pub const ENDPOINT_VAR: &str = "FAUNA_ENDPOINT";
pub const SECRET_VAR: &str = "FAUNA_SECRET";
pub const TIMEOUT_VAR: &str = "FAUNA_TIMEOUT";

/// Reads variables from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvVars;

/// A source of environment variables.
///
/// The process environment is read through [`SystemEnvVars`]; maps and
/// slices of pairs can stand in for it, which is mostly useful in tests.
pub trait EnvVar {
    fn read(&self, name: &str) -> Result<Cow<str>, VarError>;
}

impl EnvVar for SystemEnvVars {
    fn read(&self, name: &str) -> Result<Cow<str>, VarError> {
        std::env::var(name).map(Cow::from)
    }
}

impl<K, V> EnvVar for HashMap<K, V>
where
    K: std::hash::Hash + Eq + std::borrow::Borrow<str>,
    V: std::borrow::Borrow<str>,
{
    fn read(&self, name: &str) -> Result<Cow<str>, VarError> {
        self.get(name)
            .map(|value| value.borrow().into())
            .ok_or(VarError::NotPresent)
    }
}

fn find_pair<'a>(pairs: &'a [(&'a str, &'a str)], name: &str)
    -> Result<Cow<'a, str>, VarError>
{
    pairs.iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| Cow::from(*value))
        .ok_or(VarError::NotPresent)
}

impl EnvVar for &[(&str, &str)] {
    fn read(&self, name: &str) -> Result<Cow<str>, VarError> {
        find_pair(self, name)
    }
}

impl<const N: usize> EnvVar for [(&str, &str); N] {
    fn read(&self, name: &str) -> Result<Cow<str>, VarError> {
        find_pair(self, name)
    }
}

impl EnvVar for () {
    fn read(&self, _: &str) -> Result<Cow<str>, VarError> {
        Err(VarError::NotPresent)
    }
}

impl<T: EnvVar> EnvVar for &T {
    fn read(&self, name: &str) -> Result<Cow<str>, VarError> {
        (*self).read(name)
    }
}

/// Reads a variable, treating an unset or empty one as absent.
pub(crate) fn get(env: &impl EnvVar, name: &str)
    -> Result<Option<String>, Error>
{
    match env.read(name) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.into_owned())),
        Err(VarError::NotPresent) => Ok(None),
        Err(e @ VarError::NotUnicode(_)) => {
            Err(ConfigurationError::with_source(e)
                .context(format!("cannot read {}", name)))
        }
    }
}

pub(crate) fn parse_endpoint(name: &str, value: &str) -> Result<Url, Error> {
    let url = Url::parse(value).map_err(|e| {
        ConfigurationError::with_source(e)
            .context(format!("invalid {}: {:?}", name, value))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigurationError::with_message(format!(
            "invalid {}: unsupported scheme {:?}", name, scheme))),
    }
}

pub(crate) fn parse_timeout(name: &str, value: &str)
    -> Result<Duration, Error>
{
    humantime::parse_duration(value).map_err(|e| {
        ConfigurationError::with_source(e)
            .context(format!("invalid {}: {:?}", name, value))
    })
}
