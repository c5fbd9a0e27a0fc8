//! Delivery configuration and the sources it is read from.
//!
//! Configuration is looked up by key once, when the mailer is built, and
//! then carried as an immutable [`DeliveryConfig`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::transport::{DraftParams, SmtpParams};
use crate::{Error, Result};

/// Configuration keys understood by [`DeliveryConfig::from_source`].
pub mod keys {
    /// Primary attachment search root.
    pub const INPUT_ROOT_DIR: &str = "RESOURCES_INPUT_ROOT_DIR";
    /// Fallback attachment search root.
    pub const OUTPUT_ROOT_DIR: &str = "RESOURCES_OUTPUT_ROOT_DIR";
    /// Sender address, also the login name for both protocols.
    pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
    /// Sender password.
    pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
    /// Text appended to every body.
    pub const EMAIL_SIGNATURE: &str = "EMAIL_SIGNATURE";
    /// Forces draft delivery when truthy.
    pub const EMAIL_DRAFT_MODE: &str = "EMAIL_DRAFT_MODE";
    /// IMAP folder receiving drafts.
    pub const EMAIL_DRAFT_FOLDER: &str = "EMAIL_DRAFT_FOLDER";
    /// IMAP server, `host` or `host:port`.
    pub const EMAIL_IMAP_SERVER: &str = "EMAIL_IMAP_SERVER";
    /// SMTP host.
    pub const EMAIL_SMTP_HOST: &str = "EMAIL_SMTP_HOST";
    /// SMTP port.
    pub const EMAIL_SMTP_PORT: &str = "EMAIL_SMTP_PORT";

    /// Every key, in the order they are documented.
    pub const ALL: &[&str] = &[
        INPUT_ROOT_DIR,
        OUTPUT_ROOT_DIR,
        EMAIL_ADDRESS,
        EMAIL_PASSWORD,
        EMAIL_SIGNATURE,
        EMAIL_DRAFT_MODE,
        EMAIL_DRAFT_FOLDER,
        EMAIL_IMAP_SERVER,
        EMAIL_SMTP_HOST,
        EMAIL_SMTP_PORT,
    ];
}

/// Recipient that always goes to drafts instead of being sent.
pub const PLACEHOLDER_RECIPIENT: &str = "example@example.com";

/// Draft folder used when none is configured.
pub const DEFAULT_DRAFT_FOLDER: &str = "Drafts";

/// SMTP submission port used when none is configured.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Key/value lookup the configuration is read from.
pub trait ConfigSource {
    /// Returns the value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Reads keys from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory key/value source, also loadable from a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Parses a flat JSON object. Strings are taken as-is, numbers and
    /// booleans are converted to text, and nulls are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not an object of
    /// scalar values.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let Value::Object(object) = serde_json::from_str::<Value>(text)? else {
            return Err(Error::Config("configuration must be a JSON object".to_string()));
        };

        let mut source = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => source.insert(key, s),
                Value::Bool(b) => source.insert(key, b.to_string()),
                Value::Number(n) => source.insert(key, n.to_string()),
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::Config(format!("value for {key} must be a scalar")));
                }
            }
        }
        Ok(source)
    }

    /// Loads a flat JSON object from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Two sources where the first one wins and the second fills gaps.
///
/// A blank value in the first source counts as a gap.
#[derive(Debug, Clone, Default)]
pub struct Layered<A, B>(pub A, pub B);

impl<A: ConfigSource, B: ConfigSource> ConfigSource for Layered<A, B> {
    fn get(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.1.get(key))
    }
}

/// Everything a delivery needs, read once from a [`ConfigSource`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// Primary attachment search root.
    pub input_root: Option<PathBuf>,
    /// Fallback attachment search root.
    pub output_root: Option<PathBuf>,
    /// Sender address; also the login name.
    pub email_address: String,
    /// Sender password.
    pub email_password: String,
    /// Text appended to every body, if non-empty.
    pub signature: Option<String>,
    /// Save every message as a draft instead of sending it.
    pub draft_mode: bool,
    /// IMAP folder receiving drafts.
    pub draft_folder: String,
    /// IMAP server, `host` or `host:port`.
    pub imap_server: Option<String>,
    /// SMTP host.
    pub smtp_host: Option<String>,
    /// SMTP port as configured; parsed at delivery time.
    pub smtp_port: Option<String>,
}

impl DeliveryConfig {
    /// Reads every key from `source`.
    ///
    /// Blank values count as unset, except for the address and password,
    /// which are kept so delivery can reject them with a precise message.
    #[must_use]
    pub fn from_source(source: &impl ConfigSource) -> Self {
        let get = |key: &str| source.get(key).filter(|v| !v.trim().is_empty());

        Self {
            input_root: get(keys::INPUT_ROOT_DIR).map(PathBuf::from),
            output_root: get(keys::OUTPUT_ROOT_DIR).map(PathBuf::from),
            email_address: source.get(keys::EMAIL_ADDRESS).unwrap_or_default(),
            email_password: source.get(keys::EMAIL_PASSWORD).unwrap_or_default(),
            signature: source.get(keys::EMAIL_SIGNATURE).filter(|s| !s.is_empty()),
            draft_mode: get(keys::EMAIL_DRAFT_MODE).is_some_and(|v| parse_flag(&v)),
            draft_folder: get(keys::EMAIL_DRAFT_FOLDER)
                .map_or_else(|| DEFAULT_DRAFT_FOLDER.to_string(), |f| f.trim().to_string()),
            imap_server: get(keys::EMAIL_IMAP_SERVER).map(|s| s.trim().to_string()),
            smtp_host: get(keys::EMAIL_SMTP_HOST).map(|s| s.trim().to_string()),
            smtp_port: get(keys::EMAIL_SMTP_PORT).map(|s| s.trim().to_string()),
        }
    }

    /// Checks the sender credentials, address first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAddress`] or [`Error::MissingPassword`] when
    /// the value is empty or whitespace only.
    pub fn check_credentials(&self) -> Result<()> {
        if self.email_address.trim().is_empty() {
            return Err(Error::MissingAddress);
        }
        if self.email_password.trim().is_empty() {
            return Err(Error::MissingPassword);
        }
        Ok(())
    }

    /// Returns true if a message to `to` should be saved as a draft.
    #[must_use]
    pub fn wants_draft(&self, to: &str) -> bool {
        to == PLACEHOLDER_RECIPIENT || self.draft_mode
    }

    /// Parses the SMTP port, defaulting to 587.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the port is not a number in range.
    pub fn smtp_port(&self) -> Result<u16> {
        match self.smtp_port.as_deref() {
            None => Ok(DEFAULT_SMTP_PORT),
            Some(port) => match port.parse::<u16>() {
                Ok(0) | Err(_) => Err(Error::Config(format!(
                    "{} is not a valid port: {port}",
                    keys::EMAIL_SMTP_PORT
                ))),
                Ok(port) => Ok(port),
            },
        }
    }

    /// Connection parameters for SMTP submission.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the host is unset or the port is
    /// invalid.
    pub fn smtp_params(&self) -> Result<SmtpParams> {
        let host = self
            .smtp_host
            .clone()
            .ok_or_else(|| Error::Config(format!("{} is not set", keys::EMAIL_SMTP_HOST)))?;
        Ok(SmtpParams {
            host,
            port: self.smtp_port()?,
            username: self.email_address.clone(),
            password: self.email_password.clone(),
        })
    }

    /// Connection parameters for draft delivery.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the IMAP server is unset.
    pub fn draft_params(&self) -> Result<DraftParams> {
        let server = self
            .imap_server
            .clone()
            .ok_or_else(|| Error::Config(format!("{} is not set", keys::EMAIL_IMAP_SERVER)))?;
        Ok(DraftParams {
            server,
            username: self.email_address.clone(),
            password: self.email_password.clone(),
            folder: self.draft_folder.clone(),
        })
    }
}

impl fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("input_root", &self.input_root)
            .field("output_root", &self.output_root)
            .field("email_address", &self.email_address)
            .field("email_password", &"[redacted]")
            .field("signature", &self.signature)
            .field("draft_mode", &self.draft_mode)
            .field("draft_folder", &self.draft_folder)
            .field("imap_server", &self.imap_server)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

/// Interprets a boolean flag: `true`, `1`, `yes`, `on` in any case.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn full() -> MapSource {
        MapSource::new()
            .with(keys::EMAIL_ADDRESS, "me@example.com")
            .with(keys::EMAIL_PASSWORD, "app-password")
            .with(keys::EMAIL_SMTP_HOST, "smtp.example.com")
            .with(keys::EMAIL_IMAP_SERVER, "imap.example.com")
    }

    #[test]
    fn defaults() {
        let config = DeliveryConfig::from_source(&full());
        assert_eq!(config.draft_folder, "Drafts");
        assert!(!config.draft_mode);
        assert_eq!(config.smtp_port().unwrap(), 587);
        assert!(config.signature.is_none());
        assert!(config.input_root.is_none());
    }

    #[test]
    fn draft_mode_flag() {
        for (value, expected) in [
            ("true", true),
            ("TRUE", true),
            ("1", true),
            ("yes", true),
            ("On", true),
            ("false", false),
            ("0", false),
            ("", false),
            ("maybe", false),
        ] {
            let config = DeliveryConfig::from_source(&full().with(keys::EMAIL_DRAFT_MODE, value));
            assert_eq!(config.draft_mode, expected, "{value:?}");
        }
    }

    #[test]
    fn draft_decision() {
        let config = DeliveryConfig::from_source(&full());
        assert!(config.wants_draft("example@example.com"));
        assert!(!config.wants_draft("friend@example.org"));

        let config = DeliveryConfig::from_source(&full().with(keys::EMAIL_DRAFT_MODE, "true"));
        assert!(config.wants_draft("friend@example.org"));
    }

    #[test]
    fn credentials_checked_address_first() {
        let config = DeliveryConfig::from_source(
            &MapSource::new()
                .with(keys::EMAIL_ADDRESS, "   ")
                .with(keys::EMAIL_PASSWORD, ""),
        );
        assert!(matches!(config.check_credentials(), Err(Error::MissingAddress)));

        let config = DeliveryConfig::from_source(
            &MapSource::new()
                .with(keys::EMAIL_ADDRESS, "me@example.com")
                .with(keys::EMAIL_PASSWORD, "\t "),
        );
        assert!(matches!(config.check_credentials(), Err(Error::MissingPassword)));

        assert!(DeliveryConfig::from_source(&full()).check_credentials().is_ok());
    }

    #[test]
    fn bad_port_is_config_error() {
        let config = DeliveryConfig::from_source(&full().with(keys::EMAIL_SMTP_PORT, "smtp"));
        assert!(matches!(config.smtp_params(), Err(Error::Config(_))));

        let config = DeliveryConfig::from_source(&full().with(keys::EMAIL_SMTP_PORT, " 2525 "));
        assert_eq!(config.smtp_params().unwrap().port, 2525);
    }

    #[test]
    fn missing_hosts_are_config_errors() {
        let config = DeliveryConfig::from_source(
            &MapSource::new()
                .with(keys::EMAIL_ADDRESS, "me@example.com")
                .with(keys::EMAIL_PASSWORD, "pw"),
        );
        assert!(matches!(config.smtp_params(), Err(Error::Config(_))));
        assert!(matches!(config.draft_params(), Err(Error::Config(_))));
    }

    #[test]
    fn json_source() {
        let source = MapSource::from_json_str(
            r#"{"EMAIL_ADDRESS": "me@example.com", "EMAIL_SMTP_PORT": 465, "EMAIL_DRAFT_MODE": true, "EMAIL_SIGNATURE": null}"#,
        )
        .unwrap();
        assert_eq!(source.get(keys::EMAIL_SMTP_PORT).as_deref(), Some("465"));
        assert_eq!(source.get(keys::EMAIL_DRAFT_MODE).as_deref(), Some("true"));
        assert_eq!(source.get(keys::EMAIL_SIGNATURE), None);

        assert!(MapSource::from_json_str("[1, 2]").is_err());
        assert!(MapSource::from_json_str(r#"{"A": [1]}"#).is_err());
        assert!(matches!(MapSource::from_json_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn layered_prefers_first() {
        let primary = MapSource::new().with(keys::EMAIL_ADDRESS, "env@example.com");
        let secondary = MapSource::new()
            .with(keys::EMAIL_ADDRESS, "file@example.com")
            .with(keys::EMAIL_PASSWORD, "from-file");
        let layered = Layered(primary, secondary);
        assert_eq!(layered.get(keys::EMAIL_ADDRESS).as_deref(), Some("env@example.com"));
        assert_eq!(layered.get(keys::EMAIL_PASSWORD).as_deref(), Some("from-file"));
    }

    #[test]
    fn blank_first_layer_falls_through() {
        let env = MapSource::new()
            .with(keys::EMAIL_ADDRESS, "")
            .with(keys::EMAIL_PASSWORD, "  ");
        let file = MapSource::new()
            .with(keys::EMAIL_ADDRESS, "file@example.com")
            .with(keys::EMAIL_PASSWORD, "from-file");
        let config = DeliveryConfig::from_source(&Layered(env, file));
        assert_eq!(config.email_address, "file@example.com");
        assert_eq!(config.email_password, "from-file");
        assert!(config.check_credentials().is_ok());

        let config = DeliveryConfig::from_source(&Layered(
            MapSource::new().with(keys::EMAIL_ADDRESS, " "),
            MapSource::new(),
        ));
        assert!(matches!(config.check_credentials(), Err(Error::MissingAddress)));
    }

    #[test]
    fn debug_redacts_password() {
        let config = DeliveryConfig::from_source(&full());
        let debug = format!("{config:?}");
        assert!(!debug.contains("app-password"));
        assert!(debug.contains("[redacted]"));
    }
}
