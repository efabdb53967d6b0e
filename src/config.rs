//! The single static identity requests are verified against.

use {
    crate::{constants::*, ConfigError},
    derive_builder::Builder,
    log::debug,
    std::{
        env,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// The access key id and secret access key every request must be signed with, along with the region and service
/// the credential scope must name.
///
/// This is immutable once built; share it between request handlers through an `Arc`.
#[derive(Builder, Clone, Eq, PartialEq)]
pub struct Credentials {
    /// The access key id clients place in the `Credential` parameter.
    #[builder(setter(into))]
    access_key_id: String,

    /// The shared secret used to derive signing keys.
    #[builder(setter(into))]
    secret_access_key: String,

    /// The region the credential scope must name. Defaults to `us-east-1`.
    #[builder(setter(into), default = "DEFAULT_REGION.to_string()")]
    region: String,

    /// The service the credential scope must name. Defaults to `s3`.
    #[builder(setter(into), default = "DEFAULT_SERVICE.to_string()")]
    service: String,
}

impl Credentials {
    /// Create a [`CredentialsBuilder`] to construct a [`Credentials`].
    #[inline(always)]
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::default()
    }

    /// Load the credentials from the process environment.
    ///
    /// `ACCESS_KEY_ID` and `SECRET_ACCESS_KEY` are required. `REGION` and `SERVICE` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load the credentials from an arbitrary variable lookup function. Variables set to an empty string are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let access_key_id = get(ENV_ACCESS_KEY_ID).ok_or(ConfigError::MissingVariable(ENV_ACCESS_KEY_ID))?;
        let secret_access_key =
            get(ENV_SECRET_ACCESS_KEY).ok_or(ConfigError::MissingVariable(ENV_SECRET_ACCESS_KEY))?;
        let region = get(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());
        let service = get(ENV_SERVICE).unwrap_or_else(|| DEFAULT_SERVICE.to_string());

        debug!("Loaded credentials for access key id '{}' in region '{}', service '{}'", access_key_id, region, service);

        Ok(Self {
            access_key_id,
            secret_access_key,
            region,
            service,
        })
    }

    /// Retrieve the access key id.
    #[inline(always)]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Retrieve the secret access key.
    #[inline(always)]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Retrieve the region the credential scope must name.
    #[inline(always)]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the service the credential scope must name.
    #[inline(always)]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"*****")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{ConfigError, Credentials},
        std::collections::HashMap,
    };

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test_log::test]
    fn builder_defaults() {
        let creds = Credentials::builder()
            .access_key_id("admin")
            .secret_access_key("adminsecretkey12345678")
            .build()
            .unwrap();
        assert_eq!(creds.access_key_id(), "admin");
        assert_eq!(creds.secret_access_key(), "adminsecretkey12345678");
        assert_eq!(creds.region(), "us-east-1");
        assert_eq!(creds.service(), "s3");

        let e = Credentials::builder().access_key_id("admin").build().unwrap_err();
        assert!(e.to_string().contains("secret_access_key"));
    }

    #[test_log::test]
    fn debug_is_redacted() {
        let creds = Credentials::builder()
            .access_key_id("admin")
            .secret_access_key("adminsecretkey12345678")
            .region("eu-west-3")
            .build()
            .unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("adminsecretkey12345678"));
        assert!(debug.contains("admin"));
        assert!(debug.contains("eu-west-3"));
    }

    #[test_log::test]
    fn from_lookup() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("ACCESS_KEY_ID", "admin"),
            ("SECRET_ACCESS_KEY", "adminsecretkey12345678"),
        ]))
        .unwrap();
        assert_eq!(creds.region(), "us-east-1");
        assert_eq!(creds.service(), "s3");

        let creds = Credentials::from_lookup(lookup_from(&[
            ("ACCESS_KEY_ID", "admin"),
            ("SECRET_ACCESS_KEY", "adminsecretkey12345678"),
            ("REGION", "eu-west-3"),
            ("SERVICE", "storage"),
        ]))
        .unwrap();
        assert_eq!(creds.region(), "eu-west-3");
        assert_eq!(creds.service(), "storage");

        // Empty values count as unset.
        let creds = Credentials::from_lookup(lookup_from(&[
            ("ACCESS_KEY_ID", "admin"),
            ("SECRET_ACCESS_KEY", "adminsecretkey12345678"),
            ("REGION", ""),
        ]))
        .unwrap();
        assert_eq!(creds.region(), "us-east-1");
    }

    #[test_log::test]
    fn from_lookup_missing() {
        assert_eq!(
            Credentials::from_lookup(lookup_from(&[("SECRET_ACCESS_KEY", "x")])).unwrap_err(),
            ConfigError::MissingVariable("ACCESS_KEY_ID")
        );

        let e = Credentials::from_lookup(lookup_from(&[("ACCESS_KEY_ID", "admin"), ("SECRET_ACCESS_KEY", "")]))
            .unwrap_err();
        assert_eq!(e, ConfigError::MissingVariable("SECRET_ACCESS_KEY"));
        assert_eq!(e.to_string(), "Required configuration variable SECRET_ACCESS_KEY is not set");
    }
}
