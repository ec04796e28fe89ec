//! Conversions from external infrastructure errors into domain errors.

use predcache_domain::PredCacheError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PredCacheError);

impl From<InfraError> for PredCacheError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PredCacheError> for InfraError {
    fn from(value: PredCacheError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPredCacheError {
    fn into_predcache(self) -> PredCacheError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PredCacheError */
/* -------------------------------------------------------------------------- */

impl IntoPredCacheError for HttpError {
    fn into_predcache(self) -> PredCacheError {
        if self.is_timeout() {
            return PredCacheError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return PredCacheError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => PredCacheError::NotFound(message),
                429 | 500..=599 => PredCacheError::Network(message),
                _ => PredCacheError::Producer(message),
            };
        }

        if self.is_decode() {
            return PredCacheError::Producer(format!("invalid response body: {}", self));
        }

        PredCacheError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_predcache())
    }
}

/* -------------------------------------------------------------------------- */
/* serde / io → PredCacheError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(PredCacheError::Config(format!("Invalid JSON format: {}", value)))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(PredCacheError::Config(format!("Invalid TOML format: {}", value)))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        let pred = match value.kind() {
            std::io::ErrorKind::NotFound => PredCacheError::NotFound(value.to_string()),
            _ => PredCacheError::Internal(format!("I/O error: {}", value)),
        };
        InfraError(pred)
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
