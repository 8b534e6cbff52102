//! Environment-driven daemon configuration.
//!
//! Unset variables take their documented defaults; set-but-invalid values
//! are startup errors (the daemon refuses to boot on a typo rather than
//! silently falling back).
//!
//! | Variable            | Default          | Meaning                           |
//! |---------------------|------------------|-----------------------------------|
//! | `LMK_DAEMON_ADDR`   | `127.0.0.1:3000` | Bind address                      |
//! | `LMK_OTP_DIGITS`    | `6`              | OTP width, 4..=9                  |
//! | `LMK_WIRE_ENCODING` | `status`         | `status` \| `body` (see below)    |

use std::net::SocketAddr;

use lmk_shipments::{DEFAULT_OTP_DIGITS, MAX_OTP_DIGITS, MIN_OTP_DIGITS};

pub const ENV_DAEMON_ADDR: &str = "LMK_DAEMON_ADDR";
pub const ENV_OTP_DIGITS: &str = "LMK_OTP_DIGITS";
pub const ENV_WIRE_ENCODING: &str = "LMK_WIRE_ENCODING";

// ---------------------------------------------------------------------------
// WireEncoding
// ---------------------------------------------------------------------------

/// How confirmation outcomes are written to the wire.
///
/// `StatusCoded` (the documented default) reports `invalid_otp` as 401 and
/// `already_delivered` as 409; `BodyCoded` folds both into 200 responses
/// tagged by the body's `status` field.  `not_found` is 404 under both.
/// Clients accept either encoding; the choice is per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEncoding {
    StatusCoded,
    BodyCoded,
}

impl WireEncoding {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(Self::StatusCoded),
            "body" => Ok(Self::BodyCoded),
            other => Err(ConfigError::BadWireEncoding(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusCoded => "status",
            Self::BodyCoded => "body",
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BadAddr(String),
    BadOtpDigits(String),
    BadWireEncoding(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::BadAddr(v) => {
                write!(f, "{ENV_DAEMON_ADDR}={v:?} is not a socket address")
            }
            ConfigError::BadOtpDigits(v) => write!(
                f,
                "{ENV_OTP_DIGITS}={v:?} is not an integer in {MIN_OTP_DIGITS}..={MAX_OTP_DIGITS}"
            ),
            ConfigError::BadWireEncoding(v) => {
                write!(f, "{ENV_WIRE_ENCODING}={v:?} is neither \"status\" nor \"body\"")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// DaemonConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub bind_addr: SocketAddr,
    pub otp_digits: u8,
    pub encoding: WireEncoding,
}

impl DaemonConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(ENV_DAEMON_ADDR).ok().as_deref(),
            std::env::var(ENV_OTP_DIGITS).ok().as_deref(),
            std::env::var(ENV_WIRE_ENCODING).ok().as_deref(),
        )
    }

    fn from_values(
        addr: Option<&str>,
        otp_digits: Option<&str>,
        encoding: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let bind_addr = match addr {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::BadAddr(s.to_string()))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };

        let otp_digits = match otp_digits {
            Some(s) => {
                let n: u8 = s
                    .parse()
                    .map_err(|_| ConfigError::BadOtpDigits(s.to_string()))?;
                if !(MIN_OTP_DIGITS..=MAX_OTP_DIGITS).contains(&n) {
                    return Err(ConfigError::BadOtpDigits(s.to_string()));
                }
                n
            }
            None => DEFAULT_OTP_DIGITS,
        };

        let encoding = match encoding {
            Some(s) => WireEncoding::parse(s)?,
            None => WireEncoding::StatusCoded,
        };

        Ok(Self {
            bind_addr,
            otp_digits,
            encoding,
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_defaults_when_nothing_is_set() {
        let cfg = DaemonConfig::from_values(None, None, None).unwrap();
        assert_eq!(cfg.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(cfg.otp_digits, DEFAULT_OTP_DIGITS);
        assert_eq!(cfg.encoding, WireEncoding::StatusCoded);
    }

    #[test]
    fn explicit_values_are_honored() {
        let cfg = DaemonConfig::from_values(Some("0.0.0.0:8080"), Some("4"), Some("body")).unwrap();
        assert_eq!(cfg.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(cfg.otp_digits, 4);
        assert_eq!(cfg.encoding, WireEncoding::BodyCoded);
    }

    #[test]
    fn invalid_values_are_startup_errors_not_fallbacks() {
        assert!(matches!(
            DaemonConfig::from_values(Some("not-an-addr"), None, None),
            Err(ConfigError::BadAddr(_))
        ));
        assert!(matches!(
            DaemonConfig::from_values(None, Some("3"), None),
            Err(ConfigError::BadOtpDigits(_))
        ));
        assert!(matches!(
            DaemonConfig::from_values(None, Some("ten"), None),
            Err(ConfigError::BadOtpDigits(_))
        ));
        assert!(matches!(
            DaemonConfig::from_values(None, None, Some("json")),
            Err(ConfigError::BadWireEncoding(_))
        ));
    }

    #[test]
    fn wire_encoding_parse_is_case_and_whitespace_tolerant() {
        assert_eq!(WireEncoding::parse(" Status ").unwrap(), WireEncoding::StatusCoded);
        assert_eq!(WireEncoding::parse("BODY").unwrap(), WireEncoding::BodyCoded);
        assert_eq!(WireEncoding::StatusCoded.as_str(), "status");
        assert_eq!(WireEncoding::BodyCoded.as_str(), "body");
    }
}
