//! Macro for implementing Display and FromStr for setting enums
//!
//! Configuration enums are read both from serde files and from plain
//! environment variables; this macro gives them one string form for both.
//!
//! # Example
//!
//! ```rust
//! use predcache_domain::impl_setting_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LogFormat {
//!     Plain,
//!     Json,
//! }
//!
//! impl_setting_conversions!(LogFormat {
//!     Plain => "plain",
//!     Json => "json",
//! });
//!
//! assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
//! ```

/// Implements Display and FromStr traits for setting enums
///
/// This macro generates:
/// - Display trait: converts enum variants to their configured strings
/// - FromStr trait: parses case-insensitive strings to enum variants
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
#[macro_export]
macro_rules! impl_setting_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Strategy {
        Exact,
        Similarity,
    }

    impl_setting_conversions!(Strategy {
        Exact => "exact",
        Similarity => "similarity",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(Strategy::Exact.to_string(), "exact");
        assert_eq!(Strategy::Similarity.to_string(), "similarity");
    }

    #[test]
    fn test_fromstr_ignores_case_and_whitespace() {
        assert_eq!(Strategy::from_str("EXACT").unwrap(), Strategy::Exact);
        assert_eq!(Strategy::from_str(" Similarity ").unwrap(), Strategy::Similarity);
    }

    #[test]
    fn test_fromstr_invalid() {
        let result = Strategy::from_str("fuzzy");
        assert!(result.unwrap_err().contains("Invalid Strategy: fuzzy"));
        assert!(Strategy::from_str("").is_err());
    }
}
