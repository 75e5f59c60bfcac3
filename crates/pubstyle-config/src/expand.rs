//! `${VAR}` expansion for string settings.
//!
//! - `${VAR}` expands to the value of VAR and fails when it is unset
//! - `${VAR:-fallback}` expands to VAR when set, otherwise to `fallback`
//!
//! Values without `${` are returned untouched, so a URL with a bare `$` is
//! kept as written. Once a value contains `${`, bare `$VAR` in it expands too.

use crate::ConfigError;

/// Expand environment references in `value`, naming `field` in errors.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, MissingVar> {
        std::env::var(name).map(Some).map_err(|_| MissingVar {
            name: name.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// Lookup failure carried through `shellexpand`.
struct MissingVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_unchanged() {
        let result = expand_env("http://localhost:5001", "services.a.base_url").unwrap();
        assert_eq!(result, "http://localhost:5001");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PUBSTYLE_TEST_ASSETS_HOST", "assets.internal");
        }
        let result = expand_env(
            "http://${PUBSTYLE_TEST_ASSETS_HOST}:5003",
            "services.style_assets.base_url",
        )
        .unwrap();
        assert_eq!(result, "http://assets.internal:5003");
        unsafe {
            std::env::remove_var("PUBSTYLE_TEST_ASSETS_HOST");
        }
    }

    #[test]
    fn test_fallback_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PUBSTYLE_TEST_UNSET_HOST");
        }
        let result = expand_env("${PUBSTYLE_TEST_UNSET_HOST:-0.0.0.0}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
    }

    #[test]
    fn test_missing_var_names_field_and_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PUBSTYLE_TEST_MISSING");
        }
        let err = expand_env("${PUBSTYLE_TEST_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("PUBSTYLE_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_bare_var_expands_alongside_braced() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PUBSTYLE_TEST_BARE_PORT", "5003");
            std::env::remove_var("PUBSTYLE_TEST_BARE_HOST");
        }
        let result = expand_env(
            "http://${PUBSTYLE_TEST_BARE_HOST:-assets}:$PUBSTYLE_TEST_BARE_PORT",
            "services.style_assets.base_url",
        )
        .unwrap();
        assert_eq!(result, "http://assets:5003");
        unsafe {
            std::env::remove_var("PUBSTYLE_TEST_BARE_PORT");
        }
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("http://gallery/$export", "services.g.base_url").unwrap();
        assert_eq!(result, "http://gallery/$export");
    }
}
