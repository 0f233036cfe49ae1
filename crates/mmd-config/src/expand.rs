//! `${VAR}` expansion for values read from `mmd.toml`.

use std::borrow::Cow;
use std::env::VarError;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Values without `${` are returned as they are, so a literal `$` in a
/// plain host name never triggers a lookup. `field` names the setting in
/// error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|e| {
            let message = match e.cause {
                VarError::NotPresent => format!("${{{}}} not set", e.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} is not valid unicode", e.var_name),
            };
            ConfigError::EnvVar {
                field: field.to_owned(),
                message,
            }
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // Each test owns its variable names, so parallel tests never share one.
    fn set(var: &str, value: &str) {
        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var(var, value) }
    }

    fn unset(var: &str) {
        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::remove_var(var) }
    }

    #[test]
    fn test_plain_hosts_unchanged() {
        assert_eq!(expand_env("127.0.0.1", "server.host").unwrap(), "127.0.0.1");
        assert_eq!(expand_env("::", "server.host").unwrap(), "::");
        assert_eq!(
            expand_env("rehearsal-room.local", "server.host").unwrap(),
            "rehearsal-room.local"
        );
    }

    #[test]
    fn test_lan_address_from_env() {
        set("MMD_TEST_LAN_ADDR", "192.168.1.20");

        let host = expand_env("${MMD_TEST_LAN_ADDR}", "server.host").unwrap();

        assert_eq!(host, "192.168.1.20");
        unset("MMD_TEST_LAN_ADDR");
    }

    #[test]
    fn test_expansion_inside_host_name() {
        set("MMD_TEST_BAND", "quartet");

        let host = expand_env("${MMD_TEST_BAND}.local", "server.host").unwrap();

        assert_eq!(host, "quartet.local");
        unset("MMD_TEST_BAND");
    }

    #[test]
    fn test_unset_falls_back_to_wildcard_default() {
        unset("MMD_TEST_BIND_ALL");

        let host = expand_env("${MMD_TEST_BIND_ALL:-0.0.0.0}", "server.host").unwrap();

        assert_eq!(host, "0.0.0.0");
    }

    #[test]
    fn test_unset_without_default_names_field_and_variable() {
        unset("MMD_TEST_NO_SUCH_HOST");

        let err = expand_env("${MMD_TEST_NO_SUCH_HOST}", "server.host").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Environment variable error in server.host: ${MMD_TEST_NO_SUCH_HOST} not set"
        );
    }
}
