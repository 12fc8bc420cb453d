//! Gateway configuration.
//!
//! Resolved once at process startup (binaries read the environment) and then passed into the
//! HTTP clients and controllers. Nothing in the core reads environment variables.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_POSTAL_LOOKUP_URL, DEFAULT_SUCCESS_ROUTE,
    NEW_HEALTH_RECORD_PATH, POSTAL_LOOKUP_PATH, REGISTER_USER_PATH,
};
use crate::{FormError, FormResult};

/// Endpoints and routes the front ends talk to.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    api_base_url: String,
    postal_lookup_url: String,
    success_route: String,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig`.
    ///
    /// Trailing slashes on the base URLs are removed.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidConfig` if a base URL is empty or not `http(s)://`, or the
    /// success route does not start with `/`.
    pub fn new(
        api_base_url: impl Into<String>,
        postal_lookup_url: impl Into<String>,
        success_route: impl Into<String>,
    ) -> FormResult<Self> {
        let api_base_url = normalise_base_url("api base URL", api_base_url.into())?;
        let postal_lookup_url = normalise_base_url("postal lookup URL", postal_lookup_url.into())?;
        let success_route = success_route.into();

        if !success_route.starts_with('/') {
            return Err(FormError::InvalidConfig(format!(
                "success route must start with '/': {success_route}"
            )));
        }

        Ok(Self {
            api_base_url,
            postal_lookup_url,
            success_route,
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn postal_lookup_url(&self) -> &str {
        &self.postal_lookup_url
    }

    pub fn success_route(&self) -> &str {
        &self.success_route
    }

    pub fn registration_url(&self) -> String {
        format!("{}{}", self.api_base_url, REGISTER_USER_PATH)
    }

    pub fn health_record_url(&self) -> String {
        format!("{}{}", self.api_base_url, NEW_HEALTH_RECORD_PATH)
    }

    pub fn lookup_url(&self, postal_code: &str) -> String {
        format!(
            "{}{}/{}",
            self.postal_lookup_url, POSTAL_LOOKUP_PATH, postal_code
        )
    }

    /// Checks that the backend is not the server listening on `bind_addr`.
    ///
    /// Only loopback and wildcard hosts are compared. A hostname that resolves to this
    /// machine is not detected.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidConfig` if `bind_addr` has no port, or if the API base URL
    /// points at the same local port.
    pub fn ensure_distinct_from(&self, bind_addr: &str) -> FormResult<()> {
        let (bind_host, bind_port) = split_host_port(bind_addr).ok_or_else(|| {
            FormError::InvalidConfig(format!("bind address has no port: {bind_addr}"))
        })?;
        let Some((api_host, api_port)) = url_host_port(&self.api_base_url) else {
            return Ok(());
        };

        if bind_port == api_port && is_local(bind_host) && is_local(api_host) {
            return Err(FormError::InvalidConfig(format!(
                "api base URL {} points at the REST server itself ({bind_addr})",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

fn url_host_port(url: &str) -> Option<(&str, u16)> {
    let (scheme, rest) = url.split_once("://")?;
    let authority = rest.split('/').next()?;
    let authority = authority.rsplit('@').next()?;
    match split_host_port(authority) {
        Some(found) => Some(found),
        None if scheme == "https" => Some((authority, 443)),
        None => Some((authority, 80)),
    }
}

fn split_host_port(authority: &str) -> Option<(&str, u16)> {
    let (host, port) = authority.rsplit_once(':')?;
    // `[::1]` without a port splits inside the brackets.
    if host.starts_with('[') && !host.ends_with(']') {
        return None;
    }
    Some((host, port.parse().ok()?))
}

fn is_local(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback() || ip.is_unspecified())
}

/// Builds a [`GatewayConfig`] from optional raw environment values, applying defaults for
/// absent or blank ones.
///
/// # Errors
///
/// Same as [`GatewayConfig::new`].
pub fn gateway_config_from_env_values(
    api_base_url: Option<String>,
    postal_lookup_url: Option<String>,
    success_route: Option<String>,
) -> FormResult<GatewayConfig> {
    GatewayConfig::new(
        value_or_default(api_base_url, DEFAULT_API_BASE_URL),
        value_or_default(postal_lookup_url, DEFAULT_POSTAL_LOOKUP_URL),
        value_or_default(success_route, DEFAULT_SUCCESS_ROUTE),
    )
}

fn normalise_base_url(what: &str, value: String) -> FormResult<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(FormError::InvalidConfig(format!("{what} cannot be empty")));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(FormError::InvalidConfig(format!(
            "{what} must start with http:// or https://"
        )));
    }
    Ok(trimmed.to_string())
}

/// Use `value` unless it is absent or blank.
pub fn value_or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls_without_double_slashes() {
        let cfg = GatewayConfig::new("http://backend:3000/", "https://lookup.example/", "/")
            .unwrap();
        assert_eq!(
            cfg.registration_url(),
            "http://backend:3000/api/register/user"
        );
        assert_eq!(
            cfg.health_record_url(),
            "http://backend:3000/api/records/newrecord"
        );
        assert_eq!(
            cfg.lookup_url("400001"),
            "https://lookup.example/pincode/400001"
        );
    }

    #[test]
    fn rejects_empty_base_url() {
        let err = GatewayConfig::new("  ", "https://lookup.example", "/").expect_err("empty");
        assert!(matches!(err, FormError::InvalidConfig(msg) if msg.contains("cannot be empty")));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err =
            GatewayConfig::new("ftp://backend", "https://lookup.example", "/").expect_err("ftp");
        assert!(matches!(err, FormError::InvalidConfig(msg) if msg.contains("http://")));
    }

    #[test]
    fn rejects_relative_success_route() {
        let err = GatewayConfig::new("http://a", "http://b", "home").expect_err("route");
        assert!(matches!(err, FormError::InvalidConfig(msg) if msg.contains("success route")));
    }

    #[test]
    fn value_or_default_ignores_blank_values() {
        assert_eq!(value_or_default(None, "x"), "x");
        assert_eq!(value_or_default(Some("  ".into()), "x"), "x");
        assert_eq!(value_or_default(Some(" y ".into()), "x"), "y");
    }

    #[test]
    fn env_values_fall_back_to_defaults() {
        let cfg = gateway_config_from_env_values(None, Some(String::new()), None).unwrap();
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.postal_lookup_url(), DEFAULT_POSTAL_LOOKUP_URL);
        assert_eq!(cfg.success_route(), "/");

        let cfg = gateway_config_from_env_values(
            Some("https://records.example/".into()),
            None,
            Some("/login".into()),
        )
        .unwrap();
        assert_eq!(cfg.api_base_url(), "https://records.example");
        assert_eq!(cfg.success_route(), "/login");
    }

    #[test]
    fn default_backend_and_bind_address_do_not_collide() {
        let cfg = gateway_config_from_env_values(None, None, None).unwrap();
        assert!(cfg.ensure_distinct_from(crate::constants::DEFAULT_REST_ADDR).is_ok());
    }

    #[test]
    fn backend_on_own_port_is_rejected() {
        for (api, bind) in [
            ("http://localhost:3000", "0.0.0.0:3000"),
            ("http://127.0.0.1:8080/", "127.0.0.1:8080"),
            ("http://[::1]:9000", "[::]:9000"),
            ("http://localhost", "0.0.0.0:80"),
        ] {
            let cfg = GatewayConfig::new(api, "https://lookup.example", "/").unwrap();
            let err = cfg.ensure_distinct_from(bind).expect_err(api);
            assert!(matches!(err, FormError::InvalidConfig(msg) if msg.contains("itself")));
        }
    }

    #[test]
    fn other_ports_and_remote_hosts_are_allowed() {
        let local = GatewayConfig::new("http://localhost:3000", "http://b", "/").unwrap();
        assert!(local.ensure_distinct_from("0.0.0.0:8080").is_ok());

        let remote = GatewayConfig::new("https://records.example:8080", "http://b", "/").unwrap();
        assert!(remote.ensure_distinct_from("0.0.0.0:8080").is_ok());
    }

    #[test]
    fn bind_address_without_port_is_rejected() {
        let cfg = GatewayConfig::new("http://localhost:3000", "http://b", "/").unwrap();
        let err = cfg.ensure_distinct_from("0.0.0.0").expect_err("no port");
        assert!(matches!(err, FormError::InvalidConfig(msg) if msg.contains("no port")));
    }
}
