//! TNS-style connection string assembly.

use crate::config::AppConfig;

/// Builds the `user/pass@host:port/service` credential string for a named
/// connection, falling back to the configured default connection name.
///
/// Missing values render as empty strings; `sqlldr` reports its own error
/// for unusable credentials, so no validation happens here.
pub fn connection_string(config: &AppConfig, name: Option<&str>) -> String {
    let name = name.unwrap_or(&config.connection);
    let conn = config.connections.get(name);

    let username = conn.and_then(|c| c.username.as_deref()).unwrap_or("");
    let password = conn.and_then(|c| c.password.as_deref()).unwrap_or("");
    let host = conn.and_then(|c| c.host.as_deref()).unwrap_or("");
    let port = conn
        .and_then(|c| c.port.map(|p| p.to_string()))
        .unwrap_or_default();
    let database = conn.and_then(|c| c.database.as_deref()).unwrap_or("");

    format!("{username}/{password}@{host}:{port}/{database}")
}
