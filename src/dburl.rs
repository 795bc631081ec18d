//! Database connection URL helpers.
//!
//! Pure string manipulation: split `proto://host:port/db` (including the
//! legacy `proto://host/db:port` form) into its parts, rebuild the
//! canonical form, and map shorthand protocol names to driver identifiers.

/// The parts of a database connection URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    pub protocol: String,
    pub server: String,
    pub database: String,
    pub port: u16,
}

/// Split a connection URL into its parts.
///
/// A port may follow the host (`pgsql://db.example.com:5433/orders`) or,
/// in the legacy form, trail the database name
/// (`pgsql://db.example.com/orders:5433`). A missing or unparsable port
/// defaults to 5432.
pub fn parse_database_url(url: &str) -> DatabaseUrl {
    let (protocol, rest) = match url.find("://") {
        Some(i) => (&url[..i], &url[i + 3..]),
        None => ("", url),
    };
    let (host_part, mut database) = match rest.find('/') {
        Some(i) => (&rest[..i], rest[i + 1..].to_string()),
        None => (rest, String::new()),
    };
    let (server, mut port) = match host_part.rfind(':') {
        Some(i) => (
            host_part[..i].to_string(),
            host_part[i + 1..].parse().unwrap_or(0),
        ),
        None => (host_part.to_string(), 0),
    };
    if port == 0 {
        if let Some(i) = database.find(':') {
            port = database[i + 1..].parse().unwrap_or(0);
            database.truncate(i);
        }
    }
    if port == 0 {
        port = 5432;
    }
    DatabaseUrl {
        protocol: protocol.to_string(),
        server,
        database,
        port,
    }
}

/// Rebuild the canonical `proto://host:port/db` form.
pub fn build_database_url(url: &DatabaseUrl) -> String {
    format!(
        "{}://{}:{}/{}",
        url.protocol, url.server, url.port, url.database
    )
}

/// Map a shorthand protocol name to its driver identifier; unknown names
/// pass through upper-cased for third-party drivers.
pub fn normalize_protocol(protocol: &str) -> String {
    match protocol {
        "odbc" => "QODBC".to_string(),
        "pgsql" | "psql" => "QPSQL".to_string(),
        "db2" => "QDB2".to_string(),
        "ibase" => "QIBASE".to_string(),
        "mysql" => "QMYSQL".to_string(),
        "oracle" => "QOCI".to_string(),
        "sqlite" => "QSQLITE".to_string(),
        "sqlite2" => "QSQLITE2".to_string(),
        "sybase" => "QTDS".to_string(),
        other => other.to_uppercase(),
    }
}
