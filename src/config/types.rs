//! Runtime settings for the server binary.

use std::net::SocketAddr;

/// Which backing store serves the repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// In-process store, lost on exit.
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("{} (expected postgres or memory)", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub store: StoreKind,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub seed_sample_data: bool,
    pub body_limit_bytes: usize,
    /// Prefix for generated `Location` paths.
    pub base_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "postgres://localhost/camps".into(),
            store: StoreKind::Postgres,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: 5,
            seed_sample_data: true,
            body_limit_bytes: 1024 * 1024,
            base_path: String::new(),
        }
    }
}
