// Name and version baked in at build time

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reported by GET /version; matches the Cargo package name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
