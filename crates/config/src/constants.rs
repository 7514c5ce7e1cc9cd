//! Fallback locations used when neither the config file nor the environment
//! names a path.

pub const STORAGE_ROOT: &str = "/var/lib/maid/files";

pub const DB_PATH: &str = "/var/lib/maid/records.sqlite";

pub const CONFIG_FILE: &str = "config.toml";
