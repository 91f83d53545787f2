pub mod loader;
pub mod schema;

pub use loader::{read_session_expiry, scan_session_expiry};
pub use schema::{
    Settings, BATCH_SIZE, DEFAULT_CONFIG_PATH, DEFAULT_EXPIRY_SECS, DEFAULT_SESSION_DIR,
    GRACE_SECS,
};
