// Application Constants
// Centralized constants to avoid magic numbers

/// Default server configuration
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 4500;

/// Alert engine configuration
pub const ALERT_SCAN_INTERVAL_SECS: u64 = 300;
pub const CRITICAL_STOCK_FLOOR: i64 = 5;

/// Local notification channel
pub const NOTIFICATION_CAP: usize = 10;
pub const SUCCESS_NOTIFICATION_TTL_SECS: u64 = 5;

/// JWT configuration defaults
pub const DEFAULT_JWT_DURATION_HOURS: i64 = 8;
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Movement listing limits
pub const DEFAULT_MOVEMENT_LIST_LIMIT: usize = 50;
pub const MAX_MOVEMENT_LIST_LIMIT: usize = 200;
