// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "SurveySeat";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "surveyseat";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".surveyseat";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "surveyseat.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SURVEYSEAT_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "SURVEYSEAT_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SURVEYSEAT_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SURVEYSEAT_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SURVEYSEAT_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Maximum request body size for JSON endpoints (2 MB)
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

// =============================================================================
// Authentication
// =============================================================================

/// Environment variable for the hex-encoded JWT signing key
pub const ENV_AUTH_SIGNING_KEY: &str = "SURVEYSEAT_AUTH_SIGNING_KEY";

/// Cookie name for session token
pub const SESSION_COOKIE_NAME: &str = "surveyseat_session";

/// Default session TTL in days
pub const DEFAULT_SESSION_TTL_DAYS: u32 = 30;

/// User id assigned to requests when authentication is disabled
pub const DEFAULT_USER_ID: &str = "local";

// =============================================================================
// Query Parameters
// =============================================================================

/// Environment variable for maximum filter nesting depth
pub const ENV_QUERY_MAX_DEPTH: &str = "SURVEYSEAT_QUERY_MAX_DEPTH";

/// Environment variable for maximum filter condition count
pub const ENV_QUERY_MAX_CONDITIONS: &str = "SURVEYSEAT_QUERY_MAX_CONDITIONS";

/// Environment variable for maximum raw filter/order parameter size
pub const ENV_QUERY_MAX_PARAM_BYTES: &str = "SURVEYSEAT_QUERY_MAX_PARAM_BYTES";

/// Environment variable to reject repeated fields within one filter item
pub const ENV_QUERY_REJECT_DUPLICATES: &str = "SURVEYSEAT_QUERY_REJECT_DUPLICATES";

/// Default maximum filter nesting depth (top level is 1)
pub const DEFAULT_QUERY_MAX_DEPTH: usize = 8;

/// Default maximum number of conditions across a filter tree
pub const DEFAULT_QUERY_MAX_CONDITIONS: usize = 100;

/// Default maximum raw parameter size (16 KB)
pub const DEFAULT_QUERY_MAX_PARAM_BYTES: usize = 16 * 1024;

/// Upper bound for a configured nesting depth. Each filter level nests four
/// JSON containers and serde_json refuses input nested 128 levels deep.
pub const MAX_QUERY_DEPTH: usize = 30;

/// JSON containers opened per filter level: item list, item, condition list, condition
pub const JSON_LEVELS_PER_FILTER_DEPTH: usize = 4;

/// Compiled regex size limit for `$regex` predicates (1 MB)
pub const REGEX_SIZE_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Pagination
// =============================================================================

/// Default page number (1-based)
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for survey and response listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size accepted from clients
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// Surveys
// =============================================================================

/// Maximum number of history records returned per listing
pub const HISTORY_LIST_LIMIT: usize = 100;

/// Length of generated survey short paths
pub const SURVEY_PATH_LEN: usize = 8;

/// Mask character for secret response fields
pub const SECRET_MASK_CHAR: char = '*';
