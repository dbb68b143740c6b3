//! Application constants for facility sync
//!
//! This module contains default values, column layouts and limits used
//! throughout the facility sync application.

// =============================================================================
// Destination Schema
// =============================================================================

/// Default destination table
pub const DEFAULT_TABLE: &str = "facilities";

/// Columns written by an INSERT, in VALUES order
pub const FACILITY_COLUMNS: &[&str] = &[
    "facility_type",
    "name",
    "postal_code",
    "address",
    "phone",
    "latitude",
    "longitude",
    "sido",
    "sigungu",
];

// =============================================================================
// Source Encodings
// =============================================================================

/// Candidate encodings tried in priority order when reading delimited text
pub const DEFAULT_ENCODING_CANDIDATES: &[&str] = &["utf-8", "cp949", "euc-kr", "utf-8-sig"];

/// Encoding used when no candidate's probe contains a header marker
pub const DEFAULT_FALLBACK_ENCODING: &str = "cp949";

/// Header keywords that identify a correctly decoded probe
pub const DEFAULT_HEADER_MARKERS: &[&str] = &["시설", "ID"];

/// Number of leading lines decoded per candidate
pub const DEFAULT_PROBE_LINES: usize = 1;

// =============================================================================
// Delimited Text Layout
// =============================================================================

/// Lines with fewer fields than this are skipped
pub const MIN_DELIMITED_FIELDS: usize = 9;

/// Field positions in a delimited line (position 0 is the source row id)
pub mod delimited_columns {
    pub const FACILITY_TYPE: usize = 1;
    pub const NAME: usize = 2;
    pub const POSTAL_CODE: usize = 3;
    pub const ADDRESS: usize = 4;
    pub const PHONE: usize = 5;
    pub const LATITUDE: usize = 6;
    pub const LONGITUDE: usize = 7;
    pub const SIDO: usize = 8;
    pub const SIGUNGU: usize = 9;
}

/// Cell positions in a workbook row
pub mod workbook_columns {
    pub const FACILITY_TYPE: usize = 0;
    pub const NAME: usize = 1;
    pub const POSTAL_CODE: usize = 2;
    pub const ADDRESS: usize = 3;
    pub const LATITUDE: usize = 4;
    pub const LONGITUDE: usize = 5;
}

/// Maximum number of skip messages retained in parse statistics
pub const MAX_RECORDED_SKIPS: usize = 100;

// =============================================================================
// Upload Defaults
// =============================================================================

/// Records per INSERT statement
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Pause between consecutive batches, in milliseconds
pub const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 500;

/// Timeout for a batch INSERT, in seconds
pub const DEFAULT_INSERT_TIMEOUT_SECS: u64 = 120;

/// Timeout for the pre-clear DELETE, in seconds
pub const DEFAULT_CLEAR_TIMEOUT_SECS: u64 = 60;

/// Maximum characters of diagnostic text kept per failed batch
pub const DIAGNOSTIC_EXCERPT_CHARS: usize = 200;

// =============================================================================
// Remote Command
// =============================================================================

/// Program and leading arguments of the remote database command
pub const DEFAULT_REMOTE_COMMAND: &[&str] = &["npx", "wrangler", "d1", "execute"];

/// Flag selecting remote (production) execution
pub const REMOTE_MODE_FLAG: &str = "--remote";

/// Flag preceding the raw SQL text
pub const COMMAND_FLAG: &str = "--command";

/// Environment variable carrying the API credential
pub const DEFAULT_TOKEN_ENV: &str = "CLOUDFLARE_API_TOKEN";

/// Executable search path handed to the child process
pub const DEFAULT_CHILD_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "facility-sync";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "FACILITY_SYNC_";

/// Log level used when neither the config file nor `-v`/`-q` set one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted values for `logging.level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
