/// Error code registry for tfc-trigger
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Workspace listing errors
/// - 3000-3999: Run creation errors
/// - 4000-4999: Event payload errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_INVALID_JSON: u16 = 1003;
    pub const CONFIG_INVALID_VALUE: u16 = 1004;
    pub const CONFIG_CREDENTIALS: u16 = 1005;
    pub const CONFIG_HTTP_CLIENT: u16 = 1006;

    // Listing errors (2000-2999)
    pub const LISTING_GENERIC: u16 = 2000;
    pub const LISTING_HTTP_STATUS: u16 = 2001;
    pub const LISTING_TRANSPORT: u16 = 2002;
    pub const LISTING_MALFORMED: u16 = 2003;

    // Trigger errors (3000-3999)
    pub const TRIGGER_GENERIC: u16 = 3000;
    pub const TRIGGER_HTTP_STATUS: u16 = 3001;
    pub const TRIGGER_TRANSPORT: u16 = 3002;
    pub const TRIGGER_MALFORMED: u16 = 3003;
    pub const TRIGGER_PARTIAL_FAILURE: u16 = 3004;

    // Event errors (4000-4999)
    pub const EVENT_GENERIC: u16 = 4000;
    pub const EVENT_INVALID_ENVELOPE: u16 = 4001;
    pub const EVENT_INVALID_BASE64: u16 = 4002;
    pub const EVENT_INVALID_PAYLOAD: u16 = 4003;
    pub const EVENT_MISSING_FIELD: u16 = 4004;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
    pub const OTHER_IO: u16 = 9001;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid TOML in configuration file",
        1003 => "Invalid JSON in configuration file",
        1004 => "Invalid configuration value",
        1005 => "Unable to read Terraform CLI credentials",
        1006 => "Unable to build the HTTP client",

        2000 => "Generic workspace listing error",
        2001 => "Workspace listing returned an error status",
        2002 => "Workspace listing request could not be sent",
        2003 => "Workspace listing response could not be decoded",

        3000 => "Generic run creation error",
        3001 => "Run creation returned an error status",
        3002 => "Run creation request could not be sent",
        3003 => "Run creation response could not be decoded",
        3004 => "At least one workspace could not be triggered",

        4000 => "Generic event error",
        4001 => "Event envelope is not valid JSON",
        4002 => "Event data is not valid base64",
        4003 => "Event data is not a valid trigger request",
        4004 => "Event data is missing a required field",

        9000 => "Generic error",
        9001 => "I/O error",

        _ => "Unknown error code",
    }
}
