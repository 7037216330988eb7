//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (malformed attributes, ambiguous names)
pub const DATAERR: i32 = 65;

/// Resource not found
pub const NOINPUT: i32 = 66;

/// Server unreachable
pub const UNAVAILABLE: i32 = 69;

/// Server or internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Authentication or authorization rejected
pub const NOPERM: i32 = 77;

/// Configuration error
pub const CONFIG: i32 = 78;
