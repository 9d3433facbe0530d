/// Max bytes in a booking first or last name.
pub const MAX_NAME_LEN: usize = 256;

/// Max bytes in a cancellation reason.
pub const MAX_REASON_LEN: usize = 1024;

/// Max vertices accepted for a polygon query.
pub const MAX_POLYGON_VERTICES: usize = 10_000;

/// Max HTTP request body size in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;
