//! API constants

/// Prefix every relay route is nested under.
pub const API_PREFIX: &str = "/api/aps";

/// Multipart field the upload endpoint reads the file from.
pub const FILE_FIELD: &str = "file";
