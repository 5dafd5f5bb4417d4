pub mod remote_write_encoder;
pub mod remote_write_models;
pub mod remote_write_parser;

pub use remote_write_encoder::encode_write_request;
pub use remote_write_parser::parse_remote_write_request;

/// Headers every remote write request carries.
pub const CONTENT_ENCODING: &str = "snappy";
pub const CONTENT_TYPE: &str = "application/x-protobuf";
pub const REMOTE_WRITE_VERSION_HEADER: &str = "x-prometheus-remote-write-version";
pub const REMOTE_WRITE_VERSION: &str = "0.1.0";
