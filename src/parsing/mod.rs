pub mod json_dump;
pub mod prometheus;
