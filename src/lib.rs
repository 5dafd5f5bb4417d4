#![forbid(unsafe_code)]

pub mod config;
pub mod datamodel;
pub mod error;
pub mod parsing;
pub mod replay;
pub mod transmission;

pub use replay::replay;
