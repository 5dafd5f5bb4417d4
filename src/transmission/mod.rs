pub mod client;
pub mod pool;

pub use client::{RemoteWriteClient, RemoteWriteTarget};
pub use pool::{PoolReport, TransmissionPool};
