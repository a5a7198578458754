// cfmail-api: async client for the Cloudflare v4 zone and DNS record endpoints

pub mod client;
pub mod error;
pub mod models;
pub mod records;
pub mod transport;
pub mod zones;

pub use client::CloudflareClient;
pub use error::Error;
pub use models::{ApiMessage, ApiResponse, DnsRecord, NewRecord, RecordType, Zone};
pub use transport::{ApiCredentials, DEFAULT_API_BASE, TransportConfig};
