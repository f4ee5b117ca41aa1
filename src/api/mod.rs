pub mod client;

pub use client::DeepselfClient;
