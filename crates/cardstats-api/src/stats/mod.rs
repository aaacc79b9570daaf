// Client for the tournament statistics backend.
//
// Plain GET + JSON endpoints under a configurable base URL. Payload
// shapes are a contract with the backend and are not validated beyond
// deserialization into the types in [`types`].

pub mod client;
pub mod types;

pub use client::StatsClient;
