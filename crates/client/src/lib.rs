//! Client code for pantry.
//!
//! This crate provides the HTTP fetch pipeline the offline cache agent uses
//! to reach the network, plus URL resolution against the agent's origin.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, FetchError, FetchResponse, Network, UrlError, resolve, same_origin};

pub use reqwest::header::HeaderMap;
pub use reqwest::{Method, StatusCode};
