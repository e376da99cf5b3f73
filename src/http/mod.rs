//! HTTP access shared by discovery and downloading.

pub mod client;

pub use client::HttpClient;
