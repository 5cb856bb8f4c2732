//! Twitter adapter
//!
//! Implementation of the platform client against the Twitter web API.

pub mod client;
pub mod parse;

pub use client::TwitterClientFactory;
