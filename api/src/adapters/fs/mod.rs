//! Filesystem adapter
//!
//! Cookie persistence on local disk.

pub mod cookie_store;

pub use cookie_store::FileCookieStore;
