//! A small blocking Rust client for the AEMET OpenData API.
//!
//! Each accessor issues one authenticated GET against
//! `https://opendata.aemet.es/opendata/api` and returns the response body as
//! [`serde_json::Value`], or `None` when the body is empty.
//!
//! ## Quick start
//! - Get an API key from <https://opendata.aemet.es/centrodedescargas/altaUsuario>.
//! - Pass it to [`Client::new`], or configure it via the `AEMET_API_KEY` environment
//!   variable or an `.aemetrc` file (current directory or home directory) and call
//!   [`Client::from_env`].
//!
//! ```no_run
//! use aemet_opendata::Client;
//!
//! fn main() -> aemet_opendata::Result<()> {
//!     let mut client = Client::from_env()?;
//!     client.set_debug(true);
//!
//!     if let Some(town) = client.get_town("28079")? {
//!         println!("{town:#}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Request paths and raw responses are logged through [`tracing`] at debug level while
//! [`Client::set_debug`] is on; install a subscriber to see them.

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod util;

pub use client::{Client, ClientConfig, DEFAULT_URL};
pub use error::{Error, Result};
