//! Fauna client for Tokio
//!
//! Main way to use the bindings is [`Client`]. Queries are built from
//! [`fauna_protocol::query`] functions and literals, sent with
//! [`Client::query`] and delivered as a [`QueryResult`], which can be
//! awaited, waited on with a timeout, or chained with callbacks.
//!
//! To create client, use [`create_client`] function (it gets configuration
//! from environment). You can also use [`Builder`] to
//! [`build`](`Builder::build`) custom [`Config`] and [create a
//! client](Client::new) using that config.
//!
//! # Example
//!
//! ```rust,no_run
//! use fauna_protocol::expr::Obj;
//! use fauna_protocol::path;
//! use fauna_protocol::query::{class, create};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fauna_client::Error> {
//!     let client = fauna_client::create_client()?;
//!     let spell = client.query(&create(
//!         class("spells"),
//!         Obj::new().field("data", Obj::new().field("name", "Fire Beak")),
//!     )).await?;
//!     let name: Option<String> = spell.get(path!("data", "name"))?;
//!     println!("created {:?}", name);
//!     Ok(())
//! }
//! ```
#![warn(missing_debug_implementations)]

mod builder;
mod client;
mod env;
pub mod errors;
mod executor;
mod latch;
mod query_result;
pub mod transport;

pub use builder::{Builder, Config, DEFAULT_ENDPOINT};
pub use client::{create_client, Client};
pub use env::{EnvVar, SystemEnvVars};
pub use errors::Error;
pub use executor::{Executor, Inline, Task};
pub use query_result::QueryResult;
