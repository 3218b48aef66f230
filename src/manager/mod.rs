// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account-level management of appliances.
//!
//! A [`Connection`] logs in once, reads the appliance directory and keeps
//! one [`Appliance`](crate::device::Appliance) per supported washer or dryer
//! in an [`ApplianceRegistry`]. Every appliance publishes on the
//! connection's event bus, so a single subscription sees the whole account.
//!
//! Polling is driven by the caller: call [`Connection::poll`] every
//! [`ConnectionConfig::poll_interval`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hon_lib::manager::{Connection, ConnectionConfig};
//! use hon_lib::protocol::HttpConfig;
//! use hon_lib::settings::MemoryStore;
//! use hon_lib::types::MacAddress;
//!
//! # async fn example() -> hon_lib::Result<()> {
//! let transport = HttpConfig::new("id-token").into_client()?;
//! let connection = Connection::new(
//!     transport,
//!     Arc::new(MemoryStore::new()),
//!     ConnectionConfig::default(),
//! );
//! connection.connect().await?;
//!
//! let washer = connection.appliance(&MacAddress::new("aa-bb-cc-dd-ee-ff")).await?;
//! let mut washer = washer.lock().await;
//! washer.select_program("cotton")?;
//! washer.send_start().await;
//! # Ok(())
//! # }
//! ```

mod connection;
mod connection_config;
mod registry;

pub use connection::Connection;
pub use connection_config::ConnectionConfig;
pub use registry::{ApplianceRegistry, SharedAppliance};
