// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hOn` Lib - A Rust library to control cloud-connected washers and dryers.
//!
//! This library models Haier/Candy/Hoover appliances reachable through the
//! vendor `hOn` cloud. The cloud is polled: each appliance keeps a local copy
//! of its telemetry, a catalog of the programs it supports and the values the
//! user picked for each program.
//!
//! # Supported Features
//!
//! - **Program catalog**: programs and their parameters read from vendor
//!   metadata, with per-program values kept across rebuilds
//! - **Commands**: start, stop, pause and resume
//! - **Status**: machine mode, program phase, remaining and end time
//! - **Dosing reminders**: low detergent/softener and manual dosing notices
//! - **Delayed start**: one-call "start around 09:00"
//! - **Persistence**: settings groups saved through a pluggable store
//!
//! # Supported Appliances
//!
//! - Washing machines and washer-dryers (`WM`)
//! - Tumble dryers (`TD`)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hon_lib::{Connection, ConnectionConfig, DeviceEvent, HttpConfig};
//! use hon_lib::settings::JsonFileStore;
//!
//! #[tokio::main]
//! async fn main() -> hon_lib::Result<()> {
//!     let transport = HttpConfig::new("id-token").into_client()?;
//!     let store = Arc::new(JsonFileStore::new("/var/lib/hon"));
//!     let connection = Connection::new(transport, store, ConnectionConfig::default());
//!
//!     let mut events = connection.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             if let DeviceEvent::Notification { mac, notification } = event {
//!                 println!("{mac}: {}", notification.title());
//!             }
//!         }
//!     });
//!
//!     connection.connect().await?;
//!     for mac in connection.registry().macs().await {
//!         let appliance = connection.appliance(&mac).await?;
//!         let appliance = appliance.lock().await;
//!         println!("{mac}: {:?}", appliance.catalog().names());
//!     }
//!
//!     let mut interval = tokio::time::interval(connection.config().poll_interval());
//!     loop {
//!         interval.tick().await;
//!         connection.poll().await;
//!     }
//! }
//! ```
//!
//! ## Selecting and Starting a Program
//!
//! ```no_run
//! # async fn example(
//! #     washer: &mut hon_lib::Appliance<hon_lib::HttpClient>,
//! # ) -> hon_lib::Result<()> {
//! washer.select_program("cotton")?;
//! washer.set_current_program_param("temp", "40")?;
//! washer.set_morning_delay(&chrono::Local::now())?;
//!
//! if washer.can_start() && !washer.send_start().await {
//!     // Held back by a dosing reminder, or rejected by the cloud.
//!     // A second call sends the command.
//!     washer.send_start().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod notification;
pub mod parameter;
pub mod protocol;
pub mod settings;
pub mod state;
pub mod telemetry;
pub mod types;

pub use catalog::{ProgramCatalog, ProgramDefinition, ProgramDetails, Translator};
pub use device::{Appliance, ApplianceIdentity, StatusAttributes};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, EventBus};
pub use manager::{Connection, ConnectionConfig};
pub use notification::Notification;
pub use parameter::{Controllable, EntityKind, ParameterDescriptor};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::{CommandRequest, Transport};
pub use settings::{JsonFileStore, MemoryStore, SettingsStore};
pub use types::{ApplianceType, MacAddress, MachineMode};
