// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program catalog.
//!
//! The catalog lists the programs an appliance can run, each with its
//! description, its parameters and an optional duration table. It is built
//! from the `startProgram` section of the capability metadata by
//! [`CatalogBuilder`], which merges in whatever the user changed before so
//! that a refresh never loses customizations.

mod builder;
mod program;
mod timing;
mod translator;

pub use builder::{
    CatalogBuild, CatalogBuilder, START_PROGRAM, canonical_key, is_excluded,
    settings_from_persisted, settings_to_persisted,
};
pub use program::{ProgramCatalog, ProgramDefinition, ProgramDetails};
pub use timing::TimingTable;
pub use translator::{NoTranslation, Translator};
