// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program description translation.

use std::collections::HashMap;

/// Translates vendor program descriptions into the user's language.
///
/// Called at most once per program: the result is persisted with the
/// catalog and reused on later rebuilds.
pub trait Translator {
    /// Returns the translated text, or `None` to keep the vendor text.
    fn translate(&self, text: &str) -> Option<String>;
}

/// Keeps every description as sent by the vendor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate(&self, _text: &str) -> Option<String> {
        None
    }
}

/// Looks descriptions up in a fixed table.
impl Translator for HashMap<String, String> {
    fn translate(&self, text: &str) -> Option<String> {
        self.get(text).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_translation_keeps_text() {
        assert_eq!(NoTranslation.translate("Cotton"), None);
    }

    #[test]
    fn table_lookup() {
        let table: HashMap<String, String> =
            [("Cotton".to_string(), "Coton".to_string())].into_iter().collect();
        assert_eq!(table.translate("Cotton").as_deref(), Some("Coton"));
        assert_eq!(table.translate("Wool"), None);
    }
}
