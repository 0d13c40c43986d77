//! The extension catalog and the three preload field values.
//!
//! A [`Catalog`] is built once at startup from the discovered extension
//! modules; its membership is fixed for the session and only the
//! per-entry inclusion flags change. [`PreloadFields`] holds the three
//! comma-separated values that eventually land in the configuration
//! file. The flags always mirror the token list of whichever field is
//! active, never a union of all three.

/// Configuration keys for the three preload stages, in field order.
pub const FIELD_KEYS: [&str; FIELD_COUNT] = [
    "shared_preload_libraries",
    "session_preload_libraries",
    "local_preload_libraries",
];

/// Number of preload fields.
pub const FIELD_COUNT: usize = 3;

/// One discoverable extension module and its inclusion flag for the
/// currently active preload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub included: bool,
}

/// The set of extensions discovered at startup, in name order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(names: Vec<String>) -> Self {
        let entries = names
            .into_iter()
            .map(|name| CatalogEntry {
                name,
                included: false,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.name.as_str())
    }

    /// Flip the inclusion flag of one entry. Out-of-range indices are a
    /// no-op.
    pub fn toggle(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.included = !entry.included;
        }
    }

    pub fn clear_flags(&mut self) {
        for entry in &mut self.entries {
            entry.included = false;
        }
    }

    /// Re-derive every inclusion flag from a field value's token list.
    /// Tokens are trimmed but otherwise compared verbatim; tokens that
    /// name nothing in the catalog are simply ignored here.
    pub fn sync_to_value(&mut self, value: &str) {
        let tokens: Vec<&str> = value.split(',').map(str::trim).collect();
        for entry in &mut self.entries {
            entry.included = tokens.iter().any(|t| *t == entry.name);
        }
    }

    /// Length of the longest entry name, for grid column sizing.
    pub fn longest_name(&self) -> usize {
        self.entries.iter().map(|e| e.name.len()).max().unwrap_or(0)
    }
}

/// The three preload field values as stored in the configuration file.
///
/// Values loaded from disk are kept verbatim, including tokens that do
/// not name a catalog entry; only a structural edit ([`append_token`] /
/// [`remove_token`]) re-serializes a value.
///
/// [`append_token`]: PreloadFields::append_token
/// [`remove_token`]: PreloadFields::remove_token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadFields {
    values: [String; FIELD_COUNT],
}

impl PreloadFields {
    pub fn get(&self, slot: usize) -> &str {
        self.values.get(slot).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, slot: usize, value: impl Into<String>) {
        if let Some(v) = self.values.get_mut(slot) {
            *v = value.into();
        }
    }

    /// Store `value` under its configuration key. Returns false for
    /// unrecognized keys.
    pub fn set_by_key(&mut self, key: &str, value: &str) -> bool {
        match FIELD_KEYS.iter().position(|k| *k == key) {
            Some(slot) => {
                self.set(slot, value);
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        for v in &mut self.values {
            v.clear();
        }
    }

    /// Append a token to a slot's list. The first entry gets no leading
    /// separator.
    pub fn append_token(&mut self, slot: usize, name: &str) {
        let Some(value) = self.values.get_mut(slot) else {
            return;
        };
        if value.is_empty() {
            value.push_str(name);
        } else {
            value.push_str(", ");
            value.push_str(name);
        }
    }

    /// Rebuild the slot's list without `name`: trim-split on commas,
    /// drop matching tokens, re-join the rest in order. Duplicates of
    /// `name` all disappear; everything else survives verbatim.
    pub fn remove_token(&mut self, slot: usize, name: &str) {
        let Some(value) = self.values.get_mut(slot) else {
            return;
        };
        let kept: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|t| *t != name)
            .collect();
        *value = kept.join(", ");
    }

    /// The three `key = 'value'` lines, in field order.
    pub fn assignment_lines(&self) -> [String; FIELD_COUNT] {
        let mut lines: [String; FIELD_COUNT] = Default::default();
        for (slot, line) in lines.iter_mut().enumerate() {
            *line = format!("{} = '{}'", FIELD_KEYS[slot], self.values[slot]);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn append_and_remove_tokens() {
        let mut fields = PreloadFields::default();
        fields.append_token(0, "pg_cron");
        assert_eq!(fields.get(0), "pg_cron");

        fields.append_token(0, "pg_cron_two");
        assert_eq!(fields.get(0), "pg_cron, pg_cron_two");

        fields.remove_token(0, "pg_cron");
        assert_eq!(fields.get(0), "pg_cron_two");
    }

    #[test]
    fn toggle_on_then_off_restores_value_exactly() {
        let mut fields = PreloadFields::default();
        fields.set(1, "auth_delay, passwordcheck");
        let before = fields.get(1).to_string();

        fields.append_token(1, "pg_stat_statements");
        fields.remove_token(1, "pg_stat_statements");
        assert_eq!(fields.get(1), before);
    }

    #[test]
    fn remove_preserves_unknown_tokens_and_order() {
        let mut fields = PreloadFields::default();
        fields.set(0, "not_installed ,  auth_delay,pg_cron");
        fields.remove_token(0, "auth_delay");
        assert_eq!(fields.get(0), "not_installed, pg_cron");
    }

    #[test]
    fn sync_to_value_matches_trimmed_tokens() {
        let mut cat = catalog(&["auth_delay", "pg_stat_statements"]);
        cat.sync_to_value("  auth_delay , something_else");
        assert!(cat.entries()[0].included);
        assert!(!cat.entries()[1].included);
    }

    #[test]
    fn sync_to_value_is_idempotent() {
        let mut cat = catalog(&["a", "b", "c"]);
        cat.sync_to_value("b, c");
        let first: Vec<bool> = cat.entries().iter().map(|e| e.included).collect();
        cat.sync_to_value("b, c");
        let second: Vec<bool> = cat.entries().iter().map(|e| e.included).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![false, true, true]);
    }

    #[test]
    fn sync_to_empty_value_clears_everything() {
        let mut cat = catalog(&["a", "b"]);
        cat.toggle(0);
        cat.sync_to_value("");
        assert!(cat.entries().iter().all(|e| !e.included));
    }

    #[test]
    fn toggle_out_of_range_is_noop() {
        let mut cat = catalog(&["a"]);
        cat.toggle(5);
        assert!(!cat.entries()[0].included);
    }

    #[test]
    fn assignment_lines_quote_values() {
        let mut fields = PreloadFields::default();
        fields.set(0, "a, b");
        let lines = fields.assignment_lines();
        assert_eq!(lines[0], "shared_preload_libraries = 'a, b'");
        assert_eq!(lines[1], "session_preload_libraries = ''");
        assert_eq!(lines[2], "local_preload_libraries = ''");
    }

    #[test]
    fn set_by_key_recognizes_the_three_keys() {
        let mut fields = PreloadFields::default();
        assert!(fields.set_by_key("session_preload_libraries", "x"));
        assert_eq!(fields.get(1), "x");
        assert!(!fields.set_by_key("max_connections", "100"));
    }
}
