//! Message Resolver
//!
//! Resolves the user-facing message for a validation kind. A resolver
//! holds a shared, immutable snapshot of a [`MessageTable`]; the
//! process-wide table is swapped as a whole at startup, never edited in
//! place, so validators compiled earlier keep the message they resolved.

use crate::{MessageTable, Result};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

static GLOBAL_TABLE: Lazy<RwLock<Arc<MessageTable>>> =
    Lazy::new(|| RwLock::new(Arc::new(MessageTable::english())));

/// Replace the process-wide message table. Returns the previous table.
pub fn install_global(table: MessageTable) -> Arc<MessageTable> {
    let table = Arc::new(table);
    let previous = std::mem::replace(&mut *GLOBAL_TABLE.write(), table);
    vadacl_log::info!(target: "vadacl::i18n", "Installed process-wide message table");
    previous
}

/// Load a JSON or TOML table from disk and install it process-wide.
pub fn load_global(path: impl AsRef<Path>) -> Result<()> {
    let table = MessageTable::load_file(path)?;
    install_global(table);
    Ok(())
}

/// Snapshot of the process-wide table.
pub fn global_table() -> Arc<MessageTable> {
    Arc::clone(&GLOBAL_TABLE.read())
}

/// Names used for entity/property specific lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MessageContext {
    pub entity_type: Option<String>,
    pub property: Option<String>,
}

impl MessageContext {
    pub fn new(entity_type: Option<&str>, property: Option<&str>) -> Self {
        Self {
            entity_type: entity_type.map(str::to_string),
            property: property.map(str::to_string),
        }
    }

    /// No entity or property: only defaults apply.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Resolves messages against one table snapshot.
#[derive(Debug, Clone)]
pub struct MessageResolver {
    table: Arc<MessageTable>,
}

impl MessageResolver {
    pub fn new(table: MessageTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn from_shared(table: Arc<MessageTable>) -> Self {
        Self { table }
    }

    /// Resolver over the table installed process-wide at the time of the
    /// call.
    pub fn global() -> Self {
        Self::from_shared(global_table())
    }

    pub fn table(&self) -> &MessageTable {
        &self.table
    }

    /// Table lookup without an explicit message.
    pub fn resolve(&self, kind: &str, entity_type: Option<&str>, property: Option<&str>) -> Option<String> {
        self.table.resolve(kind, entity_type, property).map(str::to_string)
    }

    /// Message for a validator: a non-empty `explicit` message first, then
    /// the entity/property entry, then the kind default.
    pub fn message_for(&self, explicit: Option<&str>, kind: &str, context: &MessageContext) -> Option<String> {
        match explicit {
            Some(message) if !message.is_empty() => Some(message.to_string()),
            _ => self.resolve(kind, context.entity_type.as_deref(), context.property.as_deref()),
        }
    }
}

impl Default for MessageResolver {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> MessageResolver {
        MessageResolver::new(
            MessageTable::english()
                .with_entity_message("Company", "state", "pattern", "Use a 2-letter abbreviation."),
        )
    }

    #[test]
    fn test_explicit_message_wins() {
        let context = MessageContext::new(Some("Company"), Some("state"));
        assert_eq!(
            resolver().message_for(Some("Custom"), "pattern", &context).as_deref(),
            Some("Custom")
        );
    }

    #[test]
    fn test_empty_explicit_message_is_ignored() {
        let context = MessageContext::new(Some("Company"), Some("state"));
        assert_eq!(
            resolver().message_for(Some(""), "pattern", &context).as_deref(),
            Some("Use a 2-letter abbreviation.")
        );
    }

    #[test]
    fn test_specific_then_default() {
        let resolver = resolver();
        let state = MessageContext::new(Some("Company"), Some("state"));
        let zip = MessageContext::new(Some("Company"), Some("zip"));

        assert_eq!(
            resolver.message_for(None, "pattern", &state).as_deref(),
            Some("Use a 2-letter abbreviation.")
        );
        assert_eq!(
            resolver.message_for(None, "pattern", &zip).as_deref(),
            Some("The value does not match the pattern.")
        );
        assert_eq!(resolver.message_for(None, "equalvalues", &MessageContext::none()), None);
    }

    #[test]
    fn test_shared_table_resolves_defaults() {
        let snapshot = MessageResolver::from_shared(Arc::new(MessageTable::english()));
        let before = snapshot.resolve("required", None, None);
        assert_eq!(before.as_deref(), Some("A value is required"));
        assert!(snapshot.table().default_message("totals").is_some());
    }
}
