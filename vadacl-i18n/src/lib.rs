//! Validation messages for vadacl
//!
//! Resolves the human-readable message attached to a validation outcome.
//! Messages come from three tiers, highest precedence first:
//!
//! 1. a message given explicitly with the rule,
//! 2. an entry for the entity type and property in the locale table,
//! 3. the locale table's default for the validation kind.
//!
//! # Quick Start
//!
//! ```
//! use vadacl_i18n::{MessageContext, MessageResolver, MessageTable};
//!
//! let table = MessageTable::english()
//!     .with_entity_message("Company", "name", "required", "Please enter a name for the company.");
//! let resolver = MessageResolver::new(table);
//!
//! let name = MessageContext::new(Some("Company"), Some("name"));
//! assert_eq!(
//!     resolver.message_for(None, "required", &name).as_deref(),
//!     Some("Please enter a name for the company.")
//! );
//! assert_eq!(
//!     resolver.message_for(None, "minLength", &name).as_deref(),
//!     Some("The value is too short.")
//! );
//! ```

mod error;
mod messages;
mod resolver;

pub use error::I18nError;
pub use messages::MessageTable;
pub use resolver::{
    MessageContext, MessageResolver, global_table, install_global, load_global,
};

/// Result type for message table operations
pub type Result<T> = std::result::Result<T, I18nError>;
