//! Declarative validation rules for vadacl
//!
//! Entities declare validation rules per property. The rule compiler turns
//! those declarations, optionally merged with usage-specific overrides,
//! into validator functions that are bound to form controls. The
//! visibility helpers decide when the resulting messages are shown.
//!
//! # Examples
//!
//! ## Compiling Entity Rules
//!
//! ```
//! use serde_json::json;
//! use vadacl_validation::{Control, EntitySchema, FormControl, PropertyValidations, RuleCompiler};
//! use vadacl_i18n::{MessageResolver, MessageTable};
//!
//! let company = EntitySchema::new("Company").validate(
//!     "state",
//!     PropertyValidations::new()
//!         .rule("required", json!({ "message": "You must enter a state." }))
//!         .rule("pattern", json!({ "pattern": "[A-Z]{2}" })),
//! );
//!
//! let compiler = RuleCompiler::new(MessageResolver::new(MessageTable::english()));
//! let validators = compiler.apply_rules(Some(&company), Some("state"), None).unwrap();
//!
//! let state = FormControl::new(json!("Virginia")).with_validators(validators);
//! assert!(state.invalid());
//! assert!(state.errors().unwrap().contains("pattern"));
//! ```
//!
//! ## Collection Rules
//!
//! ```
//! use serde_json::json;
//! use vadacl_validation::{Control, FormControl, PropertyValidations, RuleCompiler, set_control_value};
//! use vadacl_i18n::{MessageResolver, MessageTable};
//!
//! let rules = PropertyValidations::new()
//!     .rule("equalValues", json!({ "message": "The passwords must match." }));
//! let compiler = RuleCompiler::new(MessageResolver::new(MessageTable::english()));
//! let validators = compiler.apply_collection_rule(None, None, Some(&rules)).unwrap();
//!
//! let mut passwords = FormControl::group([
//!     ("password", FormControl::new(json!("pswdCh3ck"))),
//!     ("confirm", FormControl::new(json!(""))),
//! ])
//! .with_validators(validators);
//! assert!(passwords.invalid());
//!
//! set_control_value(&mut passwords, json!({ "confirm": "pswdCh3ck" }), true);
//! assert!(passwords.valid());
//! ```

mod arguments;
mod control;
mod entity;
mod error;
mod kind;
mod outcome;
mod rules;
mod settings;
mod validators;
mod visibility;

pub use arguments::{Arguments, DeclaredParameters, build_argument_list, declared_parameters};
pub use control::{Control, FormControl, set_control_value};
pub use entity::{EntityCatalog, EntitySchema, Validatable};
pub use error::{Result, RuleError};
pub use kind::ValidationKind;
pub use outcome::{OutcomeDetail, ValidationErrors, ValidationOutcome};
pub use rules::{RuleCompiler, apply_collection_rule, apply_rules};
pub use settings::{EntityValidations, PropertyValidations, merge_validations};
pub use validators::{ValidatorFn, ValidatorLibrary, is_empty};
pub use visibility::{ErrorVisibility, should_show, visible_messages};
