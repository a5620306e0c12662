// vadacl - Declarative validation rules for form controls
//
// Entities declare their validation rules once; forms compile them into
// validators, optionally overriding settings per usage, and show the
// resulting locale-aware messages according to a visibility policy.

use thiserror::Error;

// Re-export member crates
pub use vadacl_config;
pub use vadacl_i18n;
pub use vadacl_log;
pub use vadacl_validation;

pub use vadacl_config::VadaclConfig;

/// Startup failure.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] vadacl_config::ConfigError),

    #[error(transparent)]
    Messages(#[from] vadacl_i18n::I18nError),

    #[error(transparent)]
    Rules(#[from] vadacl_validation::RuleError),
}

pub type Result<T> = std::result::Result<T, InitError>;

/// Bootstrap from the environment.
///
/// Loads `.env` when present, initializes logging from the `VADACL_LOG_*`
/// variables, and installs the message table named by `VADACL_MESSAGES`
/// as the process-wide table. Call once at startup, before compiling any
/// rules: validators keep the messages resolved when they were compiled.
pub fn init() -> Result<VadaclConfig> {
    vadacl_config::load_dotenv(None)?;
    vadacl_log::init();

    let config = VadaclConfig::from_env();
    if let Some(path) = &config.messages_path {
        vadacl_i18n::load_global(path)?;
        vadacl_log::info!("Loaded validation messages from {}", path.display());
    }
    Ok(config)
}

/// Load the entity catalog named by `VADACL_RULES`, if configured.
pub fn load_catalog(config: &VadaclConfig) -> Result<Option<vadacl_validation::EntityCatalog>> {
    let Some(path) = &config.rules_path else {
        return Ok(None);
    };
    let catalog = vadacl_validation::EntityCatalog::load_file(path)?;
    vadacl_log::info!("Loaded {} entity schemas from {}", catalog.len(), path.display());
    Ok(Some(catalog))
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{InitError, VadaclConfig, init, load_catalog};
    pub use vadacl_i18n::{MessageContext, MessageResolver, MessageTable};
    pub use vadacl_validation::{
        Control, EntityCatalog, EntitySchema, EntityValidations, ErrorVisibility, FormControl, PropertyValidations,
        RuleCompiler, RuleError, Validatable, ValidationErrors, ValidationKind, ValidationOutcome, ValidatorFn,
        apply_collection_rule, apply_rules, merge_validations, set_control_value, should_show, visible_messages,
    };
}
