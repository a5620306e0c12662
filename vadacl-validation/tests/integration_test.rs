//! Integration tests for vadacl-validation

use serde_json::json;
use std::io::Write;
use vadacl_i18n::{MessageResolver, MessageTable};
use vadacl_validation::*;

const MESSAGES: &str = r#"{
    "required": "A value is required",
    "minlength": "The value is too short.",
    "pattern": "The value does not match the pattern.",
    "Company": {
        "name": {
            "required": "Please enter a name for the company."
        },
        "city": {
            "minlength": "The city name must be at least 2 characters long."
        },
        "state": {
            "required": "Please enter the state the company is based in.",
            "pattern": "The state should be a 2-letter capitalized abbreviation."
        }
    },
    "EnterpriseCompany": {
        "name": {
            "required": "Please enter a name for the enterprise."
        }
    }
}"#;

const CATALOG: &str = r#"{
    "entities": [
        {
            "type": "Company",
            "properties": ["name", "city", "state", "zip"],
            "validations": {
                "name": { "required": {}, "pattern": { "pattern": "[a-zA-Z]+" } },
                "city": { "required": {}, "minLength": { "minLength": 2 } },
                "state": {
                    "required": { "message": "You must enter a state." },
                    "pattern": { "pattern": "[A-Z]{2}" }
                },
                "zip": { "required": {}, "pattern": { "pattern": "[0-9]{5}" } }
            }
        },
        { "type": "EnterpriseCompany", "extends": "Company" }
    ]
}"#;

fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn compiler() -> RuleCompiler {
    let table = MessageTable::from_json(MESSAGES).unwrap();
    RuleCompiler::new(MessageResolver::new(table))
}

fn catalog() -> EntityCatalog {
    let file = temp_file(".json", CATALOG);
    EntityCatalog::load_file(file.path()).unwrap()
}

fn first_message(control: &FormControl) -> Option<String> {
    control
        .errors()
        .and_then(|errors| errors.iter().next())
        .and_then(|outcome| outcome.message().map(str::to_string))
}

#[test]
fn test_company_messages_by_entity_type() {
    let catalog = catalog();
    let compiler = compiler();
    let company = catalog.get("Company").unwrap();
    let enterprise = catalog.get("EnterpriseCompany").unwrap();

    let name = FormControl::empty().with_validators(compiler.apply_rules(Some(company), Some("name"), None).unwrap());
    assert_eq!(first_message(&name).as_deref(), Some("Please enter a name for the company."));

    let name = FormControl::empty().with_validators(compiler.apply_rules(Some(enterprise), Some("name"), None).unwrap());
    assert_eq!(first_message(&name).as_deref(), Some("Please enter a name for the enterprise."));

    // No enterprise entry for zip, so the default applies.
    let zip = FormControl::new(json!("2345")).with_validators(compiler.apply_rules(Some(enterprise), Some("zip"), None).unwrap());
    assert_eq!(first_message(&zip).as_deref(), Some("The value does not match the pattern."));
}

#[test]
fn test_declared_message_beats_locale_entry() {
    let catalog = catalog();
    let compiler = compiler();
    let company = catalog.get("Company").unwrap();

    let mut state = FormControl::new(json!("va")).with_validators(compiler.apply_rules(Some(company), Some("state"), None).unwrap());
    assert_eq!(
        first_message(&state).as_deref(),
        Some("The state should be a 2-letter capitalized abbreviation.")
    );

    set_control_value(&mut state, json!(""), true);
    assert_eq!(first_message(&state).as_deref(), Some("You must enter a state."));
    assert_eq!(visible_messages(&state, true), vec!["You must enter a state."]);
    assert!(should_show(&state, true));
}

#[test]
fn test_usage_overrides_on_top_of_catalog_rules() {
    let catalog = catalog();
    let company = catalog.get("Company").unwrap();
    let overrides = PropertyValidations::new()
        .rule("minLength", json!({ "minLength": 4, "message": "City names here are at least 4 letters." }))
        .rule("maxLength", json!({ "maxLength": 20 }));

    let validators = compiler().apply_rules(Some(company), Some("city"), Some(&overrides)).unwrap();
    assert_eq!(validators.len(), 3);

    let city = FormControl::new(json!("Rio")).with_validators(validators);
    let errors = city.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("minlength").unwrap().payload(),
        json!({ "requiredLength": 4, "actualLength": 3, "message": "City names here are at least 4 letters." })
    );
}

#[test]
fn test_patient_time_percentages() {
    let compiler = compiler();
    let rules = PropertyValidations::new()
        .rule("totals", json!({ "total": 100, "message": "The percentages must add up to 100." }));

    let mut percentages = FormControl::group([
        ("working", FormControl::empty()),
        ("playing", FormControl::empty()),
        ("sleeping", FormControl::empty()),
    ])
    .with_validators(compiler.apply_collection_rule(None, None, Some(&rules)).unwrap());

    let totals = percentages.errors().unwrap().get("totals").unwrap().clone();
    assert_eq!(totals.payload()["actualTotal"], serde_json::Value::Null);

    set_control_value(&mut percentages, json!({ "working": 40, "playing": "20" }), true);
    assert_eq!(
        percentages.errors().unwrap().get("totals").unwrap().payload()["actualTotal"],
        60
    );

    set_control_value(&mut percentages, json!({ "sleeping": 40 }), true);
    assert!(percentages.valid());
    assert!(!should_show(&percentages, false));

    // One field at a time, the way the form edits them.
    assert!(percentages.set_child_value("sleeping", json!(50), true));
    assert_eq!(
        percentages.errors().unwrap().get("totals").unwrap().payload()["actualTotal"],
        110
    );
    assert!(percentages.set_child_value("playing", json!(10), true));
    assert!(percentages.valid());
}

#[test]
fn test_excursion_choices_follow_selected_package() {
    let compiler = compiler();
    let package_rule = |count: u64| {
        PropertyValidations::new().rule(
            "withinTrueCount",
            json!({
                "minCount": 0,
                "maxCount": count,
                "message": format!("Based on the selected package, you can only select up to {count} excursions."),
            }),
        )
    };

    let mut excursions = FormControl::array((0..6).map(|_| FormControl::new(false)));
    excursions.set_validators(compiler.apply_collection_rule(None, None, Some(&package_rule(2))).unwrap());
    set_control_value(&mut excursions, json!([true, true, true, false, false, false]), true);

    assert_eq!(
        visible_messages(&excursions, true),
        vec!["Based on the selected package, you can only select up to 2 excursions."]
    );

    excursions.set_validators(compiler.apply_collection_rule(None, None, Some(&package_rule(3))).unwrap());
    excursions.update_value_and_validity();
    assert!(excursions.valid());

    assert!(excursions.set_element_value(4, json!(true), true));
    assert!(excursions.invalid());
}

#[test]
fn test_agreement_and_username_rules() {
    let patient = EntitySchema::new("Patient")
        .validate(
            "username",
            PropertyValidations::new()
                .rule("withinLength", json!({ "minLength": 8, "maxLength": 12, "message": "Must be 8-12 characters long." })),
        )
        .validate(
            "agreement",
            PropertyValidations::new().rule("requiredTrue", json!({ "message": "You must agree." })),
        );
    let compiler = compiler();

    let mut username = FormControl::empty().with_validators(compiler.apply_rules(Some(&patient), Some("username"), None).unwrap());
    assert!(username.valid());
    set_control_value(&mut username, json!("bob"), false);
    assert!(!should_show(&username, true));
    assert!(should_show(&username, false));
    set_control_value(&mut username, json!("bobby_tables"), true);
    assert!(username.valid());

    let agreement = FormControl::new(false).with_validators(compiler.apply_rules(Some(&patient), Some("agreement"), None).unwrap());
    assert_eq!(first_message(&agreement).as_deref(), Some("You must agree."));
}

#[test]
fn test_toml_catalog() {
    let file = temp_file(
        ".toml",
        r#"
[[entities]]
type = "UserProfile"

[entities.validations.gender.pattern]
pattern = "M|F"
message = 'Enter your gender as "M" or "F".'
"#,
    );
    let catalog = EntityCatalog::load_file(file.path()).unwrap();
    let profile = catalog.get("UserProfile").unwrap();

    let gender = FormControl::new(json!("X")).with_validators(compiler().apply_rules(Some(profile), Some("gender"), None).unwrap());
    assert_eq!(first_message(&gender).as_deref(), Some("Enter your gender as \"M\" or \"F\"."));
}

#[test]
fn test_bad_catalog_entries() {
    let file = temp_file(".json", r#"{ "entities": [ { "type": "Orphan", "extends": "Nobody" } ] }"#);
    assert!(matches!(
        EntityCatalog::load_file(file.path()),
        Err(RuleError::UnknownParent { .. })
    ));

    let file = temp_file(".yaml", "entities: []");
    assert!(matches!(EntityCatalog::load_file(file.path()), Err(RuleError::Config(_))));
}

#[test]
fn test_child_only_rules_compile() {
    let file = temp_file(
        ".json",
        r#"{ "entities": [
            { "type": "Company", "properties": ["name"] },
            { "type": "EnterpriseCompany", "extends": "Company", "validations": { "ceo": { "required": {} } } }
        ] }"#,
    );
    let catalog = EntityCatalog::load_file(file.path()).unwrap();
    let enterprise = catalog.get("EnterpriseCompany").unwrap();

    let validators = compiler().apply_rules(Some(enterprise), Some("ceo"), None).unwrap();
    assert_eq!(validators.len(), 1);
    let ceo = FormControl::empty().with_validators(validators);
    assert_eq!(first_message(&ceo).as_deref(), Some("A value is required"));
}
