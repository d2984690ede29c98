//! Schema validation for raw device descriptions.
//!
//! The JSON schema ships embedded in the binary. Violations are collected in
//! one pass, sorted by their position in the document, so a user sees every
//! problem at once; nothing downstream runs on a document that failed here.

use jsonschema::{Draft, Validator};
use once_cell::sync::Lazy;
use thiserror::Error;

const CONFIG_SCHEMA: &str = include_str!("../../resources/schema/config.schema.json");

static VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).expect("embedded schema is valid JSON");
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .expect("embedded schema compiles")
});

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("configuration does not match the schema:\n{}", .0.join("\n"))]
    Violations(Vec<String>),
    #[error("could not convert document for schema validation: {0}")]
    Convert(#[from] serde_json::Error),
}

pub fn validate_document(doc: &serde_yaml_ng::Value) -> Result<(), SchemaError> {
    let instance = serde_json::to_value(doc)?;
    let mut violations: Vec<(String, String)> = VALIDATOR
        .iter_errors(&instance)
        .map(|err| (err.instance_path.to_string(), err.to_string()))
        .collect();
    if violations.is_empty() {
        return Ok(());
    }
    violations.sort();
    Err(SchemaError::Violations(
        violations
            .into_iter()
            .map(|(path, message)| {
                if path.is_empty() {
                    message
                } else {
                    format!("{path}: {message}")
                }
            })
            .collect(),
    ))
}
