use anyhow::{Result, anyhow};
use jsonschema::JSONSchema;
use serde_json::Value;

pub struct DocumentValidator {
    schema: JSONSchema,
}

impl DocumentValidator {
    pub fn new(schema: &Value) -> Result<Self> {
        let schema =
            JSONSchema::compile(schema).map_err(|err| anyhow!("invalid JSON schema: {err}"))?;
        Ok(Self { schema })
    }

    pub fn validate(&self, document: &Value) -> Vec<String> {
        match self.schema.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| format!("{} {}", err.instance_path, err))
                .collect(),
        }
    }
}
