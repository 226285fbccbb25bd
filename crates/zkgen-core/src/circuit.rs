use crate::exec::Definition;
use crate::field::FieldConfig;
use crate::{CoreError, Result};
use indexmap::IndexMap;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Compiled artifact: everything the runtime needs to instantiate templates and call functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(with = "crate::decimal")]
    pub prime: BigUint,
    #[serde(with = "crate::decimal")]
    pub mask: BigUint,
    pub templates: IndexMap<String, Definition>,
    pub functions: IndexMap<String, Definition>,
    /// Positional parameter names per function, used to bind call arguments by name.
    pub function_params: IndexMap<String, Vec<String>>,
}

impl Circuit {
    pub fn new(field: &FieldConfig) -> Self {
        Self {
            prime: field.prime.clone(),
            mask: field.mask.clone(),
            templates: IndexMap::new(),
            functions: IndexMap::new(),
            function_params: IndexMap::new(),
        }
    }

    pub fn field(&self) -> Result<FieldConfig> {
        FieldConfig::new(self.prime.clone(), self.mask.clone())
    }

    pub fn template(&self, name: &str) -> Option<&Definition> {
        self.templates.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Definition> {
        self.functions.get(name)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(CoreError::from)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        crate::from_json_unbounded(text)
    }
}
