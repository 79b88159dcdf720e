//! Configuration for compiled registries.

use std::sync::Arc;

use tagtype_validate::{ArrayScan, ValidationConfig};

/// Configuration shared by every handle of a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Passed to every field validator.
    pub validation: ValidationConfig,

    /// Id field of lookup tables built by the loose adapter.
    pub id_field: Arc<str>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            validation: ValidationConfig::default(),
            id_field: "id".into(),
        }
    }
}

impl GeneratorConfig {
    /// Builder method to set the validation configuration.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Builder method to set the array scan mode.
    #[must_use]
    pub fn with_array_scan(mut self, scan: ArrayScan) -> Self {
        self.validation = self.validation.with_array_scan(scan);
        self
    }

    /// Builder method to set the lookup-table id field.
    #[must_use]
    pub fn with_id_field(mut self, id_field: impl Into<Arc<str>>) -> Self {
        self.id_field = id_field.into();
        self
    }
}
