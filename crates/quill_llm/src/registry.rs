use std::collections::BTreeMap;

use quill_model::ModelId;

use crate::model::ModelHandle;

/// A fixed set of models, looked up by ID.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelHandle>,
}

impl ModelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model, keyed by its own ID.
    #[must_use]
    pub fn with_model(mut self, model: ModelHandle) -> Self {
        self.models.insert(model.id().to_string(), model);
        self
    }

    #[must_use]
    pub fn get(&self, id: &ModelId) -> Option<ModelHandle> {
        self.models.get(&id.to_string()).cloned()
    }

    /// The handles in the registry, ordered by ID.
    pub fn models(&self) -> impl Iterator<Item = &ModelHandle> {
        self.models.values()
    }
}
