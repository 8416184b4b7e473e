pub mod models;

pub use models::{ModelRate, Pricing};

use serde::Serialize;
use tracing::warn;

/// Model families, one cost-unit convention each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Catalog {
    /// Priced per million characters
    Translation,
    /// Priced per million input/output tokens
    Inference,
    /// Priced per million tokens, with a vector dimension
    Embedding,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Translation, Catalog::Inference, Catalog::Embedding];

    /// All entries of this catalog; the first one is the default
    pub fn models(self) -> &'static [ModelRate] {
        match self {
            Catalog::Translation => models::TRANSLATION_MODELS,
            Catalog::Inference => models::INFERENCE_MODELS,
            Catalog::Embedding => models::EMBEDDING_MODELS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Catalog::Translation => "translation",
            Catalog::Inference => "inference",
            Catalog::Embedding => "embedding",
        }
    }

    /// Exact lookup by model id
    pub fn find(self, id: &str) -> Option<&'static ModelRate> {
        self.models().iter().find(|m| m.id == id)
    }

    /// Lookup that never fails: unknown ids resolve to the default entry
    pub fn resolve(self, id: &str) -> &'static ModelRate {
        match self.find(id) {
            Some(model) => model,
            None => {
                let fallback = &self.models()[0];
                warn!(
                    catalog = self.name(),
                    requested = id,
                    fallback = fallback.id,
                    "Unknown model id, using catalog default"
                );
                fallback
            }
        }
    }
}

pub fn translation_model(id: &str) -> &'static ModelRate {
    Catalog::Translation.resolve(id)
}

pub fn inference_model(id: &str) -> &'static ModelRate {
    Catalog::Inference.resolve(id)
}

pub fn embedding_model(id: &str) -> &'static ModelRate {
    Catalog::Embedding.resolve(id)
}
