use serde::Serialize;

/// Unit pricing of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Pricing {
    /// Machine translation, USD per 1M source characters
    PerMillionChars { cost: f64 },
    /// Text generation, USD per 1M tokens
    PerMillionTokens { input: f64, output: f64 },
    /// Embeddings, USD per 1M input tokens
    Embedding { cost: f64, dimension: u32 },
}

/// Model rate card entry
#[derive(Debug, Clone, Serialize)]
pub struct ModelRate {
    pub id: &'static str,
    pub display_name: &'static str,
    pub provider: &'static str,
    #[serde(flatten)]
    pub pricing: Pricing,
}

impl ModelRate {
    pub fn cost_per_million_chars(&self) -> f64 {
        match self.pricing {
            Pricing::PerMillionChars { cost } => cost,
            _ => 0.0,
        }
    }

    /// Input rate per 1M tokens (embedding models report their single rate)
    pub fn input_rate(&self) -> f64 {
        match self.pricing {
            Pricing::PerMillionTokens { input, .. } => input,
            Pricing::Embedding { cost, .. } => cost,
            Pricing::PerMillionChars { .. } => 0.0,
        }
    }

    pub fn output_rate(&self) -> f64 {
        match self.pricing {
            Pricing::PerMillionTokens { output, .. } => output,
            _ => 0.0,
        }
    }

    pub fn embedding_rate(&self) -> f64 {
        match self.pricing {
            Pricing::Embedding { cost, .. } => cost,
            _ => 0.0,
        }
    }

    pub fn dimension(&self) -> u32 {
        match self.pricing {
            Pricing::Embedding { dimension, .. } => dimension,
            _ => 0,
        }
    }

    /// Human-readable rate summary for tables
    pub fn rate_label(&self) -> String {
        match self.pricing {
            Pricing::PerMillionChars { cost } => format!("${:.2} / 1M chars", cost),
            Pricing::PerMillionTokens { input, output } => {
                format!("${:.3} in / ${:.3} out per 1M tokens", input, output)
            }
            Pricing::Embedding { cost, dimension } => {
                format!("${:.3} / 1M tokens, {}d", cost, dimension)
            }
        }
    }
}

pub static TRANSLATION_MODELS: &[ModelRate] = &[
    ModelRate {
        id: "gpt-4o-mini",
        display_name: "GPT-4o mini",
        provider: "openai",
        pricing: Pricing::PerMillionChars { cost: 0.15 },
    },
    ModelRate {
        id: "gemini-1.5-flash",
        display_name: "Gemini 1.5 Flash",
        provider: "google",
        pricing: Pricing::PerMillionChars { cost: 0.075 },
    },
    ModelRate {
        id: "claude-3-5-haiku",
        display_name: "Claude 3.5 Haiku",
        provider: "anthropic",
        pricing: Pricing::PerMillionChars { cost: 0.80 },
    },
    ModelRate {
        id: "google-nmt",
        display_name: "Google Cloud Translation (NMT)",
        provider: "google",
        pricing: Pricing::PerMillionChars { cost: 20.0 },
    },
    ModelRate {
        id: "deepl-pro",
        display_name: "DeepL API Pro",
        provider: "deepl",
        pricing: Pricing::PerMillionChars { cost: 25.0 },
    },
    ModelRate {
        id: "azure-translator",
        display_name: "Azure AI Translator",
        provider: "microsoft",
        pricing: Pricing::PerMillionChars { cost: 10.0 },
    },
];

pub static INFERENCE_MODELS: &[ModelRate] = &[
    ModelRate {
        id: "gpt-4o-mini",
        display_name: "GPT-4o mini",
        provider: "openai",
        pricing: Pricing::PerMillionTokens { input: 0.15, output: 0.60 },
    },
    ModelRate {
        id: "gpt-4o",
        display_name: "GPT-4o",
        provider: "openai",
        pricing: Pricing::PerMillionTokens { input: 2.50, output: 10.00 },
    },
    ModelRate {
        id: "claude-3-5-haiku",
        display_name: "Claude 3.5 Haiku",
        provider: "anthropic",
        pricing: Pricing::PerMillionTokens { input: 0.80, output: 4.00 },
    },
    ModelRate {
        id: "claude-3-5-sonnet",
        display_name: "Claude 3.5 Sonnet",
        provider: "anthropic",
        pricing: Pricing::PerMillionTokens { input: 3.00, output: 15.00 },
    },
    ModelRate {
        id: "gemini-1.5-flash",
        display_name: "Gemini 1.5 Flash",
        provider: "google",
        pricing: Pricing::PerMillionTokens { input: 0.075, output: 0.30 },
    },
    ModelRate {
        id: "gemini-1.5-pro",
        display_name: "Gemini 1.5 Pro",
        provider: "google",
        pricing: Pricing::PerMillionTokens { input: 1.25, output: 5.00 },
    },
];

pub static EMBEDDING_MODELS: &[ModelRate] = &[
    ModelRate {
        id: "text-embedding-3-small",
        display_name: "OpenAI text-embedding-3-small",
        provider: "openai",
        pricing: Pricing::Embedding { cost: 0.02, dimension: 1536 },
    },
    ModelRate {
        id: "text-embedding-3-large",
        display_name: "OpenAI text-embedding-3-large",
        provider: "openai",
        pricing: Pricing::Embedding { cost: 0.13, dimension: 3072 },
    },
    ModelRate {
        id: "voyage-3",
        display_name: "Voyage 3",
        provider: "voyage",
        pricing: Pricing::Embedding { cost: 0.06, dimension: 1024 },
    },
    ModelRate {
        id: "embed-english-v3",
        display_name: "Cohere Embed English v3",
        provider: "cohere",
        pricing: Pricing::Embedding { cost: 0.10, dimension: 1024 },
    },
    ModelRate {
        id: "text-embedding-004",
        display_name: "Google text-embedding-004",
        provider: "google",
        pricing: Pricing::Embedding { cost: 0.025, dimension: 768 },
    },
];
