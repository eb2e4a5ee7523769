use serde::{Deserialize, Serialize};

/// Weight quantization schemes the estimator understands.
///
/// Each maps to a fixed memory density in GB per billion parameters;
/// multiplying by 8 gives bits per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelQuant {
    F32,
    F16,
    Q8,
    Q6,
    Q5,
    Q4,
    Q3,
    Q2,
    Gptq,
    Awq,
}

impl ModelQuant {
    pub const ALL: [ModelQuant; 10] = [
        ModelQuant::F32,
        ModelQuant::F16,
        ModelQuant::Q8,
        ModelQuant::Q6,
        ModelQuant::Q5,
        ModelQuant::Q4,
        ModelQuant::Q3,
        ModelQuant::Q2,
        ModelQuant::Gptq,
        ModelQuant::Awq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ModelQuant::F32 => "F32",
            ModelQuant::F16 => "F16",
            ModelQuant::Q8 => "Q8",
            ModelQuant::Q6 => "Q6",
            ModelQuant::Q5 => "Q5",
            ModelQuant::Q4 => "Q4",
            ModelQuant::Q3 => "Q3",
            ModelQuant::Q2 => "Q2",
            ModelQuant::Gptq => "GPTQ",
            ModelQuant::Awq => "AWQ",
        }
    }

    /// GB of memory per billion parameters at this quantization.
    pub fn gb_per_billion(self) -> f64 {
        match self {
            ModelQuant::F32 => 4.0,
            ModelQuant::F16 => 2.0,
            ModelQuant::Q8 => 1.0,
            ModelQuant::Q6 => 0.75,
            ModelQuant::Q5 => 0.625,
            ModelQuant::Q4 => 0.5,
            ModelQuant::Q3 => 0.375,
            ModelQuant::Q2 => 0.25,
            ModelQuant::Gptq => 0.4,
            ModelQuant::Awq => 0.35,
        }
    }

    /// Parse a tag like `"q4"` or `"GPTQ"`. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let upper = tag.trim().to_uppercase();
        Self::ALL.iter().copied().find(|q| q.label() == upper)
    }
}

/// KV-cache quantization schemes. Smaller domain than [`ModelQuant`]
/// and an independent factor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KvCacheQuant {
    F32,
    F16,
    Q8,
    Q5,
    Q4,
}

impl KvCacheQuant {
    pub const ALL: [KvCacheQuant; 5] = [
        KvCacheQuant::F32,
        KvCacheQuant::F16,
        KvCacheQuant::Q8,
        KvCacheQuant::Q5,
        KvCacheQuant::Q4,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KvCacheQuant::F32 => "F32",
            KvCacheQuant::F16 => "F16",
            KvCacheQuant::Q8 => "Q8",
            KvCacheQuant::Q5 => "Q5",
            KvCacheQuant::Q4 => "Q4",
        }
    }

    pub fn gb_per_billion(self) -> f64 {
        match self {
            KvCacheQuant::F32 => 4.0,
            KvCacheQuant::F16 => 2.0,
            KvCacheQuant::Q8 => 1.0,
            KvCacheQuant::Q5 => 0.625,
            KvCacheQuant::Q4 => 0.5,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let upper = tag.trim().to_uppercase();
        Self::ALL.iter().copied().find(|q| q.label() == upper)
    }
}

/// Tag-level factor lookup. Unrecognized tags fall back to `1.0`
/// (8-bit density) rather than erroring.
pub fn model_quant_factor(tag: &str) -> f64 {
    ModelQuant::from_tag(tag).map_or(1.0, |q| q.gb_per_billion())
}

/// Tag-level KV-cache factor lookup, same fallback contract as
/// [`model_quant_factor`].
pub fn kv_cache_quant_factor(tag: &str) -> f64 {
    KvCacheQuant::from_tag(tag).map_or(1.0, |q| q.gb_per_billion())
}
