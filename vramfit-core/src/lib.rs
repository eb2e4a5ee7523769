pub mod estimate;
pub mod quant;
pub mod recommend;

pub use estimate::{
    CalculationInput, InferenceMode, MemoryMode, estimate_on_disk_size, estimate_required_vram,
};
pub use quant::{KvCacheQuant, ModelQuant, kv_cache_quant_factor, model_quant_factor};
pub use recommend::{Recommendation, format_gb, recommend_hardware};
