use serde::{Deserialize, Serialize};

use crate::quant::{KvCacheQuant, ModelQuant};

/// Context length at which the heuristic overhead fractions below were
/// calibrated; context memory scales linearly from here.
const REFERENCE_CONTEXT_TOKENS: f64 = 2048.0;

/// Fraction of base model memory an F16 KV cache occupies at the
/// reference context length during incremental decoding.
const KV_CACHE_FRACTION: f64 = 0.2;

/// Fraction of base model memory needed for full-context activation
/// storage at the reference context length in bulk mode.
const BULK_ACTIVATION_FRACTION: f64 = 0.5;

/// Additional KV-cache fraction on top of bulk activation storage.
const BULK_KV_FRACTION: f64 = 0.1;

/// Flat multiplier for allocator fragmentation and auxiliary buffers.
const MEMORY_OVERHEAD: f64 = 1.1;

/// How the model consumes its context window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMode {
    /// Token-by-token generation reusing cached attention state.
    Incremental,
    /// Whole-context processing in one pass.
    Bulk,
}

impl InferenceMode {
    pub fn label(self) -> &'static str {
        match self {
            InferenceMode::Incremental => "Incremental",
            InferenceMode::Bulk => "Bulk",
        }
    }
}

/// Where model memory lives: dedicated GPU VRAM or a shared pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryMode {
    DiscreteGpu,
    UnifiedMemory,
}

impl MemoryMode {
    pub fn label(self) -> &'static str {
        match self {
            MemoryMode::DiscreteGpu => "Discrete GPU",
            MemoryMode::UnifiedMemory => "Unified memory",
        }
    }
}

/// The full input tuple for one estimate. Plain values only; the
/// estimator holds no state between calls.
///
/// Range enforcement (parameter count, context length, memory sizes)
/// belongs to the caller. The estimator computes whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Parameter count in billions.
    pub params_b: f64,
    pub model_quant: ModelQuant,
    /// Context window in tokens.
    pub context_length: u32,
    pub use_kv_cache: bool,
    pub kv_cache_quant: KvCacheQuant,
    pub memory_mode: MemoryMode,
    /// Total system memory in GB. Relevant in unified mode.
    pub system_memory_gb: f64,
    /// Per-GPU VRAM in GB. Relevant in discrete mode.
    pub gpu_vram_gb: f64,
    pub inference_mode: InferenceMode,
}

impl Default for CalculationInput {
    fn default() -> Self {
        CalculationInput {
            params_b: 7.0,
            model_quant: ModelQuant::Q4,
            context_length: 4096,
            use_kv_cache: true,
            kv_cache_quant: KvCacheQuant::F16,
            memory_mode: MemoryMode::DiscreteGpu,
            system_memory_gb: 32.0,
            gpu_vram_gb: 24.0,
            inference_mode: InferenceMode::Incremental,
        }
    }
}

/// Estimate total VRAM in GB for running the model described by
/// `input`: fixed weight memory plus context-dependent memory, with a
/// flat overhead on top.
pub fn estimate_required_vram(input: &CalculationInput) -> f64 {
    let base_model_mem = input.params_b * input.model_quant.gb_per_billion();
    let context_scale = f64::from(input.context_length) / REFERENCE_CONTEXT_TOKENS;

    let context_mem = match input.inference_mode {
        InferenceMode::Incremental => {
            if input.use_kv_cache {
                base_model_mem
                    * KV_CACHE_FRACTION
                    * context_scale
                    * input.kv_cache_quant.gb_per_billion()
            } else {
                0.0
            }
        }
        InferenceMode::Bulk => {
            let activations = base_model_mem * BULK_ACTIVATION_FRACTION * context_scale;
            let kv = if input.use_kv_cache {
                base_model_mem
                    * BULK_KV_FRACTION
                    * input.kv_cache_quant.gb_per_billion()
                    * context_scale
            } else {
                0.0
            };
            activations + kv
        }
    };

    (base_model_mem + context_mem) * MEMORY_OVERHEAD
}

/// Estimate serialized model size on disk in GB.
///
/// Weight bytes only: no fragmentation overhead, since a stored file
/// has none. Bits-per-parameter is `gb_per_billion() * 8`, and the
/// bits-to-GB conversion cancels back to a single multiplication.
pub fn estimate_on_disk_size(params_b: f64, quant: ModelQuant) -> f64 {
    params_b * quant.gb_per_billion()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn base_input() -> CalculationInput {
        CalculationInput::default()
    }

    #[test]
    fn test_no_kv_cache_incremental_is_weights_plus_overhead() {
        for quant in ModelQuant::ALL {
            let input = CalculationInput {
                params_b: 30.0,
                model_quant: quant,
                use_kv_cache: false,
                inference_mode: InferenceMode::Incremental,
                ..base_input()
            };
            let expected = 30.0 * quant.gb_per_billion() * 1.1;
            assert!(approx_eq(estimate_required_vram(&input), expected));
        }
    }

    #[test]
    fn test_worked_example_65b_q4() {
        let input = CalculationInput {
            params_b: 65.0,
            model_quant: ModelQuant::Q4,
            context_length: 4096,
            use_kv_cache: false,
            inference_mode: InferenceMode::Incremental,
            ..base_input()
        };
        assert!(approx_eq(estimate_required_vram(&input), 35.75));
    }

    #[test]
    fn test_worked_example_13b_f16_with_kv_cache() {
        let input = CalculationInput {
            params_b: 13.0,
            model_quant: ModelQuant::F16,
            context_length: 2048,
            use_kv_cache: true,
            kv_cache_quant: KvCacheQuant::F16,
            inference_mode: InferenceMode::Incremental,
            ..base_input()
        };
        // base 26, kv cache 26 * 0.2 * 1 * 2.0 = 10.4, total 36.4 * 1.1
        assert!(approx_eq(estimate_required_vram(&input), 40.04));
    }

    #[test]
    fn test_bulk_mode_adds_activation_and_kv_terms() {
        let without_kv = CalculationInput {
            params_b: 13.0,
            model_quant: ModelQuant::Q8,
            context_length: 2048,
            use_kv_cache: false,
            inference_mode: InferenceMode::Bulk,
            ..base_input()
        };
        // base 13, activations 13 * 0.5 = 6.5, total 19.5 * 1.1
        assert!(approx_eq(estimate_required_vram(&without_kv), 21.45));

        let with_kv = CalculationInput {
            use_kv_cache: true,
            kv_cache_quant: KvCacheQuant::Q4,
            ..without_kv
        };
        // adds 13 * 0.1 * 0.5 = 0.65 before overhead
        assert!(approx_eq(estimate_required_vram(&with_kv), 22.165));
    }

    #[test]
    fn test_monotonic_in_context_length() {
        for mode in [InferenceMode::Incremental, InferenceMode::Bulk] {
            let mut previous = 0.0;
            for context in [128, 512, 2048, 8192, 32768] {
                let input = CalculationInput {
                    context_length: context,
                    use_kv_cache: true,
                    inference_mode: mode,
                    ..base_input()
                };
                let vram = estimate_required_vram(&input);
                assert!(vram >= previous, "context {context} regressed in {mode:?}");
                previous = vram;
            }
        }
    }

    #[test]
    fn test_on_disk_size_linear_in_params() {
        for quant in ModelQuant::ALL {
            let single = estimate_on_disk_size(13.0, quant);
            let double = estimate_on_disk_size(26.0, quant);
            assert!(approx_eq(double, 2.0 * single), "{}", quant.label());
        }
    }

    #[test]
    fn test_on_disk_size_has_no_overhead() {
        assert!(approx_eq(estimate_on_disk_size(65.0, ModelQuant::Q4), 32.5));
        assert!(approx_eq(estimate_on_disk_size(7.0, ModelQuant::F16), 14.0));
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let input = CalculationInput {
            params_b: 70.0,
            context_length: 16384,
            use_kv_cache: true,
            inference_mode: InferenceMode::Bulk,
            ..base_input()
        };
        assert_eq!(
            estimate_required_vram(&input).to_bits(),
            estimate_required_vram(&input).to_bits()
        );
    }
}
