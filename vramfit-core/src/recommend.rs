use serde::{Deserialize, Serialize};

use crate::estimate::{CalculationInput, InferenceMode, MemoryMode, estimate_required_vram};

/// Minimum system RAM to recommend regardless of model size.
const SYSTEM_RAM_FLOOR_GB: f64 = 8.0;

/// Headroom applied to required VRAM before dividing across GPUs.
const GPU_SAFETY_FACTOR: f64 = 1.2;

/// Beyond this many GPUs the configuration is reported as infeasible
/// rather than as an arbitrarily large count.
const MAX_GPUS: u32 = 8;

/// Hardware recommendation for one input tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Human-readable description of the GPU setup (or unified pool).
    pub gpu_type: String,
    /// Estimated VRAM requirement in GB, rounded to 2 decimals.
    pub vram_needed_gb: f64,
    /// Whether a unified-memory system with the given pool fits the model.
    pub fits_unified: bool,
    pub system_ram_needed_gb: f64,
    /// Discrete GPUs needed. `0` in unified mode, or when the discrete
    /// configuration is infeasible.
    pub gpus_required: u32,
}

/// Format a GB quantity for labels: whole values print without a
/// fractional part (`24`, not `24.0`).
pub fn format_gb(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the full recommendation record: VRAM need, system RAM
/// recommendation, unified-memory fit, and GPU count with label.
pub fn recommend_hardware(input: &CalculationInput) -> Recommendation {
    let required_vram = estimate_required_vram(input);

    let bulk_ram = match input.inference_mode {
        InferenceMode::Bulk => f64::from(input.context_length) / 1024.0,
        InferenceMode::Incremental => 0.0,
    };
    let base_system_ram = input.params_b * input.model_quant.gb_per_billion() * 0.5 + bulk_ram;
    let system_ram_needed_gb = base_system_ram.max(SYSTEM_RAM_FLOOR_GB);

    let fits_unified = input.memory_mode == MemoryMode::UnifiedMemory
        && input.system_memory_gb >= required_vram;

    let (gpu_type, gpus_required) = match input.memory_mode {
        MemoryMode::DiscreteGpu => {
            let gpus = (required_vram * GPU_SAFETY_FACTOR / input.gpu_vram_gb).ceil() as u32;
            let vram = format_gb(input.gpu_vram_gb);
            if gpus <= 1 {
                (format!("Single {vram}GB GPU"), gpus)
            } else if gpus <= MAX_GPUS {
                (format!("{gpus}x {vram}GB GPUs"), gpus)
            } else {
                (format!("Exceeds {MAX_GPUS}x {vram}GB GPUs"), 0)
            }
        }
        MemoryMode::UnifiedMemory => {
            let pool = format_gb(input.system_memory_gb);
            (format!("Unified memory ({pool}GB)"), 0)
        }
    };

    Recommendation {
        gpu_type,
        vram_needed_gb: round2(required_vram),
        fits_unified,
        system_ram_needed_gb,
        gpus_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quant::ModelQuant;

    fn discrete_input(params_b: f64, quant: ModelQuant, gpu_vram_gb: f64) -> CalculationInput {
        CalculationInput {
            params_b,
            model_quant: quant,
            context_length: 4096,
            use_kv_cache: false,
            gpu_vram_gb,
            inference_mode: InferenceMode::Incremental,
            ..CalculationInput::default()
        }
    }

    #[test]
    fn test_single_gpu_label() {
        let rec = recommend_hardware(&discrete_input(7.0, ModelQuant::Q4, 24.0));
        // 3.85 GB required, well under one 24GB card
        assert_eq!(rec.gpus_required, 1);
        assert_eq!(rec.gpu_type, "Single 24GB GPU");
    }

    #[test]
    fn test_multi_gpu_count_and_label() {
        let rec = recommend_hardware(&discrete_input(65.0, ModelQuant::Q4, 24.0));
        // required 35.75, with safety buffer 42.9 -> 2 cards
        assert!((rec.vram_needed_gb - 35.75).abs() < 1e-9);
        assert_eq!(rec.gpus_required, 2);
        assert_eq!(rec.gpu_type, "2x 24GB GPUs");
    }

    #[test]
    fn test_exceeding_eight_gpus_is_infeasible() {
        let rec = recommend_hardware(&discrete_input(180.0, ModelQuant::F16, 24.0));
        // required 396, buffered 475.2 -> 20 cards
        assert_eq!(rec.gpus_required, 0);
        assert_eq!(rec.gpu_type, "Exceeds 8x 24GB GPUs");
    }

    #[test]
    fn test_unified_memory_fit() {
        let input = CalculationInput {
            memory_mode: MemoryMode::UnifiedMemory,
            system_memory_gb: 128.0,
            ..discrete_input(65.0, ModelQuant::Q4, 24.0)
        };
        let rec = recommend_hardware(&input);
        assert!(rec.fits_unified);
        assert_eq!(rec.gpus_required, 0);
        assert_eq!(rec.gpu_type, "Unified memory (128GB)");
    }

    #[test]
    fn test_unified_memory_too_small() {
        let input = CalculationInput {
            memory_mode: MemoryMode::UnifiedMemory,
            system_memory_gb: 16.0,
            ..discrete_input(65.0, ModelQuant::Q4, 24.0)
        };
        let rec = recommend_hardware(&input);
        assert!(!rec.fits_unified);
        assert_eq!(rec.gpus_required, 0);
    }

    #[test]
    fn test_discrete_mode_never_fits_unified() {
        let rec = recommend_hardware(&discrete_input(1.0, ModelQuant::Q4, 24.0));
        assert!(!rec.fits_unified);
    }

    #[test]
    fn test_system_ram_floor() {
        let rec = recommend_hardware(&discrete_input(1.0, ModelQuant::Q4, 24.0));
        assert_eq!(rec.system_ram_needed_gb, 8.0);
    }

    #[test]
    fn test_system_ram_includes_bulk_context_term() {
        let input = CalculationInput {
            inference_mode: InferenceMode::Bulk,
            ..discrete_input(30.0, ModelQuant::Q8, 24.0)
        };
        let rec = recommend_hardware(&input);
        // 30 * 1.0 * 0.5 + 4096 / 1024
        assert!((rec.system_ram_needed_gb - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_vram_rounded_to_two_decimals() {
        let rec = recommend_hardware(&discrete_input(1.0, ModelQuant::Gptq, 24.0));
        // 0.4 * 1.1 carries float noise past two decimals before rounding
        assert_eq!(rec.vram_needed_gb, 0.44);
    }

    #[test]
    fn test_recommendation_is_pure() {
        let input = discrete_input(65.0, ModelQuant::Q4, 24.0);
        assert_eq!(recommend_hardware(&input), recommend_hardware(&input));
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(24.0), "24");
        assert_eq!(format_gb(11.5), "11.5");
        assert_eq!(format_gb(512.0), "512");
    }
}
