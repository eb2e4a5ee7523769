use serde::Serialize;
use vramfit_core::{CalculationInput, KvCacheQuant, MemoryMode, ModelQuant, Recommendation};

#[derive(Serialize)]
struct EstimateReport<'a> {
    input: &'a CalculationInput,
    recommendation: &'a Recommendation,
    on_disk_gb: f64,
}

pub fn display_estimate(input: &CalculationInput, rec: &Recommendation, on_disk_gb: f64) {
    println!();
    println!(
        "Model: {}B @ {} | context {} | KV cache {}",
        vramfit_core::format_gb(input.params_b),
        input.model_quant.label(),
        input.context_length,
        if input.use_kv_cache {
            input.kv_cache_quant.label()
        } else {
            "off"
        }
    );
    println!(
        "Mode:  {} inference, {}",
        input.inference_mode.label().to_lowercase(),
        input.memory_mode.label().to_lowercase()
    );
    println!();
    println!("  Estimated VRAM    {:>10.2} GB", rec.vram_needed_gb);
    println!("  System RAM        {:>10.2} GB", rec.system_ram_needed_gb);
    println!("  On-disk size      {:>10.2} GB", on_disk_gb);
    println!("  Hardware          {}", rec.gpu_type);

    match input.memory_mode {
        MemoryMode::DiscreteGpu => {
            if rec.gpus_required == 0 {
                println!("  Does not fit in a reasonable GPU count");
            }
        }
        MemoryMode::UnifiedMemory => {
            if rec.fits_unified {
                println!("  Fits in unified memory");
            } else {
                println!("  Does not fit in unified memory");
            }
        }
    }
    println!();
}

pub fn display_json_estimate(input: &CalculationInput, rec: &Recommendation, on_disk_gb: f64) {
    let report = EstimateReport {
        input,
        recommendation: rec,
        on_disk_gb,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize estimate: {}", e),
    }
}

pub fn display_quant_tables() {
    println!();
    println!("Model quantization      GB / 1B params");
    for quant in ModelQuant::ALL {
        println!("  {:<20}  {}", quant.label(), quant.gb_per_billion());
    }
    println!();
    println!("KV cache quantization   GB / 1B params");
    for quant in KvCacheQuant::ALL {
        println!("  {:<20}  {}", quant.label(), quant.gb_per_billion());
    }
    println!();
}
