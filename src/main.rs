mod display;

use clap::{Args, Parser, Subcommand};
use vramfit_core::{
    CalculationInput, InferenceMode, KvCacheQuant, MemoryMode, ModelQuant, estimate_on_disk_size,
    recommend_hardware,
};

#[derive(Parser)]
#[command(name = "vramfit")]
#[command(about = "Estimate VRAM, system RAM and GPU requirements for local LLMs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run a one-shot estimate with default inputs instead of the TUI
    #[arg(long)]
    cli: bool,

    /// Output results as JSON (for tool integration)
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate requirements for a model configuration
    Estimate(EstimateArgs),

    /// Show the quantization factor tables
    Quants,
}

#[derive(Args)]
struct EstimateArgs {
    /// Parameter count in billions
    #[arg(short, long, default_value_t = 7.0)]
    params: f64,

    /// Weight quantization: F32, F16, Q8, Q6, Q5, Q4, Q3, Q2, GPTQ, AWQ
    #[arg(short, long, default_value = "Q4")]
    quant: String,

    /// Context length in tokens
    #[arg(short, long, default_value_t = 4096)]
    context: u32,

    /// Disable the KV cache
    #[arg(long)]
    no_kv_cache: bool,

    /// KV cache quantization: F32, F16, Q8, Q5, Q4
    #[arg(long, default_value = "F16")]
    kv_quant: String,

    /// Inference mode: incremental or bulk
    #[arg(long, default_value = "incremental")]
    inference: String,

    /// Memory topology: discrete or unified
    #[arg(long, default_value = "discrete")]
    memory: String,

    /// Total system memory in GB
    #[arg(long, default_value_t = 32.0)]
    system_memory: f64,

    /// VRAM per GPU in GB
    #[arg(long, default_value_t = 24.0)]
    gpu_vram: f64,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

fn build_input(args: &EstimateArgs) -> Result<CalculationInput, String> {
    if !(1.0..=1000.0).contains(&args.params) {
        return Err("--params must be between 1 and 1000 billion".to_string());
    }
    if !(128..=32768).contains(&args.context) {
        return Err("--context must be between 128 and 32768 tokens".to_string());
    }
    if !(8.0..=512.0).contains(&args.system_memory) {
        return Err("--system-memory must be between 8 and 512 GB".to_string());
    }
    if args.gpu_vram <= 0.0 {
        return Err("--gpu-vram must be greater than 0".to_string());
    }

    let model_quant = ModelQuant::from_tag(&args.quant)
        .ok_or_else(|| format!("Unsupported quantization '{}'.", args.quant))?;
    let kv_cache_quant = KvCacheQuant::from_tag(&args.kv_quant)
        .ok_or_else(|| format!("Unsupported KV cache quantization '{}'.", args.kv_quant))?;

    let inference_mode = match args.inference.to_lowercase().as_str() {
        "incremental" => InferenceMode::Incremental,
        "bulk" => InferenceMode::Bulk,
        other => return Err(format!("Unknown inference mode '{}'.", other)),
    };
    let memory_mode = match args.memory.to_lowercase().as_str() {
        "discrete" => MemoryMode::DiscreteGpu,
        "unified" => MemoryMode::UnifiedMemory,
        other => return Err(format!("Unknown memory topology '{}'.", other)),
    };

    Ok(CalculationInput {
        params_b: args.params,
        model_quant,
        context_length: args.context,
        use_kv_cache: !args.no_kv_cache,
        kv_cache_quant,
        memory_mode,
        system_memory_gb: args.system_memory,
        gpu_vram_gb: args.gpu_vram,
        inference_mode,
    })
}

fn run_estimate(input: &CalculationInput, json: bool) {
    let recommendation = recommend_hardware(input);
    let on_disk_gb = estimate_on_disk_size(input.params_b, input.model_quant);

    if json {
        display::display_json_estimate(input, &recommendation, on_disk_gb);
    } else {
        display::display_estimate(input, &recommendation, on_disk_gb);
    }
}

fn main() {
    let cli = Cli::parse();

    // If a subcommand is given, use classic CLI mode
    if let Some(command) = cli.command {
        match command {
            Commands::Estimate(args) => match build_input(&args) {
                Ok(input) => run_estimate(&input, args.json || cli.json),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            },

            Commands::Quants => display::display_quant_tables(),
        }
        return;
    }

    // If --cli flag, print a one-shot estimate with the defaults
    if cli.cli {
        run_estimate(&CalculationInput::default(), cli.json);
        return;
    }

    // Default: launch TUI
    if let Err(e) = vramfit_tui::run() {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> EstimateArgs {
        EstimateArgs {
            params: 7.0,
            quant: "Q4".to_string(),
            context: 4096,
            no_kv_cache: false,
            kv_quant: "F16".to_string(),
            inference: "incremental".to_string(),
            memory: "discrete".to_string(),
            system_memory: 32.0,
            gpu_vram: 24.0,
            json: false,
        }
    }

    #[test]
    fn test_build_input_defaults() {
        let input = build_input(&default_args()).expect("defaults should validate");
        assert_eq!(input.model_quant, ModelQuant::Q4);
        assert!(input.use_kv_cache);
        assert_eq!(input.inference_mode, InferenceMode::Incremental);
    }

    #[test]
    fn test_build_input_rejects_out_of_range() {
        let too_small = EstimateArgs {
            params: 0.5,
            ..default_args()
        };
        assert!(build_input(&too_small).is_err());

        let short_context = EstimateArgs {
            context: 64,
            ..default_args()
        };
        assert!(build_input(&short_context).is_err());

        let low_memory = EstimateArgs {
            system_memory: 4.0,
            ..default_args()
        };
        assert!(build_input(&low_memory).is_err());
    }

    #[test]
    fn test_build_input_rejects_unknown_tags() {
        let bad_quant = EstimateArgs {
            quant: "Q9".to_string(),
            ..default_args()
        };
        assert!(build_input(&bad_quant).is_err());

        let bad_kv_quant = EstimateArgs {
            kv_quant: "Q6".to_string(),
            ..default_args()
        };
        assert!(build_input(&bad_kv_quant).is_err());

        let bad_mode = EstimateArgs {
            inference: "streaming".to_string(),
            ..default_args()
        };
        assert!(build_input(&bad_mode).is_err());
    }

    #[test]
    fn test_build_input_parses_mixed_case_tags() {
        let args = EstimateArgs {
            params: 13.0,
            quant: "f16".to_string(),
            no_kv_cache: true,
            kv_quant: "q8".to_string(),
            inference: "BULK".to_string(),
            memory: "Unified".to_string(),
            system_memory: 64.0,
            ..default_args()
        };
        let input = build_input(&args).expect("mixed case tags should parse");
        assert_eq!(input.model_quant, ModelQuant::F16);
        assert_eq!(input.kv_cache_quant, KvCacheQuant::Q8);
        assert!(!input.use_kv_cache);
        assert_eq!(input.inference_mode, InferenceMode::Bulk);
        assert_eq!(input.memory_mode, MemoryMode::UnifiedMemory);
    }
}
