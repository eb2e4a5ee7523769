use vramfit_core::{
    CalculationInput, InferenceMode, KvCacheQuant, MemoryMode, ModelQuant, Recommendation,
    estimate_on_disk_size, format_gb, recommend_hardware,
};

use crate::theme::ThemePreference;

// Preset ladders the arrow keys step through. Endpoints are the
// supported input ranges; the estimator itself never clamps.
const PARAMS_LADDER: &[f64] = &[
    1.0, 2.0, 3.0, 4.0, 7.0, 8.0, 13.0, 14.0, 22.0, 27.0, 30.0, 32.0, 65.0, 70.0, 104.0, 120.0,
    180.0, 235.0, 405.0, 671.0, 1000.0,
];
const CONTEXT_LADDER: &[u32] = &[128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768];
const SYSTEM_MEMORY_LADDER: &[f64] = &[
    8.0, 16.0, 24.0, 32.0, 48.0, 64.0, 96.0, 128.0, 192.0, 256.0, 384.0, 512.0,
];
const GPU_VRAM_LADDER: &[f64] = &[
    4.0, 6.0, 8.0, 11.0, 12.0, 16.0, 20.0, 24.0, 32.0, 40.0, 48.0, 80.0, 96.0, 141.0, 192.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Params,
    ModelQuant,
    ContextLength,
    UseKvCache,
    KvCacheQuant,
    InferenceMode,
    MemoryMode,
    SystemMemory,
    GpuVram,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Params,
        Field::ModelQuant,
        Field::ContextLength,
        Field::UseKvCache,
        Field::KvCacheQuant,
        Field::InferenceMode,
        Field::MemoryMode,
        Field::SystemMemory,
        Field::GpuVram,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Params => "Parameters",
            Field::ModelQuant => "Model quant",
            Field::ContextLength => "Context length",
            Field::UseKvCache => "KV cache",
            Field::KvCacheQuant => "KV cache quant",
            Field::InferenceMode => "Inference mode",
            Field::MemoryMode => "Memory mode",
            Field::SystemMemory => "System memory",
            Field::GpuVram => "GPU VRAM",
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub input: CalculationInput,
    pub recommendation: Recommendation,
    pub on_disk_gb: f64,
    pub selected_row: usize,
    pub dark_theme: bool,
}

impl App {
    pub fn new() -> Self {
        let input = CalculationInput::default();
        App {
            should_quit: false,
            recommendation: recommend_hardware(&input),
            on_disk_gb: estimate_on_disk_size(input.params_b, input.model_quant),
            input,
            selected_row: 0,
            dark_theme: ThemePreference::load().dark,
        }
    }

    /// Recompute the derived results from the current inputs. Called
    /// after every mutation so the display never lags the input state.
    pub fn recalculate(&mut self) {
        self.recommendation = recommend_hardware(&self.input);
        self.on_disk_gb = estimate_on_disk_size(self.input.params_b, self.input.model_quant);
    }

    pub fn selected_field(&self) -> Field {
        Field::ALL[self.selected_row]
    }

    pub fn move_up(&mut self) {
        if self.selected_row > 0 {
            self.selected_row -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected_row < Field::ALL.len() - 1 {
            self.selected_row += 1;
        }
    }

    pub fn next_field(&mut self) {
        self.selected_row = (self.selected_row + 1) % Field::ALL.len();
    }

    pub fn previous_field(&mut self) {
        self.selected_row = self
            .selected_row
            .checked_sub(1)
            .unwrap_or(Field::ALL.len() - 1);
    }

    pub fn first_field(&mut self) {
        self.selected_row = 0;
    }

    pub fn last_field(&mut self) {
        self.selected_row = Field::ALL.len() - 1;
    }

    /// Step the selected field by `delta` (`-1` left, `1` right).
    /// Numeric fields walk their preset ladder and stop at the ends;
    /// enum fields cycle; booleans toggle.
    pub fn adjust(&mut self, delta: i32) {
        match self.selected_field() {
            Field::Params => {
                self.input.params_b = step_f64(PARAMS_LADDER, self.input.params_b, delta);
            }
            Field::ModelQuant => {
                self.input.model_quant = cycle(&ModelQuant::ALL, self.input.model_quant, delta);
            }
            Field::ContextLength => {
                self.input.context_length =
                    step_u32(CONTEXT_LADDER, self.input.context_length, delta);
            }
            Field::UseKvCache => self.input.use_kv_cache = !self.input.use_kv_cache,
            Field::KvCacheQuant => {
                self.input.kv_cache_quant =
                    cycle(&KvCacheQuant::ALL, self.input.kv_cache_quant, delta);
            }
            Field::InferenceMode => {
                self.input.inference_mode = match self.input.inference_mode {
                    InferenceMode::Incremental => InferenceMode::Bulk,
                    InferenceMode::Bulk => InferenceMode::Incremental,
                };
            }
            Field::MemoryMode => {
                self.input.memory_mode = match self.input.memory_mode {
                    MemoryMode::DiscreteGpu => MemoryMode::UnifiedMemory,
                    MemoryMode::UnifiedMemory => MemoryMode::DiscreteGpu,
                };
            }
            Field::SystemMemory => {
                self.input.system_memory_gb =
                    step_f64(SYSTEM_MEMORY_LADDER, self.input.system_memory_gb, delta);
            }
            Field::GpuVram => {
                self.input.gpu_vram_gb = step_f64(GPU_VRAM_LADDER, self.input.gpu_vram_gb, delta);
            }
        }
        self.recalculate();
    }

    /// Space/Enter: toggle booleans and modes, cycle enums forward.
    /// No-op on numeric fields.
    pub fn toggle_current(&mut self) {
        match self.selected_field() {
            Field::UseKvCache
            | Field::KvCacheQuant
            | Field::ModelQuant
            | Field::InferenceMode
            | Field::MemoryMode => self.adjust(1),
            Field::Params | Field::ContextLength | Field::SystemMemory | Field::GpuVram => {}
        }
    }

    pub fn toggle_theme(&mut self) {
        self.dark_theme = !self.dark_theme;
        ThemePreference {
            dark: self.dark_theme,
        }
        .save();
    }

    /// Display string for a field's current value.
    pub fn field_value(&self, field: Field) -> String {
        match field {
            Field::Params => format!("{}B", format_gb(self.input.params_b)),
            Field::ModelQuant => self.input.model_quant.label().to_string(),
            Field::ContextLength => format!("{} tokens", self.input.context_length),
            Field::UseKvCache => (if self.input.use_kv_cache { "On" } else { "Off" }).to_string(),
            Field::KvCacheQuant => self.input.kv_cache_quant.label().to_string(),
            Field::InferenceMode => self.input.inference_mode.label().to_string(),
            Field::MemoryMode => self.input.memory_mode.label().to_string(),
            Field::SystemMemory => format!("{} GB", format_gb(self.input.system_memory_gb)),
            Field::GpuVram => format!("{} GB", format_gb(self.input.gpu_vram_gb)),
        }
    }
}

fn step_f64(ladder: &[f64], current: f64, delta: i32) -> f64 {
    let pos = ladder
        .iter()
        .position(|&v| v >= current)
        .unwrap_or(ladder.len() - 1);
    let next = (pos as i32 + delta).clamp(0, ladder.len() as i32 - 1) as usize;
    ladder[next]
}

fn step_u32(ladder: &[u32], current: u32, delta: i32) -> u32 {
    let pos = ladder
        .iter()
        .position(|&v| v >= current)
        .unwrap_or(ladder.len() - 1);
    let next = (pos as i32 + delta).clamp(0, ladder.len() as i32 - 1) as usize;
    ladder[next]
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, delta: i32) -> T {
    let pos = all.iter().position(|&v| v == current).unwrap_or(0);
    let next = (pos as i32 + delta).rem_euclid(all.len() as i32) as usize;
    all[next]
}
