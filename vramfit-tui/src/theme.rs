use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted dark/light preference. Loaded once at startup, written
/// back whenever the user toggles the theme. All file I/O is
/// best-effort: any failure falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub dark: bool,
}

impl Default for ThemePreference {
    fn default() -> Self {
        ThemePreference { dark: true }
    }
}

impl ThemePreference {
    pub fn load() -> Self {
        let Some(path) = preference_path() else {
            return Self::default();
        };
        fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        let Some(path) = preference_path() else {
            return;
        };
        if let Some(parent) = path.parent()
            && fs::create_dir_all(parent).is_err()
        {
            return;
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(&path, json);
        }
    }
}

fn preference_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vramfit").join("theme.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_dark() {
        assert!(ThemePreference::default().dark);
    }

    #[test]
    fn test_round_trips_through_json() {
        let light = ThemePreference { dark: false };
        let json = serde_json::to_string(&light).unwrap();
        let parsed: ThemePreference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, light);
    }

    #[test]
    fn test_garbage_content_falls_back_to_default() {
        let parsed: Option<ThemePreference> = serde_json::from_str("not json").ok();
        assert_eq!(parsed.unwrap_or_default(), ThemePreference::default());
    }
}
