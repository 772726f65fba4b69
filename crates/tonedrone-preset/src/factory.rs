//! Bundled factory presets.
//!
//! Factory presets ship with the application, are read-only, and never
//! touch the store. They are embedded at the schema version they were
//! authored at, so loading them runs the same migration path user presets
//! take.

use std::sync::OnceLock;

use crate::preset::Preset;
use crate::serializer::deserialize_preset;

/// Reserved id prefix distinguishing factory presets from user presets.
pub const FACTORY_PRESET_PREFIX: &str = "factory-";

const FACTORY_PRESET_SOURCES: [&str; 2] = [
    include_str!("../presets/cathedral-drift.json"),
    include_str!("../presets/first-light.json"),
];

/// True iff the id carries the reserved factory prefix.
pub fn is_factory_preset(id: &str) -> bool {
    id.starts_with(FACTORY_PRESET_PREFIX)
}

/// The bundled presets, migrated to the current schema version.
pub fn factory_presets() -> &'static [Preset] {
    static PRESETS: OnceLock<Vec<Preset>> = OnceLock::new();
    PRESETS.get_or_init(|| {
        FACTORY_PRESET_SOURCES
            .iter()
            .map(|source| deserialize_preset(source).expect("bundled preset parses"))
            .collect()
    })
}

/// Looks up a factory preset by id.
pub fn factory_preset(id: &str) -> Option<&'static Preset> {
    factory_presets().iter().find(|preset| preset.metadata.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PRESET_VERSION;
    use crate::validation::validate_preset;

    #[test]
    fn test_factory_presets_load_at_current_version() {
        let presets = factory_presets();
        assert_eq!(presets.len(), 2);
        for preset in presets {
            assert_eq!(preset.version, PRESET_VERSION);
            assert!(validate_preset(preset));
            assert!(is_factory_preset(&preset.metadata.id));
        }
    }

    #[test]
    fn test_migration_filled_missing_pans() {
        let preset = factory_preset("factory-first-light").unwrap();
        // Authored at v4: the second polysynth predates per-voice pan.
        assert_eq!(preset.state.polysynths.polysynths[0].pan, -0.3);
        assert_eq!(preset.state.polysynths.polysynths[1].pan, 0.0);
    }

    #[test]
    fn test_lookup_by_id() {
        assert!(factory_preset("factory-cathedral-drift").is_some());
        assert!(factory_preset("no-such-preset").is_none());
    }

    #[test]
    fn test_prefix_check() {
        assert!(is_factory_preset("factory-anything"));
        assert!(!is_factory_preset("1c8e7f2a-user-preset"));
    }
}
