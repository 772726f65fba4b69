//! Capture and apply of live component state.
//!
//! Each audio-graph component (oscillator bank, polysynth bank, effect
//! stages, transport) exposes its configuration through a capability
//! object: [`StateProvider`]. The registry maps logical component names to
//! providers and orchestrates whole-preset capture and apply without
//! knowing anything about audio.
//!
//! A state arriving before every component exists (a share link decoded at
//! page load, say) is staged, and applied exactly once when the last
//! required component registers.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::preset::{EffectsState, PresetState};

/// Logical names of the components a preset snapshot spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    /// The drone oscillator bank, sequences included.
    Oscillators,
    /// The polyphonic synth bank.
    Polysynths,
    /// LFO-swept filter stage.
    AutoFilter,
    /// Bit crusher stage.
    BitCrusher,
    /// Chebyshev waveshaper stage.
    Chebyshev,
    /// Granular micro-looper stage.
    Microlooper,
    /// Static filter stage.
    AfterFilter,
    /// Feedback delay stage.
    Delay,
    /// Dry-signal send level into the effects bus.
    EffectsBusSend,
    /// Transport tempo.
    Bpm,
}

impl ComponentId {
    /// Returns the component name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentId::Oscillators => "oscillators",
            ComponentId::Polysynths => "polysynths",
            ComponentId::AutoFilter => "autoFilter",
            ComponentId::BitCrusher => "bitCrusher",
            ComponentId::Chebyshev => "chebyshev",
            ComponentId::Microlooper => "microlooper",
            ComponentId::AfterFilter => "afterFilter",
            ComponentId::Delay => "delay",
            ComponentId::EffectsBusSend => "effectsBusSend",
            ComponentId::Bpm => "bpm",
        }
    }

    /// Returns every component a full snapshot requires.
    pub fn all() -> &'static [ComponentId] {
        &[
            ComponentId::Oscillators,
            ComponentId::Polysynths,
            ComponentId::AutoFilter,
            ComponentId::BitCrusher,
            ComponentId::Chebyshev,
            ComponentId::Microlooper,
            ComponentId::AfterFilter,
            ComponentId::Delay,
            ComponentId::EffectsBusSend,
            ComponentId::Bpm,
        ]
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while capturing or applying snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A required component has no registered provider.
    #[error("component '{0}' is not registered")]
    MissingComponent(ComponentId),

    /// A provider refused the state pushed at it.
    #[error("component '{component}' rejected state: {reason}")]
    Rejected {
        /// The refusing component.
        component: ComponentId,
        /// The provider's own description of the refusal.
        reason: String,
    },

    /// A captured value did not fit the preset state model.
    #[error("captured component state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A component's capability object: get/set over its parameter object.
pub trait StateProvider {
    /// Captures the component's current parameters.
    fn capture(&self) -> Value;

    /// Applies previously captured parameters. The error string describes
    /// why the component refused them.
    fn apply(&mut self, state: &Value) -> Result<(), String>;
}

/// Registry of component providers; the orchestration seam between presets
/// and the live audio graph.
#[derive(Default)]
pub struct SnapshotRegistry {
    providers: HashMap<ComponentId, Box<dyn StateProvider>>,
    pending: Option<PresetState>,
}

impl SnapshotRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a component provider.
    ///
    /// If a staged state is waiting and this registration completes the
    /// set, the staged state is applied before returning.
    pub fn register(
        &mut self,
        id: ComponentId,
        provider: Box<dyn StateProvider>,
    ) -> Result<(), SnapshotError> {
        self.providers.insert(id, provider);
        self.apply_pending_if_ready()
    }

    /// True once every component in [`ComponentId::all`] has a provider.
    pub fn is_ready(&self) -> bool {
        ComponentId::all()
            .iter()
            .all(|id| self.providers.contains_key(id))
    }

    /// True while a staged state waits for the registry to become ready.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Captures a full preset state from the registered providers.
    ///
    /// Fails, naming the component, if any required provider is absent.
    pub fn capture_state(&self) -> Result<PresetState, SnapshotError> {
        Ok(PresetState {
            oscillators: self.capture_typed(ComponentId::Oscillators)?,
            polysynths: self.capture_typed(ComponentId::Polysynths)?,
            effects: EffectsState {
                auto_filter: self.capture_typed(ComponentId::AutoFilter)?,
                bit_crusher: self.capture_typed(ComponentId::BitCrusher)?,
                chebyshev: self.capture_typed(ComponentId::Chebyshev)?,
                microlooper: self.capture_typed(ComponentId::Microlooper)?,
                after_filter: self.capture_typed(ComponentId::AfterFilter)?,
                delay: self.capture_typed(ComponentId::Delay)?,
            },
            effects_bus_send: self.capture_typed(ComponentId::EffectsBusSend)?,
            bpm: self.capture_typed(ComponentId::Bpm)?,
        })
    }

    /// Pushes each slice of the state onto its component.
    pub fn apply_state(&mut self, state: &PresetState) -> Result<(), SnapshotError> {
        self.apply_slice(ComponentId::Oscillators, &state.oscillators)?;
        self.apply_slice(ComponentId::Polysynths, &state.polysynths)?;
        self.apply_slice(ComponentId::AutoFilter, &state.effects.auto_filter)?;
        self.apply_slice(ComponentId::BitCrusher, &state.effects.bit_crusher)?;
        self.apply_slice(ComponentId::Chebyshev, &state.effects.chebyshev)?;
        self.apply_slice(ComponentId::Microlooper, &state.effects.microlooper)?;
        self.apply_slice(ComponentId::AfterFilter, &state.effects.after_filter)?;
        self.apply_slice(ComponentId::Delay, &state.effects.delay)?;
        self.apply_slice(ComponentId::EffectsBusSend, &state.effects_bus_send)?;
        self.apply_slice(ComponentId::Bpm, &state.bpm)?;
        Ok(())
    }

    /// Stages a state to be applied once all components are registered.
    ///
    /// Applies immediately when the registry is already ready. A staged
    /// state is applied at most once.
    pub fn stage(&mut self, state: PresetState) -> Result<(), SnapshotError> {
        self.pending = Some(state);
        self.apply_pending_if_ready()
    }

    fn apply_pending_if_ready(&mut self) -> Result<(), SnapshotError> {
        if !self.is_ready() {
            return Ok(());
        }
        if let Some(state) = self.pending.take() {
            self.apply_state(&state)?;
        }
        Ok(())
    }

    fn capture_typed<T: DeserializeOwned>(&self, id: ComponentId) -> Result<T, SnapshotError> {
        let provider = self
            .providers
            .get(&id)
            .ok_or(SnapshotError::MissingComponent(id))?;
        Ok(serde_json::from_value(provider.capture())?)
    }

    fn apply_slice<T: serde::Serialize>(
        &mut self,
        id: ComponentId,
        slice: &T,
    ) -> Result<(), SnapshotError> {
        let provider = self
            .providers
            .get_mut(&id)
            .ok_or(SnapshotError::MissingComponent(id))?;
        let value = serde_json::to_value(slice)?;
        provider
            .apply(&value)
            .map_err(|reason| SnapshotError::Rejected {
                component: id,
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetState;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct MockComponent {
        state: Rc<RefCell<Value>>,
        reject: bool,
    }

    impl StateProvider for MockComponent {
        fn capture(&self) -> Value {
            self.state.borrow().clone()
        }

        fn apply(&mut self, state: &Value) -> Result<(), String> {
            if self.reject {
                return Err("component offline".to_string());
            }
            *self.state.borrow_mut() = state.clone();
            Ok(())
        }
    }

    /// Registers a mock for every component, each seeded with its slice of
    /// `state`. Returns the shared handles, keyed like the registry.
    fn register_all(
        registry: &mut SnapshotRegistry,
        state: &PresetState,
    ) -> HashMap<ComponentId, Rc<RefCell<Value>>> {
        let doc = serde_json::to_value(state).unwrap();
        let mut handles = HashMap::new();
        for &id in ComponentId::all() {
            let slice = match id {
                ComponentId::Oscillators => doc["oscillators"].clone(),
                ComponentId::Polysynths => doc["polysynths"].clone(),
                ComponentId::EffectsBusSend => doc["effectsBusSend"].clone(),
                ComponentId::Bpm => doc["bpm"].clone(),
                effect => doc["effects"][effect.as_str()].clone(),
            };
            let handle = Rc::new(RefCell::new(slice));
            handles.insert(id, handle.clone());
            registry
                .register(
                    id,
                    Box::new(MockComponent {
                        state: handle,
                        reject: false,
                    }),
                )
                .unwrap();
        }
        handles
    }

    #[test]
    fn test_capture_requires_every_component() {
        let registry = SnapshotRegistry::new();
        match registry.capture_state() {
            Err(SnapshotError::MissingComponent(id)) => {
                assert_eq!(id, ComponentId::Oscillators);
            }
            other => panic!("expected missing component, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_capture_round_trips_component_state() {
        let state = PresetState::default();
        let mut registry = SnapshotRegistry::new();
        register_all(&mut registry, &state);

        let captured = registry.capture_state().unwrap();
        assert_eq!(captured, state);
    }

    #[test]
    fn test_apply_pushes_slices_to_components() {
        let mut registry = SnapshotRegistry::new();
        let handles = register_all(&mut registry, &PresetState::default());

        let mut state = PresetState::default();
        state.bpm = 77.0;
        state.effects.delay.feedback = 0.9;
        registry.apply_state(&state).unwrap();

        assert_eq!(*handles[&ComponentId::Bpm].borrow(), serde_json::json!(77.0));
        assert_eq!(
            handles[&ComponentId::Delay].borrow()["feedback"],
            serde_json::json!(0.9)
        );
    }

    #[test]
    fn test_staged_state_waits_for_last_registration() {
        let mut registry = SnapshotRegistry::new();
        let state = PresetState::default();
        let doc = serde_json::to_value(&state).unwrap();

        // Everything except the transport.
        let mut handles = HashMap::new();
        for &id in ComponentId::all() {
            if id == ComponentId::Bpm {
                continue;
            }
            let slice = match id {
                ComponentId::Oscillators => doc["oscillators"].clone(),
                ComponentId::Polysynths => doc["polysynths"].clone(),
                ComponentId::EffectsBusSend => doc["effectsBusSend"].clone(),
                effect => doc["effects"][effect.as_str()].clone(),
            };
            let handle = Rc::new(RefCell::new(slice));
            handles.insert(id, handle.clone());
            registry
                .register(id, Box::new(MockComponent { state: handle, reject: false }))
                .unwrap();
        }

        let mut incoming = PresetState::default();
        incoming.bpm = 140.0;
        registry.stage(incoming).unwrap();
        assert!(registry.has_pending());

        let bpm_handle = Rc::new(RefCell::new(serde_json::json!(0.0)));
        registry
            .register(
                ComponentId::Bpm,
                Box::new(MockComponent {
                    state: bpm_handle.clone(),
                    reject: false,
                }),
            )
            .unwrap();

        assert!(!registry.has_pending());
        assert_eq!(*bpm_handle.borrow(), serde_json::json!(140.0));
    }

    #[test]
    fn test_staged_state_applies_immediately_when_ready() {
        let mut registry = SnapshotRegistry::new();
        let handles = register_all(&mut registry, &PresetState::default());

        let mut incoming = PresetState::default();
        incoming.bpm = 61.0;
        registry.stage(incoming).unwrap();

        assert!(!registry.has_pending());
        assert_eq!(*handles[&ComponentId::Bpm].borrow(), serde_json::json!(61.0));
    }

    #[test]
    fn test_rejection_names_the_component() {
        let mut registry = SnapshotRegistry::new();
        register_all(&mut registry, &PresetState::default());
        registry
            .register(
                ComponentId::Chebyshev,
                Box::new(MockComponent {
                    state: Rc::new(RefCell::new(serde_json::json!({}))),
                    reject: true,
                }),
            )
            .unwrap();

        match registry.apply_state(&PresetState::default()) {
            Err(SnapshotError::Rejected { component, reason }) => {
                assert_eq!(component, ComponentId::Chebyshev);
                assert_eq!(reason, "component offline");
            }
            other => panic!("expected rejection, got {:?}", other.map(|_| ())),
        }
    }
}
