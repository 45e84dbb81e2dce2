use std::collections::HashMap;

/// Fixed capacity for parameter identifiers in bytes. Longer ids are
/// silently truncated (on a char boundary) so they stay stable between the
/// registry, the route table, and persisted presets.
pub const MAX_ID_LEN: usize = 64;

/// Clips an identifier to [`MAX_ID_LEN`] bytes without splitting a UTF-8
/// sequence.
pub(crate) fn truncate_id(id: &str) -> String {
    if id.len() <= MAX_ID_LEN {
        return id.to_string();
    }
    let mut end = MAX_ID_LEN;
    while !id.is_char_boundary(end) {
        end -= 1;
    }
    id[..end].to_string()
}

/// Stable reference to a registered parameter slot. Handles are never
/// invalidated; re-registering an id yields the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamHandle(usize);

/// One registered parameter. The registry owns the live value; the owning
/// effect reads it back through its handle after each update.
#[derive(Debug, Clone)]
struct ParamSlot {
    id: String,
    value: f32,
    base: f32,
    min: f32,
    max: f32,
}

/// Keyed store of every float the host has made modulatable.
///
/// The registry owns the storage outright, so there is no dangling-target
/// hazard: a slot lives as long as the registry does, and an effect that
/// stops reading its handle simply leaves a slot idle.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    slots: Vec<ParamSlot>,
    by_id: HashMap<String, usize>,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter, or refreshes an existing registration.
    ///
    /// The first registration captures `initial` as both the live value and
    /// the base value. Re-registration updates the range and live value but
    /// leaves the base untouched, so an effect re-created mid-session keeps
    /// modulating around the value the user chose. Never fails.
    pub fn register(&mut self, id: &str, initial: f32, min: f32, max: f32) -> ParamHandle {
        let id = truncate_id(id);
        if let Some(&index) = self.by_id.get(&id) {
            let slot = &mut self.slots[index];
            slot.value = initial;
            slot.min = min;
            slot.max = max;
            return ParamHandle(index);
        }

        let index = self.slots.len();
        self.slots.push(ParamSlot {
            id: id.clone(),
            value: initial,
            base: initial,
            min,
            max,
        });
        self.by_id.insert(id, index);
        ParamHandle(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(&truncate_id(id))
    }

    pub fn handle(&self, id: &str) -> Option<ParamHandle> {
        self.by_id.get(&truncate_id(id)).map(|&i| ParamHandle(i))
    }

    /// Current (possibly modulated) value behind a handle.
    pub fn value(&self, handle: ParamHandle) -> f32 {
        self.slots[handle.0].value
    }

    pub fn value_of(&self, id: &str) -> Option<f32> {
        self.handle(id).map(|h| self.value(h))
    }

    pub fn base_of(&self, id: &str) -> Option<f32> {
        self.by_id.get(&truncate_id(id)).map(|&i| self.slots[i].base)
    }

    pub fn range_of(&self, id: &str) -> Option<(f32, f32)> {
        self.by_id
            .get(&truncate_id(id))
            .map(|&i| (self.slots[i].min, self.slots[i].max))
    }

    /// Moves the unmodulated anchor without touching the live value; used
    /// when the user drags the raw slider while a route is active.
    pub fn set_base(&mut self, id: &str, value: f32) {
        if let Some(&index) = self.by_id.get(&truncate_id(id)) {
            self.slots[index].base = value;
        }
    }

    /// Writes the live value of one slot; the engine's per-frame path.
    pub(crate) fn write(&mut self, id: &str, value: f32) -> bool {
        match self.by_id.get(id) {
            Some(&index) => {
                self.slots[index].value = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn read_eval(&self, id: &str) -> Option<(f32, f32, f32)> {
        self.by_id
            .get(id)
            .map(|&i| (self.slots[i].base, self.slots[i].min, self.slots[i].max))
    }

    /// Forces every slot back to its base value; used to produce a clean
    /// state for preset saving.
    pub fn write_base_values(&mut self) {
        for slot in &mut self.slots {
            slot.value = slot.base;
        }
    }

    /// Adopts every slot's live value as its new base; called once after a
    /// bulk route restore so modulation is relative to the loaded values.
    pub fn sync_bases(&mut self) {
        for slot in &mut self.slots {
            slot.base = slot.value;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered identifiers, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_captures_base() {
        let mut registry = ParameterRegistry::new();
        let handle = registry.register("fx.zoom", 5.0, 0.0, 10.0);

        assert_eq!(registry.value(handle), 5.0);
        assert_eq!(registry.base_of("fx.zoom"), Some(5.0));
        assert_eq!(registry.range_of("fx.zoom"), Some((0.0, 10.0)));
    }

    #[test]
    fn reregistration_preserves_base_and_handle() {
        let mut registry = ParameterRegistry::new();
        let first = registry.register("fx.zoom", 5.0, 0.0, 10.0);
        let second = registry.register("fx.zoom", 2.0, -1.0, 1.0);

        assert_eq!(first, second);
        assert_eq!(registry.base_of("fx.zoom"), Some(5.0));
        assert_eq!(registry.range_of("fx.zoom"), Some((-1.0, 1.0)));
        assert_eq!(registry.value(second), 2.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn set_base_leaves_live_value_alone() {
        let mut registry = ParameterRegistry::new();
        let handle = registry.register("fx.gain", 0.5, 0.0, 1.0);
        registry.set_base("fx.gain", 0.8);

        assert_eq!(registry.base_of("fx.gain"), Some(0.8));
        assert_eq!(registry.value(handle), 0.5);
    }

    #[test]
    fn write_base_values_and_sync_bases_are_inverses() {
        let mut registry = ParameterRegistry::new();
        let handle = registry.register("fx.gain", 0.5, 0.0, 1.0);

        assert!(registry.write("fx.gain", 0.9));
        registry.write_base_values();
        assert_eq!(registry.value(handle), 0.5);

        assert!(registry.write("fx.gain", 0.9));
        registry.sync_bases();
        assert_eq!(registry.base_of("fx.gain"), Some(0.9));
    }

    #[test]
    fn writes_to_unknown_ids_are_rejected() {
        let mut registry = ParameterRegistry::new();
        assert!(!registry.write("missing", 1.0));
        assert_eq!(registry.value_of("missing"), None);
    }

    #[test]
    fn long_ids_are_truncated_consistently() {
        let long = "p".repeat(MAX_ID_LEN + 20);
        let mut registry = ParameterRegistry::new();
        registry.register(&long, 1.0, 0.0, 1.0);

        assert!(registry.contains(&long));
        assert!(registry.contains(&long[..MAX_ID_LEN]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 'é' is two bytes; an odd byte limit must not split it.
        let id = "é".repeat(MAX_ID_LEN);
        let truncated = truncate_id(&id);
        assert!(truncated.len() <= MAX_ID_LEN);
        assert!(id.starts_with(&truncated));
    }
}
