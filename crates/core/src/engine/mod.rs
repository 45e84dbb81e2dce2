use std::collections::HashMap;

use crate::params::{ParamHandle, ParameterRegistry};
use crate::preset::RoutePreset;
use crate::routes::{ModRoute, RouteTable};
use crate::sources::ModSources;

/// Clamps into the range spanned by `a` and `b` regardless of their order.
/// Inverted bounds are accepted input, so the std `f32::clamp` (which
/// panics on `min > max`) cannot be used here.
fn clamp_range(value: f32, a: f32, b: f32) -> f32 {
    value.max(a.min(b)).min(a.max(b))
}

/// Composes the parameter registry and route table into the per-frame
/// evaluation pass, and fronts both for the UI and the preset layer.
///
/// Nothing in the evaluation path can fail: unknown ids, unregistered
/// parameters, and stale source indices all degrade to a defined fallback
/// so one bad route never disturbs the rest of the frame.
#[derive(Debug, Default)]
pub struct ModulationEngine {
    params: ParameterRegistry,
    routes: RouteTable,
    offsets: HashMap<String, f32>,
}

impl ModulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`ParameterRegistry::register`].
    pub fn register_param(&mut self, id: &str, initial: f32, min: f32, max: f32) -> ParamHandle {
        self.params.register(id, initial, min, max)
    }

    /// Current (possibly modulated) value behind a handle.
    pub fn value(&self, handle: ParamHandle) -> f32 {
        self.params.value(handle)
    }

    pub fn value_of(&self, id: &str) -> Option<f32> {
        self.params.value_of(id)
    }

    pub fn set_base(&mut self, id: &str, value: f32) {
        self.params.set_base(id, value);
    }

    pub fn set_route(&mut self, route: ModRoute) {
        self.routes.set(route);
    }

    /// Removes the route and immediately reverts the parameter to its base
    /// value, so the UI never shows a stuck modulated position.
    pub fn remove_route(&mut self, id: &str) {
        if let Some(route) = self.routes.remove(id) {
            if let Some(base) = self.params.base_of(&route.param_id) {
                self.params.write(&route.param_id, base);
            }
            self.offsets.insert(route.param_id, 0.0);
        }
    }

    pub fn has_route(&self, id: &str) -> bool {
        self.routes.has(id)
    }

    pub fn route(&self, id: &str) -> Option<&ModRoute> {
        self.routes.get(id)
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn route_at(&self, index: usize) -> Option<&ModRoute> {
        self.routes.by_index(index)
    }

    /// Reverts every routed parameter to its base and empties the table.
    pub fn clear_routes(&mut self) {
        let ids: Vec<String> = self.routes.iter().map(|r| r.param_id.clone()).collect();
        for id in ids {
            self.remove_route(&id);
        }
    }

    /// Last computed modulation delta for an id, or 0 when unrouted.
    /// Intended for ghost-handle rendering, not control logic.
    pub fn offset(&self, id: &str) -> f32 {
        self.offsets.get(id).copied().unwrap_or(0.0)
    }

    /// Force-writes every registered parameter to its base value, producing
    /// a clean state for preset saving.
    pub fn write_base_values(&mut self) {
        self.params.write_base_values();
    }

    /// Adopts current live values as the new bases. Must be called once
    /// after a bulk route restore, per the persistence contract.
    pub fn sync_bases(&mut self) {
        self.params.sync_bases();
    }

    /// Evaluates every route against this frame's source vector.
    ///
    /// A route whose parameter was never registered is skipped for the
    /// frame; an out-of-range source index reads as 0. The written value is
    /// always inside the parameter's range (bounds ordered if inverted).
    pub fn update(&mut self, sources: &ModSources) {
        for index in 0..self.routes.len() {
            let route = match self.routes.by_index(index) {
                Some(route) => route.clone(),
                None => continue,
            };

            let (base, min, max) = match self.params.read_eval(&route.param_id) {
                Some(meta) => meta,
                None => continue,
            };

            let curved = route.curve.apply(sources.get(route.source));
            let offset = curved * route.amount * (max - min);
            self.offsets.insert(route.param_id.clone(), offset);

            let modulated = clamp_range(base + offset, min, max);
            self.params.write(&route.param_id, modulated);
        }
    }

    /// Snapshot of the route table in index order, for persistence.
    pub fn snapshot(&self) -> RoutePreset {
        RoutePreset {
            routes: self.routes.iter().cloned().collect(),
        }
    }

    /// Replaces the whole table with the preset's routes. The caller must
    /// still invoke [`sync_bases`](Self::sync_bases) once afterwards so
    /// modulation is relative to the freshly loaded live values.
    pub fn apply_preset(&mut self, preset: &RoutePreset) {
        self.clear_routes();
        for route in &preset.routes {
            self.routes.set(route.clone());
        }
    }
}
