use serde::{Deserialize, Serialize};

use crate::params::truncate_id;

/// Shaping curve applied to a source value before it is scaled by the
/// route amount.
///
/// The numeric behaviour is part of the preset contract: `Curve2` squares
/// the input and `Curve3` cubes it. Historical presets were authored
/// against exactly these shapes, so the variants keep neutral names rather
/// than suggestive ones like "exponential".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    Linear,
    Curve2,
    Curve3,
}

impl Curve {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Curve::Linear => x,
            Curve::Curve2 => x * x,
            Curve::Curve3 => x * x * x,
        }
    }
}

/// A binding from one modulation source channel onto one named parameter.
///
/// `source` is stored as a raw channel index and is only validated when the
/// route is evaluated; a stale index reads as signal 0. `amount` is
/// intended to stay in [-1, 1] but is deliberately not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModRoute {
    pub param_id: String,
    pub source: usize,
    pub amount: f32,
    #[serde(default)]
    pub curve: Curve,
}

impl ModRoute {
    pub fn new(param_id: &str, source: usize, amount: f32, curve: Curve) -> Self {
        Self {
            param_id: truncate_id(param_id),
            source,
            amount,
            curve,
        }
    }
}

/// At most one route per parameter id, kept in insertion order so indexed
/// snapshots are deterministic.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<ModRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional upsert; a prior route for the same id is replaced in
    /// place.
    pub fn set(&mut self, mut route: ModRoute) {
        route.param_id = truncate_id(&route.param_id);
        match self.position(&route.param_id) {
            Some(index) => self.routes[index] = route,
            None => self.routes.push(route),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<ModRoute> {
        let id = truncate_id(id);
        self.position(&id).map(|index| self.routes.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&ModRoute> {
        let id = truncate_id(id);
        self.position(&id).map(|index| &self.routes[index])
    }

    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn by_index(&self, index: usize) -> Option<&ModRoute> {
        self.routes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModRoute> {
        self.routes.iter()
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.routes.iter().position(|route| route.param_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MAX_ID_LEN;

    fn route(id: &str, source: usize) -> ModRoute {
        ModRoute::new(id, source, 1.0, Curve::Linear)
    }

    #[test]
    fn curves_shape_as_square_and_cube() {
        assert_eq!(Curve::Linear.apply(0.5), 0.5);
        assert_eq!(Curve::Curve2.apply(0.5), 0.25);
        assert_eq!(Curve::Curve3.apply(0.5), 0.125);
        assert_eq!(Curve::Curve3.apply(1.0), 1.0);
    }

    #[test]
    fn setting_twice_replaces_the_route() {
        let mut table = RouteTable::new();
        table.set(route("fx.zoom", 0));
        table.set(ModRoute::new("fx.zoom", 3, -0.5, Curve::Curve2));

        assert_eq!(table.len(), 1);
        let stored = table.get("fx.zoom").unwrap();
        assert_eq!(stored.source, 3);
        assert_eq!(stored.amount, -0.5);
        assert_eq!(stored.curve, Curve::Curve2);
    }

    #[test]
    fn removal_reports_the_old_route() {
        let mut table = RouteTable::new();
        table.set(route("fx.zoom", 0));

        assert!(table.remove("fx.zoom").is_some());
        assert!(table.remove("fx.zoom").is_none());
        assert!(!table.has("fx.zoom"));
    }

    #[test]
    fn indexed_access_follows_insertion_order() {
        let mut table = RouteTable::new();
        table.set(route("a", 0));
        table.set(route("b", 1));
        table.set(route("c", 2));

        assert_eq!(table.by_index(1).unwrap().param_id, "b");
        assert!(table.by_index(3).is_none());
    }

    #[test]
    fn long_route_ids_match_truncated_lookups() {
        let long = "x".repeat(MAX_ID_LEN + 5);
        let mut table = RouteTable::new();
        table.set(route(&long, 0));

        assert!(table.has(&long));
        assert!(table.has(&long[..MAX_ID_LEN]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn routes_serialize_with_preset_field_names() {
        let json = serde_json::to_string(&route("fx.zoom", 2)).unwrap();
        assert!(json.contains("\"paramId\":\"fx.zoom\""));
        assert!(json.contains("\"source\":2"));
        assert!(json.contains("\"curve\":\"Linear\""));
    }
}
