//! Read-through query cache for StudyPath.
//!
//! List and detail reads are cached per owner/id and invalidated on mutation.
//! Invalidation is deliberately coarse-grained (invalidate-and-refetch, not
//! merge) and driven by a static dependency table mapping each mutated entity
//! to the set of cached entities it affects, so invalidation correctness can
//! be checked independent of call-site discipline.
//!
//! A failed mutation never touches the cache; entries only change on a
//! successful read (insert) or a successful mutation (invalidate).

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Entity types with cached queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Plan,
    PlanDay,
    Session,
    Goal,
    GoalItem,
    Material,
    Profile,
}

/// Dependency table: mutating the left entity stales cached queries for each
/// entity on the right. Child mutations stale the parent wherever the parent
/// row carries a derived field (plan progress, goal progress), and parent
/// deletes stale children removed by the schema's cascades.
const DEPENDENTS: &[(Entity, &[Entity])] = &[
    (Entity::Plan, &[Entity::Plan, Entity::PlanDay, Entity::Material]),
    (Entity::PlanDay, &[Entity::PlanDay, Entity::Plan]),
    (Entity::Session, &[Entity::Session]),
    (Entity::Goal, &[Entity::Goal, Entity::GoalItem]),
    (Entity::GoalItem, &[Entity::GoalItem, Entity::Goal]),
    (Entity::Material, &[Entity::Material]),
    (Entity::Profile, &[Entity::Profile]),
];

/// The set of cached entities staled by mutating `mutated`.
pub fn affected_entities(mutated: Entity) -> &'static [Entity] {
    DEPENDENTS
        .iter()
        .find(|(entity, _)| *entity == mutated)
        .map_or(&[], |(_, affected)| affected)
}

/// Key identifying one cached query result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// An owner-scoped list query, optionally narrowed by a filter string
    /// (e.g. materials filtered by plan id).
    List {
        entity: Entity,
        owner: Uuid,
        filter: Option<String>,
    },
    /// A single-row query by primary key.
    Detail { entity: Entity, id: Uuid },
}

impl QueryKey {
    pub fn list(entity: Entity, owner: Uuid) -> Self {
        Self::List {
            entity,
            owner,
            filter: None,
        }
    }

    pub fn filtered_list(entity: Entity, owner: Uuid, filter: impl Into<String>) -> Self {
        Self::List {
            entity,
            owner,
            filter: Some(filter.into()),
        }
    }

    pub fn detail(entity: Entity, id: Uuid) -> Self {
        Self::Detail { entity, id }
    }

    /// The entity this key caches.
    pub const fn entity(&self) -> Entity {
        match self {
            Self::List { entity, .. } | Self::Detail { entity, .. } => *entity,
        }
    }
}

/// In-process cache of query results keyed by [`QueryKey`].
///
/// Values are stored as `serde_json::Value` so one map serves every entity
/// type; callers round-trip through serde at the boundary. The lock is never
/// held across an await point.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Value>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached value.
    pub fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Look up and deserialize a cached value. An entry that no longer
    /// deserializes to `T` is treated as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    /// Store a query result.
    pub fn insert(&self, key: QueryKey, value: Value) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Serialize and store a query result.
    pub fn put<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<(), serde_json::Error> {
        self.insert(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Drop every entry staled by a mutation of `mutated`, per the
    /// dependency table. Returns the number of entries removed.
    pub fn invalidate(&self, mutated: Entity) -> usize {
        let affected = affected_entities(mutated);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|key, _| !affected.contains(&key.entity()));
        before - entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_then_list_refetches() {
        let cache = QueryCache::new();
        let owner = Uuid::new_v4();
        let key = QueryKey::list(Entity::Goal, owner);
        let mut fetches = 0;

        // First read misses and fetches.
        let mut read = |cache: &QueryCache, fetches: &mut u32| -> Value {
            if let Some(value) = cache.get(&key) {
                return value;
            }
            *fetches += 1;
            let value = json!([{ "title": "learn rust" }]);
            cache.insert(key.clone(), value.clone());
            value
        };

        read(&cache, &mut fetches);
        read(&cache, &mut fetches);
        assert_eq!(fetches, 1);

        // A create invalidates the list; the next read refetches.
        cache.invalidate(Entity::Goal);
        read(&cache, &mut fetches);
        assert_eq!(fetches, 2);
    }

    #[test]
    fn test_child_mutation_stales_parent_detail() {
        let cache = QueryCache::new();
        let owner = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        cache.insert(QueryKey::list(Entity::Plan, owner), json!([]));
        cache.insert(QueryKey::detail(Entity::Plan, plan_id), json!({}));
        cache.insert(QueryKey::list(Entity::Session, owner), json!([]));

        // Marking a day complete recomputes plan progress, so both plan
        // queries must go stale; sessions are unrelated.
        let removed = cache.invalidate(Entity::PlanDay);
        assert_eq!(removed, 2);
        assert!(cache.get(&QueryKey::list(Entity::Plan, owner)).is_none());
        assert!(cache.get(&QueryKey::list(Entity::Session, owner)).is_some());
    }

    #[test]
    fn test_dependency_table_covers_every_entity() {
        for entity in [
            Entity::Plan,
            Entity::PlanDay,
            Entity::Session,
            Entity::Goal,
            Entity::GoalItem,
            Entity::Material,
            Entity::Profile,
        ] {
            let affected = affected_entities(entity);
            assert!(
                affected.contains(&entity),
                "{entity:?} must at least stale itself"
            );
        }
    }

    #[test]
    fn test_filtered_lists_are_distinct_keys() {
        let cache = QueryCache::new();
        let owner = Uuid::new_v4();
        let plan = Uuid::new_v4();
        cache.insert(
            QueryKey::filtered_list(Entity::Material, owner, format!("plan:{plan}")),
            json!([1]),
        );
        cache.insert(QueryKey::list(Entity::Material, owner), json!([1, 2]));
        assert_eq!(cache.len(), 2);

        // Deleting a material stales every material list, filtered or not.
        cache.invalidate(Entity::Material);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_as_round_trip() {
        let cache = QueryCache::new();
        let key = QueryKey::detail(Entity::Profile, Uuid::new_v4());
        cache.put(key.clone(), &vec!["a".to_string(), "b".to_string()]).unwrap();
        let names: Vec<String> = cache.get_as(&key).unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }
}
