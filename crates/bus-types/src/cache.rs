use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::{ClassDef, ClassId, ClassKind, Type, TypeVarId};

/// The parts of a declaration the hierarchy walker reads on every step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassEdges {
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

impl ClassEdges {
    pub fn from_def(def: &ClassDef) -> Self {
        Self {
            kind: def.kind,
            type_params: def.type_params.clone(),
            super_class: def.super_class.clone(),
            interfaces: def.interfaces.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Memoized hierarchy edges keyed by class.
///
/// Entries are computed outside the lock on a miss; if two threads race on the same key the last
/// insert wins, which is harmless because both computed the same value. Callers that mutate the
/// underlying store must [`evict`](Self::evict) the affected classes (or [`clear`](Self::clear)).
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: RwLock<HashMap<ClassId, Arc<ClassEdges>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ClassId) -> Option<Arc<ClassEdges>> {
        let found = self.entries.read().get(&id).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn get_or_insert_with(
        &self,
        id: ClassId,
        compute: impl FnOnce() -> Result<ClassEdges>,
    ) -> Result<Arc<ClassEdges>> {
        if let Some(found) = self.get(id) {
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(target: "bus_types", class = id.index(), "descriptor cache miss");
        let edges = Arc::new(compute()?);
        self.entries.write().insert(id, Arc::clone(&edges));
        Ok(edges)
    }

    pub fn evict(&self, id: ClassId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}
