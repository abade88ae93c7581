//! Graph traversal over a bundle's entities.
//!
//! Entities store only the ids of their neighbours, so every walk goes
//! through the [`Bundle`] that owns them. Downward walks skip a child that
//! is already on the current descent path, so a malformed bundle with a
//! cycle still terminates.

use indexmap::IndexMap;
use tracing::trace;
use uuid::Uuid;

use crate::bundle::Bundle;
use crate::entity::Entity;

/// Receives entities during a traversal.
pub trait EntityVisitor<'a> {
    fn visit(&mut self, entity: &'a Entity);
}

impl<'a, F> EntityVisitor<'a> for F
where
    F: FnMut(&'a Entity),
{
    fn visit(&mut self, entity: &'a Entity) {
        self(entity)
    }
}

/// Collects linked entities without parents.
#[derive(Debug, Default)]
pub struct RootFinder<'a> {
    pub roots: IndexMap<Uuid, &'a Entity>,
}

impl<'a> EntityVisitor<'a> for RootFinder<'a> {
    fn visit(&mut self, entity: &'a Entity) {
        if entity.is_root() {
            self.roots.insert(entity.document_id(), entity);
        }
    }
}

impl Bundle {
    /// Visits the entity `id`, then each of its children recursively in
    /// child insertion order.
    pub fn accept<'a, V>(&'a self, id: Uuid, visitor: &mut V)
    where
        V: EntityVisitor<'a> + ?Sized,
    {
        let mut path = Vec::new();
        self.descend(id, visitor, &mut path);
    }

    fn descend<'a, V>(&'a self, id: Uuid, visitor: &mut V, path: &mut Vec<Uuid>)
    where
        V: EntityVisitor<'a> + ?Sized,
    {
        let Some(entity) = self.entity(id) else {
            return;
        };
        visitor.visit(entity);
        path.push(id);
        for child in entity.child_ids() {
            if path.contains(&child) {
                trace!(entity = %entity.address(), %child, "skipping child already on path");
                continue;
            }
            self.descend(child, visitor, path);
        }
        path.pop();
    }

    /// Visits every ancestor of `id`, most distant first: for each parent,
    /// its own ancestors are visited before the parent itself.
    pub fn ancestors<'a, V>(&'a self, id: Uuid, visitor: &mut V)
    where
        V: EntityVisitor<'a> + ?Sized,
    {
        let mut path = vec![id];
        self.ascend(id, visitor, &mut path);
    }

    fn ascend<'a, V>(&'a self, id: Uuid, visitor: &mut V, path: &mut Vec<Uuid>)
    where
        V: EntityVisitor<'a> + ?Sized,
    {
        let Some(entity) = self.entity(id) else {
            return;
        };
        for parent_id in entity.parent_ids() {
            if path.contains(&parent_id) {
                trace!(entity = %entity.address(), parent = %parent_id, "skipping parent already on path");
                continue;
            }
            let Some(parent) = self.entity(parent_id) else {
                continue;
            };
            path.push(parent_id);
            self.ascend(parent_id, visitor, path);
            path.pop();
            visitor.visit(parent);
        }
    }

    /// Linked entities without parents, keyed by document id in bundle
    /// order.
    pub fn root_entities(&self) -> IndexMap<Uuid, &Entity> {
        let mut finder = RootFinder::default();
        for entity in self.entities().values() {
            finder.visit(entity);
        }
        finder.roots
    }
}
