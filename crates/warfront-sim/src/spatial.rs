//! Uniform-grid spatial hash for radius queries.
//!
//! Rebuilt from scratch once per tick before any system queries it. Results
//! are sorted by distance, then by entity bits, so every consumer iterates
//! candidates in the same order on every run.

use std::collections::HashMap;

use glam::DVec3;
use hecs::{Entity, World};

use warfront_core::components::{AiControlled, Health, HitRadius, Team};
use warfront_core::types::Transform;

type Cell = (i32, i32, i32);

/// One indexed entity, captured at rebuild time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub position: DVec3,
    pub team: Team,
    pub hit_radius: f64,
}

/// Query result: an entry and its distance from the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub entry: SpatialEntry,
    pub distance: f64,
}

/// Which entities a rebuild inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexScope {
    /// Every live entity with a transform, health and hit radius.
    Combatants,
    /// Only AI-controlled entities (steering queries).
    AiControlled,
}

#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    scope: IndexScope,
    cells: HashMap<Cell, Vec<SpatialEntry>>,
    len: usize,
}

impl SpatialIndex {
    pub fn new(cell_size: f64, scope: IndexScope) -> Self {
        Self {
            cell_size,
            scope,
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn cell_of(&self, p: DVec3) -> Cell {
        (
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
            (p.z / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    pub fn insert(&mut self, entry: SpatialEntry) {
        let cell = self.cell_of(entry.position);
        self.cells.entry(cell).or_default().push(entry);
        self.len += 1;
    }

    /// Clear and reinsert from the current world.
    pub fn rebuild(&mut self, world: &World) {
        self.clear();
        let mut query = world.query::<(&Transform, &Health, &HitRadius, Option<&Team>, Option<&AiControlled>)>();
        for (entity, (transform, health, radius, team, ai)) in query.iter() {
            if health.current <= 0.0 {
                continue;
            }
            if self.scope == IndexScope::AiControlled && ai.is_none() {
                continue;
            }
            self.insert(SpatialEntry {
                entity,
                position: transform.position,
                team: team.copied().unwrap_or_default(),
                hit_radius: radius.0,
            });
        }
    }

    /// Every entry whose position lies within `radius` of `point` (inclusive),
    /// nearest first.
    pub fn query_radius(&self, point: DVec3, radius: f64) -> Vec<Neighbor> {
        let mut results = Vec::new();
        if radius < 0.0 || self.len == 0 {
            return results;
        }
        let radius_sq = radius * radius;

        let mut visit = |entries: &Vec<SpatialEntry>| {
            for entry in entries {
                let dist_sq = entry.position.distance_squared(point);
                if dist_sq <= radius_sq {
                    results.push(Neighbor {
                        entry: *entry,
                        distance: dist_sq.sqrt(),
                    });
                }
            }
        };

        let min = self.cell_of(point - DVec3::splat(radius));
        let max = self.cell_of(point + DVec3::splat(radius));
        let span = |lo: i32, hi: i32| (hi as i64 - lo as i64 + 1).max(0) as u64;
        let box_cells = span(min.0, max.0)
            .saturating_mul(span(min.1, max.1))
            .saturating_mul(span(min.2, max.2));

        if box_cells > self.cells.len() as u64 {
            // Long-range query: cheaper to walk the occupied cells.
            for (cell, entries) in &self.cells {
                let inside = (min.0..=max.0).contains(&cell.0)
                    && (min.1..=max.1).contains(&cell.1)
                    && (min.2..=max.2).contains(&cell.2);
                if inside {
                    visit(entries);
                }
            }
        } else {
            for x in min.0..=max.0 {
                for y in min.1..=max.1 {
                    for z in min.2..=max.2 {
                        if let Some(entries) = self.cells.get(&(x, y, z)) {
                            visit(entries);
                        }
                    }
                }
            }
        }

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.entry.entity.to_bits().cmp(&b.entry.entity.to_bits()))
        });
        results
    }

    /// Radius query without entries of `team`.
    pub fn query_enemies(&self, point: DVec3, radius: f64, team: Team) -> Vec<Neighbor> {
        let mut results = self.query_radius(point, radius);
        results.retain(|n| n.entry.team != team);
        results
    }

    /// Radius query restricted to entries of `team`.
    pub fn query_allies(&self, point: DVec3, radius: f64, team: Team) -> Vec<Neighbor> {
        let mut results = self.query_radius(point, radius);
        results.retain(|n| n.entry.team == team);
        results
    }

    pub fn nearest_enemy(&self, point: DVec3, radius: f64, team: Team) -> Option<Neighbor> {
        self.query_enemies(point, radius, team).into_iter().next()
    }
}
