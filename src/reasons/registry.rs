//! Interning tables for the objects reasons refer to.
//!
//! Every table maps a structural identity to a small handle that stays
//! valid for the rest of the cycle. Pair tables store the canonical order
//! only. Capacities are fixed at reset.

use std::collections::HashMap;
use std::hash::Hash;

use super::error::ReasonError;
use super::kind::{ConnectionId, DragonId, EyeId, WormId, WormPairId};
use crate::board::{Color, Point};

/// Append-only table with find-or-create lookup.
#[derive(Debug, Clone)]
pub struct Interner<K> {
    table: &'static str,
    capacity: usize,
    items: Vec<K>,
    index: HashMap<K, u32>,
}

impl<K: Copy + Eq + Hash> Interner<K> {
    pub fn new(table: &'static str, capacity: usize) -> Self {
        Interner {
            table,
            capacity,
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Handle of `key`, creating an entry if needed.
    pub fn find_or_create(&mut self, key: K) -> Result<u32, ReasonError> {
        if let Some(&id) = self.index.get(&key) {
            return Ok(id);
        }
        if self.items.len() >= self.capacity {
            return Err(ReasonError::TableFull {
                table: self.table,
                capacity: self.capacity,
            });
        }
        let id = self.items.len() as u32;
        self.items.push(key);
        self.index.insert(key, id);
        Ok(id)
    }

    /// Handle of `key` without creating an entry.
    pub fn find(&self, key: &K) -> Option<u32> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: u32) -> K {
        self.items[id as usize]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.items.clear();
        self.index.clear();
    }
}

/// Table sizes derived from the board area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacities {
    pub worms: usize,
    pub dragons: usize,
    pub connections: usize,
    pub worm_pairs: usize,
    pub eyes: usize,
    pub lunches: usize,
}

impl Capacities {
    pub fn for_area(area: usize) -> Self {
        let worms = (2 * area / 3).max(1);
        Capacities {
            worms,
            dragons: worms,
            connections: 4 * worms,
            worm_pairs: worms,
            eyes: (area / 2).max(1),
            lunches: worms,
        }
    }
}

/// An eater dragon and the worm it can capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lunch {
    pub eater: DragonId,
    pub food: WormId,
}

/// All object tables of one cycle.
#[derive(Debug, Clone)]
pub struct Registry {
    worms: Interner<Point>,
    dragons: Interner<Point>,
    connections: Interner<(DragonId, DragonId)>,
    worm_pairs: Interner<(WormId, WormId)>,
    eyes: Interner<(Point, Color)>,
    lunches: Vec<Lunch>,
    lunch_capacity: usize,
}

impl Registry {
    pub fn new(capacities: Capacities) -> Self {
        Registry {
            worms: Interner::new("worm", capacities.worms),
            dragons: Interner::new("dragon", capacities.dragons),
            connections: Interner::new("connection", capacities.connections),
            worm_pairs: Interner::new("worm pair", capacities.worm_pairs),
            eyes: Interner::new("eye", capacities.eyes),
            lunches: Vec::new(),
            lunch_capacity: capacities.lunches,
        }
    }

    pub fn clear(&mut self, capacities: Capacities) {
        self.worms.clear(capacities.worms);
        self.dragons.clear(capacities.dragons);
        self.connections.clear(capacities.connections);
        self.worm_pairs.clear(capacities.worm_pairs);
        self.eyes.clear(capacities.eyes);
        self.lunches.clear();
        self.lunch_capacity = capacities.lunches;
    }

    /// Handle of the worm with origin `origin`.
    pub fn worm(&mut self, origin: Point) -> Result<WormId, ReasonError> {
        self.worms.find_or_create(origin).map(WormId)
    }

    pub fn find_worm(&self, origin: Point) -> Option<WormId> {
        self.worms.find(&origin).map(WormId)
    }

    pub fn worm_origin(&self, id: WormId) -> Point {
        self.worms.get(id.0)
    }

    /// Handle of the dragon with origin `origin`.
    pub fn dragon(&mut self, origin: Point) -> Result<DragonId, ReasonError> {
        self.dragons.find_or_create(origin).map(DragonId)
    }

    pub fn find_dragon(&self, origin: Point) -> Option<DragonId> {
        self.dragons.find(&origin).map(DragonId)
    }

    pub fn dragon_origin(&self, id: DragonId) -> Point {
        self.dragons.get(id.0)
    }

    pub fn dragon_count(&self) -> usize {
        self.dragons.len()
    }

    /// Connection between two dragons, independent of argument order.
    pub fn connection(&mut self, a: DragonId, b: DragonId) -> Result<ConnectionId, ReasonError> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.connections.find_or_create(key).map(ConnectionId)
    }

    pub fn connection_dragons(&self, id: ConnectionId) -> (DragonId, DragonId) {
        self.connections.get(id.0)
    }

    /// Unordered pair of worms.
    pub fn worm_pair(&mut self, a: WormId, b: WormId) -> Result<WormPairId, ReasonError> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.worm_pairs.find_or_create(key).map(WormPairId)
    }

    pub fn worm_pair_members(&self, id: WormPairId) -> (WormId, WormId) {
        self.worm_pairs.get(id.0)
    }

    /// Eye space of `color` with origin `origin`.
    pub fn eye(&mut self, origin: Point, color: Color) -> Result<EyeId, ReasonError> {
        self.eyes.find_or_create((origin, color)).map(EyeId)
    }

    pub fn eye_key(&self, id: EyeId) -> (Point, Color) {
        self.eyes.get(id.0)
    }

    /// Records that `eater` can capture `food`. Duplicates are ignored.
    pub fn add_lunch(&mut self, eater: DragonId, food: WormId) -> Result<(), ReasonError> {
        let lunch = Lunch { eater, food };
        if self.lunches.contains(&lunch) {
            return Ok(());
        }
        if self.lunches.len() >= self.lunch_capacity {
            return Err(ReasonError::TableFull {
                table: "lunch",
                capacity: self.lunch_capacity,
            });
        }
        self.lunches.push(lunch);
        Ok(())
    }

    /// Forgets a lunch. The last entry takes its slot.
    pub fn remove_lunch(&mut self, eater: DragonId, food: WormId) {
        let lunch = Lunch { eater, food };
        if let Some(k) = self.lunches.iter().position(|l| *l == lunch) {
            self.lunches.swap_remove(k);
        }
    }

    pub fn lunches(&self) -> &[Lunch] {
        &self.lunches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry::new(Capacities::for_area(81))
    }

    #[test]
    fn same_identity_same_handle() {
        let mut reg = registry();
        let a = reg.worm(Point::new(2, 2)).unwrap();
        let b = reg.worm(Point::new(3, 3)).unwrap();
        assert_ne!(a, b);
        assert_eq!(reg.worm(Point::new(2, 2)).unwrap(), a);
        assert_eq!(reg.worm_origin(b), Point::new(3, 3));
        assert_eq!(reg.find_worm(Point::new(4, 4)), None);
    }

    #[test]
    fn pairs_are_order_independent() {
        let mut reg = registry();
        let a = reg.dragon(Point::new(0, 0)).unwrap();
        let b = reg.dragon(Point::new(5, 5)).unwrap();
        let ab = reg.connection(a, b).unwrap();
        let ba = reg.connection(b, a).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(reg.connection_dragons(ab), (a, b));

        let w = reg.worm(Point::new(1, 1)).unwrap();
        let v = reg.worm(Point::new(0, 1)).unwrap();
        assert_eq!(reg.worm_pair(w, v).unwrap(), reg.worm_pair(v, w).unwrap());
    }

    #[test]
    fn eyes_are_keyed_by_color() {
        let mut reg = registry();
        let black = reg.eye(Point::new(1, 1), Color::Black).unwrap();
        let white = reg.eye(Point::new(1, 1), Color::White).unwrap();
        assert_ne!(black, white);
        assert_eq!(reg.eye_key(white), (Point::new(1, 1), Color::White));
    }

    #[test]
    fn exhausted_table_is_reported() {
        let mut table: Interner<u8> = Interner::new("test", 2);
        table.find_or_create(1).unwrap();
        table.find_or_create(2).unwrap();
        assert_eq!(table.find_or_create(2), Ok(1));
        assert_eq!(
            table.find_or_create(3),
            Err(ReasonError::TableFull {
                table: "test",
                capacity: 2
            })
        );
    }

    #[test]
    fn lunches_are_idempotent_and_removable() {
        let mut reg = registry();
        let eater = reg.dragon(Point::new(0, 0)).unwrap();
        let food = reg.worm(Point::new(1, 0)).unwrap();
        let other = reg.worm(Point::new(2, 0)).unwrap();
        reg.add_lunch(eater, food).unwrap();
        reg.add_lunch(eater, food).unwrap();
        reg.add_lunch(eater, other).unwrap();
        assert_eq!(reg.lunches().len(), 2);

        reg.remove_lunch(eater, food);
        assert_eq!(reg.lunches(), &[Lunch { eater, food: other }]);
        reg.remove_lunch(eater, food);
        assert_eq!(reg.lunches().len(), 1);
    }

    #[test]
    fn capacities_scale_with_area() {
        let caps = Capacities::for_area(361);
        assert_eq!(caps.worms, 240);
        assert_eq!(caps.connections, 960);
        assert_eq!(caps.eyes, 180);
    }
}
