//! Per-cycle state of move review.
//!
//! A `Session` owns every table the review touches: object registry,
//! reason table, move records and the replacement map. Call
//! [`Session::clear`] before collecting reasons for a new position.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{BoardSize, Point};
use crate::config::ReviewConfig;
use crate::reasons::{Capacities, MoveRecord, Reason, ReasonId, Registry, ReplacementMap};

/// Holds the mutable state of one review cycle.
pub struct Session {
    pub(crate) size: BoardSize,
    pub(crate) config: ReviewConfig,
    pub(crate) registry: Registry,
    pub(crate) reasons: Vec<Reason>,
    pub(crate) moves: Vec<MoveRecord>,
    pub(crate) replacement: ReplacementMap,
    rng: SmallRng,
}

impl Session {
    /// Creates a cleared session for a board of the given size.
    pub fn new(size: BoardSize, config: ReviewConfig) -> Self {
        let mut session = Session {
            size,
            registry: Registry::new(Capacities::for_area(size.area())),
            reasons: Vec::with_capacity(config.max_move_reasons),
            moves: Vec::with_capacity(size.area()),
            replacement: ReplacementMap::new(size),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
        };
        session.clear();
        session
    }

    /// Resets every table for a new cycle.
    ///
    /// The generator is re-seeded so the same position always gets the
    /// same tie-break numbers.
    pub fn clear(&mut self) {
        self.registry
            .clear(Capacities::for_area(self.size.area()));
        self.reasons.clear();
        self.replacement.clear();
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.moves.clear();
        for _ in 0..self.size.area() {
            let random_number = self.rng.gen::<f32>();
            self.moves.push(MoveRecord::new(random_number));
        }
    }

    /// Switches to another board size and clears.
    pub fn resize(&mut self, size: BoardSize) {
        self.size = size;
        self.replacement = ReplacementMap::new(size);
        self.clear();
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect at the next clear.
    pub fn set_config(&mut self, config: ReviewConfig) {
        self.config = config;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn replacement(&self) -> &ReplacementMap {
        &self.replacement
    }

    /// Move record of an on-board point.
    ///
    /// # Panics
    ///
    /// Panics if `p` lies off the board. Use [`Session::try_record`] for
    /// points that may come from outside.
    pub fn record(&self, p: Point) -> &MoveRecord {
        assert!(self.size.contains(p), "{p} is off the board");
        &self.moves[self.size.index(p)]
    }

    /// Move record of `p`, or `None` off the board.
    pub fn try_record(&self, p: Point) -> Option<&MoveRecord> {
        self.size
            .contains(p)
            .then(|| &self.moves[self.size.index(p)])
    }

    pub(crate) fn record_mut(&mut self, p: Point) -> &mut MoveRecord {
        assert!(self.size.contains(p), "{p} is off the board");
        let index = self.size.index(p);
        &mut self.moves[index]
    }

    pub fn reason(&self, id: ReasonId) -> &Reason {
        &self.reasons[id.0 as usize]
    }

    /// Reasons registered at `p`, in list order.
    pub fn reasons_at(&self, p: Point) -> impl Iterator<Item = &Reason> + '_ {
        self.record(p).reasons.iter().map(move |&id| self.reason(id))
    }

    /// Snapshot of the reasons at `p`, for passes that register more
    /// reasons while scanning.
    pub(crate) fn reason_snapshot(&self, p: Point) -> Vec<Reason> {
        self.reasons_at(p).copied().collect()
    }

    /// Sorts the reason list at `p` by kind, then subject, largest first.
    pub(crate) fn sort_reasons(&mut self, p: Point) {
        let index = self.size.index(p);
        let mut ids = std::mem::take(&mut self.moves[index].reasons);
        ids.sort_by(|a, b| {
            let (ra, rb) = (self.reason(*a), self.reason(*b));
            (rb.kind, rb.subject).cmp(&(ra.kind, ra.subject))
        });
        self.moves[index].reasons = ids;
    }
}
