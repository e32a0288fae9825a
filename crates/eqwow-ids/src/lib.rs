//! Database identifier allocation for converted assets
//!
//! Every converted entity that ends up in a client database table needs a
//! unique numeric identifier. [`IdAllocator`] hands these out from one
//! counter per [`IdKind`]. An allocator is an ordinary value: build one per
//! conversion run (or per test) and share it through `Arc` when entities are
//! built on several threads.
//!
//! ```
//! use eqwow_ids::{IdAllocator, IdKind, IdStarts};
//!
//! let ids = IdAllocator::new(IdStarts::default());
//! let first = ids.next(IdKind::WmoGroup)?;
//! let second = ids.next(IdKind::WmoGroup)?;
//! assert_eq!(second, first + 1);
//! # Ok::<(), eqwow_ids::IdError>(())
//! ```

mod error;

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

pub use error::{IdError, Result};

/// Identifier kinds with an independent counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IdKind {
    CreatureModel,
    CreatureDisplayInfo,
    Sound,
    SoundAmbience,
    ItemDisplayInfo,
    SpellVisual,
    Wmo,
    WmoGroup,
    Area,
}

impl IdKind {
    pub const ALL: [Self; 9] = [
        Self::CreatureModel,
        Self::CreatureDisplayInfo,
        Self::Sound,
        Self::SoundAmbience,
        Self::ItemDisplayInfo,
        Self::SpellVisual,
        Self::Wmo,
        Self::WmoGroup,
        Self::Area,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CreatureModel => "creature model",
            Self::CreatureDisplayInfo => "creature display info",
            Self::Sound => "sound",
            Self::SoundAmbience => "sound ambience",
            Self::ItemDisplayInfo => "item display info",
            Self::SpellVisual => "spell visual",
            Self::Wmo => "WMO",
            Self::WmoGroup => "WMO group",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// First identifier handed out for each kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IdStarts {
    pub creature_model: u32,
    pub creature_display_info: u32,
    pub sound: u32,
    pub sound_ambience: u32,
    pub item_display_info: u32,
    pub spell_visual: u32,
    pub wmo: u32,
    pub wmo_group: u32,
    pub area: u32,
}

impl Default for IdStarts {
    fn default() -> Self {
        Self {
            creature_model: 3000,
            creature_display_info: 32000,
            sound: 20000,
            sound_ambience: 500,
            item_display_info: 85000,
            spell_visual: 16000,
            wmo: 7000,
            wmo_group: 30000,
            area: 6000,
        }
    }
}

impl IdStarts {
    pub fn get(&self, kind: IdKind) -> u32 {
        match kind {
            IdKind::CreatureModel => self.creature_model,
            IdKind::CreatureDisplayInfo => self.creature_display_info,
            IdKind::Sound => self.sound,
            IdKind::SoundAmbience => self.sound_ambience,
            IdKind::ItemDisplayInfo => self.item_display_info,
            IdKind::SpellVisual => self.spell_visual,
            IdKind::Wmo => self.wmo,
            IdKind::WmoGroup => self.wmo_group,
            IdKind::Area => self.area,
        }
    }
}

/// Hands out monotonically increasing identifiers, one counter per kind
///
/// Values are never reused and never decremented. `next` takes a short
/// lock, so one allocator can be shared between threads.
#[derive(Debug)]
pub struct IdAllocator {
    counters: Mutex<HashMap<IdKind, u32>>,
}

impl IdAllocator {
    pub fn new(starts: IdStarts) -> Self {
        let counters = IdKind::ALL
            .iter()
            .map(|&kind| (kind, starts.get(kind)))
            .collect();
        Self {
            counters: Mutex::new(counters),
        }
    }

    /// Return the current value for `kind` and advance the counter
    pub fn next(&self, kind: IdKind) -> Result<u32> {
        let mut counters = self.counters.lock();
        let counter = counters.entry(kind).or_default();
        let id = *counter;
        if id == u32::MAX {
            log::error!("Identifier space exhausted for {kind}");
            return Err(IdError::Exhausted { kind, last: id });
        }
        *counter += 1;
        log::trace!("Allocated {kind} id {id}");
        Ok(id)
    }

    /// Allocate `count` consecutive identifiers and return the first
    pub fn next_block(&self, kind: IdKind, count: u32) -> Result<u32> {
        let mut counters = self.counters.lock();
        let counter = counters.entry(kind).or_default();
        let first = *counter;
        let end = first
            .checked_add(count)
            .ok_or(IdError::Exhausted { kind, last: first })?;
        *counter = end;
        log::debug!("Allocated {count} {kind} ids starting at {first}");
        Ok(first)
    }

    /// The value the next call to [`IdAllocator::next`] would return
    pub fn peek(&self, kind: IdKind) -> u32 {
        self.counters.lock().get(&kind).copied().unwrap_or_default()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(IdStarts::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;
    use test_case::test_case;

    #[test_case(IdKind::Wmo, 7000)]
    #[test_case(IdKind::WmoGroup, 30000)]
    #[test_case(IdKind::Area, 6000)]
    #[test_case(IdKind::CreatureModel, 3000)]
    fn test_default_starts(kind: IdKind, expected: u32) {
        let ids = IdAllocator::default();
        assert_eq!(ids.peek(kind), expected);
        assert_eq!(ids.next(kind).unwrap(), expected);
        assert_eq!(ids.peek(kind), expected + 1);
    }

    #[test]
    fn test_kinds_are_independent() {
        let ids = IdAllocator::new(IdStarts {
            sound: 10,
            sound_ambience: 10,
            ..Default::default()
        });
        assert_eq!(ids.next(IdKind::Sound).unwrap(), 10);
        assert_eq!(ids.next(IdKind::Sound).unwrap(), 11);
        assert_eq!(ids.next(IdKind::SoundAmbience).unwrap(), 10);
    }

    #[test]
    fn test_fresh_allocators_do_not_share_state() {
        let a = IdAllocator::default();
        let b = IdAllocator::default();
        a.next(IdKind::Wmo).unwrap();
        a.next(IdKind::Wmo).unwrap();
        assert_eq!(b.next(IdKind::Wmo).unwrap(), 7000);
    }

    #[test]
    fn test_exhausted() {
        let ids = IdAllocator::new(IdStarts {
            spell_visual: u32::MAX - 1,
            ..Default::default()
        });
        assert_eq!(ids.next(IdKind::SpellVisual).unwrap(), u32::MAX - 1);
        assert_eq!(
            ids.next(IdKind::SpellVisual),
            Err(IdError::Exhausted {
                kind: IdKind::SpellVisual,
                last: u32::MAX
            })
        );
        // a failed allocation leaves the counter untouched
        assert_eq!(ids.peek(IdKind::SpellVisual), u32::MAX);
    }

    #[test]
    fn test_next_block() {
        let ids = IdAllocator::default();
        assert_eq!(ids.next_block(IdKind::WmoGroup, 3).unwrap(), 30000);
        assert_eq!(ids.next(IdKind::WmoGroup).unwrap(), 30003);
        assert_eq!(ids.next_block(IdKind::WmoGroup, 0).unwrap(), 30004);
        assert!(ids.next_block(IdKind::WmoGroup, u32::MAX).is_err());
        assert_eq!(ids.peek(IdKind::WmoGroup), 30004);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let ids = Arc::new(IdAllocator::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || {
                    (0..250)
                        .map(|_| ids.next(IdKind::CreatureDisplayInfo).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<u32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();

        assert_eq!(all.len(), 2000);
        assert_eq!(all[0], 32000);
        assert_eq!(all[1999], 33999);
        assert_eq!(ids.peek(IdKind::CreatureDisplayInfo), 34000);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(IdKind::WmoGroup.to_string(), "WMO group");
        assert_eq!(IdKind::ALL.len(), 9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_starts_partial_json() {
        let starts: IdStarts = serde_json::from_str(r#"{"wmo": 100}"#).unwrap();
        assert_eq!(starts.wmo, 100);
        assert_eq!(starts.area, 6000);
    }
}
