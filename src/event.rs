use std::collections::{BTreeMap, VecDeque};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RebuildCause {
    MessageChanged,
    PitchChanged,
    ConfigReload,
}

pub enum Event {
    // Time housekeeping
    Tick,

    // Watcher-derived intents
    ConfigFileChanged,

    // Display rebuilds (rasterize -> matrix -> texture), always between frames
    RebuildRequested { cause: RebuildCause },
}

pub struct EventEnvelope {
    pub id: u64,
    pub tick: u64,
    pub kind: Event,
}

pub struct EventQueue {
    // map of tick -> FIFO queue of events
    by_tick: BTreeMap<u64, VecDeque<EventEnvelope>>,
    pub now: u64,
    next_id: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn emit_now(&mut self, kind: Event) -> u64 {
        let id = self.alloc_id();
        let env = EventEnvelope {
            id,
            tick: self.now,
            kind,
        };
        self.by_tick.entry(self.now).or_default().push_back(env);
        id
    }

    pub fn pop_ready(&mut self) -> Option<EventEnvelope> {
        if let Some((_, q)) = self.by_tick.range_mut(self.now..=self.now).next() {
            if let Some(env) = q.pop_front() {
                return Some(env);
            }
        }
        None
    }

    pub fn advance_tick(&mut self) {
        // clean empty current bucket
        if let Some((tick, q)) = self.by_tick.range(self.now..=self.now).next() {
            if q.is_empty() {
                let key = *tick;
                self.by_tick.remove(&key);
            }
        }
        self.now = self.now.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_within_a_tick() {
        let mut q = EventQueue::new();
        let a = q.emit_now(Event::Tick);
        let b = q.emit_now(Event::ConfigFileChanged);
        assert_eq!(q.pop_ready().unwrap().id, a);
        assert_eq!(q.pop_ready().unwrap().id, b);
        assert!(q.pop_ready().is_none());
    }

    #[test]
    fn events_do_not_leak_across_ticks() {
        let mut q = EventQueue::new();
        q.emit_now(Event::RebuildRequested {
            cause: RebuildCause::ConfigReload,
        });
        q.advance_tick();
        // emitted on tick 0; current tick is now 1
        assert!(q.pop_ready().is_none());
    }
}
