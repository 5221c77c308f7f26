/// Side effects that fire a fixed number of ticks after their cause. Keyed to
/// the simulation tick so a paused game freezes them too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredEffect {
    PowerModeOff,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due_tick: u64,
    effect: DeferredEffect,
}

#[derive(Clone, Debug, Default)]
pub struct TickScheduler {
    pending: Vec<Scheduled>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// An effect already pending is replaced, so its timer restarts.
    pub fn schedule(&mut self, now_tick: u64, after_ticks: u64, effect: DeferredEffect) {
        self.cancel(effect);
        self.pending.push(Scheduled {
            due_tick: now_tick.saturating_add(after_ticks),
            effect,
        });
    }

    /// Removes and returns every effect due at or before `now_tick`, oldest first.
    pub fn due(&mut self, now_tick: u64) -> Vec<DeferredEffect> {
        let mut fired: Vec<Scheduled> = Vec::new();
        self.pending.retain(|item| {
            if item.due_tick <= now_tick {
                fired.push(*item);
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|item| item.due_tick);
        fired.into_iter().map(|item| item.effect).collect()
    }

    pub fn cancel(&mut self, effect: DeferredEffect) -> bool {
        let before = self.pending.len();
        self.pending.retain(|item| item.effect != effect);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, effect: DeferredEffect) -> bool {
        self.pending.iter().any(|item| item.effect == effect)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
