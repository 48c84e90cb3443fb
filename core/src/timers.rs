use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use web_time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Scheduled callbacks on a virtual clock the host drives with [`Timers::advance`].
#[derive(Clone, Debug)]
pub struct Timers<T> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), T>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), task);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = self.pending.keys().find(|(_, key_id)| *key_id == id).copied()?;
        self.pending.remove(&key)
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::trace!("cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    /// Moves the clock forward and hands back every task that came due, earliest first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let later = self
            .pending
            .split_off(&(self.now + Duration::from_nanos(1), TimerId(0)));
        let due = core::mem::replace(&mut self.pending, later);
        due.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_fire_in_deadline_order() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_millis(300), "late");
        timers.schedule(Duration::from_millis(100), "early");
        timers.schedule(Duration::from_millis(100), "early-second");

        assert!(timers.advance(Duration::from_millis(99)).is_empty());
        assert_eq!(
            timers.advance(Duration::from_millis(1)),
            ["early", "early-second"]
        );
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.advance(Duration::from_secs(1)), ["late"]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut timers = Timers::new();
        let id = timers.schedule(Duration::from_millis(10), 1);
        timers.schedule(Duration::from_millis(20), 2);

        assert_eq!(timers.cancel(id), Some(1));
        assert_eq!(timers.cancel(id), None);
        assert_eq!(timers.advance(Duration::from_millis(50)), [2]);

        timers.schedule(Duration::from_millis(5), 3);
        timers.cancel_all();
        assert!(timers.advance(Duration::from_secs(5)).is_empty());
    }
}
