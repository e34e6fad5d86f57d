use super::OverlayKind;
use crate::{bindings::TimerId, host::Timers};

/// One pending timer handle per `OverlayKind`, at most.
///
/// Arming a kind that already has a pending timer clears that timer first, so triggers of
/// the same kind never stack and the latest one always wins.
#[derive(Debug, Default)]
pub(crate) struct TimerTable {
    handles: [Option<TimerId>; OverlayKind::COUNT],
}

impl TimerTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Schedule the expiry of `kind` in `delay_ms` milliseconds, replacing any pending one.
    pub(crate) fn arm(&mut self, timers: &mut dyn Timers, kind: OverlayKind, delay_ms: f64) -> TimerId {
        self.cancel(timers, kind);
        let id = timers.start(delay_ms, kind);
        self.handles[kind.index()] = Some(id);
        id
    }

    /// Clear the pending timer of `kind`, if one. Returns `true` if one was pending.
    pub(crate) fn cancel(&mut self, timers: &mut dyn Timers, kind: OverlayKind) -> bool {
        match self.handles[kind.index()].take() {
            Some(id) => {
                timers.clear(id);
                true
            }
            None => false,
        }
    }

    /// Clear every pending timer.
    pub(crate) fn cancel_all(&mut self, timers: &mut dyn Timers) {
        for kind in OverlayKind::ALL {
            self.cancel(timers, kind);
        }
    }

    /// To call when the timer `id` of `kind` elapsed.
    ///
    /// Returns `true` only if `id` is the handle currently pending for `kind`, in which case
    /// it is forgotten. A `false` return means the timer was replaced or cancelled and its
    /// expiry must be ignored.
    pub(crate) fn expire(&mut self, kind: OverlayKind, id: TimerId) -> bool {
        let slot = &mut self.handles[kind.index()];
        if *slot == Some(id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self, kind: OverlayKind) -> bool {
        self.handles[kind.index()].is_some()
    }

    #[cfg(test)]
    pub(crate) fn pending_count(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTimers;

    #[test]
    fn test_rearming_replaces_pending_timer() {
        let mut timers = ManualTimers::default();
        let mut table = TimerTable::new();

        let first = table.arm(&mut timers, OverlayKind::VolumeHud, 1000.);
        timers.advance(400.);
        let second = table.arm(&mut timers, OverlayKind::VolumeHud, 1000.);

        assert_ne!(first, second);
        assert_eq!(table.pending_count(), 1);
        assert_eq!(timers.pending().len(), 1);
        assert_eq!(timers.pending()[0].fires_at, 1400.);
        assert!(!table.expire(OverlayKind::VolumeHud, first));
        assert!(table.expire(OverlayKind::VolumeHud, second));
        assert!(!table.is_pending(OverlayKind::VolumeHud));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut timers = ManualTimers::default();
        let mut table = TimerTable::new();
        table.arm(&mut timers, OverlayKind::Flash, 600.);
        table.arm(&mut timers, OverlayKind::Controls, 2200.);
        assert!(table.cancel(&mut timers, OverlayKind::Flash));
        assert!(!table.cancel(&mut timers, OverlayKind::Flash));
        assert!(table.is_pending(OverlayKind::Controls));
        assert_eq!(timers.pending().len(), 1);
    }

    #[test]
    fn test_cancel_all_leaves_nothing_pending() {
        let mut timers = ManualTimers::default();
        let mut table = TimerTable::new();
        for kind in OverlayKind::ALL {
            table.arm(&mut timers, kind, 100.);
        }
        assert_eq!(table.pending_count(), OverlayKind::COUNT);
        table.cancel_all(&mut timers);
        assert_eq!(table.pending_count(), 0);
        assert!(timers.pending().is_empty());
    }
}
