//! Cooperative software timers multiplexed over one hardware tick.
//!
//! A fixed set of countdown slots share a single periodic interrupt:
//! [`SoftwareTimers::tick`] decrements armed slots from the interrupt
//! handler, and [`SoftwareTimers::poll`] fires expired callbacks from the
//! main loop. Callbacks reschedule themselves by returning
//! [`TimerOutcome::Reschedule`] or go dormant with [`TimerOutcome::Cancel`].

/// What an expired timer slot does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerOutcome {
    /// Re-arm the slot to fire again after this many milliseconds.
    Reschedule(u32),

    /// Disarm the slot until the next explicit [`SoftwareTimers::start`].
    Cancel,
}

/// Callback invoked from [`SoftwareTimers::poll`] when a slot expires.
pub type TimerCallback<C> = fn(&mut C) -> TimerOutcome;

/// Errors from slot management operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Slot index is outside the scheduler's capacity.
    InvalidSlot(usize),

    /// The slot has no registered callback.
    NotRegistered(usize),
}

impl core::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SchedulerError::InvalidSlot(slot) => {
                write!(f, "timer slot {} exceeds scheduler capacity", slot)
            }
            SchedulerError::NotRegistered(slot) => {
                write!(f, "timer slot {} has no registered callback", slot)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}

#[derive(Clone, Copy)]
struct Slot<C> {
    callback: TimerCallback<C>,
    armed: bool,
    ticks_left: u32,
}

/// A fixed-capacity cooperative timer multiplexer.
///
/// Millisecond intervals are converted to tick counts with truncating
/// division by the base interval, so intervals shorter than one tick
/// expire on the next poll.
///
/// # Type Parameters
/// * `C` - Context passed to every callback
/// * `N` - Number of timer slots
pub struct SoftwareTimers<C, const N: usize> {
    slots: [Option<Slot<C>>; N],
    tick_interval_ms: u32,
}

impl<C, const N: usize> SoftwareTimers<C, N> {
    /// Creates a scheduler whose hardware tick fires every
    /// `tick_interval_ms` milliseconds.
    ///
    /// # Panics
    /// Panics if `tick_interval_ms` is zero.
    pub fn new(tick_interval_ms: u32) -> Self {
        assert!(tick_interval_ms > 0, "tick interval must be non-zero");
        Self {
            slots: core::array::from_fn(|_| None),
            tick_interval_ms,
        }
    }

    /// Registers a callback on a slot, replacing any previous one.
    ///
    /// The slot starts disarmed; arm it with [`start`](Self::start).
    ///
    /// # Errors
    /// `InvalidSlot` if `slot >= N`.
    pub fn register(
        &mut self,
        slot: usize,
        callback: TimerCallback<C>,
    ) -> Result<(), SchedulerError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SchedulerError::InvalidSlot(slot))?;
        *entry = Some(Slot {
            callback,
            armed: false,
            ticks_left: 0,
        });
        Ok(())
    }

    /// Removes a slot's callback and disarms it.
    pub fn unregister(&mut self, slot: usize) -> Result<(), SchedulerError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SchedulerError::InvalidSlot(slot))?;
        *entry = None;
        Ok(())
    }

    /// Arms a slot to fire after `millis` milliseconds.
    ///
    /// # Errors
    /// `InvalidSlot` for an out-of-range index, `NotRegistered` when the
    /// slot has no callback.
    pub fn start(&mut self, slot: usize, millis: u32) -> Result<(), SchedulerError> {
        let interval = self.tick_interval_ms;
        let entry = self.slot_mut(slot)?;
        entry.armed = true;
        entry.ticks_left = millis / interval;
        Ok(())
    }

    /// Disarms a slot without removing its callback.
    pub fn stop(&mut self, slot: usize) -> Result<(), SchedulerError> {
        let entry = self.slot_mut(slot)?;
        entry.armed = false;
        Ok(())
    }

    /// Returns true if the slot is armed.
    pub fn is_armed(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(entry)) if entry.armed)
    }

    /// Advances time by one hardware tick. Interrupt context: O(N)
    /// decrements, no callbacks run here.
    pub fn tick(&mut self) {
        for entry in self.slots.iter_mut().flatten() {
            if entry.armed && entry.ticks_left > 0 {
                entry.ticks_left -= 1;
            }
        }
    }

    /// Fires expired slots. Foreground context.
    ///
    /// Every armed slot whose countdown reached zero has its callback
    /// invoked with `ctx`; the returned [`TimerOutcome`] re-arms or
    /// disarms the slot.
    pub fn poll(&mut self, ctx: &mut C) {
        for entry in self.slots.iter_mut().flatten() {
            if entry.armed && entry.ticks_left == 0 {
                match (entry.callback)(ctx) {
                    TimerOutcome::Reschedule(millis) => {
                        entry.ticks_left = millis / self.tick_interval_ms;
                    }
                    TimerOutcome::Cancel => {
                        entry.armed = false;
                    }
                }
            }
        }
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut Slot<C>, SchedulerError> {
        self.slots
            .get_mut(slot)
            .ok_or(SchedulerError::InvalidSlot(slot))?
            .as_mut()
            .ok_or(SchedulerError::NotRegistered(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counters {
        fired: [u32; 4],
    }

    fn count0(ctx: &mut Counters) -> TimerOutcome {
        ctx.fired[0] += 1;
        TimerOutcome::Reschedule(100)
    }

    fn count1_once(ctx: &mut Counters) -> TimerOutcome {
        ctx.fired[1] += 1;
        TimerOutcome::Cancel
    }

    fn timers() -> SoftwareTimers<Counters, 4> {
        SoftwareTimers::new(10)
    }

    #[test]
    #[should_panic(expected = "tick interval must be non-zero")]
    fn zero_tick_interval_is_rejected() {
        let _ = SoftwareTimers::<Counters, 4>::new(0);
    }

    #[test]
    fn registered_slot_stays_dormant_until_started() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(0, count0).unwrap();

        for _ in 0..20 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[0], 0);
        assert!(!t.is_armed(0));
    }

    #[test]
    fn slot_fires_after_interval_elapses() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(1, count1_once).unwrap();
        t.start(1, 30).unwrap(); // 3 ticks at 10ms

        for _ in 0..2 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[1], 0);

        t.tick();
        t.poll(&mut ctx);
        assert_eq!(ctx.fired[1], 1);
    }

    #[test]
    fn cancel_outcome_disarms_slot() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(1, count1_once).unwrap();
        t.start(1, 10).unwrap();

        for _ in 0..10 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[1], 1);
        assert!(!t.is_armed(1));
    }

    #[test]
    fn reschedule_outcome_keeps_slot_periodic() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(0, count0).unwrap();
        t.start(0, 100).unwrap(); // 10 ticks, reschedules itself for 100ms

        for _ in 0..35 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[0], 3);
        assert!(t.is_armed(0));
    }

    #[test]
    fn sub_tick_interval_fires_on_next_poll() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(1, count1_once).unwrap();
        t.start(1, 5).unwrap(); // shorter than one 10ms tick

        t.poll(&mut ctx);
        assert_eq!(ctx.fired[1], 1);
    }

    #[test]
    fn stop_disarms_without_losing_callback() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(1, count1_once).unwrap();
        t.start(1, 10).unwrap();
        t.stop(1).unwrap();

        for _ in 0..5 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[1], 0);

        // Callback is still there; slot can be re-armed directly.
        t.start(1, 10).unwrap();
        t.tick();
        t.poll(&mut ctx);
        assert_eq!(ctx.fired[1], 1);
    }

    #[test]
    fn independent_slots_run_concurrently() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(0, count0).unwrap();
        t.register(1, count1_once).unwrap();
        t.start(0, 20).unwrap();
        t.start(1, 40).unwrap();

        for _ in 0..4 {
            t.tick();
            t.poll(&mut ctx);
        }
        assert_eq!(ctx.fired[0], 1);
        assert_eq!(ctx.fired[1], 1);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut t = timers();
        assert_eq!(
            t.register(4, count0),
            Err(SchedulerError::InvalidSlot(4))
        );
        assert_eq!(t.start(9, 100), Err(SchedulerError::InvalidSlot(9)));
    }

    #[test]
    fn starting_unregistered_slot_is_rejected() {
        let mut t = timers();
        assert_eq!(t.start(2, 100), Err(SchedulerError::NotRegistered(2)));
    }

    #[test]
    fn unregister_silences_slot() {
        let mut t = timers();
        let mut ctx = Counters::default();
        t.register(1, count1_once).unwrap();
        t.start(1, 10).unwrap();
        t.unregister(1).unwrap();

        t.tick();
        t.poll(&mut ctx);
        assert_eq!(ctx.fired[1], 0);
        assert_eq!(t.start(1, 10), Err(SchedulerError::NotRegistered(1)));
    }
}
