//! Scene Timers
//!
//! One-shot and repeating timers that carry a typed payload instead of a
//! callback. `tick` returns the payloads that fired this frame and the
//! scene matches on them, so nothing can run after the scene that owns
//! the `Timers` is dropped.

/// Handle for cancelling a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    id: TimerId,
    remaining: f32,
    /// `Some(period)` for repeating timers
    period: Option<f32>,
    payload: T,
}

/// Pending timers of one scene.
#[derive(Debug, Clone)]
pub struct Timers<T> {
    timers: Vec<Timer<T>>,
    next_id: u64,
}

impl<T: Clone> Timers<T> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    fn push(&mut self, delay: f32, period: Option<f32>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            remaining: delay.max(0.0),
            period,
            payload,
        });
        id
    }

    /// Fire `payload` once after `delay` seconds.
    pub fn wait(&mut self, delay: f32, payload: T) -> TimerId {
        self.push(delay, None, payload)
    }

    /// Fire `payload` every `period` seconds, first after one period.
    pub fn every(&mut self, period: f32, payload: T) -> TimerId {
        // A zero period would fire forever within one tick
        let period = period.max(1e-3);
        self.push(period, Some(period), payload)
    }

    /// Returns false if the timer already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Advance by `dt` and collect fired payloads in firing order.
    ///
    /// A repeating timer fires once per elapsed period, so a long frame
    /// can return the same payload more than once.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut fired: Vec<(f32, u64, T)> = Vec::new();

        for timer in &mut self.timers {
            timer.remaining -= dt;
            while timer.remaining <= 0.0 {
                // Overshoot orders timers that fired within the same frame
                fired.push((timer.remaining, timer.id.0, timer.payload.clone()));
                match timer.period {
                    Some(period) => timer.remaining += period,
                    None => break,
                }
            }
        }
        self.timers.retain(|t| t.period.is_some() || t.remaining > 0.0);

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, payload)| payload).collect()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T: Clone> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Ev {
        Done,
        Tick,
        Other,
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.wait(1.0, Ev::Done);

        assert!(timers.tick(0.5).is_empty());
        assert_eq!(timers.tick(0.5), vec![Ev::Done]);
        assert!(timers.tick(5.0).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repeating_keeps_firing() {
        let mut timers = Timers::new();
        timers.every(0.4, Ev::Tick);

        let mut count = 0;
        for _ in 0..110 {
            count += timers.tick(0.02).len();
        }
        // 2.2s at one tick per 0.4s
        assert_eq!(count, 5);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_long_frame_catches_up() {
        let mut timers = Timers::new();
        timers.every(1.0, Ev::Tick);
        assert_eq!(timers.tick(3.5), vec![Ev::Tick, Ev::Tick, Ev::Tick]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let tick = timers.every(1.0, Ev::Tick);
        let done = timers.wait(2.0, Ev::Done);

        assert!(timers.cancel(tick));
        assert!(!timers.cancel(tick));
        assert!(timers.is_pending(done));
        assert_eq!(timers.tick(2.0), vec![Ev::Done]);
        assert!(!timers.cancel(done));
    }

    #[test]
    fn test_same_frame_order_follows_due_time() {
        let mut timers = Timers::new();
        timers.wait(0.9, Ev::Other);
        timers.wait(0.1, Ev::Done);
        assert_eq!(timers.tick(1.0), vec![Ev::Done, Ev::Other]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut timers = Timers::new();
        timers.every(0.1, Ev::Tick);
        timers.wait(0.1, Ev::Done);
        timers.clear();
        assert!(timers.tick(1.0).is_empty());
    }
}
