use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{AnimError, AnimationSpec};
use crate::signal::{FrameHub, SubscriptionHandle, FRAME_TOPIC};

/// Mutable cycle bookkeeping. Only the animator's own frame handler writes it.
#[derive(Debug, Clone, Copy)]
struct Cycle {
    current: u32,
    start: u32,
    end: u32,
    step_interval_ms: f64,
    accumulated_ms: f64,
    last_tick_ms: f64,
}

impl Cycle {
    fn new(spec: &AnimationSpec) -> Self {
        Self {
            current: spec.start_frame,
            start: spec.start_frame,
            end: spec.end_frame,
            step_interval_ms: spec.step_interval_ms().unwrap_or(0.0),
            accumulated_ms: 0.0,
            last_tick_ms: 0.0,
        }
    }

    fn step(&mut self, now_ms: f64) {
        // A clock that steps backwards contributes nothing.
        let elapsed = (now_ms - self.last_tick_ms).max(0.0);
        self.last_tick_ms = now_ms;
        self.accumulated_ms += elapsed;

        if self.accumulated_ms > self.step_interval_ms {
            self.current += 1;
            if self.current > self.end {
                self.current = self.start;
            }
            // Overshoot is dropped, not carried into the next interval.
            self.accumulated_ms = 0.0;
        }
    }
}

/// Advances a wrapping sprite-frame index from wall-clock time.
///
/// The animator subscribes itself to a frame topic on a [`FrameHub`] while
/// running; every published tick feeds its timestamp into the cycle. A static
/// pose never subscribes. Read [`current`](Self::current) and
/// [`frame_size`](Self::frame_size) at draw time.
pub struct FrameAnimator {
    topic: String,
    spec: Option<AnimationSpec>,
    cycle: Rc<RefCell<Cycle>>,
    subscription: Option<SubscriptionHandle>,
}

impl FrameAnimator {
    /// An animator listening on [`FRAME_TOPIC`] with no spec yet.
    pub fn new() -> Self {
        Self::on_topic(FRAME_TOPIC)
    }

    pub fn on_topic(topic: &str) -> Self {
        Self {
            topic: topic.to_owned(),
            spec: None,
            cycle: Rc::new(RefCell::new(Cycle::new(&AnimationSpec::pose(0, 0.0)))),
            subscription: None,
        }
    }

    /// Swap in a new spec, restarting from its first frame. Any running
    /// cycle is stopped first. An invalid spec leaves the animator untouched.
    pub fn activate(
        &mut self,
        spec: AnimationSpec,
        hub: &mut FrameHub,
        now_ms: f64,
    ) -> Result<(), AnimError> {
        spec.validate()?;

        self.stop(hub);
        self.spec = Some(spec);
        *self.cycle.borrow_mut() = Cycle::new(&spec);

        if !spec.is_static() {
            self.start(hub, now_ms);
        }
        Ok(())
    }

    /// Begin (or resume) advancing. Partial progress from before a `stop`
    /// is discarded.
    pub fn start(&mut self, hub: &mut FrameHub, now_ms: f64) {
        let Some(spec) = self.spec else {
            log::warn!("start() on an animator with no spec; ignoring");
            return;
        };
        if spec.is_static() {
            return;
        }
        if let Some(handle) = self.subscription.take() {
            // Caller error. Replace the old registration instead of stepping twice per frame.
            log::warn!("start() while already running on '{}'; restarting", self.topic);
            hub.unsubscribe(handle);
        }

        {
            let mut cycle = self.cycle.borrow_mut();
            cycle.accumulated_ms = 0.0;
            cycle.last_tick_ms = now_ms;
        }

        let cycle: Weak<RefCell<Cycle>> = Rc::downgrade(&self.cycle);
        // Once the animator is gone the upgrade fails and the hub drops us.
        let handle = hub.subscribe(&self.topic, move |tick| match cycle.upgrade() {
            Some(cycle) => {
                cycle.borrow_mut().step(tick.timestamp_ms);
                true
            }
            None => false,
        });
        self.subscription = Some(handle);
        log::debug!(
            "animator started: frames {}..={} every {:.1}ms",
            spec.start_frame,
            spec.end_frame,
            self.cycle.borrow().step_interval_ms
        );
    }

    /// Stop advancing. Safe to call when not running.
    pub fn stop(&mut self, hub: &mut FrameHub) {
        if let Some(handle) = self.subscription.take() {
            hub.unsubscribe(handle);
            log::debug!("animator stopped at frame {}", self.current());
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    /// Current frame index. Zero before the first `activate`.
    pub fn current(&self) -> u32 {
        self.cycle.borrow().current
    }

    /// Pixel width of one frame from the active spec.
    pub fn frame_size(&self) -> f32 {
        self.spec.map_or(0.0, |s| s.frame_size)
    }

    /// X offset of the current frame inside its sprite-sheet row.
    pub fn source_offset(&self) -> f32 {
        self.frame_size() * self.current() as f32
    }

    #[cfg(test)]
    pub fn spec(&self) -> Option<&AnimationSpec> {
        self.spec.as_ref()
    }

    /// Time accrued toward the next advance.
    #[cfg(test)]
    pub fn accumulated_ms(&self) -> f64 {
        self.cycle.borrow().accumulated_ms
    }
}

impl Default for FrameAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::FrameTick;

    /// Publishes frames at absolute times built from successive gaps.
    struct Driver {
        hub: FrameHub,
        now: f64,
        frame: u64,
    }

    impl Driver {
        fn new() -> Self {
            Self {
                hub: FrameHub::new(),
                now: 0.0,
                frame: 0,
            }
        }

        fn advance(&mut self, gap_ms: f64) {
            self.now += gap_ms;
            self.frame += 1;
            let tick = FrameTick {
                timestamp_ms: self.now,
                frame: self.frame,
            };
            self.hub.publish(FRAME_TOPIC, &tick);
        }
    }

    fn run_2_to_5() -> AnimationSpec {
        AnimationSpec::cycle(2, 5, 300.0, 40.0)
    }

    #[test]
    fn wraps_back_to_start_after_end_frame() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        assert_eq!(anim.current(), 2);

        let mut seen = Vec::new();
        for _ in 0..4 {
            d.advance(101.0);
            seen.push(anim.current());
        }
        assert_eq!(seen, vec![3, 4, 5, 2]);
    }

    #[test]
    fn holds_frame_below_interval() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();

        d.advance(50.0);
        assert_eq!(anim.current(), 2);
        assert_eq!(anim.accumulated_ms(), 50.0);
    }

    #[test]
    fn exact_interval_does_not_advance() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();

        d.advance(100.0);
        assert_eq!(anim.current(), 2);
        d.advance(1.0);
        assert_eq!(anim.current(), 3);
        assert_eq!(anim.accumulated_ms(), 0.0);
    }

    #[test]
    fn overshoot_is_not_carried_forward() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();

        // One long frame still advances by a single step.
        d.advance(450.0);
        assert_eq!(anim.current(), 3);
        d.advance(60.0);
        assert_eq!(anim.current(), 3);
    }

    #[test]
    fn static_pose_never_moves() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(AnimationSpec::pose(6, 40.0), &mut d.hub, d.now)
            .unwrap();
        assert!(!anim.is_running());
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 0);

        anim.start(&mut d.hub, d.now);
        for _ in 0..50 {
            d.advance(250.0);
            assert_eq!(anim.current(), 6);
        }
        assert!(!anim.is_running());
    }

    #[test]
    fn stays_in_bounds_under_irregular_frames() {
        let mut d = Driver::new();
        let mut rng = fastrand::Rng::with_seed(7);
        let mut anim = FrameAnimator::new();
        anim.activate(AnimationSpec::cycle(3, 7, 120.0, 32.0), &mut d.hub, d.now)
            .unwrap();

        for _ in 0..2000 {
            d.advance(rng.f64() * 80.0);
            let cur = anim.current();
            assert!((3..=7).contains(&cur), "frame {cur} escaped 3..=7");
        }
    }

    #[test]
    fn restart_discards_partial_progress() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();

        d.advance(80.0);
        assert_eq!(anim.accumulated_ms(), 80.0);

        anim.stop(&mut d.hub);
        anim.start(&mut d.hub, d.now);
        d.advance(90.0);
        assert_eq!(anim.current(), 2);
        assert_eq!(anim.accumulated_ms(), 90.0);
    }

    #[test]
    fn stopped_animator_ignores_frames() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        d.advance(101.0);
        anim.stop(&mut d.hub);

        for _ in 0..10 {
            d.advance(101.0);
        }
        assert_eq!(anim.current(), 3);
    }

    #[test]
    fn stop_twice_is_harmless() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        d.advance(101.0);

        anim.stop(&mut d.hub);
        let frame = anim.current();
        let acc = anim.accumulated_ms();
        anim.stop(&mut d.hub);

        assert!(!anim.is_running());
        assert_eq!(anim.current(), frame);
        assert_eq!(anim.accumulated_ms(), acc);

        // Never started at all.
        FrameAnimator::new().stop(&mut d.hub);
    }

    #[test]
    fn animators_on_one_topic_are_independent() {
        let mut d = Driver::new();
        let mut slow = FrameAnimator::new();
        let mut fast = FrameAnimator::new();
        slow.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        fast.activate(AnimationSpec::cycle(0, 1, 50.0, 40.0), &mut d.hub, d.now)
            .unwrap();
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 2);

        d.advance(60.0);
        assert_eq!(fast.current(), 1);
        assert_eq!(slow.current(), 2);
        assert_eq!(slow.accumulated_ms(), 60.0);

        d.advance(60.0);
        assert_eq!(fast.current(), 0);
        assert_eq!(slow.current(), 3);
    }

    #[test]
    fn reactivation_replaces_the_cycle() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        d.advance(101.0);

        anim.activate(AnimationSpec::cycle(6, 9, 325.0, 40.0), &mut d.hub, d.now)
            .unwrap();
        assert_eq!(anim.current(), 6);
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 1);

        anim.activate(AnimationSpec::pose(2, 40.0), &mut d.hub, d.now)
            .unwrap();
        assert!(!anim.is_running());
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 0);
    }

    #[test]
    fn invalid_spec_keeps_previous_state() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();

        let err = anim
            .activate(AnimationSpec::cycle(9, 6, 325.0, 40.0), &mut d.hub, d.now)
            .unwrap_err();
        assert_eq!(err, AnimError::ReversedRange { start: 9, end: 6 });
        assert!(anim.is_running());
        assert_eq!(anim.spec(), Some(&run_2_to_5()));
    }

    #[test]
    fn double_start_keeps_one_registration() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        anim.activate(AnimationSpec::cycle(0, 3, 150.0, 40.0), &mut d.hub, d.now)
            .unwrap();
        anim.start(&mut d.hub, d.now);
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 1);

        d.advance(51.0);
        assert_eq!(anim.current(), 1);
    }

    #[test]
    fn renderer_offset_follows_frame() {
        let mut d = Driver::new();
        let mut anim = FrameAnimator::new();
        assert_eq!(anim.source_offset(), 0.0);

        anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        assert_eq!(anim.frame_size(), 40.0);
        assert_eq!(anim.source_offset(), 80.0);
        d.advance(101.0);
        assert_eq!(anim.source_offset(), 120.0);
    }

    #[test]
    fn dropped_animators_release_their_registrations() {
        let mut d = Driver::new();
        let mut kept = FrameAnimator::new();
        kept.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        for _ in 0..1000 {
            let mut anim = FrameAnimator::new();
            anim.activate(run_2_to_5(), &mut d.hub, d.now).unwrap();
        }
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 1001);

        d.advance(101.0);
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 1);
        assert_eq!(kept.current(), 3);

        // The survivor's own handle still works.
        kept.stop(&mut d.hub);
        assert_eq!(d.hub.subscriber_count(FRAME_TOPIC), 0);
    }
}
