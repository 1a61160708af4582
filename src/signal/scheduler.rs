use super::FrameTick;

/// Cadence of the timer fallback, in milliseconds (~60 Hz).
pub const TIMER_CADENCE_MS: f64 = 16.0;

/// How the scheduler paces frame delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// A request is due on the next window redraw (vsync-paced by the surface).
    Display,
    /// A request is due on a fixed ~16 ms grid, for hosts without a redraw signal.
    Timer,
}

impl Cadence {
    pub fn label(self) -> &'static str {
        match self {
            Cadence::Display => "display",
            Cadence::Timer => "timer",
        }
    }
}

/// Token returned by [`FrameScheduler::request_next_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy)]
struct PendingRequest {
    token: RequestToken,
    due_ms: f64,
}

/// One-shot "next frame" requests. The owner re-arms from inside each frame
/// to keep the loop going, and polls with the current time to find out
/// whether the armed request has fired.
pub struct FrameScheduler {
    cadence: Cadence,
    pending: Option<PendingRequest>,
    next_token: u64,
    /// Due time of the last timer request; spaces timer frames 16 ms apart.
    last_due_ms: f64,
    frames_delivered: u64,
}

impl FrameScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            pending: None,
            next_token: 0,
            last_due_ms: 0.0,
            frames_delivered: 0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Arm the next frame. Only one request is outstanding at a time; asking
    /// again while armed returns the existing token.
    pub fn request_next_frame(&mut self, now_ms: f64) -> RequestToken {
        if let Some(pending) = self.pending {
            return pending.token;
        }

        let due_ms = match self.cadence {
            Cadence::Display => now_ms,
            Cadence::Timer => {
                let time_to_call = (TIMER_CADENCE_MS - (now_ms - self.last_due_ms)).max(0.0);
                let due = now_ms + time_to_call;
                self.last_due_ms = due;
                due
            }
        };

        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(PendingRequest { token, due_ms });
        token
    }

    /// Disarm a request. Stale or unknown tokens are ignored.
    pub fn cancel_request(&mut self, token: RequestToken) -> bool {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// When the armed request becomes due, if any.
    pub fn deadline_ms(&self) -> Option<f64> {
        self.pending.map(|p| p.due_ms)
    }

    /// Fire the armed request if it is due. Timer frames are stamped with
    /// their scheduled time, display frames with `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> Option<FrameTick> {
        let pending = self.pending?;
        if now_ms < pending.due_ms {
            return None;
        }
        self.pending = None;
        self.frames_delivered += 1;

        let timestamp_ms = match self.cadence {
            Cadence::Display => now_ms,
            Cadence::Timer => pending.due_ms,
        };
        Some(FrameTick {
            timestamp_ms,
            frame: self.frames_delivered,
        })
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_request_fires_on_next_poll() {
        let mut sched = FrameScheduler::new(Cadence::Display);
        assert!(sched.poll(5.0).is_none());

        sched.request_next_frame(10.0);
        let tick = sched.poll(12.5).expect("armed display frame should fire");
        assert_eq!(tick.timestamp_ms, 12.5);
        assert_eq!(tick.frame, 1);
        assert!(!sched.is_armed());
        assert!(sched.poll(13.0).is_none());
    }

    #[test]
    fn timer_spaces_frames_sixteen_ms_apart() {
        let mut sched = FrameScheduler::new(Cadence::Timer);

        // First request long after the origin is due immediately.
        sched.request_next_frame(100.0);
        assert_eq!(sched.deadline_ms(), Some(100.0));
        let first = sched.poll(100.0).unwrap();
        assert_eq!(first.timestamp_ms, 100.0);

        // Re-armed 4 ms later: waits the remaining 12 ms.
        sched.request_next_frame(104.0);
        assert_eq!(sched.deadline_ms(), Some(116.0));
        assert!(sched.poll(110.0).is_none());
        let second = sched.poll(117.0).unwrap();
        assert_eq!(second.timestamp_ms, 116.0);
    }

    #[test]
    fn late_timer_request_is_due_immediately() {
        let mut sched = FrameScheduler::new(Cadence::Timer);
        sched.request_next_frame(0.0);
        sched.poll(16.0);
        sched.request_next_frame(50.0);
        assert_eq!(sched.deadline_ms(), Some(50.0));
    }

    #[test]
    fn cancel_disarms_matching_token_only() {
        let mut sched = FrameScheduler::new(Cadence::Display);
        let token = sched.request_next_frame(0.0);
        assert_eq!(sched.request_next_frame(1.0), token);

        assert!(sched.cancel_request(token));
        assert!(sched.poll(2.0).is_none());

        let fresh = sched.request_next_frame(3.0);
        assert_ne!(fresh, token);
        assert!(!sched.cancel_request(token));
        assert!(sched.is_armed());
    }
}
