pub mod scheduler;

use std::collections::HashMap;

/// Topic every animator listens on. Published once per delivered frame.
pub const FRAME_TOPIC: &str = "raf:frame:tick";

/// Payload delivered to subscribers of a frame topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Timestamp of this frame in milliseconds since the app clock origin.
    pub timestamp_ms: f64,
    /// Monotonic count of delivered frames.
    pub frame: u64,
}

/// Ownership token for one registration on a [`FrameHub`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Returns `false` once it has nothing left to drive; the hub then drops it.
type Handler = Box<dyn FnMut(&FrameTick) -> bool>;

struct Subscriber {
    handle: SubscriptionHandle,
    handler: Handler,
}

/// Topic-keyed subscriber registry. Single-threaded; handlers run
/// synchronously inside `publish`, in registration order. A handler that
/// returns `false` is unregistered on the spot.
pub struct FrameHub {
    topics: HashMap<String, Vec<Subscriber>>,
    next_id: u64,
}

impl FrameHub {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register `handler` on `topic`. Keep the returned handle to unsubscribe.
    pub fn subscribe(
        &mut self,
        topic: &str,
        handler: impl FnMut(&FrameTick) -> bool + 'static,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_id);
        self.next_id += 1;

        self.topics
            .entry(topic.to_owned())
            .or_default()
            .push(Subscriber {
                handle,
                handler: Box::new(handler),
            });

        log::debug!("subscribed {:?} to '{}'", handle, topic);
        handle
    }

    /// Remove a registration. Returns false if the handle was already gone.
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        for (topic, subs) in self.topics.iter_mut() {
            if let Some(idx) = subs.iter().position(|s| s.handle == handle) {
                subs.remove(idx);
                log::debug!("unsubscribed {:?} from '{}'", handle, topic);
                return true;
            }
        }
        false
    }

    /// Fire every current subscriber of `topic`. Returns how many ran.
    pub fn publish(&mut self, topic: &str, tick: &FrameTick) -> usize {
        let Some(subs) = self.topics.get_mut(topic) else {
            return 0;
        };
        let ran = subs.len();
        subs.retain_mut(|sub| {
            let keep = (sub.handler)(tick);
            if !keep {
                log::debug!("dropped expired {:?} from '{}'", sub.handle, topic);
            }
            keep
        });
        ran
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Drop every registration on every topic.
    pub fn clear(&mut self) {
        let total: usize = self.topics.values().map(Vec::len).sum();
        self.topics.clear();
        log::debug!("frame hub cleared ({} subscribers dropped)", total);
    }
}

impl Default for FrameHub {
    fn default() -> Self {
        Self::new()
    }
}
