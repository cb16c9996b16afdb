use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use meowbot_core::error::Result;
use meowbot_core::protocol::{decode_frame, Channel, Notification};

/// Subscriber callback. Errors are logged by the dispatcher and never stop
/// the remaining subscribers of the same frame.
pub type Subscriber = Arc<dyn Fn(&Notification) -> Result<()> + Send + Sync>;

/// Subscription category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Catch-all: every channel, always invoked first.
    All,
    GroupMessages,
    FriendMessages,
    Events,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::GroupMessages => "group_messages",
            Category::FriendMessages => "friend_messages",
            Category::Events => "events",
        }
    }
}

impl From<Channel> for Category {
    fn from(c: Channel) -> Self {
        match c {
            Channel::GroupMessages => Category::GroupMessages,
            Channel::FriendMessages => Category::FriendMessages,
            Channel::Events => Category::Events,
        }
    }
}

/// Returned by `subscribe`; pass to `unsubscribe` to remove the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    category: Category,
}

impl SubscriptionHandle {
    pub fn category(&self) -> Category {
        self.category
    }
}

/// Ordered subscriber registry + per-frame fan-out.
pub struct Dispatcher {
    subscribers: DashMap<Category, Vec<(u64, Subscriber)>>,
    next_id: AtomicU64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append `cb` to `category`. Insertion order is delivery order.
    pub fn subscribe(&self, category: Category, cb: Subscriber) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.entry(category).or_default().push((id, cb));
        SubscriptionHandle { id, category }
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let Some(mut list) = self.subscribers.get_mut(&handle.category) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != handle.id);
        before != list.len()
    }

    pub fn subscriber_count(&self, category: Category) -> usize {
        self.subscribers.get(&category).map(|l| l.len()).unwrap_or(0)
    }

    /// Subscribers for one frame: catch-all first, then the channel list.
    /// Cloned out so callbacks may (un)subscribe without touching this frame.
    fn snapshot(&self, channel: Channel) -> Vec<Subscriber> {
        let mut out = Vec::new();
        for cat in [Category::All, Category::from(channel)] {
            if let Some(list) = self.subscribers.get(&cat) {
                out.extend(list.iter().map(|(_, cb)| Arc::clone(cb)));
            }
        }
        out
    }

    /// Decode a raw frame and fan it out. Returns how many subscribers ran.
    ///
    /// Frames that fail to decode are logged and dropped; nothing partial is
    /// ever delivered.
    pub fn dispatch_frame(&self, channel: &str, payload: Value) -> Result<usize> {
        let Some(ch) = Channel::from_wire(channel) else {
            tracing::debug!(channel = %channel, "frame on unknown channel ignored");
            return Ok(0);
        };

        let n = match decode_frame(ch, payload) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(
                    channel = %channel,
                    code = e.code().as_str(),
                    error = %e,
                    "frame dropped"
                );
                return Err(e);
            }
        };
        Ok(self.dispatch(&n))
    }

    /// Deliver an already decoded notification.
    pub fn dispatch(&self, n: &Notification) -> usize {
        let subs = self.snapshot(n.channel());
        for cb in &subs {
            match catch_unwind(AssertUnwindSafe(|| cb(n))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(
                        channel = n.channel().as_wire(),
                        error = %e,
                        "subscriber failed"
                    );
                }
                Err(_) => {
                    tracing::error!(channel = n.channel().as_wire(), "subscriber panicked");
                }
            }
        }
        subs.len()
    }
}
