//! The subscriber registry: one bucket of senders per topic.
//!
//! Grounded on `util/events/router.go`'s `subscribers map[Topic][]RoutingPair`
//! guarded by `subscribersLock`/`topicLock`. We keep the same split lock
//! shape — a registry-wide `RwLock` for bucket existence plus a per-topic
//! [`NamedLock`](crate::util::NamedLock) serializing edits to one bucket —
//! over a racier atomic-snapshot alternative, since that design can't
//! express "wait for in-flight dispatch of this topic to finish before
//! removing its last subscriber" without extra bookkeeping.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use regex::Regex;
use tokio::sync::mpsc;

// Layer 3: Internal module imports
use super::config::BusConfig;
use super::event::Event;
use super::routing_key::RoutingKey;
use super::subscription::{Subscription, SubscriptionId};
use super::topic::Topic;
use crate::util::NamedLock;

#[derive(Clone)]
pub(crate) struct RoutingPair {
    pub(crate) id: SubscriptionId,
    pub(crate) sender: mpsc::Sender<Event>,
}

/// A topic's pattern compiled once at first-subscribe time, alongside the
/// subscribers registered under it.
struct Bucket {
    regex: Option<Regex>,
    subscribers: Vec<RoutingPair>,
}

impl Bucket {
    fn new(topic: &Topic) -> Self {
        let needs_regex = topic.as_str() != "*" && (topic.as_str().contains('#') || topic.as_str().contains('*'));
        Self {
            regex: needs_regex.then(|| topic.to_regex()),
            subscribers: Vec::new(),
        }
    }

    fn matches(&self, topic: &Topic, routing_key: &RoutingKey) -> bool {
        if topic.as_str() == "*" {
            return true;
        }

        if topic.as_str() == routing_key.as_str() {
            return true;
        }

        match &self.regex {
            Some(re) => re.is_match(routing_key.as_str()),
            None => false,
        }
    }
}

pub(crate) struct Registry {
    buckets: RwLock<HashMap<Topic, Bucket>>,
    topic_lock: NamedLock,
    config: BusConfig,
}

impl Registry {
    pub(crate) fn new(config: BusConfig) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            topic_lock: NamedLock::new(),
            config,
        }
    }

    pub(crate) async fn subscribe(&self, topic: Topic) -> Subscription {
        let _guard = self.topic_lock.lock(topic.as_str()).await;

        let (tx, rx) = mpsc::channel(self.config.subscriber_buffer_size);
        let id = SubscriptionId::new();

        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(topic.clone()).or_insert_with(|| Bucket::new(&topic));
        bucket.subscribers.push(RoutingPair { id, sender: tx });
        drop(buckets);

        Subscription::new(id, topic, rx)
    }

    /// Remove a subscription. Returns `true` if a matching entry was found.
    pub(crate) async fn unsubscribe(&self, topic: &Topic, id: SubscriptionId) -> bool {
        let _guard = self.topic_lock.lock(topic.as_str()).await;

        let mut buckets = self.buckets.write();
        let Some(bucket) = buckets.get_mut(topic) else {
            return false;
        };

        let before = bucket.subscribers.len();
        bucket.subscribers.retain(|pair| pair.id != id);
        let removed = bucket.subscribers.len() != before;

        if bucket.subscribers.is_empty() {
            buckets.remove(topic);
        }

        removed
    }

    /// Drop every subscriber across every topic, closing their channels.
    pub(crate) fn clear(&self) {
        self.buckets.write().clear();
    }

    /// Snapshot the subscriber lists of every topic whose pattern matches
    /// `routing_key`, for concurrent per-topic fan-out.
    pub(crate) fn matching(&self, routing_key: &RoutingKey) -> Vec<Vec<RoutingPair>> {
        let buckets = self.buckets.read();
        buckets
            .iter()
            .filter(|(topic, bucket)| bucket.matches(topic, routing_key))
            .map(|(_, bucket)| bucket.subscribers.clone())
            .collect()
    }
}
