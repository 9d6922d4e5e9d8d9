//! Integration test for the subscribe/unsubscribe/publish interaction
//! across the public router API, not just the registry directly.

#![allow(clippy::unwrap_used)]

use eventrt::bus::{EventRouter, RoutingKey, Topic};
use eventrt::util::Payload;

#[tokio::test]
async fn unsubscribed_subscriber_receives_nothing_further() {
    let router = EventRouter::new();
    router.start().await;

    let topic = Topic::new("foo.bar").unwrap();
    let mut gone = router.subscribe(topic.clone()).await.unwrap();
    let mut stays = router.subscribe(topic.clone()).await.unwrap();

    router.unsubscribe(&topic, gone.id()).await.unwrap();

    router
        .publish(RoutingKey::new("foo.bar").unwrap(), Payload::new("after-unsubscribe".to_string()))
        .await
        .unwrap();

    let event = stays.recv().await.unwrap();
    assert_eq!(event.payload().downcast_ref::<String>(), Some(&"after-unsubscribe".to_string()));

    // The sender half was dropped from the registry bucket, so the
    // unsubscribed receiver observes a closed channel rather than a
    // delivered event.
    assert!(gone.recv().await.is_none());

    router.stop().await;
}
