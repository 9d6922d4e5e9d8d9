//! Basic fan-out: several subscribers, one publish, a wildcard and an
//! exact-prefix topic both matching.
//!
//! Run with: `cargo run --example basic_pubsub`

use eventrt::bus::{EventRouter, RoutingKey, Topic};
use eventrt::util::Payload;

#[tokio::main]
async fn main() {
    let router = EventRouter::new();
    router.start().await;

    let mut everything = router.subscribe(Topic::new("*").expect("valid topic")).await.expect("subscribed");
    let mut foo_only = router.subscribe(Topic::new("foo.*").expect("valid topic")).await.expect("subscribed");

    router
        .publish(RoutingKey::new("foo.bar").expect("valid routing key"), Payload::new("test1".to_string()))
        .await
        .expect("published");

    let a = everything.recv().await.expect("event delivered");
    let b = foo_only.recv().await.expect("event delivered");

    println!(
        "wildcard subscriber saw {} = {:?}",
        a.routing_key(),
        a.payload().downcast_ref::<String>()
    );
    println!(
        "foo.* subscriber saw {} = {:?}",
        b.routing_key(),
        b.payload().downcast_ref::<String>()
    );

    router.stop().await;
}
