//! I/O subscribers that drain log events from the bus to a byte sink.
//!
//! Grounded on `modules/EventBus/logger.go`'s `ioLogSubscriber`/
//! `ioLogProcessor`/`ioWriter` and the `SplitStdoutStderrLogSubscriber`/
//! `StdoutLogSubscriber`/`StderrLogSubscriber`/`FileLogSubscriber`
//! convenience constructors, including its re-validation guard on every
//! event before writing.

// Layer 1: Standard library imports
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tracing::trace;

// Layer 3: Internal module imports
use super::constants::{DEBUG_LOGS_TOPIC, ERROR_LOGS_TOPIC, INFO_LOGS_TOPIC, WARN_LOGS_TOPIC};
use super::error::LogBridgeError;
use super::record::LogRecord;
use crate::bus::{EventRouter, RoutingKey, SubscriptionId, Topic};
use crate::util::Payload;

/// How long a best-effort diagnostic republish is allowed to block before
/// being abandoned, so a full ingress channel can never stall the I/O
/// writer loop indefinitely.
const DIAGNOSTIC_PUBLISH_TIMEOUT: Duration = Duration::from_millis(50);

/// Subscribe `writer` to `topic` on `router`, writing every matching log
/// event's payload to it from a dedicated background task.
///
/// Returns the subscription's identity, useful for calling
/// [`EventRouter::unsubscribe`] to stop the drain early; most callers can
/// safely ignore it, matching the original's "for advanced usage" framing.
pub async fn io_log_subscriber<W>(
    router: Arc<EventRouter>,
    topic: Topic,
    writer: W,
) -> Result<SubscriptionId, LogBridgeError>
where
    W: Write + Send + 'static,
{
    let sub = router.subscribe(topic).await?;
    let id = sub.id();
    let task_router = Arc::clone(&router);

    tokio::spawn(io_log_processor(sub, writer, task_router));

    Ok(id)
}

async fn io_log_processor<W: Write + Send + 'static>(
    mut sub: crate::bus::Subscription,
    mut writer: W,
    router: Arc<EventRouter>,
) {
    while let Some(event) = sub.recv().await {
        if let Err(err) = event.is_valid() {
            republish_diagnostic(&router, event.routing_key(), format!("log subscriber received invalid event: {err}")).await;
            continue;
        }

        let Some(record) = event.payload().downcast_ref::<LogRecord>() else {
            continue;
        };

        write_tolerant(&mut writer, record, event.routing_key(), &router).await;
    }

    trace!("log io subscriber exited");
}

async fn write_tolerant<W: Write>(writer: &mut W, record: &LogRecord, routing_key: &RoutingKey, router: &EventRouter) {
    let mut data: &[u8] = record.as_ref();
    let total = data.len();

    loop {
        match writer.write(data) {
            Ok(0) if !data.is_empty() => {
                republish_diagnostic(
                    router,
                    routing_key,
                    format!("no bytes written to io channel. data: {total} bytes"),
                )
                .await;
                break;
            }
            Ok(n) if n < data.len() => {
                data = &data[n..];
            }
            Ok(_) => break,
            Err(err) => {
                republish_diagnostic(router, routing_key, format!("error writing log to io channel: {err}")).await;
                break;
            }
        }
    }
}

async fn republish_diagnostic(router: &EventRouter, routing_key: &RoutingKey, message: String) {
    let payload = Payload::new(LogRecord::text(message));
    let _ = tokio::time::timeout(DIAGNOSTIC_PUBLISH_TIMEOUT, router.publish(routing_key.clone(), payload)).await;
}

/// Subscribe stderr to error/warn logs and stdout to info/debug logs.
///
/// Returns the four subscription identities in `[error, warn, info, debug]` order.
pub async fn split_stdout_stderr_log_subscriber(
    router: Arc<EventRouter>,
) -> Result<[SubscriptionId; 4], LogBridgeError> {
    let error = io_log_subscriber(Arc::clone(&router), Topic::new(ERROR_LOGS_TOPIC)?, io::stderr()).await?;
    let warn = io_log_subscriber(Arc::clone(&router), Topic::new(WARN_LOGS_TOPIC)?, io::stderr()).await?;
    let info = io_log_subscriber(Arc::clone(&router), Topic::new(INFO_LOGS_TOPIC)?, io::stdout()).await?;
    let debug = io_log_subscriber(router, Topic::new(DEBUG_LOGS_TOPIC)?, io::stdout()).await?;

    Ok([error, warn, info, debug])
}

/// Subscribe stdout to every log event.
pub async fn stdout_log_subscriber(router: Arc<EventRouter>) -> Result<SubscriptionId, LogBridgeError> {
    io_log_subscriber(router, Topic::new(super::constants::ALL_LOGS_TOPIC)?, io::stdout()).await
}

/// Subscribe stderr to every log event.
pub async fn stderr_log_subscriber(router: Arc<EventRouter>) -> Result<SubscriptionId, LogBridgeError> {
    io_log_subscriber(router, Topic::new(super::constants::ALL_LOGS_TOPIC)?, io::stderr()).await
}

/// Subscribe an opened, append-mode file to every log event.
pub async fn file_log_subscriber(
    router: Arc<EventRouter>,
    path: impl AsRef<Path>,
) -> Result<SubscriptionId, LogBridgeError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    io_log_subscriber(router, Topic::new(super::constants::ALL_LOGS_TOPIC)?, file).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bus::RoutingKey;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct VecSink(Arc<Mutex<Vec<u8>>>);

    impl Write for VecSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn drains_matching_events_to_the_sink() {
        let router = Arc::new(EventRouter::new());
        router.start().await;

        let sink = VecSink::default();
        io_log_subscriber(Arc::clone(&router), Topic::new("type.log.level.*").unwrap(), sink.clone())
            .await
            .unwrap();

        router
            .publish(
                RoutingKey::new("type.log.level.info").unwrap(),
                Payload::new(LogRecord::text("hello")),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(String::from_utf8_lossy(&sink.0.lock().unwrap()), "hello\n");

        router.stop().await;
    }

    #[tokio::test]
    async fn non_log_record_payloads_are_skipped_without_writing() {
        let router = Arc::new(EventRouter::new());
        router.start().await;

        let sink = VecSink::default();
        io_log_subscriber(Arc::clone(&router), Topic::new("type.log.level.*").unwrap(), sink.clone())
            .await
            .unwrap();

        // A matching event whose payload isn't a `LogRecord` (e.g. published
        // by unrelated application code under the same prefix) must not
        // panic or otherwise disrupt the writer loop.
        router
            .publish(RoutingKey::new("type.log.level.info").unwrap(), Payload::new(42_u32))
            .await
            .unwrap();

        router
            .publish(
                RoutingKey::new("type.log.level.info").unwrap(),
                Payload::new(LogRecord::text("hello")),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(String::from_utf8_lossy(&sink.0.lock().unwrap()), "hello\n");

        router.stop().await;
    }
}
