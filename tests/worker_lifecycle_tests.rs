//! Integration test for the managed-thread start/reload/stop lifecycle.

#![allow(clippy::unwrap_used)]

use eventrt::worker::{ControlSignal, ManagedThread, Message, Status, ThreadError};
use tokio::sync::mpsc;

async fn counting_work(
    _errs: mpsc::Sender<ThreadError>,
    tx: mpsc::Sender<Message<u32>>,
    mut control: mpsc::Receiver<ControlSignal>,
) {
    let mut count = 0_u32;
    loop {
        match control.recv().await {
            Some(ControlSignal::Reload) => {
                count += 1;
                if tx.send(Message::new(count, None)).await.is_err() {
                    return;
                }
            }
            Some(ControlSignal::Stop) | None => return,
        }
    }
}

#[tokio::test]
async fn start_reload_stop_reports_one_increment_and_ends_stopped() {
    let thread = ManagedThread::new(counting_work);
    thread.start().unwrap();

    let mut messages = thread.subscribe().unwrap();

    thread.reload().unwrap();
    let reported = messages.recv().await.unwrap();
    assert_eq!(*reported.value(), 1);

    thread.stop().await.unwrap();
    thread.wait().await;

    assert_eq!(thread.status(), Status::Stopped);
}

#[tokio::test]
async fn reload_before_start_fails() {
    let thread = ManagedThread::new(counting_work);
    assert!(thread.reload().is_err());
}

#[tokio::test]
async fn double_start_fails_without_disturbing_the_running_thread() {
    let thread = ManagedThread::new(counting_work);
    thread.start().unwrap();

    assert!(thread.start().is_err());
    assert_eq!(thread.status(), Status::Running);

    thread.stop().await.unwrap();
    thread.wait().await;
}
