//! A managed worker counting on a `false` (reload) signal and exiting on
//! `true` (stop), demonstrating the start -> reload -> stop lifecycle.
//!
//! Run with: `cargo run --example managed_worker`

use eventrt::worker::{ControlSignal, ManagedThread, Message, ThreadError};
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
                let _ = tx.send(Message::new(count, None)).await;
            }
            Some(ControlSignal::Stop) | None => return,
        }
    }
}

#[tokio::main]
async fn main() {
    let thread = ManagedThread::new(counting_work);
    thread.start().expect("started");

    let mut messages = thread.subscribe().expect("message channel");

    thread.reload().expect("reloaded");
    let reported = messages.recv().await.expect("counter reported");
    println!("worker counter after one reload: {}", reported.value());

    thread.stop().await.expect("stopped");
    thread.wait().await;
    println!("final status: {}", thread.status());
}
