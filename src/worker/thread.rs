//! A managed worker thread: a supervised async task with start/stop/reload
//! lifecycle control and channel-based output.
//!
//! Grounded on `util/thread/thread.go`'s `Thread[T]`. The original's work
//! function reads a single `<-chan bool` where `true` means "stop" and
//! `false` means "reload, but keep running"; we make that distinction an
//! explicit [`ControlSignal`] instead of an overloaded boolean. The four
//! cooperating goroutines `run()` starts (error bridge, message bridge,
//! status supervisor, worker) are mirrored one-for-one as spawned tasks;
//! `Thread.Wait()`'s `sync.WaitGroup` becomes a one-shot
//! [`tokio::sync::Notify`] flipped by a reaper task that joins all four.
//!
//! The work function is a generic `F: Fn(...) -> Fut` stored once at
//! construction and invoked fresh on every `start()`/restart, rather than
//! boxed as a trait object.

// Layer 1: Standard library imports
use std::future::Future;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch, Notify};
use tracing::{debug, trace, warn};

// Layer 3: Internal module imports
use super::config::ThreadConfig;
use super::error::ThreadError;
use super::message::Message;
use super::status::{AtomicStatus, Status, StatusChange};

/// Instruction delivered to a running work function.
///
/// Replaces the original's overloaded `stopChan <- bool`: `Stop` is the
/// `true` case, `Reload` the `false` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Finish up and return; the managed thread is stopping.
    Stop,
    /// Re-read configuration, rotate a file handle, etc., then keep running.
    Reload,
}

struct ExternalChannels<T> {
    tx_rx: Option<mpsc::Receiver<Message<T>>>,
    errs_rx: Option<mpsc::Receiver<ThreadError>>,
}

struct RunCompletion {
    done: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

/// A supervised async worker with explicit lifecycle control.
///
/// `T` is the type of value the work function publishes; `F` is the work
/// function itself, called fresh on every `start()`.
pub struct ManagedThread<T, F, Fut>
where
    T: Send + 'static,
    F: Fn(mpsc::Sender<ThreadError>, mpsc::Sender<Message<T>>, mpsc::Receiver<ControlSignal>) -> Fut
        + Send
        + Sync
        + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    work_fn: Arc<F>,
    status: Arc<AtomicStatus>,
    status_tx: watch::Sender<StatusChange>,
    config: RwLock<ThreadConfig>,
    external: Mutex<Option<ExternalChannels<T>>>,
    completion: Mutex<Option<RunCompletion>>,
    _marker: PhantomData<fn() -> Fut>,
}

impl<T, F, Fut> ManagedThread<T, F, Fut>
where
    T: Send + 'static,
    F: Fn(mpsc::Sender<ThreadError>, mpsc::Sender<Message<T>>, mpsc::Receiver<ControlSignal>) -> Fut
        + Send
        + Sync
        + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    /// Construct a new, unstarted managed thread around `work_fn`.
    pub fn new(work_fn: F) -> Self {
        let (status_tx, _status_rx) = watch::channel(StatusChange {
            old: Status::Init,
            new: Status::Init,
        });

        Self {
            work_fn: Arc::new(work_fn),
            status: Arc::new(AtomicStatus::new()),
            status_tx,
            config: RwLock::new(ThreadConfig::default()),
            external: Mutex::new(None),
            completion: Mutex::new(None),
            _marker: PhantomData,
        }
    }

    /// The thread's current lifecycle state.
    pub fn status(&self) -> Status {
        self.status.load()
    }

    /// Set the capacity of the message/error channels used by the next
    /// `start()`. Has no effect on a thread already running.
    pub fn set_buffer_size(&self, size: usize) {
        self.config.write().buffer_size = size;
    }

    fn set_status(&self, new: Status) -> Status {
        let old = self.status.swap(new);
        let _ = self.status_tx.send(StatusChange { old, new });
        old
    }

    /// Start the work function. A no-op if already starting; an error if
    /// not in [`Status::Init`] or [`Status::Stopped`].
    pub fn start(&self) -> Result<(), ThreadError> {
        let status = self.status.load();

        if status == Status::Starting {
            return Ok(());
        }

        if status != Status::Stopped && status != Status::Init {
            return Err(ThreadError::CannotStart(status));
        }

        self.set_status(Status::Starting);
        self.run();

        Ok(())
    }

    fn run(&self) {
        let buffer_size = self.config.read().effective_buffer_size();

        let (inner_errs_tx, mut inner_errs_rx) = mpsc::channel::<ThreadError>(1);
        let (inner_tx_tx, mut inner_tx_rx) = mpsc::channel::<Message<T>>(buffer_size);
        let (control_tx, control_rx) = mpsc::channel::<ControlSignal>(1);

        let (ext_errs_tx, ext_errs_rx) = mpsc::channel::<ThreadError>(1);
        let (ext_tx_tx, ext_tx_rx) = mpsc::channel::<Message<T>>(buffer_size);

        *self.external.lock() = Some(ExternalChannels {
            tx_rx: Some(ext_tx_rx),
            errs_rx: Some(ext_errs_rx),
        });

        let errs_handle = tokio::spawn(async move {
            while let Some(err) = inner_errs_rx.recv().await {
                if ext_errs_tx.send(err).await.is_err() {
                    break;
                }
            }
        });

        let msg_handle = tokio::spawn(async move {
            while let Some(msg) = inner_tx_rx.recv().await {
                if ext_tx_tx.send(msg).await.is_err() {
                    break;
                }
            }
        });

        let supervisor_handle = {
            let status = Arc::clone(&self.status);
            let status_tx = self.status_tx.clone();
            let mut status_rx = self.status_tx.subscribe();
            let control_tx = control_tx.clone();
            let supervisor_errs_tx = inner_errs_tx.clone();

            tokio::spawn(async move {
                loop {
                    if status_rx.changed().await.is_err() {
                        let _ = supervisor_errs_tx.send(ThreadError::Aborted).await;
                        break;
                    }

                    let change = *status_rx.borrow_and_update();

                    match change.new {
                        Status::Stopping => {
                            let _ = control_tx.try_send(ControlSignal::Stop);
                            let old = status.swap(Status::Stopped);
                            let _ = status_tx.send(StatusChange {
                                old,
                                new: Status::Stopped,
                            });
                            break;
                        }
                        Status::Reloading => {
                            let _ = control_tx.try_send(ControlSignal::Reload);
                            let old = status.swap(Status::Running);
                            let _ = status_tx.send(StatusChange {
                                old,
                                new: Status::Running,
                            });
                        }
                        Status::Stopped => break,
                        _ => {}
                    }
                }

                trace!("managed thread supervisor exited");
            })
        };

        let worker_handle = {
            let work_fn = Arc::clone(&self.work_fn);
            tokio::spawn(async move {
                work_fn(inner_errs_tx, inner_tx_tx, control_rx).await;
            })
        };

        let done = Arc::new(AtomicBool::new(false));
        let notify = Arc::new(Notify::new());
        let reaper_done = Arc::clone(&done);
        let reaper_notify = Arc::clone(&notify);

        tokio::spawn(async move {
            let (errs_res, msg_res, supervisor_res, worker_res) =
                tokio::join!(errs_handle, msg_handle, supervisor_handle, worker_handle);

            for (name, res) in [
                ("error bridge", &errs_res),
                ("message bridge", &msg_res),
                ("supervisor", &supervisor_res),
                ("worker", &worker_res),
            ] {
                if let Err(err) = res {
                    warn!(task = name, %err, "managed thread task failed to join cleanly");
                }
            }

            reaper_done.store(true, Ordering::SeqCst);
            reaper_notify.notify_waiters();
        });

        *self.completion.lock() = Some(RunCompletion { done, notify });
        self.set_status(Status::Running);
        debug!("managed thread running");
    }

    /// Request a reload: the work function observes a [`ControlSignal::Reload`]
    /// but the thread remains [`Status::Running`] once the supervisor
    /// processes it.
    pub fn reload(&self) -> Result<(), ThreadError> {
        let status = self.status.load();

        if status != Status::Running {
            return Err(ThreadError::CannotReload(status));
        }

        self.set_status(Status::Reloading);
        Ok(())
    }

    /// Request a stop. Waits out an in-progress reload before signalling
    /// the work function, matching the original's handling of a
    /// stop-during-reload race.
    pub async fn stop(&self) -> Result<(), ThreadError> {
        let status = self.status.load();

        if status == Status::Stopped || status == Status::Init {
            return Ok(());
        }

        if status != Status::Running && status != Status::Reloading {
            return Err(ThreadError::CannotStop(status));
        }

        if status == Status::Reloading {
            let mut status_rx = self.status_tx.subscribe();
            loop {
                if status_rx.changed().await.is_err() {
                    return Err(ThreadError::StopUnrecoverable);
                }

                let change = *status_rx.borrow_and_update();
                if change.old != Status::Reloading {
                    continue;
                }

                if change.new != Status::Running {
                    return Err(ThreadError::StopDuringReload {
                        old: change.old,
                        new: change.new,
                    });
                }

                break;
            }
        }

        self.set_status(Status::Stopping);
        Ok(())
    }

    /// Await completion of the current (or most recent) run's four
    /// cooperating tasks.
    pub async fn wait(&self) {
        loop {
            let (done, notify) = {
                let guard = self.completion.lock();
                match guard.as_ref() {
                    Some(completion) => (Arc::clone(&completion.done), Arc::clone(&completion.notify)),
                    None => return,
                }
            };

            if done.load(Ordering::SeqCst) {
                return;
            }

            notify.notified().await;
        }
    }

    /// Take the receiving half of the current run's message channel.
    /// Returns `None` if already taken or if the thread hasn't started.
    pub fn subscribe(&self) -> Option<mpsc::Receiver<Message<T>>> {
        self.external.lock().as_mut().and_then(|ext| ext.tx_rx.take())
    }

    /// Take the receiving half of the current run's error channel.
    /// Returns `None` if already taken or if the thread hasn't started.
    pub fn subscribe_errs(&self) -> Option<mpsc::Receiver<ThreadError>> {
        self.external.lock().as_mut().and_then(|ext| ext.errs_rx.take())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn counting_work(
        _errs: mpsc::Sender<ThreadError>,
        tx: mpsc::Sender<Message<u32>>,
        mut control: mpsc::Receiver<ControlSignal>,
    ) {
        let mut counter = 0_u32;
        loop {
            tokio::select! {
                signal = control.recv() => {
                    match signal {
                        Some(ControlSignal::Stop) | None => return,
                        Some(ControlSignal::Reload) => { counter = 0; }
                    }
                }
                _ = tokio::time::sleep(Duration::from_millis(5)) => {
                    counter += 1;
                    if tx.send(Message::new(counter, None)).await.is_err() {
                        return;
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn start_then_stop_transitions_cleanly() {
        let thread = ManagedThread::new(counting_work);
        thread.start().unwrap();
        assert_eq!(thread.status(), Status::Running);

        let mut rx = thread.subscribe().unwrap();
        let first = rx.recv().await;
        assert!(first.is_some());

        thread.stop().await.unwrap();
        thread.wait().await;
        assert_eq!(thread.status(), Status::Stopped);
    }

    #[tokio::test]
    async fn reload_resets_counter_without_stopping() {
        let thread = ManagedThread::new(counting_work);
        thread.start().unwrap();

        let mut rx = thread.subscribe().unwrap();
        let _ = rx.recv().await;

        thread.reload().unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(thread.status(), Status::Running);

        thread.stop().await.unwrap();
        thread.wait().await;
    }

    #[tokio::test]
    async fn double_start_is_idempotent() {
        let thread = ManagedThread::new(counting_work);
        thread.start().unwrap();
        thread.start().unwrap();
        thread.stop().await.unwrap();
        thread.wait().await;
    }

    #[tokio::test]
    async fn stop_before_start_is_noop() {
        let thread = ManagedThread::new(counting_work);
        assert!(thread.stop().await.is_ok());
    }

    #[tokio::test]
    async fn reload_while_not_running_is_rejected() {
        let thread = ManagedThread::new(counting_work);
        let err = thread.reload().unwrap_err();
        assert_eq!(err.to_string(), "cannot reload when thread status is: init");
    }
}
