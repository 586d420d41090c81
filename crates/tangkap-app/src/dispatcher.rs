use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

use tangkap_config::ocr::OcrConfig;
use tangkap_ocr::{recognize, OcrError, RecognitionService};
use tangkap_types::CapturedBitmap;

/// One recognition request: the bitmap it owns plus a completion callback.
/// The callback runs on the worker thread; marshalling back to the UI side
/// is the callback's business (in practice it is a channel send the event
/// loop receives).
pub struct OcrJob {
    pub bitmap: CapturedBitmap,
    pub on_done: Box<dyn FnOnce(Result<String, OcrError>) + Send>,
}

/// Work queue with a maximum concurrency of exactly one.
///
/// Jobs run strictly in submission order on a single worker thread, so
/// completions can never arrive out of order and the recognition service is
/// never invoked concurrently. `submit` never blocks the caller.
pub struct Dispatcher {
    jobs: kanal::Sender<OcrJob>,
    // Mutex only to make `Dispatcher: Sync`; `done` is read solely from the
    // owned `self` in `shutdown`.
    done: Mutex<mpsc::Receiver<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Dispatcher {
    pub fn spawn(
        config: OcrConfig,
        service: impl RecognitionService + Send + 'static,
    ) -> std::io::Result<Self> {
        let (jobs, queue) = kanal::unbounded::<OcrJob>();
        let (done_tx, done) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("ocr-worker".to_string())
            .spawn(move || {
                worker_loop(queue, config, service);
                let _ = done_tx.send(());
            })?;
        Ok(Self {
            jobs,
            done: Mutex::new(done),
            worker: Some(worker),
        })
    }

    /// Enqueue a job and return immediately. Returns false if the worker is
    /// gone, in which case the callback was dropped uninvoked and the
    /// caller must report the failure itself.
    pub fn submit(&self, job: OcrJob) -> bool {
        self.jobs.send(job).is_ok()
    }

    /// Close the queue and wait for the in-flight job, bounded by `timeout`.
    /// Returns false when the worker was abandoned still running; the
    /// process may exit anyway rather than hang on a stuck job.
    pub fn shutdown(mut self, timeout: Duration) -> bool {
        self.jobs.close();
        let Some(worker) = self.worker.take() else {
            return true;
        };
        let done = self.done.lock().expect("done receiver lock poisoned");
        match done.recv_timeout(timeout) {
            // Timeout: the job is stuck inside the service; leave it behind.
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(?timeout, "abandoning in-flight recognition job");
                false
            }
            // Either the drained signal or a disconnect from a dead worker;
            // both mean the thread is finished and joinable.
            _ => {
                let _ = worker.join();
                true
            }
        }
    }
}

fn worker_loop(
    queue: kanal::Receiver<OcrJob>,
    config: OcrConfig,
    service: impl RecognitionService,
) {
    while let Ok(job) = queue.recv() {
        let OcrJob { bitmap, on_done } = job;
        // A panic in the pipeline must neither kill the worker nor vanish
        // silently; it degrades to a generic reported failure.
        let result = catch_unwind(AssertUnwindSafe(|| {
            recognize(&bitmap, &config, &service)
        }))
        .unwrap_or_else(|_| {
            Err(OcrError::ServiceFailed(
                "unexpected recognition failure".to_string(),
            ))
        });
        on_done(result);
    }
    tracing::debug!("ocr worker drained and stopped");
}
