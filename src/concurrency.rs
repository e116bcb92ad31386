use anyhow::anyhow;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use tracing::{debug, error};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Worker {
    id: usize,
    thread: thread::JoinHandle<()>,
}

impl Worker {
    fn new(id: usize, receiver: Arc<Mutex<Receiver<Job>>>) -> Worker {
        let thread = thread::spawn(move || loop {
            let message = match receiver.lock() {
                Ok(receiver) => receiver.recv(),
                Err(_) => break,
            };
            match message {
                Ok(job) => {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                        error!("Worker {} job panicked: {}", id, panic_message(payload));
                    }
                }
                Err(_) => break,
            }
        });

        Worker { id, thread }
    }
}

/// Text of a caught panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Fixed set of worker threads fed from a shared queue.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<Sender<Job>>,
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());

        for worker in self.workers.drain(..) {
            if worker.thread.join().is_err() {
                error!("Worker {} panicked", worker.id);
            } else {
                debug!("Worker {} stopped", worker.id);
            }
        }
    }
}

impl ThreadPool {
    pub fn new(size: usize) -> Self {
        assert!(size > 0);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, Arc::clone(&receiver)));
        }

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute<F>(&self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f) as Job;
        self.sender
            .as_ref()
            .ok_or(anyhow!("Thread pool is shut down"))?
            .send(job)
            .map_err(|_| anyhow!("All workers have stopped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn runs_every_job_before_drop_returns() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(3);
            assert_eq!(pool.size(), 3);
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }

        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    #[test]
    fn worker_survives_a_panicking_job() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(1);
            pool.execute(|| panic!("job failed")).unwrap();
            for _ in 0..3 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    #[should_panic]
    fn zero_workers_is_rejected() {
        ThreadPool::new(0);
    }
}
