//! Bounded job queue and a resizable pool of workers draining it.
//!
//! The accept loop offers connections without blocking; a full queue
//! drops the connection. Workers exit when they dequeue the exit
//! sentinel, so shrinking finishes in-flight jobs first.

use crate::connection::ConnectionHandler;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::SendTimeoutError, error::TrySendError};
use tokio::task::JoinHandle;

/// An item on the job queue.
pub(crate) enum Job {
    Connection { stream: TcpStream, addr: SocketAddr },
    /// Sentinel: the worker that dequeues it leaves the pool.
    Exit,
}

type Workers = Arc<Mutex<HashMap<u64, JoinHandle<()>>>>;

/// Worker pool fed by a bounded queue of accepted connections.
pub(crate) struct WorkerPool {
    sender: mpsc::Sender<Job>,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>,
    workers: Workers,
    next_id: AtomicU64,
    handler: Arc<ConnectionHandler>,
    shrink_timeout: Duration,
}

impl WorkerPool {
    pub(crate) fn new(
        queue_capacity: usize,
        shrink_timeout: Duration,
        handler: Arc<ConnectionHandler>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        Self {
            sender,
            receiver: Arc::new(tokio::sync::Mutex::new(receiver)),
            workers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            handler,
            shrink_timeout,
        }
    }

    /// Enqueues a connection without waiting. Returns false if it was dropped.
    pub(crate) fn offer(&self, stream: TcpStream, addr: SocketAddr) -> bool {
        match self.sender.try_send(Job::Connection { stream, addr }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("[{}] Job queue full, dropping connection", addr);
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("[{}] Job queue closed, dropping connection", addr);
                false
            }
        }
    }

    /// Spawns `n` workers and enrolls them.
    pub(crate) fn add_workers(&self, n: usize) {
        let mut workers = self.workers.lock();
        for _ in 0..n {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let handle = tokio::spawn(worker_loop(
                id,
                self.receiver.clone(),
                self.workers.clone(),
                self.handler.clone(),
            ));
            workers.insert(id, handle);
        }
        tracing::debug!("Added {} workers, pool size {}", n, workers.len());
    }

    /// Enqueues `n` exit sentinels, each waiting up to the shrink timeout
    /// for queue space. Returns how many were enqueued.
    pub(crate) async fn remove_workers(&self, n: usize) -> usize {
        let mut sent = 0;
        for _ in 0..n {
            match self.sender.send_timeout(Job::Exit, self.shrink_timeout).await {
                Ok(()) => sent += 1,
                Err(SendTimeoutError::Timeout(_)) => {
                    tracing::warn!(
                        "Job queue full for {:?}, exit signal dropped",
                        self.shrink_timeout
                    );
                }
                Err(SendTimeoutError::Closed(_)) => break,
            }
        }
        tracing::debug!("Requested {} of {} workers to exit", sent, n);
        sent
    }

    /// Current number of enrolled workers.
    pub(crate) fn size(&self) -> usize {
        self.workers.lock().len()
    }

    /// Jobs waiting in the queue.
    pub(crate) fn queued(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

async fn worker_loop(
    id: u64,
    jobs: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>,
    workers: Workers,
    handler: Arc<ConnectionHandler>,
) {
    tracing::debug!("Worker {} started", id);

    loop {
        let job = jobs.lock().await.recv().await;
        match job {
            Some(Job::Connection { stream, addr }) => {
                let handler = handler.clone();
                let task = tokio::spawn(async move { handler.handle(stream, addr).await });
                if let Err(e) = task.await {
                    tracing::error!("Worker {}: connection task for {} failed: {}", id, addr, e);
                }
            }
            Some(Job::Exit) | None => break,
        }
    }

    workers.lock().remove(&id);
    tracing::debug!("Worker {} exited", id);
}
