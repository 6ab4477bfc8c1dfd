//! TCP server implementation.

use crate::connection::ConnectionHandler;
use crate::dispatch::Dispatcher;
use crate::error::{HandlerError, ServerError};
use crate::pool::WorkerPool;
use bluepacket_protocol::{Packet, PacketRegistry};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};
use tokio::sync::watch;

/// Listen backlog per worker when none is set explicitly.
const BACKLOG_PER_WORKER: u32 = 50;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Workers started with the server.
    pub workers: usize,
    /// Accepted connections that may wait for a worker.
    pub queue_capacity: usize,
    /// Listen backlog.
    pub backlog: u32,
    /// How long a shrink request waits to enqueue each exit signal.
    pub shrink_timeout: Duration,
    /// Time allowed for a client to deliver its request.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], bluepacket_protocol::DEFAULT_PORT)),
            workers: 10,
            queue_capacity: 1000,
            backlog: 10 * BACKLOG_PER_WORKER,
            shrink_timeout: Duration::from_millis(3000),
            read_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Sets the initial worker count and scales the backlog with it.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self.backlog = (workers as u32).saturating_mul(BACKLOG_PER_WORKER).max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn with_shrink_timeout(mut self, timeout: Duration) -> Self {
        self.shrink_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// Server statistics.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub connections_total: AtomicU64,
    /// Connections dropped because the job queue was full.
    pub connections_dropped: AtomicU64,
    pub requests_total: AtomicU64,
    pub errors_total: AtomicU64,
}

/// Builder collecting handlers and the error mapper before serving.
pub struct ServerBuilder {
    config: ServerConfig,
    registry: Arc<PacketRegistry>,
    dispatcher: Dispatcher,
}

impl ServerBuilder {
    /// Registers the handler for request type `P`.
    pub fn on_receive<P, R, F>(mut self, handler: F) -> Self
    where
        P: Packet,
        R: Packet,
        F: Fn(P) -> Result<R, HandlerError> + Send + Sync + 'static,
    {
        self.dispatcher.on_receive(handler);
        self
    }

    /// Sets the function turning errors into response packets.
    pub fn on_error<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&ServerError) -> Option<Box<dyn Packet>> + Send + Sync + 'static,
    {
        self.dispatcher.on_error(mapper);
        self
    }

    pub fn build(self) -> Server {
        let stats = Arc::new(ServerStats::default());
        let handler = Arc::new(ConnectionHandler::new(
            self.registry,
            Arc::new(self.dispatcher),
            stats.clone(),
            self.config.read_timeout,
        ));
        let pool = WorkerPool::new(
            self.config.queue_capacity,
            self.config.shrink_timeout,
            handler,
        );
        let (shutdown, _) = watch::channel(false);
        Server {
            config: self.config,
            pool,
            stats,
            shutdown,
            running: AtomicBool::new(false),
            workers_started: AtomicBool::new(false),
        }
    }
}

/// BluePacket RPC server.
///
/// Accepted connections go onto a bounded job queue. When the queue is
/// full the connection is dropped immediately; that is the only
/// admission control.
pub struct Server {
    config: ServerConfig,
    pool: WorkerPool,
    stats: Arc<ServerStats>,
    shutdown: watch::Sender<bool>,
    running: AtomicBool,
    workers_started: AtomicBool,
}

impl Server {
    pub fn builder(config: ServerConfig, registry: Arc<PacketRegistry>) -> ServerBuilder {
        ServerBuilder {
            config,
            registry,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Binds the listener with the configured backlog and enrolls the
    /// initial workers, so the pool is at full size once this returns.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.config.bind_addr;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(self.config.backlog)?;
        self.start_workers();
        Ok(listener)
    }

    /// Enrolls the configured workers once per server.
    fn start_workers(&self) {
        if !self.workers_started.swap(true, Ordering::SeqCst) {
            self.pool.add_workers(self.config.workers);
        }
    }

    /// Binds and runs the server until shutdown.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = self.bind()?;
        self.serve(listener).await
    }

    /// Runs the accept loop on an existing listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        let mut shutdown_rx = self.shutdown.subscribe();
        if *shutdown_rx.borrow() {
            self.pool.remove_workers(self.pool.size()).await;
            return Err(ServerError::ShuttingDown);
        }

        self.start_workers();
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            "Server listening on {} ({} workers, queue capacity {})",
            listener.local_addr()?,
            self.config.workers,
            self.config.queue_capacity
        );

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            self.stats.connections_total.fetch_add(1, Ordering::Relaxed);
                            tracing::debug!("Client connected: {}", addr);
                            if !self.pool.offer(stream, addr) {
                                self.stats.connections_dropped.fetch_add(1, Ordering::Relaxed);
                            }
                        }
                        Err(e) => {
                            tracing::error!("Accept error: {}", e);
                        }
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::info!("Server shutting down");
                        break;
                    }
                }
            }
        }

        drop(listener);
        let workers = self.pool.size();
        self.pool.remove_workers(workers).await;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Initiates server shutdown.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// Returns whether the server is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns server statistics.
    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Spawns `n` more workers.
    pub fn add_workers(&self, n: usize) {
        self.pool.add_workers(n);
    }

    /// Asks `n` workers to exit once they finish their current job.
    ///
    /// Each exit signal waits up to the shrink timeout for queue space
    /// and is dropped with a warning if none frees up. Returns how many
    /// signals were enqueued.
    pub async fn remove_workers(&self, n: usize) -> usize {
        self.pool.remove_workers(n).await
    }

    /// Current number of workers.
    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }
}
