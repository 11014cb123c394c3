use may::coroutine::JoinHandle;
use may_minihttp::{HttpServer as RawServer, HttpService};
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

/// Pause between connection attempts in [`ServerHandle::wait_ready`].
const READY_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Starts a [`may_minihttp`] server for a service and hands back a
/// controllable [`ServerHandle`].
pub struct HttpServer<T>(pub T);

/// A running server: the bound address plus the accept-loop coroutine.
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server accepts connections on.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the server to accept connections.
    ///
    /// Polls the bound address with TCP connects until one succeeds or
    /// `timeout` elapses. Test fixtures call this before sending requests
    /// so nothing races the accept loop coming up.
    ///
    /// # Errors
    ///
    /// Returns `TimedOut` when nothing accepts within `timeout`.
    pub fn wait_ready(&self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("server at {} not ready after {timeout:?}", self.addr),
                ));
            }
            thread::sleep(READY_POLL_INTERVAL);
        }
    }

    /// Stop the server and wait for it to wind down.
    ///
    /// Consumes the handle, preventing further operations.
    pub fn stop(self) {
        // SAFETY: cancellation is requested on the accept coroutine this
        // handle owns; the join below waits for it to unwind.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the server coroutine finishes.
    ///
    /// The server runs indefinitely unless stopped externally or an error
    /// occurs.
    ///
    /// # Errors
    ///
    /// Returns an error if the server coroutine panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Start serving on the first address `addr` resolves to.
    ///
    /// # Errors
    ///
    /// Returns an error if the address resolves to nothing or the port
    /// cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = RawServer(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}
