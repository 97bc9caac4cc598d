//! Platform - the engine's only way to reach the terminal and the clock.
//!
//! - [`StdPlatform`]: raw-mode stdin/stdout with mouse capture (crossterm)
//! - [`BufferPlatform`]: in-memory output, scripted input and a virtual clock
//!
//! # Example
//!
//! ```ignore
//! use twidgets::platform::StdPlatform;
//!
//! let mut platform = StdPlatform::new()?;
//! // ... build an EngineContext against &mut platform ...
//! // raw mode and mouse capture are restored on drop
//! ```

use std::collections::VecDeque;
use std::io::{self, Read, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Terminal I/O and time as seen by the engine.
pub trait Platform {
    /// Queue bytes for the terminal.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    /// Bytes that arrived within `timeout`. Empty on timeout.
    fn read(&mut self, timeout: Duration) -> io::Result<Vec<u8>>;

    fn now(&self) -> Instant;

    fn sleep(&mut self, duration: Duration);
}

// =============================================================================
// StdPlatform
// =============================================================================

/// Real terminal. Enables raw mode and mouse reporting on creation.
pub struct StdPlatform {
    stdout: Stdout,
    input: Receiver<Vec<u8>>,
    reader: StdinReader,
}

impl StdPlatform {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e);
        }

        // stdin has no portable timed read, so a reader thread feeds a channel.
        let (reader, input) = match StdinReader::spawn(io::stdin()) {
            Ok(spawned) => spawned,
            Err(e) => {
                let _ = execute!(stdout, DisableMouseCapture);
                let _ = disable_raw_mode();
                return Err(e);
            }
        };

        tracing::debug!("terminal in raw mode with mouse capture");
        Ok(Self { stdout, input, reader })
    }
}

// =============================================================================
// Reader thread
// =============================================================================

/// Thread copying raw input chunks into a channel.
///
/// The thread checks `running` between reads. A read already blocked on the
/// source only returns when bytes arrive or the source closes, so `stop`
/// joins the thread only once it has finished.
struct StdinReader {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl StdinReader {
    fn spawn<R: Read + Send + 'static>(source: R) -> io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("twidgets-stdin".into())
            .spawn(move || Self::read_loop(source, &flag, &tx))?;

        Ok((Self { handle: Some(handle), running }, rx))
    }

    fn read_loop<R: Read>(mut source: R, running: &AtomicBool, tx: &Sender<Vec<u8>>) {
        let mut buf = [0u8; 256];
        while running.load(Ordering::SeqCst) {
            match source.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin reader stopped");
                    break;
                }
            }
        }
        running.store(false, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if !handle.is_finished() {
            // still blocked in read; it exits on the next chunk or EOF
            return;
        }
        if handle.join().is_err() {
            tracing::warn!("stdin reader panicked");
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Platform for StdPlatform {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stdout.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    fn read(&mut self, timeout: Duration) -> io::Result<Vec<u8>> {
        let mut bytes = match self.input.recv_timeout(timeout) {
            Ok(chunk) => chunk,
            Err(RecvTimeoutError::Timeout) => return Ok(Vec::new()),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
            }
        };
        // Whatever else is already waiting belongs to the same burst.
        while let Ok(more) = self.input.try_recv() {
            bytes.extend_from_slice(&more);
        }
        Ok(bytes)
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl Drop for StdPlatform {
    fn drop(&mut self) {
        self.reader.stop();
        let _ = execute!(self.stdout, DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}

// =============================================================================
// BufferPlatform
// =============================================================================

/// In-memory platform. Sleeping advances the virtual clock instead of
/// blocking, and every sleep is recorded.
#[derive(Debug)]
pub struct BufferPlatform {
    pub output: Vec<u8>,
    pub input: VecDeque<Vec<u8>>,
    pub sleeps: Vec<Duration>,
    pub flushes: usize,
    start: Instant,
    elapsed: Duration,
}

impl BufferPlatform {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            input: VecDeque::new(),
            sleeps: Vec::new(),
            flushes: 0,
            start: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Queue one chunk to be returned by a later `read`.
    pub fn feed_input(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.push_back(bytes.as_ref().to_vec());
    }

    /// Output so far, lossily decoded.
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

impl Default for BufferPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for BufferPlatform {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    /// Returns one queued chunk; an empty queue behaves like a timeout.
    fn read(&mut self, timeout: Duration) -> io::Result<Vec<u8>> {
        match self.input.pop_front() {
            Some(chunk) => Ok(chunk),
            None => {
                self.elapsed += timeout;
                Ok(Vec::new())
            }
        }
    }

    fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.elapsed += duration;
    }
}
