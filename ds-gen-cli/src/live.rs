use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use ds_gen_core::{CancelToken, LineSink, SourceModel, UniformDraw, spawn_live};

/// How long the listener waits for a key before checking the token again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A source of terminal events.
pub trait KeySource {
    /// Waits up to `timeout` for the next event; `None` on timeout.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Events read from the controlling terminal.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// Keeps the terminal in raw mode, so single keystrokes are delivered
/// without waiting for Enter. Raw mode is left on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {e}");
        }
    }
}

/// Reads keys until `quit_key` (or Ctrl-C) is pressed, then cancels `token`.
///
/// Every other key press is echoed to `echo` and ignored. Returns as soon
/// as `token` is cancelled by someone else.
pub fn listen<K: KeySource, W: Write>(keys: &mut K, quit_key: char, token: &CancelToken, echo: &mut W) -> io::Result<()> {
    while !token.is_cancelled() {
        let Some(Event::Key(key)) = keys.next_event(POLL_INTERVAL)? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char(quit_key) || is_interrupt(&key) {
            token.cancel();
            return Ok(());
        }
        // Raw mode: "\n" alone does not return the cursor
        match key.code {
            KeyCode::Char(c) => write!(echo, "{c}\r\n")?,
            other => write!(echo, "{other:?}\r\n")?,
        }
        echo.flush()?;
    }
    Ok(())
}

/// Ctrl-C arrives as a key in raw mode, not as a signal.
fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Prints symbols on a worker thread until the quit key or Ctrl-C.
///
/// If the terminal cannot enter raw mode (ex. stdin is not a tty),
/// only Ctrl-C stops the run.
///
/// # Returns
/// The number of symbols printed.
pub fn run<D>(model: SourceModel, draw: D, quit_key: char) -> anyhow::Result<u64>
where
    D: UniformDraw + Send + 'static,
{
    let token = CancelToken::new();

    let interrupt = token.clone();
    ctrlc::set_handler(move || interrupt.cancel()).context("failed to install Ctrl-C handler")?;

    let raw_mode = match RawModeGuard::enable() {
        Ok(guard) => Some(guard),
        Err(e) => {
            log::warn!("no raw terminal ({e}), only Ctrl-C stops generation");
            None
        }
    };

    let listener = raw_mode.as_ref().map(|_| {
        let token = token.clone();
        thread::spawn(move || listen(&mut TerminalKeys, quit_key, &token, &mut io::stderr()))
    });

    let line_ending = if raw_mode.is_some() { "\r\n" } else { "\n" };
    let sink = LineSink::with_line_ending(io::stdout(), line_ending);
    let worker = spawn_live(Arc::new(model), draw, sink, token.clone());
    let result = worker.join().map_err(|_| anyhow!("generation worker panicked"));

    // Releases the listener if the worker stopped on its own (ex. broken pipe)
    token.cancel();
    if let Some(listener) = listener {
        match listener.join() {
            Ok(Err(e)) => log::warn!("key listener stopped: {e}"),
            Err(_) => log::warn!("key listener panicked"),
            Ok(Ok(())) => (),
        }
    }
    drop(raw_mode);

    Ok(result??)
}
