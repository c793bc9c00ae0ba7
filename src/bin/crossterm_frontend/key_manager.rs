use super::crossterm_io::key_to_u8;
use super::key_buffer::KeyBuffer;
use crossterm::event::{poll, read, Event, KeyCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const HOLD_TIME: Duration = Duration::from_millis(250);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A struct for managing keypresses that will automatically
/// start a thread that grabs keypresses.
pub struct KeyManager {
    stop: Arc<AtomicBool>,
    key_buffer: Arc<KeyBuffer>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new() -> KeyManager {
        let stop = Arc::new(AtomicBool::new(false));
        let key_buffer = Arc::new(KeyBuffer::new(HOLD_TIME));
        let event_listener = event_listener(stop.clone(), key_buffer.clone());
        KeyManager {
            stop,
            key_buffer,
            event_listener: Some(event_listener),
        }
    }

    /// The keys currently held
    pub fn keypad(&self) -> [bool; 16] {
        self.key_buffer.snapshot()
    }

    /// Set once the user asks to quit
    pub fn stop_flag(&self) -> &AtomicBool {
        &self.stop
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        // Tell the event listener to stop, and wait for it
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.event_listener.take() {
            let _ = handle.join();
        }
    }
}

/// Starts a thread that listens for key events and pushes them to the key buffer.
fn event_listener(stop: Arc<AtomicBool>, key_buffer: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match poll(POLL_INTERVAL) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(error) => {
                    log::error!("Could not poll for events: {}", error);
                    break;
                }
            }

            let event = match read() {
                Ok(event) => event,
                Err(error) => {
                    log::error!("Could not read event: {}", error);
                    break;
                }
            };
            log::debug!("Got event {:?}", event);

            if let Event::Key(key_event) = event {
                if key_event.code == KeyCode::Esc {
                    stop.store(true, Ordering::Relaxed);
                } else if let Some(key) = key_to_u8(key_event.code) {
                    key_buffer.push(key);
                }
            }
        }
        // Make sure the emulator stops when input does
        stop.store(true, Ordering::Relaxed);
    })
}
