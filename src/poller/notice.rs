use crate::instrument::Error;
use log::warn;
use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};

/// Tells the operator that the polarimeter could not be connected.
///
/// Implementations may block, the poller only retries after the notice
/// returned.
pub trait Notice: Send {
    fn device_not_found(&mut self, error: &Error);
}

/// Only logs missing devices, retries follow right away.
pub struct LogNotice;

impl Notice for LogNotice {
    fn device_not_found(&mut self, error: &Error) {
        warn!("{}, retrying", error);
    }
}

/// Asks the operator to connect the device and waits until they
/// confirm with enter before the next attempt.
///
/// Falls back to logging if input is closed.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    input_closed: bool,
}

impl Prompt<BufReader<Stdin>, Stderr> {
    pub fn stdio() -> Self {
        Prompt::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead + Send, W: Write + Send> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt {
            input,
            output,
            input_closed: false,
        }
    }

    fn ask(&mut self, error: &Error) -> io::Result<usize> {
        writeln!(
            self.output,
            "Error: {}. Please connect the polarimeter and press enter to try again.",
            error
        )?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)
    }
}

impl<R: BufRead + Send, W: Write + Send> Notice for Prompt<R, W> {
    fn device_not_found(&mut self, error: &Error) {
        if self.input_closed {
            LogNotice.device_not_found(error);
            return;
        }

        warn!("{}, waiting for the operator to reconnect", error);
        match self.ask(error) {
            Ok(0) => {
                warn!("Input closed, will keep retrying without asking.");
                self.input_closed = true;
            }
            Ok(_) => (),
            Err(e) => {
                warn!("Failed to prompt for polarimeter connection: {}", e);
                self.input_closed = true;
            }
        }
    }
}
