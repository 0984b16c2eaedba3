use std::io::{Write, stdout};

use crossterm::style::Stylize;

use crate::services::{Console, Tone};

/// Writes to stdout. Newlines become `\r\n` so output lines up while the
/// terminal is in raw mode.
pub struct StdoutConsole;

fn raw_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

impl Console for StdoutConsole {
    fn line(&self, tone: Tone, text: &str) {
        let text = raw_newlines(text);
        let mut out = stdout().lock();
        let result = match tone {
            Tone::Plain => write!(out, "{text}\r\n"),
            Tone::Muted => write!(out, "{}\r\n", text.dark_grey()),
            Tone::Success => write!(out, "{}\r\n", text.black().on_green()),
            Tone::Heading => write!(out, "{}\r\n", text.bold()),
            Tone::Error => write!(out, "{}\r\n", text.red()),
        };
        if let Err(e) = result.and_then(|()| out.flush()) {
            log::warn!("Failed to write to stdout: {}", e);
        }
    }

    fn passthrough(&self, text: &str) {
        let mut out = stdout().lock();
        if let Err(e) = out
            .write_all(raw_newlines(text).as_bytes())
            .and_then(|()| out.flush())
        {
            log::warn!("Failed to forward child output: {}", e);
        }
    }
}
