use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use super::describe;
use crate::services::{ProcessSpawner, ServiceError, StreamingProcess};

/// Decodes a byte stream as UTF-8 without splitting characters: a
/// sequence cut off at the end of one read is held for the next one.
/// Invalid bytes become U+FFFD.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => self.pending.len() - incomplete_tail_len(&self.pending),
        };
        let rest = self.pending.split_off(complete);
        let decoded = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending = rest;
        decoded
    }

    /// Whatever is still held once the stream has ended.
    fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

/// Length of a truncated multibyte sequence at the end of `bytes`, if any.
fn incomplete_tail_len(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if width > back { back } else { 0 };
    }
    0
}

/// Forwards everything read from `reader` as UTF-8 chunks until EOF.
pub(super) async fn forward_output<R>(mut reader: R, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];
    let mut carry = Utf8Carry::default();
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let chunk = carry.decode(&buf[..n]);
                if chunk.is_empty() {
                    continue;
                }
                if tx.send(chunk).await.is_err() {
                    debug!("Output receiver dropped, stopping forwarder");
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to read child output: {}", e);
                break;
            }
        }
    }
    if let Some(rest) = carry.finish() {
        let _ = tx.send(rest).await;
    }
}

/// Spawns children with piped stdout and stderr, merged into one channel.
pub(super) fn spawn_piped(
    command: &mut Command,
    description: &str,
) -> Result<(Child, mpsc::Receiver<String>), ServiceError> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ServiceError::Process {
            command: description.to_string(),
            message: e.to_string(),
        })?;

    let (tx, rx) = mpsc::channel(64);
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_output(stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_output(stderr, tx));
    }
    Ok((child, rx))
}

#[cfg(unix)]
fn send_interrupt(child: &mut Child) -> std::io::Result<()> {
    let Some(pid) = child.id() else {
        // already reaped
        return Ok(());
    };
    let pid = libc::pid_t::try_from(pid)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    // SAFETY: kill(2) with a pid we spawned and a valid signal number.
    if unsafe { libc::kill(pid, libc::SIGINT) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn send_interrupt(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}

pub struct ChildStream {
    description: String,
    child: Child,
    output: mpsc::Receiver<String>,
}

#[async_trait]
impl StreamingProcess for ChildStream {
    async fn next_output(&mut self) -> Option<String> {
        self.output.recv().await
    }

    fn interrupt(&mut self) -> Result<(), ServiceError> {
        debug!("Interrupting `{}`", self.description);
        send_interrupt(&mut self.child).map_err(ServiceError::Io)
    }

    async fn wait(&mut self) -> Result<(), ServiceError> {
        let status = self.child.wait().await?;
        info!("`{}` exited with {}", self.description, status);
        Ok(())
    }
}

pub struct TokioSpawner {
    cwd: PathBuf,
}

impl TokioSpawner {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }
}

impl ProcessSpawner for TokioSpawner {
    fn spawn_streaming(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<Box<dyn StreamingProcess>, ServiceError> {
        let description = describe(program, args);
        info!("Spawning `{}`", description);
        let mut command = Command::new(program);
        command.args(args).current_dir(&self.cwd);
        let (child, output) = spawn_piped(&mut command, &description)?;
        Ok(Box::new(ChildStream {
            description,
            child,
            output,
        }))
    }

    fn launch(&self, program: &str, args: &[String]) -> Result<(), ServiceError> {
        let description = describe(program, args);
        info!("Launching `{}`", description);
        Command::new(program)
            .args(args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| ServiceError::Process {
                command: description,
                message: e.to_string(),
            })
    }
}
