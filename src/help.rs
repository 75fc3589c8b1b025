//! Help text captured from a shell command (e.g. `samtools --help`).

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, TranslateError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Owns the help subprocess; kills and reaps it on every exit path.
struct ChildGuard {
    child: Child,
}

impl ChildGuard {
    fn shutdown(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain a pipe on a helper thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Run `command` through `sh -c` and return stdout followed by stderr.
///
/// A non-zero exit still yields the output; only spawn failures and
/// timeouts are errors.
pub fn help_from_command(command: &str, timeout: Duration) -> Result<String> {
    let fail = |reason: String| TranslateError::HelpCommand {
        command: command.to_string(),
        reason,
    };

    let child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| fail(format!("failed to spawn: {e}")))?;
    let mut guard = ChildGuard { child };

    let stdout = drain(guard.child.stdout.take());
    let stderr = drain(guard.child.stderr.take());

    let start = Instant::now();
    let status = loop {
        match guard.child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if start.elapsed() > timeout => {
                // reaping closes the pipes, which ends the reader threads
                guard.shutdown();
                return Err(fail(format!("timed out after {timeout:?}")));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(fail(format!("failed to wait: {e}"))),
        }
    };

    let mut output = stdout.join().unwrap_or_default();
    output.extend(stderr.join().unwrap_or_default());

    if !status.success() {
        tracing::warn!(command = %command, status = %status, "help command exited unsuccessfully, using its output anyway");
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}
