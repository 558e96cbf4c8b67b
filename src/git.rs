use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Build a `git` command that runs in `dir`.
pub fn command(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir);
    cmd
}

/// Run `cmd` to completion, feeding `input` to its stdin when given.
///
/// Stdin is written from a scoped thread while the caller drains stdout, so
/// an input larger than the pipe buffer cannot deadlock against git's output.
///
/// # Errors
/// Returns an error only if the process cannot be spawned or waited on, or
/// if writing stdin fails while git still exits successfully. A non-zero exit
/// is reported through the returned [`Output`].
pub fn run(cmd: &mut Command, input: Option<&[u8]>) -> std::io::Result<Output> {
    cmd.stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    let stdin = child.stdin.take();

    std::thread::scope(|scope| {
        let writer = match (stdin, input) {
            // stdin is dropped when the closure returns, closing the pipe
            (Some(mut stdin), Some(bytes)) => Some(scope.spawn(move || stdin.write_all(bytes))),
            _ => None,
        };

        let output = child.wait_with_output()?;
        let written = match writer {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked"))),
            None => Ok(()),
        };

        match written {
            // git may stop reading once it has failed; its exit status says why
            Err(_) if !output.status.success() => Ok(output),
            Err(e) => Err(e),
            Ok(()) => Ok(output),
        }
    })
}

/// Trimmed, lossily decoded stderr of a finished command, falling back to
/// the exit status when git printed nothing.
pub fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    }
}
