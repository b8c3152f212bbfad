//! Running external commands.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{Result, ToolError};

/// A command line, assembled as data before it is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    /// Shell-like rendering for logs and error messages. Not a quoting-exact command line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes commands, streaming their merged output line by line.
pub trait ProcessRunner: fmt::Debug + Send + Sync {
    /// Run `command` to completion and return its exit code.
    ///
    /// `on_line` receives every stdout and stderr line as it arrives. A
    /// missing program is [`ToolError::ToolMissing`].
    fn run(&self, command: &CommandSpec, on_line: &mut dyn FnMut(&str)) -> Result<i32>;

    /// Like [`run`](Self::run), but a non-zero exit is an error.
    fn run_checked(&self, command: &CommandSpec, on_line: &mut dyn FnMut(&str)) -> Result<()> {
        match self.run(command, on_line)? {
            0 => Ok(()),
            code => Err(ToolError::ExternalProcess {
                command: command.to_string(),
                code,
            }),
        }
    }
}

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

/// Forward `stream` line by line until EOF. Bytes that are not UTF-8 are
/// replaced rather than ending the stream, so the pipe is always drained.
fn forward_lines<R: Read + Send + 'static>(stream: R, tx: mpsc::Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut receiver_gone = false;
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    if receiver_gone {
                        continue;
                    }
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    receiver_gone = tx.send(line).is_err();
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading process output");
                    break;
                }
            }
        }
    })
}

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, on_line: &mut dyn FnMut(&str)) -> Result<i32> {
        tracing::debug!(command = %command, cwd = ?command.cwd, "running");
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        let mut child = cmd.spawn().map_err(|source| spawn_error(command, source))?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(stderr, tx.clone()));
        }
        drop(tx);
        for line in rx {
            on_line(&line);
        }
        for reader in readers {
            let _ = reader.join();
        }

        let status = child.wait().map_err(|source| spawn_error(command, source))?;
        // Killed by a signal: no exit code.
        let code = status.code().unwrap_or(-1);
        tracing::debug!(command = %command, code, "finished");
        Ok(code)
    }
}

fn spawn_error(command: &CommandSpec, source: io::Error) -> ToolError {
    if source.kind() == io::ErrorKind::NotFound {
        ToolError::ToolMissing {
            tools: vec![command.program.clone()],
        }
    } else {
        ToolError::Spawn {
            command: command.to_string(),
            source,
        }
    }
}

/// Collect every output line of `command`; convenience for short probes.
pub fn capture(runner: &dyn ProcessRunner, command: &CommandSpec) -> Result<(i32, Vec<String>)> {
    let mut lines = Vec::new();
    let code = runner.run(command, &mut |line| lines.push(line.to_string()))?;
    Ok((code, lines))
}

/// `path` as an argument string.
pub(crate) fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every command and replays scripted output per program.
    #[derive(Debug, Default)]
    pub(crate) struct FakeRunner {
        pub calls: Mutex<Vec<CommandSpec>>,
        pub outputs: HashMap<String, (i32, Vec<String>)>,
        pub missing: Vec<String>,
    }

    impl FakeRunner {
        pub fn with_output(mut self, program: &str, code: i32, lines: &[&str]) -> Self {
            self.outputs
                .insert(program.to_string(), (code, lines.iter().map(|l| l.to_string()).collect()));
            self
        }

        pub fn with_missing(mut self, program: &str) -> Self {
            self.missing.push(program.to_string());
            self
        }

        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, command: &CommandSpec, on_line: &mut dyn FnMut(&str)) -> Result<i32> {
            self.calls.lock().unwrap().push(command.clone());
            if self.missing.contains(&command.program) {
                return Err(ToolError::ToolMissing {
                    tools: vec![command.program.clone()],
                });
            }
            let (code, lines) = self.outputs.get(&command.program).cloned().unwrap_or((0, Vec::new()));
            for line in &lines {
                on_line(line);
            }
            Ok(code)
        }
    }

    #[test]
    fn display_quotes_spaced_arguments() {
        let cmd = CommandSpec::new("openocd").args(["-c", "init; reset init"]);
        assert_eq!(cmd.to_string(), "openocd -c \"init; reset init\"");
    }

    #[test]
    fn run_checked_maps_nonzero_exit() {
        let runner = FakeRunner::default().with_output("make", 2, &["error"]);
        let err = runner
            .run_checked(&CommandSpec::new("make"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ToolError::ExternalProcess { code: 2, .. }));
    }

    #[test]
    fn capture_collects_lines() {
        let runner = FakeRunner::default().with_output("cmake", 0, &["cmake version 3.28.1", ""]);
        let (code, lines) = capture(&runner, &CommandSpec::new("cmake").arg("--version")).unwrap();
        assert_eq!(code, 0);
        assert_eq!(lines[0], "cmake version 3.28.1");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_merges_streams() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = CommandSpec::new("sh")
            .args(["-c", "echo out; echo err 1>&2; pwd; exit 3"])
            .current_dir(dir.path());
        let (code, lines) = capture(&SystemRunner, &cmd).unwrap();
        assert_eq!(code, 3);
        assert!(lines.contains(&"out".to_string()));
        assert!(lines.contains(&"err".to_string()));
        assert_eq!(lines.len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_keeps_streaming_past_invalid_utf8() {
        let cmd = CommandSpec::new("sh").args([
            "-c",
            "printf 'bad \\377\\n'; head -c 300000 /dev/zero | tr '\\0' a; echo; echo done",
        ]);
        let (code, lines) = capture(&SystemRunner, &cmd).unwrap();
        assert_eq!(code, 0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "bad \u{FFFD}");
        assert_eq!(lines[1].len(), 300_000);
        assert_eq!(lines[2], "done");
    }

    #[test]
    fn system_runner_reports_missing_program() {
        let err = SystemRunner
            .run(&CommandSpec::new("fwgen-no-such-tool-7f3a"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ToolError::ToolMissing { tools } if tools == ["fwgen-no-such-tool-7f3a"]));
    }
}
