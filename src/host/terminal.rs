//! Terminal widget preloaded with `pachctl shell`.
//!
//! Session management belongs to the host; [`TerminalManager`] is the seam.
//! With the `cli` feature, [`ProcessTerminals`] backs sessions with local
//! `sh` processes.

use async_trait::async_trait;

use crate::error::TerminalError;

/// Typed into every new or reconnected shell widget.
pub const SHELL_INITIAL_COMMAND: &str = "pachctl shell";
pub const TERMINAL_TITLE: &str = "pachyderm shell";
pub const TERMINAL_ICON: &str = "terminal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalSession {
    pub name: String,
}

/// Host-side terminal sessions.
#[async_trait]
pub trait TerminalManager: Send + Sync {
    async fn start_new(&self) -> Result<TerminalSession, TerminalError>;

    /// Reconnect to a running session by name.
    async fn connect_to(&self, name: &str) -> Result<TerminalSession, TerminalError>;

    /// Type one line into the session's stdin.
    async fn send_line(&self, session: &TerminalSession, line: &str) -> Result<(), TerminalError>;
}

/// A terminal panel bound to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalWidget {
    pub session: TerminalSession,
    pub initial_command: String,
}

impl TerminalWidget {
    /// Connect to `name` if given, otherwise start a new session, then type
    /// the initial command.
    pub async fn open(
        manager: &dyn TerminalManager,
        name: Option<&str>,
    ) -> Result<Self, TerminalError> {
        let session = match name {
            Some(name) => manager.connect_to(name).await?,
            None => manager.start_new().await?,
        };
        manager.send_line(&session, SHELL_INITIAL_COMMAND).await?;
        tracing::debug!(session = %session.name, "terminal session ready");
        Ok(Self {
            session,
            initial_command: SHELL_INITIAL_COMMAND.to_string(),
        })
    }

    pub fn id(&self) -> String {
        format!("terminal-{}", self.session.name)
    }

    pub fn title(&self) -> &'static str {
        TERMINAL_TITLE
    }

    pub fn icon(&self) -> &'static str {
        TERMINAL_ICON
    }
}

#[cfg(feature = "cli")]
pub use process::ProcessTerminals;

#[cfg(feature = "cli")]
mod process {
    use std::collections::HashMap;
    use std::process::{ExitStatus, Stdio};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::io::AsyncWriteExt;
    use tokio::process::{Child, ChildStdin, Command};

    use super::{TerminalManager, TerminalSession};
    use crate::error::TerminalError;

    struct ProcessSession {
        child: Child,
        stdin: Option<ChildStdin>,
    }

    /// Sessions backed by interactive shell processes of this program.
    ///
    /// Lines are written to the shell's stdin; its output goes straight to
    /// ours. Names are only meaningful within one process.
    pub struct ProcessTerminals {
        program: String,
        next: AtomicUsize,
        sessions: parking_lot::Mutex<HashMap<String, Arc<tokio::sync::Mutex<ProcessSession>>>>,
    }

    impl ProcessTerminals {
        pub fn new(program: impl Into<String>) -> Self {
            Self {
                program: program.into(),
                next: AtomicUsize::new(1),
                sessions: parking_lot::Mutex::new(HashMap::new()),
            }
        }

        fn session(&self, name: &str) -> Result<Arc<tokio::sync::Mutex<ProcessSession>>, TerminalError> {
            self.sessions
                .lock()
                .get(name)
                .cloned()
                .ok_or_else(|| TerminalError::UnknownSession(name.to_string()))
        }

        /// Forward our stdin to the session and wait for the shell to exit.
        pub async fn attach(&self, name: &str) -> Result<ExitStatus, TerminalError> {
            let session = self.session(name)?;
            let mut session = session.lock().await;
            if let Some(mut stdin) = session.stdin.take() {
                tokio::spawn(async move {
                    let mut ours = tokio::io::stdin();
                    if let Err(e) = tokio::io::copy(&mut ours, &mut stdin).await {
                        tracing::debug!(error = %e, "stdin forwarding stopped");
                    }
                });
            }
            let status = session.child.wait().await?;
            self.sessions.lock().remove(name);
            Ok(status)
        }
    }

    impl Default for ProcessTerminals {
        fn default() -> Self {
            Self::new("sh")
        }
    }

    #[async_trait]
    impl TerminalManager for ProcessTerminals {
        async fn start_new(&self) -> Result<TerminalSession, TerminalError> {
            let mut child = Command::new(&self.program)
                .arg("-i")
                .stdin(Stdio::piped())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .kill_on_drop(true)
                .spawn()?;
            let stdin = child.stdin.take();
            let name = self.next.fetch_add(1, Ordering::Relaxed).to_string();
            self.sessions.lock().insert(
                name.clone(),
                Arc::new(tokio::sync::Mutex::new(ProcessSession { child, stdin })),
            );
            tracing::info!(session = %name, program = %self.program, "started terminal session");
            Ok(TerminalSession { name })
        }

        async fn connect_to(&self, name: &str) -> Result<TerminalSession, TerminalError> {
            self.session(name)?;
            Ok(TerminalSession {
                name: name.to_string(),
            })
        }

        async fn send_line(
            &self,
            session: &TerminalSession,
            line: &str,
        ) -> Result<(), TerminalError> {
            let handle = self.session(&session.name)?;
            let mut guard = handle.lock().await;
            let Some(stdin) = guard.stdin.as_mut() else {
                return Err(TerminalError::UnknownSession(session.name.clone()));
            };
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await?;
            Ok(())
        }
    }
}
