//! Host integration: the two Pachyderm commands, their palette and menu
//! registration, and the widgets they add to the host's main area.
//!
//! The host itself (layout, palette, menu bar) sits behind the [`Shell`],
//! [`Palette`] and [`MainMenu`] traits.

pub mod panel;
pub mod terminal;

pub use panel::{DAG_PANEL_ID, DAG_PANEL_TITLE, DagPanel, PanelOutcome, create_dag_panel};
#[cfg(feature = "cli")]
pub use terminal::ProcessTerminals;
pub use terminal::{
    SHELL_INITIAL_COMMAND, TerminalManager, TerminalSession, TerminalWidget,
};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::DagSource;
use crate::config::RenderConfig;
use crate::error::DagError;

// ─── Commands ────────────────────────────────────────────────────────────────

pub const DAG_VIEWER_COMMAND: &str = "pachyderm:dag-viewer";
pub const SHELL_COMMAND: &str = "pachyderm:shell";

/// Palette category and main-menu title.
pub const CATEGORY: &str = "Pachyderm";
pub const MENU_RANK: u32 = 80;

/// Where a command was invoked from. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Palette,
    Menu,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Palette => "palette",
            Origin::Menu => "menu",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "palette" => Ok(Origin::Palette),
            "menu" => Ok(Origin::Menu),
            other => Err(format!("unknown origin '{other}' (expected palette or menu)")),
        }
    }
}

/// Arguments a command is executed with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub origin: Option<Origin>,
    /// Terminal session to reconnect to (`pachyderm:shell` only).
    pub name: Option<String>,
}

impl CommandArgs {
    pub fn from_origin(origin: Origin) -> Self {
        Self {
            origin: Some(origin),
            name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub caption: String,
}

impl CommandInfo {
    fn new(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            caption: format!("Execute {id} Command"),
        }
    }
}

// ─── Host seams ──────────────────────────────────────────────────────────────

/// A widget the commands hand to the host.
#[derive(Debug)]
pub enum Widget {
    Dag(DagPanel),
    Terminal(TerminalWidget),
}

impl Widget {
    pub fn id(&self) -> String {
        match self {
            Widget::Dag(p) => p.id().to_string(),
            Widget::Terminal(t) => t.id(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Widget::Dag(p) => p.title(),
            Widget::Terminal(t) => t.title(),
        }
    }
}

/// The host's layout.
pub trait Shell {
    /// Add a widget to the main area.
    fn add(&mut self, widget: Widget);
    fn activate_by_id(&mut self, id: &str);
}

pub trait Palette {
    fn add_item(&mut self, command: &str, category: &str, args: CommandArgs);
}

pub trait MainMenu {
    /// Add a top-level menu holding `(command, args)` items.
    fn add_menu(&mut self, title: &str, rank: u32, items: Vec<(String, CommandArgs)>);
}

// ─── Extension ───────────────────────────────────────────────────────────────

/// The Pachyderm extension: owns the data source, the terminal manager,
/// and the render settings every DAG panel is built with.
pub struct PachydermExtension {
    source: Arc<dyn DagSource>,
    terminals: Arc<dyn TerminalManager>,
    config: RenderConfig,
}

impl PachydermExtension {
    pub fn new(
        source: Arc<dyn DagSource>,
        terminals: Arc<dyn TerminalManager>,
        config: RenderConfig,
    ) -> Self {
        Self {
            source,
            terminals,
            config,
        }
    }

    pub fn commands() -> Vec<CommandInfo> {
        vec![
            CommandInfo::new(DAG_VIEWER_COMMAND, "DAG"),
            CommandInfo::new(SHELL_COMMAND, "Shell"),
        ]
    }

    /// Register both commands in the palette and under a "Pachyderm" menu.
    pub fn activate(&self, palette: &mut dyn Palette, menu: &mut dyn MainMenu) {
        let mut items = Vec::new();
        for cmd in Self::commands() {
            palette.add_item(cmd.id, CATEGORY, CommandArgs::from_origin(Origin::Palette));
            items.push((cmd.id.to_string(), CommandArgs::from_origin(Origin::Menu)));
        }
        menu.add_menu(CATEGORY, MENU_RANK, items);
        tracing::info!("pachyderm extension activated");
    }

    pub async fn execute(
        &self,
        command: &str,
        args: &CommandArgs,
        shell: &mut dyn Shell,
    ) -> Result<(), DagError> {
        let origin = args.origin.map(Origin::as_str).unwrap_or("none");
        tracing::info!(command, origin, "executing command");

        match command {
            DAG_VIEWER_COMMAND => {
                let panel = create_dag_panel(self.source.as_ref(), &self.config).await;
                shell.add(Widget::Dag(panel));
                Ok(())
            }
            SHELL_COMMAND => {
                let term =
                    TerminalWidget::open(self.terminals.as_ref(), args.name.as_deref()).await?;
                let id = term.id();
                shell.add(Widget::Terminal(term));
                shell.activate_by_id(&id);
                Ok(())
            }
            other => Err(DagError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_host.rs"]
mod tests;
