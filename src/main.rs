//! pachyderm-dag CLI entry point.
//!
//! Runs the extension's commands against a minimal host: the DAG panel is
//! written out as SVG, and shell sessions run in this terminal.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use pachyderm_dag::api::{DagSource, HttpDagSource, StaticDagSource};
use pachyderm_dag::config::{ApiConfig, DEFAULT_API_BASE, RenderConfig, ViewPolicy};
use pachyderm_dag::host::{
    CommandArgs, DAG_VIEWER_COMMAND, DagPanel, Origin, PachydermExtension, ProcessTerminals,
    SHELL_COMMAND, Shell, Widget,
};
use pachyderm_dag::model::descriptors_from_json;
use pachyderm_dag::pipeline::descriptors_from_listings;

/// Pachyderm pipeline graph viewer and shell launcher.
#[derive(Parser, Debug)]
#[command(
    name = "pachyderm-dag",
    version = env!("PACHYDERM_DAG_VERSION"),
    about = "Pachyderm pipeline graph viewer and shell launcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw the pipeline graph as SVG
    DagViewer {
        /// Extension server API base
        #[arg(long = "base-url", default_value = DEFAULT_API_BASE)]
        base_url: String,

        /// Read the node list from a JSON file instead of the server
        #[arg(long, conflicts_with_all = ["pipelines", "repos"])]
        input: Option<PathBuf>,

        /// Derive the node list from `pachctl list pipeline --raw` output
        #[arg(long, requires = "repos")]
        pipelines: Option<PathBuf>,

        /// `pachctl list repo --raw` output, used with --pipelines
        #[arg(long, requires = "pipelines")]
        repos: Option<PathBuf>,

        #[arg(long, default_value_t = 1300.0)]
        width: f64,

        #[arg(long, default_value_t = 700.0)]
        height: f64,

        /// Node circle radius
        #[arg(long, default_value_t = 20.0)]
        radius: f64,

        /// Start from the identity transform instead of fitting the panel
        #[arg(long = "fixed-view")]
        fixed_view: bool,

        /// Omit the pan/zoom script
        #[arg(long = "static")]
        no_script: bool,

        /// Where the command was invoked from (logged only)
        #[arg(long)]
        origin: Option<Origin>,

        /// Write output to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Open a shell preloaded with `pachctl shell`
    Shell {
        /// Reconnect to this session instead of starting one
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        origin: Option<Origin>,
    },
}

// ─── Host ────────────────────────────────────────────────────────────────────

/// Collects whatever the commands add to the main area.
#[derive(Default)]
struct CliHost {
    panels: Vec<DagPanel>,
    sessions: Vec<String>,
}

impl Shell for CliHost {
    fn add(&mut self, widget: Widget) {
        match widget {
            Widget::Dag(panel) => self.panels.push(panel),
            Widget::Terminal(term) => self.sessions.push(term.session.name),
        }
    }

    fn activate_by_id(&mut self, id: &str) {
        tracing::debug!(widget = id, "activated");
    }
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

fn read(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {e}", path.display())))
}

// ─── Commands ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let terminals = Arc::new(ProcessTerminals::default());

    match cli.command {
        Commands::DagViewer {
            base_url,
            input,
            pipelines,
            repos,
            width,
            height,
            radius,
            fixed_view,
            no_script,
            origin,
            output,
        } => {
            let source: Arc<dyn DagSource> = match (input, pipelines, repos) {
                (Some(path), _, _) => {
                    let nodes = descriptors_from_json(&read(&path)).unwrap_or_else(|e| {
                        fail(format!("cannot decode '{}': {e}", path.display()))
                    });
                    Arc::new(StaticDagSource::new(nodes))
                }
                (None, Some(p), Some(r)) => {
                    let nodes = descriptors_from_listings(&read(&p), &read(&r))
                        .unwrap_or_else(|e| fail(format!("cannot decode listings: {e}")));
                    Arc::new(StaticDagSource::new(nodes))
                }
                _ => {
                    let api = ApiConfig::parse(&base_url).unwrap_or_else(|e| fail(e));
                    Arc::new(HttpDagSource::new(api))
                }
            };

            let config = RenderConfig {
                width,
                height,
                node_radius: radius,
                view_policy: if fixed_view {
                    ViewPolicy::Identity
                } else {
                    ViewPolicy::AutoFit
                },
                interactive: !no_script,
            };
            let ext = PachydermExtension::new(source, terminals, config);
            let mut host = CliHost::default();
            let args = CommandArgs { origin, name: None };
            if let Err(e) = ext.execute(DAG_VIEWER_COMMAND, &args, &mut host).await {
                fail(e);
            }

            // A failed render still leaves an (empty) panel to write out.
            let svg = host
                .panels
                .first()
                .map(DagPanel::to_svg)
                .unwrap_or_default();
            match output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, svg) {
                        fail(format!("cannot write '{}': {e}", path.display()));
                    }
                }
                None => {
                    print!("{svg}");
                    if let Err(e) = io::stdout().flush() {
                        fail(format!("cannot flush stdout: {e}"));
                    }
                }
            }
        }

        Commands::Shell { name, origin } => {
            let ext = PachydermExtension::new(
                Arc::new(StaticDagSource::default()),
                terminals.clone(),
                RenderConfig::default(),
            );
            let mut host = CliHost::default();
            let args = CommandArgs { origin, name };
            if let Err(e) = ext.execute(SHELL_COMMAND, &args, &mut host).await {
                fail(e);
            }
            let Some(session) = host.sessions.pop() else {
                fail("no terminal session was opened");
            };
            match terminals.attach(&session).await {
                Ok(status) => process::exit(status.code().unwrap_or(1)),
                Err(e) => fail(e),
            }
        }
    }
}
