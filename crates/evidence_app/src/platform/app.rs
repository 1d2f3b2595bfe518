use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use engine_logging::{engine_info, engine_warn};
use evidence_core::{update, AppState, AppViewModel, JobStatus, Msg, SelectedFile};
use evidence_engine::{discover_files, EngineHandle, EngineStopped};
use log::LevelFilter;

use super::cli::{CaseCommand, Cli, Command};
use super::effects::EffectRunner;
use super::{logging, persistence, render};

/// How long one loop iteration waits for engine results before re-rendering.
const TICK: Duration = Duration::from_millis(75);
const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level, &cli.state_dir);

    let engine = EngineHandle::new(cli.client_settings())
        .with_context(|| format!("could not set up client for {}", cli.api_base))?;
    let mut session = Session::new(EffectRunner::new(engine, cli.state_dir.clone()));
    session.dispatch(Msg::WorkspaceRestored(persistence::load_workspace(
        &cli.state_dir,
    )));

    match cli.command {
        Command::Upload {
            paths,
            timeout_secs,
        } => {
            let files = collect_files(&paths)?;
            session.dispatch(Msg::FilesSubmitted(files));

            let mut printer = render::RowPrinter::default();
            let deadline = timeout_secs.map(Duration::from_secs);
            let settled = session.drive_until_settled(deadline, |view| {
                for line in printer.changed_lines(view) {
                    println!("{line}");
                }
            })?;

            let view = session.view();
            println!("{}", render::render_summary(&view));
            if !settled {
                engine_warn!("Stopped following jobs before they finished");
            }
            Ok(upload_exit_code(&view, settled))
        }
        Command::Case(CaseCommand::Set { id }) => {
            session.dispatch(Msg::CaseSelected(Some(id)));
            print_workspace(&session)
        }
        Command::Case(CaseCommand::Clear) => {
            session.dispatch(Msg::CaseSelected(None));
            print_workspace(&session)
        }
        Command::Case(CaseCommand::Permissions { permissions }) => {
            session.dispatch(Msg::PermissionsChanged(permissions));
            print_workspace(&session)
        }
        Command::Module { module, submodule } => {
            session.dispatch(Msg::HaloModuleSelected { module, submodule });
            print_workspace(&session)
        }
        Command::Show => print_workspace(&session),
        Command::Bootstrap => {
            session.bootstrap(BOOTSTRAP_TIMEOUT);
            print_workspace(&session)
        }
    }
}

/// Success only when every upload settled as succeeded.
fn upload_succeeded(view: &AppViewModel, settled: bool) -> bool {
    settled
        && view
            .uploads
            .iter()
            .all(|row| row.status == JobStatus::Succeeded)
}

fn upload_exit_code(view: &AppViewModel, settled: bool) -> ExitCode {
    if upload_succeeded(view, settled) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_workspace(session: &Session) -> anyhow::Result<ExitCode> {
    println!("{}", render::render_workspace(&session.view().workspace));
    Ok(ExitCode::SUCCESS)
}

fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<SelectedFile>> {
    let mut files = Vec::new();
    for path in paths {
        let found = discover_files(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        files.extend(found.into_iter().map(|file| SelectedFile {
            path: file.path,
            file_name: file.file_name,
            relative_path: file.relative_path,
        }));
    }
    if files.is_empty() {
        bail!("no files found to upload");
    }
    Ok(files)
}

/// Owns the core state and feeds it messages one at a time.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Pumps engine results into the state until every upload is terminal.
    ///
    /// `on_render` runs whenever the state changed. Returns `Ok(false)` if
    /// `limit` elapsed first.
    pub fn drive_until_settled(
        &mut self,
        limit: Option<Duration>,
        mut on_render: impl FnMut(&AppViewModel),
    ) -> Result<bool, EngineStopped> {
        let deadline = limit.map(|limit| Instant::now() + limit);
        loop {
            if self.state.consume_dirty() {
                on_render(&self.state.view());
            }
            if self.state.is_settled() {
                engine_info!("All {} upload(s) settled", self.state.upload_count());
                return Ok(true);
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Ok(false);
            }
            if let Some(msg) = self.runner.next_msg(TICK)? {
                self.dispatch(msg);
            }
        }
    }

    /// Best-effort: failures are logged by the effect runner and ignored.
    pub fn bootstrap(&mut self, timeout: Duration) {
        self.runner.request_bootstrap();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            match self.runner.next_msg(TICK) {
                Ok(Some(msg)) => {
                    let is_bootstrap = matches!(msg, Msg::WorkspaceBootstrapped { .. });
                    self.dispatch(msg);
                    if is_bootstrap {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    engine_warn!("Bootstrap abandoned: {}", err);
                    return;
                }
            }
        }
        engine_warn!("Bootstrap timed out after {:?}", timeout);
    }
}
