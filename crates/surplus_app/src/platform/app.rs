use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use surplus_core::{
    update, AppState, Msg, PollState, SearchSnapshot, SessionState, SettingsSnapshot,
    ShutdownReason,
};
use surplus_engine::{
    run_cycle, CycleFailure, CycleOutcome, HandoffReceiver, MarketplaceClient, SchedulerConfig,
    SchedulerEvent, SchedulerThread,
};
use surplus_logging::{watch_error, watch_info, watch_warn};

use super::commands::{parse_command, Command, HELP};
use super::effects::EffectRunner;
use super::logging;
use super::notifier::ConsoleNotifier;
use super::persistence::{default_config_path, default_log_path, ConfigStore};
use super::render::render;
use super::Cli;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    Clean,
    AuthenticationRequired,
}

impl AppExit {
    pub fn code(self) -> ExitCode {
        match self {
            AppExit::Clean => ExitCode::SUCCESS,
            AppExit::AuthenticationRequired => ExitCode::from(2),
        }
    }
}

enum Input {
    Line(String),
    Tick,
}

pub fn run_app(cli: Cli) -> anyhow::Result<AppExit> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let log_path = cli
        .log_file
        .unwrap_or_else(|| default_log_path(&config_path));
    logging::initialize(&log_path, cli.verbose);
    watch_info!("surplus_watch {} starting", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::new(config_path);
    let config = store.load_or_create()?;
    let settings = config
        .settings()
        .with_context(|| format!("invalid config {:?}", store.path()))?;
    let source = MarketplaceClient::new(config.marketplace_settings())
        .context("creating marketplace client")?;
    let mut scheduler_config = SchedulerConfig::new(settings.refresh_interval_secs)?;

    if cli.once {
        return run_once(&source, &settings, scheduler_config.fetch_timeout);
    }

    scheduler_config.stop_on_ctrl_c = true;
    let search = SearchSnapshot::new(settings.location.clone(), settings.criteria.clone());
    let (scheduler, events) = SchedulerThread::spawn(Arc::new(source), scheduler_config, search)
        .context("starting scheduler thread")?;

    let effects = EffectRunner::new(
        scheduler.handle().clone(),
        Box::new(ConsoleNotifier::new(true)),
        store,
        config,
    );
    let mut app = ConsoleApp {
        state: AppState::new(settings),
        effects,
    };
    let exit = app.run(&events);
    scheduler.shutdown();
    watch_info!("Exiting: {:?}", exit);
    Ok(exit)
}

/// Single cycle for `--once`: prints what currently matches, alerts nobody.
fn run_once(
    source: &MarketplaceClient,
    settings: &SettingsSnapshot,
    timeout: Duration,
) -> anyhow::Result<AppExit> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;
    let search = SearchSnapshot::new(settings.location.clone(), settings.criteria.clone());

    match runtime.block_on(run_cycle(source, &search, &PollState::new(), timeout)) {
        Ok(CycleOutcome::NoLocation) => {
            watch_warn!("No search location configured; nothing polled");
            print!("{}", render(&AppState::new(settings.clone()).view()));
            println!("No search location configured; set one with `location LAT LNG`.");
            Ok(AppExit::Clean)
        }
        Ok(CycleOutcome::Completed { report, .. }) => {
            let (state, _) = update(
                AppState::new(settings.clone()),
                Msg::CycleCompleted(report),
            );
            print!("{}", render(&state.view()));
            Ok(AppExit::Clean)
        }
        Err(CycleFailure { error, .. }) if error.is_fatal() => {
            watch_error!("Marketplace login required: {}", error);
            eprintln!("surplus_watch: {error}");
            Ok(AppExit::AuthenticationRequired)
        }
        Err(CycleFailure { error, .. }) => Err(error).context("poll failed"),
    }
}

struct ConsoleApp {
    state: AppState,
    effects: EffectRunner,
}

impl ConsoleApp {
    fn run(&mut self, events: &HandoffReceiver) -> AppExit {
        let (input_tx, input_rx) = mpsc::channel::<Input>();
        spawn_stdin_reader(input_tx.clone());

        // Background tick: drains the scheduler hand-off and throttles rendering.
        thread::spawn(move || {
            while input_tx.send(Input::Tick).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        });

        print!("{}", render(&self.state.view()));
        println!("Type `help` for commands.");

        while let Ok(input) = input_rx.recv() {
            match input {
                Input::Line(line) => self.handle_line(&line),
                Input::Tick => {
                    for event in events.drain() {
                        self.dispatch_msg(event_msg(event));
                    }
                    self.dispatch_msg(Msg::Tick);
                }
            }

            if self.state.consume_dirty() {
                print!("{}", render(&self.state.view()));
            }
            match self.effects.shutdown_reason() {
                Some(ShutdownReason::UserRequested) => return AppExit::Clean,
                Some(ShutdownReason::AuthenticationRequired) => {
                    return AppExit::AuthenticationRequired
                }
                None if self.state.session() == SessionState::Stopped => return AppExit::Clean,
                None => {}
            }
        }
        AppExit::Clean
    }

    fn handle_line(&mut self, line: &str) {
        match parse_command(line, &self.state.view()) {
            Ok(Command::Send(msg)) => self.dispatch_msg(msg),
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Redraw) => print!("{}", render(&self.state.view())),
            Err(err) => println!("{err}"),
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for reply in self.effects.run(effects) {
            self.dispatch_msg(reply);
        }
    }
}

fn event_msg(event: SchedulerEvent) -> Msg {
    match event {
        SchedulerEvent::Cycle(report) => Msg::CycleCompleted(report),
        SchedulerEvent::AuthenticationRequired(reason) => Msg::AuthenticationRequired(reason),
        SchedulerEvent::Stopped => Msg::SchedulerStopped,
    }
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    let spawned = thread::Builder::new()
        .name("surplus-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if input_tx.send(Input::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(err) => {
                        watch_warn!("Reading commands failed: {}", err);
                        break;
                    }
                }
            }
            watch_info!("Command input closed; still watching until interrupted");
        });
    if let Err(err) = spawned {
        watch_warn!("Could not start command reader: {}", err);
    }
}
