use crate::input::{collect_input, Command};
use crate::render::{draw_scene, Layout, Target, Terminal};
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use yurupet::config::{load_settings, project_paths, save_settings_atomic, Args, Paths, Settings};
use yurupet::model::{Moment, Notice, Rules, Stats};
use yurupet::sim::GameState;
use yurupet::storage::{load_or_default, persist, JsonFileStore};
use yurupet::telemetry::init_logging;

struct Toast {
    text: &'static str,
    until: Instant,
}

pub(crate) struct App {
    /// As read from settings.json, before CLI overrides.
    file_settings: Settings,
    settings: Settings,
    paths: Paths,
    store: JsonFileStore,
    state: GameState<StdRng>,
    term: Terminal,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn init(args: Args) -> anyhow::Result<Self> {
        let mut paths = project_paths()?;
        if let Some(p) = &args.save {
            paths.save_path = p.clone();
        }
        if let Some(p) = &args.log {
            paths.log_path = p.clone();
        }
        init_logging(&paths.log_path)?;

        let file_settings = load_settings(&paths.settings_path);
        let mut settings = file_settings.clone();
        args.apply(&mut settings);

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let rules = Rules::default();
        let now = Moment::now();
        let store = JsonFileStore::new(&paths.save_path);
        let stats = load_or_default(&store, Stats::new(rules.default_need, &now));
        let state = GameState::with_stats(rules, stats, rng);
        info!(save = %paths.save_path.display(), tick_ms = settings.tick_ms, "starting");

        let term = Terminal::begin()?;

        Ok(Self {
            file_settings,
            settings,
            paths,
            store,
            state,
            term,
            toast: None,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let cadence = Duration::from_millis(self.settings.tick_ms.clamp(20, 2000));
        let mut next_tick = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            let wait = next_tick.saturating_duration_since(Instant::now());
            for cmd in collect_input(wait)? {
                self.handle(cmd);
                if self.should_quit {
                    break;
                }
            }

            if Instant::now() >= next_tick {
                self.state.tick(&Moment::now());
                next_tick += cadence;
                // fell far behind (suspended terminal, slow host): resync instead of bursting
                if next_tick < Instant::now() {
                    next_tick = Instant::now() + cadence;
                }
            }

            self.flush_state();
            self.render_frame()?;
        }
        Ok(())
    }

    fn handle(&mut self, cmd: Command) {
        let now = Moment::now();
        match cmd {
            Command::Quit => self.should_quit = true,
            Command::Press(button) => self.state.press_button(button, &now),
            Command::Click { col, row } => {
                let lay = Layout::new(self.term.cols, self.state.rules().playfield);
                match lay.hit(col, row, &self.state.view()) {
                    Some(Target::Button(button)) => self.state.press_button(button, &now),
                    Some(Target::Mess(id)) => self.state.click_mess(id),
                    None => {}
                }
            }
        }
    }

    /// Persist if the core asked for it and pick up the newest toast.
    fn flush_state(&mut self) {
        if self.state.take_dirty() {
            persist(&self.store, &self.state.snapshot());
        }
        if let Some(Notice { text, ttl }) = self.state.drain_notices().pop() {
            self.toast = Some(Toast {
                text,
                until: Instant::now() + ttl,
            });
        }
        if self.toast.as_ref().is_some_and(|t| Instant::now() >= t.until) {
            self.toast = None;
        }
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear(crossterm::style::Color::Black);
        let lay = Layout::new(self.term.cols, self.state.rules().playfield);
        let view = self.state.view();
        draw_scene(
            &mut self.term.cur,
            &lay,
            &view,
            self.toast.as_ref().map(|t| t.text),
            self.settings.enable_color,
        );
        self.term.present()
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        persist(&self.store, &self.state.snapshot());
        self.term.end()?;
        if let Err(err) = save_settings_atomic(&self.paths.settings_path, &self.file_settings) {
            warn!(%err, "could not write settings");
        }
        info!("bye");
        Ok(())
    }
}

pub(crate) fn run(args: Args) -> anyhow::Result<()> {
    let mut app = App::init(args)?;
    let res = app.run();
    app.shutdown()?;
    res
}
