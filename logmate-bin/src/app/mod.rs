use crate::{loader::spawn_load_thread, status_bar::Notice};
use anyhow::{Result, anyhow};
use crossterm::event::{self, Event};
use logmate_engine::{Category, LoadedLog, LogSession};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io,
    path::PathBuf,
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

mod events;
mod render;

// constants
const DEFAULT_EVENT_POLL_INTERVAL_MS: u64 = 16;
const NOTICE_DURATION_MS: u64 = 2000;
const HELP_POPUP_WIDTH: u16 = 60;
const SCROLL_PAD: usize = 1;

#[derive(Clone)]
pub struct AppDesc {
    pub path: PathBuf,
    pub event_poll_interval: Duration,
    pub initial_query: Option<String>,
    pub initial_category: Option<Category>,
}

impl AppDesc {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            event_poll_interval: Duration::from_millis(DEFAULT_EVENT_POLL_INTERVAL_MS),
            initial_query: None,
            initial_category: None,
        }
    }
}

/// Start the viewer with custom configuration
pub fn start_with_desc(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    desc: AppDesc,
) -> Result<()> {
    color_eyre::install().or(Err(anyhow!("Error installing color_eyre")))?;

    let app = App::new(desc);
    app.run(terminal)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

struct App {
    desc: AppDesc,
    is_exiting: bool,
    status: LoadStatus,
    pending_load: Option<Receiver<Result<LoadedLog>>>,
    session: Option<LogSession>,
    pending_category: Option<Category>, // jump target applied once the first load lands
    picked_category: Option<Category>,  // category driven by [ ] and y
    search_input: String,
    search_focused: bool,
    scroll: usize,               // first visible line
    viewport_height: usize,      // rows of the log view at the last render
    follow_pending: bool,        // scroll to the highlighted line on next render
    show_stats: bool,
    show_help_popup: bool,
    notice: Option<Notice>,
}

// ============================================================================
// Initialization
// ============================================================================
impl App {
    fn new(desc: AppDesc) -> Self {
        let search_input = desc.initial_query.clone().unwrap_or_default();
        let pending_category = desc.initial_category;

        Self {
            desc,
            is_exiting: false,
            status: LoadStatus::Loading,
            pending_load: None,
            session: None,
            pending_category,
            picked_category: None,
            search_input,
            search_focused: false,
            scroll: 0,
            viewport_height: 1,
            follow_pending: false,
            show_stats: true,
            show_help_popup: false,
            notice: None,
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================
impl App {
    fn run(mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        self.start_load();

        while !self.is_exiting {
            self.poll_load();
            self.poll_event(self.desc.event_poll_interval)?;
            self.notice = Notice::check_and_clear(self.notice.take());
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;
        }

        Ok(())
    }

    fn poll_event(&mut self, poll_interval: Duration) -> Result<()> {
        if event::poll(poll_interval)? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key)?,
                Event::Resize(width, height) => {
                    log::debug!("Terminal resized to {}x{}", width, height);
                    self.follow_pending = true;
                }
                _ => {}
            }
        }

        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================
impl App {
    fn file_name(&self) -> String {
        self.desc
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.desc.path.display().to_string())
    }

    /// discard the current view and load the file again from disk
    fn start_load(&mut self) {
        self.session = None;
        self.scroll = 0;
        self.status = LoadStatus::Loading;
        // replacing the receiver abandons any load still in flight
        self.pending_load = Some(spawn_load_thread(self.desc.path.clone()));
    }

    fn poll_load(&mut self) {
        let Some(receiver) = &self.pending_load else {
            return;
        };

        match receiver.try_recv() {
            Ok(Ok(loaded)) => {
                self.pending_load = None;
                self.install(loaded);
            }
            Ok(Err(e)) => {
                self.pending_load = None;
                self.status = LoadStatus::Failed(format!("{:#}", e));
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_load = None;
                self.status = LoadStatus::Failed("Loader thread exited unexpectedly".to_string());
            }
        }
    }

    fn install(&mut self, loaded: LoadedLog) {
        let mut session = LogSession::new(loaded);

        if !self.search_input.is_empty() {
            session.set_query(&self.search_input);
        }

        // keep the picked category across reloads when it still occurs
        let index = session.category_index();
        self.picked_category = self
            .picked_category
            .filter(|&cat| index.contains(cat))
            .or_else(|| index.categories().next());

        if let Some(cat) = self.pending_category.take() {
            if session.next_in_category(cat).is_some() {
                self.picked_category = Some(cat);
            } else {
                self.set_notice(format!("No {} lines in this file", cat));
            }
        }

        self.session = Some(session);
        self.status = LoadStatus::Loaded;
        self.follow_pending = true;
    }

    fn set_notice(&mut self, text: String) {
        self.notice = Some(Notice::new(
            text,
            Duration::from_millis(NOTICE_DURATION_MS),
        ));
    }
}

// ============================================================================
// Scrolling
// ============================================================================
impl App {
    /// adjust the scroll position so the highlighted line is inside the view
    fn follow_highlight(&mut self) {
        let Some(target) = self
            .session
            .as_ref()
            .and_then(|session| session.highlighted_line())
        else {
            return;
        };

        let height = self.viewport_height.max(1);
        let pad = if height > 2 { SCROLL_PAD } else { 0 };

        if target < self.scroll.saturating_add(pad) {
            self.scroll = target.saturating_sub(pad);
        } else if target + pad >= self.scroll + height {
            self.scroll = (target + pad + 1).saturating_sub(height);
        }
    }

    fn clamp_scroll(&mut self) {
        let total = self.session.as_ref().map_or(0, |s| s.lines().len());
        let max_top = total.saturating_sub(self.viewport_height.max(1));
        self.scroll = self.scroll.min(max_top);
    }
}
