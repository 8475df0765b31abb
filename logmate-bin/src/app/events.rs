use super::App;
use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use logmate_engine::Category;

impl App {
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // help popup mode has higher priority
        if self.show_help_popup {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => {
                    self.show_help_popup = false;
                    return Ok(());
                }
                KeyCode::Char('q') => {
                    // let 'q' fall through to quit the program
                }
                _ => return Ok(()),
            }
        }

        // search input mode: every printable key edits the query
        if self.search_focused {
            match key.code {
                KeyCode::Esc => {
                    self.search_focused = false;
                    self.search_input.clear();
                    self.apply_query();
                    return Ok(());
                }
                KeyCode::Enter => {
                    self.search_focused = false;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                    self.apply_query();
                    return Ok(());
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.search_input.push(c);
                    self.apply_query();
                    return Ok(());
                }
                _ => {}
            }
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => {
                log::debug!("Quit key pressed");
                self.is_exiting = true;
            }
            KeyCode::Char('c') if ctrl => self.is_exiting = true,
            KeyCode::Esc => self.clear_query(),
            KeyCode::Char('j') | KeyCode::Down => self.step(1),
            KeyCode::Char('k') | KeyCode::Up => self.step(-1),
            KeyCode::Char('d') if ctrl => self.step(self.half_page()),
            KeyCode::Char('u') if ctrl => self.step(-self.half_page()),
            KeyCode::PageDown => self.step(self.half_page()),
            KeyCode::PageUp => self.step(-self.half_page()),
            KeyCode::Char('g') | KeyCode::Home => self.go_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.go_to_bottom(),
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Char('n') => self.jump_match(true),
            KeyCode::Char('N') => self.jump_match(false),
            KeyCode::Tab => self.pick_category(true),
            KeyCode::BackTab => self.pick_category(false),
            KeyCode::Char(']') => self.jump_category(true),
            KeyCode::Char('[') => self.jump_category(false),
            KeyCode::Char('y') => {
                if let Err(e) = self.yank_picked_category() {
                    log::debug!("Failed to copy category lines: {}", e);
                    self.set_notice(format!("Clipboard unavailable: {}", e));
                }
            }
            KeyCode::Char('t') => self.show_stats = !self.show_stats,
            KeyCode::Char('r') => {
                log::info!("Reloading {}", self.desc.path.display());
                self.start_load();
            }
            KeyCode::Char('?') => self.show_help_popup = !self.show_help_popup,
            _ => {}
        }

        Ok(())
    }

    fn half_page(&self) -> isize {
        (self.viewport_height / 2).max(1) as isize
    }

    fn apply_query(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.set_query(&self.search_input);
            self.follow_pending = true;
        }
    }

    /// move down (positive) or up (negative); while a query is set this
    /// walks the matches instead of the lines
    fn step(&mut self, delta: isize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.search().query().is_empty() {
            session.move_selection(delta);
        } else if delta > 0 {
            session.next_match();
        } else {
            session.previous_match();
        }
        self.follow_pending = true;
    }

    fn jump_match(&mut self, forward: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let landed = if forward {
            session.next_match()
        } else {
            session.previous_match()
        };
        if landed.is_some() {
            self.follow_pending = true;
        }
    }

    /// drop the typed query so the selected line is the highlighted one
    fn clear_query(&mut self) {
        if !self.search_input.is_empty() {
            self.search_input.clear();
            self.apply_query();
        }
    }

    fn go_to_top(&mut self) {
        if self.session.is_none() {
            return;
        }
        self.clear_query();
        if let Some(session) = self.session.as_mut() {
            session.select_first();
            self.scroll = 0;
        }
    }

    fn go_to_bottom(&mut self) {
        if self.session.is_none() {
            return;
        }
        self.clear_query();
        if let Some(session) = self.session.as_mut() {
            session.select_last();
            self.scroll = usize::MAX;
            self.clamp_scroll();
        }
    }

    /// cycle the picked category through the strip, in label order
    fn pick_category(&mut self, forward: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let categories: Vec<Category> = session.category_index().categories().collect();
        if categories.is_empty() {
            return;
        }

        let current = self
            .picked_category
            .and_then(|cat| categories.iter().position(|&c| c == cat));
        let len = categories.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.picked_category = Some(categories[next]);
    }

    fn jump_category(&mut self, forward: bool) {
        let (Some(session), Some(cat)) = (self.session.as_mut(), self.picked_category) else {
            return;
        };

        let landed = if forward {
            session.next_in_category(cat)
        } else {
            session.previous_in_category(cat)
        };

        if landed.is_some() {
            self.clear_query();
            self.follow_pending = true;
        }
    }

    fn yank_picked_category(&mut self) -> Result<()> {
        let Some(cat) = self.picked_category else {
            self.set_notice("No category to copy".to_string());
            return Ok(());
        };
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let Some(text) = session.category_text(cat) else {
            return Ok(());
        };
        let count = session.category_index().count(cat);

        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(&text)?;

        log::debug!(
            "Copied {} line(s) of {} ({} chars) to clipboard",
            count,
            cat,
            text.len()
        );

        self.set_notice(format!("Copied {} line(s) of {} to clipboard", count, cat));
        Ok(())
    }
}
