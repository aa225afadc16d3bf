//! Application state and key handling.

use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use tracing::warn;

use crate::config::Settings;
use crate::executor;
use crate::listing;
use crate::models::MediaType;
use crate::session::SessionState;

/// Which input the keyboard currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Directory(MediaType),
    EditName,
    SharedYear,
}

pub struct App {
    pub session: SessionState,
    pub settings: Settings,
    settings_path: PathBuf,
    pub list_state: ListState,
    pub input_mode: InputMode,
    pub input: String,
    pub status_message: Option<String>,
    pub show_help: bool,
}

impl App {
    pub fn new(session: SessionState, settings: Settings, settings_path: PathBuf) -> Self {
        Self {
            session,
            settings,
            settings_path,
            list_state: ListState::default(),
            input_mode: InputMode::Browse,
            input: String::new(),
            status_message: None,
            show_help: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state
            .selected()
            .filter(|&i| i < self.session.len())
    }

    /// Handle one key press. Returns true when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.input_mode {
            InputMode::Browse => self.handle_browse_key(code),
            _ => {
                self.handle_input_key(code);
                false
            }
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    return true;
                }
            }
            KeyCode::Char('h') => self.show_help = !self.show_help,
            KeyCode::Char('m') => self.prompt_directory(MediaType::Movie),
            KeyCode::Char('s') => self.prompt_directory(MediaType::Series),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Char('e') => self.prompt_edit(),
            KeyCode::Char('y') => self.prompt_shared_year(),
            KeyCode::Char('p') => self.propagate_selected(),
            KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('a') => self.apply(),
            KeyCode::Char('o') => {
                self.session.start_over();
                self.list_state.select(None);
                self.status_message = Some("session cleared".to_string());
            }
            _ => {}
        }
        false
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input.clear();
                self.input_mode = InputMode::Browse;
            }
            KeyCode::Enter => self.commit_input(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn prompt_directory(&mut self, media_type: MediaType) {
        self.input = match media_type {
            MediaType::Movie => self.settings.last_movie_directory.clone(),
            MediaType::Series => self.settings.last_series_directory.clone(),
        };
        self.input_mode = InputMode::Directory(media_type);
    }

    fn prompt_edit(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        self.input = self.session.files()[index].proposed_name.clone();
        self.input_mode = InputMode::EditName;
    }

    fn prompt_shared_year(&mut self) {
        if self.session.media_type() != Some(MediaType::Series) {
            self.status_message = Some("shared year applies to series sessions".to_string());
            return;
        }
        self.input.clear();
        self.input_mode = InputMode::SharedYear;
    }

    fn commit_input(&mut self) {
        let mode = self.input_mode;
        let input = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Browse;

        match mode {
            InputMode::Browse => {}
            InputMode::Directory(media_type) => self.load_directory(media_type, input.trim()),
            InputMode::EditName => {
                if let Some(index) = self.selected() {
                    match self.session.edit(index, &input) {
                        Ok(()) => {
                            let status = self.session.files()[index].status;
                            self.status_message = Some(format!("edited: {status:?}"));
                        }
                        Err(err) => self.status_message = Some(err.to_string()),
                    }
                }
            }
            InputMode::SharedYear => match input.trim().parse::<u16>() {
                Ok(year) => match self.session.set_shared_year(year) {
                    Ok(updated) => {
                        self.status_message =
                            Some(format!("year {year} applied to {updated} file(s)"));
                    }
                    Err(err) => self.status_message = Some(err.to_string()),
                },
                Err(_) => self.status_message = Some("enter a four digit year".to_string()),
            },
        }
    }

    pub fn load_directory(&mut self, media_type: MediaType, dir: &str) {
        if dir.is_empty() {
            return;
        }
        let dir = PathBuf::from(dir);

        let videos = match listing::scan_folder_for_videos(&dir, self.session.config()) {
            Ok(videos) => videos,
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        };
        if videos.is_empty() {
            self.status_message = Some(format!("no video files in {}", dir.display()));
            return;
        }
        let existing = match listing::list_existing(&dir) {
            Ok(existing) => existing,
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        };

        match self.session.add_files(&videos, media_type, &existing) {
            Ok(()) => {
                self.status_message = Some(format!("added {} file(s)", videos.len()));
                if self.list_state.selected().is_none() {
                    self.list_state.select(Some(0));
                }
                self.remember_directory(media_type, &dir);
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    fn remember_directory(&mut self, media_type: MediaType, dir: &PathBuf) {
        let dir = dir.to_string_lossy().into_owned();
        match media_type {
            MediaType::Movie => self.settings.last_movie_directory = dir,
            MediaType::Series => self.settings.last_series_directory = dir,
        }
        if let Err(err) = self.settings.save(&self.settings_path) {
            warn!(%err, "failed to persist settings");
        }
    }

    fn propagate_selected(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        match self.session.propagate_edit(index) {
            Ok(modified) if modified.is_empty() => {
                self.status_message =
                    Some("nothing to propagate (needs a canonical series name)".to_string());
            }
            Ok(modified) => {
                self.status_message = Some(format!("updated {} sibling(s)", modified.len()));
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    fn remove_selected(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        match self.session.remove(index) {
            Ok(removed) => {
                self.status_message = Some(format!("removed {}", removed.original_name));
                self.clamp_selection();
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    fn apply(&mut self) {
        let pairs = match self.session.apply() {
            Ok(pairs) => pairs,
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        };
        if pairs.is_empty() {
            self.status_message = Some("nothing to rename".to_string());
            return;
        }
        let outcomes = executor::execute_renames(pairs);
        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        let renamed = outcomes.len() - failed;
        self.session.mark_applied(&outcomes);
        self.clamp_selection();
        self.status_message = if failed == 0 {
            Some(format!("renamed {renamed} file(s)"))
        } else {
            Some(format!("renamed {renamed}, {failed} failed (kept for retry)"))
        };
    }

    fn clamp_selection(&mut self) {
        if self.session.is_empty() {
            self.list_state.select(None);
        } else if let Some(selected) = self.list_state.selected() {
            if selected >= self.session.len() {
                self.list_state.select(Some(self.session.len() - 1));
            }
        }
    }

    fn select_next(&mut self) {
        if self.session.is_empty() {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < self.session.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_previous(&mut self) {
        if self.session.is_empty() {
            return;
        }
        let previous = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(previous));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use std::fs::{self, File};

    fn app() -> App {
        let session = SessionState::new(EngineConfig::with_year_bounds(1895, 2024));
        App::new(
            session,
            Settings::default(),
            std::env::temp_dir().join("media-rename-app-test-settings.json"),
        )
    }

    #[test]
    fn navigation_clamps_to_list_bounds() {
        let mut app = app();
        let dir = std::env::temp_dir().join(format!("media-rename-app-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        File::create(dir.join("Movie.2020.mkv")).unwrap();
        File::create(dir.join("Other.2021.mkv")).unwrap();

        app.load_directory(MediaType::Movie, &dir.to_string_lossy());
        assert_eq!(app.session.len(), 2);
        assert_eq!(app.list_state.selected(), Some(0));

        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Char('j'));
        assert_eq!(app.list_state.selected(), Some(1));
        app.handle_key(KeyCode::Char('k'));
        assert_eq!(app.list_state.selected(), Some(0));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn escape_cancels_an_input_prompt() {
        let mut app = app();
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.input_mode, InputMode::Directory(MediaType::Movie));
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(app.input.is_empty());
    }

    #[test]
    fn quit_keys_only_apply_in_browse_mode() {
        let mut app = app();
        app.handle_key(KeyCode::Char('m'));
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn shared_year_prompt_requires_a_series_session() {
        let mut app = app();
        app.handle_key(KeyCode::Char('y'));
        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(app.status_message.is_some());
    }
}
