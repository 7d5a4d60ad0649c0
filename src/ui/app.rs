use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use log::{info, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    fetch_events, fetch_tasks, fetch_venues, insert_event, insert_task, insert_venue,
    update_task_status,
};
use crate::models::{Event, Task, Venue};

use super::forms::{EventForm, Form, TaskForm, VenueForm};
use super::helpers::{centered_rect, surface_error};
use super::screens::{event_cells, task_cells, venue_cells, RowSelection, Tab};

/// Header space for the title and tab bar.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const APP_TITLE: &str = "Business Event Planner";

/// What the keyboard currently drives: the tables, or one of the modal forms.
enum Mode {
    Normal,
    AddingEvent(EventForm),
    AddingVenue(VenueForm),
    AddingTask(TaskForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Session state. The app owns the one store connection for the whole run;
/// table contents are transient copies refreshed after every write.
pub struct App {
    conn: Connection,
    events: Vec<Event>,
    venues: Vec<Venue>,
    tasks: Vec<Task>,
    tab: Tab,
    selections: [RowSelection; 3],
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Load all three tables and start on the Events tab.
    pub fn new(conn: Connection) -> Result<Self> {
        let mut app = Self {
            conn,
            events: Vec::new(),
            venues: Vec::new(),
            tasks: Vec::new(),
            tab: Tab::Events,
            selections: [RowSelection::default(); 3],
            mode: Mode::Normal,
            status: None,
        };
        app.reload_all()?;
        Ok(app)
    }

    /// End the session and release the store handle.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close the store")
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingEvent(form) => self
                .handle_form_key(code, form, "Add event cancelled.", App::save_event)
                .map_or(Mode::Normal, Mode::AddingEvent),
            Mode::AddingVenue(form) => self
                .handle_form_key(code, form, "Add venue cancelled.", App::save_venue)
                .map_or(Mode::Normal, Mode::AddingVenue),
            Mode::AddingTask(form) => self
                .handle_form_key(code, form, "Create task cancelled.", App::save_task)
                .map_or(Mode::Normal, Mode::AddingTask),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Char('1') => self.switch_tab(Tab::Events),
            KeyCode::Char('2') => self.switch_tab(Tab::Venues),
            KeyCode::Char('3') => self.switch_tab(Tab::Tasks),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home => self.selections[self.tab.index()].select_first(),
            KeyCode::End => {
                let len = self.row_count(self.tab);
                self.selections[self.tab.index()].select_last(len);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => return Ok(self.open_form()),
            KeyCode::Char(' ') | KeyCode::Enter if self.tab == Tab::Tasks => {
                if let Err(err) = self.toggle_selected_task() {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            }
            KeyCode::Char('r') => match self.reload_all() {
                Ok(()) => self.set_status("Reloaded all tables.", StatusKind::Info),
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Shared key handling for every modal form. Returns the form when it
    /// should stay open.
    fn handle_form_key<F: Form>(
        &mut self,
        code: KeyCode,
        mut form: F,
        cancel_message: &str,
        save: fn(&mut App, &F) -> Result<(Tab, i64)>,
    ) -> Option<F> {
        match code {
            KeyCode::Esc => {
                self.set_status(cancel_message, StatusKind::Info);
                return None;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => {
                form.cycle(-1);
            }
            KeyCode::Right => {
                form.cycle(1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match save(self, &form) {
                Ok((tab, id)) => {
                    self.refresh_after_write(tab, id);
                    return None;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.set_error(Some(message.clone()));
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.set_error(None);
                }
            }
            _ => {}
        }
        Some(form)
    }

    fn open_form(&mut self) -> Mode {
        self.clear_status();
        match self.tab {
            Tab::Events => Mode::AddingEvent(EventForm::new()),
            Tab::Venues => Mode::AddingVenue(VenueForm::new()),
            Tab::Tasks => match TaskForm::new(&self.events) {
                Some(form) => Mode::AddingTask(form),
                None => {
                    self.set_status("Add an event before creating tasks.", StatusKind::Error);
                    Mode::Normal
                }
            },
        }
    }

    /// Parse and insert. An `Err` here means nothing was committed; once an id
    /// comes back the form closes no matter what the re-read does.
    fn save_event(&mut self, form: &EventForm) -> Result<(Tab, i64)> {
        let event = form.parse_inputs()?;
        let id = insert_event(&self.conn, &event).context("Failed to add event.")?;
        Ok((Tab::Events, id))
    }

    fn save_venue(&mut self, form: &VenueForm) -> Result<(Tab, i64)> {
        let venue = form.parse_inputs()?;
        let id = insert_venue(&self.conn, &venue).context("Failed to add venue.")?;
        Ok((Tab::Venues, id))
    }

    fn save_task(&mut self, form: &TaskForm) -> Result<(Tab, i64)> {
        let task = form.parse_inputs()?;
        let id = insert_task(&self.conn, &task).context("Failed to create task.")?;
        Ok((Tab::Tasks, id))
    }

    /// Re-read the table a committed write touched and focus the row. A failed
    /// re-read is reported on its own; the write itself already succeeded.
    fn refresh_after_write(&mut self, tab: Tab, id: i64) {
        let saved = match tab {
            Tab::Events => "Event added successfully!",
            Tab::Venues => "Venue added successfully!",
            Tab::Tasks => "Task created successfully!",
        };
        match self.reload_tab(tab) {
            Ok(()) => {
                self.focus(tab, self.position_of(tab, id));
                self.set_status(saved, StatusKind::Info);
            }
            Err(err) => {
                warn!(
                    "event=reload module=ui status=error table={} id={}",
                    tab.title(),
                    id
                );
                self.set_status(
                    format!("{saved} Reloading failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn toggle_selected_task(&mut self) -> Result<()> {
        let selected = self.selections[Tab::Tasks.index()].selected;
        let Some(task) = self.tasks.get(selected).cloned() else {
            self.set_status("No task selected.", StatusKind::Error);
            return Ok(());
        };

        let next = task.status().toggled();
        let updated = update_task_status(&self.conn, task.id, next.is_completed())
            .context("Failed to update task status.")?;
        if updated == 0 {
            warn!(
                "event=toggle_task module=ui status=noop id={} reason=missing_row",
                task.id
            );
        }

        let marked = format!("Marked task as {next}.");
        match self.reload_tab(Tab::Tasks) {
            Ok(()) => {
                self.focus(Tab::Tasks, self.position_of(Tab::Tasks, task.id));
                self.set_status(marked, StatusKind::Info);
            }
            Err(err) => self.set_status(
                format!("{marked} Reloading failed: {}", surface_error(&err)),
                StatusKind::Error,
            ),
        }
        Ok(())
    }

    fn reload_tab(&mut self, tab: Tab) -> Result<()> {
        match tab {
            Tab::Events => {
                self.events = fetch_events(&self.conn).context("failed to load events")?;
            }
            Tab::Venues => {
                self.venues = fetch_venues(&self.conn).context("failed to load venues")?;
            }
            Tab::Tasks => {
                self.tasks = fetch_tasks(&self.conn).context("failed to load tasks")?;
            }
        }
        Ok(())
    }

    fn position_of(&self, tab: Tab, id: i64) -> Option<usize> {
        match tab {
            Tab::Events => self.events.iter().position(|e| e.id == id),
            Tab::Venues => self.venues.iter().position(|v| v.id == id),
            Tab::Tasks => self.tasks.iter().position(|t| t.id == id),
        }
    }

    fn reload_all(&mut self) -> Result<()> {
        for tab in Tab::ALL {
            self.reload_tab(tab)?;
        }
        for tab in Tab::ALL {
            let len = self.row_count(tab);
            self.selections[tab.index()].clamp(len);
        }
        info!(
            "event=reload module=ui status=ok events={} venues={} tasks={}",
            self.events.len(),
            self.venues.len(),
            self.tasks.len()
        );
        Ok(())
    }

    fn focus(&mut self, tab: Tab, row: Option<usize>) {
        let len = self.row_count(tab);
        let selection = &mut self.selections[tab.index()];
        match row {
            Some(row) => selection.selected = row,
            None => selection.clamp(len),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_status();
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.row_count(self.tab);
        self.selections[self.tab.index()].move_selection(offset, len);
    }

    fn row_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Events => self.events.len(),
            Tab::Venues => self.venues.len(),
            Tab::Tasks => self.tasks.len(),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::AddingEvent(form) => self.draw_form(frame, area, "Add Event", form),
            Mode::AddingVenue(form) => self.draw_form(frame, area, "Add Venue", form),
            Mode::AddingTask(form) => self.draw_form(frame, area, "Create New Task", form),
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title(APP_TITLE))
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Existing {}", self.tab.title()));

        let rows: Vec<Vec<String>> = match self.tab {
            Tab::Events => self.events.iter().map(event_cells).collect(),
            Tab::Venues => self.venues.iter().map(venue_cells).collect(),
            Tab::Tasks => self.tasks.iter().map(task_cells).collect(),
        };

        if rows.is_empty() {
            let message = Paragraph::new(self.tab.empty_message())
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(message, area);
            return;
        }

        let headings = self.tab.headings();
        let header = Row::new(headings.iter().map(|heading| Cell::from(*heading))).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let widths = vec![Constraint::Fill(1); headings.len()];
        let table = Table::new(rows.into_iter().map(Row::new), widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut state =
            TableState::default().with_selected(Some(self.selections[self.tab.index()].selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut spans = match (&self.mode, self.tab) {
            (Mode::Normal, Tab::Tasks) => vec![
                Span::styled("[a]", key_style),
                Span::raw(" New Task   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle Status   "),
            ],
            (Mode::Normal, Tab::Events) => vec![
                Span::styled("[a]", key_style),
                Span::raw(" Add Event   "),
            ],
            (Mode::Normal, Tab::Venues) => vec![
                Span::styled("[a]", key_style),
                Span::raw(" Add Venue   "),
            ],
            (Mode::AddingTask(_), _) => vec![
                Span::styled("[←→]", key_style),
                Span::raw(" Pick Event   "),
            ],
            (Mode::AddingVenue(_), _) => vec![
                Span::styled("[Space]", key_style),
                Span::raw(" Toggle Available   "),
            ],
            (Mode::AddingEvent(_), _) => Vec::new(),
        };

        if matches!(self.mode, Mode::Normal) {
            spans.extend([
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Table   "),
                Span::styled("[r]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]);
        } else {
            spans.extend([
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]);
        }
        Line::from(spans)
    }

    fn draw_form<F: Form>(&self, frame: &mut Frame, area: Rect, title: &str, form: &F) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = form.build_lines();
        lines.push(Line::from(""));
        if let Some(error) = form.error() {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let (column, row) = form.cursor_offset();
        let cursor_x = inner
            .x
            .saturating_add(column)
            .min(inner.right().saturating_sub(1));
        let cursor_y = inner
            .y
            .saturating_add(row)
            .min(inner.bottom().saturating_sub(1));
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
