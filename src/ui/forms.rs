//! Modal input forms. Forms only coerce text into typed values (dates, times,
//! integers, booleans); free-text fields go to the store verbatim, including
//! surrounding whitespace.

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use ratatui::text::Line;

use crate::models::{Event, NewEvent, NewTask, NewVenue};

use super::helpers::{form_line, yes_no};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Keyboard-driven behavior shared by every form: focus cycling, character
/// entry, and rendering. Fields that are not free text (checkboxes, pickers)
/// return `None` from `value_mut` and react to `toggle` / `cycle` instead.
pub(crate) trait Form {
    type Field: Copy + PartialEq + 'static;

    const FIELDS: &'static [Self::Field];

    fn active(&self) -> Self::Field;
    fn set_active(&mut self, field: Self::Field);
    fn label(field: Self::Field) -> &'static str;
    fn placeholder(field: Self::Field) -> &'static str;
    fn display(&self, field: Self::Field) -> String;
    fn value_mut(&mut self, field: Self::Field) -> Option<&mut String>;
    fn error(&self) -> Option<&str>;
    fn set_error(&mut self, error: Option<String>);

    /// Whether `ch` may be typed into `field`.
    fn accepts(_field: Self::Field, ch: char) -> bool {
        !ch.is_control()
    }

    /// Space on a non-text field.
    fn toggle(&mut self) -> bool {
        false
    }

    /// Left/Right on a non-text field.
    fn cycle(&mut self, _offset: isize) -> bool {
        false
    }

    fn active_index(&self) -> usize {
        let active = self.active();
        Self::FIELDS
            .iter()
            .position(|field| *field == active)
            .unwrap_or(0)
    }

    fn next_field(&mut self) {
        let next = (self.active_index() + 1) % Self::FIELDS.len();
        self.set_active(Self::FIELDS[next]);
    }

    fn previous_field(&mut self) {
        let len = Self::FIELDS.len();
        let previous = (self.active_index() + len - 1) % len;
        self.set_active(Self::FIELDS[previous]);
    }

    /// Append a character to the active field. Returns `true` when the form
    /// changed.
    fn push_char(&mut self, ch: char) -> bool {
        let field = self.active();
        if !Self::accepts(field, ch) {
            return false;
        }
        if let Some(value) = self.value_mut(field) {
            value.push(ch);
            return true;
        }
        ch == ' ' && self.toggle()
    }

    fn backspace(&mut self) {
        let field = self.active();
        if let Some(value) = self.value_mut(field) {
            value.pop();
        }
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let active = self.active();
        Self::FIELDS
            .iter()
            .map(|field| {
                form_line(
                    Self::label(*field),
                    &self.display(*field),
                    Self::placeholder(*field),
                    *field == active,
                )
            })
            .collect()
    }

    /// Column/row offset of the text cursor inside the form body.
    fn cursor_offset(&self) -> (u16, u16) {
        let field = self.active();
        let column = Self::label(field).chars().count() + 2 + self.display(field).chars().count();
        (
            u16::try_from(column).unwrap_or(u16::MAX),
            u16::try_from(self.active_index()).unwrap_or(u16::MAX),
        )
    }
}

/// Fields of the event form, in display order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum EventField {
    #[default]
    Name,
    Date,
    Time,
    VenueId,
    Agenda,
    Goals,
    Collaborators,
}

#[derive(Clone, Debug)]
pub(crate) struct EventForm {
    pub(crate) name: String,
    pub(crate) date: String,
    pub(crate) time: String,
    pub(crate) venue_id: String,
    pub(crate) agenda: String,
    pub(crate) goals: String,
    pub(crate) collaborators: String,
    pub(crate) active: EventField,
    pub(crate) error: Option<String>,
}

impl EventForm {
    /// Start with today's date and the current minute, like a date/time
    /// picker would.
    pub(crate) fn new() -> Self {
        let now = Local::now();
        let time = now.time();
        Self {
            name: String::new(),
            date: now.date_naive().format(DATE_INPUT_FORMAT).to_string(),
            time: format!("{:02}:{:02}", time.hour(), time.minute()),
            venue_id: String::new(),
            agenda: String::new(),
            goals: String::new(),
            collaborators: String::new(),
            active: EventField::Name,
            error: None,
        }
    }

    /// Coerce the inputs into an insert payload.
    pub(crate) fn parse_inputs(&self) -> Result<NewEvent> {
        let venue_id = match self.venue_id.trim() {
            "" => None,
            raw => Some(
                raw.parse::<i64>()
                    .map_err(|_| anyhow!("Venue ID must be an integer."))?,
            ),
        };
        Ok(NewEvent {
            name: self.name.clone(),
            date: parse_date(&self.date, "Event date")?,
            time: parse_time(&self.time)?,
            venue_id,
            agenda: self.agenda.clone(),
            goals: self.goals.clone(),
            collaborators: self.collaborators.clone(),
        })
    }
}

impl Form for EventForm {
    type Field = EventField;

    const FIELDS: &'static [EventField] = &[
        EventField::Name,
        EventField::Date,
        EventField::Time,
        EventField::VenueId,
        EventField::Agenda,
        EventField::Goals,
        EventField::Collaborators,
    ];

    fn active(&self) -> EventField {
        self.active
    }

    fn set_active(&mut self, field: EventField) {
        self.active = field;
    }

    fn label(field: EventField) -> &'static str {
        match field {
            EventField::Name => "Event Name",
            EventField::Date => "Event Date",
            EventField::Time => "Event Time",
            EventField::VenueId => "Venue ID",
            EventField::Agenda => "Agenda",
            EventField::Goals => "Goals",
            EventField::Collaborators => "Collaborators",
        }
    }

    fn placeholder(field: EventField) -> &'static str {
        match field {
            EventField::Date => "YYYY-MM-DD",
            EventField::Time => "HH:MM or HH:MM:SS",
            EventField::VenueId => "<none>",
            _ => "",
        }
    }

    fn display(&self, field: EventField) -> String {
        match field {
            EventField::Name => self.name.clone(),
            EventField::Date => self.date.clone(),
            EventField::Time => self.time.clone(),
            EventField::VenueId => self.venue_id.clone(),
            EventField::Agenda => self.agenda.clone(),
            EventField::Goals => self.goals.clone(),
            EventField::Collaborators => self.collaborators.clone(),
        }
    }

    fn value_mut(&mut self, field: EventField) -> Option<&mut String> {
        Some(match field {
            EventField::Name => &mut self.name,
            EventField::Date => &mut self.date,
            EventField::Time => &mut self.time,
            EventField::VenueId => &mut self.venue_id,
            EventField::Agenda => &mut self.agenda,
            EventField::Goals => &mut self.goals,
            EventField::Collaborators => &mut self.collaborators,
        })
    }

    fn accepts(field: EventField, ch: char) -> bool {
        match field {
            EventField::Date => ch.is_ascii_digit() || ch == '-',
            EventField::Time => ch.is_ascii_digit() || ch == ':',
            EventField::VenueId => ch.is_ascii_digit(),
            _ => !ch.is_control(),
        }
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum VenueField {
    #[default]
    Name,
    Capacity,
    Facilities,
    Pricing,
    Availability,
}

#[derive(Clone, Debug)]
pub(crate) struct VenueForm {
    pub(crate) name: String,
    pub(crate) capacity: String,
    pub(crate) facilities: String,
    pub(crate) pricing: String,
    pub(crate) availability: bool,
    pub(crate) active: VenueField,
    pub(crate) error: Option<String>,
}

impl VenueForm {
    /// Capacity starts at the minimum of one.
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
            capacity: "1".to_string(),
            facilities: String::new(),
            pricing: String::new(),
            availability: false,
            active: VenueField::Name,
            error: None,
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<NewVenue> {
        let raw = self.capacity.trim();
        if raw.is_empty() {
            return Err(anyhow!("Capacity is required."));
        }
        let capacity = raw
            .parse::<i64>()
            .map_err(|_| anyhow!("Capacity must be an integer."))?;
        if capacity < 1 {
            return Err(anyhow!("Capacity must be at least 1."));
        }
        Ok(NewVenue {
            name: self.name.clone(),
            capacity,
            facilities: self.facilities.clone(),
            pricing: self.pricing.clone(),
            availability: self.availability,
        })
    }
}

impl Form for VenueForm {
    type Field = VenueField;

    const FIELDS: &'static [VenueField] = &[
        VenueField::Name,
        VenueField::Capacity,
        VenueField::Facilities,
        VenueField::Pricing,
        VenueField::Availability,
    ];

    fn active(&self) -> VenueField {
        self.active
    }

    fn set_active(&mut self, field: VenueField) {
        self.active = field;
    }

    fn label(field: VenueField) -> &'static str {
        match field {
            VenueField::Name => "Venue Name",
            VenueField::Capacity => "Capacity",
            VenueField::Facilities => "Facilities",
            VenueField::Pricing => "Pricing",
            VenueField::Availability => "Available",
        }
    }

    fn placeholder(field: VenueField) -> &'static str {
        match field {
            VenueField::Capacity => "<required>",
            _ => "",
        }
    }

    fn display(&self, field: VenueField) -> String {
        match field {
            VenueField::Name => self.name.clone(),
            VenueField::Capacity => self.capacity.clone(),
            VenueField::Facilities => self.facilities.clone(),
            VenueField::Pricing => self.pricing.clone(),
            VenueField::Availability => {
                let mark = if self.availability { "x" } else { " " };
                format!("[{mark}] {}", yes_no(self.availability))
            }
        }
    }

    fn value_mut(&mut self, field: VenueField) -> Option<&mut String> {
        match field {
            VenueField::Name => Some(&mut self.name),
            VenueField::Capacity => Some(&mut self.capacity),
            VenueField::Facilities => Some(&mut self.facilities),
            VenueField::Pricing => Some(&mut self.pricing),
            VenueField::Availability => None,
        }
    }

    fn accepts(field: VenueField, ch: char) -> bool {
        match field {
            VenueField::Capacity => ch.is_ascii_digit(),
            VenueField::Availability => ch == ' ',
            _ => !ch.is_control(),
        }
    }

    fn toggle(&mut self) -> bool {
        if self.active == VenueField::Availability {
            self.availability = !self.availability;
            true
        } else {
            false
        }
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum TaskField {
    #[default]
    Name,
    Deadline,
    Responsibility,
    Event,
}

/// Task form. The event is picked from the events that exist when the form
/// opens, so the stored `event_id` always names a real row at that moment.
#[derive(Clone, Debug)]
pub(crate) struct TaskForm {
    pub(crate) name: String,
    pub(crate) deadline: String,
    pub(crate) responsibility: String,
    pub(crate) events: Vec<(i64, String)>,
    pub(crate) event_index: usize,
    pub(crate) active: TaskField,
    pub(crate) error: Option<String>,
}

impl TaskForm {
    /// Returns `None` when there is no event to attach a task to.
    pub(crate) fn new(events: &[Event]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }
        Some(Self {
            name: String::new(),
            deadline: Local::now().date_naive().format(DATE_INPUT_FORMAT).to_string(),
            responsibility: String::new(),
            events: events
                .iter()
                .map(|event| (event.id, event.to_string()))
                .collect(),
            event_index: 0,
            active: TaskField::Name,
            error: None,
        })
    }

    /// New tasks are always pending.
    pub(crate) fn parse_inputs(&self) -> Result<NewTask> {
        let (event_id, _) = self
            .events
            .get(self.event_index)
            .ok_or_else(|| anyhow!("Select an event for the task."))?;
        Ok(NewTask::pending(
            *event_id,
            self.name.clone(),
            parse_date(&self.deadline, "Deadline")?,
            self.responsibility.clone(),
        ))
    }
}

impl Form for TaskForm {
    type Field = TaskField;

    const FIELDS: &'static [TaskField] = &[
        TaskField::Name,
        TaskField::Deadline,
        TaskField::Responsibility,
        TaskField::Event,
    ];

    fn active(&self) -> TaskField {
        self.active
    }

    fn set_active(&mut self, field: TaskField) {
        self.active = field;
    }

    fn label(field: TaskField) -> &'static str {
        match field {
            TaskField::Name => "Task Name",
            TaskField::Deadline => "Deadline",
            TaskField::Responsibility => "Responsibility",
            TaskField::Event => "Event",
        }
    }

    fn placeholder(field: TaskField) -> &'static str {
        match field {
            TaskField::Deadline => "YYYY-MM-DD",
            _ => "",
        }
    }

    fn display(&self, field: TaskField) -> String {
        match field {
            TaskField::Name => self.name.clone(),
            TaskField::Deadline => self.deadline.clone(),
            TaskField::Responsibility => self.responsibility.clone(),
            TaskField::Event => self
                .events
                .get(self.event_index)
                .map(|(_, label)| format!("< {label} >"))
                .unwrap_or_default(),
        }
    }

    fn value_mut(&mut self, field: TaskField) -> Option<&mut String> {
        match field {
            TaskField::Name => Some(&mut self.name),
            TaskField::Deadline => Some(&mut self.deadline),
            TaskField::Responsibility => Some(&mut self.responsibility),
            TaskField::Event => None,
        }
    }

    fn accepts(field: TaskField, ch: char) -> bool {
        match field {
            TaskField::Deadline => ch.is_ascii_digit() || ch == '-',
            TaskField::Event => false,
            _ => !ch.is_control(),
        }
    }

    fn cycle(&mut self, offset: isize) -> bool {
        if self.active != TaskField::Event || self.events.is_empty() {
            return false;
        }
        let len = self.events.len() as isize;
        self.event_index = (self.event_index as isize + offset).rem_euclid(len) as usize;
        true
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

fn parse_date(raw: &str, field_name: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| anyhow!("{field_name} must look like YYYY-MM-DD."))
}

/// Accepts `HH:MM:SS` or `HH:MM`.
fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| anyhow!("Event time must look like HH:MM or HH:MM:SS."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(id: i64, name: &str) -> Event {
        Event {
            id,
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: "14:05:00".to_string(),
            venue_id: None,
            agenda: String::new(),
            goals: String::new(),
            collaborators: String::new(),
        }
    }

    #[test]
    fn event_form_parses_short_time_and_keeps_text_verbatim() {
        let mut form = EventForm::new();
        form.name = "  Kickoff ".to_string();
        form.date = "2024-05-01".to_string();
        form.time = "14:05".to_string();
        form.venue_id = "1".to_string();
        form.collaborators = "Alice, Bob".to_string();

        let event = form.parse_inputs().unwrap();
        assert_eq!(event.name, "  Kickoff ");
        assert_eq!(event.time, NaiveTime::from_hms_opt(14, 5, 0).unwrap());
        assert_eq!(event.venue_id, Some(1));
        assert_eq!(event.collaborators, "Alice, Bob");
    }

    #[test]
    fn event_form_allows_missing_venue() {
        let mut form = EventForm::new();
        form.venue_id.clear();
        assert_eq!(form.parse_inputs().unwrap().venue_id, None);
    }

    #[test]
    fn event_form_rejects_bad_time() {
        let mut form = EventForm::new();
        form.time = "25:00".to_string();
        let err = form.parse_inputs().unwrap_err();
        assert!(err.to_string().contains("HH:MM"));
    }

    #[test]
    fn digit_only_fields_ignore_letters() {
        let mut form = EventForm::new();
        form.set_active(EventField::VenueId);
        assert!(!form.push_char('x'));
        assert!(form.push_char('7'));
        assert_eq!(form.venue_id, "7");
    }

    #[test]
    fn focus_cycles_in_both_directions() {
        let mut form = VenueForm::new();
        form.previous_field();
        assert_eq!(form.active, VenueField::Availability);
        form.next_field();
        assert_eq!(form.active, VenueField::Name);
    }

    #[test]
    fn venue_form_enforces_minimum_capacity() {
        let mut form = VenueForm::new();
        form.capacity = "0".to_string();
        let err = form.parse_inputs().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn space_toggles_availability_checkbox() {
        let mut form = VenueForm::new();
        form.set_active(VenueField::Availability);
        assert!(form.push_char(' '));
        assert!(form.availability);
        assert!(form.parse_inputs().unwrap().availability);
    }

    #[test]
    fn task_form_requires_an_event() {
        assert!(TaskForm::new(&[]).is_none());
    }

    #[test]
    fn task_form_cycles_events_and_creates_pending_task() {
        let events = vec![sample_event(3, "Kickoff"), sample_event(8, "Retro")];
        let mut form = TaskForm::new(&events).unwrap();
        form.name = "Book room".to_string();
        form.deadline = "2024-04-20".to_string();

        form.set_active(TaskField::Event);
        assert!(form.cycle(-1));
        let task = form.parse_inputs().unwrap();
        assert_eq!(task.event_id, 8);
        assert!(!task.completed);
    }

    #[test]
    fn cursor_offset_saturates_on_very_long_input() {
        let mut form = VenueForm::new();
        form.name = "x".repeat(usize::from(u16::MAX) + 10);
        assert_eq!(form.cursor_offset(), (u16::MAX, 0));
    }

    #[test]
    fn cursor_tracks_active_field() {
        let mut form = VenueForm::new();
        form.set_active(VenueField::Capacity);
        // "Capacity: " + "1"
        assert_eq!(form.cursor_offset(), (11, 1));
    }
}
