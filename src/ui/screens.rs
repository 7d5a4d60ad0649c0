use crate::models::{Event, Task, Venue};

use super::helpers::yes_no;

/// The three tables the planner shows, one per tab.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Tab {
    Events,
    Venues,
    Tasks,
}

impl Tab {
    pub(crate) const ALL: [Tab; 3] = [Tab::Events, Tab::Venues, Tab::Tasks];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Events => "Events",
            Tab::Venues => "Venues",
            Tab::Tasks => "Tasks",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Events => 0,
            Tab::Venues => 1,
            Tab::Tasks => 2,
        }
    }

    pub(crate) fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    pub(crate) fn headings(self) -> &'static [&'static str] {
        match self {
            Tab::Events => &[
                "Event Name",
                "Event Date",
                "Event Time",
                "Venue ID",
                "Agenda",
                "Goals",
                "Collaborators",
            ],
            Tab::Venues => &["Name", "Capacity", "Facilities", "Pricing", "Availability"],
            Tab::Tasks => &["Task Name", "Deadline", "Responsibility", "Status"],
        }
    }

    pub(crate) fn empty_message(self) -> &'static str {
        match self {
            Tab::Events => "No existing events.",
            Tab::Venues => "No existing venues.",
            Tab::Tasks => "No existing tasks.",
        }
    }
}

/// Highlighted row within one table. Kept per tab so switching tabs does not
/// lose the position.
#[derive(Default, Clone, Copy, Debug)]
pub(crate) struct RowSelection {
    pub(crate) selected: usize,
}

impl RowSelection {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Pull the selection back inside the table after a reload.
    pub(crate) fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

pub(crate) fn event_cells(event: &Event) -> Vec<String> {
    vec![
        event.name.clone(),
        event.date.to_string(),
        event.time.clone(),
        event
            .venue_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        event.agenda.clone(),
        event.goals.clone(),
        event.collaborators.clone(),
    ]
}

pub(crate) fn venue_cells(venue: &Venue) -> Vec<String> {
    vec![
        venue.name.clone(),
        venue.capacity.to_string(),
        venue.facilities.clone(),
        venue.pricing.clone(),
        yes_no(venue.availability).to_string(),
    ]
}

pub(crate) fn task_cells(task: &Task) -> Vec<String> {
    vec![
        task.name.clone(),
        task.deadline.to_string(),
        task.responsibility.clone(),
        task.status().to_string(),
    ]
}
