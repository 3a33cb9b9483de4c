use super::models::Event;

/// Which event, if any, is shown in the detail view
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    Closed,
    Open(Event),
}

/// Two-state machine over `Selection`
#[derive(Debug, Default)]
pub struct SelectionController {
    state: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the detail view for an event, replacing any current selection
    pub fn select(&mut self, event: &Event) {
        self.state = Selection::Open(event.clone());
    }

    pub fn dismiss(&mut self) {
        self.state = Selection::Closed;
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    /// The selected event, if the view is open
    pub fn current(&self) -> Option<&Event> {
        match &self.state {
            Selection::Open(event) => Some(event),
            Selection::Closed => None,
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.current().is_some_and(|e| e.id == id)
    }

    /// Close the view if the selected event is no longer in `events`,
    /// otherwise refresh it from the collection. Returns true if it closed.
    pub fn reconcile(&mut self, events: &[Event]) -> bool {
        let Selection::Open(selected) = &self.state else {
            return false;
        };
        match events.iter().find(|e| e.id == selected.id) {
            Some(current) => {
                self.state = Selection::Open(current.clone());
                false
            }
            None => {
                self.state = Selection::Closed;
                true
            }
        }
    }
}
