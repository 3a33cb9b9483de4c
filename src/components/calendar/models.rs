use crate::error::{validation_error, CalendarResult};
use chrono::NaiveDateTime;
use std::fmt;

/// Kind of academic activity a schedule belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Lecture,
    Lab,
    Meeting,
    OfficeHours,
    Assignment,
    Defense,
    Workshop,
    StudyGroup,
    Seminar,
    Grading,
    Advising,
    /// Anything the service sends that is not in the known set
    Other(String),
}

impl Category {
    /// All known categories, in display order
    pub const KNOWN: [Category; 11] = [
        Category::Lecture,
        Category::Lab,
        Category::Meeting,
        Category::OfficeHours,
        Category::Assignment,
        Category::Defense,
        Category::Workshop,
        Category::StudyGroup,
        Category::Seminar,
        Category::Grading,
        Category::Advising,
    ];

    /// Parse a category name. Unknown names are kept as `Other`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str().eq_ignore_ascii_case(raw))
            .cloned()
            .unwrap_or_else(|| Category::Other(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Lecture => "Lecture",
            Category::Lab => "Lab",
            Category::Meeting => "Meeting",
            Category::OfficeHours => "Office Hours",
            Category::Assignment => "Assignment",
            Category::Defense => "Defense",
            Category::Workshop => "Workshop",
            Category::StudyGroup => "Study Group",
            Category::Seminar => "Seminar",
            Category::Grading => "Grading",
            Category::Advising => "Advising",
            Category::Other(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority level of a schedule (1 = low, 2 = medium, 3 = high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    /// Map a raw level to a priority; anything outside 1..=3 is `Low`
    pub fn from_level(level: i64) -> Self {
        match level {
            2 => Priority::Medium,
            3 => Priority::High,
            _ => Priority::Low,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl From<i64> for Priority {
    fn from(level: i64) -> Self {
        Priority::from_level(level)
    }
}

impl From<Option<i64>> for Priority {
    fn from(level: Option<i64>) -> Self {
        level.map(Priority::from_level).unwrap_or_default()
    }
}

/// A scheduled item as held by the event store.
///
/// Events are values: they are created once, replaced wholesale on reload and
/// never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub content: Option<String>,
    pub category: Category,
    pub priority: Priority,
    /// Completion in [0.0, 1.0]
    pub progress: f64,
    pub created_at: NaiveDateTime,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl Event {
    /// Build an event from a validated draft plus the client-assigned fields
    pub fn from_draft(id: String, created_at: NaiveDateTime, draft: EventDraft) -> CalendarResult<Self> {
        draft.validate()?;
        let (starts_at, ends_at) = match (draft.starts_at, draft.ends_at) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(validation_error("start and end times are required")),
        };

        Ok(Event {
            id,
            name: draft.name.trim().to_string(),
            content: draft.content.filter(|c| !c.trim().is_empty()),
            category: draft.category,
            priority: draft.priority,
            progress: draft.progress,
            created_at,
            starts_at,
            ends_at,
        })
    }
}

/// User-supplied fields for a new event, before id and creation time exist
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub content: Option<String>,
    pub category: Category,
    pub priority: Priority,
    pub progress: f64,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Check the draft before it is sent anywhere
    pub fn validate(&self) -> CalendarResult<()> {
        if self.name.trim().is_empty() {
            return Err(validation_error("name is required"));
        }
        let (start, end) = match (self.starts_at, self.ends_at) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => return Err(validation_error("start time is required")),
            (_, None) => return Err(validation_error("end time is required")),
        };
        if !self.progress.is_finite() || !(0.0..=1.0).contains(&self.progress) {
            return Err(validation_error(&format!(
                "status must be between 0.0 and 1.0, got {}",
                self.progress
            )));
        }
        if end < start {
            return Err(validation_error("end time is before start time"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::utils::time::parse_datetime;

    fn at(raw: &str) -> NaiveDateTime {
        parse_datetime(raw).unwrap()
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Lab"), Category::Lab);
        assert_eq!(Category::parse("office hours"), Category::OfficeHours);
        assert_eq!(Category::parse(" Study Group "), Category::StudyGroup);
        assert_eq!(Category::parse("Business"), Category::Other("Business".to_string()));
        assert_eq!(Category::parse("Business").as_str(), "Business");
        assert_eq!(Category::OfficeHours.to_string(), "Office Hours");
    }

    #[test]
    fn test_priority_levels() {
        assert_eq!(Priority::from_level(1), Priority::Low);
        assert_eq!(Priority::from_level(2), Priority::Medium);
        assert_eq!(Priority::from_level(3), Priority::High);
        assert_eq!(Priority::from_level(0), Priority::Low);
        assert_eq!(Priority::from_level(4), Priority::Low);
        assert_eq!(Priority::from(None), Priority::Low);
        assert_eq!(Priority::High.level(), 3);
    }

    #[test]
    fn test_draft_validation() {
        let ok = EventDraft::new("Lab session", at("2024-03-15 09:00"), at("2024-03-15 10:00"));
        assert!(ok.validate().is_ok());

        // Zero-length events are allowed
        let instant = EventDraft::new("Deadline", at("2024-03-15 09:00"), at("2024-03-15 09:00"));
        assert!(instant.validate().is_ok());

        let cases = [
            EventDraft { name: "  ".to_string(), ..ok.clone() },
            EventDraft { starts_at: None, ..ok.clone() },
            EventDraft { ends_at: None, ..ok.clone() },
            ok.clone().with_progress(1.5),
            ok.clone().with_progress(f64::NAN),
            EventDraft::new("Backwards", at("2024-03-15 10:00"), at("2024-03-15 09:00")),
        ];
        for draft in cases {
            assert!(matches!(draft.validate(), Err(Error::Validation(_))), "{:?}", draft);
        }
    }

    #[test]
    fn test_event_from_draft() {
        let draft = EventDraft::new(" Thesis defense ", at("2024-05-02 13:00"), at("2024-05-02 15:00"))
            .with_category(Category::Defense)
            .with_priority(Priority::High)
            .with_content("   ");
        let event = Event::from_draft("42".to_string(), at("2024-04-01 08:00"), draft).unwrap();

        assert_eq!(event.id, "42");
        assert_eq!(event.name, "Thesis defense");
        assert_eq!(event.content, None);
        assert_eq!(event.category, Category::Defense);
        assert_eq!(event.priority, Priority::High);
        assert_eq!(event.created_at, at("2024-04-01 08:00"));
    }
}
