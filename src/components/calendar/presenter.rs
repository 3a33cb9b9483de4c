//! Display attributes derived from raw event fields.
//!
//! Every function here is total: unknown or out-of-range input falls back to
//! a defined default instead of failing.

use super::models::{Category, Event, Priority};
use chrono::NaiveDateTime;

/// Glyph shown for categories outside the known set
pub const DEFAULT_ICON: &str = "📅";

/// Icon for a category
pub fn category_icon(category: &Category) -> &'static str {
    match category {
        Category::Lecture => "📚",
        Category::Lab => "🔬",
        Category::Meeting => "👥",
        Category::OfficeHours => "🕐",
        Category::Assignment => "📝",
        Category::Defense => "🎓",
        Category::Workshop => "🛠️",
        Category::StudyGroup => "👨‍🎓",
        Category::Seminar => "🎤",
        Category::Grading => "📊",
        Category::Advising => "💬",
        Category::Other(_) => DEFAULT_ICON,
    }
}

/// Progress band of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    NotStarted,
    InProgress,
    Completed,
}

impl StatusColor {
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::NotStarted => "#2196f3",
            StatusColor::InProgress => "#ff9800",
            StatusColor::Completed => "#4caf50",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            StatusColor::NotStarted => "Not Started",
            StatusColor::InProgress => "In Progress",
            StatusColor::Completed => "Completed",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            StatusColor::NotStarted => "🔄",
            StatusColor::InProgress => "⏳",
            StatusColor::Completed => "✅",
        }
    }
}

/// Band for a progress value. Lower bounds are inclusive; NaN counts as not started.
pub fn status_color(progress: f64) -> StatusColor {
    if progress >= 1.0 {
        StatusColor::Completed
    } else if progress >= 0.5 {
        StatusColor::InProgress
    } else {
        StatusColor::NotStarted
    }
}

/// Badge describing a priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityLabel {
    pub text: &'static str,
    pub color: &'static str,
    pub glyph: &'static str,
}

const PRIORITY_LABELS: [PriorityLabel; 3] = [
    PriorityLabel { text: "Low Priority", color: "#4caf50", glyph: "🟢" },
    PriorityLabel { text: "Medium Priority", color: "#ff9800", glyph: "🟡" },
    PriorityLabel { text: "High Priority", color: "#f44336", glyph: "🔴" },
];

/// Label for a priority. Raw levels outside 1..=3, and missing levels, map to the low entry.
pub fn priority_label(priority: impl Into<Priority>) -> PriorityLabel {
    PRIORITY_LABELS[usize::from(priority.into().level() - 1)]
}

/// Human readable length of a time range, e.g. `1h 30m`, `2h` or `45m`.
///
/// The difference is floored to whole minutes. A range ending before it
/// starts is rendered with a leading minus sign.
pub fn duration(starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> String {
    let millis = (ends_at - starts_at).num_milliseconds();
    let minutes = millis.div_euclid(60_000);
    if minutes < 0 {
        return format!("-{}", format_minutes(minutes.unsigned_abs()));
    }
    format_minutes(minutes.unsigned_abs())
}

fn format_minutes(total: u64) -> String {
    let hours = total / 60;
    let minutes = total % 60;
    match (hours, minutes) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// All display attributes of one event, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct EventView<'a> {
    pub event: &'a Event,
    pub icon: &'static str,
    pub status: StatusColor,
    pub priority: PriorityLabel,
    pub duration: String,
}

pub fn present(event: &Event) -> EventView<'_> {
    EventView {
        event,
        icon: category_icon(&event.category),
        status: status_color(event.progress),
        priority: priority_label(event.priority),
        duration: duration(event.starts_at, event.ends_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::parse_datetime;

    fn at(raw: &str) -> NaiveDateTime {
        parse_datetime(raw).unwrap()
    }

    #[test]
    fn test_category_icon() {
        assert_eq!(category_icon(&Category::Lab), "🔬");
        assert_eq!(category_icon(&Category::Defense), "🎓");
        assert_eq!(category_icon(&Category::parse("Office Hours")), "🕐");
        assert_eq!(category_icon(&Category::parse("Business")), DEFAULT_ICON);
        assert_eq!(category_icon(&Category::parse("")), DEFAULT_ICON);
    }

    #[test]
    fn test_status_color_bands() {
        assert_eq!(status_color(0.0), StatusColor::NotStarted);
        assert_eq!(status_color(0.499), StatusColor::NotStarted);
        assert_eq!(status_color(0.5), StatusColor::InProgress);
        assert_eq!(status_color(0.999), StatusColor::InProgress);
        assert_eq!(status_color(1.0), StatusColor::Completed);
        assert_eq!(status_color(f64::NAN), StatusColor::NotStarted);
        assert_eq!(StatusColor::Completed.hex(), "#4caf50");
    }

    #[test]
    fn test_priority_label_fallback() {
        let low = priority_label(1_i64);
        assert_eq!(low.text, "Low Priority");
        assert_eq!(priority_label(4_i64), low);
        assert_eq!(priority_label(0_i64), low);
        assert_eq!(priority_label(None::<i64>), low);
        assert_eq!(priority_label(2_i64).text, "Medium Priority");
        assert_eq!(priority_label(Priority::High).color, "#f44336");
    }

    #[test]
    fn test_duration() {
        assert_eq!(duration(at("2024-03-15 10:00"), at("2024-03-15 11:30")), "1h 30m");
        assert_eq!(duration(at("2024-03-15 10:00"), at("2024-03-15 10:45")), "45m");
        assert_eq!(duration(at("2024-03-15 10:00"), at("2024-03-15 12:00")), "2h");
        assert_eq!(duration(at("2024-03-15 10:00"), at("2024-03-15 10:00")), "0m");
        // Seconds are floored away
        assert_eq!(duration(at("2024-03-15 10:00:00"), at("2024-03-15 10:01:59")), "1m");
        assert_eq!(duration(at("2024-03-15 22:00"), at("2024-03-17 00:15")), "26h 15m");
    }

    #[test]
    fn test_negative_duration() {
        assert_eq!(duration(at("2024-03-15 11:30"), at("2024-03-15 10:00")), "-1h 30m");
        // Flooring moves a partial minute away from zero
        assert_eq!(duration(at("2024-03-15 10:00:30"), at("2024-03-15 10:00:00")), "-1m");
    }
}
