// Export components
pub mod calendar;
pub mod schedule_service;

// Re-export the controller and the service handle
pub use calendar::CalendarController;
pub use schedule_service::{ScheduleBackend, ScheduleServiceHandle};
