use crate::commands::{CommandContext, CommandResult, Reply};
use crate::components::calendar::models::{Category, Event, EventDraft};
use crate::components::calendar::presenter::{present, EventView};
use crate::components::calendar::{CalendarStats, DayBucket};
use crate::components::ScheduleBackend;
use crate::config::Config;
use crate::error::validation_error;
use crate::utils::time::month_name;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

const TIME_FORMAT: &str = "%H:%M";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the active month
pub fn show<B: ScheduleBackend>(ctx: &CommandContext<B>) -> CommandResult {
    let controller = &ctx.controller;
    let mut out = render_month(
        controller.config(),
        controller.month(),
        controller.year(),
        &controller.buckets(),
    );
    if let Some(event) = controller.selection().current() {
        out.push('\n');
        out.push_str(&render_detail(&present(event)));
    }
    Ok(Reply::Output(out))
}

pub async fn navigate<B: ScheduleBackend>(ctx: &mut CommandContext<B>, delta: i32) -> CommandResult {
    ctx.controller.navigate(delta).await?;
    show(ctx)
}

pub async fn goto<B: ScheduleBackend>(ctx: &mut CommandContext<B>, month: u32, year: i32) -> CommandResult {
    ctx.controller.goto(month, year).await?;
    show(ctx)
}

pub async fn reload<B: ScheduleBackend>(ctx: &mut CommandContext<B>) -> CommandResult {
    ctx.controller.reload().await?;
    show(ctx)
}

/// Open the detail view for an event
pub fn open<B: ScheduleBackend>(ctx: &mut CommandContext<B>, id: &str) -> CommandResult {
    let event = ctx.controller.select(id)?;
    Ok(Reply::Output(render_detail(&present(event))))
}

pub fn close<B: ScheduleBackend>(ctx: &mut CommandContext<B>) -> CommandResult {
    ctx.controller.dismiss();
    Ok(Reply::Output("Closed.".to_string()))
}

/// Open the creation form and describe its fields
pub fn form<B: ScheduleBackend>(ctx: &mut CommandContext<B>) -> CommandResult {
    ctx.controller.open_form()?;
    Ok(Reply::Output(render_form()))
}

pub async fn new_event<B: ScheduleBackend>(ctx: &mut CommandContext<B>, draft: EventDraft) -> CommandResult {
    let created = ctx.controller.submit_new_event(draft).await?;
    Ok(Reply::Output(format!(
        "Created schedule {}.\n{}",
        created.id,
        render_detail(&present(&created))
    )))
}

/// Delete the given event, or the open one
pub async fn delete<B: ScheduleBackend>(ctx: &mut CommandContext<B>, id: Option<String>) -> CommandResult {
    let id = match id {
        Some(id) => id,
        None => ctx
            .controller
            .selection()
            .current()
            .map(|event| event.id.clone())
            .ok_or_else(|| validation_error("no schedule is open, use delete <id>"))?,
    };
    ctx.controller.request_delete(&id).await?;
    Ok(Reply::Output(format!("Deleted schedule {}.", id)))
}

/// Show a schedule as the service currently has it
pub async fn remote<B: ScheduleBackend>(ctx: &CommandContext<B>, id: &str) -> CommandResult {
    let event = ctx.controller.remote(id).await?;
    Ok(Reply::Output(render_detail(&present(&event))))
}

pub fn upcoming<B: ScheduleBackend>(
    ctx: &CommandContext<B>,
    days: u32,
    category: Option<&Category>,
) -> CommandResult {
    let title = match category {
        Some(category) => format!("{} schedules in the next {} days", category, days),
        None => format!("Schedules in the next {} days", days),
    };
    Ok(Reply::Output(render_event_list(&title, &ctx.controller.upcoming(days, category))))
}

pub fn search<B: ScheduleBackend>(ctx: &CommandContext<B>, text: &str) -> CommandResult {
    let title = format!("Schedules matching '{}'", text.trim());
    Ok(Reply::Output(render_event_list(&title, &ctx.controller.search(text))))
}

pub fn on_date<B: ScheduleBackend>(ctx: &CommandContext<B>, date: NaiveDate) -> CommandResult {
    let title = format!("Schedules on {}", date.format("%A, %B %-d, %Y"));
    Ok(Reply::Output(render_event_list(&title, &ctx.controller.events_on(date))))
}

pub fn stats<B: ScheduleBackend>(ctx: &CommandContext<B>) -> CommandResult {
    Ok(Reply::Output(render_stats(&ctx.controller.statistics())))
}

/// Month grid as text: one line per day, followed by that day's events
pub fn render_month(config: &Config, month: u32, year: i32, buckets: &BTreeMap<u32, DayBucket<'_>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} | {}", config.app_name, config.university_name);
    let _ = writeln!(out, "{} {}", month_name(month), year);

    for (day, events) in buckets {
        let weekday = NaiveDate::from_ymd_opt(year, month + 1, *day)
            .map(|date| date.format("%a").to_string())
            .unwrap_or_default();
        if events.is_empty() {
            let _ = writeln!(out, "{:>2} {}  No schedule", day, weekday);
            continue;
        }
        let _ = writeln!(out, "{:>2} {}", day, weekday);
        for event in events {
            let view = present(event);
            let _ = writeln!(
                out,
                "       {} {}-{} {} {} [{}]",
                view.icon,
                event.starts_at.format(TIME_FORMAT),
                event.ends_at.format(TIME_FORMAT),
                event.name,
                view.status.glyph(),
                event.id
            );
        }
    }

    let _ = write!(out, "{}", config.system_branding);
    out
}

/// Detail view of one event
pub fn render_detail(view: &EventView<'_>) -> String {
    let event = view.event;
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", view.icon, event.name);
    let _ = writeln!(out, "  Category:    {}", event.category);
    let _ = writeln!(out, "  Priority:    {} {}", view.priority.glyph, view.priority.text);
    let _ = writeln!(
        out,
        "  Status:      {} {} ({:.0}%)",
        view.status.glyph(),
        view.status.text(),
        event.progress * 100.0
    );
    let _ = writeln!(out, "  Duration:    {}", view.duration);
    let _ = writeln!(out, "  Starts:      {}", event.starts_at.format(DATE_TIME_FORMAT));
    let _ = writeln!(out, "  Ends:        {}", event.ends_at.format(DATE_TIME_FORMAT));
    let _ = writeln!(
        out,
        "  Description: {}",
        event.content.as_deref().unwrap_or("No description")
    );
    let _ = write!(out, "  Id:          {}", event.id);
    out
}

/// Flat list of events, one line each
pub fn render_event_list(title: &str, events: &[&Event]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} ({})", title, events.len());
    if events.is_empty() {
        let _ = write!(out, "\n  No schedules found");
    }
    for event in events {
        let view = present(event);
        let _ = write!(
            out,
            "\n  {} {} {} ({}, {}) {} [{}]",
            view.icon,
            event.starts_at.format(DATE_TIME_FORMAT),
            event.name,
            event.category,
            view.duration,
            view.status.glyph(),
            event.id
        );
    }
    out
}

pub fn render_stats(stats: &CalendarStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total schedules: {}", stats.total);
    let _ = writeln!(out, "  Completed:     {}", stats.completed);
    let _ = writeln!(out, "  In progress:   {}", stats.in_progress);
    let _ = writeln!(out, "  Pending:       {}", stats.pending);
    let _ = writeln!(out, "  Completion:    {:.1}%", stats.completion_rate());
    let _ = write!(out, "  Activity:      {}", stats.activity_level().as_str());
    for (category, count) in &stats.by_category {
        let _ = write!(out, "\n  {:<14} {}", format!("{}:", category), count);
    }
    out
}

fn render_form() -> String {
    let categories: Vec<String> = Category::KNOWN.iter().map(|c| c.to_string()).collect();
    format!(
        "New schedule. Submit with:\n  new name=\"...\" start=\"YYYY-MM-DD HH:MM\" end=\"YYYY-MM-DD HH:MM\" \
         [category=...] [level=1-3] [status=0.0-1.0] [content=\"...\"]\n  Categories: {}",
        categories.join(", ")
    )
}
