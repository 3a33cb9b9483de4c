use crate::commands::{CommandContext, CommandResult, Reply};
use crate::components::ScheduleBackend;
use crate::config::Config;

/// Check that the schedule service is responsive
pub async fn ping<B: ScheduleBackend>(ctx: &CommandContext<B>) -> CommandResult {
    let app_name = ctx.controller.ping().await?;
    Ok(Reply::Output(format!("Pong from {}", app_name)))
}

pub fn help<B: ScheduleBackend>(ctx: &CommandContext<B>) -> CommandResult {
    Ok(Reply::Output(help_text(ctx.controller.config())))
}

/// Command list; create and delete only appear when enabled
pub fn help_text(config: &Config) -> String {
    let mut lines = vec![
        format!("{} v{}", config.app_name, config.app_version),
        "  show                 show the current month".to_string(),
        "  next [n] / prev [n]  move forward or back n months".to_string(),
        "  goto YYYY-MM         jump to a month".to_string(),
        "  reload               fetch schedules again".to_string(),
        "  open <id>            show a schedule's details".to_string(),
        "  close                close the details".to_string(),
    ];
    if config.enable_create {
        lines.push("  form                 describe the new schedule fields".to_string());
        lines.push("  new key=value ...    create a schedule".to_string());
    }
    if config.enable_delete {
        lines.push("  delete [id]          delete a schedule, or the open one".to_string());
    }
    lines.push("  remote <id>          show a schedule as the service has it".to_string());
    lines.push("  upcoming [days] [category=...]".to_string());
    lines.push("                       schedules in the next days, 7 by default".to_string());
    lines.push("  search <text>        find schedules by name or description".to_string());
    lines.push("  on YYYY-MM-DD        schedules on one day".to_string());
    lines.push("  stats                completion and category totals".to_string());
    lines.push("  ping                 check the schedule service".to_string());
    lines.push("  quit                 exit".to_string());
    lines.join("\n")
}
