use crate::components::calendar::models::{Category, EventDraft, Priority};
use crate::components::{CalendarController, ScheduleBackend};
use crate::error::{validation_error, CalendarResult};
use crate::utils::time::parse_datetime;
use chrono::NaiveDate;

// Export submodules
pub mod calendar;
pub mod util;

/// Shared context for all commands
pub struct CommandContext<B> {
    pub controller: CalendarController<B>,
}

impl<B: ScheduleBackend> CommandContext<B> {
    pub fn new(controller: CalendarController<B>) -> Self {
        Self { controller }
    }
}

/// What the front end should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Type alias for command result
pub type CommandResult = CalendarResult<Reply>;

/// A parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Next(i32),
    Prev(i32),
    /// Zero-based month and year
    Goto(u32, i32),
    Reload,
    Open(String),
    Close,
    Form,
    New(EventDraft),
    /// Delete the given id, or the open event when `None`
    Delete(Option<String>),
    Remote(String),
    /// Events in the next `days` days, optionally of one category
    Upcoming { days: u32, category: Option<Category> },
    Search(String),
    On(NaiveDate),
    Stats,
    Ping,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    pub fn parse(line: &str) -> CalendarResult<Self> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Command::Show);
        };

        let command = match name.to_lowercase().as_str() {
            "show" | "ls" => Command::Show,
            "next" | "n" => Command::Next(parse_count(args)?),
            "prev" | "p" => Command::Prev(parse_count(args)?),
            "goto" => {
                let target = single_arg(args, "goto <YYYY-MM>")?;
                let (month, year) = parse_month(target)?;
                Command::Goto(month, year)
            }
            "reload" => Command::Reload,
            "open" => Command::Open(single_arg(args, "open <id>")?.to_string()),
            "close" => Command::Close,
            "form" => Command::Form,
            "new" => Command::New(parse_draft(args)?),
            "delete" | "rm" => Command::Delete(args.first().cloned()),
            "remote" => Command::Remote(single_arg(args, "remote <id>")?.to_string()),
            "upcoming" | "up" => parse_upcoming(args)?,
            "search" | "find" => {
                if args.is_empty() {
                    return Err(validation_error("usage: search <text>"));
                }
                Command::Search(args.join(" "))
            }
            "on" => {
                let raw = single_arg(args, "on <YYYY-MM-DD>")?;
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| validation_error(&format!("'{}' is not a YYYY-MM-DD date", raw)))?;
                Command::On(date)
            }
            "stats" => Command::Stats,
            "ping" => Command::Ping,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(validation_error(&format!("unknown command '{}', try 'help'", other))),
        };
        Ok(command)
    }
}

/// Run a command against the context
pub async fn dispatch<B: ScheduleBackend>(ctx: &mut CommandContext<B>, command: Command) -> CommandResult {
    match command {
        Command::Show => calendar::show(ctx),
        Command::Next(n) => calendar::navigate(ctx, n).await,
        Command::Prev(n) => {
            let delta = n
                .checked_neg()
                .ok_or_else(|| validation_error(&format!("cannot move back {} months", n)))?;
            calendar::navigate(ctx, delta).await
        }
        Command::Goto(month, year) => calendar::goto(ctx, month, year).await,
        Command::Reload => calendar::reload(ctx).await,
        Command::Open(id) => calendar::open(ctx, &id),
        Command::Close => calendar::close(ctx),
        Command::Form => calendar::form(ctx),
        Command::New(draft) => calendar::new_event(ctx, draft).await,
        Command::Delete(id) => calendar::delete(ctx, id).await,
        Command::Remote(id) => calendar::remote(ctx, &id).await,
        Command::Upcoming { days, category } => calendar::upcoming(ctx, days, category.as_ref()),
        Command::Search(text) => calendar::search(ctx, &text),
        Command::On(date) => calendar::on_date(ctx, date),
        Command::Stats => calendar::stats(ctx),
        Command::Ping => util::ping(ctx).await,
        Command::Help => util::help(ctx),
        Command::Quit => Ok(Reply::Quit),
    }
}

/// Split a line on whitespace, keeping double-quoted runs together
fn tokenize(line: &str) -> CalendarResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(validation_error("unterminated quote"));
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn single_arg<'a>(args: &'a [String], usage: &str) -> CalendarResult<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => Err(validation_error(&format!("usage: {}", usage))),
    }
}

fn parse_count(args: &[String]) -> CalendarResult<i32> {
    match args {
        [] => Ok(1),
        [n] => n
            .parse()
            .map_err(|_| validation_error(&format!("'{}' is not a number of months", n))),
        _ => Err(validation_error("expected at most one number")),
    }
}

/// `upcoming [days] [category=...]`, seven days by default
fn parse_upcoming(args: &[String]) -> CalendarResult<Command> {
    let mut days = None;
    let mut category = None;

    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            if !key.eq_ignore_ascii_case("category") {
                return Err(validation_error(&format!("unknown filter '{}'", key)));
            }
            category = Some(Category::parse(value));
        } else if days.is_none() {
            days = Some(
                arg.parse()
                    .map_err(|_| validation_error(&format!("'{}' is not a number of days", arg)))?,
            );
        } else {
            return Err(validation_error("usage: upcoming [days] [category=...]"));
        }
    }

    Ok(Command::Upcoming {
        days: days.unwrap_or(7),
        category,
    })
}

/// Parse `YYYY-MM` into a zero-based month and a year
fn parse_month(raw: &str) -> CalendarResult<(u32, i32)> {
    let invalid = || validation_error(&format!("'{}' is not a YYYY-MM month", raw));
    let (year, month) = raw.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((month - 1, year))
}

/// Build a draft from `key=value` arguments
pub fn parse_draft(args: &[String]) -> CalendarResult<EventDraft> {
    let mut draft = EventDraft::default();

    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| validation_error(&format!("expected key=value, got '{}'", arg)))?;
        match key.to_lowercase().as_str() {
            "name" => draft.name = value.to_string(),
            "content" => draft.content = Some(value.to_string()),
            "category" => draft.category = Category::parse(value),
            "level" => {
                let level: i64 = value
                    .parse()
                    .map_err(|_| validation_error(&format!("level must be 1, 2 or 3, got '{}'", value)))?;
                draft.priority = Priority::from_level(level);
            }
            "status" => {
                draft.progress = value
                    .parse()
                    .map_err(|_| validation_error(&format!("status must be a number, got '{}'", value)))?;
            }
            "start" => draft.starts_at = Some(parse_time_arg(value)?),
            "end" => draft.ends_at = Some(parse_time_arg(value)?),
            other => return Err(validation_error(&format!("unknown field '{}'", other))),
        }
    }

    Ok(draft)
}

fn parse_time_arg(value: &str) -> CalendarResult<chrono::NaiveDateTime> {
    parse_datetime(value).ok_or_else(|| validation_error(&format!("'{}' is not a date and time", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_tokenize_keeps_quoted_runs() {
        let tokens = tokenize(r#"new name="Lab session" start="2024-03-15 09:00""#).unwrap();
        assert_eq!(tokens, vec!["new", "name=Lab session", "start=2024-03-15 09:00"]);

        assert_eq!(tokenize(r#"open """#).unwrap(), vec!["open", ""]);
        assert!(tokenize(r#"new name="oops"#).is_err());
    }

    #[test]
    fn test_parse_navigation() {
        assert_eq!(Command::parse("").unwrap(), Command::Show);
        assert_eq!(Command::parse("next").unwrap(), Command::Next(1));
        assert_eq!(Command::parse("prev 3").unwrap(), Command::Prev(3));
        assert_eq!(Command::parse("goto 2024-03").unwrap(), Command::Goto(2, 2024));
        assert!(Command::parse("goto 2024-13").is_err());
        assert!(Command::parse("goto march").is_err());
        assert!(Command::parse("next many").is_err());
    }

    #[test]
    fn test_parse_selection_commands() {
        assert_eq!(Command::parse("open 42").unwrap(), Command::Open("42".to_string()));
        assert_eq!(Command::parse("delete").unwrap(), Command::Delete(None));
        assert_eq!(
            Command::parse("delete 42").unwrap(),
            Command::Delete(Some("42".to_string()))
        );
        assert_eq!(Command::parse("QUIT").unwrap(), Command::Quit);
        assert!(Command::parse("open").is_err());
        assert!(matches!(Command::parse("dance"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(
            Command::parse("upcoming").unwrap(),
            Command::Upcoming { days: 7, category: None }
        );
        assert_eq!(
            Command::parse("upcoming 30 category=Lab").unwrap(),
            Command::Upcoming {
                days: 30,
                category: Some(Category::Lab)
            }
        );
        assert_eq!(
            Command::parse(r#"up category="Office Hours""#).unwrap(),
            Command::Upcoming {
                days: 7,
                category: Some(Category::OfficeHours)
            }
        );
        assert!(Command::parse("upcoming -1").is_err());
        assert!(Command::parse("upcoming 3 4").is_err());
        assert!(Command::parse("upcoming room=101").is_err());

        assert_eq!(
            Command::parse("search thesis  defense").unwrap(),
            Command::Search("thesis defense".to_string())
        );
        assert!(Command::parse("search").is_err());

        assert_eq!(
            Command::parse("on 2024-03-15").unwrap(),
            Command::On(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        );
        assert!(Command::parse("on 2024-02-30").is_err());
        assert_eq!(Command::parse("stats").unwrap(), Command::Stats);
    }

    #[test]
    fn test_parse_new_event() {
        let command = Command::parse(
            r#"new name="Lab session" category=Lab level=3 status=0.5 start="2024-03-15 09:00" end="2024-03-15 10:00" content="Bring goggles""#,
        )
        .unwrap();

        let Command::New(draft) = command else {
            panic!("expected a new event command");
        };
        assert_eq!(draft.name, "Lab session");
        assert_eq!(draft.category, Category::Lab);
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.progress, 0.5);
        assert_eq!(draft.content.as_deref(), Some("Bring goggles"));
        assert_eq!(draft.starts_at, parse_datetime("2024-03-15 09:00"));
        assert_eq!(draft.ends_at, parse_datetime("2024-03-15 10:00"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_parse_new_event_rejects_bad_fields() {
        assert!(Command::parse("new name").is_err());
        assert!(Command::parse("new colour=red").is_err());
        assert!(Command::parse("new level=high").is_err());
        assert!(Command::parse("new start=yesterday").is_err());

        // Missing fields are caught later by draft validation
        let Command::New(draft) = Command::parse("new name=Orphan").unwrap() else {
            panic!("expected a new event command");
        };
        assert!(draft.validate().is_err());
    }
}
