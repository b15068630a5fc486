use halo_core::{group_by_status, start_of_day, Records, TaskService};
use halo_domain::{assignee_name, Task, TaskPriority, TaskStatus, KNOWN_ASSIGNEES};

use crate::cli::commands::lookup;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{parse_date, parse_enum, require, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table};

/// Author recorded on tasks and comments created from the shell.
const SHELL_USER: &str = "admin";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("tasks", "Task board grouped by status", "tasks", cmd_tasks),
        CommandEntry::new(
            "task-add",
            "Create a task in the todo column",
            "task-add <title> <low|medium|high> <assignee> [due-date]",
            cmd_task_add,
        ),
        CommandEntry::new(
            "task-status",
            "Move a task to another column",
            "task-status <task> <todo|in-progress|completed>",
            cmd_task_status,
        ),
        CommandEntry::new(
            "task-comment",
            "Add a comment to a task",
            "task-comment <task> <text...>",
            cmd_task_comment,
        ),
        CommandEntry::new(
            "task-show",
            "Show a task with its comments",
            "task-show <task>",
            cmd_task_show,
        ),
    ]
}

fn task_title(task: &Task) -> &str {
    &task.title
}

fn assignee_label(user_id: &str) -> &str {
    assignee_name(user_id).unwrap_or(user_id)
}

/// Accepts a known user id or display name; anything else is kept verbatim.
fn resolve_assignee(input: &str) -> String {
    KNOWN_ASSIGNEES
        .iter()
        .find(|(id, name)| id.eq_ignore_ascii_case(input) || name.eq_ignore_ascii_case(input))
        .map_or_else(|| input.to_string(), |(id, _)| id.to_string())
}

fn cmd_tasks(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let tasks: Vec<Task> = Records::list(context.office.store())?;
    if tasks.is_empty() {
        output::info("No tasks yet.");
        return Ok(());
    }
    let offset = context.office.offset();
    for (status, column) in group_by_status(&tasks) {
        output::section(format!("{status} ({})", column.len()));
        if column.is_empty() {
            continue;
        }
        let mut table = Table::new()
            .column("Id", Alignment::Left)
            .column("Title", Alignment::Left)
            .column("Priority", Alignment::Left)
            .column("Assignee", Alignment::Left)
            .column("Due", Alignment::Left);
        for task in column {
            table.row(vec![
                short_id(&task.id).to_string(),
                task.title.clone(),
                task.priority.to_string(),
                assignee_label(&task.assignee).to_string(),
                task.due_date
                    .map(|due| due.with_timezone(&offset).date_naive().to_string())
                    .unwrap_or_default(),
            ]);
        }
        output::info(table.render());
    }
    Ok(())
}

fn cmd_task_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "task-add <title> <low|medium|high> <assignee> [due-date]";
    let title = require(args, 0, usage)?;
    let priority: TaskPriority = parse_enum(require(args, 1, usage)?)?;
    let assignee = resolve_assignee(require(args, 2, usage)?);
    let mut task = Task::new(title, priority, assignee, SHELL_USER);
    if let Some(raw) = args.get(3) {
        task = task.with_due_date(start_of_day(parse_date(raw)?, context.office.offset()));
    }
    let saved = TaskService::create(context.office.store(), task, context.office.now())?;
    output::success(format!(
        "Created task `{}` for {} ({}).",
        saved.title,
        assignee_label(&saved.assignee),
        short_id(&saved.id)
    ));
    Ok(())
}

fn cmd_task_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "task-status <task> <todo|in-progress|completed>";
    let task = lookup::<Task>(context, require(args, 0, usage)?, task_title)?;
    let status: TaskStatus = parse_enum(require(args, 1, usage)?)?;
    let updated = TaskService::set_status(context.office.store(), &task.id, status, context.office.now())?;
    output::success(format!("`{}` is now {}.", updated.title, updated.status));
    Ok(())
}

fn cmd_task_comment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "task-comment <task> <text...>";
    let task = lookup::<Task>(context, require(args, 0, usage)?, task_title)?;
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!("comment text is required\nusage: {usage}")));
    }
    let text = args[1..].join(" ");
    let updated = TaskService::comment(context.office.store(), &task.id, SHELL_USER, &text, context.office.now())?;
    output::success(format!(
        "Comment added to `{}` ({} total).",
        updated.title,
        updated.comments.len()
    ));
    Ok(())
}

fn cmd_task_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let task = lookup::<Task>(context, require(args, 0, "task-show <task>")?, task_title)?;
    let offset = context.office.offset();
    output::section(&task.title);
    output::info(format!(
        "Status: {}  Priority: {}  Assignee: {}",
        task.status,
        task.priority,
        assignee_label(&task.assignee)
    ));
    if let Some(due) = task.due_date {
        output::info(format!("Due: {}", due.with_timezone(&offset).date_naive()));
    }
    if let Some(description) = &task.description {
        output::info(description);
    }
    for comment in &task.comments {
        output::info(format!(
            "- {} ({}): {}",
            assignee_label(&comment.user_id),
            comment.created_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            comment.text
        ));
    }
    Ok(())
}
