//! Task board operations: status moves, comments, attachments.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use halo_domain::{Task, TaskComment, TaskPriority, TaskStatus};
use rust_decimal::Decimal;

use crate::{
    storage::{RecordStore, Records},
    CoreError,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub related_cost: Option<Decimal>,
}

impl TaskPatch {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = assignee.clone();
        }
        if let Some(due) = self.due_date {
            task.due_date = Some(due);
        }
        if let Some(cost) = self.related_cost {
            task.related_cost = Some(cost);
        }
    }
}

fn comment_text(text: &str) -> Result<&str, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::Validation("comment text must not be empty".into()));
    }
    Ok(text)
}

pub fn add_comment(task: &mut Task, user_id: &str, text: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
    let text = comment_text(text)?;
    task.comments.push(TaskComment {
        user_id: user_id.to_string(),
        text: text.to_string(),
        created_at: now,
    });
    task.updated_at = now;
    Ok(())
}

/// Replaces the text of the comment at `index` and stamps it with `now`.
pub fn edit_comment(task: &mut Task, index: usize, text: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
    let text = comment_text(text)?;
    let comment = task
        .comments
        .get_mut(index)
        .ok_or_else(|| CoreError::not_found("task comments", index.to_string()))?;
    comment.text = text.to_string();
    comment.created_at = now;
    task.updated_at = now;
    Ok(())
}

pub fn delete_comment(task: &mut Task, index: usize, now: DateTime<Utc>) -> Result<TaskComment, CoreError> {
    if index >= task.comments.len() {
        return Err(CoreError::not_found("task comments", index.to_string()));
    }
    task.updated_at = now;
    Ok(task.comments.remove(index))
}

pub fn add_attachment(task: &mut Task, name: &str, now: DateTime<Utc>) {
    task.attachments.push(name.to_string());
    task.updated_at = now;
}

/// Drops every attachment equal to `name`; returns whether any matched.
pub fn remove_attachment(task: &mut Task, name: &str, now: DateTime<Utc>) -> bool {
    let before = task.attachments.len();
    task.attachments.retain(|attachment| attachment != name);
    let removed = task.attachments.len() != before;
    if removed {
        task.updated_at = now;
    }
    removed
}

/// Open tasks whose due date falls on `date` in local time.
pub fn tasks_due_on<'a>(tasks: &'a [Task], date: NaiveDate, offset: FixedOffset) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| !task.is_completed())
        .filter(|task| {
            task.due_date
                .map_or(false, |due| due.with_timezone(&offset).date_naive() == date)
        })
        .collect()
}

/// Board columns in workflow order.
pub fn group_by_status(tasks: &[Task]) -> Vec<(TaskStatus, Vec<&Task>)> {
    TaskStatus::ALL
        .iter()
        .map(|status| {
            let column = tasks.iter().filter(|task| task.status == *status).collect();
            (*status, column)
        })
        .collect()
}

pub struct TaskService;

impl TaskService {
    /// Stores `task` as a fresh `Todo` regardless of the status it arrived with.
    pub fn create(store: &dyn RecordStore, mut task: Task, now: DateTime<Utc>) -> Result<Task, CoreError> {
        if task.title.trim().is_empty() {
            return Err(CoreError::Validation("task title must not be empty".into()));
        }
        task.status = TaskStatus::Todo;
        task.created_at = now;
        task.updated_at = now;
        let saved = Records::add(store, task)?;
        tracing::info!(task = %saved.id, assignee = %saved.assignee, "task created");
        Ok(saved)
    }

    pub fn update(store: &dyn RecordStore, task_id: &str, patch: &TaskPatch, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| {
            patch.apply(task);
            task.updated_at = now;
            Ok(())
        })
    }

    pub fn set_status(store: &dyn RecordStore, task_id: &str, status: TaskStatus, now: DateTime<Utc>) -> Result<Task, CoreError> {
        let patch = TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        };
        Self::update(store, task_id, &patch, now)
    }

    pub fn comment(store: &dyn RecordStore, task_id: &str, user_id: &str, text: &str, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| add_comment(task, user_id, text, now))
    }

    pub fn edit_comment(store: &dyn RecordStore, task_id: &str, index: usize, text: &str, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| edit_comment(task, index, text, now))
    }

    pub fn delete_comment(store: &dyn RecordStore, task_id: &str, index: usize, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| delete_comment(task, index, now).map(|_| ()))
    }

    pub fn attach(store: &dyn RecordStore, task_id: &str, name: &str, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| {
            add_attachment(task, name, now);
            Ok(())
        })
    }

    pub fn detach(store: &dyn RecordStore, task_id: &str, name: &str, now: DateTime<Utc>) -> Result<Task, CoreError> {
        Records::update(store, task_id, |task: &mut Task| {
            remove_attachment(task, name, now);
            Ok(())
        })
    }

    pub fn delete(store: &dyn RecordStore, task_id: &str) -> Result<Task, CoreError> {
        Records::delete(store, task_id)
    }
}
