// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subject and body rendering for notification mail.
//!
//! Every message carries a plain-text and an HTML body. User-supplied text
//! (names, titles, descriptions) is HTML-escaped in the HTML part.

use std::fmt::Write as _;

use taskquest_core::types::{Priority, Task, User};

/// A rendered message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub fn reminder(user: &User, task: &Task, frontend_url: &str) -> RenderedMail {
    let subject = format!("🔔 Reminder: {}", task.title);

    let mut text = format!(
        "Hi {},\n\nThis is a reminder for your task:\n\n  {}\n",
        user.name, task.title
    );
    if let Some(description) = &task.description {
        let _ = writeln!(text, "  {description}");
    }
    let _ = writeln!(text, "\nPriority: {}", task.priority);
    if let Some(due) = task.due_date {
        let _ = writeln!(text, "Due: {}", due.format("%Y-%m-%d"));
    }
    let _ = write!(text, "\nView your tasks: {frontend_url}\n");

    let mut html = format!(
        "<h1>🔔 Task Reminder</h1>\n<p>Hi {},</p>\n<p>This is a reminder for your task:</p>\n\
         <div style=\"border-left: 4px solid #f59e0b; padding: 12px;\">\n<h3>{}</h3>\n",
        escape(&user.name),
        escape(&task.title)
    );
    if let Some(description) = &task.description {
        let _ = writeln!(html, "<p>{}</p>", escape(description));
    }
    let _ = write!(
        html,
        "<span style=\"color: {};\">{} PRIORITY</span>",
        priority_color(task.priority),
        task.priority.to_string().to_uppercase()
    );
    if let Some(due) = task.due_date {
        let _ = write!(html, " <span>Due: {}</span>", due.format("%Y-%m-%d"));
    }
    let _ = write!(
        html,
        "\n</div>\n<p><a href=\"{}\">View Task</a></p>\n",
        escape(frontend_url)
    );

    RenderedMail {
        subject,
        text,
        html,
    }
}

pub fn overdue_digest(user: &User, tasks: &[Task], frontend_url: &str) -> RenderedMail {
    let subject = "⏰ You have overdue tasks - Task Manager".to_string();
    let plural = if tasks.len() == 1 { "" } else { "s" };

    let mut text = format!(
        "Hi {},\n\nYou have {} overdue task{plural} that need your attention:\n\n",
        user.name,
        tasks.len()
    );
    let mut html = format!(
        "<h2>⏰ Overdue Tasks Reminder</h2>\n<p>Hi {},</p>\n\
         <p>You have <strong>{}</strong> overdue task{plural} that need your attention:</p>\n<ul>\n",
        escape(&user.name),
        tasks.len()
    );

    for task in tasks {
        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(text, "  - {} (due {due})", task.title);
        let _ = write!(
            html,
            "<li><strong>{}</strong> <small>Due: {due}</small>",
            escape(&task.title)
        );
        if let Some(description) = &task.description {
            let _ = write!(html, "<br><em>{}</em>", escape(description));
        }
        html.push_str("</li>\n");
    }

    let _ = write!(
        text,
        "\nPlease log in to update these tasks: {frontend_url}\n"
    );
    let _ = write!(
        html,
        "</ul>\n<p>Please <a href=\"{}\">log in</a> to update these tasks.</p>\n",
        escape(frontend_url)
    );

    RenderedMail {
        subject,
        text,
        html,
    }
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "#dc2626",
        Priority::Medium => "#d97706",
        Priority::Low => "#2563eb",
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
