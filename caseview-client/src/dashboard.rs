//! Personal dashboard: metric tiles, my cases, message inbox, tasks in
//! progress and recent activity for the signed-in caseworker.

use caseview_fields::html::escape_html;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write;

use crate::fixtures::{case_text, Fixtures};
use crate::page::open_document;

/// Completion shown per assigned case until real progress is tracked.
/// Cycled by position in the assigned-case list.
pub const COMPLETION_PLACEHOLDERS: [u8; 11] = [0, 60, 85, 7, 15, 45, 70, 30, 95, 50, 0];

/// Cases and activity items shown before "Load more".
pub const CASES_PAGE: usize = 5;
pub const ACTIVITY_PAGE: usize = 5;
pub const MESSAGES_SHOWN: usize = 10;
const MESSAGE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Matches `userId` on activity entries.
    pub id: String,
    /// Matches `CaseLead` on cases and `from`/`to` on messages.
    pub name: String,
}

impl Default for CurrentUser {
    fn default() -> Self {
        Self {
            id: "jane-lee".to_string(),
            name: "Jane Lee".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub action: String,
    pub description: String,
    pub case_id: String,
    #[serde(default)]
    pub case_title: String,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn icon(&self) -> &'static str {
        match self.action.as_str() {
            "completed" => "checkmark",
            "sent" => "email",
            "opened" => "view",
            "edited" => "edit",
            _ => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub case_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InProgressTask {
    pub id: String,
    pub stage_id: String,
    pub case_id: String,
    #[serde(default)]
    pub case_title: String,
    pub title: String,
    #[serde(default)]
    pub started_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MessageFilter {
    #[default]
    All,
    Unread,
    Sent,
}

impl MessageFilter {
    fn empty_text(&self) -> &'static str {
        match self {
            MessageFilter::All => "No messages",
            MessageFilter::Unread => "No unread messages",
            MessageFilter::Sent => "No sent messages",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageCounts {
    pub all: usize,
    pub unread: usize,
    pub sent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MyCase {
    pub case_id: String,
    pub title: String,
    pub case_lead: String,
    pub status: String,
    pub completion: u8,
}

fn is_closed(case: &Value) -> bool {
    case_text(case, "Status") == "Closed"
}

/// Cases not yet closed.
pub fn active_cases_count(cases: &[Value]) -> usize {
    cases.iter().filter(|case| !is_closed(case)).count()
}

/// Open cases led by `user`, with placeholder completion, highest first.
/// Ties keep their original order.
pub fn my_cases(cases: &[Value], user: &CurrentUser) -> Vec<MyCase> {
    let mut mine: Vec<MyCase> = cases
        .iter()
        .filter(|case| !is_closed(case) && case_text(case, "CaseLead") == user.name)
        .enumerate()
        .map(|(index, case)| MyCase {
            case_id: case_text(case, "CaseID"),
            title: case_text(case, "Title"),
            case_lead: case_text(case, "CaseLead"),
            status: case_text(case, "Status"),
            completion: COMPLETION_PLACEHOLDERS[index % COMPLETION_PLACEHOLDERS.len()],
        })
        .collect();
    mine.sort_by(|a, b| b.completion.cmp(&a.completion));
    mine
}

/// The user's own activity, newest first.
pub fn user_activity<'a>(activity: &'a [Activity], user: &CurrentUser) -> Vec<&'a Activity> {
    let mut entries: Vec<_> = activity.iter().filter(|a| a.user_id == user.id).collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

fn is_unread_for(message: &Message, user: &CurrentUser) -> bool {
    message.to == user.name && !message.is_read
}

/// Messages for one inbox tab, newest first.
pub fn filter_messages<'a>(
    messages: &'a [Message],
    user: &CurrentUser,
    filter: MessageFilter,
) -> Vec<&'a Message> {
    let mut matching: Vec<_> = messages
        .iter()
        .filter(|m| match filter {
            MessageFilter::All => m.to == user.name || m.from == user.name,
            MessageFilter::Unread => is_unread_for(m, user),
            MessageFilter::Sent => m.from == user.name,
        })
        .collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matching
}

pub fn message_counts(messages: &[Message], user: &CurrentUser) -> MessageCounts {
    MessageCounts {
        all: messages
            .iter()
            .filter(|m| m.to == user.name || m.from == user.name)
            .count(),
        unread: messages.iter().filter(|m| is_unread_for(m, user)).count(),
        sent: messages.iter().filter(|m| m.from == user.name).count(),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Human offset of `timestamp` from `now`. A week or more shows the date.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    if elapsed.num_minutes() < 1 {
        "Just now".to_string()
    } else if elapsed.num_hours() < 1 {
        plural(elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 7 {
        plural(elapsed.num_days(), "day")
    } else {
        timestamp.format("%d/%m/%Y").to_string()
    }
}

/// Everything the dashboard shows, computed once from fixtures.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub user: CurrentUser,
    pub active_cases: usize,
    pub counts: MessageCounts,
    pub filter: MessageFilter,
    pub my_cases: Vec<MyCase>,
    pub messages: Vec<Message>,
    pub tasks: Vec<InProgressTask>,
    pub activity: Vec<Activity>,
}

impl Dashboard {
    pub fn build(fixtures: &Fixtures, user: &CurrentUser, filter: MessageFilter) -> Self {
        Self {
            user: user.clone(),
            active_cases: active_cases_count(&fixtures.cases),
            counts: message_counts(&fixtures.messages, user),
            filter,
            my_cases: my_cases(&fixtures.cases, user),
            messages: filter_messages(&fixtures.messages, user, filter)
                .into_iter()
                .cloned()
                .collect(),
            tasks: fixtures.in_progress_tasks.clone(),
            activity: user_activity(&fixtures.activity, user)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn to_html(&self, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut out, now);
        out
    }

    fn write_html(&self, out: &mut String, now: DateTime<Utc>) -> std::fmt::Result {
        open_document(out, "Dashboard")?;
        write!(out, "<header class=\"cv-case-header\"><h1>Dashboard</h1></header><main class=\"cv-dashboard\">")?;

        write!(out, "<div class=\"cv-metrics\">")?;
        metric_tile(out, "Active cases", self.active_cases, None)?;
        let unread_caption = if self.counts.unread == 1 {
            "New message"
        } else {
            "New messages"
        };
        metric_tile(out, "Unread messages", self.counts.unread, Some(unread_caption))?;
        metric_tile(out, "In progress tasks", self.tasks.len(), None)?;
        write!(out, "</div><div class=\"cv-dashboard-grid\">")?;

        self.write_my_cases(out)?;
        self.write_inbox(out, now)?;
        self.write_tasks(out, now)?;
        self.write_activity(out, now)?;

        write!(out, "</div></main></body></html>")
    }

    fn write_my_cases(&self, out: &mut String) -> std::fmt::Result {
        write!(out, "<section class=\"cv-panel\" id=\"my-cases\"><h3>My cases</h3>")?;
        if self.my_cases.is_empty() {
            write!(out, "<p class=\"cv-empty\">No active cases assigned</p><a href=\"/cases\">View all cases</a>")?;
        }
        for case in self.my_cases.iter().take(CASES_PAGE) {
            write!(
                out,
                "<a class=\"cv-card\" href=\"/case/{id}\"><strong>{id}</strong><span class=\"cv-completion\">{}%</span><div>{}</div></a>",
                case.completion,
                escape_html(&case.title),
                id = escape_html(&case.case_id)
            )?;
        }
        if self.my_cases.len() > CASES_PAGE {
            write!(
                out,
                "<button type=\"button\">Load more ({} remaining)</button>",
                self.my_cases.len() - CASES_PAGE
            )?;
        }
        write!(out, "</section>")
    }

    fn write_inbox(&self, out: &mut String, now: DateTime<Utc>) -> std::fmt::Result {
        write!(out, "<section class=\"cv-panel\" id=\"inbox\"><h3>Message inbox</h3>")?;
        write!(out, "<nav class=\"cv-switcher\">")?;
        for (filter, label, count) in [
            (MessageFilter::All, "All", self.counts.all),
            (MessageFilter::Unread, "Unread", self.counts.unread),
            (MessageFilter::Sent, "Sent", self.counts.sent),
        ] {
            let selected = if filter == self.filter { " aria-current=\"true\"" } else { "" };
            write!(out, "<span{}>{} ({})</span>", selected, label, count)?;
        }
        write!(out, "</nav>")?;

        if self.messages.is_empty() {
            write!(out, "<p class=\"cv-empty\">{}</p>", self.filter.empty_text())?;
        }
        for message in self.messages.iter().take(MESSAGES_SHOWN) {
            let party = match self.filter {
                MessageFilter::Sent => format!("To: {}", message.to),
                _ => format!("From: {}", message.from),
            };
            let preview: String = message.body.chars().take(MESSAGE_PREVIEW_CHARS).collect();
            write!(
                out,
                "<a class=\"cv-card\" href=\"/case/{}/messages?selected={}\"><strong>{}</strong><span>{}</span>",
                escape_html(&message.case_id),
                escape_html(&message.id),
                escape_html(&party),
                escape_html(&relative_time(message.timestamp, now))
            )?;
            write!(out, "<div class=\"cv-subject\">{}", escape_html(&message.subject))?;
            if self.filter != MessageFilter::Sent && is_unread_for(message, &self.user) {
                write!(out, "<span class=\"cv-tag cv-tag-blue\">Unread</span>")?;
            }
            write!(
                out,
                "</div><div class=\"cv-preview\">{}...</div><div>Case: {}</div></a>",
                escape_html(&preview),
                escape_html(&message.case_id)
            )?;
        }
        write!(out, "</section>")
    }

    fn write_tasks(&self, out: &mut String, now: DateTime<Utc>) -> std::fmt::Result {
        write!(out, "<section class=\"cv-panel\" id=\"tasks\"><h3>In progress tasks</h3>")?;
        if self.tasks.is_empty() {
            write!(out, "<p class=\"cv-empty\">No tasks in progress</p>")?;
        }
        for task in &self.tasks {
            write!(
                out,
                "<a class=\"cv-card\" href=\"/case/{}/tasks/{}/{}\"><strong>{}</strong><div>Case: {}</div><div>{}</div>",
                escape_html(&task.case_id),
                escape_html(&task.stage_id),
                escape_html(&task.id),
                escape_html(&task.title),
                escape_html(&task.case_id),
                escape_html(&task.case_title)
            )?;
            if let Some(started) = task.started_date {
                write!(out, "<div>Started {}</div>", escape_html(&relative_time(started, now)))?;
            }
            write!(out, "</a>")?;
        }
        write!(out, "</section>")
    }

    fn write_activity(&self, out: &mut String, now: DateTime<Utc>) -> std::fmt::Result {
        write!(out, "<section class=\"cv-panel\" id=\"activity\"><h3>Recent activity</h3>")?;
        if self.activity.is_empty() {
            write!(out, "<p class=\"cv-empty\">No recent activity</p>")?;
        }
        for entry in self.activity.iter().take(ACTIVITY_PAGE) {
            write!(
                out,
                "<details class=\"cv-card\"><summary><span class=\"cv-icon cv-icon-{}\" aria-hidden=\"true\"></span>{}<span>{} • {}</span></summary>",
                entry.icon(),
                escape_html(&entry.description),
                escape_html(&entry.user_name),
                escape_html(&relative_time(entry.timestamp, now))
            )?;
            write!(
                out,
                "<div><strong>Case:</strong> {}</div><div>{}</div><a href=\"/case/{}\">View case</a></details>",
                escape_html(&entry.case_id),
                escape_html(&entry.case_title),
                escape_html(&entry.case_id)
            )?;
        }
        if self.activity.len() > ACTIVITY_PAGE {
            write!(out, "<button type=\"button\">Load more</button>")?;
        }
        write!(out, "</section>")
    }
}

fn metric_tile(out: &mut String, label: &str, value: usize, caption: Option<&str>) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"cv-tile\"><div class=\"cv-metric-label\">{}</div><div class=\"cv-metric\">{}</div>",
        label, value
    )?;
    if let Some(caption) = caption {
        write!(out, "<div class=\"cv-metric-label\">{}</div>", caption)?;
    }
    write!(out, "</div>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap()
    }

    fn message(id: &str, from: &str, to: &str, read: bool, ts: DateTime<Utc>) -> Message {
        Message {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("Subject {}", id),
            body: "Body".to_string(),
            case_id: "CASE-1".to_string(),
            timestamp: ts,
            is_read: read,
        }
    }

    #[test]
    fn test_my_cases_cycle_placeholders_and_sort() {
        let user = CurrentUser::default();
        let cases: Vec<Value> = (0..13)
            .map(|i| json!({"CaseID": format!("C-{}", i), "CaseLead": "Jane Lee", "Status": "Open"}))
            .chain([
                json!({"CaseID": "C-closed", "CaseLead": "Jane Lee", "Status": "Closed"}),
                json!({"CaseID": "C-other", "CaseLead": "Sam Patel", "Status": "Open"}),
            ])
            .collect();
        let mine = my_cases(&cases, &user);
        assert_eq!(mine.len(), 13);
        let order: Vec<_> = mine.iter().map(|c| (c.case_id.as_str(), c.completion)).collect();
        assert_eq!(order[0], ("C-8", 95));
        assert_eq!(order[1], ("C-2", 85));
        // C-11 wraps back to 0 and C-12 to 60; ties keep list order.
        assert_eq!(order[3], ("C-1", 60));
        assert_eq!(order[4], ("C-12", 60));
        let zeros: Vec<_> = order.iter().filter(|(_, c)| *c == 0).map(|(id, _)| *id).collect();
        assert_eq!(zeros, vec!["C-0", "C-10", "C-11"]);
        assert_eq!(active_cases_count(&cases), 14);
    }

    #[test]
    fn test_message_tabs_and_counts() {
        let user = CurrentUser::default();
        let messages = vec![
            message("1", "Sam Patel", "Jane Lee", false, at(1, 9, 0)),
            message("2", "Jane Lee", "Sam Patel", true, at(3, 9, 0)),
            message("3", "Sam Patel", "Jane Lee", true, at(2, 9, 0)),
            message("4", "Sam Patel", "Ali Khan", false, at(4, 9, 0)),
        ];
        assert_eq!(
            message_counts(&messages, &user),
            MessageCounts {
                all: 3,
                unread: 1,
                sent: 1
            }
        );
        let ids = |filter| {
            filter_messages(&messages, &user, filter)
                .iter()
                .map(|m| m.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(MessageFilter::All), vec!["2", "3", "1"]);
        assert_eq!(ids(MessageFilter::Unread), vec!["1"]);
        assert_eq!(ids(MessageFilter::Sent), vec!["2"]);
    }

    #[test]
    fn test_relative_time() {
        let now = at(10, 12, 0);
        assert_eq!(relative_time(at(10, 11, 59), now), "1 minute ago");
        assert_eq!(relative_time(at(10, 11, 30), now), "30 minutes ago");
        assert_eq!(relative_time(at(10, 9, 0), now), "3 hours ago");
        assert_eq!(relative_time(at(9, 12, 0), now), "1 day ago");
        assert_eq!(relative_time(at(1, 12, 0), now), "01/06/2024");
        assert_eq!(relative_time(at(10, 12, 0), now), "Just now");
        assert_eq!(relative_time(at(11, 12, 0), now), "Just now");
    }

    #[test]
    fn test_activity_icons() {
        let mut entry = Activity {
            id: "a".into(),
            user_id: "jane-lee".into(),
            user_name: "Jane Lee".into(),
            action: "sent".into(),
            description: "Sent a letter".into(),
            case_id: "CASE-1".into(),
            case_title: String::new(),
            timestamp: at(1, 9, 0),
        };
        assert_eq!(entry.icon(), "email");
        entry.action = "archived".into();
        assert_eq!(entry.icon(), "document");
    }
}
