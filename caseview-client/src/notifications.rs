use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Information,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Information => "information",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub subtitle: Option<String>,
}

struct Entry {
    notification: Notification,
    timer: JoinHandle<()>,
}

/// Live notifications, each dismissed automatically after `timeout`.
#[derive(Clone)]
pub struct NotificationCenter {
    entries: Arc<Mutex<Vec<Entry>>>,
    timeout: Duration,
}

impl NotificationCenter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            timeout,
        }
    }

    /// Post a notification. Must be called from within a tokio runtime.
    pub fn notify(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        subtitle: Option<String>,
    ) -> NotificationId {
        let id = Uuid::new_v4();
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            subtitle,
        };
        tracing::info!(%id, kind = kind.as_str(), title = %notification.title, "notification posted");

        let entries = Arc::clone(&self.entries);
        let timeout = self.timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.retain(|e| e.notification.id != id);
            tracing::debug!(%id, "notification expired");
        });

        self.lock().push(Entry {
            notification,
            timer,
        });
        id
    }

    /// Remove now and cancel the pending timer. Returns whether it was live.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut entries = self.lock();
        match entries.iter().position(|e| e.notification.id == id) {
            Some(index) => {
                let entry = entries.remove(index);
                entry.timer.abort();
                true
            }
            None => false,
        }
    }

    /// Live notifications in the order they were posted.
    pub fn active(&self) -> Vec<Notification> {
        self.lock().iter().map(|e| e.notification.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss() {
        let center = NotificationCenter::new(Duration::from_millis(4000));
        center.notify(NotificationKind::Success, "Saved", None);
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert_eq!(center.active().len(), 1);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_and_order() {
        let center = NotificationCenter::new(Duration::from_millis(4000));
        let first = center.notify(NotificationKind::Information, "First", None);
        let second = center.notify(NotificationKind::Warning, "Second", Some("detail".into()));
        let titles: Vec<_> = center.active().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        assert_eq!(center.active()[0].id, second);
    }
}
