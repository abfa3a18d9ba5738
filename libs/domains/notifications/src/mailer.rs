//! Status change email formatting.

use crate::models::Email;
use domain_tasks::StatusChangedEvent;

/// Builds the notification email for a task status change.
///
/// The wording is fixed. Operators change where the email goes through
/// `EMAIL_TO_ADDRESS`, not what it says.
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    to_address: String,
}

impl StatusNotifier {
    /// Create a notifier that addresses every email to `to_address`.
    pub fn new(to_address: impl Into<String>) -> Self {
        Self {
            to_address: to_address.into(),
        }
    }

    /// Read the recipient from `EMAIL_TO_ADDRESS`, defaulting to the local
    /// operator mailbox.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("EMAIL_TO_ADDRESS").unwrap_or_else(|_| "admin@localhost".to_string()),
        )
    }

    /// Render the email for one status change event.
    pub fn status_changed(&self, event: &StatusChangedEvent) -> Email {
        Email {
            to: self.to_address.clone(),
            subject: format!("Task {} status changed", event.task_id),
            body: format!(
                "Task with ID {} has new status: {}",
                event.task_id, event.status
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_tasks::TaskStatus;
    use uuid::Uuid;

    #[test]
    fn test_email_follows_fixed_template() {
        let notifier = StatusNotifier::new("ops@example.com");
        let event = StatusChangedEvent::new(Uuid::nil(), TaskStatus::Done);

        let email = notifier.status_changed(&event);

        assert_eq!(email.to, "ops@example.com");
        assert_eq!(
            email.subject,
            "Task 00000000-0000-0000-0000-000000000000 status changed"
        );
        assert_eq!(
            email.body,
            "Task with ID 00000000-0000-0000-0000-000000000000 has new status: DONE"
        );
    }

    #[test]
    fn test_status_renders_in_wire_format() {
        let notifier = StatusNotifier::new("ops@example.com");
        let task_id = Uuid::now_v7();

        let email = notifier.status_changed(&StatusChangedEvent::new(task_id, TaskStatus::InProgress));

        assert!(email.body.ends_with("has new status: IN_PROGRESS"));
        assert!(email.subject.contains(&task_id.to_string()));
    }

    #[test]
    fn test_from_env_recipient() {
        temp_env::with_var("EMAIL_TO_ADDRESS", Some("alerts@example.com"), || {
            let notifier = StatusNotifier::from_env();
            let email = notifier.status_changed(&StatusChangedEvent::new(
                Uuid::now_v7(),
                TaskStatus::New,
            ));
            assert_eq!(email.to, "alerts@example.com");
        });

        temp_env::with_var_unset("EMAIL_TO_ADDRESS", || {
            let notifier = StatusNotifier::from_env();
            let email = notifier
                .status_changed(&StatusChangedEvent::new(Uuid::now_v7(), TaskStatus::New));
            assert_eq!(email.to, "admin@localhost");
        });
    }
}
