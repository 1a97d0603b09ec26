use crate::state::State;
use mergington_shared::{Activities, ActivityRecord};
use thiserror::Error;
use tokio::sync::watch;

/// Reasons for which the registry rejects a signup or an unregister.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Activity not found")]
    NotFound,
    #[error("Student is already signed up for this activity")]
    AlreadySignedUp,
    #[error("Student is not signed up for this activity")]
    NotSignedUp,
    #[error("Activity is full")]
    ActivityFull,
    #[error("A non-empty email is required")]
    InvalidEmail,
}

fn normalize_email(email: &str) -> Result<&str, RegistryError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(RegistryError::InvalidEmail);
    }
    Ok(email)
}

impl State {
    /// Returns a snapshot of all activities.
    pub fn list(&self) -> Activities {
        self.activities.borrow().clone()
    }

    /// Finds the activity with the given `name`.
    pub fn get(&self, name: &str) -> Option<ActivityRecord> {
        self.activities.borrow().get(name).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<Activities> {
        self.activities.subscribe()
    }

    /// Adds `email` to the participants of `activity`.
    ///
    /// Returns the confirmation message for the student.
    pub fn signup(&self, activity: &str, email: &str) -> Result<String, RegistryError> {
        let email = normalize_email(email)?;

        let mut res: Result<(), RegistryError> = Ok(());
        self.activities.send_if_modified(|activities| {
            res = (|| {
                let record = activities
                    .get_mut(activity)
                    .ok_or(RegistryError::NotFound)?;
                if record.has_participant(email) {
                    return Err(RegistryError::AlreadySignedUp);
                }
                if record.is_full() {
                    return Err(RegistryError::ActivityFull);
                }
                record.participants.push(email.to_owned());
                Ok(())
            })();
            res.is_ok()
        });
        res?;

        log::info!("{email} signed up for {activity:?}");
        Ok(format!("Signed up {email} for {activity}"))
    }

    /// Removes `email` from the participants of `activity`.
    ///
    /// Returns the confirmation message for the student.
    pub fn unregister(&self, activity: &str, email: &str) -> Result<String, RegistryError> {
        let email = normalize_email(email)?;

        let mut res: Result<(), RegistryError> = Ok(());
        self.activities.send_if_modified(|activities| {
            res = (|| {
                let record = activities
                    .get_mut(activity)
                    .ok_or(RegistryError::NotFound)?;
                let len_before = record.participants.len();
                record.participants.retain(|p| p != email);
                if record.participants.len() == len_before {
                    return Err(RegistryError::NotSignedUp);
                }
                Ok(())
            })();
            res.is_ok()
        });
        res?;

        log::info!("{email} unregistered from {activity:?}");
        Ok(format!("Unregistered {email} from {activity}"))
    }
}
