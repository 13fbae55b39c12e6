//! Non-interactive commands: `--whoami` and `--logout`.

use std::time::Duration;

use anyhow::Result;

use careercompass_core::{SessionManager, SlotStore};

/// The restored identity as JSON, or a note that nobody is signed in.
pub fn whoami<S: SlotStore + 'static>(store: S) -> Result<String> {
    let session = SessionManager::restore(store, Duration::ZERO);
    match session.identity() {
        Some(identity) => Ok(identity.to_json()?),
        None => Ok("Not signed in".to_string()),
    }
}

/// Clear the user slot, whatever it holds.
pub fn logout<S: SlotStore + 'static>(store: S) -> String {
    let session = SessionManager::restore(store, Duration::ZERO);
    let effects = session.logout();
    match effects.notification {
        Some(notification) => format!("{}: {}", notification.title, notification.description),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use careercompass_core::{FileSlotStore, Identity, UserKind, USER_SLOT};

    fn file_store(dir: &tempfile::TempDir) -> FileSlotStore {
        FileSlotStore::new(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_whoami_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(whoami(file_store(&dir)).unwrap(), "Not signed in");
    }

    #[test]
    fn test_whoami_prints_identity() {
        let dir = tempfile::tempdir().unwrap();
        let identity = Identity::new("Bob", "bob@uni.edu", UserKind::Student);
        file_store(&dir)
            .write(USER_SLOT, &identity.to_json().unwrap())
            .unwrap();

        let printed = whoami(file_store(&dir)).unwrap();
        assert_eq!(Identity::from_json(&printed).unwrap(), identity);
    }

    #[test]
    fn test_logout_removes_signed_in_slot() {
        let dir = tempfile::tempdir().unwrap();
        let identity = Identity::new("Bob", "bob@uni.edu", UserKind::Institution);
        file_store(&dir)
            .write(USER_SLOT, &identity.to_json().unwrap())
            .unwrap();

        let message = logout(file_store(&dir));

        assert_eq!(message, "Logged out: You have been signed out successfully.");
        assert!(file_store(&dir).read(USER_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_logout_removes_malformed_slot() {
        let dir = tempfile::tempdir().unwrap();
        file_store(&dir).write(USER_SLOT, "{bad").unwrap();
        assert_eq!(whoami(file_store(&dir)).unwrap(), "Not signed in");

        logout(file_store(&dir));

        assert!(file_store(&dir).read(USER_SLOT).unwrap().is_none());
        assert!(!dir.path().join("user.json").exists());
    }
}
