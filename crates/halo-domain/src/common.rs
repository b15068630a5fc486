//! Shared traits and identifier helpers for back-office records.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Currency every monetary record is denominated in.
pub const DEFAULT_CURRENCY: &str = "PHP";

/// Exposes the string identifier a record is addressed by inside its collection.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// A record that lives in a named collection of the record store.
pub trait Record: Identifiable + Serialize + DeserializeOwned + Clone {
    /// Collection the record is persisted under.
    const COLLECTION: &'static str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Generates a fresh identifier with a short readable prefix, e.g. `txn-3f2a…`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::new_id;

    #[test]
    fn ids_carry_prefix_and_are_unique() {
        let a = new_id("task");
        let b = new_id("task");
        assert!(a.starts_with("task-"));
        assert_ne!(a, b);
    }
}
