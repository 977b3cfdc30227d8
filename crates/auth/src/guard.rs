//! Ownership checks for creator-gated mutations.

use thiserror::Error;

/// Authorization failures for owner-restricted operations.
///
/// A missing record is reported distinctly from a forbidden one, and is
/// checked first so callers cannot probe for existence anonymously.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("record not found")]
    NotFound,
    #[error("caller is not the record's creator")]
    Forbidden,
}

/// Records that carry a creator identity.
///
/// `owner` returns `None` when the creator field is missing or not
/// well-formed; such records are always treated as forbidden, never as
/// ownerless-and-editable.
pub trait Owned {
    fn owner(&self) -> Option<&str>;
}

/// Require `identity` to be the creator of `record`.
///
/// `NotFound` when the record is absent, `Forbidden` when the creator
/// differs or cannot be established.
pub fn require_owner<T: Owned>(record: Option<&T>, identity: &str) -> Result<(), OwnershipError> {
    let record = record.ok_or(OwnershipError::NotFound)?;

    match record.owner() {
        Some(owner) if owner == identity => Ok(()),
        _ => Err(OwnershipError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        created_by: String,
    }

    impl Owned for Note {
        fn owner(&self) -> Option<&str> {
            let owner = self.created_by.trim();
            (!owner.is_empty()).then_some(owner)
        }
    }

    #[test]
    fn creator_may_mutate() {
        let note = Note {
            created_by: "user1".to_string(),
        };
        assert_eq!(require_owner(Some(&note), "user1"), Ok(()));
    }

    #[test]
    fn non_creator_is_forbidden() {
        let note = Note {
            created_by: "user1".to_string(),
        };
        assert_eq!(
            require_owner(Some(&note), "admin"),
            Err(OwnershipError::Forbidden)
        );
    }

    #[test]
    fn missing_record_is_not_found_before_ownership() {
        // Even with an identity that owns nothing, absence wins.
        assert_eq!(
            require_owner::<Note>(None, "admin"),
            Err(OwnershipError::NotFound)
        );
    }

    #[test]
    fn record_without_creator_is_forbidden_for_everyone() {
        let note = Note {
            created_by: "  ".to_string(),
        };
        assert_eq!(
            require_owner(Some(&note), "admin"),
            Err(OwnershipError::Forbidden)
        );
        assert_eq!(
            require_owner(Some(&note), ""),
            Err(OwnershipError::Forbidden)
        );
    }
}
