//! Backup candidate filter.

use crate::candidate::{metadata_of, Candidate, LABEL_BACKUP};
use crate::selector::{Filter, SelectContext};

/// Hides backup candidates while any primary one is left.
///
/// A candidate is a backup when its `backup` metadata is true.
#[derive(Debug, Clone, Default)]
pub struct BackupFilter;

impl BackupFilter {
    pub fn new() -> Self {
        Self
    }
}

/// Whether `candidate` is flagged as a backup.
pub fn is_backup<T: Candidate + ?Sized>(candidate: &T) -> bool {
    metadata_of(candidate).is_some_and(|md| md.get_bool(LABEL_BACKUP))
}

impl<T: Candidate + Clone> Filter<T> for BackupFilter {
    fn filter(&self, _ctx: &SelectContext, candidates: &[T]) -> Vec<T> {
        if candidates.len() <= 1 {
            return candidates.to_vec();
        }

        let (backups, primaries): (Vec<T>, Vec<T>) =
            candidates.iter().cloned().partition(|c| is_backup(c));

        if primaries.is_empty() {
            backups
        } else {
            primaries
        }
    }

    fn name(&self) -> &'static str {
        "backup"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{Metadata, Metadatable};

    #[derive(Debug, Clone, PartialEq)]
    struct Peer {
        name: &'static str,
        metadata: Metadata,
    }

    impl Metadatable for Peer {
        fn metadata(&self) -> Option<&Metadata> {
            Some(&self.metadata)
        }
    }

    impl Candidate for Peer {
        fn as_metadatable(&self) -> Option<&dyn Metadatable> {
            Some(self)
        }
    }

    fn primary(name: &'static str) -> Peer {
        Peer {
            name,
            metadata: Metadata::new(),
        }
    }

    fn backup(name: &'static str) -> Peer {
        Peer {
            name,
            metadata: Metadata::new().with(LABEL_BACKUP, true),
        }
    }

    fn names(list: &[Peer]) -> Vec<&'static str> {
        list.iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_primaries_hide_backups() {
        let out = BackupFilter::new().filter(
            &SelectContext::new(),
            &[backup("b1"), primary("p1"), backup("b2"), primary("p2")],
        );
        assert_eq!(names(&out), vec!["p1", "p2"]);
    }

    #[test]
    fn test_only_backups_pass_through() {
        let input = vec![backup("b1"), backup("b2")];
        let out = BackupFilter::new().filter(&SelectContext::new(), &input);
        assert_eq!(out, input);
    }

    #[test]
    fn test_explicit_false_is_primary() {
        let explicit = Peer {
            name: "explicit",
            metadata: Metadata::new().with(LABEL_BACKUP, false),
        };
        let out = BackupFilter::new().filter(&SelectContext::new(), &[explicit, backup("b")]);
        assert_eq!(names(&out), vec!["explicit"]);
    }

    #[test]
    fn test_idempotent() {
        let filter = BackupFilter::new();
        let ctx = SelectContext::new();
        let once = filter.filter(&ctx, &[primary("p"), backup("b"), primary("q")]);
        assert_eq!(filter.filter(&ctx, &once), once);
    }
}
