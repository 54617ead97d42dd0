//! Confirmation seam for destructive actions.

/// Modal confirmation shown before an entity is removed.
///
/// Mirrors a dialog that can be accepted, declined, or closed without an
/// answer.
pub trait ConfirmDialog {
    /// Asks whether the entity labelled `label` should be removed.
    fn confirm_removal(&self, label: &str) -> Option<bool>;
}

impl<F> ConfirmDialog for F
where
    F: Fn(&str) -> Option<bool>,
{
    fn confirm_removal(&self, label: &str) -> Option<bool> {
        self(label)
    }
}

/// Result of a remove request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The dialog declined; nothing changed.
    Cancelled,
}

/// Only an explicit "no" cancels; a dismissed dialog proceeds.
pub(crate) fn removal_confirmed<D: ConfirmDialog + ?Sized>(dialog: &D, label: &str) -> bool {
    dialog.confirm_removal(label) != Some(false)
}

#[cfg(test)]
mod tests {
    use super::removal_confirmed;

    #[test]
    fn only_explicit_no_cancels() {
        assert!(removal_confirmed(&|_: &str| Some(true), "x"));
        assert!(removal_confirmed(&|_: &str| None, "x"));
        assert!(!removal_confirmed(&|_: &str| Some(false), "x"));
    }
}
