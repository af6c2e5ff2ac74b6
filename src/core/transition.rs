//! Status transition policy
//!
//! Maps an export result onto the stored lifecycle status. Only items that
//! are actually waiting for a result move; everything else is returned
//! unchanged, so replaying a stale or duplicate message never regresses a
//! status.

use crate::domain::{ExportRecord, LifecycleStatus, ResultStatus};

/// Computes the status an item should move to after `record` arrives.
///
/// | result     | current         | new              |
/// |------------|-----------------|------------------|
/// | Successful | SentForCreation | ExportSuccessful |
/// | Successful | SentForUpdate   | ExportSuccessful |
/// | Error      | SentForCreation | FailedToCreate   |
/// | Error      | SentForUpdate   | FailedToUpdate   |
///
/// Any other combination returns `current`.
///
/// # Examples
///
/// ```
/// use trade_importer::core::transition::next_status;
/// use trade_importer::domain::{ExportRecord, ItemId, LifecycleStatus};
///
/// let record = ExportRecord::new(ItemId::new("9780023381737").unwrap(), "Successful", None);
/// assert_eq!(
///     next_status(&record, LifecycleStatus::SentForUpdate),
///     LifecycleStatus::ExportSuccessful
/// );
/// ```
pub fn next_status(record: &ExportRecord, current: LifecycleStatus) -> LifecycleStatus {
    transition(&record.result_status, current)
}

/// Same policy keyed on the result alone.
pub fn transition(result: &ResultStatus, current: LifecycleStatus) -> LifecycleStatus {
    use LifecycleStatus::*;

    match (result, current) {
        (ResultStatus::Successful, SentForCreation | SentForUpdate) => ExportSuccessful,
        (ResultStatus::Error, SentForCreation) => FailedToCreate,
        (ResultStatus::Error, SentForUpdate) => FailedToUpdate,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use test_case::test_case;

    fn record(status: &str) -> ExportRecord {
        ExportRecord::new(ItemId::new("9780023381737").unwrap(), status, None)
    }

    #[test_case("Successful", LifecycleStatus::SentForUpdate => LifecycleStatus::ExportSuccessful; "successful update")]
    #[test_case("Successful", LifecycleStatus::SentForCreation => LifecycleStatus::ExportSuccessful; "successful creation")]
    #[test_case("Successful", LifecycleStatus::NewItem => LifecycleStatus::NewItem; "successful new item unchanged")]
    #[test_case("Error", LifecycleStatus::SentForUpdate => LifecycleStatus::FailedToUpdate; "failed update")]
    #[test_case("Error", LifecycleStatus::SentForCreation => LifecycleStatus::FailedToCreate; "failed creation")]
    #[test_case("Error", LifecycleStatus::NewItem => LifecycleStatus::NewItem; "error new item unchanged")]
    #[test_case("Invalid", LifecycleStatus::SentForCreation => LifecycleStatus::SentForCreation; "unrecognized result unchanged")]
    #[test_case("Error", LifecycleStatus::ExportSuccessful => LifecycleStatus::ExportSuccessful; "late error does not regress")]
    fn test_transition_table(status: &str, current: LifecycleStatus) -> LifecycleStatus {
        next_status(&record(status), current)
    }

    #[test]
    fn test_idle_states_never_move() {
        for current in LifecycleStatus::ALL
            .into_iter()
            .filter(|s| !s.is_awaiting_result())
        {
            for status in ["Successful", "Error", "Invalid", ""] {
                assert_eq!(
                    next_status(&record(status), current),
                    current,
                    "{status} moved {current}"
                );
            }
        }
    }

    #[test]
    fn test_unrecognized_results_never_move() {
        for current in LifecycleStatus::ALL {
            for status in ["successful", "ERROR", "Pending", " Successful"] {
                assert_eq!(next_status(&record(status), current), current);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        for current in LifecycleStatus::ALL {
            for status in ["Successful", "Error", "Invalid"] {
                let first = next_status(&record(status), current);
                let second = next_status(&record(status), current);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_reapplying_result_is_stable() {
        for current in LifecycleStatus::ALL {
            for status in ["Successful", "Error"] {
                let once = next_status(&record(status), current);
                let twice = next_status(&record(status), once);
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_error_message_does_not_affect_transition() {
        let mut with_message = record("Error");
        with_message.error_message = Some("Style already exists".to_string());
        assert_eq!(
            next_status(&with_message, LifecycleStatus::SentForCreation),
            LifecycleStatus::FailedToCreate
        );
    }
}
