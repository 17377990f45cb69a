use crate::providers::azure_devops::TimelineRecord;

pub const APPROVAL_RECORD_TYPE: &str = "Checkpoint.Approval";
pub const STAGE_RECORD_TYPE: &str = "Stage";

/// Outcome of walking a build timeline from its approval record up to the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointMatch<'a> {
    /// The timeline has no `Checkpoint.Approval` record at all.
    NoApprovalCheckpoint,
    /// The approval record's parent checkpoint is missing from the timeline.
    OrphanApproval { approval_record_id: &'a str },
    /// The checkpoint does not sit under a stage with the expected name.
    StageNotGated,
    /// The approval gated the expected stage.
    Gated { approval_record_id: &'a str },
}

/// Decides whether the build's approval checkpoint belongs to `stage_name`.
///
/// Walks exactly three records: the first `Checkpoint.Approval` record in
/// source order, its parent checkpoint, and the checkpoint's parent, which
/// must be a `Stage` named `stage_name`. The walk never goes further up, so
/// malformed (cyclic or disconnected) timelines cannot loop.
pub fn correlate_approval_checkpoint<'a>(
    records: &'a [TimelineRecord],
    stage_name: &str,
) -> CheckpointMatch<'a> {
    let Some(approval_record) = records
        .iter()
        .find(|record| record.record_type == APPROVAL_RECORD_TYPE)
    else {
        return CheckpointMatch::NoApprovalCheckpoint;
    };

    let checkpoint = approval_record
        .parent_id
        .as_deref()
        .and_then(|parent_id| find_by_id(records, parent_id));

    let Some(checkpoint) = checkpoint else {
        return CheckpointMatch::OrphanApproval {
            approval_record_id: &approval_record.id,
        };
    };

    let gated = checkpoint.parent_id.as_deref().is_some_and(|stage_id| {
        records.iter().any(|record| {
            record.id == stage_id
                && record.record_type == STAGE_RECORD_TYPE
                && record.name == stage_name
        })
    });

    if gated {
        CheckpointMatch::Gated {
            approval_record_id: &approval_record.id,
        }
    } else {
        CheckpointMatch::StageNotGated
    }
}

fn find_by_id<'a>(records: &'a [TimelineRecord], id: &str) -> Option<&'a TimelineRecord> {
    records.iter().find(|record| record.id == id)
}
