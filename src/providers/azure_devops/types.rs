//! Wire types for the Azure DevOps REST resources the dashboard reads.
//!
//! Only the fields the dashboard consumes are modelled; everything else in the
//! payloads is ignored by serde. Optional payload members are `Option` so a
//! sparse response never fails to parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope used by list endpoints (`{"count": n, "value": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLinks {
    #[serde(default)]
    pub web: Option<Link>,
}

impl ReferenceLinks {
    pub fn web_href(links: Option<&ReferenceLinks>) -> String {
        links
            .and_then(|links| links.web.as_ref())
            .map(|link| link.href.clone())
            .unwrap_or_default()
    }
}

/// A build (pipeline run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    /// Display label, e.g. `20240612.3` or a custom run name
    pub build_number: String,
}

/// Execution timeline of a build: a flat list of records linked by `parent_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default)]
    pub records: Vec<TimelineRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Free-form classifier: `Stage`, `Phase`, `Job`, `Checkpoint`, `Checkpoint.Approval`, ...
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub name: String,
}

/// Approval state as reported by the pipelines approvals API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    All,
    Approved,
    Canceled,
    Completed,
    Failed,
    Pending,
    Rejected,
    Skipped,
    TimedOut,
    Uninitiated,
    #[default]
    #[serde(other)]
    Undefined,
}

impl ApprovalStatus {
    /// Value used for the `state` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Approved => "approved",
            Self::Canceled => "canceled",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
            Self::Skipped => "skipped",
            Self::TimedOut => "timedOut",
            Self::Undefined => "undefined",
            Self::Uninitiated => "uninitiated",
        }
    }
}

/// `$expand` options of the approvals API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalExpand {
    Steps,
}

impl ApprovalExpand {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalUser {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One approval step. Only the fields the approver lookup reads are decoded,
/// so an unusual record cannot fail the whole approvals list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStep {
    #[serde(default)]
    pub actual_approver: Option<ApprovalUser>,
    #[serde(default)]
    pub status: ApprovalStatus,
}

/// A manual approval. Its `id` equals the id of the `Checkpoint.Approval`
/// timeline record it gated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: ApprovalStatus,
    #[serde(default)]
    pub steps: Vec<ApprovalStep>,
}

impl Approval {
    /// Display name of whoever acted on the first step, if anyone has.
    pub fn first_step_approver(&self) -> Option<&str> {
        self.steps
            .first()
            .and_then(|step| step.actual_approver.as_ref())
            .and_then(|user| user.display_name.as_deref())
    }
}

/// A pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
    /// Backslash-delimited folder path, `\` for the root
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: Option<ReferenceLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: u64,
    pub name: String,
}

/// Outcome of a deployment job, mirrors the distributed task `TaskResult`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentResult {
    Succeeded,
    SucceededWithIssues,
    Failed,
    Canceled,
    Skipped,
    Abandoned,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Reference to the run (`owner`) or pipeline (`definition`) of a deployment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOrchestrationOwner {
    pub id: u64,
    pub name: String,
    #[serde(rename = "_links", default)]
    pub links: Option<ReferenceLinks>,
}

/// One execution of a deployment job against an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: u64,
    pub environment_id: u64,
    pub definition: TaskOrchestrationOwner,
    pub owner: TaskOrchestrationOwner,
    #[serde(default)]
    pub stage_name: String,
    #[serde(default)]
    pub result: DeploymentResult,
    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_record_parses_type_field() {
        let json = r#"{"records":[
            {"id":"a1","parentId":"c1","type":"Checkpoint.Approval","name":"Checkpoint.Approval","state":"completed"},
            {"id":"s1","parentId":null,"type":"Stage","name":"Dev"}
        ]}"#;

        let timeline: Timeline = serde_json::from_str(json).unwrap();

        assert_eq!(timeline.records.len(), 2);
        assert_eq!(timeline.records[0].record_type, "Checkpoint.Approval");
        assert_eq!(timeline.records[0].parent_id.as_deref(), Some("c1"));
        assert_eq!(timeline.records[1].parent_id, None);
    }

    #[test]
    fn test_approval_first_step_approver() {
        let json = r#"{
            "id": "a1",
            "status": "approved",
            "steps": [
                {"assignedApprover": {"displayName": "Team", "id": "t"},
                 "actualApprover": {"displayName": "Jane Doe", "id": "j", "uniqueName": "jane@example.com"},
                 "status": "approved", "order": 1},
                {"assignedApprover": {"displayName": "Bob"}, "status": "pending"}
            ]
        }"#;

        let approval: Approval = serde_json::from_str(json).unwrap();

        assert_eq!(approval.status, ApprovalStatus::Approved);
        assert_eq!(approval.first_step_approver(), Some("Jane Doe"));
    }

    #[test]
    fn test_approval_without_steps_has_no_approver() {
        let approval: Approval = serde_json::from_str(r#"{"id":"a1"}"#).unwrap();
        assert_eq!(approval.status, ApprovalStatus::Undefined);
        assert_eq!(approval.first_step_approver(), None);
    }

    #[test]
    fn test_unknown_statuses_fall_back() {
        let status: ApprovalStatus = serde_json::from_str(r#""somethingNew""#).unwrap();
        assert_eq!(status, ApprovalStatus::Undefined);

        let result: DeploymentResult = serde_json::from_str(r#""partiallySucceeded""#).unwrap();
        assert_eq!(result, DeploymentResult::Unknown);

        let result: DeploymentResult = serde_json::from_str(r#""succeededWithIssues""#).unwrap();
        assert_eq!(result, DeploymentResult::SucceededWithIssues);
    }

    #[test]
    fn test_deployment_record_parses_links() {
        let json = r#"{
            "id": 77,
            "environmentId": 3,
            "definition": {"id": 12, "name": "web-app", "_links": {"web": {"href": "https://dev.azure.com/org/p/_build/definition?definitionId=12"}}},
            "owner": {"id": 901, "name": "20240612.3", "_links": {"web": {"href": "https://dev.azure.com/org/p/_build/results?buildId=901"}}},
            "stageName": "Deploy_Dev",
            "result": "failed",
            "finishTime": "2024-06-12T10:15:00Z"
        }"#;

        let record: DeploymentRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.owner.id, 901);
        assert_eq!(record.result, DeploymentResult::Failed);
        assert_eq!(
            ReferenceLinks::web_href(record.owner.links.as_ref()),
            "https://dev.azure.com/org/p/_build/results?buildId=901"
        );
        assert!(record.finish_time.is_some());
    }

    #[test]
    fn test_uninitiated_status_is_not_swallowed_by_fallback() {
        let status: ApprovalStatus = serde_json::from_str(r#""uninitiated""#).unwrap();
        assert_eq!(status, ApprovalStatus::Uninitiated);

        let status: ApprovalStatus = serde_json::from_str(r#""timedOut""#).unwrap();
        assert_eq!(status, ApprovalStatus::TimedOut);
    }

    #[test]
    fn test_sparse_unrelated_approval_keeps_list_decodable() {
        // Arrange: the second approval lacks names, pipeline details and dates
        let json = r#"{"count": 2, "value": [
            {"id": "A", "status": "approved", "createdOn": "2024-06-12T10:15:00Z",
             "pipeline": {"id": "12", "name": "web-app", "owner": {"id": 901, "name": "20240612.3"}},
             "steps": [{"assignedApprover": {"displayName": "Team"}, "actualApprover": {"displayName": "Jane Doe"}, "status": "approved"}]},
            {"id": "B", "status": "approved", "createdOn": "not a date",
             "pipeline": {"owner": {}},
             "steps": [{"assignedApprover": {"id": "x"}, "actualApprover": {}, "status": "approved"}]}
        ]}"#;

        // Act
        let list: ListResponse<Approval> = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(list.value.len(), 2);
        assert_eq!(list.value[0].first_step_approver(), Some("Jane Doe"));
        assert_eq!(list.value[1].first_step_approver(), None);
    }

    #[test]
    fn test_approval_status_query_values() {
        assert_eq!(ApprovalStatus::Approved.as_str(), "approved");
        assert_eq!(ApprovalStatus::TimedOut.as_str(), "timedOut");
        assert_eq!(ApprovalExpand::Steps.as_str(), "steps");
    }
}
