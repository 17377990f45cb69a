//! In-memory lookup source and builders shared by the enrichment tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;

use super::correlation::APPROVAL_RECORD_TYPE;
use super::source::EnrichmentSource;
use crate::dashboard::{DeploymentInstance, PipelineInstance};
use crate::providers::azure_devops::{
    Approval, ApprovalStatus, ApprovalStep, ApprovalUser, Build, DeploymentResult, Timeline,
    TimelineRecord,
};

#[derive(Default)]
pub struct FakeSource {
    builds: HashMap<u64, Build>,
    timelines: HashMap<u64, Timeline>,
    approvals: Vec<Approval>,
    delays: HashMap<u64, Duration>,
    pub build_calls: AtomicUsize,
    pub timeline_calls: AtomicUsize,
    pub approval_calls: AtomicUsize,
    /// Build ids in the order their build lookups completed
    pub completed: Mutex<Vec<u64>>,
}

impl FakeSource {
    pub fn with_build(mut self, id: u64, build_number: &str) -> Self {
        self.builds.insert(
            id,
            Build {
                id,
                build_number: build_number.to_string(),
            },
        );
        self
    }

    pub fn with_timeline(mut self, build_id: u64, records: Vec<TimelineRecord>) -> Self {
        self.timelines.insert(build_id, Timeline { records });
        self
    }

    pub fn with_approval(mut self, approval: Approval) -> Self {
        self.approvals.push(approval);
        self
    }

    pub fn with_delay(mut self, build_id: u64, delay: Duration) -> Self {
        self.delays.insert(build_id, delay);
        self
    }

    pub fn approval_calls(&self) -> usize {
        self.approval_calls.load(Ordering::SeqCst)
    }

    pub fn timeline_calls(&self) -> usize {
        self.timeline_calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }
}

impl EnrichmentSource for FakeSource {
    async fn resolve_build(&self, _project: &str, build_id: u64) -> Option<Build> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&build_id) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.lock().unwrap().push(build_id);
        self.builds.get(&build_id).cloned()
    }

    async fn resolve_timeline(&self, _project: &str, build_id: u64) -> Option<Timeline> {
        self.timeline_calls.fetch_add(1, Ordering::SeqCst);
        self.timelines.get(&build_id).cloned()
    }

    async fn resolve_approvals(&self, _project: &str) -> Vec<Approval> {
        self.approval_calls.fetch_add(1, Ordering::SeqCst);
        self.approvals.clone()
    }
}

pub fn record(id: &str, parent_id: Option<&str>, record_type: &str, name: &str) -> TimelineRecord {
    TimelineRecord {
        id: id.to_string(),
        parent_id: parent_id.map(ToString::to_string),
        record_type: record_type.to_string(),
        name: name.to_string(),
    }
}

/// Approval record -> checkpoint -> stage, the shape of a gated stage.
pub fn gated_timeline(
    approval_id: &str,
    checkpoint_id: &str,
    stage_id: &str,
    stage_name: &str,
) -> Vec<TimelineRecord> {
    vec![
        record(stage_id, None, "Stage", stage_name),
        record(checkpoint_id, Some(stage_id), "Checkpoint", "Checkpoint"),
        record(
            approval_id,
            Some(checkpoint_id),
            APPROVAL_RECORD_TYPE,
            "Checkpoint.Approval",
        ),
    ]
}

fn user(display_name: &str) -> ApprovalUser {
    ApprovalUser {
        display_name: Some(display_name.to_string()),
    }
}

/// An approved approval whose first step was acted on by `approver`.
pub fn approval(id: &str, approver: Option<&str>) -> Approval {
    Approval {
        id: id.to_string(),
        status: ApprovalStatus::Approved,
        steps: vec![ApprovalStep {
            actual_approver: approver.map(user),
            status: ApprovalStatus::Approved,
        }],
    }
}

pub fn instance(value: &str, build_id: Option<u64>, stage_name: &str) -> DeploymentInstance {
    DeploymentInstance {
        value: value.to_string(),
        build_id,
        uri: format!("https://dev.azure.com/org/proj/_build/results?buildId={}", build_id.unwrap_or(0)),
        result: DeploymentResult::Succeeded,
        finish_time: None,
        environment_id: 1,
        stage_name: stage_name.to_string(),
        folder: Some("\\".to_string()),
        owner_id: build_id,
    }
}

pub fn pipeline(key: &str, environments: Vec<(&str, DeploymentInstance)>) -> PipelineInstance {
    PipelineInstance {
        key: key.to_string(),
        name: format!("pipeline-{key}"),
        uri: format!("https://dev.azure.com/org/proj/_build?definitionId={key}"),
        environments: environments
            .into_iter()
            .map(|(name, instance)| (name.to_string(), instance))
            .collect::<IndexMap<_, _>>(),
    }
}
