//! Backend access for risk/issue records.
//!
//! The panel never talks HTTP directly. It depends on the [`RiskIssueApi`]
//! trait, which has one production implementation ([`HttpApi`]) and a
//! [`MockApi`] for tests.
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | List | GET | `/api/projects/{projectId}/risks-issues` |
//! | Create | POST | `/api/projects/{projectId}/risks-issues` |
//! | Update | PUT | `/api/risks-issues/{issueId}` |
//!
//! # Test Utilities
//!
//! [`MockApi`] is available in unit tests and, for downstream crates, behind
//! the `test-util` feature:
//!
//! ```toml
//! [dev-dependencies]
//! riskpanel = { version = "...", features = ["test-util"] }
//! ```

pub mod credentials;
pub mod http;

pub use credentials::{CredentialProvider, EnvToken, StaticToken, TokenFile};
pub use http::{HttpApi, Timeouts};

use crate::domain::{Draft, ProjectId, RecordId, RiskIssue};
use crate::error::Result;
use async_trait::async_trait;

/// Path segments of the per-project collection endpoint
#[must_use]
pub fn project_collection_path(project: &ProjectId) -> [String; 4] {
    [
        "api".to_string(),
        "projects".to_string(),
        project.as_str().to_string(),
        "risks-issues".to_string(),
    ]
}

/// Path segments of a single record endpoint
#[must_use]
pub fn record_path(id: &RecordId) -> [String; 3] {
    ["api".to_string(), "risks-issues".to_string(), id.to_string()]
}

/// Remote operations the panel depends on.
///
/// Implementations attach whatever credential they were built with; the
/// panel itself never sees it.
#[async_trait]
pub trait RiskIssueApi: Send + Sync {
    /// Fetch every record of a project, in server order.
    async fn list(&self, project: &ProjectId) -> Result<Vec<RiskIssue>>;

    /// Create a record from a draft and return what the server stored.
    async fn create(&self, project: &ProjectId, draft: &Draft) -> Result<RiskIssue>;

    /// Replace a record with `record` (its full representation).
    ///
    /// The response body is not used; callers reload the list instead.
    async fn update(&self, record: &RiskIssue) -> Result<()>;
}

#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockApi, MockCall};

#[cfg(any(test, feature = "test-util"))]
mod mock {
    use super::RiskIssueApi;
    use crate::domain::{Draft, ProjectId, RecordId, RecordStatus, RiskIssue};
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex, MutexGuard};

    /// A call received by [`MockApi`]
    #[derive(Debug, Clone, PartialEq)]
    pub enum MockCall {
        /// `list(project)`
        List(ProjectId),
        /// `create(project, draft)`
        Create(ProjectId, Draft),
        /// `update(record)`
        Update(RiskIssue),
    }

    #[derive(Debug, Default)]
    struct MockState {
        projects: HashMap<ProjectId, Vec<RiskIssue>>,
        calls: Vec<MockCall>,
        next_id: u64,
        fail_list: Option<u16>,
        fail_create: Option<(u16, Option<String>)>,
        fail_update: Option<(u16, Option<String>)>,
    }

    /// In-memory [`RiskIssueApi`] that records every call.
    ///
    /// Clones share state, so a test can keep one handle for inspection
    /// after boxing another into a panel.
    #[derive(Debug, Clone)]
    pub struct MockApi {
        state: Arc<Mutex<MockState>>,
    }

    impl Default for MockApi {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockApi {
        /// Create an empty mock with no projects.
        #[must_use]
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(MockState {
                    next_id: 1000,
                    ..MockState::default()
                })),
            }
        }

        fn state(&self) -> MutexGuard<'_, MockState> {
            // Poisoned only if another test panicked while holding the lock.
            self.state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Replace the records served for `project`.
        pub fn seed(&self, project: impl Into<ProjectId>, records: Vec<RiskIssue>) {
            self.state().projects.insert(project.into(), records);
        }

        /// Make every list call fail with `status`.
        pub fn fail_list(&self, status: u16) {
            self.state().fail_list = Some(status);
        }

        /// Make every create call fail with `status` and an optional server message.
        pub fn fail_create(&self, status: u16, message: Option<&str>) {
            self.state().fail_create = Some((status, message.map(str::to_string)));
        }

        /// Make every update call fail with `status` and an optional server message.
        pub fn fail_update(&self, status: u16, message: Option<&str>) {
            self.state().fail_update = Some((status, message.map(str::to_string)));
        }

        /// Clear all scripted failures.
        pub fn heal(&self) {
            let mut state = self.state();
            state.fail_list = None;
            state.fail_create = None;
            state.fail_update = None;
        }

        /// Every call received so far, oldest first.
        #[must_use]
        pub fn calls(&self) -> Vec<MockCall> {
            self.state().calls.clone()
        }

        /// Records currently stored for `project`.
        #[must_use]
        pub fn records(&self, project: &ProjectId) -> Vec<RiskIssue> {
            self.state()
                .projects
                .get(project)
                .cloned()
                .unwrap_or_default()
        }

        /// Build a record with the given ID, kind and status.
        #[must_use]
        pub fn record(id: u64, kind: crate::domain::RecordKind, status: &str) -> RiskIssue {
            RiskIssue {
                id: RecordId::Number(id),
                kind,
                title: format!("Record {id}"),
                description: Some(format!("Description of record {id}")),
                impact_level: crate::domain::ImpactLevel::Medium,
                status: RecordStatus::from(status),
                extra: serde_json::Map::new(),
            }
        }
    }

    #[async_trait]
    impl RiskIssueApi for MockApi {
        async fn list(&self, project: &ProjectId) -> Result<Vec<RiskIssue>> {
            let mut state = self.state();
            state.calls.push(MockCall::List(project.clone()));
            if let Some(status) = state.fail_list {
                return Err(Error::Api {
                    status,
                    message: None,
                });
            }
            Ok(state.projects.get(project).cloned().unwrap_or_default())
        }

        async fn create(&self, project: &ProjectId, draft: &Draft) -> Result<RiskIssue> {
            let mut state = self.state();
            state
                .calls
                .push(MockCall::Create(project.clone(), draft.clone()));
            if let Some((status, message)) = state.fail_create.clone() {
                return Err(Error::Api { status, message });
            }

            state.next_id += 1;
            let mut extra = serde_json::Map::new();
            extra.insert(
                "project_id".to_string(),
                serde_json::Value::String(project.to_string()),
            );
            let record = RiskIssue {
                id: RecordId::Number(state.next_id),
                kind: draft.kind,
                title: draft.title.clone(),
                description: Some(draft.description.clone()),
                impact_level: draft.impact_level,
                status: RecordStatus::Open,
                extra,
            };
            state
                .projects
                .entry(project.clone())
                .or_default()
                .push(record.clone());
            Ok(record)
        }

        async fn update(&self, record: &RiskIssue) -> Result<()> {
            let mut state = self.state();
            state.calls.push(MockCall::Update(record.clone()));
            if let Some((status, message)) = state.fail_update.clone() {
                return Err(Error::Api { status, message });
            }

            let stored = state
                .projects
                .values_mut()
                .flat_map(|records| records.iter_mut())
                .find(|r| r.id == record.id)
                .ok_or_else(|| Error::Api {
                    status: 404,
                    message: Some(format!("Record {} not found", record.id)),
                })?;
            *stored = record.clone();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordKind, RecordStatus};

    #[test]
    fn test_collection_path() {
        let segments = project_collection_path(&ProjectId::from("42"));
        assert_eq!(segments, ["api", "projects", "42", "risks-issues"]);
    }

    #[test]
    fn test_record_path() {
        assert_eq!(
            record_path(&RecordId::Number(7)),
            ["api", "risks-issues", "7"]
        );
    }

    #[tokio::test]
    async fn test_mock_update_replaces_record() {
        let mock = MockApi::new();
        let project = ProjectId::from("p1");
        mock.seed("p1", vec![MockApi::record(1, RecordKind::Issue, "open")]);

        let stored = mock.records(&project).remove(0);
        mock.update(&stored.with_status(RecordStatus::Closed))
            .await
            .unwrap();

        assert_eq!(mock.records(&project)[0].status, RecordStatus::Closed);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let mock = MockApi::new();
        mock.fail_create(400, Some("Title required"));

        let err = mock
            .create(&ProjectId::from("p1"), &Draft::default())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Title required"));
    }
}
