//! Optimistic project store
//!
//! Holds the user's projects in display order and mirrors every mutation to
//! the remote collaborator. Creation waits for the remote to assign an id;
//! updates, deletes and reorders change local state first and write in the
//! background (see [`write_policy`](super::write_dispatcher::write_policy)).
//!
//! The store has a single owner and mutations take `&mut self`. Background
//! writes never touch the collection, so no locking is involved.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::write_dispatcher::{spawn_remote_write, NoticeSender, Operation, WriteHandle};
use crate::adapters::RemoteStore;
use crate::error::{RemoteError, StoreError};
use crate::models::{
    AppSettings, InsertPosition, Project, ProjectDraft, ProjectPatch, ProjectQuery,
    ProjectTemplate, QueryOrder,
};

/// Behavior switches of the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub insert_position: InsertPosition,
    /// Write `display_order` remotely on reorder and fetch in that order
    pub persist_display_order: bool,
}

impl From<&AppSettings> for StoreOptions {
    fn from(settings: &AppSettings) -> Self {
        Self {
            insert_position: settings.insert_position,
            persist_display_order: settings.persist_display_order,
        }
    }
}

/// Record addressed by a mutation. Unsaved records have no id and can only
/// be addressed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(String),
    Position(usize),
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Id(id)
    }
}

impl From<usize> for Target {
    fn from(position: usize) -> Self {
        Target::Position(position)
    }
}

pub struct ProjectStore {
    projects: Vec<Project>,
    remote: Arc<dyn RemoteStore>,
    options: StoreOptions,
    notices: Option<NoticeSender>,
    /// Set by the first successful `list`
    synced: bool,
}

impl ProjectStore {
    pub fn new(remote: Arc<dyn RemoteStore>, options: StoreOptions) -> Self {
        Self {
            projects: Vec::new(),
            remote,
            options,
            notices: None,
            synced: false,
        }
    }

    /// Route asynchronous failures to `notices`
    pub fn with_notices(mut self, notices: NoticeSender) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn remote(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.remote)
    }

    /// Projects in display order
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.position(id).map(|i| &self.projects[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.projects.iter().position(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Create a project from a partial record.
    ///
    /// The record becomes visible only once the remote has accepted it and
    /// assigned its id. A blank name is rejected before any remote call.
    pub async fn create(&mut self, mut draft: ProjectDraft) -> Result<Project, StoreError> {
        let name = draft
            .validated_name()
            .ok_or_else(|| StoreError::Validation("Project name is required".to_string()))?
            .to_string();
        draft.name = name;

        if self.options.persist_display_order && draft.display_order.is_none() {
            draft.display_order = self.next_display_order();
        }

        let project = self.remote.insert(&draft).await.map_err(|e| {
            error!("Failed to create project '{}': {}", draft.name, e);
            StoreError::RemoteWrite(e)
        })?;

        if !project.is_persisted() {
            error!("Backend accepted '{}' without assigning an id", project.name);
            return Err(StoreError::RemoteWrite(RemoteError::Rejected(
                "backend returned a record without an id".to_string(),
            )));
        }

        match self.options.insert_position {
            InsertPosition::First => self.projects.insert(0, project.clone()),
            InsertPosition::Last => self.projects.push(project.clone()),
        }

        info!("Created project: {} ({})", project.name, project.id);
        Ok(project)
    }

    /// Create a project from a template snapshot
    pub async fn create_from_template(
        &mut self,
        template: &ProjectTemplate,
        name: &str,
    ) -> Result<Project, StoreError> {
        self.create(ProjectDraft::from_template(template, name)).await
    }

    /// Patch a project locally and write the patch in the background.
    ///
    /// A blank name is rejected before anything changes. Returns `Ok(None)`
    /// when no project has this id; nothing is sent then. A failed remote
    /// write keeps the local patch and emits a notice.
    pub fn update(
        &mut self,
        id: &str,
        mut patch: ProjectPatch,
    ) -> Result<Option<WriteHandle>, StoreError> {
        if let Some(name) = patch.name.take() {
            let name = name.trim();
            if name.is_empty() {
                return Err(StoreError::Validation("Project name is required".to_string()));
            }
            patch.name = Some(name.to_string());
        }

        let Some(index) = self.position(id) else {
            warn!("{}", StoreError::NotFound(id.to_string()));
            return Ok(None);
        };

        patch.updated_at = Some(Utc::now());
        patch.apply(&mut self.projects[index]);

        let remote = Arc::clone(&self.remote);
        let remote_id = id.to_string();
        Ok(Some(spawn_remote_write(
            Operation::Update,
            id.to_string(),
            self.notices.clone(),
            async move { remote.update(&remote_id, &patch).await },
        )))
    }

    /// Remove a project locally, then delete it remotely.
    ///
    /// Unsaved records are only removed locally and return `None`, as does a
    /// target that matches nothing. A failed remote delete is not reverted.
    pub fn delete(&mut self, target: impl Into<Target>) -> Option<WriteHandle> {
        let target = target.into();
        let index = match &target {
            Target::Id(id) => self.position(id),
            Target::Position(i) => (*i < self.projects.len()).then_some(*i),
        };
        let Some(index) = index else {
            warn!("{}", StoreError::NotFound(format!("{:?}", target)));
            return None;
        };

        let project = self.projects.remove(index);
        if !project.is_persisted() {
            info!("Removed unsaved project '{}'", project.name);
            return None;
        }

        info!("Deleted project: {} ({})", project.name, project.id);
        let remote = Arc::clone(&self.remote);
        let id = project.id.clone();
        Some(spawn_remote_write(
            Operation::Delete,
            project.id,
            self.notices.clone(),
            async move { remote.delete(&id).await },
        ))
    }

    /// Replace the display order.
    ///
    /// With persisted ordering, every saved record whose `display_order`
    /// differs from its new position gets one independent remote update.
    pub fn reorder(&mut self, new_order: Vec<Project>) -> Vec<WriteHandle> {
        self.projects = new_order;
        if !self.options.persist_display_order {
            return Vec::new();
        }

        let now = Utc::now();
        let mut writes = Vec::new();
        for (position, project) in self.projects.iter_mut().enumerate() {
            let position = position as i64;
            if !project.is_persisted() || project.display_order == Some(position) {
                continue;
            }

            let patch = ProjectPatch {
                display_order: Some(position),
                updated_at: Some(now),
                ..Default::default()
            };
            patch.apply(project);

            let remote = Arc::clone(&self.remote);
            let id = project.id.clone();
            writes.push(spawn_remote_write(
                Operation::Reorder,
                project.id.clone(),
                self.notices.clone(),
                async move { remote.update(&id, &patch).await },
            ));
        }

        info!("Reordered projects, {} position updates sent", writes.len());
        writes
    }

    /// Replace local state with the remote collection.
    ///
    /// Unsynced local changes are overwritten. On failure local state is
    /// left exactly as it was.
    pub async fn list(&mut self) -> Result<&[Project], StoreError> {
        let order = if self.options.persist_display_order {
            QueryOrder::DisplayOrder
        } else {
            QueryOrder::CreatedDesc
        };

        match self.remote.query(&ProjectQuery::ordered_by(order)).await {
            Ok(projects) => {
                info!("Loaded {} projects", projects.len());
                self.projects = projects;
                self.synced = true;
                Ok(&self.projects)
            }
            Err(e) => {
                error!("Failed to load projects, keeping {} local: {}", self.projects.len(), e);
                Err(StoreError::RemoteRead(e))
            }
        }
    }

    /// Position for a new record next to the local ones. Before the first
    /// `list` the remote positions are unknown, so none is assigned and the
    /// record sorts after the ordered ones until the next reorder.
    fn next_display_order(&self) -> Option<i64> {
        if !self.synced {
            warn!("Creating before the first load, display order left unset");
            return None;
        }
        let orders = self.projects.iter().filter_map(|p| p.display_order);
        Some(match self.options.insert_position {
            InsertPosition::First => orders.min().map_or(0, |min| min - 1),
            InsertPosition::Last => orders.max().map_or(0, |max| max + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryBackend;
    use crate::models::ProjectStatus;
    use crate::services::write_dispatcher::{NoticeLevel, StoreNotice};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
    use tokio::sync::Semaphore;

    /// Collaborator with switchable failures, a call log and an optional
    /// gate that holds writes until permits are added.
    #[derive(Default)]
    struct FakeRemote {
        inner: MemoryBackend,
        fail_writes: AtomicBool,
        fail_queries: AtomicBool,
        calls: Mutex<Vec<String>>,
        gate: Option<Arc<Semaphore>>,
    }

    impl FakeRemote {
        fn gated(gate: Arc<Semaphore>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        async fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
        }

        fn write_result(&self) -> Result<(), RemoteError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(RemoteError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl RemoteStore for FakeRemote {
        async fn insert(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
            self.record(format!("insert:{}", draft.name));
            self.write_result()?;
            self.inner.insert(draft).await
        }

        async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<(), RemoteError> {
            self.record(format!("update:{}", id));
            self.pass_gate().await;
            self.write_result()?;
            self.inner.update(id, patch).await
        }

        async fn delete(&self, id: &str) -> Result<(), RemoteError> {
            self.record(format!("delete:{}", id));
            self.pass_gate().await;
            self.write_result()?;
            self.inner.delete(id).await
        }

        async fn query(&self, query: &ProjectQuery) -> Result<Vec<Project>, RemoteError> {
            self.record("query".to_string());
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(RemoteError::Network("connection reset".to_string()));
            }
            self.inner.query(query).await
        }
    }

    fn store_with(remote: Arc<FakeRemote>, options: StoreOptions) -> (ProjectStore, UnboundedReceiver<StoreNotice>) {
        let (tx, rx) = unbounded_channel();
        let store = ProjectStore::new(remote, options).with_notices(tx);
        (store, rx)
    }

    fn unsaved(name: &str) -> Project {
        let mut project = Project::default();
        project.name = name.to_string();
        project
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());

        let project = store.create(ProjectDraft::new("Demo")).await.unwrap();

        assert!(project.is_persisted());
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.progress, 0);
        assert_eq!(project.issues, 0);
        assert_eq!(store.get(&project.id), Some(&project));
        assert_eq!(remote.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_before_remote() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());

        for name in ["", "   ", "\t\n"] {
            let result = store.create(ProjectDraft::new(name)).await;
            assert!(matches!(result, Err(StoreError::Validation(_))));
        }
        assert!(remote.calls().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote, StoreOptions::default());

        let project = store.create(ProjectDraft::new("  Demo  ")).await.unwrap();
        assert_eq!(project.name, "Demo");
    }

    #[tokio::test]
    async fn test_failed_create_inserts_nothing() {
        let remote = Arc::new(FakeRemote::default());
        remote.fail_writes.store(true, Ordering::SeqCst);
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());

        let result = store.create(ProjectDraft::new("Demo")).await;

        assert!(matches!(result, Err(StoreError::RemoteWrite(_))));
        assert!(store.is_empty());
        assert_eq!(remote.calls(), vec!["insert:Demo".to_string()]);
    }

    #[tokio::test]
    async fn test_insert_position() {
        let remote = Arc::new(FakeRemote::default());
        let (mut first, _rx) = store_with(remote.clone(), StoreOptions::default());
        first.create(ProjectDraft::new("A")).await.unwrap();
        first.create(ProjectDraft::new("B")).await.unwrap();
        let names: Vec<&str> = first.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);

        let options = StoreOptions {
            insert_position: InsertPosition::Last,
            ..Default::default()
        };
        let (mut last, _rx) = store_with(remote, options);
        last.create(ProjectDraft::new("A")).await.unwrap();
        last.create(ProjectDraft::new("B")).await.unwrap();
        let names: Vec<&str> = last.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_create_from_template() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote, StoreOptions::default());
        let template = ProjectTemplate {
            name: "Landing page".to_string(),
            description: None,
            status: ProjectStatus::Development,
            technologies: vec!["astro".to_string()],
            features_pending: vec!["contact form".to_string()],
            initial_budget_credits: 100,
        };

        let project = store.create_from_template(&template, "Portfolio").await.unwrap();
        assert_eq!(project.name, "Portfolio");
        assert_eq!(project.status, ProjectStatus::Development);
        assert_eq!(project.features_pending, vec!["contact form".to_string()]);
    }

    #[tokio::test]
    async fn test_update_is_last_write_wins_locally() {
        let gate = Arc::new(Semaphore::new(0));
        let remote = Arc::new(FakeRemote::gated(gate.clone()));
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        let id = store.create(ProjectDraft::new("Demo")).await.unwrap().id;

        let first = store.update(&id, ProjectPatch::name("X")).unwrap().unwrap();
        let second = store.update(&id, ProjectPatch::name("Y")).unwrap().unwrap();

        // Neither remote call has completed yet
        assert_eq!(store.get(&id).unwrap().name, "Y");

        gate.add_permits(2);
        second.finished().await.unwrap();
        first.finished().await.unwrap();
        assert_eq!(store.get(&id).unwrap().name, "Y");
    }

    #[tokio::test]
    async fn test_update_refreshes_timestamp() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote, StoreOptions::default());
        let created = store.create(ProjectDraft::new("Demo")).await.unwrap();

        store
            .update(&created.id, ProjectPatch::status(ProjectStatus::Deployed))
            .unwrap()
            .unwrap()
            .finished()
            .await
            .unwrap();

        let project = store.get(&created.id).unwrap();
        assert_eq!(project.status, ProjectStatus::Deployed);
        assert!(project.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_local_patch() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, mut rx) = store_with(remote.clone(), StoreOptions::default());
        let id = store.create(ProjectDraft::new("Demo")).await.unwrap().id;
        remote.fail_writes.store(true, Ordering::SeqCst);

        let handle = store.update(&id, ProjectPatch::name("Renamed")).unwrap().unwrap();
        assert!(matches!(handle.finished().await, Err(StoreError::RemoteWrite(_))));

        assert_eq!(store.get(&id).unwrap().name, "Renamed");
        assert_eq!(remote.inner.get(&id).unwrap().name, "Demo");

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.operation, Operation::Update);
        assert_eq!(notice.project_id, id);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_a_noop() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, mut rx) = store_with(remote.clone(), StoreOptions::default());

        assert!(store.update("ghost", ProjectPatch::name("X")).unwrap().is_none());
        assert!(store.update("", ProjectPatch::name("X")).unwrap().is_none());
        assert!(remote.calls().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name_before_remote() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, mut rx) = store_with(remote.clone(), StoreOptions::default());
        let created = store.create(ProjectDraft::new("Demo")).await.unwrap();

        for name in ["", "   ", "\t\n"] {
            let result = store.update(&created.id, ProjectPatch::name(name));
            assert!(matches!(result, Err(StoreError::Validation(_))));
        }

        assert_eq!(store.get(&created.id), Some(&created));
        assert_eq!(remote.inner.get(&created.id).unwrap().name, "Demo");
        assert_eq!(remote.calls(), vec!["insert:Demo".to_string()]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_update_trims_name() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        let id = store.create(ProjectDraft::new("Demo")).await.unwrap().id;

        store
            .update(&id, ProjectPatch::name("  Renamed  "))
            .unwrap()
            .unwrap()
            .finished()
            .await
            .unwrap();

        assert_eq!(store.get(&id).unwrap().name, "Renamed");
        assert_eq!(remote.inner.get(&id).unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_unsaved_record_is_local_only() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        let saved = store.create(ProjectDraft::new("Saved")).await.unwrap();
        store.reorder(vec![saved.clone(), unsaved("Draft")]);

        assert!(store.delete(1usize).is_none());

        assert_eq!(store.len(), 1);
        assert_eq!(store.projects()[0].id, saved.id);
        assert_eq!(remote.calls(), vec!["insert:Saved".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_is_local_first() {
        let gate = Arc::new(Semaphore::new(0));
        let remote = Arc::new(FakeRemote::gated(gate.clone()));
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        let id = store.create(ProjectDraft::new("Demo")).await.unwrap().id;

        let handle = store.delete(id.as_str()).unwrap();
        assert!(store.get(&id).is_none());
        assert_eq!(remote.inner.len(), 1);

        gate.add_permits(1);
        handle.finished().await.unwrap();
        assert!(remote.inner.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_is_not_reverted() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, mut rx) = store_with(remote.clone(), StoreOptions::default());
        let id = store.create(ProjectDraft::new("Demo")).await.unwrap().id;
        remote.fail_writes.store(true, Ordering::SeqCst);

        let handle = store.delete(id.clone()).unwrap();
        assert!(handle.finished().await.is_err());

        assert!(store.is_empty());
        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.operation, Operation::Delete);
    }

    #[tokio::test]
    async fn test_delete_unknown_target() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        store.create(ProjectDraft::new("Demo")).await.unwrap();

        assert!(store.delete("ghost").is_none());
        assert!(store.delete(5usize).is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_reorder_without_persistence_sends_nothing() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        store.create(ProjectDraft::new("A")).await.unwrap();
        store.create(ProjectDraft::new("B")).await.unwrap();

        let mut reversed = store.projects().to_vec();
        reversed.reverse();
        let writes = store.reorder(reversed);

        assert!(writes.is_empty());
        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(remote.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reorder_persists_only_moved_records() {
        let remote = Arc::new(FakeRemote::default());
        let options = StoreOptions {
            insert_position: InsertPosition::Last,
            persist_display_order: true,
        };
        let (mut store, _rx) = store_with(remote.clone(), options);
        store.list().await.unwrap();
        for name in ["A", "B", "C"] {
            store.create(ProjectDraft::new(name)).await.unwrap();
        }
        let orders: Vec<Option<i64>> = store.projects().iter().map(|p| p.display_order).collect();
        assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);

        let current = store.projects().to_vec();
        let swapped = vec![current[1].clone(), current[0].clone(), current[2].clone()];
        let writes = store.reorder(swapped);

        assert_eq!(writes.len(), 2);
        for write in writes {
            assert_eq!(write.operation(), Operation::Reorder);
            write.finished().await.unwrap();
        }

        let listed = store.list().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_display_order_waits_for_first_load() {
        let remote = Arc::new(FakeRemote::default());
        let options = StoreOptions {
            insert_position: InsertPosition::Last,
            persist_display_order: true,
        };
        let mut seeded = ProjectDraft::new("Existing");
        seeded.display_order = Some(4);
        remote.inner.insert(&seeded).await.unwrap();
        let (mut store, _rx) = store_with(remote.clone(), options);

        let early = store.create(ProjectDraft::new("Early")).await.unwrap();
        assert_eq!(early.display_order, None);

        store.list().await.unwrap();
        let late = store.create(ProjectDraft::new("Late")).await.unwrap();
        assert_eq!(late.display_order, Some(5));

        let names: Vec<String> = store.list().await.unwrap().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Existing", "Late", "Early"]);
    }

    #[tokio::test]
    async fn test_list_replaces_local_state() {
        let remote = Arc::new(FakeRemote::default());
        remote.inner.insert(&ProjectDraft::new("Older")).await.unwrap();
        remote.inner.insert(&ProjectDraft::new("Newer")).await.unwrap();
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        store.reorder(vec![unsaved("Local only")]);

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);

        // Idempotent
        let again: Vec<String> = store.list().await.unwrap().iter().map(|p| p.name.clone()).collect();
        assert_eq!(again, names);
    }

    #[tokio::test]
    async fn test_failed_list_keeps_local_state() {
        let remote = Arc::new(FakeRemote::default());
        let (mut store, _rx) = store_with(remote.clone(), StoreOptions::default());
        store.create(ProjectDraft::new("A")).await.unwrap();
        store.create(ProjectDraft::new("B")).await.unwrap();
        let before = store.projects().to_vec();

        remote.fail_queries.store(true, Ordering::SeqCst);
        let result = store.list().await;

        assert!(matches!(result, Err(StoreError::RemoteRead(_))));
        assert_eq!(store.projects(), before.as_slice());
    }
}
