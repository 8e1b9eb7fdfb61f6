//! Background remote writes
//!
//! Local-first mutations hand their remote call to [`spawn_remote_write`],
//! which runs it as a tokio task, logs the outcome and surfaces failures to
//! the UI layer as [`StoreNotice`]s.

use serde::Serialize;
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::{RemoteError, StoreError};

/// Store operations that reach the remote collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Update,
    Delete,
    Reorder,
    List,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Reorder => "reorder",
            Operation::List => "list",
        }
    }
}

/// When local state changes relative to the remote write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// Local state changes only after the remote confirms
    RemoteFirst,
    /// Local state changes immediately; the remote write runs in the background
    LocalFirst,
}

/// Write policy of each mutation.
///
/// Creation waits for the remote because the id is assigned there, so an
/// id-less record never enters the reorderable list. Updates, deletes and
/// reorders target records whose id is already known.
pub const fn write_policy(operation: Operation) -> WritePolicy {
    match operation {
        Operation::Create | Operation::List => WritePolicy::RemoteFirst,
        Operation::Update | Operation::Delete | Operation::Reorder => WritePolicy::LocalFirst,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// User-visible notification about an asynchronous failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreNotice {
    pub level: NoticeLevel,
    pub operation: Operation,
    pub project_id: String,
    pub message: String,
}

/// Sender half the store pushes notices into
pub type NoticeSender = UnboundedSender<StoreNotice>;

/// Emit a notice if anyone is listening
pub(crate) fn emit_notice(notices: Option<&NoticeSender>, notice: StoreNotice) {
    if let Some(tx) = notices {
        if tx.send(notice).is_err() {
            debug!("Notice receiver dropped");
        }
    }
}

/// Handle to an in-flight remote write.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct WriteHandle {
    operation: Operation,
    project_id: String,
    task: JoinHandle<Result<(), StoreError>>,
}

impl WriteHandle {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Wait for the remote write to settle
    pub async fn finished(self) -> Result<(), StoreError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(StoreError::RemoteWrite(RemoteError::Rejected(format!(
                "write task aborted: {}",
                e
            )))),
        }
    }
}

/// Spawn a remote write in the background.
///
/// A failure is logged and pushed to `notices`; it never reaches local state.
pub fn spawn_remote_write<Fut>(
    operation: Operation,
    project_id: String,
    notices: Option<NoticeSender>,
    write: Fut,
) -> WriteHandle
where
    Fut: Future<Output = Result<(), RemoteError>> + Send + 'static,
{
    let id = project_id.clone();
    debug!("Dispatching remote {} for {}", operation.as_str(), id);

    let task = tokio::spawn(async move {
        match write.await {
            Ok(()) => {
                info!("Remote {} confirmed for {}", operation.as_str(), id);
                Ok(())
            }
            Err(e) => {
                error!("Remote {} failed for {}: {}", operation.as_str(), id, e);
                emit_notice(
                    notices.as_ref(),
                    StoreNotice {
                        level: NoticeLevel::Error,
                        operation,
                        project_id: id,
                        message: format!("Failed to {} project: {}", operation.as_str(), e),
                    },
                );
                Err(StoreError::RemoteWrite(e))
            }
        }
    });

    WriteHandle {
        operation,
        project_id,
        task,
    }
}
