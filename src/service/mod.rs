//! Single-writer desk service
//!
//! One tokio task owns the [`Desk`] and applies commands one at a time, so
//! a batch always sees the load left by the commands before it. Callers
//! talk to it through a cloneable [`DeskHandle`]; readers get the latest
//! [`DeskSnapshot`] from a watch channel without waiting on the writer.

mod desk;

pub use desk::{Desk, DeskSnapshot};

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::DeskError;
use crate::executor::{Assignment, AssignmentDecision, BatchReport};
use crate::matching::Recommendation;

/// Commands buffered before senders wait
const COMMAND_BUFFER: usize = 64;

/// Edits to the round-robin sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOp {
    Add,
    Remove,
    MoveUp,
    MoveDown,
}

enum Command {
    Assign {
        query_id: String,
        staff_id: String,
        reply: oneshot::Sender<Result<Assignment, DeskError>>,
    },
    AutoAssign {
        /// `None` means every pending query
        query_ids: Option<Vec<String>>,
        reply: oneshot::Sender<BatchReport>,
    },
    Recommend {
        query_id: String,
        reply: oneshot::Sender<Result<Vec<Recommendation>, DeskError>>,
    },
    Start {
        query_id: String,
        reply: oneshot::Sender<Result<(), DeskError>>,
    },
    Complete {
        query_id: String,
        reply: oneshot::Sender<Result<u32, DeskError>>,
    },
    SetRuleEnabled {
        rule_id: String,
        enabled: bool,
        reply: oneshot::Sender<Result<bool, DeskError>>,
    },
    Sequence {
        op: SequenceOp,
        staff_id: String,
        reply: oneshot::Sender<Result<Vec<String>, DeskError>>,
    },
    DrainJournal {
        reply: oneshot::Sender<Vec<AssignmentDecision>>,
    },
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Command::Assign { .. } => "Assign",
            Command::AutoAssign { .. } => "AutoAssign",
            Command::Recommend { .. } => "Recommend",
            Command::Start { .. } => "Start",
            Command::Complete { .. } => "Complete",
            Command::SetRuleEnabled { .. } => "SetRuleEnabled",
            Command::Sequence { .. } => "Sequence",
            Command::DrainJournal { .. } => "DrainJournal",
        };
        f.debug_struct("Command").field("kind", &name).finish()
    }
}

/// Spawns the task that owns a desk
pub struct DeskService;

impl DeskService {
    /// Start serving `desk`.
    ///
    /// The task stops when `cancel` fires or every handle is dropped, and
    /// hands the desk back through the join handle. Cancellation is only
    /// observed between commands; a command that started always finishes.
    pub fn spawn(desk: Desk, cancel: CancellationToken) -> (DeskHandle, JoinHandle<Desk>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(desk.snapshot(0)));

        let join = tokio::spawn(run(desk, rx, snapshot_tx, cancel));
        let handle = DeskHandle {
            tx,
            snapshots: snapshot_rx,
        };
        (handle, join)
    }
}

async fn run(
    mut desk: Desk,
    mut rx: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Arc<DeskSnapshot>>,
    cancel: CancellationToken,
) -> Desk {
    tracing::info!("Desk service started");
    let mut version = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Desk service shutting down");
                break;
            }
            command = rx.recv() => {
                let Some(command) = command else {
                    tracing::debug!("All desk handles dropped");
                    break;
                };
                tracing::trace!(?command, "Applying desk command");
                if apply(&mut desk, command) {
                    version += 1;
                    snapshots.send_replace(Arc::new(desk.snapshot(version)));
                }
            }
        }
    }

    desk
}

/// Apply one command; returns whether the desk may have changed.
fn apply(desk: &mut Desk, command: Command) -> bool {
    match command {
        Command::Assign {
            query_id,
            staff_id,
            reply,
        } => {
            let result = desk.assign(&query_id, &staff_id).map_err(DeskError::from);
            let changed = result.is_ok();
            let _ = reply.send(result);
            changed
        }
        Command::AutoAssign { query_ids, reply } => {
            let report = match query_ids {
                Some(ids) => desk.auto_assign(&ids),
                None => desk.auto_assign_pending(),
            };
            let changed = report.assigned_count() > 0;
            let _ = reply.send(report);
            changed
        }
        Command::Recommend { query_id, reply } => {
            let _ = reply.send(desk.recommend(&query_id).map_err(DeskError::from));
            false
        }
        Command::Start { query_id, reply } => {
            let result = desk.start(&query_id).map_err(DeskError::from);
            let changed = result.is_ok();
            let _ = reply.send(result);
            changed
        }
        Command::Complete { query_id, reply } => {
            let result = desk.complete(&query_id).map_err(DeskError::from);
            let changed = result.is_ok();
            let _ = reply.send(result);
            changed
        }
        Command::SetRuleEnabled {
            rule_id,
            enabled,
            reply,
        } => {
            let result = desk
                .catalog_mut()
                .set_enabled(&rule_id, enabled)
                .map_err(DeskError::from);
            let changed = result.is_ok();
            let _ = reply.send(result);
            changed
        }
        Command::Sequence {
            op,
            staff_id,
            reply,
        } => {
            let mut sequencer = desk.sequencer();
            let result = match op {
                SequenceOp::Add => sequencer.add_to_sequence(&staff_id).map(|_| ()),
                SequenceOp::Remove => sequencer.remove_from_sequence(&staff_id).map(|_| ()),
                SequenceOp::MoveUp => sequencer.move_up(&staff_id).map(|_| ()),
                SequenceOp::MoveDown => sequencer.move_down(&staff_id).map(|_| ()),
            }
            .map(|()| sequencer.sequence())
            .map_err(DeskError::from);
            let changed = result.is_ok();
            let _ = reply.send(result);
            changed
        }
        Command::DrainJournal { reply } => {
            let drained = desk.drain_journal();
            let changed = !drained.is_empty();
            let _ = reply.send(drained);
            changed
        }
    }
}

/// Cloneable handle to a running desk service
#[derive(Debug, Clone)]
pub struct DeskHandle {
    tx: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<DeskSnapshot>>,
}

impl DeskHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, DeskError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| DeskError::ServiceClosed)?;
        response.await.map_err(|_| DeskError::ServiceClosed)
    }

    /// Latest published state. Never waits on the writer.
    pub fn snapshot(&self) -> Arc<DeskSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DeskSnapshot>> {
        self.snapshots.clone()
    }

    pub async fn assign(&self, query_id: &str, staff_id: &str) -> Result<Assignment, DeskError> {
        self.request(|reply| Command::Assign {
            query_id: query_id.to_string(),
            staff_id: staff_id.to_string(),
            reply,
        })
        .await?
    }

    /// Auto-assign specific queries, in the order given.
    pub async fn auto_assign(&self, query_ids: Vec<String>) -> Result<BatchReport, DeskError> {
        self.request(|reply| Command::AutoAssign {
            query_ids: Some(query_ids),
            reply,
        })
        .await
    }

    /// Auto-assign every pending query in arrival order.
    pub async fn auto_assign_pending(&self) -> Result<BatchReport, DeskError> {
        self.request(|reply| Command::AutoAssign {
            query_ids: None,
            reply,
        })
        .await
    }

    pub async fn recommend(&self, query_id: &str) -> Result<Vec<Recommendation>, DeskError> {
        self.request(|reply| Command::Recommend {
            query_id: query_id.to_string(),
            reply,
        })
        .await?
    }

    pub async fn start(&self, query_id: &str) -> Result<(), DeskError> {
        self.request(|reply| Command::Start {
            query_id: query_id.to_string(),
            reply,
        })
        .await?
    }

    /// Returns the staff member's remaining load.
    pub async fn complete(&self, query_id: &str) -> Result<u32, DeskError> {
        self.request(|reply| Command::Complete {
            query_id: query_id.to_string(),
            reply,
        })
        .await?
    }

    /// Returns the previous enabled flag.
    pub async fn set_rule_enabled(&self, rule_id: &str, enabled: bool) -> Result<bool, DeskError> {
        self.request(|reply| Command::SetRuleEnabled {
            rule_id: rule_id.to_string(),
            enabled,
            reply,
        })
        .await?
    }

    /// Returns the sequence after the edit.
    pub async fn sequence(&self, op: SequenceOp, staff_id: &str) -> Result<Vec<String>, DeskError> {
        self.request(|reply| Command::Sequence {
            op,
            staff_id: staff_id.to_string(),
            reply,
        })
        .await?
    }

    /// Take the decisions journaled since the last drain.
    pub async fn drain_journal(&self) -> Result<Vec<AssignmentDecision>, DeskError> {
        self.request(|reply| Command::DrainJournal { reply }).await
    }
}
