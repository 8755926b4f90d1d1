use crate::dependency_tree::domain::DependencyNode;
use crate::dependency_tree::services::CompositeTree;
use crate::shared::Result;
use tokio::sync::{mpsc, oneshot};

/// Pending commands buffered before senders wait.
const COMMAND_CHANNEL_CAPACITY: usize = 64;

enum Command {
    Merge {
        root: DependencyNode,
        reply: oneshot::Sender<()>,
    },
    Remove {
        root: DependencyNode,
        reply: oneshot::Sender<bool>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<CompositeTree>,
    },
}

/// Sole owner of the composite tree. Commands are applied one at a time in
/// arrival order, so two merges never interleave.
struct CompositeTreeActor {
    tree: CompositeTree,
    commands: mpsc::Receiver<Command>,
}

impl CompositeTreeActor {
    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Merge { root, reply } => {
                    tracing::debug!(project = root.component_id(), "merging project into composite tree");
                    self.tree.append_project(root);
                    let _ = reply.send(());
                }
                Command::Remove { root, reply } => {
                    let removed = self.tree.remove_project(&root);
                    let _ = reply.send(removed);
                }
                Command::Reset { reply } => {
                    self.tree = CompositeTree::Empty;
                    let _ = reply.send(());
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.tree.clone());
                }
            }
        }
        tracing::debug!("composite tree actor stopped");
    }
}

/// Cloneable handle to the composite tree actor.
///
/// The actor task ends once every handle is dropped.
#[derive(Clone)]
pub struct CompositeTreeHandle {
    commands: mpsc::Sender<Command>,
}

impl CompositeTreeHandle {
    /// Spawns the actor on the current tokio runtime.
    pub fn spawn() -> Self {
        let (commands, receiver) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let actor = CompositeTreeActor {
            tree: CompositeTree::Empty,
            commands: receiver,
        };
        tokio::spawn(actor.run());
        Self { commands }
    }

    /// Merges the filtered tree of a project; returns once it is visible.
    pub async fn merge(&self, root: DependencyNode) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Merge { root, reply }).await?;
        Self::receive(response).await
    }

    /// Removes the project with the same root identity as `root`.
    pub async fn remove(&self, root: DependencyNode) -> Result<bool> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Remove { root, reply }).await?;
        Self::receive(response).await
    }

    pub async fn reset(&self) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Reset { reply }).await?;
        Self::receive(response).await
    }

    /// Copy of the composite tree after every command sent so far.
    pub async fn snapshot(&self) -> Result<CompositeTree> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        Self::receive(response).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("Composite tree actor is no longer running"))
    }

    async fn receive<T>(response: oneshot::Receiver<T>) -> Result<T> {
        response
            .await
            .map_err(|_| anyhow::anyhow!("Composite tree actor dropped the reply"))
    }
}
