use focus_client::{NewSession, NewTask};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    CreateTask(NewTask),
    PersistSession(NewSession),
    RetryPendingSessions,
    ReloadAll,
    RefreshSessionsBackground,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
