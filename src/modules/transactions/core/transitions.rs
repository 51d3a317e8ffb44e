// Status transition table of a transaction.
//
// Purpose
// - List every legal (source, target, downstream task) triple in one place.
//
// Boundaries
// - Pure data and lookups. No input or output.

use crate::modules::transactions::core::status::TransactionStatus;

/// Task sent to the cart service after a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartTask {
    CompleteCheckout,
    Unfreeze,
    ProcessRefund,
}

impl CartTask {
    pub fn task_name(&self) -> &'static str {
        match self {
            CartTask::CompleteCheckout => "cart.completeCheckout",
            CartTask::Unfreeze => "cart.unfreeze",
            CartTask::ProcessRefund => "cart.processRefund",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TransactionStatus,
    pub to: TransactionStatus,
    pub task: CartTask,
}

pub const TRANSITIONS: [Transition; 3] = [
    Transition {
        from: TransactionStatus::Pending,
        to: TransactionStatus::Completed,
        task: CartTask::CompleteCheckout,
    },
    Transition {
        from: TransactionStatus::Pending,
        to: TransactionStatus::Failed,
        task: CartTask::Unfreeze,
    },
    Transition {
        from: TransactionStatus::Completed,
        to: TransactionStatus::Refunded,
        task: CartTask::ProcessRefund,
    },
];

/// The only transition that reaches `target`, if any does.
pub fn transition_to(target: TransactionStatus) -> Option<Transition> {
    TRANSITIONS.into_iter().find(|t| t.to == target)
}
