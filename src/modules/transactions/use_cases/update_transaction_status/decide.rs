// Pure decision function for a status change.
//
// Purpose
// - Turn a raw status change request into the conditional update to perform.
//
// Responsibilities
// - Reject malformed ids, unknown statuses, `pending` as a target and a missing cart id.
// - Pick the single legal source status of the target from the transition table.
// - Never perform input or output.

use crate::modules::transactions::adapters::outbound::transaction_store::{
    StatusFilter, StatusUpdate,
};
use crate::modules::transactions::core::status::TransactionStatus;
use crate::modules::transactions::core::transaction::TransactionId;
use crate::modules::transactions::core::transitions::transition_to;
use crate::modules::transactions::use_cases::update_transaction_status::{
    command::UpdateTransactionStatus,
    decision::{DecideError, Decision},
};
use crate::shared::core::primitives::EpochMillis;

pub fn decide_update_status(command: UpdateTransactionStatus, now: EpochMillis) -> Decision {
    let Ok(id) = command.transaction_id.parse::<TransactionId>() else {
        return Decision::Rejected {
            reason: DecideError::InvalidId,
        };
    };
    let Ok(target) = command.status.parse::<TransactionStatus>() else {
        return Decision::Rejected {
            reason: DecideError::UnknownStatus,
        };
    };
    let Some(cart_id) = command.cart_id.filter(|c| !c.trim().is_empty()) else {
        return Decision::Rejected {
            reason: DecideError::MissingCartId,
        };
    };
    let Some(transition) = transition_to(target) else {
        return Decision::Rejected {
            reason: DecideError::InitialTarget,
        };
    };

    Decision::Accepted {
        transition,
        filter: StatusFilter {
            id,
            cart_id,
            status: transition.from,
        },
        update: StatusUpdate {
            status: transition.to,
            updated_at: now,
        },
    }
}
