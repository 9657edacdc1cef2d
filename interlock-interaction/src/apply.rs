//! The one place mediated mutations happen and their events are recorded.

use crate::session::Session;
use interlock_core::context::ExecutionContext;
use interlock_core::error::{InteractionError, ObjectError};
use interlock_core::lifecycle::{EventKind, LifecycleEvent};
use interlock_core::object::{Bookmark, ObjectHandle};
use interlock_core::transaction::TransactionContext;
use interlock_core::value::Value;
use std::sync::Arc;

/// The context's transaction, if it is still active.
fn active_transaction(
    context: &ExecutionContext,
) -> Result<&Arc<dyn TransactionContext>, InteractionError> {
    match context.transaction() {
        Some(tx) if tx.is_active() => Ok(tx),
        Some(tx) => Err(InteractionError::illegal_state(format!(
            "transaction {} is not active",
            tx.id()
        ))),
        None => Err(InteractionError::illegal_state("no active transaction")),
    }
}

/// Record one event into the context's transaction.
pub(crate) fn record(
    context: &ExecutionContext,
    kind: EventKind,
    target: Bookmark,
) -> Result<u64, InteractionError> {
    let tx = active_transaction(context)?;
    let label = kind.label();
    let sequence = tx.record(LifecycleEvent::new(kind, target.clone(), context.user().clone()))?;
    recorded(&**tx, &target, sequence, label);
    Ok(sequence)
}

fn recorded(tx: &dyn TransactionContext, target: &Bookmark, sequence: u64, label: &str) {
    tracing::debug!(
        target_object = %target,
        transaction = %tx.id(),
        sequence,
        event = label,
        "lifecycle event recorded"
    );
}

/// Write `value` into the session's property.
///
/// If the value was written but its event could not be recorded, the
/// previous value is written back before the error is returned.
pub(crate) fn set_property(session: &Session, value: Value) -> Result<(), InteractionError> {
    let tx = active_transaction(&session.context)?;
    let name = session.member.name.as_str();
    let target = &session.target;
    let mut written: Option<Value> = None;

    let outcome = session.context.clone().scope_sync(|| {
        tx.apply_and_record(Box::new(|| -> Result<LifecycleEvent, InteractionError> {
            let (before, after) =
                target.write(|object| -> Result<(Value, Value), ObjectError> {
                    let before = object.get(name)?;
                    object.set(name, value)?;
                    Ok((before, object.get(name)?))
                })??;
            written = Some(before.clone());
            Ok(LifecycleEvent::new(
                EventKind::PropertyChanged {
                    property: name.to_string(),
                    before,
                    after,
                },
                target.bookmark().clone(),
                session.context.user().clone(),
            ))
        }))
    });

    match outcome {
        Ok(sequence) => {
            recorded(&**tx, target.bookmark(), sequence, "property_changed");
            Ok(())
        }
        Err(err) => {
            if let Some(before) = written {
                revert(target, name, before, &err);
            }
            Err(err)
        }
    }
}

fn revert(target: &ObjectHandle, name: &str, before: Value, cause: &InteractionError) {
    match target.write(|object| object.set(name, before)) {
        Ok(Ok(())) => tracing::warn!(
            target_object = %target.bookmark(),
            property = name,
            error = %cause,
            "event not recorded, property reverted"
        ),
        Ok(Err(err)) | Err(err) => tracing::warn!(
            target_object = %target.bookmark(),
            property = name,
            error = %cause,
            revert_error = %err,
            "event not recorded, property could not be reverted"
        ),
    }
}

/// Invoke the session's action with `arguments`.
///
/// An action cannot be undone. With a transaction that overrides
/// [`TransactionContext::apply_and_record`] the event is queued under the
/// same lock as the invocation, so only a broken transaction can leave an
/// invoked action unrecorded; that case is logged.
pub(crate) fn invoke_action(
    session: &Session,
    arguments: Vec<Value>,
) -> Result<Value, InteractionError> {
    let tx = active_transaction(&session.context)?;
    let name = session.member.name.as_str();
    let target = &session.target;
    let mut returned: Option<Value> = None;

    let outcome = session.context.clone().scope_sync(|| {
        tx.apply_and_record(Box::new(|| -> Result<LifecycleEvent, InteractionError> {
            let result = target.write(|object| object.invoke(name, &arguments))??;
            returned = Some(result.clone());
            Ok(LifecycleEvent::new(
                EventKind::ActionInvoked {
                    action: name.to_string(),
                    arguments: arguments.clone(),
                    result,
                },
                target.bookmark().clone(),
                session.context.user().clone(),
            ))
        }))
    });

    match (outcome, returned) {
        (Ok(sequence), Some(result)) => {
            recorded(&**tx, target.bookmark(), sequence, "action_invoked");
            Ok(result)
        }
        (Ok(_), None) => Err(InteractionError::illegal_state(format!(
            "transaction {} recorded {} without invoking it",
            tx.id(),
            session.member.identifier()
        ))),
        (Err(err), Some(_)) => {
            tracing::warn!(
                target_object = %target.bookmark(),
                action = name,
                error = %err,
                "action invoked but its event was not recorded"
            );
            Err(err)
        }
        (Err(err), None) => Err(err),
    }
}

/// Read the session's property. Records nothing.
pub(crate) fn get_property(target: &ObjectHandle, name: &str) -> Result<Value, InteractionError> {
    Ok(target.read(|object| object.get(name))??)
}
