//! Operation boundary macros
//!
//! A traversal (or any other logged operation) emits one `start` event and then
//! exactly one `end` or `end_error` event. Every boundary event carries
//! `component` ([`COMPONENT_CORE`](crate::logging_facility::schema::COMPONENT_CORE)),
//! `module`, `op` and `event`. Error events also carry the error's stable code
//! and, when the error points into the document, the offending `text_node_id`
//! and `entity_id` (empty otherwise).

/// Emit one boundary event at the given level
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        $crate::logging_facility::__tracing::$level!(
            component = $crate::logging_facility::schema::COMPONENT_CORE,
            module = module_path!(),
            op = $op,
            event = $event
            $(, $($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use tagx_core::log_op_start;
/// log_op_start!("traverse", text_node_count = 12_u64, layer_count = 2_u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use tagx_core::log_op_end;
/// log_op_end!("traverse", duration_ms = 3_u64, phase = "Done");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
/// A traversal error locates itself: its text node and markup ids become the
/// `text_node_id` and `entity_id` fields.
///
/// ```
/// # use tagx_core::{log_op_error, errors::TagxError};
/// # use tagx_core_types::{MarkupId, TextNodeId};
/// let err = TagxError::DanglingMarkup {
///     text_node_id: TextNodeId::new(4),
///     markup_id: MarkupId::new(1),
/// };
/// log_op_error!("traverse", err, duration_ms = 0_u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            text_node_id = ex_err.text_node_id().unwrap_or_default(),
            entity_id = ex_err.entity_id().unwrap_or_default()
            $(, $($field)*)?
        );
    }};
}
