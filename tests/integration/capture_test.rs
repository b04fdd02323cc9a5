//! Integration tests for capture session operations.
//!
//! These tests are implemented in:
//! `crates/packetlens-capture/tests/supervisor_test.rs`
//!
//! Covered scenarios:
//! - `session_delivers_packet_then_clean_exit`: Parse one dump, observe Ended(0)
//! - `filter_expression_reaches_the_helper_argv`: Filter lands in the argv slot
//! - `packets_arrive_in_capture_order_before_the_terminal_event`: Ordering + terminal exclusivity
//! - `nonzero_exit_code_is_surfaced_verbatim`: Exit codes pass through uninterpreted
//! - `spawn_failure_reports_failed_event`: Missing elevation binary yields Failed
//! - `stop_terminates_a_long_running_helper`: Best-effort stop ends the session
//! - `exit_is_observed_while_a_grandchild_holds_the_pipe`: Ended does not wait for pipe EOF
//! - `stop_signals_forked_helper_descendants_too`: Stop reaches the whole process group
//! - `resubscribing_moves_delivery_to_the_new_consumer`: Single-slot channel semantics
