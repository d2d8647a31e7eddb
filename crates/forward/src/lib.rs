// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Re-emission of admitted traps to a downstream SNMP receiver via an
//! external command-line forwarder.

mod forwarder;
mod translate;

pub use forwarder::{
    CommandTrapForwarder, ForwardConfig, ForwardError, ForwardInvocation, ForwardVersion,
    NoopTrapForwarder, TrapForwarder,
};
pub use translate::{translate_varbinds, Varbind};
