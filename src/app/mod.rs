//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the monitor's rules: the scheduling loop, the
//! alert policy and the value types they exchange.  All interaction with
//! hardware and flash happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod model;
pub mod policy;
pub mod ports;
pub mod service;
