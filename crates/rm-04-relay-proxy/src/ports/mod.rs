//! Outbound ports for the relay proxy subsystem.

pub mod outbound;
