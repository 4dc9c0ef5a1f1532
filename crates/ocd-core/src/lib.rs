//! # ocd-core
//!
//! Core types shared by every OCD crate:
//! - Entity structs for decisions, subject items, and audit entries
//! - Agent, feedback, and item-status enums with the kanban transition rules
//! - Typed per-agent state/action payloads
//! - Outcome metrics and their field-level merge
//! - ID prefix constants
//! - The JSONL trail envelope and CLI response types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod outcome;
pub mod payload;
pub mod responses;
pub mod trail;
