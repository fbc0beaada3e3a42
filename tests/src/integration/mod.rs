//! # Integration Flows
//!
//! Gateway (01) → Cache (02) → Orchestrator (03) → Presentation (04), wired
//! through `surety-runtime` sessions over the simulated contracts.

pub mod bootstrap_properties;
pub mod insurance_flows;
pub mod recovery;
