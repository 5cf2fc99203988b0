//! Integration Tests
//!
//! End-to-end tests for the REACT loop and the repair agent, driven by a
//! scripted model client and static research tools so no network or real
//! model is involved.

// Shared mocks and content builders
mod support;

// REACT loop: budgets, guardrails, happy path, failure paths
mod react_loop_test;

// Repair agent: strict-decrease acceptance, round-trip validation
mod repair_test;
