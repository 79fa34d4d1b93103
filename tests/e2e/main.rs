//! End-to-end scenarios for the roadmap core.

mod scenarios;
