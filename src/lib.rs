//! Contribution signals for GitHub issues.
//!
//! Given an issue, the [`engine::Engine`] gathers pull requests that reference it, comments that
//! claim it, forks with related branches, and assignee workload, then scores the issue's momentum
//! and difficulty and resolves a single [`scoring::ContributionStatus`]:
//!
//! - `active-pr` when a pull request already exists,
//! - `claimed` when someone said they would work on it or a fork shows related work,
//! - `clear` otherwise.
//!
//! Remote reads go through a [`transport::Transport`] and a shared freshness [`cache::Cache`]
//! that collapses concurrent duplicate requests. Remote failures never fail an evaluation; the
//! affected component is reported as absent instead.

pub mod cache;
pub mod commands;
pub mod config;
pub mod engine;
pub mod facts;
pub mod reports;
pub mod scoring;
pub mod signals;
pub mod transport;
