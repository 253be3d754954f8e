//! Side-effecting skills exposed to the agent as tools.
//!
//! - **[`repo`]**: clone a repository branch and pack it into prompt context.
//! - **[`email`]**: send a plain-text email over SMTP.
//! - **[`rag`]**: validated parameters for the hosted RAG retrieval tool.
//!
//! Skills take an explicit, pre-validated configuration ([`config`]) instead of
//! reading the environment when invoked. Subprocesses go through
//! [`process::CommandRunner`] so tests never spawn `git` or `npx`.

pub mod config;
pub mod email;
pub mod process;
pub mod rag;
pub mod repo;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
