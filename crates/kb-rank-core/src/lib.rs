//! # kb-rank core
//!
//! Pure, synchronous lexical relevance engine for selecting which
//! knowledge-base snippets are injected as context before a chat
//! completion request, plus the small collaborator surface around it
//! (knowledge store trait, in-memory store, prompt assembly).
//!
//! This crate contains no tokio runtime, filesystem I/O, or CLI code.
//!
//! ## Pipeline
//!
//! ```text
//! query ──▶ tokenize_query ──┐
//!                            ├──▶ Scorer ──▶ Ranker (desc score, corpus order) ──▶ top-K
//! corpus ─▶ RecordTokens ────┘      ▲
//!                                   └── BridgeTable (configured variant rules)
//! ```
//!
//! ## Example
//!
//! ```rust
//! let corpus = [
//!     "Stringing Blocks: stringing sheaves or conductor blocks.",
//!     "Office hours are 9 to 5.",
//! ];
//! let top = kb_rank_core::rank::rank("stringer block", &corpus, 5);
//! assert_eq!(top, vec![corpus[0]]);
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`tokenize`] | Query and record tokenization |
//! | [`bridge`] | Controlled vocabulary bridge rules |
//! | [`score`] | Per-record relevance scoring |
//! | [`rank`] | Top-K selection with stable tie-break |
//! | [`index`] | Optional cached record tokens |
//! | [`models`] | Knowledge record type |
//! | [`store`] | Knowledge store trait and in-memory backend |
//! | [`prompt`] | Chat prompt assembly |

pub mod bridge;
pub mod index;
pub mod models;
pub mod prompt;
pub mod rank;
pub mod score;
pub mod store;
pub mod tokenize;
