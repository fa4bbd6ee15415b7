//! # kb-rank
//!
//! Local knowledge-base snippet ranking for chat context assembly.
//!
//! kb-rank keeps a small knowledge file of short text records and selects
//! which of them to inject as context before a chat completion request,
//! using the lexical relevance engine in [`kb_rank_core`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌─────────────────┐
//! │  Knowledge   │──▶│  Relevance core  │──▶│ Prompt assembly │
//! │  file (JSON) │   │ score + top-K    │   │ system + user   │
//! └──────────────┘   └──────────────────┘   └─────────────────┘
//!         ▲                    ▲
//!         └────── CLI (kbr) ───┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kbr init
//! kbr add "Stringing Blocks: stringing sheaves or conductor blocks."
//! kbr import notes.txt
//! kbr search "stringer block" --explain
//! kbr context "do you rent stringer blocks?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`knowledge`] | JSON-file knowledge store |
//! | [`kb`] | add / list / clear / import commands |
//! | [`search`] | Ranked and naive search |
//! | [`context`] | Prompt assembly command |
//! | [`progress`] | Import progress on stderr |

pub mod config;
pub mod context;
pub mod kb;
pub mod knowledge;
pub mod progress;
pub mod search;
