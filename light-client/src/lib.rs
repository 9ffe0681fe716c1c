// Copyright (C) 2021 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Destination-side verification of [`relay_primitives::MessagePackage`]s.
//!
//! This is the consumer dual of the relay pipeline's proof construction: a
//! pure function, no I/O, that accepts a package iff the proof chain
//! head hash -> parachain heads root -> MMR leaf -> finalized MMR root is
//! internally consistent. It deliberately shares its hashing and tree code
//! with the prover (`relay-merkle-tree`, `relay-primitives` encodings), so
//! any divergence between the two sides is a compile-time impossibility
//! rather than a silent soundness hole.

mod error;
mod mmr;
mod verifier;

pub use error::Error;
pub use mmr::verify_leaf_proof;
pub use verifier::verify_message_package;

// Test fixtures elsewhere in the workspace build MMRs with the same merge
// rule the verifier checks against.
pub use mmr::{MergeKeccak, NodeHash};
