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

//! MMR inclusion checking against the finalized root.

use relay_merkle_tree::{Hasher, Keccak256};
use relay_primitives::{MmrLeafProof, H256};

use crate::Error;

/// An MMR node: the keccak-256 hash of either a SCALE-encoded leaf or of
/// two child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeHash(pub H256);

/// Keccak-256 node merging, matching the relay chain's MMR hashing.
pub struct MergeKeccak;

impl mmr_lib::Merge for MergeKeccak {
	type Item = NodeHash;

	fn merge(lhs: &NodeHash, rhs: &NodeHash) -> mmr_lib::Result<NodeHash> {
		let mut combined = [0_u8; 64];
		combined[0..32].copy_from_slice(lhs.0.as_bytes());
		combined[32..64].copy_from_slice(rhs.0.as_bytes());
		Ok(NodeHash(H256(Keccak256::hash(&combined))))
	}
}

/// Check that `leaf_hash` is the leaf at `proof.leaf_index` of an MMR with
/// `proof.leaf_count` leaves whose root is `root`.
///
/// The leaf index/count pair served by the chain is translated to the MMR's
/// internal node positions; a proof whose shape does not fit that geometry
/// is rejected as [`Error::InvalidMmrProof`], a well-formed proof for a
/// different root as [`Error::MmrRootMismatch`].
pub fn verify_leaf_proof(root: H256, leaf_hash: H256, proof: &MmrLeafProof) -> Result<(), Error> {
	if proof.leaf_count == 0 || proof.leaf_index >= proof.leaf_count {
		return Err(Error::InvalidMmrProof);
	}

	let mmr_size = mmr_lib::leaf_index_to_mmr_size(proof.leaf_count - 1);
	let position = mmr_lib::leaf_index_to_pos(proof.leaf_index);

	let proof = mmr_lib::MerkleProof::<NodeHash, MergeKeccak>::new(
		mmr_size,
		proof.items.iter().map(|hash| NodeHash(*hash)).collect(),
	);

	match proof.verify(NodeHash(root), vec![(position, NodeHash(leaf_hash))]) {
		Ok(true) => Ok(()),
		Ok(false) => Err(Error::MmrRootMismatch),
		Err(_) => Err(Error::InvalidMmrProof),
	}
}
