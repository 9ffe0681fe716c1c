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

use codec::{Decode, Encode};

use relay_merkle_tree::{root_from_proof, Hasher, Keccak256};
use relay_primitives::{AuxiliaryDigestItem, DigestItem, MessagePackage, MmrLeaf, ParaId, H256};

use crate::{mmr, Error};

/// Verify a [`MessagePackage`] against the destination chain's finalized
/// MMR root.
///
/// The package is accepted iff all of the following hold:
///
/// 1. the package's `(channel_id, commitment_hash)` pair is announced by an
///    `Other` digest entry of `para_head` - this binds the commitment to the
///    header's `parent_hash`, `number`, `state_root` and `extrinsics_root`
///    through the head encoding hashed in the next step;
/// 2. the head leaf `(para_id, para_head.encode())` proves into a parachain
///    heads root at the claimed position/width of `para_head_proof`;
/// 3. the MMR leaf reconstructed from `mmr_proof`'s partial fields and the
///    root recomputed in step 2 (the embedded heads root is never trusted);
/// 4. proves into `mmr_root` at `mmr_proof`'s leaf index/count.
pub fn verify_message_package(para_id: ParaId, package: &MessagePackage, mmr_root: H256) -> Result<(), Error> {
	if !contains_commitment(package) {
		return Err(Error::CommitmentNotInHeader);
	}

	let head_leaf = (para_id, package.para_head.encode()).encode();
	let siblings: Vec<_> = package.para_head_proof.proof.iter().map(|hash| hash.0).collect();
	let heads_root = root_from_proof::<Keccak256>(
		&siblings,
		package.para_head_proof.width,
		package.para_head_proof.position,
		&head_leaf,
	)
	.ok_or(Error::InvalidHeadProof)?;

	let leaf = MmrLeaf {
		parachain_heads: H256(heads_root),
		..package.mmr_proof.leaf.clone()
	};
	let leaf_hash = H256(Keccak256::hash(&leaf.encode()));

	mmr::verify_leaf_proof(mmr_root, leaf_hash, &package.mmr_proof.proof)
}

/// Scan the header digest for the announcement the package claims.
fn contains_commitment(package: &MessagePackage) -> bool {
	let claimed = AuxiliaryDigestItem::Commitment(package.channel_id, package.commitment_hash);
	package.para_head.digest.logs.iter().any(|log| match log {
		DigestItem::Other(data) => AuxiliaryDigestItem::decode(&mut &data[..]).ok() == Some(claimed),
		_ => false,
	})
}
