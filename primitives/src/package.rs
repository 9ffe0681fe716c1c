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

//! The proof-carrying unit handed to submission workers.

use codec::{Decode, Encode};

use crate::{ChannelId, MmrLeaf, MmrLeafProof, ParaHeader, H256};

/// Merkle inclusion proof for one parachain head.
///
/// Proves that the head hash sits at leaf `position` of a binary merkle tree
/// of `width` leaves whose root the relay chain committed into the MMR leaf
/// for the same block.
#[derive(Debug, Default, PartialEq, Eq, Clone, Encode, Decode)]
pub struct ParaHeadProof {
	/// Leaf position in canonical (ascending para id) order.
	pub position: u64,
	/// Total number of leaves in the tree.
	pub width: u64,
	/// Sibling hashes, bottom up.
	pub proof: Vec<H256>,
}

/// An MMR leaf together with its inclusion proof, exactly as served by the
/// relay chain. The pipeline does no recomputation on these - transport only.
#[derive(Debug, Default, PartialEq, Eq, Clone, Encode, Decode)]
pub struct MmrProof {
	/// The proven leaf.
	pub leaf: MmrLeaf,
	/// Inclusion proof for the leaf.
	pub proof: MmrLeafProof,
}

/// One fully-proven commitment, ready for submission to the destination
/// chain.
///
/// Every field must be mutually consistent: `para_head_proof` proves
/// inclusion of the head hash derived from exactly `para_head` (whose digest
/// announces `commitment_hash`), and the root it proves into is the one the
/// verifier re-embeds into `mmr_proof`'s leaf. Packages are transient; none
/// survive a process restart.
#[derive(Debug, PartialEq, Eq, Clone, Encode, Decode)]
pub struct MessagePackage {
	/// Channel the commitment belongs to.
	pub channel_id: ChannelId,
	/// Hash standing in for the committed message batch.
	pub commitment_hash: H256,
	/// The committed message batch, fetched from off-chain storage. The
	/// fetcher does not check `hash(commitment_data) == commitment_hash`;
	/// that is the consumer's responsibility.
	pub commitment_data: Vec<u8>,
	/// Header of the parachain block that announced the commitment.
	pub para_head: ParaHeader,
	/// Inclusion proof of the head in the relay chain's parachain heads
	/// commitment.
	pub para_head_proof: ParaHeadProof,
	/// MMR leaf and proof for the correlated relay chain block.
	pub mmr_proof: MmrProof,
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{AuxiliaryDigestItem, BeefyNextAuthoritySet, Digest, DigestItem};

	fn package() -> MessagePackage {
		let commitment_hash = H256::repeat_byte(0xaa);
		let aux = AuxiliaryDigestItem::Commitment(ChannelId::Basic, commitment_hash);
		MessagePackage {
			channel_id: ChannelId::Basic,
			commitment_hash,
			commitment_data: vec![1, 2, 3, 4],
			para_head: ParaHeader {
				parent_hash: H256::repeat_byte(0x01),
				number: 7,
				state_root: H256::repeat_byte(0x02),
				extrinsics_root: H256::repeat_byte(0x03),
				digest: Digest {
					logs: vec![DigestItem::Other(aux.encode())],
				},
			},
			para_head_proof: ParaHeadProof {
				position: 1,
				width: 4,
				proof: vec![H256::repeat_byte(0x04), H256::repeat_byte(0x05)],
			},
			mmr_proof: MmrProof {
				leaf: MmrLeaf {
					parent_number_and_hash: (6, H256::repeat_byte(0x06)),
					parachain_heads: H256::repeat_byte(0x07),
					beefy_next_authority_set: BeefyNextAuthoritySet::default(),
				},
				proof: MmrLeafProof {
					leaf_index: 6,
					leaf_count: 7,
					items: vec![H256::repeat_byte(0x08)],
				},
			},
		}
	}

	#[test]
	fn message_package_encode_decode() {
		// given
		let package = package();

		// when
		let encoded = package.encode();
		let decoded = MessagePackage::decode(&mut &*encoded);

		// then
		assert_eq!(decoded, Ok(package));
	}
}
