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

//! Data types shared between the commitment relay pipeline and the
//! destination-side verifier.
//!
//! Everything in here is SCALE-encodable and must stay bit-compatible with
//! what the source chain produces: header digests, parachain head data, MMR
//! leaves and the off-chain storage key scheme. A divergence here does not
//! fail loudly - it silently breaks proof soundness - so encodings are pinned
//! by tests against known vectors.

use codec::{Decode, Encode};

pub use primitive_types::H256;

mod digest;
mod package;

pub use digest::{AuxiliaryDigestItem, ChannelId, Digest, DigestItem, ParaHeader};
pub use package::{MessagePackage, MmrProof, ParaHeadProof};

/// Identifier of a parachain registered on the relay chain.
pub type ParaId = u32;

/// Opaque, SCALE-encoded parachain head data, exactly as committed to
/// relay chain storage.
pub type ParaHead = Vec<u8>;

/// Root hash of the MMR the destination chain's light client tracks.
pub type MmrRootHash = H256;

/// An MMR leaf dedicated to one relay chain block (should be matching the
/// leaf structure in the Polkadot repo).
///
/// The leaf commits to its parent block (a leaf for block `N` can only be
/// appended once `N` exists, hence the pipeline always proves leaf `N - 1`
/// for a finalized block `N`), to the merkle root of all registered
/// parachain heads at that block, and to the next BEEFY authority set.
#[derive(Debug, Default, PartialEq, Eq, Clone, Encode, Decode)]
pub struct MmrLeaf {
	/// Current block parent number and hash.
	pub parent_number_and_hash: (u32, H256),
	/// A merkle root of all registered parachain heads.
	pub parachain_heads: H256,
	/// A merkle root of the next BEEFY authority set.
	pub beefy_next_authority_set: BeefyNextAuthoritySet,
}

/// Details of the next BEEFY authority set.
#[derive(Debug, Default, PartialEq, Eq, Clone, Encode, Decode)]
pub struct BeefyNextAuthoritySet {
	/// Id of the next set.
	pub id: u64,
	/// Number of validators in the set.
	pub len: u32,
	/// Merkle Root Hash built from BEEFY uncompressed AuthorityIds.
	pub root: H256,
}

/// An MMR inclusion proof as served by the relay chain's
/// `mmr_generateProof` RPC.
#[derive(Debug, Default, PartialEq, Eq, Clone, Encode, Decode)]
pub struct MmrLeafProof {
	/// Index of the proven leaf.
	pub leaf_index: u64,
	/// Number of leaves in the MMR at the time the proof was generated.
	pub leaf_count: u64,
	/// Sibling/peak hashes, bottom up.
	pub items: Vec<H256>,
}

/// Derive the deterministic off-chain storage key under which the source
/// chain indexed a commitment's payload.
///
/// Must match the channel pallet's `make_offchain_key`: the SCALE encoding
/// of `(prefix, channel_id, commitment_hash)`.
pub fn offchain_commitment_key(prefix: &[u8], channel_id: ChannelId, commitment_hash: H256) -> Vec<u8> {
	(prefix, channel_id, commitment_hash).encode()
}
