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

//! Parachain header and digest types.

use codec::{Decode, Encode};

use crate::H256;

/// Identifier of a logical cross-chain message channel.
///
/// Assigned by the sending application on the source chain; determines
/// delivery semantics on the destination chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub enum ChannelId {
	/// Basic delivery channel.
	Basic,
	/// Incentivized delivery channel.
	Incentivized,
}

/// Auxiliary digest item deposited by a channel pallet.
///
/// Carried inside a [`DigestItem::Other`] entry of the parachain header.
/// Decoding one of these from an `Other` entry must never fail - a malformed
/// entry signals a protocol mismatch between relayer and chain, not a
/// transient fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum AuxiliaryDigestItem {
	/// A hash standing in for a batch of messages committed by `ChannelId`
	/// in this block. The batch itself lives in off-chain storage.
	Commitment(ChannelId, H256),
}

/// A digest log entry, mirroring the source chain's digest encoding.
///
/// Only [`DigestItem::Other`] entries are interpreted by the relay; the
/// remaining variants are carried opaquely so that header re-encoding stays
/// byte-exact.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum DigestItem {
	/// Opaque runtime-specific entry; channel commitments live here.
	#[codec(index = 0)]
	Other(Vec<u8>),
	/// Changes trie root.
	#[codec(index = 2)]
	ChangesTrieRoot(H256),
	/// Consensus engine message.
	#[codec(index = 4)]
	Consensus([u8; 4], Vec<u8>),
	/// Block seal.
	#[codec(index = 5)]
	Seal([u8; 4], Vec<u8>),
	/// Pre-runtime consensus message.
	#[codec(index = 6)]
	PreRuntime([u8; 4], Vec<u8>),
}

/// An ordered digest log.
#[derive(Debug, Default, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Digest {
	/// Digest entries in deposit order.
	pub logs: Vec<DigestItem>,
}

/// Header of the monitored parachain.
///
/// Head data committed to the relay chain is the SCALE encoding of this
/// struct; `number` is compact-encoded the way the source chain encodes
/// header numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ParaHeader {
	/// Hash of the parent block header.
	pub parent_hash: H256,
	/// Block number.
	#[codec(compact)]
	pub number: u32,
	/// State trie root.
	pub state_root: H256,
	/// Extrinsics trie root.
	pub extrinsics_root: H256,
	/// Digest log; commitment announcements are `Other` entries here.
	pub digest: Digest,
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;

	#[test]
	fn commitment_digest_item_encode_decode() {
		// given
		let item = AuxiliaryDigestItem::Commitment(ChannelId::Basic, H256::repeat_byte(0x05));

		// when
		let encoded = item.encode();
		let decoded = AuxiliaryDigestItem::decode(&mut &*encoded);

		// then
		assert_eq!(decoded, Ok(item));
		assert_eq!(
			encoded,
			hex!("00 00 0505050505050505050505050505050505050505050505050505050505050505")
		);
	}

	#[test]
	fn digest_item_variant_indices_match_host_chain() {
		assert_eq!(DigestItem::Other(vec![]).encode()[0], 0);
		assert_eq!(DigestItem::ChangesTrieRoot(H256::zero()).encode()[0], 2);
		assert_eq!(DigestItem::Consensus(*b"BEEF", vec![]).encode()[0], 4);
		assert_eq!(DigestItem::Seal(*b"aura", vec![]).encode()[0], 5);
		assert_eq!(DigestItem::PreRuntime(*b"aura", vec![]).encode()[0], 6);
	}

	#[test]
	fn header_encode_decode() {
		// given
		let aux = AuxiliaryDigestItem::Commitment(ChannelId::Basic, H256::repeat_byte(0x05));
		let header = ParaHeader {
			parent_hash: H256::zero(),
			number: 5,
			state_root: H256::repeat_byte(0x11),
			extrinsics_root: H256::repeat_byte(0x22),
			digest: Digest {
				logs: vec![DigestItem::Other(aux.encode())],
			},
		};

		// when
		let encoded = header.encode();
		let decoded = ParaHeader::decode(&mut &*encoded);

		// then
		assert_eq!(decoded, Ok(header));
		assert_eq!(
			encoded,
			hex!(
				"0000000000000000000000000000000000000000000000000000000000000000
				 14
				 1111111111111111111111111111111111111111111111111111111111111111
				 2222222222222222222222222222222222222222222222222222222222222222
				 04 00 88 00 00 0505050505050505050505050505050505050505050505050505050505050505"
			)
		);
	}

	#[test]
	fn non_other_digest_entries_round_trip() {
		// given
		let digest = Digest {
			logs: vec![
				DigestItem::PreRuntime(*b"aura", vec![1, 2, 3]),
				DigestItem::Other(vec![0xde, 0xad]),
				DigestItem::Seal(*b"aura", vec![4, 5]),
			],
		};

		// when
		let encoded = digest.encode();
		let decoded = Digest::decode(&mut &*encoded);

		// then
		assert_eq!(decoded, Ok(digest));
	}
}
