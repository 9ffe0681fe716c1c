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

//! Binary merkle tree used for the parachain heads commitment.
//!
//! The construction here is the one the relay chain runtime applies before
//! committing the heads root into its MMR leaf: leaves are hashed once,
//! rows are hashed pairwise, and the last node of an odd row is promoted to
//! the next row unchanged (no duplication padding). Prover and verifier both
//! call into this crate, so the two sides cannot drift apart.

#![warn(missing_docs)]

/// A 32-byte hash output.
pub type Hash = [u8; 32];

/// Supported hashing output over byte slices.
pub trait Hasher {
	/// Hash `data` into a fixed-size output.
	fn hash(data: &[u8]) -> Hash;
}

/// Keccak-256 hasher, the scheme the destination chain natively supports.
#[cfg(feature = "keccak")]
pub struct Keccak256;

#[cfg(feature = "keccak")]
impl Hasher for Keccak256 {
	fn hash(data: &[u8]) -> Hash {
		use tiny_keccak::{Hasher as _, Keccak};

		let mut keccak = Keccak::v256();
		keccak.update(data);
		let mut output = [0_u8; 32];
		keccak.finalize(&mut output);
		output
	}
}

/// An inclusion proof for a single leaf.
///
/// The leaf value itself is not part of the proof; the verifier is expected
/// to reconstruct it independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
	/// Root hash of the full tree.
	pub root: Hash,
	/// Sibling hashes on the path from the leaf to the root, bottom up.
	/// Rows where the leaf's node was promoted contribute no entry.
	pub proof: Vec<Hash>,
	/// Number of leaves in the tree.
	pub number_of_leaves: u64,
	/// Index of the proven leaf.
	pub leaf_index: u64,
}

/// Compute the merkle root of an ordered set of leaves.
///
/// An empty set yields the all-zero hash.
pub fn merkle_root<H, I, T>(leaves: I) -> Hash
where
	H: Hasher,
	I: IntoIterator<Item = T>,
	T: AsRef<[u8]>,
{
	let mut row: Vec<Hash> = leaves.into_iter().map(|l| H::hash(l.as_ref())).collect();
	if row.is_empty() {
		return Hash::default();
	}

	while row.len() > 1 {
		row = merkelize_row::<H>(row);
	}
	row[0]
}

/// Construct an inclusion proof for the leaf at `leaf_index`.
///
/// The leaf set must be in canonical order - the same order the root was
/// committed with. Panics if `leaf_index` is out of bounds; callers locate
/// their leaf in the set before asking for a proof.
pub fn merkle_proof<H, I, T>(leaves: I, leaf_index: u64) -> MerkleProof
where
	H: Hasher,
	I: IntoIterator<Item = T>,
	T: AsRef<[u8]>,
{
	let mut row: Vec<Hash> = leaves.into_iter().map(|l| H::hash(l.as_ref())).collect();
	let number_of_leaves = row.len() as u64;
	assert!(
		leaf_index < number_of_leaves,
		"leaf index out of bounds: {} vs {}",
		leaf_index,
		number_of_leaves
	);

	let mut proof = Vec::new();
	let mut position = leaf_index as usize;
	while row.len() > 1 {
		if position % 2 == 0 {
			if position + 1 < row.len() {
				proof.push(row[position + 1]);
			}
			// else: odd row, our node is promoted without a sibling
		} else {
			proof.push(row[position - 1]);
		}
		row = merkelize_row::<H>(row);
		position /= 2;
	}

	MerkleProof {
		root: row[0],
		proof,
		number_of_leaves,
		leaf_index,
	}
}

/// Recompute the root a proof commits to, given the raw leaf value.
///
/// Returns `None` when the proof shape is inconsistent with the claimed
/// `number_of_leaves`/`leaf_index` (missing or surplus siblings, index out
/// of range). This is the building block the destination-side verifier uses
/// to re-derive the parachain heads root rather than trusting an embedded
/// one.
pub fn root_from_proof<H: Hasher>(proof: &[Hash], number_of_leaves: u64, leaf_index: u64, leaf: &[u8]) -> Option<Hash> {
	if number_of_leaves == 0 || leaf_index >= number_of_leaves {
		return None;
	}

	let mut node = H::hash(leaf);
	let mut position = leaf_index;
	let mut width = number_of_leaves;
	let mut siblings = proof.iter();
	let mut combined = [0_u8; 64];

	while width > 1 {
		if position % 2 == 0 && position + 1 == width {
			// odd row, node promoted unchanged
		} else {
			let sibling = siblings.next()?;
			if position % 2 == 0 {
				combined[0..32].copy_from_slice(&node);
				combined[32..64].copy_from_slice(sibling);
			} else {
				combined[0..32].copy_from_slice(sibling);
				combined[32..64].copy_from_slice(&node);
			}
			node = H::hash(&combined);
		}
		position /= 2;
		width = (width + 1) / 2;
	}

	if siblings.next().is_some() {
		return None;
	}
	Some(node)
}

/// Verify an inclusion proof against a known root.
pub fn verify_proof<H: Hasher>(
	root: &Hash,
	proof: &[Hash],
	number_of_leaves: u64,
	leaf_index: u64,
	leaf: &[u8],
) -> bool {
	root_from_proof::<H>(proof, number_of_leaves, leaf_index, leaf).as_ref() == Some(root)
}

/// Hash one tree row into the next. The last node of an odd row is promoted
/// to the upper row unchanged.
fn merkelize_row<H: Hasher>(row: Vec<Hash>) -> Vec<Hash> {
	let mut next = Vec::with_capacity((row.len() + 1) / 2);
	let mut combined = [0_u8; 64];
	let mut iter = row.chunks_exact(2);

	for pair in &mut iter {
		combined[0..32].copy_from_slice(&pair[0]);
		combined[32..64].copy_from_slice(&pair[1]);
		next.push(H::hash(&combined));
	}
	if let [odd] = iter.remainder() {
		next.push(*odd);
	}

	next
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;

	#[test]
	fn should_generate_empty_root() {
		// given
		let data: Vec<[u8; 1]> = Default::default();

		// when
		let out = merkle_root::<Keccak256, _, _>(data);

		// then
		assert_eq!(
			hex::encode(&out),
			"0000000000000000000000000000000000000000000000000000000000000000"
		);
	}

	#[test]
	fn should_generate_single_root() {
		// given
		let data = vec![hex!("E04CC55ebEE1cBCE552f250e85c57B70B2E2625b")];

		// when
		let out = merkle_root::<Keccak256, _, _>(data);

		// then
		assert_eq!(
			hex::encode(&out),
			"aeb47a269393297f4b0a3c9c9cfd00c7a4195255274cf39d83dabc2fcc9ff3d7"
		);
	}

	#[test]
	fn should_generate_root_pow_2() {
		// given
		let data = vec![
			hex!("E04CC55ebEE1cBCE552f250e85c57B70B2E2625b"),
			hex!("25451A4de12dcCc2D166922fA938E900fCc4ED24"),
		];

		// when
		let out = merkle_root::<Keccak256, _, _>(data);

		// then
		assert_eq!(
			hex::encode(&out),
			"697ea2a8fe5b03468548a7a413424a6292ab44a82a6f5cc594c3fa7dda7ce402"
		);
	}

	#[test]
	fn should_generate_root_complex() {
		let test = |root, data| {
			assert_eq!(hex::encode(&merkle_root::<Keccak256, _, _>(data)), root);
		};

		test(
			"aff1208e69c9e8be9b584b07ebac4e48a1ee9d15ce3afe20b77a4d29e4175aa3",
			vec!["a", "b", "c"],
		);

		test(
			"b8912f7269068901f231a965adfefbc10f0eedcfa61852b103efd54dac7db3d7",
			vec!["a", "b", "a"],
		);

		test(
			"dc8e73fe6903148ff5079baecc043983625c23b39f31537e322cd0deee09fa9c",
			vec!["a", "b", "a", "b"],
		);

		test(
			"fb3b3be94be9e983ba5e094c9c51a7d96a4fa2e5d8e891df00ca89ba05bb1239",
			vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"],
		);
	}

	#[test]
	fn should_generate_and_verify_proofs() {
		let leaves: Vec<String> = (0..=10).map(|i| format!("leaf-{}", i)).collect();

		for width in 1..=leaves.len() {
			let set = &leaves[0..width];
			let root = merkle_root::<Keccak256, _, _>(set);

			for index in 0..width as u64 {
				// when
				let proof = merkle_proof::<Keccak256, _, _>(set, index);

				// then
				assert_eq!(proof.root, root);
				assert_eq!(proof.number_of_leaves, width as u64);
				assert_eq!(proof.leaf_index, index);
				assert!(verify_proof::<Keccak256>(
					&root,
					&proof.proof,
					width as u64,
					index,
					set[index as usize].as_bytes(),
				));
			}
		}
	}

	#[test]
	fn should_reject_wrong_leaf() {
		// given
		let leaves = vec!["a", "b", "c", "d", "e"];
		let proof = merkle_proof::<Keccak256, _, _>(leaves.clone(), 2);

		// then
		assert!(!verify_proof::<Keccak256>(
			&proof.root,
			&proof.proof,
			5,
			2,
			b"x",
		));
	}

	#[test]
	fn should_reject_tampered_proof() {
		// given
		let leaves = vec!["a", "b", "c", "d", "e", "f", "g"];
		let mut proof = merkle_proof::<Keccak256, _, _>(leaves.clone(), 3);

		// when
		proof.proof[0][0] ^= 0x01;

		// then
		assert!(!verify_proof::<Keccak256>(
			&proof.root,
			&proof.proof,
			7,
			3,
			b"d",
		));
	}

	#[test]
	fn should_reject_wrong_position_or_width() {
		// given
		let leaves = vec!["a", "b", "c", "d", "e"];
		let proof = merkle_proof::<Keccak256, _, _>(leaves.clone(), 2);

		// then: shifted position and inflated width both fail
		assert!(!verify_proof::<Keccak256>(&proof.root, &proof.proof, 5, 3, b"c"));
		assert!(root_from_proof::<Keccak256>(&proof.proof, 6, 2, b"c") != Some(proof.root));
		assert!(root_from_proof::<Keccak256>(&proof.proof, 5, 5, b"c").is_none());
		assert!(root_from_proof::<Keccak256>(&proof.proof, 0, 0, b"c").is_none());
	}
}
