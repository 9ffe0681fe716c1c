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

//! Chain access seams.
//!
//! The pipeline consumes chain state exclusively through these traits;
//! wire-level RPC clients and contract bindings implement them elsewhere.
//! Implementations are externally-owned shared connections, safe for this
//! pipeline's sequential use - no pooling or locking happens at this layer.

use async_trait::async_trait;
use futures::stream::BoxStream;

use relay_primitives::{MmrProof, ParaHead, ParaHeader, ParaId, H256};

use crate::Error;

/// A new destination chain block header, reduced to what the pipeline
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationHeader {
	/// Destination chain block number.
	pub number: u64,
}

/// A finality event logged by the destination chain's light client
/// contract: a new MMR root has been accepted as finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalityEvent {
	/// The relay chain block number the new MMR root attests to, as
	/// decoded from the contract event (the contract ABI makes this
	/// signed).
	pub relay_block_number: i64,
	/// Destination chain block the event was logged in.
	pub block_number: u64,
	/// Destination chain transaction that produced the event.
	pub transaction_hash: H256,
}

/// Stream of destination chain head announcements.
pub type DestinationHeaders = BoxStream<'static, DestinationHeader>;

/// Queries against the destination chain and its light client contract.
#[async_trait]
pub trait DestinationClient: Send + Sync + 'static {
	/// Subscribe to new head announcements.
	async fn subscribe_new_heads(&self) -> Result<DestinationHeaders, Error>;

	/// Current best block number.
	async fn best_block_number(&self) -> Result<u64, Error>;

	/// Finality events logged in the inclusive block range `[from, to]`,
	/// in log order.
	async fn finality_events(&self, from: u64, to: u64) -> Result<Vec<FinalityEvent>, Error>;
}

/// Queries against the relay chain, all pinned to one block hash so that
/// every read in a pipeline round sees a consistent state.
#[async_trait]
pub trait RelaychainClient: Send + Sync + 'static {
	/// Canonical block hash for `number`.
	async fn block_hash(&self, number: u64) -> Result<H256, Error>;

	/// The full set of parachain heads committed at `at`, keyed by para id.
	/// Order is not guaranteed; callers sort canonically.
	async fn parachain_heads(&self, at: H256) -> Result<Vec<(ParaId, ParaHead)>, Error>;

	/// Decoded header of one parachain at `at`.
	async fn parachain_head(&self, at: H256, para_id: ParaId) -> Result<ParaHeader, Error>;

	/// Chain-generated MMR inclusion proof for the leaf of block
	/// `leaf_number`, served against the state at `at`.
	async fn generate_mmr_proof(&self, leaf_number: u64, at: H256) -> Result<MmrProof, Error>;
}

/// Reads from the parachain node's local off-chain storage.
///
/// Off-chain storage is not part of chain state; reads always reflect the
/// node's present view, never a historical block.
#[async_trait]
pub trait OffchainClient: Send + Sync + 'static {
	/// Fetch the value under `key` from the persistent off-chain store.
	async fn persistent_get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error>;
}
