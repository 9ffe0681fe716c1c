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

use relay_primitives::{ParaId, H256};

/// Reasons the relay pipeline stops.
///
/// All of these are fatal to the pipeline task; retry/backoff policy lives
/// with the supervisor that spawned it, not here. In particular
/// [`Error::PayloadMissing`] may be transient (the local node has not
/// indexed the payload yet) or permanent (pruned) - the off-chain store
/// cannot tell the two apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// RPC failure against the destination or relay chain.
	#[error("Chain connectivity failure: {0}")]
	Connectivity(String),
	/// The relay chain cannot resolve a block hash for the event's number,
	/// either because the node is not yet synced to that height or because
	/// the block was pruned.
	#[error("No canonical block hash for relay chain block #{0}")]
	BlockHashMissing(u64),
	/// A finality event carried a relay chain block number outside `u64`.
	#[error("Finality event carries invalid relay chain block number {0}")]
	InvalidEventBlockNumber(i64),
	/// The monitored parachain has no head in the committed head set.
	#[error("Parachain {0} has no head committed at the correlated block")]
	HeadNotFound(ParaId),
	/// The separately fetched own head disagrees with the committed set.
	#[error("Own parachain head disagrees with the committed head set")]
	HeadSetMismatch,
	/// An `Other`-tagged digest entry failed to decode as a commitment
	/// announcement. Always well-formed on a matching chain, so this
	/// signals a protocol version mismatch, not a transient fault.
	#[error("Malformed commitment digest entry: {0}")]
	MalformedDigest(codec::Error),
	/// Off-chain storage has no payload under the derived key.
	#[error("Commitment payload {0:?} missing from off-chain storage")]
	PayloadMissing(H256),
	/// The destination chain's new-heads subscription ended.
	#[error("New-heads subscription terminated")]
	SubscriptionTerminated,
	/// The output queue consumer went away.
	#[error("Output queue closed by consumer")]
	QueueClosed,
	/// Cancellation was requested.
	#[error("Relay cancelled")]
	Cancelled,
}
