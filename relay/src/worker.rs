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

use std::convert::TryFrom;
use std::sync::Arc;

use codec::{Decode, Encode};
use futures::{channel::oneshot, FutureExt, SinkExt, StreamExt};
use log::{debug, error, info, warn};

use relay_merkle_tree::{merkle_proof, Keccak256};
use relay_primitives::{
	offchain_commitment_key, AuxiliaryDigestItem, ChannelId, DigestItem, MessagePackage, MmrProof, ParaHead,
	ParaHeadProof, ParaHeader, ParaId, H256,
};

use crate::chain::{DestinationClient, FinalityEvent, OffchainClient, RelaychainClient};
use crate::{Error, MessagePackageSender};

const LOG_TARGET: &str = "commitment-relay";

/// Static pipeline parameters, supplied by the process configuration
/// loader.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
	/// Id of the monitored parachain.
	pub para_id: ParaId,
	/// Off-chain indexing prefix of the channel pallets, part of the
	/// storage key derivation.
	pub indexing_prefix: Vec<u8>,
	/// Destination block the catch-up scan starts from, typically the
	/// light client contract's deployment block or the last block known to
	/// have been handled before a restart.
	pub scan_from: u64,
}

/// The relay worker: one background task driving the whole pipeline.
pub struct CommitmentWorker<D, R, O> {
	destination: Arc<D>,
	relaychain: Arc<R>,
	offchain: Arc<O>,
	config: WorkerConfig,
	packages: MessagePackageSender,
}

impl<D, R, O> CommitmentWorker<D, R, O>
where
	D: DestinationClient,
	R: RelaychainClient,
	O: OffchainClient,
{
	/// Return a new worker instance. Nothing happens until [`run`] is
	/// awaited.
	///
	/// [`run`]: CommitmentWorker::run
	pub fn new(
		destination: Arc<D>,
		relaychain: Arc<R>,
		offchain: Arc<O>,
		config: WorkerConfig,
		packages: MessagePackageSender,
	) -> Self {
		CommitmentWorker {
			destination,
			relaychain,
			offchain,
			config,
			packages,
		}
	}

	/// Drive the pipeline until it fails or `shutdown` fires.
	///
	/// The output queue is closed on every exit path, so consumers observe
	/// end-of-stream rather than a hang. The returned error is the stop
	/// reason; there is no voluntary completion.
	pub async fn run(mut self, shutdown: oneshot::Receiver<()>) -> Result<(), Error> {
		let result = self.run_loop(shutdown).await;
		if let Err(err) = &result {
			info!(target: LOG_TARGET, "Shutting down relay: {}", err);
		}
		self.packages.close_channel();
		result
	}

	async fn run_loop(&mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), Error> {
		let mut headers = self.destination.subscribe_new_heads().await?;
		let mut last_seen = self.destination.best_block_number().await?;

		// Catch-up is best effort: abandoning it costs a restart-window of
		// events, failing hard here would block live subscription forever.
		if self.config.scan_from <= last_seen {
			if let Err(err) = self.catch_up(self.config.scan_from, last_seen).await {
				warn!(target: LOG_TARGET, "Abandoning catch-up scan: {}", err);
			}
		}

		loop {
			futures::select! {
				header = headers.next().fuse() => match header {
					Some(header) => {
						if header.number <= last_seen {
							continue;
						}
						let events = self
							.destination
							.finality_events(last_seen + 1, header.number)
							.await
							.map_err(|err| {
								// finality events cannot be skipped without
								// losing cross-chain liveness
								error!(target: LOG_TARGET, "Failure fetching finality event logs: {}", err);
								err
							})?;
						last_seen = header.number;
						if !events.is_empty() {
							info!(
								target: LOG_TARGET,
								"Found {} finality events up to destination block #{}",
								events.len(),
								header.number,
							);
						}
						self.process_events(events).await?;
					}
					None => return Err(Error::SubscriptionTerminated),
				},
				_ = shutdown => return Err(Error::Cancelled),
			}
		}
	}

	/// Scan `[from, to]` for finality events missed while this relay was
	/// not running.
	async fn catch_up(&mut self, from: u64, to: u64) -> Result<(), Error> {
		debug!(target: LOG_TARGET, "Catch-up scan over destination blocks [{}, {}]", from, to);
		let events = self.destination.finality_events(from, to).await?;
		self.process_events(events).await
	}

	async fn process_events(&mut self, events: Vec<FinalityEvent>) -> Result<(), Error> {
		// strictly sequential: packages for an earlier relay chain block
		// must be emitted before any package for a later one
		for event in events {
			self.process_event(event).await?;
		}
		Ok(())
	}

	async fn process_event(&mut self, event: FinalityEvent) -> Result<(), Error> {
		let number = u64::try_from(event.relay_block_number)
			.map_err(|_| Error::InvalidEventBlockNumber(event.relay_block_number))?;

		info!(
			target: LOG_TARGET,
			"Witnessed new MMR root for relay chain block #{} (destination block #{}, tx {:?})",
			number,
			event.block_number,
			event.transaction_hash,
		);

		// every downstream read is pinned to this hash
		let at = self.relaychain.block_hash(number).await?;
		debug!(target: LOG_TARGET, "Correlated relay chain block #{} to hash {:?}", number, at);

		// An MMR leaf commits to its parent block's header, so the newest
		// leaf available at block N describes block N - 1; the proof is
		// always requested one block behind the finalized number.
		let mmr_proof = self
			.relaychain
			.generate_mmr_proof(number.saturating_sub(1), at)
			.await?;

		let heads = self.relaychain.parachain_heads(at).await?;
		let own_head = self.relaychain.parachain_head(at, self.config.para_id).await?;
		let head_proof = self.parachain_head_proof(heads, &own_head)?;

		let packages = self.extract_commitments(own_head, head_proof, mmr_proof).await?;
		if packages.is_empty() {
			info!(target: LOG_TARGET, "Parachain header has no commitments, skipping");
			return Ok(());
		}

		for package in packages {
			debug!(
				target: LOG_TARGET,
				"Publishing package for channel {:?}, commitment {:?}",
				package.channel_id,
				package.commitment_hash,
			);
			self.packages.send(package).await.map_err(|_| Error::QueueClosed)?;
		}
		Ok(())
	}

	/// Place our head among the full committed set and prove its position.
	fn parachain_head_proof(&self, mut heads: Vec<(ParaId, ParaHead)>, own_head: &ParaHeader) -> Result<ParaHeadProof, Error> {
		// canonical leaf order: ascending para id, the same order the relay
		// chain used when it computed the committed root
		heads.sort();

		let position = heads
			.iter()
			.position(|(id, _)| *id == self.config.para_id)
			.ok_or(Error::HeadNotFound(self.config.para_id))?;
		if heads[position].1 != own_head.encode() {
			return Err(Error::HeadSetMismatch);
		}

		let leaves: Vec<Vec<u8>> = heads.iter().map(|head| head.encode()).collect();
		let proof = merkle_proof::<Keccak256, _, _>(&leaves, position as u64);

		Ok(ParaHeadProof {
			position: proof.leaf_index,
			width: proof.number_of_leaves,
			proof: proof.proof.into_iter().map(H256).collect(),
		})
	}

	/// Decode every commitment announced in the header digest and resolve
	/// its payload; header, head proof and MMR proof are shared by all
	/// packages of the same header.
	async fn extract_commitments(
		&self,
		para_head: ParaHeader,
		head_proof: ParaHeadProof,
		mmr_proof: MmrProof,
	) -> Result<Vec<MessagePackage>, Error> {
		debug!(
			target: LOG_TARGET,
			"Extracting commitments from parachain header #{}",
			para_head.number,
		);

		let mut packages = Vec::new();
		for item in &para_head.digest.logs {
			let data = match item {
				DigestItem::Other(data) => data,
				_ => continue,
			};
			let AuxiliaryDigestItem::Commitment(channel_id, commitment_hash) =
				AuxiliaryDigestItem::decode(&mut &data[..]).map_err(Error::MalformedDigest)?;

			debug!(
				target: LOG_TARGET,
				"Found commitment {:?} for channel {:?} in header digest",
				commitment_hash,
				channel_id,
			);

			let commitment_data = self.fetch_payload(channel_id, commitment_hash).await?;
			packages.push(MessagePackage {
				channel_id,
				commitment_hash,
				commitment_data,
				para_head: para_head.clone(),
				para_head_proof: head_proof.clone(),
				mmr_proof: mmr_proof.clone(),
			});
		}

		Ok(packages)
	}

	async fn fetch_payload(&self, channel_id: ChannelId, commitment_hash: H256) -> Result<Vec<u8>, Error> {
		let key = offchain_commitment_key(&self.config.indexing_prefix, channel_id, commitment_hash);
		match self.offchain.persistent_get(&key).await? {
			Some(data) => {
				debug!(
					target: LOG_TARGET,
					"Retrieved {} byte commitment payload from off-chain storage",
					data.len(),
				);
				Ok(data)
			}
			// not-yet-indexed and pruned look identical here; the
			// supervisor owns the retry policy
			None => Err(Error::PayloadMissing(commitment_hash)),
		}
	}
}
