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

//! The commitment relay pipeline.
//!
//! Watches the destination chain's light client contract for finality
//! events, correlates each event back to the relay chain block it attests
//! to, collects the parachain head set and MMR leaf proof at that block,
//! extracts channel commitments from the monitored parachain's header
//! digest, resolves their off-chain payloads and emits one fully-proven
//! [`MessagePackage`] per commitment into a bounded output queue.
//!
//! The pipeline is single-flight: one background task, strictly sequential
//! per finality event, so packages for an earlier relay chain block are
//! always emitted before packages for a later one. Chain access goes through
//! the traits in [`chain`]; clients and the logger target are injected, the
//! pipeline owns no global state.

use std::sync::Arc;

use futures::channel::{mpsc, oneshot};

use relay_primitives::MessagePackage;

pub mod chain;
pub mod error;

mod worker;


pub use error::Error;
pub use worker::{CommitmentWorker, WorkerConfig};

/// Producing half of the output queue.
pub type MessagePackageSender = mpsc::Sender<MessagePackage>;

/// Consuming half of the output queue, read by a submission worker.
pub type MessagePackageReceiver = mpsc::Receiver<MessagePackage>;

/// Create the bounded output queue.
///
/// Publishing into a full queue blocks the pipeline (backpressure); the
/// queue is closed once the pipeline exits, signalling consumers there will
/// be no more packages.
pub fn package_channel(capacity: usize) -> (MessagePackageSender, MessagePackageReceiver) {
	mpsc::channel(capacity)
}

/// Run the commitment relay until it fails or is cancelled.
///
/// Intended to be spawned inside a supervised task group: the returned
/// error is the reason the pipeline stopped and the supervisor decides
/// whether to restart or alert. Completing `shutdown` (or dropping its
/// sender) triggers an orderly stop with [`Error::Cancelled`]. The output
/// queue is closed on every exit path.
pub async fn start_commitment_relay<D, R, O>(
	destination: Arc<D>,
	relaychain: Arc<R>,
	offchain: Arc<O>,
	config: WorkerConfig,
	packages: MessagePackageSender,
	shutdown: oneshot::Receiver<()>,
) -> Result<(), Error>
where
	D: chain::DestinationClient,
	R: chain::RelaychainClient,
	O: chain::OffchainClient,
{
	CommitmentWorker::new(destination, relaychain, offchain, config, packages)
		.run(shutdown)
		.await
}
