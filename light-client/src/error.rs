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

use displaydoc::Display;

/// Package verification failure.
///
/// Any single failure rejects the whole package; partial trust is not
/// supported.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// claimed commitment is not announced in the header digest
	CommitmentNotInHeader,
	/// parachain head inclusion proof is inconsistent with its position/width
	InvalidHeadProof,
	/// mmr proof shape is inconsistent with its leaf index/count
	InvalidMmrProof,
	/// reconstructed mmr leaf does not prove into the finalized mmr root
	MmrRootMismatch,
}

impl std::error::Error for Error {}
