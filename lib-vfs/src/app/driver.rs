//! Local block driver
//!
//! The consensus engine is an external collaborator; inside this
//! repository it is modeled as a caller that invokes the block lifecycle
//! in a fixed sequence. [`LocalDriver`] is that caller: it runs one full
//! round (prepare, process, finalize at the next height, commit) against
//! a locally owned application. The transaction factory and the scenario
//! tests drive blocks through it.

use super::types::{ExecTxResult, ProposalStatus};
use super::{AppError, VStoreApp};

/// The outcome of one driven block round
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// The height the block was finalized at
    pub height: i64,
    /// The app-hash after the commit
    pub app_hash: [u8; 32],
    /// Per-transaction results, in proposal order
    pub tx_results: Vec<ExecTxResult>,
}

/// Drives the application through complete block rounds
pub struct LocalDriver {
    app: VStoreApp,
}

impl LocalDriver {
    /// Take ownership of an application to drive
    pub fn new(app: VStoreApp) -> Self {
        Self { app }
    }

    /// The driven application
    pub fn app(&self) -> &VStoreApp {
        &self.app
    }

    /// Mutable access to the driven application
    pub fn app_mut(&mut self) -> &mut VStoreApp {
        &mut self.app
    }

    /// Release the application
    pub fn into_app(self) -> VStoreApp {
        self.app
    }

    /// Run one block round over the given transactions
    ///
    /// Invalid transactions are filtered out by the prepare step, the
    /// surviving proposal is validated, finalized at `height + 1` and
    /// committed. Fails with [`AppError::Rejected`] when validation
    /// rejects the proposal, or with the commit's error when persistence
    /// fails.
    pub fn commit_round(&mut self, txs: &[Vec<u8>]) -> Result<RoundOutcome, AppError> {
        let accepted = self.app.prepare_proposal(txs);

        if self.app.process_proposal(&accepted) == ProposalStatus::Reject {
            return Err(AppError::Rejected);
        }

        let height = self.app.state().height + 1;
        let finalized = self.app.finalize_block(height, &accepted);
        self.app.commit()?;

        Ok(RoundOutcome {
            height,
            app_hash: finalized.app_hash,
            tx_results: finalized.tx_results,
        })
    }
}
