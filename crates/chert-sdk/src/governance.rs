//! Governance proposals and voting.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use crate::client::ChertClient;
use crate::error::{Result, SdkError};
use crate::transaction::validate_fee;
use crate::types::{Proposal, VoteOption, VoteTally};

#[derive(Debug, Clone, Deserialize)]
struct ProposalReceipt {
    proposal_id: String,
}

pub struct GovernanceManager<'a> {
    client: &'a ChertClient,
}

impl<'a> GovernanceManager<'a> {
    pub(crate) fn new(client: &'a ChertClient) -> Self {
        Self { client }
    }

    pub async fn get_proposals(&self, limit: u32) -> Result<Vec<Proposal>> {
        let params = if limit > 0 {
            json!([{"limit": limit}])
        } else {
            json!([{}])
        };
        self.client.rpc_call("governance_getProposals", params).await
    }

    pub async fn get_proposal(&self, proposal_id: &str) -> Result<Proposal> {
        if proposal_id.is_empty() {
            return Err(SdkError::validation(
                "proposal_id",
                "Proposal ID cannot be empty",
            ));
        }
        self.client
            .rpc_call("governance_getProposal", json!([proposal_id]))
            .await
    }

    /// Submit a new proposal. Returns the assigned proposal ID.
    pub async fn create_proposal(
        &self,
        title: &str,
        description: &str,
        proposer_address: &str,
        fee: &str,
    ) -> Result<String> {
        if title.is_empty() || description.is_empty() {
            return Err(SdkError::validation(
                "proposal",
                "Title and description are required",
            ));
        }
        validate_fee(fee)?;

        let receipt: ProposalReceipt = self
            .client
            .rpc_call(
                "governance_createProposal",
                json!([{
                    "title": title,
                    "description": description,
                    "proposer": proposer_address,
                    "fee": fee,
                }]),
            )
            .await?;
        Ok(receipt.proposal_id)
    }

    /// Cast a vote. Returns the transaction hash.
    pub async fn vote(
        &self,
        proposal_id: &str,
        voter_address: &str,
        option: VoteOption,
        fee: &str,
    ) -> Result<String> {
        if proposal_id.is_empty() {
            return Err(SdkError::validation(
                "proposal_id",
                "Proposal ID cannot be empty",
            ));
        }
        validate_fee(fee)?;

        let receipt = self
            .client
            .submit_payload(
                "governance_vote",
                json!({
                    "proposal_id": proposal_id,
                    "voter": voter_address,
                    "option": option,
                    "fee": fee,
                }),
            )
            .await?;
        Ok(receipt.transaction_id)
    }

    pub async fn get_proposal_votes(&self, proposal_id: &str) -> Result<VoteTally> {
        self.client
            .rpc_call("governance_getProposalVotes", json!([proposal_id]))
            .await
    }

    pub async fn get_voter_votes(&self, voter_address: &str) -> Result<HashMap<String, VoteOption>> {
        self.client
            .rpc_call("governance_getVoterVotes", json!([voter_address]))
            .await
    }

    /// Execute a passed proposal. Returns the transaction hash.
    pub async fn execute_proposal(
        &self,
        proposal_id: &str,
        executor_address: &str,
        fee: &str,
    ) -> Result<String> {
        validate_fee(fee)?;
        let receipt = self
            .client
            .submit_payload(
                "governance_executeProposal",
                json!({
                    "proposal_id": proposal_id,
                    "executor": executor_address,
                    "fee": fee,
                }),
            )
            .await?;
        Ok(receipt.transaction_id)
    }
}
