//! Staking and delegation operations.

use serde_json::json;

use crate::client::ChertClient;
use crate::error::{Result, SdkError};
use crate::transaction::{validate_amount, validate_fee};
use crate::types::{Delegation, StakingRewards, Validator};

pub struct StakingManager<'a> {
    client: &'a ChertClient,
}

impl<'a> StakingManager<'a> {
    pub(crate) fn new(client: &'a ChertClient) -> Self {
        Self { client }
    }

    pub async fn get_validators(&self) -> Result<Vec<Validator>> {
        self.client
            .rpc_call("getValidators", serde_json::Value::Null)
            .await
    }

    pub async fn get_validator(&self, address: &str) -> Result<Validator> {
        if address.is_empty() {
            return Err(SdkError::validation("address", "Address cannot be empty"));
        }
        self.client.rpc_call("getValidator", json!([address])).await
    }

    /// Delegate tokens to a validator. Returns the transaction hash.
    pub async fn delegate(
        &self,
        delegator_address: &str,
        validator_address: &str,
        amount: &str,
        fee: &str,
    ) -> Result<String> {
        validate_amount(amount)?;
        validate_fee(fee)?;
        let receipt = self
            .client
            .submit_payload(
                "staking_delegate",
                json!({
                    "delegator": delegator_address,
                    "validator_address": validator_address,
                    "amount": amount,
                    "fee": fee,
                }),
            )
            .await?;
        Ok(receipt.transaction_id)
    }

    pub async fn undelegate(
        &self,
        delegator_address: &str,
        validator_address: &str,
        amount: &str,
        fee: &str,
    ) -> Result<String> {
        validate_amount(amount)?;
        validate_fee(fee)?;
        let receipt = self
            .client
            .submit_payload(
                "staking_undelegate",
                json!({
                    "delegator": delegator_address,
                    "validator": validator_address,
                    "amount": amount,
                    "fee": fee,
                }),
            )
            .await?;
        Ok(receipt.transaction_id)
    }

    pub async fn get_delegations(&self, delegator_address: &str) -> Result<Vec<Delegation>> {
        self.client
            .rpc_call("getDelegations", json!([delegator_address]))
            .await
    }

    pub async fn get_staking_rewards(&self, delegator_address: &str) -> Result<StakingRewards> {
        self.client
            .rpc_call("getStakingRewards", json!([delegator_address]))
            .await
    }

    pub async fn claim_rewards(
        &self,
        delegator_address: &str,
        validator_address: &str,
        fee: &str,
    ) -> Result<String> {
        validate_fee(fee)?;
        let receipt = self
            .client
            .submit_payload(
                "staking_claimRewards",
                json!({
                    "delegator": delegator_address,
                    "validator": validator_address,
                    "fee": fee,
                }),
            )
            .await?;
        Ok(receipt.transaction_id)
    }
}
