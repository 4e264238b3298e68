//! Signed tickets authorizing queries against a subscription.
//!
//! A ticket is the CBOR-encoded [`TicketPayload`] followed by the 65-byte
//! EIP-191 signature of its verification message, encoded as URL-safe base64
//! without padding.

use alloy::{
    primitives::{Address, Signature},
    signers::{local::PrivateKeySigner, SignerSync},
};
use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// The length of a raw signature appended to the payload
const SIGNATURE_LEN: usize = 65;

/// The claims carried by a ticket
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TicketPayload {
    /// EIP-155 ID for the chain on which the contract is deployed
    pub chain_id: u64,
    /// Address of the subscriptions contract
    pub contract: Address,
    /// Address associated with the secret key used to sign the ticket
    pub signer: Address,
    /// The subscriber, when different from `signer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Address>,
    /// Optional nice name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comma-separated list of subgraphs that can be queried with this ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_subgraphs: Option<String>,
    /// Comma-separated list of subgraph deployments that can be queried with this ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_deployments: Option<String>,
    /// Comma-separated list of origin domains that can send queries with this ticket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_domains: Option<String>,
}

impl TicketPayload {
    /// The subscriber the ticket is for, defaulting to the signer
    pub fn user(&self) -> Address {
        self.user.unwrap_or(self.signer)
    }

    /// Decode a base64 ticket, checking that its signature matches `signer`
    pub fn from_ticket_base64(ticket: &str) -> Result<(Self, Signature), ScriptError> {
        let ticket = BASE64_URL_SAFE_NO_PAD
            .decode(ticket)
            .map_err(|e| ScriptError::Ticket(format!("invalid base64 (URL, nopad): {}", e)))?;

        let signature_start = ticket.len().saturating_sub(SIGNATURE_LEN);
        let signature = Signature::from_raw(&ticket[signature_start..])
            .map_err(|e| ScriptError::Ticket(format!("invalid signature: {}", e)))?;

        let payload: TicketPayload = ciborium::from_reader(&ticket[..signature_start])
            .map_err(|e| ScriptError::Ticket(format!("invalid payload: {}", e)))?;
        payload.verify(&signature)?;

        Ok((payload, signature))
    }

    /// Sign and encode the ticket as URL-safe base64
    pub fn to_ticket_base64(&self, signer: &PrivateKeySigner) -> Result<String, ScriptError> {
        let ticket = self.encode(signer)?;
        Ok(BASE64_URL_SAFE_NO_PAD.encode(ticket))
    }

    /// Encode the payload as CBOR followed by its signature
    pub fn encode(&self, signer: &PrivateKeySigner) -> Result<Vec<u8>, ScriptError> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).map_err(|e| ScriptError::Ticket(e.to_string()))?;
        buf.extend_from_slice(&self.sign(signer)?.as_bytes());
        Ok(buf)
    }

    /// Sign the verification message with EIP-191 prefixing
    pub fn sign(&self, signer: &PrivateKeySigner) -> Result<Signature, ScriptError> {
        signer
            .sign_message_sync(self.verification_message().as_bytes())
            .map_err(|e| ScriptError::Ticket(e.to_string()))
    }

    /// Recover the signer of `signature` and check it against the claimed signer
    pub fn verify(&self, signature: &Signature) -> Result<Address, ScriptError> {
        let recovered = signature
            .recover_address_from_msg(self.verification_message())
            .map_err(|e| ScriptError::Ticket(format!("failed to recover signer: {}", e)))?;
        if recovered != self.signer {
            return Err(ScriptError::Ticket(
                "recovered signer does not match claim".to_string(),
            ));
        }

        Ok(self.signer)
    }

    /// The human-readable message that is signed, one `key: value` line per
    /// present field in key order
    pub fn verification_message(&self) -> String {
        let mut lines = Vec::new();
        if let Some(allowed_deployments) = &self.allowed_deployments {
            lines.push(format!("allowed_deployments: {}", allowed_deployments));
        }
        if let Some(allowed_domains) = &self.allowed_domains {
            lines.push(format!("allowed_domains: {}", allowed_domains));
        }
        if let Some(allowed_subgraphs) = &self.allowed_subgraphs {
            lines.push(format!("allowed_subgraphs: {}", allowed_subgraphs));
        }
        lines.push(format!("chain_id: {}", self.chain_id));
        lines.push(format!("contract: {:#x}", self.contract));
        if let Some(name) = &self.name {
            lines.push(format!("name: {}", name));
        }
        lines.push(format!("signer: {:#x}", self.signer));
        if let Some(user) = self.user {
            lines.push(format!("user: {:#x}", user));
        }

        lines.into_iter().map(|line| line + "\n").collect()
    }
}
