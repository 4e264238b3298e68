//! Type definitions used throughout the scripts

use alloy::{primitives::Address, sol_types::SolConstructor};
use chrono::{DateTime, Utc};

use crate::{errors::ScriptError, solidity::Subscriptions};

/// The constructor arguments of the subscriptions contract,
/// `[tokenAddress, epochSeconds]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionsParams {
    /// The ERC20 token in which subscriptions are paid
    pub token: Address,
    /// The length of a subscription epoch, in seconds
    pub epoch_seconds: u64,
}

impl SubscriptionsParams {
    /// ABI-encode the parameters as constructor arguments
    pub fn abi_encode(&self) -> Vec<u8> {
        Subscriptions::constructorCall {
            token: self.token,
            epochSeconds: self.epoch_seconds,
        }
        .abi_encode()
    }
}

/// A user's subscription, as stored by the subscriptions contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    /// When the subscription starts
    pub start: DateTime<Utc>,
    /// When the subscription ends
    pub end: DateTime<Utc>,
    /// The rate paid per second, in token base units
    pub rate: u128,
}

impl TryFrom<(u64, u64, u128)> for Subscription {
    type Error = ScriptError;

    fn try_from((start, end, rate): (u64, u64, u128)) -> Result<Self, Self::Error> {
        let to_datetime = |t: u64| {
            i64::try_from(t)
                .ok()
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
                .ok_or_else(|| ScriptError::Conversion(format!("invalid timestamp {}", t)))
        };

        Ok(Self {
            start: to_datetime(start)?,
            end: to_datetime(end)?,
            rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, U256};

    use super::*;

    #[test]
    fn constructor_args_are_two_words() {
        let params = SubscriptionsParams {
            token: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            epoch_seconds: 7,
        };
        let encoded = params.abi_encode();

        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[12..32], params.token.as_slice());
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(7u64));
    }

    #[test]
    fn subscription_from_contract_tuple() {
        let sub = Subscription::try_from((1_700_000_000u64, 1_700_086_400u64, 5u128)).unwrap();

        assert_eq!(sub.start.timestamp(), 1_700_000_000);
        assert_eq!((sub.end - sub.start).num_days(), 1);
        assert_eq!(sub.rate, 5);
    }

    #[test]
    fn unrepresentable_timestamp_is_rejected() {
        assert!(matches!(
            Subscription::try_from((0u64, u64::MAX, 1u128)),
            Err(ScriptError::Conversion(_))
        ));
    }
}
