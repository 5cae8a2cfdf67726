//! Ring construction rules.

use shared_crypto::ring::RingPoint;
use shared_types::{AccountAddress, AccountRecord, ApplicationRecord, KeyType};

use crate::errors::RingError;

/// The ordered address list a ring is built from.
///
/// The application's own address occupies index 0 and is duplicated at
/// index 1, guaranteeing the scheme's minimum ring size of 2 even with
/// zero delegatees; delegatee gateway addresses follow.
#[must_use]
pub fn ring_addresses(application: &ApplicationRecord) -> Vec<AccountAddress> {
    let mut addresses =
        Vec::with_capacity(2 + application.delegatee_gateway_addresses.len());
    addresses.push(application.address.clone());
    addresses.push(application.address.clone());
    addresses.extend(application.delegatee_gateway_addresses.iter().cloned());
    addresses
}

/// Decode an account's public key to a ring point, rejecting any key that
/// is not secp256k1.
pub fn account_ring_point(account: &AccountRecord) -> Result<RingPoint, RingError> {
    if account.key_type != KeyType::Secp256k1 {
        return Err(RingError::UnsupportedKeyType {
            address: account.address.to_string(),
        });
    }
    Ok(RingPoint::from_compressed_bytes(&account.public_key)?)
}
