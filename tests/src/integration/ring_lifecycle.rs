//! Ring cache lifecycle across subsystems: miss → refresh → hit →
//! invalidate, ring-signed requests, and signed relay responses.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::RwLock;

    use rm_02_ring_signing::{
        AccountQuerier, ApplicationQuerier, RingCacheService, RingSigningApi,
    };
    use shared_crypto::{sha256, verify_signature, RingSignature, SigningKeypair};
    use shared_types::{
        AccountAddress, AccountRecord, ApplicationRecord, KeyType, QueryError, RelayRequest,
        RelayResponse,
    };

    struct ChainFixture {
        applications: RwLock<HashMap<AccountAddress, ApplicationRecord>>,
        accounts: RwLock<HashMap<AccountAddress, AccountRecord>>,
        queries: AtomicUsize,
    }

    impl ChainFixture {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                applications: RwLock::new(HashMap::new()),
                accounts: RwLock::new(HashMap::new()),
                queries: AtomicUsize::new(0),
            })
        }

        fn with_application(
            &self,
            address: &str,
            key: &SigningKeypair,
            delegatees: &[(&str, &SigningKeypair)],
        ) {
            self.applications.write().insert(
                address.into(),
                ApplicationRecord {
                    address: address.into(),
                    delegatee_gateway_addresses:
                        delegatees.iter().map(|(a, _)| (*a).into()).collect(),
                },
            );
            self.accounts.write().insert(
                address.into(),
                AccountRecord {
                    address: address.into(),
                    public_key: key.public_key_bytes().to_vec(),
                    key_type: KeyType::Secp256k1,
                },
            );
            for (delegatee, delegatee_key) in delegatees {
                self.accounts.write().insert(
                    (*delegatee).into(),
                    AccountRecord {
                        address: (*delegatee).into(),
                        public_key: delegatee_key.public_key_bytes().to_vec(),
                        key_type: KeyType::Secp256k1,
                    },
                );
            }
        }
    }

    #[async_trait]
    impl ApplicationQuerier for ChainFixture {
        async fn application(
            &self,
            address: &AccountAddress,
        ) -> Result<ApplicationRecord, QueryError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.applications
                .read()
                .get(address)
                .cloned()
                .ok_or(QueryError::NotFound {
                    kind: "application",
                    address: address.to_string(),
                })
        }
    }

    #[async_trait]
    impl AccountQuerier for ChainFixture {
        async fn account(&self, address: &AccountAddress) -> Result<AccountRecord, QueryError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.accounts
                .read()
                .get(address)
                .cloned()
                .ok_or(QueryError::NotFound {
                    kind: "account",
                    address: address.to_string(),
                })
        }
    }

    #[tokio::test]
    async fn test_gateway_signs_relay_request_over_application_ring() {
        let chain = ChainFixture::new();
        let app_key = SigningKeypair::generate();
        let gateway_key = SigningKeypair::generate();
        chain.with_application("rm1app", &app_key, &[("rm1gw", &gateway_key)]);

        // The node operates the delegated gateway.
        let service =
            RingCacheService::new(Arc::clone(&chain), Arc::clone(&chain), gateway_key);
        let signer = service.signer_for(&"rm1app".into()).await.unwrap();

        // Ring-sign the canonical request bytes, as a gateway would before
        // relaying on the application's behalf.
        let request = RelayRequest {
            payload: br#"{"jsonrpc":"2.0","method":"eth_blockNumber","id":1}"#.to_vec(),
            ..Default::default()
        };
        let signable = shared_types::to_canonical_bytes(&request).unwrap();
        let signature = signer.sign(&signable);

        assert!(signature.verify(signer.ring(), &signable));

        // The signature survives a wire roundtrip.
        let decoded = RingSignature::from_bytes(&signature.to_bytes()).unwrap();
        assert!(decoded.verify(signer.ring(), &signable));
    }

    #[tokio::test]
    async fn test_cache_lifecycle_miss_hit_invalidate() {
        let chain = ChainFixture::new();
        let app_key = SigningKeypair::generate();
        chain.with_application("rm1app", &app_key, &[]);

        let service = RingCacheService::new(
            Arc::clone(&chain),
            Arc::clone(&chain),
            app_key,
        );

        // Miss: queries flow.
        service.signer_for(&"rm1app".into()).await.unwrap();
        let after_miss = chain.queries.load(Ordering::SeqCst);
        assert!(after_miss > 0);

        // Hit: no further queries.
        service.signer_for(&"rm1app".into()).await.unwrap();
        assert_eq!(chain.queries.load(Ordering::SeqCst), after_miss);

        // Invalidate: the next signer request queries again.
        service.invalidate(&"rm1app".into());
        service.signer_for(&"rm1app".into()).await.unwrap();
        assert!(chain.queries.load(Ordering::SeqCst) > after_miss);
    }

    #[tokio::test]
    async fn test_delegation_change_visible_after_refresh() {
        let chain = ChainFixture::new();
        let app_key = SigningKeypair::generate();
        let gateway_key = SigningKeypair::generate();
        chain.with_application("rm1app", &app_key, &[]);

        let service = RingCacheService::new(
            Arc::clone(&chain),
            Arc::clone(&chain),
            app_key.clone(),
        );

        let signer = service.signer_for(&"rm1app".into()).await.unwrap();
        assert_eq!(signer.ring().len(), 2);

        // The application delegates to a gateway; the cache is stale until
        // the delegation-change trigger refreshes it.
        chain.with_application("rm1app", &app_key, &[("rm1gw", &gateway_key)]);
        let signer = service.signer_for(&"rm1app".into()).await.unwrap();
        assert_eq!(signer.ring().len(), 2, "stale entry served until refresh");

        let points = service.refresh_ring(&"rm1app".into()).await.unwrap();
        assert_eq!(points.len(), 3);
        let signer = service.signer_for(&"rm1app".into()).await.unwrap();
        assert_eq!(signer.ring().len(), 3);
    }

    #[tokio::test]
    async fn test_signed_response_verifies_against_node_key() {
        let chain = ChainFixture::new();
        let node_key = SigningKeypair::generate();
        let service =
            RingCacheService::new(Arc::clone(&chain), Arc::clone(&chain), node_key);

        let mut response = RelayResponse {
            payload: br#"{"jsonrpc":"2.0","result":"0x1","id":1}"#.to_vec(),
            ..Default::default()
        };
        service.sign_relay_response(&mut response).unwrap();

        let signature = response.meta.supplier_signature.expect("signed");
        let digest = sha256(&response.signable_bytes().unwrap());
        assert!(verify_signature(&service.public_key_bytes(), &digest, &signature).is_ok());
    }
}
