//! Claim repository tests
//!
//! The in-memory adapter runs everywhere. PostgreSQL tests start a container
//! through `test_utils::database` and are ignored unless Docker is available:
//! `cargo test -p infra_db -- --ignored`.

mod memory_tests {
    use domain_claims::{ClaimRepository, ProviderLimit};
    use infra_db::InMemoryClaimRepository;
    use test_utils::{assert_amount, assert_ranked, ClaimRecordBuilder};

    #[tokio::test]
    async fn test_empty_repository_has_no_providers() {
        let repo = InMemoryClaimRepository::new();
        let totals = repo.top_providers(ProviderLimit::default()).await.unwrap();
        assert!(totals.is_empty());
        assert_eq!(repo.count_claims().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_and_rank() {
        let repo = InMemoryClaimRepository::new();
        let claims = vec![
            ClaimRecordBuilder::new().npi("1111111111").fees("100.00", "0.00", "0.00", "0.00").build_claim(),
            ClaimRecordBuilder::new().npi("2222222222").fees("30.00", "0.00", "0.00", "0.00").build_claim(),
            ClaimRecordBuilder::new().npi("1111111111").fees("50.00", "0.00", "0.00", "0.00").build_claim(),
        ];
        repo.insert_claims(&claims).await.unwrap();

        let totals = repo.top_providers(ProviderLimit::default()).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].provider_npi, "1111111111");
        assert_amount(totals[0].total_net_fee, "150.00");
        assert_amount(totals[1].total_net_fee, "30.00");
        assert_ranked(&totals, 10);
        assert_eq!(repo.count_claims().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_claim_number_rejects_whole_batch() {
        let repo = InMemoryClaimRepository::new();
        let first = ClaimRecordBuilder::new().build_claim();
        repo.insert_claims(std::slice::from_ref(&first)).await.unwrap();

        let fresh = ClaimRecordBuilder::new().build_claim();
        let result = repo.insert_claims(&[fresh, first]).await;

        assert!(result.is_err());
        assert_eq!(repo.count_claims().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let repo = InMemoryClaimRepository::new();
        let claims: Vec<_> = (0..3).map(|_| ClaimRecordBuilder::new().build_claim()).collect();
        repo.insert_claims(&claims).await.unwrap();

        assert_eq!(repo.all().await, claims);
    }
}

mod postgres_tests {
    use domain_claims::{ClaimRepository, ProviderLimit};
    use test_utils::{assert_amount, create_isolated_test_database, ClaimRecordBuilder};

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_round_trip_claim() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.claim_repository();

        let claim = ClaimRecordBuilder::new().quadrant("UR").build_claim();
        repo.insert_claims(std::slice::from_ref(&claim)).await.unwrap();

        let stored = repo.get_by_id(claim.id).await.unwrap();
        assert_eq!(stored.claim_number, claim.claim_number);
        assert_eq!(stored.quadrant.as_deref(), Some("UR"));
        assert_eq!(stored.net_fee, claim.net_fee);
        assert!(stored.net_fee_is_consistent());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_top_providers_orders_and_breaks_ties() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.claim_repository();

        let claims = vec![
            ClaimRecordBuilder::new().npi("3333333333").fees("40.00", "0.00", "0.00", "0.00").build_claim(),
            ClaimRecordBuilder::new().npi("2222222222").fees("40.00", "0.00", "0.00", "0.00").build_claim(),
            ClaimRecordBuilder::new().npi("1111111111").fees("90.00", "0.00", "0.00", "0.00").build_claim(),
        ];
        repo.insert_claims(&claims).await.unwrap();

        let totals = repo.top_providers(ProviderLimit::new(2).unwrap()).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].provider_npi, "1111111111");
        assert_amount(totals[0].total_net_fee, "90.00");
        assert_eq!(totals[1].provider_npi, "2222222222");
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_failed_batch_is_rolled_back() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.claim_repository();

        let first = ClaimRecordBuilder::new().build_claim();
        let duplicate = first.clone();
        let result = repo.insert_claims(&[first, duplicate]).await;

        assert!(result.is_err());
        assert_eq!(repo.count_claims().await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_clear_data_and_health() {
        let db = create_isolated_test_database().await.unwrap();
        let repo = db.claim_repository();

        repo.insert_claims(&[ClaimRecordBuilder::new().build_claim()]).await.unwrap();
        db.clear_data().await.unwrap();

        assert_eq!(repo.count_claims().await.unwrap(), 0);
        repo.health_check().await.unwrap();
    }
}
