//! Comprehensive tests for domain_claims

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Amount, DomainPort, PortError};

use domain_claims::aggregation::{rank_providers, ProviderLimit, ProviderTotal};
use domain_claims::csv_import::read_csv_submission;
use domain_claims::intake::{fields, parse_json_submission, RawRecord, RecordLocator};
use domain_claims::{
    calculate_net_fee, BatchMode, Claim, ClaimError, ClaimProcessor, ClaimRepository, ClaimValidator,
};

fn sample_record() -> RawRecord {
    RawRecord::from_pairs([
        ("service date", "3/28/18 0:00"),
        ("submitted procedure", "D0180"),
        ("quadrant", ""),
        ("Plan/Group #", "GRP-1000"),
        ("Subscriber#", "3730189502"),
        ("Provider NPI", "1497775530"),
        ("provider fees", "$100.00 "),
        ("Allowed fees", "$80.00 "),
        ("member coinsurance", "$10.00 "),
        ("member copay", "$5.00 "),
    ])
}

fn record_with(field: &str, value: &str) -> RawRecord {
    let mut record = sample_record();
    record.insert(field, value);
    record
}

fn claim_for(npi: &str, net_fee_cents: i64) -> Claim {
    let record = RawRecord::from_pairs([
        ("service_date", "2018-03-28".to_string()),
        ("submitted_procedure", "D0180".to_string()),
        ("provider_npi", npi.to_string()),
        ("provider_fees", Amount::from_cents(net_fee_cents).to_string()),
    ]);
    Claim::from_draft(ClaimValidator::validate(&record).unwrap())
}

/// Repository double that keeps claims in a vector
#[derive(Default)]
struct FakeRepository {
    claims: Mutex<Vec<Claim>>,
    fail_inserts: bool,
    /// Number of upcoming inserts that report a claim number collision
    conflicts: Mutex<u32>,
}

impl DomainPort for FakeRepository {}

#[async_trait]
impl ClaimRepository for FakeRepository {
    async fn insert_claims(&self, claims: &[Claim]) -> Result<(), PortError> {
        if self.fail_inserts {
            return Err(PortError::connection("database unreachable"));
        }
        {
            let mut conflicts = self.conflicts.lock().unwrap();
            if *conflicts > 0 {
                *conflicts -= 1;
                return Err(PortError::conflict("claim number already exists"));
            }
        }
        self.claims.lock().unwrap().extend_from_slice(claims);
        Ok(())
    }

    async fn top_providers(&self, limit: ProviderLimit) -> Result<Vec<ProviderTotal>, PortError> {
        Ok(rank_providers(self.claims.lock().unwrap().iter(), limit))
    }

    async fn count_claims(&self) -> Result<u64, PortError> {
        Ok(self.claims.lock().unwrap().len() as u64)
    }

    async fn health_check(&self) -> Result<(), PortError> {
        Ok(())
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_record_normalizes() {
        let draft = ClaimValidator::validate(&sample_record()).unwrap();

        assert_eq!(draft.service_date, NaiveDate::from_ymd_opt(2018, 3, 28).unwrap());
        assert_eq!(draft.submitted_procedure, "D0180");
        assert_eq!(draft.quadrant, None);
        assert_eq!(draft.plan_group.as_deref(), Some("GRP-1000"));
        assert_eq!(draft.subscriber.as_deref(), Some("3730189502"));
        assert_eq!(draft.provider_npi, "1497775530");
        assert_eq!(draft.provider_fees.value(), dec!(100.00));
        assert_eq!(draft.allowed_fees.value(), dec!(80.00));
    }

    #[test]
    fn test_procedure_must_start_with_d() {
        let errors = ClaimValidator::validate(&record_with("submitted_procedure", "X1234")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, fields::SUBMITTED_PROCEDURE);

        assert!(ClaimValidator::validate(&record_with("submitted_procedure", "D1234")).is_ok());
    }

    #[test]
    fn test_procedure_is_case_sensitive() {
        let errors = ClaimValidator::validate(&record_with("submitted_procedure", "d1234")).unwrap_err();
        assert_eq!(errors[0].field, fields::SUBMITTED_PROCEDURE);
    }

    #[test]
    fn test_npi_must_be_ten_digits() {
        for bad in ["12345", "12345678901", "123456789a", "123 456 78"] {
            let errors = ClaimValidator::validate(&record_with("provider_npi", bad)).unwrap_err();
            assert_eq!(errors[0].field, fields::PROVIDER_NPI, "{bad} should be rejected");
        }

        assert!(ClaimValidator::validate(&record_with("provider_npi", "1234567890")).is_ok());
    }

    #[test]
    fn test_required_fields() {
        let errors = ClaimValidator::validate(&RawRecord::new()).unwrap_err();
        let failed: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert!(failed.contains(&fields::SERVICE_DATE));
        assert!(failed.contains(&fields::SUBMITTED_PROCEDURE));
        assert!(failed.contains(&fields::PROVIDER_NPI));
    }

    #[test]
    fn test_missing_amounts_default_to_zero() {
        let record = RawRecord::from_pairs([
            ("service_date", "3/28/18"),
            ("submitted_procedure", "D0180"),
            ("provider_npi", "1497775530"),
        ]);
        let draft = ClaimValidator::validate(&record).unwrap();

        assert!(draft.provider_fees.is_zero());
        assert!(draft.allowed_fees.is_zero());
        assert!(draft.member_coinsurance.is_zero());
        assert!(draft.member_copay.is_zero());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let errors = ClaimValidator::validate(&record_with("member copay", "-$5.00")).unwrap_err();
        assert_eq!(errors[0].field, fields::MEMBER_COPAY);
        assert!(errors[0].reason.contains("negative"));
    }

    #[test]
    fn test_unparseable_amount_rejected() {
        let errors = ClaimValidator::validate(&record_with("Allowed fees", "lots")).unwrap_err();
        assert_eq!(errors[0].field, fields::ALLOWED_FEES);
    }

    #[test]
    fn test_bad_service_date_rejected() {
        let errors = ClaimValidator::validate(&record_with("service date", "28/28/18")).unwrap_err();
        assert_eq!(errors[0].field, fields::SERVICE_DATE);
    }

    #[test]
    fn test_all_failures_reported() {
        let mut record = record_with("submitted_procedure", "X1");
        record.insert("provider_npi", "1");
        record.insert("provider_fees", "abc");

        let errors = ClaimValidator::validate(&record).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_amount_above_column_precision_rejected() {
        let errors = ClaimValidator::validate(&record_with("provider fees", "1000000000000")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, fields::PROVIDER_FEES);
        assert!(errors[0].reason.contains("999999999999.99"));

        assert!(ClaimValidator::validate(&record_with("provider fees", "999999999999.99")).is_ok());
    }

    #[test]
    fn test_net_fee_above_bound_rejected() {
        let mut record = record_with("provider fees", "999999999999.99");
        record.insert("member coinsurance", "999999999999.99");
        record.insert("Allowed fees", "0");

        let errors = ClaimValidator::validate(&record).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, fields::NET_FEE);
    }

    #[test]
    fn test_decimal_max_amounts_do_not_overflow() {
        let max = "79228162514264337593543950335";
        let mut record = record_with("provider fees", max);
        record.insert("member coinsurance", max);

        let (accepted, rejected) = ClaimProcessor::prepare(vec![domain_claims::IntakeRecord {
            locator: RecordLocator::Index(0),
            parsed: Ok(record),
        }]);

        assert!(accepted.is_empty());
        let failed: Vec<&str> = rejected[0].errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(failed, vec![fields::PROVIDER_FEES, fields::MEMBER_COINSURANCE]);
    }

    #[test]
    fn test_json_float_amounts_keep_two_places() {
        let records = parse_json_submission(
            br#"{"service_date": "3/28/18", "submitted_procedure": "D0180", "provider_npi": "1497775530", "provider_fees": 100.5, "allowed_fees": 20}"#,
        )
        .unwrap();
        let raw = records[0].parsed.as_ref().unwrap();
        let draft = ClaimValidator::validate(raw).unwrap();

        assert_eq!(draft.provider_fees.to_string(), "100.50");
        assert_eq!(draft.allowed_fees.to_string(), "20.00");
        assert_eq!(draft.net_fee.to_string(), "80.50");
    }
}

// ============================================================================
// Fee Tests
// ============================================================================

mod fee_tests {
    use super::*;

    #[test]
    fn test_claim_net_fee_from_source_amounts() {
        let claim = Claim::from_draft(ClaimValidator::validate(&sample_record()).unwrap());

        // 100 + 10 + 5 - 80 = 35
        assert_eq!(claim.net_fee.value(), dec!(35.00));
        assert!(claim.net_fee_is_consistent());
    }

    #[test]
    fn test_net_fee_may_be_negative() {
        let net_fee = calculate_net_fee(
            Amount::new(dec!(50.00)),
            Amount::zero(),
            Amount::zero(),
            Amount::new(dec!(80.00)),
        );
        assert_eq!(net_fee, Some(Amount::new(dec!(-30.00))));
    }

    #[test]
    fn test_claim_gets_identifiers() {
        let a = Claim::from_draft(ClaimValidator::validate(&sample_record()).unwrap());
        let b = Claim::from_draft(ClaimValidator::validate(&sample_record()).unwrap());

        assert_ne!(a.id, b.id);
        assert!(a.claim_number.as_str().starts_with("CLM-"));
    }

    proptest! {
        #[test]
        fn prop_net_fee_matches_formula(
            provider in 0i64..10_000_000,
            coinsurance in 0i64..10_000_000,
            copay in 0i64..10_000_000,
            allowed in 0i64..10_000_000,
        ) {
            let record = RawRecord::from_pairs([
                ("service_date", "3/28/18".to_string()),
                ("submitted_procedure", "D0180".to_string()),
                ("provider_npi", "1497775530".to_string()),
                ("provider_fees", Amount::from_cents(provider).to_string()),
                ("member_coinsurance", Amount::from_cents(coinsurance).to_string()),
                ("member_copay", Amount::from_cents(copay).to_string()),
                ("allowed_fees", Amount::from_cents(allowed).to_string()),
            ]);
            let claim = Claim::from_draft(ClaimValidator::validate(&record).unwrap());

            prop_assert_eq!(claim.net_fee, Amount::from_cents(provider + coinsurance + copay - allowed));
            prop_assert!(claim.net_fee_is_consistent());
        }
    }
}

// ============================================================================
// Aggregation Tests
// ============================================================================

mod aggregation_tests {
    use super::*;

    #[test]
    fn test_sums_and_orders_providers() {
        let claims = vec![
            claim_for("1111111111", 10_000),
            claim_for("1111111111", 5_000),
            claim_for("2222222222", 3_000),
        ];

        let ranked = rank_providers(&claims, ProviderLimit::default());

        assert_eq!(
            ranked,
            vec![
                ProviderTotal {
                    provider_npi: "1111111111".to_string(),
                    total_net_fee: Amount::new(dec!(150)),
                },
                ProviderTotal {
                    provider_npi: "2222222222".to_string(),
                    total_net_fee: Amount::new(dec!(30)),
                },
            ]
        );
    }

    #[test]
    fn test_truncates_to_ten() {
        let claims: Vec<Claim> = (0..15)
            .map(|i| claim_for(&format!("{:010}", i), 100 * (i + 1)))
            .collect();

        let ranked = rank_providers(&claims, ProviderLimit::default());

        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].provider_npi, format!("{:010}", 14));
    }

    #[test]
    fn test_respects_smaller_limit() {
        let claims: Vec<Claim> = (0..5).map(|i| claim_for(&format!("{:010}", i), 100)).collect();
        let ranked = rank_providers(&claims, ProviderLimit::new(2).unwrap());

        assert_eq!(ranked.len(), 2);
        // equal totals fall back to NPI order
        assert_eq!(ranked[0].provider_npi, "0000000000");
        assert_eq!(ranked[1].provider_npi, "0000000001");
    }

    #[test]
    fn test_empty_store() {
        assert!(rank_providers(&[], ProviderLimit::default()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_ranking_is_bounded_and_sorted(
            fees in prop::collection::vec((0u8..20u8, 0i64..1_000_000i64), 0..60)
        ) {
            let claims: Vec<Claim> = fees
                .iter()
                .map(|(provider, cents)| claim_for(&format!("{:010}", provider), *cents))
                .collect();
            let distinct = fees
                .iter()
                .map(|(provider, _)| *provider)
                .collect::<std::collections::BTreeSet<_>>()
                .len();

            let ranked = rank_providers(&claims, ProviderLimit::default());

            prop_assert_eq!(ranked.len(), distinct.min(10));
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].total_net_fee >= pair[1].total_net_fee);
            }
        }
    }
}

// ============================================================================
// Intake Tests
// ============================================================================

mod intake_tests {
    use super::*;

    #[test]
    fn test_json_and_csv_keys_agree() {
        let from_json = parse_json_submission(
            br#"{"service_date": "3/28/18 0:00", "submitted_procedure": "D0180", "provider_npi": "1497775530"}"#,
        )
        .unwrap();
        let from_csv = read_csv_submission(
            "service date,submitted procedure,Provider NPI\n3/28/18 0:00,D0180,1497775530\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(
            from_json[0].parsed.as_ref().unwrap(),
            from_csv[0].parsed.as_ref().unwrap()
        );
    }

    #[test]
    fn test_csv_short_rows_are_padded() {
        let records = read_csv_submission(
            "service date,submitted procedure,Provider NPI,member copay\n3/28/18,D0180,1497775530\n".as_bytes(),
        )
        .unwrap();

        let record = records[0].parsed.as_ref().unwrap();
        assert_eq!(record.get(fields::MEMBER_COPAY), None);
        assert!(ClaimValidator::validate(record).is_ok());
    }

    #[test]
    fn test_csv_skips_blank_lines_and_tracks_lines() {
        let records = read_csv_submission(
            "submitted procedure,Provider NPI\nD0180,1497775530\n\nD0120,1497775531\n".as_bytes(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].locator, RecordLocator::Line(2));
        assert_eq!(records[1].locator, RecordLocator::Line(4));
    }

    #[test]
    fn test_csv_quoted_amounts() {
        let records = read_csv_submission(
            "submitted procedure,provider fees\nD0180,\"$1,250.00\"\n".as_bytes(),
        )
        .unwrap();

        let record = records[0].parsed.as_ref().unwrap();
        assert_eq!(Amount::parse(record.get(fields::PROVIDER_FEES).unwrap()).unwrap().value(), dec!(1250.00));
    }

    #[test]
    fn test_csv_invalid_utf8_row_is_reported() {
        let mut bytes = b"submitted procedure,Provider NPI\n".to_vec();
        bytes.extend_from_slice(b"D0180,\xff\xfe\n");
        bytes.extend_from_slice(b"D0120,1497775530\n");

        let records = read_csv_submission(bytes.as_slice()).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].parsed.is_err());
        assert!(records[1].parsed.is_ok());
    }
}

// ============================================================================
// Processor Tests
// ============================================================================

mod processor_tests {
    use super::*;

    fn processor() -> (ClaimProcessor, Arc<FakeRepository>) {
        let repository = Arc::new(FakeRepository::default());
        (ClaimProcessor::new(repository.clone()), repository)
    }

    fn submission(body: &str) -> Vec<domain_claims::IntakeRecord> {
        parse_json_submission(body.as_bytes()).unwrap()
    }

    const VALID: &str = r#"{"service_date": "3/28/18", "submitted_procedure": "D0180", "provider_npi": "1497775530", "provider_fees": "100.00"}"#;
    const INVALID: &str = r#"{"service_date": "3/28/18", "submitted_procedure": "X0180", "provider_npi": "1497775530"}"#;

    #[tokio::test]
    async fn test_valid_batch_is_stored() {
        let (processor, repository) = processor();

        let outcome = processor
            .process(submission(&format!("[{VALID}, {VALID}]")), BatchMode::Reject)
            .await
            .unwrap();

        assert_eq!(outcome.accepted.len(), 2);
        assert!(outcome.rejected.is_empty());
        assert_eq!(repository.count_claims().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reject_mode_stores_nothing() {
        let (processor, repository) = processor();

        let result = processor
            .process(submission(&format!("[{VALID}, {INVALID}]")), BatchMode::Reject)
            .await;

        match result {
            Err(ClaimError::Validation(rejections)) => {
                assert_eq!(rejections.len(), 1);
                assert_eq!(rejections[0].record, RecordLocator::Index(1));
                assert_eq!(rejections[0].errors[0].field, fields::SUBMITTED_PROCEDURE);
            }
            other => panic!("expected validation error, got {:?}", other.map(|o| o.accepted.len())),
        }
        assert_eq!(repository.count_claims().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_skip_mode_stores_valid_records() {
        let (processor, repository) = processor();

        let outcome = processor
            .process(submission(&format!("[{INVALID}, {VALID}]")), BatchMode::Skip)
            .await
            .unwrap();

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(repository.count_claims().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_is_surfaced() {
        let repository = Arc::new(FakeRepository {
            fail_inserts: true,
            ..Default::default()
        });
        let processor = ClaimProcessor::new(repository);

        let result = processor.process(submission(VALID), BatchMode::Reject).await;
        assert!(matches!(result, Err(ClaimError::Storage(_))));
    }

    #[tokio::test]
    async fn test_claim_number_collision_renumbers_and_stores() {
        let repository = Arc::new(FakeRepository {
            conflicts: Mutex::new(2),
            ..Default::default()
        });
        let processor = ClaimProcessor::new(repository.clone());

        let outcome = processor
            .process(submission(&format!("[{VALID}, {VALID}]")), BatchMode::Reject)
            .await
            .unwrap();

        let stored = repository.claims.lock().unwrap().clone();
        assert_eq!(stored.len(), 2);
        assert_eq!(outcome.accepted, stored);
        assert_eq!(*repository.conflicts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persistent_collisions_give_up() {
        let repository = Arc::new(FakeRepository {
            conflicts: Mutex::new(100),
            ..Default::default()
        });
        let processor = ClaimProcessor::new(repository.clone());

        let result = processor.process(submission(VALID), BatchMode::Reject).await;

        assert!(matches!(result, Err(ClaimError::Storage(PortError::Conflict(_)))));
        assert_eq!(repository.count_claims().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_providers_scenario() {
        let (processor, _) = processor();
        let body = r#"[
            {"service_date": "3/28/18", "submitted_procedure": "D0180", "provider_npi": "1111111111", "provider_fees": "100.00"},
            {"service_date": "3/28/18", "submitted_procedure": "D0180", "provider_npi": "1111111111", "provider_fees": "50.00"},
            {"service_date": "3/28/18", "submitted_procedure": "D0180", "provider_npi": "2222222222", "provider_fees": "30.00"}
        ]"#;
        processor.process(submission(body), BatchMode::Reject).await.unwrap();

        let first = processor.top_providers(ProviderLimit::default()).await.unwrap();
        let second = processor.top_providers(ProviderLimit::default()).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].provider_npi, "1111111111");
        assert_eq!(first[0].total_net_fee.value(), dec!(150.00));
        assert_eq!(first[1].total_net_fee.value(), dec!(30.00));
        assert_eq!(first, second);
    }
}
