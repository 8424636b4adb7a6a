//! Pre-built Test Fixtures
//!
//! Ready-to-use claim submissions. The JSON and CSV fixtures describe the
//! same two claims so tests can check both intake paths agree.

use chrono::NaiveDate;
use core_kernel::Amount;
use rust_decimal_macros::dec;

/// NPIs used across fixtures
pub struct NpiFixtures;

impl NpiFixtures {
    pub fn primary() -> &'static str {
        "1234567890"
    }

    pub fn secondary() -> &'static str {
        "0987654321"
    }

    /// Nine digits
    pub fn too_short() -> &'static str {
        "123456789"
    }
}

/// Claim submissions and their expected outcomes
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// CSV header with the display-style column names clients send
    pub const CSV_HEADER: &'static str = "service date,submitted procedure,quadrant,Plan/Group #,Subscriber#,Provider NPI,provider fees,Allowed fees,member coinsurance,member copay";

    pub fn service_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 3, 28).unwrap_or_default()
    }

    /// Single valid claim object
    pub fn single_json() -> serde_json::Value {
        serde_json::json!({
            "service date": "3/28/18 0:00",
            "submitted procedure": "D0180",
            "quadrant": null,
            "Plan/Group #": "GRP-1000",
            "Subscriber#": "3730189502",
            "Provider NPI": "1497775530",
            "provider fees": "$100.00",
            "Allowed fees": "$100.00",
            "member coinsurance": "$0.00",
            "member copay": "$0.00"
        })
    }

    /// Two valid claims as a JSON array
    pub fn batch_json() -> serde_json::Value {
        serde_json::json!([
            {
                "service_date": "2018-03-28",
                "submitted_procedure": "D0180",
                "plan_group": "GRP-1000",
                "subscriber": "3730189502",
                "provider_npi": NpiFixtures::primary(),
                "provider_fees": "150.00",
                "allowed_fees": "100.00",
                "member_coinsurance": "20.00",
                "member_copay": "10.00"
            },
            {
                "service_date": "2018-03-28",
                "submitted_procedure": "D0210",
                "quadrant": "UR",
                "plan_group": "GRP-1000",
                "subscriber": "3730189502",
                "provider_npi": NpiFixtures::secondary(),
                "provider_fees": "108.00",
                "allowed_fees": "108.00",
                "member_coinsurance": "0.00",
                "member_copay": "0.00"
            }
        ])
    }

    /// The claims of `batch_json` as CSV text
    pub fn batch_csv() -> String {
        format!(
            "{header}\n\
             3/28/18 0:00,D0180,,GRP-1000,3730189502,{a},$150.00,$100.00,$20.00,$10.00\n\
             3/28/18 0:00,D0210,UR,GRP-1000,3730189502,{b},$108.00,$108.00,$0.00,$0.00\n",
            header = Self::CSV_HEADER,
            a = NpiFixtures::primary(),
            b = NpiFixtures::secondary(),
        )
    }

    /// Net fees of `batch_json` in order
    pub fn batch_net_fees() -> [Amount; 2] {
        [Amount::new(dec!(80.00)), Amount::zero()]
    }

    /// One valid claim followed by one with a bad procedure and NPI
    pub fn mixed_json() -> serde_json::Value {
        serde_json::json!([
            {
                "service_date": "2018-03-28",
                "submitted_procedure": "D0180",
                "provider_npi": NpiFixtures::primary(),
                "provider_fees": "100.00",
                "allowed_fees": "100.00"
            },
            {
                "service_date": "2018-03-28",
                "submitted_procedure": "X0180",
                "provider_npi": NpiFixtures::too_short(),
                "provider_fees": "100.00"
            }
        ])
    }
}
