use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartnerCategory {
    Hotel,
    Airline,
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransferPartner {
    pub name: String,
    /// Points-out : points-in. 1.0 means 1:1.
    pub transfer_ratio: f64,
    pub average_cent_value_per_point: f64,
    pub category: PartnerCategory,
}

/// A loyalty-currency program (credit card or airline/hotel program) and its
/// conversion options. Admin-maintained catalog data.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RewardProgram {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub short_code: String,
    pub transfer_partners: Vec<TransferPartner>,
    /// Cents per point when redeemed through the program's travel portal.
    pub portal_redemption_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// One user's balance in one program. At most one document per
/// (user, program) pair; the routes layer enforces the uniqueness.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PointsBalance {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub program: ObjectId,
    pub points_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// A balance joined with its program catalog entry, the shape the
/// optimization prompt is built from.
#[derive(Debug, Clone)]
pub struct BalanceWithProgram {
    pub balance: PointsBalance,
    pub program: RewardProgram,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    MaxPoints,
    MinCash,
    #[default]
    Balanced,
}

impl OptimizationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationStrategy::MaxPoints => "max_points",
            OptimizationStrategy::MinCash => "min_cash",
            OptimizationStrategy::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationPreferences {
    #[serde(default)]
    pub destination_type: Option<String>,
    #[serde(default)]
    pub specific_destination: Option<String>,
}

/// How many points one program sends to one partner inside a trip option.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAllocation {
    pub name: String,
    pub program_name: String,
    pub points_used: u64,
    /// Cents of travel value realized per point.
    pub value_per_point: f64,
    pub cash_value: f64,
}

/// A point-redemption trip suggestion. Generated on demand, never persisted.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripOption {
    pub destination: String,
    pub description: String,
    pub transfer_partners: Vec<PartnerAllocation>,
    pub additional_cash: f64,
    pub total_value: f64,
    pub redemption_strategy: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&OptimizationStrategy::MaxPoints).unwrap(),
            "\"max_points\""
        );
        let parsed: OptimizationStrategy = serde_json::from_str("\"min_cash\"").unwrap();
        assert_eq!(parsed, OptimizationStrategy::MinCash);
        assert_eq!(OptimizationStrategy::default(), OptimizationStrategy::Balanced);
    }

    #[test]
    fn trip_option_wire_fields_are_camel_case() {
        let option = TripOption {
            destination: "Maui".to_string(),
            description: "Beach week".to_string(),
            transfer_partners: vec![PartnerAllocation {
                name: "Hyatt".to_string(),
                program_name: "Chase Ultimate Rewards".to_string(),
                points_used: 60000,
                value_per_point: 2.1,
                cash_value: 1260.0,
            }],
            additional_cash: 250.0,
            total_value: 1510.0,
            redemption_strategy: "Transfer to Hyatt, book 5 nights".to_string(),
        };
        let json = serde_json::to_value(&option).unwrap();
        assert!(json.get("transferPartners").is_some());
        assert!(json["transferPartners"][0].get("pointsUsed").is_some());
        assert!(json.get("additionalCash").is_some());
        assert!(json.get("redemptionStrategy").is_some());
    }
}
