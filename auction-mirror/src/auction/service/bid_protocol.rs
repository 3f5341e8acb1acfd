use {
    crate::{
        error::EngineError,
        kernel::{
            entities::Amount,
            units::to_base_units,
        },
    },
    serde::{
        Deserialize,
        Serialize,
    },
};

/// How the contract accounts for repeated bids of the same bidder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidModel {
    /// The contract keeps a per-bidder ledger, only the difference is paid.
    #[default]
    Cumulative,
    /// Opt-in fallback for contracts without a ledger: every bid pays the full total.
    FullAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidPayment {
    pub new_total: Amount,
    /// Value attached to the submission.
    pub payment:   Amount,
}

pub fn parse_bid_amount(desired_total: &str) -> Result<Amount, EngineError> {
    let amount = to_base_units(desired_total).map_err(EngineError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(EngineError::InvalidAmount(
            "bid must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

/// Computes the payment for raising a bid to `desired_total`.
///
/// `contribution` is what the bidder already paid into this auction, `None`
/// when the contract keeps no ledger.
pub fn compute_bid_payment(
    desired_total: Amount,
    leading_amount: Amount,
    contribution: Option<Amount>,
    model: BidModel,
) -> Result<BidPayment, EngineError> {
    if desired_total <= leading_amount {
        return Err(EngineError::BidTooLow {
            desired: desired_total,
            leading: leading_amount,
        });
    }
    let payment = match (contribution, model) {
        (Some(contributed), _) => {
            if desired_total <= contributed {
                return Err(EngineError::NoIncrementalPayment {
                    desired: desired_total,
                    contributed,
                });
            }
            desired_total - contributed
        }
        (None, BidModel::FullAmount) => desired_total,
        (None, BidModel::Cumulative) => return Err(EngineError::UnsupportedBidModel),
    };
    Ok(BidPayment {
        new_total: desired_total,
        payment,
    })
}
