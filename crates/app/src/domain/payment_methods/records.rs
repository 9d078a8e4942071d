//! Payment Method Records

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Payment Method UUID
pub type PaymentMethodUuid = TypedUuid<PaymentMethodRecord>;

/// Payment Method Record
#[derive(Debug, Clone)]
pub struct PaymentMethodRecord {
    pub uuid: PaymentMethodUuid,
    pub user_uuid: UserUuid,
    pub kind: PaymentMethodKind,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethodKind {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Crypto,
    Wallet,
}

impl PaymentMethodKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::BankTransfer => "bank_transfer",
            Self::Crypto => "crypto",
            Self::Wallet => "wallet",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown payment method kind: {0}")]
pub struct UnknownPaymentMethodKind(pub String);

impl FromStr for PaymentMethodKind {
    type Err = UnknownPaymentMethodKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "paypal" => Ok(Self::Paypal),
            "bank_transfer" => Ok(Self::BankTransfer),
            "crypto" => Ok(Self::Crypto),
            "wallet" => Ok(Self::Wallet),
            other => Err(UnknownPaymentMethodKind(other.to_string())),
        }
    }
}
