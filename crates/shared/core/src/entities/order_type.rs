use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order types supported by the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    /// Execute at the prevailing price of the symbol
    #[default]
    Market,
    /// Execute at the stated price or better
    Limit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown order type code: {0}")]
pub struct OrderTypeError(pub u8);

impl OrderType {
    /// Every order type, in wire-code order
    pub const ALL: [OrderType; 2] = [OrderType::Market, OrderType::Limit];

    /// Numeric code used by the snapshot format
    pub fn code(&self) -> u8 {
        match self {
            OrderType::Market => 0,
            OrderType::Limit => 1,
        }
    }
}

impl TryFrom<u8> for OrderType {
    type Error = OrderTypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        OrderType::ALL
            .into_iter()
            .find(|order_type| order_type.code() == code)
            .ok_or(OrderTypeError(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_format() {
        assert_eq!(OrderType::Market.code(), 0);
        assert_eq!(OrderType::Limit.code(), 1);
        assert_eq!(OrderType::try_from(1), Ok(OrderType::Limit));
    }

    #[test]
    fn test_every_type_decodes_from_its_code() {
        for order_type in OrderType::ALL {
            assert_eq!(OrderType::try_from(order_type.code()), Ok(order_type));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(OrderType::try_from(7), Err(OrderTypeError(7)));
    }
}
