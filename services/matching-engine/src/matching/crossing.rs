//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be
/// greater than or equal to the sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against a resting order
///
/// Returns true if the incoming order price crosses the resting order price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => can_match(incoming_price, resting_price),
        Side::SELL => can_match(resting_price, incoming_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_crossing() {
        let bid = Price::from_u64(50000);
        let ask = Price::from_u64(49000);
        assert!(can_match(bid, ask), "Bid >= ask should match");
    }

    #[test]
    fn test_can_match_exact() {
        let price = Price::from_u64(50000);
        assert!(can_match(price, price), "Equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        let bid = Price::from_u64(49000);
        let ask = Price::from_u64(50000);
        assert!(!can_match(bid, ask), "Bid < ask should not match");
    }

    #[test]
    fn test_incoming_buy_can_match() {
        let buy_price = Price::from_str("101.00").unwrap();
        let sell_price = Price::from_str("100.50").unwrap();
        assert!(incoming_can_match(Side::BUY, buy_price, sell_price));
        assert!(!incoming_can_match(Side::BUY, Price::from_str("99.50").unwrap(), sell_price));
    }

    #[test]
    fn test_incoming_sell_can_match() {
        let sell_price = Price::from_str("99.00").unwrap();
        let buy_price = Price::from_str("99.50").unwrap();
        assert!(incoming_can_match(Side::SELL, sell_price, buy_price));
        assert!(!incoming_can_match(Side::SELL, Price::from_str("100").unwrap(), buy_price));
    }
}
