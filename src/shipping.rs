//! Shipping zones and flat-rate fees.
//!
//! Every Malaysian state maps to exactly one shipping region; the region fixes
//! the flat shipping fee added to an order's subtotal.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// States served by the West Malaysia rate. Anything else ships at the East rate.
pub const WEST_STATES: &[&str] = &[
    "Johor",
    "Kedah",
    "Kelantan",
    "Melaka",
    "Negeri Sembilan",
    "Pahang",
    "Penang",
    "Perak",
    "Perlis",
    "Selangor",
    "Kuala Lumpur",
    "Terengganu",
];

pub const EAST_STATES: &[&str] = &["Sabah", "Sarawak", "Labuan"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Region {
    West,
    East,
}

impl Region {
    /// Flat shipping fee for the region, in RM.
    pub fn shipping_fee(self) -> Decimal {
        match self {
            Region::West => dec!(7.00),
            Region::East => dec!(15.00),
        }
    }

    /// Derive the region from a customer's state. Unlisted states fall back to
    /// the East rate.
    pub fn for_state(state: &str) -> Region {
        if WEST_STATES.contains(&state) {
            Region::West
        } else {
            Region::East
        }
    }
}

/// All selectable states, west coast first.
pub fn all_states() -> Vec<&'static str> {
    WEST_STATES.iter().chain(EAST_STATES.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn west_states_map_to_west() {
        for state in WEST_STATES {
            assert_eq!(Region::for_state(state), Region::West, "{state}");
        }
    }

    #[test]
    fn east_states_map_to_east() {
        for state in EAST_STATES {
            assert_eq!(Region::for_state(state), Region::East, "{state}");
        }
    }

    #[test]
    fn unknown_state_falls_back_to_east() {
        assert_eq!(Region::for_state("Singapore"), Region::East);
        assert_eq!(Region::for_state(""), Region::East);
    }

    #[test]
    fn fees_match_rate_card() {
        assert_eq!(Region::West.shipping_fee(), dec!(7.00));
        assert_eq!(Region::East.shipping_fee(), dec!(15.00));
    }

    #[test]
    fn region_round_trips_through_strings() {
        assert_eq!(Region::West.to_string(), "west");
        assert_eq!(Region::from_str("east").unwrap(), Region::East);
    }

    #[test]
    fn state_list_covers_both_coasts() {
        let states = all_states();
        assert_eq!(states.len(), WEST_STATES.len() + EAST_STATES.len());
        assert!(states.contains(&"Selangor"));
        assert!(states.contains(&"Sarawak"));
    }
}
