//! Server status codes.
//!
//! Every Fishbowl response node may carry a `statusCode` attribute. `1000`
//! means success; everything else is either informational (`900`, `1010`)
//! or a failure with a documented description.

use core::str::FromStr;

use crate::error::DomainError;

/// Numeric status reported by the server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    /// The request was processed.
    pub const SUCCESS: Self = Self(1000);
    /// The session was logged out (the expected reply to `LogoutRq`).
    pub const LOGGED_OUT: Self = Self(1010);

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Documented description of this code, if it is a known one.
    pub fn description(self) -> Option<&'static str> {
        DESCRIPTIONS
            .binary_search_by_key(&self.0, |(code, _)| *code)
            .ok()
            .map(|idx| DESCRIPTIONS[idx].1)
    }
}

impl core::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u16> for StatusCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl FromStr for StatusCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("StatusCode: {s:?}: {e}")))
    }
}

// Sorted by code; `description` binary-searches this table.
const DESCRIPTIONS: &[(u16, &str)] = &[
    (900, "Success, but this request is deprecated."),
    (1000, "Success!"),
    (1001, "Unknown message received."),
    (1002, "Connection to the Fishbowl server was lost."),
    (1003, "Some requests had errors."),
    (1004, "There was an error with the database."),
    (1009, "The Fishbowl server has been shut down."),
    (1010, "You have been logged off the server."),
    (1011, "Not found."),
    (1012, "General error."),
    (1013, "Dependencies need to be deleted."),
    (1014, "Unable to establish network connection."),
    (1015, "Your subscription date is greater than your server date."),
    (1016, "Incompatible Fishbowl version."),
    (1100, "Unknown login error occurred."),
    (1109, "This integrated application registration key is in use."),
    (1110, "A new integrated application has been added; approval is required."),
    (1111, "This integrated application registration key does not match."),
    (1112, "This integrated application has not been approved by the administrator."),
    (1120, "Invalid username or password."),
    (1130, "Invalid ticket passed to the Fishbowl server."),
    (1131, "Invalid key value."),
    (1140, "Initialization token is not the correct type."),
    (1150, "Request was invalid."),
    (1162, "The user has insufficient access rights."),
    (1164, "The user is already logged in."),
    (2000, "Was not able to find the part."),
    (2001, "The part was invalid."),
    (2100, "Was not able to find the product."),
    (2101, "The product was invalid."),
    (2200, "The yield failed."),
    (2201, "Commit failed."),
    (2202, "Add initial inventory failed."),
    (2203, "Can not adjust committed inventory."),
    (2300, "Was not able to find the tag number."),
    (2301, "The tag is invalid."),
    (2302, "The tag move failed."),
    (2303, "Was not able to save the tag number."),
    (2304, "Not enough available inventory in the tag number."),
    (2305, "The tag number is a location."),
    (2400, "Invalid UOM."),
    (2401, "UOM not found."),
    (2402, "Integer UOM cannot have a non-integer quantity."),
    (2500, "The tracking is not valid."),
    (2510, "Serial number is missing."),
    (2511, "Serial number is null."),
    (2512, "Serial number is a duplicate."),
    (2513, "Serial number is not valid."),
    (2600, "Location not found."),
    (2601, "Invalid location."),
    (2602, "Location group not found."),
    (3000, "Customer not found."),
    (3001, "Customer is invalid."),
    (3100, "Vendor not found."),
    (3101, "Vendor is invalid."),
    (4000, "There was an error loading the purchase order."),
    (4001, "Unknown status."),
    (4002, "Unknown carrier."),
    (4003, "Unknown QuickBooks class."),
    (4004, "Purchase order number is missing."),
];
