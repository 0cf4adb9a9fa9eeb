//! Read-only stock lookups: on-hand quantities of a part by location.

use rust_decimal::Decimal;

use fishbowl_core::{DomainResult, Fields, LocationId, PartNumber, Request, ValueObject};

/// Request: quantities of a part at every location holding it
/// (`InventoryQuantityRq`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartQuantityRequest {
    part_number: PartNumber,
}

impl PartQuantityRequest {
    pub fn new(part_number: PartNumber) -> Self {
        Self { part_number }
    }

    pub fn part_number(&self) -> &PartNumber {
        &self.part_number
    }
}

impl ValueObject for PartQuantityRequest {}

impl Request for PartQuantityRequest {
    const REQUEST_NODE: &'static str = "InventoryQuantityRq";
    const RESPONSE_NODE: &'static str = "InventoryQuantityRs";
    const AUDIT_LABEL: &'static str = "part_info";

    fn to_fields(&self) -> Fields {
        Fields::new().with("PartNum", &self.part_number)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        Ok(Self::new(PartNumber::new(fields.require("PartNum")?)?))
    }
}

/// Request: total quantity of a part across a location group
/// (`GetTotalInventoryRq`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalInventoryRequest {
    part_number: PartNumber,
    location_group: String,
}

impl TotalInventoryRequest {
    pub fn new(part_number: PartNumber, location_group: impl Into<String>) -> DomainResult<Self> {
        let location_group = location_group.into().trim().to_string();
        if location_group.is_empty() {
            return Err(fishbowl_core::DomainError::validation(
                "location group cannot be empty",
            ));
        }
        Ok(Self {
            part_number,
            location_group,
        })
    }

    pub fn part_number(&self) -> &PartNumber {
        &self.part_number
    }

    pub fn location_group(&self) -> &str {
        &self.location_group
    }
}

impl ValueObject for TotalInventoryRequest {}

impl Request for TotalInventoryRequest {
    const REQUEST_NODE: &'static str = "GetTotalInventoryRq";
    const RESPONSE_NODE: &'static str = "GetTotalInventoryRs";
    const AUDIT_LABEL: &'static str = "total_inv";

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("PartNumber", &self.part_number)
            .with("LocationGroup", &self.location_group)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        Self::new(
            PartNumber::new(fields.require("PartNumber")?)?,
            fields.require("LocationGroup")?,
        )
    }
}

/// Stock of one part at one location, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartLocation {
    pub location_id: LocationId,
    pub name: String,
    pub description: String,
    pub location_group: String,
    pub on_hand: Decimal,
    pub available: Decimal,
}

impl PartLocation {
    /// Build from the leaf fields of a `Location` node and of the `InvQty`
    /// node around it (`QtyOnHand`, `QtyAvailable`).
    pub fn from_fields(location: &Fields, quantities: &Fields) -> DomainResult<Self> {
        let text = |name: &str| location.get(name).unwrap_or_default().trim().to_string();
        Ok(Self {
            location_id: location.parse("LocationID")?,
            name: text("Name"),
            description: text("Description"),
            location_group: text("LocationGroupName"),
            on_hand: quantities.parse("QtyOnHand")?,
            available: quantities.parse("QtyAvailable")?,
        })
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.location_group == group
    }
}

impl ValueObject for PartLocation {}
