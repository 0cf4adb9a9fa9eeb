use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fishbowl_core::{
    DomainError, DomainResult, Fields, LocationId, PartNumber, Request, ValueObject,
};

/// Request: overwrite the tracked quantity of a part at a location
/// (`CycleCountRq`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CycleCountFields")]
pub struct CycleCountRequest {
    part_number: PartNumber,
    new_quantity: Decimal,
    location_id: LocationId,
}

impl CycleCountRequest {
    /// Counting a location down to zero is a valid correction; negative
    /// counts are not.
    pub fn new(
        part_number: PartNumber,
        new_quantity: Decimal,
        location_id: LocationId,
    ) -> DomainResult<Self> {
        if new_quantity.is_sign_negative() && !new_quantity.is_zero() {
            return Err(DomainError::validation("counted quantity cannot be negative"));
        }
        Ok(Self {
            part_number,
            new_quantity,
            location_id,
        })
    }

    pub fn part_number(&self) -> &PartNumber {
        &self.part_number
    }

    pub fn new_quantity(&self) -> Decimal {
        self.new_quantity
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }
}

#[derive(Deserialize)]
struct CycleCountFields {
    part_number: PartNumber,
    new_quantity: Decimal,
    location_id: LocationId,
}

impl TryFrom<CycleCountFields> for CycleCountRequest {
    type Error = DomainError;

    fn try_from(raw: CycleCountFields) -> DomainResult<Self> {
        Self::new(raw.part_number, raw.new_quantity, raw.location_id)
    }
}

impl ValueObject for CycleCountRequest {}

impl Request for CycleCountRequest {
    const REQUEST_NODE: &'static str = "CycleCountRq";
    const RESPONSE_NODE: &'static str = "CycleCountRs";
    const AUDIT_LABEL: &'static str = "cycle_inv";

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("PartNum", &self.part_number)
            .with("Quantity", self.new_quantity)
            .with("LocationID", self.location_id)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        Self::new(
            PartNumber::new(fields.require("PartNum")?)?,
            fields.parse("Quantity")?,
            fields.parse("LocationID")?,
        )
    }
}
