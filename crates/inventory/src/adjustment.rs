use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fishbowl_core::{
    DomainError, DomainResult, Fields, LocationTagNum, PartNumber, Request, UomId, ValueObject,
};

/// Request: add inventory of a part to a location tag (`AddInventoryRq`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AdjustmentFields")]
pub struct InventoryAdjustmentRequest {
    part_number: PartNumber,
    quantity: Decimal,
    unit_of_measure_id: UomId,
    unit_cost: Decimal,
    location_tag_num: LocationTagNum,
}

impl InventoryAdjustmentRequest {
    /// Validate and build the request.
    ///
    /// The quantity must be strictly positive and the unit cost must not be
    /// negative; the server would reject both anyway, but only after a round
    /// trip.
    pub fn new(
        part_number: PartNumber,
        quantity: Decimal,
        unit_of_measure_id: UomId,
        unit_cost: Decimal,
        location_tag_num: LocationTagNum,
    ) -> DomainResult<Self> {
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if unit_cost.is_sign_negative() && !unit_cost.is_zero() {
            return Err(DomainError::validation("unit cost cannot be negative"));
        }
        Ok(Self {
            part_number,
            quantity,
            unit_of_measure_id,
            unit_cost,
            location_tag_num,
        })
    }

    pub fn part_number(&self) -> &PartNumber {
        &self.part_number
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_of_measure_id(&self) -> UomId {
        self.unit_of_measure_id
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    pub fn location_tag_num(&self) -> LocationTagNum {
        self.location_tag_num
    }
}

/// Deserialized shape; converted through [`InventoryAdjustmentRequest::new`].
#[derive(Deserialize)]
struct AdjustmentFields {
    part_number: PartNumber,
    quantity: Decimal,
    unit_of_measure_id: UomId,
    unit_cost: Decimal,
    location_tag_num: LocationTagNum,
}

impl TryFrom<AdjustmentFields> for InventoryAdjustmentRequest {
    type Error = DomainError;

    fn try_from(raw: AdjustmentFields) -> DomainResult<Self> {
        Self::new(
            raw.part_number,
            raw.quantity,
            raw.unit_of_measure_id,
            raw.unit_cost,
            raw.location_tag_num,
        )
    }
}

impl ValueObject for InventoryAdjustmentRequest {}

impl Request for InventoryAdjustmentRequest {
    const REQUEST_NODE: &'static str = "AddInventoryRq";
    const RESPONSE_NODE: &'static str = "AddInventoryRs";
    const AUDIT_LABEL: &'static str = "add_inv";

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("PartNum", &self.part_number)
            .with("Quantity", self.quantity)
            .with("UOMID", self.unit_of_measure_id)
            .with("Cost", self.unit_cost)
            .with("LocationTagNum", self.location_tag_num)
    }

    fn from_fields(fields: &Fields) -> DomainResult<Self> {
        Self::new(
            PartNumber::new(fields.require("PartNum")?)?,
            fields.parse("Quantity")?,
            fields.parse("UOMID")?,
            fields.parse("Cost")?,
            fields.parse("LocationTagNum")?,
        )
    }
}
