//! Decoding of `InventoryQuantityRs`: one `InvQty` per location holding the
//! part, each with a nested `Location` and its quantities.

use fishbowl_inventory::PartLocation;

use crate::element::Element;
use crate::error::CodecError;

pub fn parse_part_locations(node: &Element) -> Result<Vec<PartLocation>, CodecError> {
    node.find_all("InvQty")
        .into_iter()
        .map(|item| -> Result<PartLocation, CodecError> {
            let location = item
                .child("Location")
                .ok_or(CodecError::MissingElement("Location"))?;
            Ok(PartLocation::from_fields(&location.fields(), &item.fields())?)
        })
        .collect()
}
