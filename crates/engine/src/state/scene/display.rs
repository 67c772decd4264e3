//! Display helpers for entity listings.

use super::PlacedEntity;

/// Name shown in the project list: display name plus the reference code
pub fn entity_display_name(entity: &PlacedEntity) -> String {
    let info = entity.info();
    if info.reference.is_empty() {
        info.name.clone()
    } else {
        format!("{} ({})", info.name, info.reference)
    }
}

/// First 8 characters of an id, for compact labels
pub fn short_id(id: &str) -> &str {
    &id[..id.len().min(8)]
}
