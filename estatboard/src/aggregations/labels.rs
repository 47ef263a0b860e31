use crate::model::RealEstateKind;

pub const STUDIO_LABEL: &str = "Студия";
pub const FLAT_LABEL: &str = "Квартира";
pub const COUNTRY_HOUSE_LABEL: &str = "Загородный дом";

/// Display name for a row, keyed by kind and room bucket.
///
/// Room 0 is a studio, rooms at or above the cutoff get the "or more" suffix.
/// Houses and land share one label and ignore the room count.
pub fn row_label(kind: RealEstateKind, room_count: Option<u32>, cutoff: u32) -> String {
    match (kind, room_count) {
        (RealEstateKind::Flat, Some(0)) => STUDIO_LABEL.to_string(),
        (RealEstateKind::Flat, Some(rooms)) if rooms >= cutoff => {
            format!("{} {}-ком.+", FLAT_LABEL, cutoff)
        }
        (RealEstateKind::Flat, Some(rooms)) => format!("{} {}-ком.", FLAT_LABEL, rooms),
        (RealEstateKind::Flat, None) => FLAT_LABEL.to_string(),
        (RealEstateKind::House | RealEstateKind::Land, _) => COUNTRY_HOUSE_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_labels() {
        assert_eq!(row_label(RealEstateKind::Flat, Some(0), 4), "Студия");
        assert_eq!(row_label(RealEstateKind::Flat, Some(2), 4), "Квартира 2-ком.");
        assert_eq!(row_label(RealEstateKind::Flat, Some(4), 4), "Квартира 4-ком.+");
    }

    #[test]
    fn test_cutoff_shifts_suffix() {
        assert_eq!(row_label(RealEstateKind::Flat, Some(4), 6), "Квартира 4-ком.");
        assert_eq!(row_label(RealEstateKind::Flat, Some(1), 1), "Квартира 1-ком.+");
    }

    #[test]
    fn test_house_and_land_share_label() {
        assert_eq!(row_label(RealEstateKind::House, None, 4), "Загородный дом");
        assert_eq!(row_label(RealEstateKind::Land, None, 4), "Загородный дом");
        assert_eq!(row_label(RealEstateKind::House, Some(3), 4), "Загородный дом");
    }
}
