use tl_core::Record;

/// Maps a listed tab into records, skipping the header row.
///
/// A tab with fewer than two rows holds no data and maps to an empty list.
pub fn map_rows<T: Record>(values: Vec<Vec<String>>) -> Vec<T> {
    if values.len() < 2 {
        return Vec::new();
    }
    values.into_iter().skip(1).map(T::from_cells).collect()
}

#[cfg(test)]
mod tests {
    use tl_core::{Flight, Trip};

    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn header_only_and_empty_tabs_map_to_nothing() {
        assert!(map_rows::<Trip>(Vec::new()).is_empty());
        assert!(map_rows::<Trip>(vec![row(&["id", "date"])]).is_empty());
    }

    #[test]
    fn data_rows_map_positionally() {
        let trips: Vec<Trip> = map_rows(vec![
            row(&["id", "date", "direction"]),
            row(&["t1", "2025-03-01", "MCI", "", "Saturday", "", "95.5"]),
            row(&["t2", "2025-03-04", "PDX"]),
        ]);
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].total_time, "95.5");
        assert_eq!(trips[1].direction, "PDX");
        assert_eq!(trips[1].total_time, "");
    }

    #[test]
    fn flights_keep_stored_status() {
        let flights: Vec<Flight> = map_rows(vec![
            row(&["id"]),
            row(&[
                "f1", "", "Alaska", "AS 123", "MCI to PDX", "", "", "", "240", "", "", "", "delayed",
            ]),
        ]);
        assert_eq!(flights[0].status, "delayed");
        assert_eq!(flights[0].cash_price, "240");
    }
}
