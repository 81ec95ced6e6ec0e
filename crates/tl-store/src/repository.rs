use tl_core::{Clock, Flight, Record, RowId, SystemClock, TimeSegment, Trip};
use tracing::{debug, info};

use crate::{RowCache, RowStore, StoreError, generate_id, map_rows};

/// Typed access to the trip logger's collections.
///
/// Lists go through the cache unless `skip_cache` is set; a fresh fetch
/// always refills the cache. Every mutation invalidates the cached rows of
/// the collection it touched.
#[derive(Debug)]
pub struct Repository<S, C: Clock = SystemClock> {
    store: S,
    cache: RowCache<C>,
}

impl<S: RowStore> Repository<S, SystemClock> {
    /// A repository with the default five-minute cache.
    pub fn new(store: S) -> Self {
        Self::with_cache(store, RowCache::default())
    }
}

impl<S: RowStore, C: Clock> Repository<S, C> {
    pub const fn with_cache(store: S, cache: RowCache<C>) -> Self {
        Self { store, cache }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn cache(&self) -> &RowCache<C> {
        &self.cache
    }

    /// All records of `T`'s collection.
    pub async fn list<T: Record>(&self, skip_cache: bool) -> Result<Vec<T>, StoreError> {
        let collection = T::COLLECTION;
        if !skip_cache {
            if let Some(rows) = self.cache.get(collection) {
                return Ok(map_rows(rows));
            }
        }
        let rows = self.store.list(collection).await?;
        debug!(collection = %collection, rows = rows.len(), "fetched rows");
        self.cache.insert(collection, rows.clone());
        Ok(map_rows(rows))
    }

    /// Appends `record`, generating an id when it has none. Returns the
    /// record as written.
    pub async fn add<T: Record>(&self, mut record: T) -> Result<T, StoreError> {
        if record.id().trim().is_empty() {
            record.set_id(generate_id());
        }
        let collection = T::COLLECTION;
        self.store.append(collection, record.to_cells()).await?;
        self.cache.invalidate(collection);
        info!(collection = %collection, id = record.id(), "row added");
        Ok(record)
    }

    /// Replaces the row carrying `record`'s id.
    pub async fn update<T: Record>(&self, record: &T) -> Result<(), StoreError> {
        let id = RowId::new(record.id())?;
        let collection = T::COLLECTION;
        self.store.update(collection, &id, record.to_cells()).await?;
        self.cache.invalidate(collection);
        info!(collection = %collection, id = %id, "row updated");
        Ok(())
    }

    pub async fn delete<T: Record>(&self, id: &RowId) -> Result<(), StoreError> {
        let collection = T::COLLECTION;
        self.store.delete(collection, id).await?;
        self.cache.invalidate(collection);
        info!(collection = %collection, id = %id, "row deleted");
        Ok(())
    }

    // ========== Trips ==========

    pub async fn list_trips(&self, skip_cache: bool) -> Result<Vec<Trip>, StoreError> {
        self.list(skip_cache).await
    }

    pub async fn add_trip(&self, trip: Trip) -> Result<Trip, StoreError> {
        self.add(trip).await
    }

    pub async fn update_trip(&self, trip: &Trip) -> Result<(), StoreError> {
        self.update(trip).await
    }

    pub async fn delete_trip(&self, id: &RowId) -> Result<(), StoreError> {
        self.delete::<Trip>(id).await
    }

    // ========== Time segments ==========

    /// Segments, optionally only those of one trip.
    pub async fn list_time_segments(
        &self,
        trip_id: Option<&str>,
        skip_cache: bool,
    ) -> Result<Vec<TimeSegment>, StoreError> {
        let mut segments: Vec<TimeSegment> = self.list(skip_cache).await?;
        if let Some(trip_id) = trip_id {
            segments.retain(|s| s.trip_id == trip_id);
        }
        Ok(segments)
    }

    pub async fn add_time_segment(&self, segment: TimeSegment) -> Result<TimeSegment, StoreError> {
        self.add(segment).await
    }

    // ========== Flights ==========

    pub async fn list_flights(&self, skip_cache: bool) -> Result<Vec<Flight>, StoreError> {
        self.list(skip_cache).await
    }

    pub async fn add_flight(&self, flight: Flight) -> Result<Flight, StoreError> {
        self.add(flight).await
    }

    pub async fn update_flight(&self, flight: &Flight) -> Result<(), StoreError> {
        self.update(flight).await
    }

    pub async fn delete_flight(&self, id: &RowId) -> Result<(), StoreError> {
        self.delete::<Flight>(id).await
    }
}
