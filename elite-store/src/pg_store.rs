use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;
use elite_core::{
    BookingLedger, CustomerDirectory, ServiceHistory, SlotStore, StoreError, StoreResult,
    VehicleCatalog,
};
use elite_shared::{
    Booking, BookingStatus, Customer, Masked, ServiceRecord, Slot, SlotStatus, Vehicle,
    VehicleSpecs,
};
use crate::seed::SeedData;

/// PostgreSQL backend
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load `seed` when the catalog is empty. Returns whether anything was written.
    pub async fn seed_if_empty(&self, seed: &SeedData) -> Result<bool, sqlx::Error> {
        let cars: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;
        if cars > 0 {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;

        for v in &seed.vehicles {
            sqlx::query(
                "INSERT INTO cars (id, brand, model, year, category, price, hp, engine)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(v.id)
            .bind(&v.brand)
            .bind(&v.model)
            .bind(v.year)
            .bind(&v.category)
            .bind(v.price)
            .bind(v.specs.hp)
            .bind(&v.specs.engine)
            .execute(&mut *tx)
            .await?;
        }

        for c in &seed.customers {
            sqlx::query("INSERT INTO customers (id, name, phone, loyalty_tier) VALUES ($1, $2, $3, $4)")
                .bind(c.id)
                .bind(&c.name)
                .bind(c.phone.expose())
                .bind(&c.loyalty_tier)
                .execute(&mut *tx)
                .await?;
        }

        for s in &seed.slots {
            sqlx::query(
                "INSERT INTO showroom_slots (id, car_id, start_time, end_time, status)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(s.id)
            .bind(s.car_id)
            .bind(s.start_time)
            .bind(s.end_time)
            .bind(s.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for r in &seed.services {
            sqlx::query(
                "INSERT INTO service_history (id, car_id, date, description, cost, next_service_due)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(r.id)
            .bind(r.car_id)
            .bind(r.date)
            .bind(&r.description)
            .bind(r.cost)
            .bind(r.next_service_due)
            .execute(&mut *tx)
            .await?;
        }

        for b in &seed.bookings {
            insert_booking(&mut *tx, b).await?;
        }

        tx.commit().await?;
        info!(
            "Seeded database: {} cars, {} customers, {} slots",
            seed.vehicles.len(),
            seed.customers.len(),
            seed.slots.len()
        );
        Ok(true)
    }
}

async fn insert_booking<'e, E>(executor: E, b: &Booking) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    sqlx::query(
        "INSERT INTO test_drives (id, customer_id, car_id, slot_id, status, booked_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(b.id)
    .bind(b.customer_id)
    .bind(b.car_id)
    .bind(b.slot_id)
    .bind(b.status.as_str())
    .bind(b.booked_at)
    .execute(executor)
    .await?;
    Ok(())
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct CarRow {
    id: Uuid,
    brand: String,
    model: String,
    year: i32,
    category: String,
    price: i64,
    hp: i32,
    engine: String,
}

impl From<CarRow> for Vehicle {
    fn from(row: CarRow) -> Self {
        Vehicle {
            id: row.id,
            brand: row.brand,
            model: row.model,
            year: row.year,
            category: row.category,
            price: row.price,
            specs: VehicleSpecs { hp: row.hp, engine: row.engine },
        }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone: String,
    loyalty_tier: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: Masked::new(row.phone),
            loyalty_tier: row.loyalty_tier,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    id: Uuid,
    car_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
}

impl TryFrom<SlotRow> for Slot {
    type Error = StoreError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        let status = SlotStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Backend(format!("Unknown slot status '{}'", row.status)))?;
        Ok(Slot {
            id: row.id,
            car_id: row.car_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    customer_id: Uuid,
    car_id: Uuid,
    slot_id: Uuid,
    #[allow(dead_code)]
    status: String,
    booked_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            customer_id: row.customer_id,
            car_id: row.car_id,
            slot_id: row.slot_id,
            // The table only admits confirmed rows
            status: BookingStatus::Confirmed,
            booked_at: row.booked_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    car_id: Uuid,
    date: DateTime<Utc>,
    description: String,
    cost: i64,
    next_service_due: bool,
}

impl From<ServiceRow> for ServiceRecord {
    fn from(row: ServiceRow) -> Self {
        ServiceRecord {
            id: row.id,
            car_id: row.car_id,
            date: row.date,
            description: row.description,
            cost: row.cost,
            next_service_due: row.next_service_due,
        }
    }
}

const CAR_COLUMNS: &str = "id, brand, model, year, category, price, hp, engine";
const SLOT_COLUMNS: &str = "id, car_id, start_time, end_time, status";
const BOOKING_COLUMNS: &str = "id, customer_id, car_id, slot_id, status, booked_at";

fn slots_from_rows(rows: Vec<SlotRow>) -> StoreResult<Vec<Slot>> {
    rows.into_iter().map(Slot::try_from).collect()
}

#[async_trait]
impl VehicleCatalog for PgStore {
    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, CarRow>(&format!("SELECT {} FROM cars ORDER BY position", CAR_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn get_vehicle(&self, id: Uuid) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, CarRow>(&format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.map(Vehicle::from))
    }
}

#[async_trait]
impl CustomerDirectory for PgStore {
    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, loyalty_tier FROM customers ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, name, phone, loyalty_tier FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(Customer::from))
    }
}

#[async_trait]
impl SlotStore for PgStore {
    async fn list_open_slots(&self, car_id: Uuid) -> StoreResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM showroom_slots WHERE car_id = $1 AND status = 'open' ORDER BY start_time, id",
            SLOT_COLUMNS
        ))
        .bind(car_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        slots_from_rows(rows)
    }

    async fn list_all_open_slots(&self) -> StoreResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM showroom_slots WHERE status = 'open' ORDER BY start_time, id",
            SLOT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        slots_from_rows(rows)
    }

    async fn get_slot(&self, id: Uuid) -> StoreResult<Option<Slot>> {
        let row = sqlx::query_as::<_, SlotRow>(&format!(
            "SELECT {} FROM showroom_slots WHERE id = $1",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(Slot::try_from).transpose()
    }

    async fn mark_booked(&self, slot_id: Uuid, car_id: Uuid) -> StoreResult<Slot> {
        let mut conn = self.pool.acquire().await.map_err(backend)?;
        mark_booked_on(&mut conn, slot_id, car_id).await
    }

    async fn book(&self, booking: &Booking) -> StoreResult<Slot> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        // Dropping `tx` on an early return rolls the slot back
        let slot = mark_booked_on(&mut tx, booking.slot_id, booking.car_id).await?;
        insert_booking(&mut *tx, booking)
            .await
            .map_err(|e| ledger_error(e, booking))?;

        tx.commit().await.map_err(backend)?;
        Ok(slot)
    }
}

async fn mark_booked_on(conn: &mut PgConnection, slot_id: Uuid, car_id: Uuid) -> StoreResult<Slot> {
    // Single conditional UPDATE: the status check and the write are one statement
    let row = sqlx::query_as::<_, SlotRow>(&format!(
        "UPDATE showroom_slots SET status = 'booked'
         WHERE id = $1 AND car_id = $2 AND status = 'open'
         RETURNING {}",
        SLOT_COLUMNS
    ))
    .bind(slot_id)
    .bind(car_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(backend)?;

    if let Some(row) = row {
        return Slot::try_from(row);
    }

    let exists: Option<String> =
        sqlx::query_scalar("SELECT status FROM showroom_slots WHERE id = $1 AND car_id = $2")
            .bind(slot_id)
            .bind(car_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(backend)?;

    match exists {
        Some(_) => Err(StoreError::AlreadyBooked(slot_id)),
        None => Err(StoreError::NotFound(format!("Slot {} of vehicle {}", slot_id, car_id))),
    }
}

fn ledger_error(e: sqlx::Error, booking: &Booking) -> StoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("Booking {} conflicts with an existing record", booking.id))
        }
        other => backend(other),
    }
}

#[async_trait]
impl BookingLedger for PgStore {
    async fn append(&self, booking: &Booking) -> StoreResult<()> {
        insert_booking(&self.pool, booking)
            .await
            .map_err(|e| ledger_error(e, booking))
    }

    async fn bookings_for(&self, customer_id: Uuid) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM test_drives WHERE customer_id = $1 ORDER BY booked_at, id",
            BOOKING_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn all(&self) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {} FROM test_drives ORDER BY booked_at, id",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }
}

#[async_trait]
impl ServiceHistory for PgStore {
    async fn due_services(&self) -> StoreResult<Vec<ServiceRecord>> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, car_id, date, description, cost, next_service_due
             FROM service_history WHERE next_service_due ORDER BY date, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(ServiceRecord::from).collect())
    }
}
