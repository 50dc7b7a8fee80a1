//! Bookings repository for database operations

use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{BookingDetails, BookingShort, BookingState, BookingStatus, CreateBooking},
        item::Item,
        user::User,
    },
};

/// Booking joined with its item and booker, one flat row
#[derive(FromRow)]
struct BookingRow {
    id: i64,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    status: BookingStatus,
    booker_id: i64,
    booker_name: String,
    booker_email: String,
    item_id: i64,
    item_name: String,
    item_description: String,
    item_available: bool,
    item_owner_id: i64,
    item_request_id: Option<i64>,
}

impl From<BookingRow> for BookingDetails {
    fn from(row: BookingRow) -> Self {
        BookingDetails {
            id: row.id,
            start: row.start_date,
            end: row.end_date,
            status: row.status,
            booker: User {
                id: row.booker_id,
                name: row.booker_name,
                email: row.booker_email,
            },
            item: Item {
                id: row.item_id,
                name: row.item_name,
                description: row.item_description,
                available: row.item_available,
                owner_id: row.item_owner_id,
                request_id: row.item_request_id,
            },
        }
    }
}

const BOOKING_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id
    FROM bookings b
    JOIN users u ON b.booker_id = u.id
    JOIN items i ON b.item_id = i.id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Persist a new booking in WAITING status
    pub async fn create(&self, booker_id: i64, booking: &CreateBooking) -> AppResult<BookingDetails> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, 'WAITING')
            RETURNING id
            "#,
        )
        .bind(booking.start)
        .bind(booking.end)
        .bind(booking.item_id)
        .bind(booker_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_details(id).await
    }

    /// Get booking with resolved projections, no visibility check
    pub async fn get_details(&self, id: i64) -> AppResult<BookingDetails> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{} WHERE b.id = $1", BOOKING_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;

        Ok(row.into())
    }

    /// Get booking visible to the caller: the booker or the item owner.
    /// Any other caller sees the same NotFound as a missing booking.
    pub async fn get_details_visible_to(
        &self,
        id: i64,
        caller_id: i64,
    ) -> AppResult<Option<BookingDetails>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "{} WHERE b.id = $1 AND (b.booker_id = $2 OR i.owner_id = $2)",
            BOOKING_SELECT
        ))
        .bind(id)
        .bind(caller_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Transition a WAITING booking to the given terminal status.
    ///
    /// The status guard is part of the UPDATE statement, so of two concurrent
    /// approvals exactly one sees the row; the other gets None.
    pub async fn approve_waiting(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> AppResult<Option<BookingDetails>> {
        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE bookings SET status = $1 WHERE id = $2 AND status = 'WAITING' RETURNING id",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => Ok(Some(self.get_details(id).await?)),
            None => Ok(None),
        }
    }

    /// List bookings made by a user, filtered and newest-starting first
    pub async fn list_by_booker(
        &self,
        booker_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.list_filtered("b.booker_id", booker_id, state, now, from, size)
            .await
    }

    /// List bookings on items owned by a user, filtered and newest-starting first
    pub async fn list_by_owner(
        &self,
        owner_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.list_filtered("i.owner_id", owner_id, state, now, from, size)
            .await
    }

    async fn list_filtered(
        &self,
        subject_column: &str,
        subject_id: i64,
        state: BookingState,
        now: NaiveDateTime,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        let condition = match state {
            BookingState::All => "",
            BookingState::Current => " AND b.start_date <= $4 AND b.end_date >= $4",
            BookingState::Past => " AND b.end_date < $4",
            BookingState::Future => " AND b.start_date > $4",
            BookingState::Waiting | BookingState::Approved | BookingState::Rejected => {
                " AND b.status = $4"
            }
        };

        let sql = format!(
            "{} WHERE {} = $1{} ORDER BY b.start_date DESC LIMIT $2 OFFSET $3",
            BOOKING_SELECT, subject_column, condition
        );

        let query = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(subject_id)
            .bind(size)
            .bind(from);

        let rows = match state {
            BookingState::All => query.fetch_all(&self.pool).await?,
            BookingState::Current | BookingState::Past | BookingState::Future => {
                query.bind(now).fetch_all(&self.pool).await?
            }
            BookingState::Waiting => {
                query.bind(BookingStatus::Waiting).fetch_all(&self.pool).await?
            }
            BookingState::Approved => {
                query.bind(BookingStatus::Approved).fetch_all(&self.pool).await?
            }
            BookingState::Rejected => {
                query.bind(BookingStatus::Rejected).fetch_all(&self.pool).await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Most recent approved booking that has already started on an item
    pub async fn last_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let short = sqlx::query_as::<_, BookingShort>(
            r#"
            SELECT id, booker_id FROM bookings
            WHERE item_id = $1 AND status = 'APPROVED' AND start_date <= $2
            ORDER BY start_date DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(short)
    }

    /// Nearest approved future booking on an item
    pub async fn next_for_item(
        &self,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<Option<BookingShort>> {
        let short = sqlx::query_as::<_, BookingShort>(
            r#"
            SELECT id, booker_id FROM bookings
            WHERE item_id = $1 AND status = 'APPROVED' AND start_date > $2
            ORDER BY start_date ASC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(short)
    }

    /// Whether the user has an approved booking on the item that has already
    /// ended, which is what qualifies them to comment on it
    pub async fn has_completed_booking(
        &self,
        booker_id: i64,
        item_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2
                  AND status = 'APPROVED' AND end_date < $3
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
