//! SQLite-backed booking history implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::engine::{BookingResult, BookingStatus};

use super::{BookingStore, HistoryError};

fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::InProgress => "in_progress",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Failed => "failed",
        BookingStatus::Cancelled => "cancelled",
        BookingStatus::Waitlisted => "waitlisted",
        BookingStatus::Refunded => "refunded",
    }
}

/// SQLite-backed booking history.
///
/// The full result is stored as a JSON payload; a handful of columns are
/// lifted out of it for indexing and filtering. The status column mirrors
/// the payload and both are rewritten on status updates.
pub struct SqliteBookingStore {
    conn: Mutex<Connection>,
}

impl SqliteBookingStore {
    /// Open (creating if needed) a booking history database at `path`.
    pub fn new(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open(path).map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory booking history (useful for testing).
    pub fn in_memory() -> Result<Self, HistoryError> {
        let conn =
            Connection::open_in_memory().map_err(|e| HistoryError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), HistoryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                booking_id TEXT PRIMARY KEY,
                pnr TEXT,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                total_amount REAL NOT NULL,
                booked_at TEXT NOT NULL,
                payload TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_bookings_pnr ON bookings(pnr);
            CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);
            CREATE INDEX IF NOT EXISTS idx_bookings_booked_at ON bookings(booked_at);
            "#,
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_result(row: &rusqlite::Row) -> rusqlite::Result<String> {
        row.get(0)
    }

    fn decode(payload: String) -> Result<BookingResult, HistoryError> {
        serde_json::from_str(&payload).map_err(|e| HistoryError::Serialization(e.to_string()))
    }

    fn query_payloads(
        conn: &Connection,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<BookingResult>, HistoryError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_result)
            .map_err(|e| HistoryError::Database(e.to_string()))?;

        let mut results = Vec::new();
        for row in rows {
            let payload = row.map_err(|e| HistoryError::Database(e.to_string()))?;
            results.push(Self::decode(payload)?);
        }
        Ok(results)
    }
}

impl BookingStore for SqliteBookingStore {
    fn append(&self, result: &BookingResult) -> Result<(), HistoryError> {
        let conn = self.conn.lock().unwrap();

        let payload = serde_json::to_string(result)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO bookings (booking_id, pnr, user_id, status, total_amount, booked_at, payload) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                result.booking_id,
                result.pnr,
                result.request.user_id,
                status_label(result.status),
                result.total_amount,
                result.booked_at.to_rfc3339(),
                payload,
            ],
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(())
    }

    fn by_booking_id(&self, booking_id: &str) -> Result<Option<BookingResult>, HistoryError> {
        let conn = self.conn.lock().unwrap();

        let row = conn.query_row(
            "SELECT payload FROM bookings WHERE booking_id = ?",
            params![booking_id],
            Self::row_to_result,
        );

        match row {
            Ok(payload) => Ok(Some(Self::decode(payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(HistoryError::Database(e.to_string())),
        }
    }

    fn by_pnr(&self, pnr: &str) -> Result<Option<BookingResult>, HistoryError> {
        let conn = self.conn.lock().unwrap();

        let row = conn.query_row(
            "SELECT payload FROM bookings WHERE pnr = ?",
            params![pnr],
            Self::row_to_result,
        );

        match row {
            Ok(payload) => Ok(Some(Self::decode(payload)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(HistoryError::Database(e.to_string())),
        }
    }

    fn by_user(&self, user_id: &str) -> Result<Vec<BookingResult>, HistoryError> {
        let conn = self.conn.lock().unwrap();
        Self::query_payloads(
            &conn,
            "SELECT payload FROM bookings WHERE user_id = ? ORDER BY booked_at ASC",
            &[&user_id],
        )
    }

    fn all(&self) -> Result<Vec<BookingResult>, HistoryError> {
        let conn = self.conn.lock().unwrap();
        Self::query_payloads(
            &conn,
            "SELECT payload FROM bookings ORDER BY booked_at ASC",
            &[],
        )
    }

    fn in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BookingResult>, HistoryError> {
        let conn = self.conn.lock().unwrap();
        Self::query_payloads(
            &conn,
            "SELECT payload FROM bookings WHERE booked_at >= ? AND booked_at <= ? ORDER BY booked_at ASC",
            &[&from.to_rfc3339(), &to.to_rfc3339()],
        )
    }

    fn update_status(&self, pnr: &str, status: BookingStatus) -> Result<bool, HistoryError> {
        let conn = self.conn.lock().unwrap();

        let row = conn.query_row(
            "SELECT payload FROM bookings WHERE pnr = ?",
            params![pnr],
            Self::row_to_result,
        );

        let payload = match row {
            Ok(payload) => payload,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(false),
            Err(e) => return Err(HistoryError::Database(e.to_string())),
        };

        let mut result = Self::decode(payload)?;
        result.status = status;
        let payload = serde_json::to_string(&result)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        conn.execute(
            "UPDATE bookings SET status = ?, payload = ? WHERE pnr = ?",
            params![status_label(status), payload, pnr],
        )
        .map_err(|e| HistoryError::Database(e.to_string()))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PaymentStatus;
    use crate::inventory::SeatClass;
    use crate::testing::fixtures;
    use std::time::Duration;

    fn create_test_store() -> SqliteBookingStore {
        SqliteBookingStore::in_memory().unwrap()
    }

    fn confirmed_result(booking_id: &str, pnr: &str, user_id: &str) -> BookingResult {
        let mut request = fixtures::request("NDLS", "BCT", 1, SeatClass::ThirdAc);
        request.user_id = user_id.to_string();
        BookingResult {
            booking_id: booking_id.to_string(),
            pnr: Some(pnr.to_string()),
            request,
            selected_train: None,
            seat_allocations: Vec::new(),
            total_amount: 1200.0,
            tax_amount: 60.0,
            convenience_fee: 40.0,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Completed,
            attempt_number: 1,
            duration: Duration::from_millis(150),
            booked_at: Utc::now(),
            confirmation_code: Some("1A2B3C4D".to_string()),
            messages: vec!["Booking confirmed successfully".to_string()],
        }
    }

    #[test]
    fn test_append_and_fetch_by_booking_id() {
        let store = create_test_store();
        let result = confirmed_result("b-1", "1234567890", "alice");
        store.append(&result).unwrap();

        let fetched = store.by_booking_id("b-1").unwrap().unwrap();
        assert_eq!(fetched.booking_id, "b-1");
        assert_eq!(fetched.pnr.as_deref(), Some("1234567890"));
        assert_eq!(fetched.total_amount, 1200.0);
        assert_eq!(fetched.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_fetch_by_pnr() {
        let store = create_test_store();
        store
            .append(&confirmed_result("b-1", "1234567890", "alice"))
            .unwrap();

        assert!(store.by_pnr("1234567890").unwrap().is_some());
        assert!(store.by_pnr("0000000000").unwrap().is_none());
    }

    #[test]
    fn test_by_user_filters() {
        let store = create_test_store();
        store
            .append(&confirmed_result("b-1", "1111111111", "alice"))
            .unwrap();
        store
            .append(&confirmed_result("b-2", "2222222222", "bob"))
            .unwrap();
        store
            .append(&confirmed_result("b-3", "3333333333", "alice"))
            .unwrap();

        let alice = store.by_user("alice").unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.request.user_id == "alice"));

        assert_eq!(store.all().unwrap().len(), 3);
    }

    #[test]
    fn test_in_range_excludes_outside() {
        let store = create_test_store();
        let mut old = confirmed_result("b-1", "1111111111", "alice");
        old.booked_at = Utc::now() - chrono::Duration::days(2);
        store.append(&old).unwrap();
        store
            .append(&confirmed_result("b-2", "2222222222", "alice"))
            .unwrap();

        let recent = store
            .in_range(Utc::now() - chrono::Duration::hours(1), Utc::now())
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].booking_id, "b-2");
    }

    #[test]
    fn test_update_status_rewrites_payload() {
        let store = create_test_store();
        store
            .append(&confirmed_result("b-1", "1234567890", "alice"))
            .unwrap();

        assert!(store
            .update_status("1234567890", BookingStatus::Cancelled)
            .unwrap());
        let fetched = store.by_pnr("1234567890").unwrap().unwrap();
        assert_eq!(fetched.status, BookingStatus::Cancelled);

        assert!(!store
            .update_status("0000000000", BookingStatus::Cancelled)
            .unwrap());
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("railbook.db");

        let store = SqliteBookingStore::new(&db_path).unwrap();
        store
            .append(&confirmed_result("b-1", "1234567890", "alice"))
            .unwrap();

        assert!(db_path.exists());
        assert!(store.by_booking_id("b-1").unwrap().is_some());
    }
}
