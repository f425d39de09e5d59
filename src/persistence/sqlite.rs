use super::{CalendarStore, PersistenceResult};
use crate::calendar::{Calendar, CalendarConfig};
use crate::slot::TimeSlot;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteCalendarStore {
    connection: Mutex<Connection>,
}

impl SqliteCalendarStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS calendar_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                config_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS slots (
                position INTEGER PRIMARY KEY,
                day TEXT NOT NULL,
                slot_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_config(
        &self,
        tx: &rusqlite::Transaction,
        config: &CalendarConfig,
    ) -> PersistenceResult<()> {
        let json = serde_json::to_string(config)?;
        tx.execute("DELETE FROM calendar_config", [])?;
        tx.execute(
            "INSERT INTO calendar_config (id, config_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_slots(&self, tx: &rusqlite::Transaction, calendar: &Calendar) -> PersistenceResult<()> {
        tx.execute("DELETE FROM slots", [])?;
        let mut stmt = tx.prepare("INSERT INTO slots (position, day, slot_json) VALUES (?1, ?2, ?3)")?;
        for (position, slot) in calendar.slots().enumerate() {
            let json = serde_json::to_string(slot)?;
            stmt.execute(params![position as i64, slot.day().to_string(), json])?;
        }
        Ok(())
    }
}

impl CalendarStore for SqliteCalendarStore {
    fn save_calendar(&self, calendar: &Calendar) -> PersistenceResult<()> {
        super::validate_calendar(calendar)?;
        let mut conn = self
            .connection
            .lock()
            .map_err(|_| super::PersistenceError::InvalidData("sqlite mutex poisoned".into()))?;
        let tx = conn.transaction()?;
        self.save_config(&tx, &calendar.to_config())?;
        self.save_slots(&tx, calendar)?;
        tx.commit()?;
        Ok(())
    }

    fn load_calendar(&self) -> PersistenceResult<Option<Calendar>> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| super::PersistenceError::InvalidData("sqlite mutex poisoned".into()))?;

        let mut stmt = conn.prepare("SELECT config_json FROM calendar_config WHERE id = 1")?;
        let config_json_opt: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(config_json) = config_json_opt else {
            return Ok(None);
        };

        let config: CalendarConfig = serde_json::from_str(&config_json)?;
        let mut calendar = Calendar::from_config(&config)?;

        let mut stmt = conn.prepare("SELECT slot_json FROM slots ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        for json in rows {
            let json = json?;
            let slot: TimeSlot = serde_json::from_str(&json)?;
            super::validate_stored_tasks(std::iter::once(slot.task()))?;
            calendar.restore_slot(slot)?;
        }

        Ok(Some(calendar))
    }
}
