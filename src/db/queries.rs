use crate::errors::AppError;
use crate::models::{DutyRecord, OffDutyWindow, Person, PersonId, PriorityClass, QueueClass};
use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const PERSON_SELECT_SQL: &str = "SELECT
    id, name, is_admin, is_active,
    admin_queue_days, volunteer_queue_days,
    off_duty_start, off_duty_end
FROM persons";

const DUTY_SELECT_SQL: &str = "SELECT
    d.duty_date, d.person_id, p.name AS person_name,
    d.priority_class, d.created_at, d.completed_at
FROM duties d
JOIN persons p ON p.id = d.person_id";

pub fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_db_date(idx: usize, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(raw.to_string())))
}

pub fn map_person(row: &Row) -> Result<Person> {
    let start: Option<String> = row.get("off_duty_start")?;
    let end: Option<String> = row.get("off_duty_end")?;

    let off_duty = match (start, end) {
        (Some(s), Some(e)) => Some(OffDutyWindow {
            start: parse_db_date(6, &s)?,
            end: parse_db_date(7, &e)?,
        }),
        _ => None,
    };

    Ok(Person {
        id: row.get("id")?,
        name: row.get("name")?,
        is_admin: row.get("is_admin")?,
        is_active: row.get("is_active")?,
        admin_queue_days: row.get("admin_queue_days")?,
        volunteer_queue_days: row.get("volunteer_queue_days")?,
        off_duty,
    })
}

pub fn map_duty(row: &Row) -> Result<DutyRecord> {
    let date_str: String = row.get("duty_date")?;
    let class_str: String = row.get("priority_class")?;

    let class = PriorityClass::from_db_str(&class_str)
        .ok_or_else(|| conversion_error(3, AppError::InvalidClass(class_str.clone())))?;

    Ok(DutyRecord {
        date: parse_db_date(0, &date_str)?,
        assignee: row.get("person_id")?,
        assignee_name: row.get("person_name")?,
        class,
        created_at: row.get("created_at")?,
        completed_at: row.get("completed_at")?,
    })
}

// ---------------------------------------------------------------------------
// Duties
// ---------------------------------------------------------------------------

pub fn load_duty(conn: &Connection, date: NaiveDate) -> Result<Option<DutyRecord>> {
    let mut stmt = conn.prepare_cached(&format!("{DUTY_SELECT_SQL} WHERE d.duty_date = ?1"))?;
    stmt.query_row([date_to_db(date)], map_duty).optional()
}

pub fn upsert_duty(conn: &Connection, rec: &DutyRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO duties (duty_date, person_id, priority_class, created_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(duty_date) DO UPDATE SET
            person_id = excluded.person_id,
            priority_class = excluded.priority_class,
            created_at = excluded.created_at,
            completed_at = excluded.completed_at",
        params![
            rec.date_str(),
            rec.assignee,
            rec.class.to_db_str(),
            rec.created_at,
            rec.completed_at,
        ],
    )?;
    Ok(())
}

pub fn mark_completed(conn: &Connection, date: NaiveDate, at: &str) -> Result<usize> {
    conn.execute(
        "UPDATE duties SET completed_at = COALESCE(completed_at, ?2) WHERE duty_date = ?1",
        params![date_to_db(date), at],
    )
}

pub fn load_duties_in_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DutyRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{DUTY_SELECT_SQL} WHERE d.duty_date >= ?1 AND d.duty_date <= ?2 ORDER BY d.duty_date ASC"
    ))?;
    let rows = stmt.query_map([date_to_db(start), date_to_db(end)], map_duty)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_duties_for_person(conn: &Connection, person: PersonId) -> Result<Vec<DutyRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{DUTY_SELECT_SQL} WHERE d.person_id = ?1 ORDER BY d.duty_date ASC"
    ))?;
    let rows = stmt.query_map([person], map_duty)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_completed_non_admin(
    conn: &Connection,
    person: PersonId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM duties
         WHERE person_id = ?1
           AND duty_date >= ?2 AND duty_date <= ?3
           AND completed_at IS NOT NULL
           AND priority_class IN ('volunteer','fair')",
        params![person, date_to_db(start), date_to_db(end)],
        |row| row.get(0),
    )
}

pub fn last_completed_non_admin(
    conn: &Connection,
    person: PersonId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = conn.query_row(
        "SELECT MAX(duty_date) FROM duties
         WHERE person_id = ?1
           AND duty_date >= ?2 AND duty_date <= ?3
           AND completed_at IS NOT NULL
           AND priority_class IN ('volunteer','fair')",
        params![person, date_to_db(start), date_to_db(end)],
        |row| row.get(0),
    )?;
    raw.map(|s| parse_db_date(0, &s)).transpose()
}

// ---------------------------------------------------------------------------
// Persons
// ---------------------------------------------------------------------------

pub fn load_person(conn: &Connection, id: PersonId) -> Result<Option<Person>> {
    let mut stmt = conn.prepare_cached(&format!("{PERSON_SELECT_SQL} WHERE id = ?1"))?;
    stmt.query_row([id], map_person).optional()
}

pub fn load_person_by_name(conn: &Connection, name: &str) -> Result<Option<Person>> {
    let mut stmt = conn.prepare_cached(&format!("{PERSON_SELECT_SQL} WHERE name = ?1"))?;
    stmt.query_row([name], map_person).optional()
}

pub fn insert_person(conn: &Connection, name: &str, is_admin: bool) -> Result<PersonId> {
    conn.execute(
        "INSERT INTO persons (name, is_admin, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
        params![name, is_admin, Local::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_person_flags(
    conn: &Connection,
    id: PersonId,
    is_admin: bool,
    is_active: bool,
) -> Result<usize> {
    conn.execute(
        "UPDATE persons SET is_admin = ?2, is_active = ?3 WHERE id = ?1",
        params![id, is_admin, is_active],
    )
}

/// Persons ordered by id. `exclude_admins` only applies together with `active_only`.
pub fn load_persons(conn: &Connection, active_only: bool, exclude_admins: bool) -> Result<Vec<Person>> {
    let mut conditions = Vec::new();
    if active_only {
        conditions.push("is_active = 1");
        if exclude_admins {
            conditions.push("is_admin = 0");
        }
    }

    let mut sql = PERSON_SELECT_SQL.to_string();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_person)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

pub fn load_queue(conn: &Connection, person: PersonId, class: QueueClass) -> Result<Option<u32>> {
    let sql = format!("SELECT {} FROM persons WHERE id = ?1", class.column());
    conn.query_row(&sql, [person], |row| row.get(0)).optional()
}

pub fn increment_queue(
    conn: &Connection,
    person: PersonId,
    class: QueueClass,
    days: u32,
) -> Result<usize> {
    let col = class.column();
    let sql = format!("UPDATE persons SET {col} = {col} + ?2 WHERE id = ?1");
    conn.execute(&sql, params![person, days])
}

/// Returns the number of rows changed: 0 when the counter was already zero.
pub fn decrement_queue(conn: &Connection, person: PersonId, class: QueueClass) -> Result<usize> {
    let col = class.column();
    let sql = format!("UPDATE persons SET {col} = {col} - 1 WHERE id = ?1 AND {col} > 0");
    conn.execute(&sql, [person])
}

// ---------------------------------------------------------------------------
// Off-duty
// ---------------------------------------------------------------------------

pub fn update_off_duty(
    conn: &Connection,
    person: PersonId,
    window: Option<OffDutyWindow>,
) -> Result<usize> {
    let (start, end) = match window {
        Some(w) => (Some(date_to_db(w.start)), Some(date_to_db(w.end))),
        None => (None, None),
    };
    conn.execute(
        "UPDATE persons SET off_duty_start = ?2, off_duty_end = ?3 WHERE id = ?1",
        params![person, start, end],
    )
}
