use crate::errors::{AppError, AppResult};
use crate::models::{Grid, HistoryEntry, Program, RecordId, Trainee};
use rusqlite::{Connection, Result, Row, params};

fn row_id(row: &Row, col: &str) -> Result<RecordId> {
    Ok(RecordId::from(row.get::<_, i64>(col)?))
}

/// Rowid behind a durable id; temporary or foreign ids never match a row.
pub fn db_id(id: &RecordId) -> AppResult<i64> {
    id.as_i64()
        .ok_or_else(|| AppError::Store(format!("'{id}' is not a stored id")))
}

pub fn map_trainee(row: &Row) -> Result<Trainee> {
    Ok(Trainee {
        id: row_id(row, "id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_program(row: &Row) -> Result<Program> {
    let raw: String = row.get("data")?;
    let data: Grid = serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Program {
        id: row_id(row, "id")?,
        trainee_id: RecordId::new(row.get::<_, String>("trainee_id")?),
        title: row.get("title")?,
        data,
        order_index: row.get("order_index")?,
    })
}

pub fn map_history(row: &Row) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row_id(row, "id")?,
        timestamp: row.get("timestamp")?,
        trainee_id: RecordId::new(row.get::<_, String>("trainee_id")?),
        trainee_name: row.get("trainee_name")?,
        action: row.get("action")?,
        description: row.get("description")?,
    })
}

// ---------------------------
// Trainees
// ---------------------------

pub fn load_trainees(conn: &Connection) -> AppResult<Vec<Trainee>> {
    let mut stmt = conn.prepare("SELECT * FROM trainees ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_trainee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_trainee(conn: &Connection, t: &Trainee) -> AppResult<RecordId> {
    conn.execute(
        "INSERT INTO trainees (name, created_at) VALUES (?1, ?2)",
        params![t.name, t.created_at],
    )?;
    Ok(RecordId::from(conn.last_insert_rowid()))
}

pub fn update_trainee(conn: &Connection, t: &Trainee) -> AppResult<()> {
    conn.execute(
        "UPDATE trainees SET name = ?1, created_at = ?2 WHERE id = ?3",
        params![t.name, t.created_at, db_id(&t.id)?],
    )?;
    Ok(())
}

/// Remove a trainee together with its programs and history, atomically.
pub fn delete_trainee_cascade(conn: &mut Connection, id: &RecordId) -> AppResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM programs WHERE trainee_id = ?1", [id.as_str()])?;
    tx.execute("DELETE FROM history WHERE trainee_id = ?1", [id.as_str()])?;
    tx.execute("DELETE FROM trainees WHERE id = ?1", [db_id(id)?])?;
    tx.commit()?;
    Ok(())
}

// ---------------------------
// Programs
// ---------------------------

pub fn load_programs(conn: &Connection, trainee: Option<&RecordId>) -> AppResult<Vec<Program>> {
    let mut out = Vec::new();
    match trainee {
        Some(t) => {
            let mut stmt = conn.prepare(
                "SELECT * FROM programs WHERE trainee_id = ?1 ORDER BY order_index ASC, id ASC",
            )?;
            for r in stmt.query_map([t.as_str()], map_program)? {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT * FROM programs ORDER BY id ASC")?;
            for r in stmt.query_map([], map_program)? {
                out.push(r?);
            }
        }
    }
    Ok(out)
}

pub fn insert_program(conn: &Connection, p: &Program) -> AppResult<RecordId> {
    conn.execute(
        "INSERT INTO programs (trainee_id, title, data, order_index)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            p.trainee_id.as_str(),
            p.title,
            serde_json::to_string(&p.data)?,
            p.order_index,
        ],
    )?;
    Ok(RecordId::from(conn.last_insert_rowid()))
}

pub fn update_program(conn: &Connection, p: &Program) -> AppResult<()> {
    conn.execute(
        "UPDATE programs
         SET trainee_id = ?1, title = ?2, data = ?3, order_index = ?4
         WHERE id = ?5",
        params![
            p.trainee_id.as_str(),
            p.title,
            serde_json::to_string(&p.data)?,
            p.order_index,
            db_id(&p.id)?,
        ],
    )?;
    Ok(())
}

pub fn delete_program(conn: &Connection, id: &RecordId) -> AppResult<()> {
    conn.execute("DELETE FROM programs WHERE id = ?1", [db_id(id)?])?;
    Ok(())
}

// ---------------------------
// History
// ---------------------------

pub fn load_history(conn: &Connection, trainee: Option<&RecordId>) -> AppResult<Vec<HistoryEntry>> {
    let mut out = Vec::new();
    match trainee {
        Some(t) => {
            let mut stmt =
                conn.prepare("SELECT * FROM history WHERE trainee_id = ?1 ORDER BY id ASC")?;
            for r in stmt.query_map([t.as_str()], map_history)? {
                out.push(r?);
            }
        }
        None => {
            let mut stmt = conn.prepare("SELECT * FROM history ORDER BY id ASC")?;
            for r in stmt.query_map([], map_history)? {
                out.push(r?);
            }
        }
    }
    Ok(out)
}

pub fn insert_history(conn: &Connection, h: &HistoryEntry) -> AppResult<RecordId> {
    conn.execute(
        "INSERT INTO history (timestamp, trainee_id, trainee_name, action, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            h.timestamp,
            h.trainee_id.as_str(),
            h.trainee_name,
            h.action,
            h.description,
        ],
    )?;
    Ok(RecordId::from(conn.last_insert_rowid()))
}

pub fn delete_history(conn: &Connection, id: &RecordId) -> AppResult<()> {
    conn.execute("DELETE FROM history WHERE id = ?1", [db_id(id)?])?;
    Ok(())
}
