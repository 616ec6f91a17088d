use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::{FeedingType, FoodTexture, Sex};
use crate::models::{InfantProfile, ProfileDraft};

const PROFILE_COLUMNS: &str = "id, name, sex, birth_date, is_preterm, gestational_weeks,
     weight_kg, height_cm, head_circumference_cm, feeding_type, daily_milk_ml,
     solids_start_month, allergies, health_conditions, supplements, food_texture,
     disliked_foods, eats_independently, family_dietary_notes, city, record_date,
     created_at, updated_at";

/// Insert a new snapshot for a child. Returns the row id.
/// `record_date` defaults to today when the draft leaves it unset.
pub fn insert_snapshot(conn: &Connection, draft: &ProfileDraft) -> Result<i64, DatabaseError> {
    let record_date = draft
        .record_date
        .unwrap_or_else(|| Local::now().date_naive());

    conn.execute(
        "INSERT INTO infant_profiles (
            name, sex, birth_date, is_preterm, gestational_weeks,
            weight_kg, height_cm, head_circumference_cm, feeding_type, daily_milk_ml,
            solids_start_month, allergies, health_conditions, supplements, food_texture,
            disliked_foods, eats_independently, family_dietary_notes, city, record_date
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                   ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            draft.normalized_name(),
            draft.sex.as_str(),
            draft.birth_date,
            draft.is_preterm,
            draft.effective_gestational_weeks(),
            draft.weight_kg,
            draft.height_cm,
            draft.head_circumference_cm,
            draft.feeding_type.map(|f| f.as_str()),
            draft.daily_milk_ml,
            draft.solids_start_month,
            draft.allergies,
            draft.health_conditions,
            draft.supplements,
            draft.food_texture.map(|t| t.as_str()),
            draft.disliked_foods,
            draft.eats_independently,
            draft.family_dietary_notes,
            draft.city,
            record_date,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Get one snapshot by id.
pub fn get_snapshot(conn: &Connection, id: i64) -> Result<Option<InfantProfile>, DatabaseError> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM infant_profiles WHERE id = ?1");
    let result = conn.query_row(&sql, params![id], profile_row);

    match result {
        Ok(row) => Ok(Some(profile_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The most recent snapshot for a child. `id DESC` breaks ties between two
/// snapshots recorded on the same day.
pub fn latest_snapshot(
    conn: &Connection,
    name: &str,
) -> Result<Option<InfantProfile>, DatabaseError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM infant_profiles
         WHERE name = ?1
         ORDER BY record_date DESC, id DESC
         LIMIT 1"
    );
    let result = conn.query_row(&sql, params![name], profile_row);

    match result {
        Ok(row) => Ok(Some(profile_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All snapshots for a child, newest first.
pub fn snapshot_history(
    conn: &Connection,
    name: &str,
) -> Result<Vec<InfantProfile>, DatabaseError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM infant_profiles
         WHERE name = ?1
         ORDER BY record_date DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![name], profile_row)?;

    let mut profiles = Vec::new();
    for row in rows {
        profiles.push(profile_from_row(row?)?);
    }
    Ok(profiles)
}

/// Distinct child names, sorted.
pub fn list_child_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT DISTINCT name FROM infant_profiles ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Overwrite a snapshot in place (edit-form resubmission). The record date
/// is untouched; `updated_at` is bumped. Returns false when the id is gone.
pub fn update_snapshot(
    conn: &Connection,
    id: i64,
    draft: &ProfileDraft,
) -> Result<bool, DatabaseError> {
    let rows_affected = conn.execute(
        "UPDATE infant_profiles SET
            name = ?1, sex = ?2, birth_date = ?3, is_preterm = ?4, gestational_weeks = ?5,
            weight_kg = ?6, height_cm = ?7, head_circumference_cm = ?8, feeding_type = ?9,
            daily_milk_ml = ?10, solids_start_month = ?11, allergies = ?12,
            health_conditions = ?13, supplements = ?14, food_texture = ?15,
            disliked_foods = ?16, eats_independently = ?17, family_dietary_notes = ?18,
            city = ?19, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?20",
        params![
            draft.normalized_name(),
            draft.sex.as_str(),
            draft.birth_date,
            draft.is_preterm,
            draft.effective_gestational_weeks(),
            draft.weight_kg,
            draft.height_cm,
            draft.head_circumference_cm,
            draft.feeding_type.map(|f| f.as_str()),
            draft.daily_milk_ml,
            draft.solids_start_month,
            draft.allergies,
            draft.health_conditions,
            draft.supplements,
            draft.food_texture.map(|t| t.as_str()),
            draft.disliked_foods,
            draft.eats_independently,
            draft.family_dietary_notes,
            draft.city,
            id,
        ],
    )?;
    Ok(rows_affected > 0)
}

/// Delete one snapshot. The child's chat messages go with it: chat history
/// is keyed by name and is removed whenever a snapshot is deleted.
pub fn delete_snapshot(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM infant_profiles WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(name) = name {
        conn.execute(
            "DELETE FROM chat_messages WHERE child_name = ?1",
            params![name],
        )?;
    }

    let rows_affected =
        conn.execute("DELETE FROM infant_profiles WHERE id = ?1", params![id])?;
    Ok(rows_affected > 0)
}

/// Delete a child entirely: every snapshot and every chat message.
pub fn delete_child(conn: &Connection, name: &str) -> Result<bool, DatabaseError> {
    conn.execute(
        "DELETE FROM chat_messages WHERE child_name = ?1",
        params![name],
    )?;
    let rows_affected = conn.execute(
        "DELETE FROM infant_profiles WHERE name = ?1",
        params![name],
    )?;
    Ok(rows_affected > 0)
}

struct ProfileRow {
    id: i64,
    name: String,
    sex: String,
    birth_date: NaiveDate,
    is_preterm: bool,
    gestational_weeks: Option<u32>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    head_circumference_cm: Option<f64>,
    feeding_type: Option<String>,
    daily_milk_ml: Option<f64>,
    solids_start_month: Option<f64>,
    allergies: Option<String>,
    health_conditions: Option<String>,
    supplements: Option<String>,
    food_texture: Option<String>,
    disliked_foods: Option<String>,
    eats_independently: bool,
    family_dietary_notes: Option<String>,
    city: Option<String>,
    record_date: NaiveDate,
    created_at: String,
    updated_at: String,
}

fn profile_row(row: &rusqlite::Row<'_>) -> Result<ProfileRow, rusqlite::Error> {
    Ok(ProfileRow {
        id: row.get(0)?,
        name: row.get(1)?,
        sex: row.get(2)?,
        birth_date: row.get(3)?,
        is_preterm: row.get(4)?,
        gestational_weeks: row.get(5)?,
        weight_kg: row.get(6)?,
        height_cm: row.get(7)?,
        head_circumference_cm: row.get(8)?,
        feeding_type: row.get(9)?,
        daily_milk_ml: row.get(10)?,
        solids_start_month: row.get(11)?,
        allergies: row.get(12)?,
        health_conditions: row.get(13)?,
        supplements: row.get(14)?,
        food_texture: row.get(15)?,
        disliked_foods: row.get(16)?,
        eats_independently: row.get(17)?,
        family_dietary_notes: row.get(18)?,
        city: row.get(19)?,
        record_date: row.get(20)?,
        created_at: row.get(21)?,
        updated_at: row.get(22)?,
    })
}

fn profile_from_row(row: ProfileRow) -> Result<InfantProfile, DatabaseError> {
    Ok(InfantProfile {
        id: row.id,
        name: row.name,
        sex: Sex::from_str(&row.sex)?,
        birth_date: row.birth_date,
        is_preterm: row.is_preterm,
        gestational_weeks: row.gestational_weeks,
        weight_kg: row.weight_kg,
        height_cm: row.height_cm,
        head_circumference_cm: row.head_circumference_cm,
        feeding_type: row
            .feeding_type
            .as_deref()
            .map(FeedingType::from_str)
            .transpose()?,
        daily_milk_ml: row.daily_milk_ml,
        solids_start_month: row.solids_start_month,
        allergies: row.allergies,
        health_conditions: row.health_conditions,
        supplements: row.supplements,
        food_texture: row
            .food_texture
            .as_deref()
            .map(FoodTexture::from_str)
            .transpose()?,
        disliked_foods: row.disliked_foods,
        eats_independently: row.eats_independently,
        family_dietary_notes: row.family_dietary_notes,
        city: row.city,
        record_date: row.record_date,
        created_at: NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        updated_at: NaiveDateTime::parse_from_str(&row.updated_at, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::chat::{append_message, message_count};
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::ChatRole;

    fn draft(name: &str, record_date: &str) -> ProfileDraft {
        ProfileDraft {
            name: name.into(),
            sex: Sex::Male,
            birth_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            is_preterm: false,
            gestational_weeks: None,
            weight_kg: Some(8.1),
            height_cm: Some(70.5),
            head_circumference_cm: Some(44.8),
            feeding_type: Some(FeedingType::Mixed),
            daily_milk_ml: Some(500.0),
            solids_start_month: Some(6.0),
            allergies: Some("egg".into()),
            health_conditions: None,
            supplements: Some("vitamin D, iron".into()),
            food_texture: Some(FoodTexture::SoftChunks),
            disliked_foods: Some("broccoli".into()),
            eats_independently: true,
            family_dietary_notes: None,
            city: Some("Chengdu".into()),
            record_date: Some(NaiveDate::parse_from_str(record_date, "%Y-%m-%d").unwrap()),
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let conn = open_memory_database().unwrap();
        let id = insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();

        let profile = get_snapshot(&conn, id).unwrap().unwrap();
        assert_eq!(profile.name, "Bo");
        assert_eq!(profile.sex, Sex::Male);
        assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(profile.weight_kg, Some(8.1));
        assert_eq!(profile.feeding_type, Some(FeedingType::Mixed));
        assert_eq!(profile.food_texture, Some(FoodTexture::SoftChunks));
        assert_eq!(profile.allergies.as_deref(), Some("egg"));
        assert!(profile.eats_independently);
        assert_eq!(
            profile.record_date,
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        );
    }

    #[test]
    fn get_missing_snapshot_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_snapshot(&conn, 999).unwrap().is_none());
    }

    #[test]
    fn latest_snapshot_picks_newest_record_date() {
        let conn = open_memory_database().unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-08-01")).unwrap();
        let newest = insert_snapshot(&conn, &draft("Bo", "2025-12-01")).unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();

        let profile = latest_snapshot(&conn, "Bo").unwrap().unwrap();
        assert_eq!(profile.id, newest);
    }

    #[test]
    fn latest_snapshot_same_day_prefers_later_insert() {
        let conn = open_memory_database().unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();
        let second = insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();

        let profile = latest_snapshot(&conn, "Bo").unwrap().unwrap();
        assert_eq!(profile.id, second);
    }

    #[test]
    fn history_is_newest_first() {
        let conn = open_memory_database().unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-06-01")).unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-12-01")).unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-09-01")).unwrap();
        insert_snapshot(&conn, &draft("An", "2025-09-01")).unwrap();

        let history = snapshot_history(&conn, "Bo").unwrap();
        assert_eq!(history.len(), 3);
        let dates: Vec<String> = history
            .iter()
            .map(|p| p.record_date.to_string())
            .collect();
        assert_eq!(dates, ["2025-12-01", "2025-09-01", "2025-06-01"]);
    }

    #[test]
    fn child_names_distinct_and_sorted() {
        let conn = open_memory_database().unwrap();
        insert_snapshot(&conn, &draft("Mei", "2025-09-01")).unwrap();
        insert_snapshot(&conn, &draft("An", "2025-09-01")).unwrap();
        insert_snapshot(&conn, &draft("Mei", "2025-12-01")).unwrap();

        let names = list_child_names(&conn).unwrap();
        assert_eq!(names, ["An", "Mei"]);
    }

    #[test]
    fn update_overwrites_fields_keeps_record_date() {
        let conn = open_memory_database().unwrap();
        let id = insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();

        let mut edited = draft("Bo", "2025-10-01");
        edited.weight_kg = Some(9.0);
        edited.disliked_foods = None;
        edited.record_date = Some(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

        assert!(update_snapshot(&conn, id, &edited).unwrap());

        let profile = get_snapshot(&conn, id).unwrap().unwrap();
        assert_eq!(profile.weight_kg, Some(9.0));
        assert_eq!(profile.disliked_foods, None);
        // record_date is not part of the edit form
        assert_eq!(
            profile.record_date,
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        );
    }

    #[test]
    fn update_missing_snapshot_returns_false() {
        let conn = open_memory_database().unwrap();
        assert!(!update_snapshot(&conn, 42, &draft("Bo", "2025-10-01")).unwrap());
    }

    #[test]
    fn delete_snapshot_cascades_chat() {
        let conn = open_memory_database().unwrap();
        let id = insert_snapshot(&conn, &draft("Bo", "2025-10-01")).unwrap();
        append_message(&conn, "Bo", ChatRole::User, "Is yogurt ok at 8 months?").unwrap();
        append_message(&conn, "An", ChatRole::User, "unrelated").unwrap();

        assert!(delete_snapshot(&conn, id).unwrap());
        assert!(get_snapshot(&conn, id).unwrap().is_none());
        assert_eq!(message_count(&conn, "Bo").unwrap(), 0);
        // other children untouched
        assert_eq!(message_count(&conn, "An").unwrap(), 1);
    }

    #[test]
    fn delete_missing_snapshot_returns_false() {
        let conn = open_memory_database().unwrap();
        assert!(!delete_snapshot(&conn, 7).unwrap());
    }

    #[test]
    fn delete_child_removes_all_snapshots_and_chat() {
        let conn = open_memory_database().unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-08-01")).unwrap();
        insert_snapshot(&conn, &draft("Bo", "2025-12-01")).unwrap();
        append_message(&conn, "Bo", ChatRole::User, "hello").unwrap();

        assert!(delete_child(&conn, "Bo").unwrap());
        assert!(snapshot_history(&conn, "Bo").unwrap().is_empty());
        assert_eq!(message_count(&conn, "Bo").unwrap(), 0);
    }

    #[test]
    fn insert_trims_name() {
        let conn = open_memory_database().unwrap();
        let mut d = draft("  Bo ", "2025-10-01");
        d.name = "  Bo ".into();
        let id = insert_snapshot(&conn, &d).unwrap();
        let profile = get_snapshot(&conn, id).unwrap().unwrap();
        assert_eq!(profile.name, "Bo");
    }

    #[test]
    fn full_term_insert_stores_no_gestational_weeks() {
        let conn = open_memory_database().unwrap();
        let mut d = draft("Bo", "2025-10-01");
        d.gestational_weeks = Some(34); // stale form value, is_preterm = false
        let id = insert_snapshot(&conn, &d).unwrap();
        let profile = get_snapshot(&conn, id).unwrap().unwrap();
        assert_eq!(profile.gestational_weeks, None);
    }
}
