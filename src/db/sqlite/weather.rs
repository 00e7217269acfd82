//! Weather snapshot, replaced wholesale on every apply

use crate::db::sqlite::models::WeatherSnapshot;
use crate::error::Result;
use crate::sources::types::WeatherReport;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Delete every existing row, then insert the new one
pub fn apply_weather(conn: &mut Connection, report: &WeatherReport) -> Result<()> {
    let tx = conn.transaction()?;

    let removed = tx.execute("DELETE FROM weather", [])?;
    tx.execute(
        "INSERT INTO weather (city, temperature, description, humidity, wind_speed, condition_code, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            report.city,
            report.temperature,
            report.description,
            report.humidity,
            report.wind_speed,
            report.condition_code,
            Utc::now(),
        ],
    )?;

    tx.commit()?;

    tracing::info!("Updated weather for {} (replaced {} rows)", report.city, removed);
    Ok(())
}

pub fn current_weather(conn: &Connection) -> Result<Option<WeatherSnapshot>> {
    let snapshot = conn
        .query_row(
            "SELECT id, city, temperature, description, humidity, wind_speed, condition_code, last_updated
             FROM weather ORDER BY id LIMIT 1",
            [],
            |row| {
                Ok(WeatherSnapshot {
                    id: row.get(0)?,
                    city: row.get(1)?,
                    temperature: row.get(2)?,
                    description: row.get(3)?,
                    humidity: row.get(4)?,
                    wind_speed: row.get(5)?,
                    condition_code: row.get(6)?,
                    last_updated: row.get(7)?,
                })
            },
        )
        .optional()?;

    Ok(snapshot)
}

pub fn count_weather(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::migrations::run_migrations;

    fn report(city: &str, temperature: &str) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            temperature: temperature.to_string(),
            description: "Partly cloudy".to_string(),
            humidity: "71%".to_string(),
            wind_speed: "13 km/h".to_string(),
            condition_code: "116".to_string(),
        }
    }

    #[test]
    fn test_second_snapshot_replaces_first() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(current_weather(&conn).unwrap().is_none());

        apply_weather(&mut conn, &report("London", "12°C")).unwrap();
        apply_weather(&mut conn, &report("London", "14°C")).unwrap();

        assert_eq!(count_weather(&conn).unwrap(), 1);
        let current = current_weather(&conn).unwrap().unwrap();
        assert_eq!(current.temperature, "14°C");
        assert_eq!(current.condition_code, "116");
    }
}
