//! Чтение активной identity из встроенного KV-хранилища приложения.
//!
//! Источник: SQLite-файл state.vscdb, таблица ItemTable, значение по ключу
//! windsurfAuthStatus — JSON-объект со строковыми полями name/email.
//!
//! Политика: отсутствие файла/ключа и любой сбой open/query/parse — это
//! штатное состояние «не залогинен», а не ошибка: возвращается None (детали
//! уходят в debug-лог). Соединение открывается read-only и закрывается до
//! возврата — никаких удерживаемых блокировок.

use log::debug;
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ключ в ItemTable, под которым приложение хранит статус авторизации.
const AUTH_STATUS_KEY: &str = "windsurfAuthStatus";

/// Пара name/email, которую приложение считает «залогиненной».
/// Наблюдается и сравнивается, но не принадлежит этой системе.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub name: String,
    pub email: String,
}

/// Прочитать текущую identity из state.vscdb (read-only, без блокировок).
pub fn read_identity(state_db: &Path) -> Option<IdentityRecord> {
    if !state_db.exists() {
        debug!("identity: state store {} does not exist", state_db.display());
        return None;
    }

    let conn = match Connection::open_with_flags(
        state_db,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    ) {
        Ok(c) => c,
        Err(e) => {
            debug!("identity: open {} failed: {}", state_db.display(), e);
            return None;
        }
    };

    let value: Value = match conn.query_row(
        "SELECT value FROM ItemTable WHERE key = ?1",
        [AUTH_STATUS_KEY],
        |row| row.get(0),
    ) {
        Ok(v) => v,
        Err(e) => {
            debug!("identity: key lookup failed: {}", e);
            return None;
        }
    };

    // Значение встречается и как TEXT, и как BLOB (utf-8).
    let raw = match value {
        Value::Text(s) => s,
        Value::Blob(b) => match String::from_utf8(b) {
            Ok(s) => s,
            Err(e) => {
                debug!("identity: value is not utf-8: {}", e);
                return None;
            }
        },
        other => {
            debug!("identity: unexpected value type {:?}", other);
            return None;
        }
    };

    parse_auth_status(&raw)
}

fn parse_auth_status(raw: &str) -> Option<IdentityRecord> {
    let v: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            debug!("identity: auth status is not valid JSON: {}", e);
            return None;
        }
    };
    let name = v.get("name")?.as_str()?.to_string();
    let email = v.get("email")?.as_str()?.to_string();
    Some(IdentityRecord { name, email })
}
