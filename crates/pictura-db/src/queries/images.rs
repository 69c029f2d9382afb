//! Image database queries.
//!
//! This module provides the operations the gallery needs on the `images`
//! table: insert, lookup, newest-first listing, count and delete.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use pictura_common::{Error, ImageId, Result};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::models::{Image, NewImage};

const IMAGE_COLUMNS: &str = "id, name, path, size, created_at";

/// Parse an image from a database row.
///
/// Expects columns in order: id, name, path, size, created_at.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<Image> {
    let size: i64 = row.get(3)?;
    let size = u64::try_from(size)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Image {
        id: ImageId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        path: row.get(2)?,
        size,
        created_at,
    })
}

/// Format a timestamp for the `created_at` column.
///
/// Fixed microsecond precision keeps string order equal to time order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Insert a new image record stamped with the current time.
///
/// # Returns
///
/// * `Ok(Image)` - The stored record, including its assigned ID
/// * `Err(Error)` - If a database error occurs
pub fn insert_image(conn: &Connection, image: &NewImage) -> Result<Image> {
    insert_image_at(conn, image, Utc::now())
}

/// Insert a new image record with an explicit creation time.
///
/// The timestamp is truncated to microseconds, the precision it is stored at.
pub fn insert_image_at(
    conn: &Connection,
    image: &NewImage,
    created_at: DateTime<Utc>,
) -> Result<Image> {
    let created_at = created_at.trunc_subsecs(6);
    let size = i64::try_from(image.size)
        .map_err(|_| Error::invalid_input(format!("Image size {} out of range", image.size)))?;

    conn.execute(
        "INSERT INTO images (name, path, size, created_at)
         VALUES (:name, :path, :size, :created_at)",
        rusqlite::named_params! {
            ":name": &image.name,
            ":path": &image.path,
            ":size": size,
            ":created_at": format_timestamp(&created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Image {
        id: ImageId::from(conn.last_insert_rowid()),
        name: image.name.clone(),
        path: image.path.clone(),
        size: image.size,
        created_at,
    })
}

/// Get an image by ID.
///
/// # Returns
///
/// * `Ok(Some(Image))` - The image if found
/// * `Ok(None)` - If the image does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<Image>> {
    let result = conn.query_row(
        &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all images, most recently created first.
pub fn list_images(conn: &Connection) -> Result<Vec<Image>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at DESC, id DESC"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map([], parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// List the `limit` most recently created images, newest first.
pub fn list_recent_images(conn: &Connection, limit: usize) -> Result<Vec<Image>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {IMAGE_COLUMNS} FROM images
             ORDER BY created_at DESC, id DESC
             LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map(rusqlite::named_params! { ":limit": limit }, parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Count all image records.
pub fn count_images(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(u64::try_from(count).unwrap_or(0))
}

/// Delete an image by ID.
///
/// Only the record is removed; the stored file is left to the caller.
///
/// # Returns
///
/// * `Ok(true)` - If the image was deleted
/// * `Ok(false)` - If the image did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_image(conn: &Connection, id: ImageId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM images WHERE id = :id",
            rusqlite::named_params! { ":id": id.get() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}
