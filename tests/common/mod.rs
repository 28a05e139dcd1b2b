//! Ray database files on disk for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use raypath::core::{NODE_COLUMNS, PATH_COLUMNS};
use rusqlite::Connection;
use tempfile::TempDir;

/// A database file that lives as long as the fixture.
pub struct RayDb {
    _dir: TempDir,
    path: PathBuf,
}

impl RayDb {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Node row: id, pos_out, wo, optional hit of the outgoing ray,
/// optional light hit (wi_light = +Y), optional object hit (wi_obj = +X).
pub struct NodeRow {
    pub id: i64,
    pub pos_out: [f64; 3],
    pub wo: [f64; 3],
    pub hit: Option<[f64; 3]>,
    pub light: Option<[f64; 3]>,
    pub obj: Option<[f64; 3]>,
}

impl NodeRow {
    pub fn escaped(id: i64, pos_out: [f64; 3], wo: [f64; 3]) -> Self {
        Self { id, pos_out, wo, hit: None, light: None, obj: None }
    }

    pub fn hit(id: i64, pos_out: [f64; 3], hit: [f64; 3]) -> Self {
        Self { id, pos_out, wo: [0.0, 0.0, 1.0], hit: Some(hit), light: None, obj: None }
    }

    fn values(&self) -> Vec<rusqlite::types::Value> {
        use rusqlite::types::Value;

        fn vec3(out: &mut Vec<Value>, v: [f64; 3]) {
            out.extend(v.map(Value::Real));
        }
        fn point(out: &mut Vec<Value>, p: Option<[f64; 3]>) {
            out.push(Value::Integer(i64::from(p.is_some())));
            match p {
                Some(p) => vec3(out, p),
                // Recorder leaves a missed hit undefined
                None => out.extend([Value::Null, Value::Null, Value::Null]),
            }
        }

        let mut v = vec![Value::Integer(self.id)];
        vec3(&mut v, [0.5, 0.5, 0.5]);
        vec3(&mut v, self.wo);
        vec3(&mut v, self.pos_out);
        point(&mut v, self.hit);
        vec3(&mut v, [1.0, 1.0, 1.0]);
        vec3(&mut v, [0.0, 1.0, 0.0]);
        point(&mut v, self.light);
        vec3(&mut v, [0.2, 0.2, 0.2]);
        vec3(&mut v, [1.0, 0.0, 0.0]);
        point(&mut v, self.obj);
        v.push(Value::Real(0.8));
        v.push(Value::Integer(0));
        v
    }
}

fn create_tables(conn: &Connection, node_columns: &[&str], path_columns: &[&str]) {
    let quote = |cols: &[&str]| cols.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE node ({});\nCREATE TABLE path ({});",
        quote(node_columns),
        quote(path_columns)
    ))
    .unwrap();
}

/// Write a database with the recorder's layout.
///
/// `paths` holds (row, col, node_cnt, node_ids text) exactly as stored.
pub fn ray_db(nodes: &[NodeRow], paths: &[(i32, i32, i64, &str)]) -> RayDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rays.db");
    let conn = Connection::open(&path).unwrap();
    create_tables(&conn, &NODE_COLUMNS, &PATH_COLUMNS);

    let placeholders = vec!["?"; NODE_COLUMNS.len()].join(", ");
    for node in nodes {
        conn.execute(
            &format!("INSERT INTO node VALUES ({})", placeholders),
            rusqlite::params_from_iter(node.values()),
        )
        .unwrap();
    }
    for (row, col, cnt, ids) in paths {
        conn.execute(
            "INSERT INTO path VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row, col, cnt, ids],
        )
        .unwrap();
    }
    drop(conn);

    RayDb { _dir: dir, path }
}

/// Write a database whose node table is missing its last column.
pub fn truncated_db() -> RayDb {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.db");
    let conn = Connection::open(&path).unwrap();
    create_tables(&conn, &NODE_COLUMNS[..NODE_COLUMNS.len() - 1], &PATH_COLUMNS);
    drop(conn);

    RayDb { _dir: dir, path }
}
