//! In-memory ray databases for unit tests.

use rusqlite::types::Value;
use rusqlite::params_from_iter;

use crate::core::{RayNode, RayPath, NODE_COLUMNS, PATH_COLUMNS};
use crate::store::SqliteStore;
use crate::util::Vec3;

/// Create `node` and `path` tables with the recorder's layout.
pub(crate) fn create_tables(conn: &rusqlite::Connection) {
    let node_cols = NODE_COLUMNS.map(|c| format!("\"{}\"", c)).join(", ");
    let path_cols = PATH_COLUMNS.map(|c| format!("\"{}\"", c)).join(", ");
    conn.execute_batch(&format!(
        "CREATE TABLE node ({});\nCREATE TABLE path ({});",
        node_cols, path_cols
    ))
    .unwrap();
}

fn push_vec3(values: &mut Vec<Value>, v: Vec3) {
    values.extend([v.x, v.y, v.z].map(|c| Value::Real(f64::from(c))));
}

fn push_point(values: &mut Vec<Value>, p: Option<Vec3>) {
    values.push(Value::Integer(i64::from(p.is_some())));
    push_vec3(values, p.unwrap_or(Vec3::ZERO));
}

/// Cells of `node` in table order.
pub(crate) fn node_values(node: &RayNode) -> Vec<Value> {
    let mut v = vec![Value::Integer(node.id)];
    push_vec3(&mut v, node.lo);
    push_vec3(&mut v, node.wo);
    push_vec3(&mut v, node.pos_out);
    push_point(&mut v, node.pos_inter);
    push_vec3(&mut v, node.li_light);
    push_vec3(&mut v, node.wi_light);
    push_point(&mut v, node.pos_in_light);
    push_vec3(&mut v, node.li_obj);
    push_vec3(&mut v, node.wi_obj);
    push_point(&mut v, node.pos_in_obj);
    v.push(Value::Real(f64::from(node.rr)));
    v.push(Value::Integer(i64::from(node.is_obj_emission)));
    v
}

pub(crate) fn insert_node(conn: &rusqlite::Connection, node: &RayNode) {
    let placeholders = vec!["?"; NODE_COLUMNS.len()].join(", ");
    conn.execute(
        &format!("INSERT INTO node VALUES ({})", placeholders),
        params_from_iter(node_values(node)),
    )
    .unwrap();
}

pub(crate) fn insert_path(conn: &rusqlite::Connection, path: &RayPath) {
    let ids = path
        .path_node_ids
        .iter()
        .map(|id| format!("{} ", id))
        .collect::<String>();
    conn.execute(
        "INSERT INTO path VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![path.row, path.col, path.node_cnt as i64, ids],
    )
    .unwrap();
}

/// In-memory store holding `nodes` and `paths`.
pub(crate) fn fixture_store(nodes: &[RayNode], paths: &[RayPath]) -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    create_tables(store.connection());
    for node in nodes {
        insert_node(store.connection(), node);
    }
    for path in paths {
        insert_path(store.connection(), path);
    }
    store
}

/// Node whose outgoing ray escapes the scene.
pub(crate) fn escaped_node(id: i64, pos_out: Vec3, wo: Vec3) -> RayNode {
    RayNode { id, pos_out, wo, rr: 1.0, ..Default::default() }
}

/// Node that hits a surface at `hit`, with the given light and object hits.
pub(crate) fn hit_node(
    id: i64,
    pos_out: Vec3,
    hit: Vec3,
    light: Option<Vec3>,
    obj: Option<Vec3>,
) -> RayNode {
    RayNode {
        id,
        pos_out,
        wo: (hit - pos_out).normalize_or_zero(),
        pos_inter: Some(hit),
        wi_light: Vec3::Y,
        pos_in_light: light,
        wi_obj: Vec3::X,
        pos_in_obj: obj,
        rr: 0.8,
        ..Default::default()
    }
}

pub(crate) fn path(row: i32, col: i32, ids: &[i64]) -> RayPath {
    RayPath { row, col, node_cnt: ids.len(), path_node_ids: ids.to_vec() }
}
