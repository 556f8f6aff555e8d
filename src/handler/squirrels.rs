//! Squirrel CRUD operations
//!
//! Each operation translates one storage call into a status line, headers,
//! and a body through the `Responder` primitives. Existence is always
//! checked with a single `get` before `update` or `delete`; the mutating
//! call is only issued when that read finds a record.

use crate::http::{parse_squirrel_form, Responder};
use crate::store::{SquirrelStore, StoreError};

/// GET /squirrels — the full collection as a JSON array, in store order
pub async fn index(store: &dyn SquirrelStore, out: &mut dyn Responder) -> Result<(), StoreError> {
    let squirrels = store.list().await?;
    let json = serde_json::to_vec(&squirrels)?;

    out.status(200);
    out.header("Content-Type", "application/json");
    out.body(&json);
    Ok(())
}

/// GET /squirrels/{id} — a single record as a JSON object, or 404
pub async fn retrieve(
    store: &dyn SquirrelStore,
    id: &str,
    out: &mut dyn Responder,
) -> Result<(), StoreError> {
    match store.get(id).await? {
        Some(squirrel) => {
            let json = serde_json::to_vec(&squirrel)?;
            out.status(200);
            out.header("Content-Type", "application/json");
            out.body(&json);
        }
        None => not_found(out),
    }
    Ok(())
}

/// POST /squirrels — create from a form body, 201 with no body
pub async fn create(
    store: &dyn SquirrelStore,
    body: &[u8],
    out: &mut dyn Responder,
) -> Result<(), StoreError> {
    let Some(form) = parse_squirrel_form(body) else {
        bad_request(out);
        return Ok(());
    };

    store.create(&form.name, &form.size).await?;
    out.status(201);
    Ok(())
}

/// PUT /squirrels/{id} — update an existing record, 204 with no body
pub async fn update(
    store: &dyn SquirrelStore,
    id: &str,
    body: &[u8],
    out: &mut dyn Responder,
) -> Result<(), StoreError> {
    // Lookup comes before body parsing: an unknown id is 404 regardless
    // of what the payload looks like
    if store.get(id).await?.is_none() {
        not_found(out);
        return Ok(());
    }

    let Some(form) = parse_squirrel_form(body) else {
        bad_request(out);
        return Ok(());
    };

    store.update(id, &form.name, &form.size).await?;
    out.status(204);
    Ok(())
}

/// DELETE /squirrels/{id} — remove an existing record, 204 with no body
pub async fn delete(
    store: &dyn SquirrelStore,
    id: &str,
    out: &mut dyn Responder,
) -> Result<(), StoreError> {
    if store.get(id).await?.is_none() {
        not_found(out);
        return Ok(());
    }

    store.delete(id).await?;
    out.status(204);
    Ok(())
}

/// Not-found responder: one status, one header, one body write, no matter
/// which code path funnelled here.
pub fn not_found(out: &mut dyn Responder) {
    out.status(404);
    out.header("Content-Type", "text/plain");
    out.body(b"404 Not Found");
}

/// Form body missing `name` or `size`
fn bad_request(out: &mut dyn Responder) {
    out.status(400);
    out.header("Content-Type", "text/plain");
    out.body(b"400 Bad Request");
}
