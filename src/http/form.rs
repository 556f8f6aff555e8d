//! Form-encoded body parsing
//!
//! POST/PUT payloads arrive as `key=value&key=value` pairs. The wire format
//! is intentionally asymmetric with the JSON response encoding; that is an
//! accepted property of the service, not something to fix here.

use url::form_urlencoded;

/// The two fields a create/update payload must carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquirrelForm {
    pub name: String,
    pub size: String,
}

/// Parse a form-encoded body into its `name` and `size` fields.
///
/// Returns `None` when either field is absent. Repeated keys keep the last
/// value. No validation beyond presence is performed.
pub fn parse_squirrel_form(body: &[u8]) -> Option<SquirrelForm> {
    let mut name = None;
    let mut size = None;

    for (key, value) in form_urlencoded::parse(body) {
        match key.as_ref() {
            "name" => name = Some(value.into_owned()),
            "size" => size = Some(value.into_owned()),
            _ => {}
        }
    }

    Some(SquirrelForm {
        name: name?,
        size: size?,
    })
}
