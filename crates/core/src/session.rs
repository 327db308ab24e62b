//! Canonical session record and login-response normalization.
//!
//! The backend's `/auth/login` payload is not contractually fixed: the
//! token key, the user object, and the role list all arrive in several
//! shapes depending on the backend version. [`SessionData::apply_login_response`]
//! maps any of them into the canonical record, defaulting malformed fields
//! instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::roles::ROLE_ADMIN;

/// Canonical per-browser session record.
///
/// `Default` is the unauthenticated state. Absence of `auth_token` is the
/// sole "not logged in" signal the gates look at.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionData {
    /// Bearer token from the last successful login, if any.
    pub auth_token: Option<String>,
    /// Upper-cased role names; may be empty.
    pub roles: Vec<String>,
    /// Duplicate of `roles`. The session dump is part of the debug
    /// console's observable surface, so both keys are kept.
    pub auth_roles: Vec<String>,
    /// Whether `roles` contains [`ROLE_ADMIN`]. Recomputed on every login.
    pub is_admin: bool,
    /// Premium flag; `0` when absent or non-coercible.
    pub premium: i64,
    /// DNI-block flag; `0` when absent or non-coercible.
    pub dni_bloqueado: i64,
    /// Normalized user object; always carries `premium` and `dni_bloqueado`.
    pub user: Map<String, Value>,
    pub auth_user_id: Option<String>,
    /// `nombre` if present, else the email.
    pub auth_user_name: Option<String>,
    pub auth_user_email: Option<String>,
}

impl SessionData {
    /// Whether this session holds an auth token.
    pub fn is_logged_in(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Normalize a backend login response into this record.
    ///
    /// Never fails: malformed fields fall back to their defaults, and a
    /// non-object payload leaves the record untouched.
    ///
    /// Tolerated shapes:
    /// - token under `access_token`, `token`, or `jwt` (first non-empty
    ///   string wins; none found leaves the token unset);
    /// - a nested `user` object, or the whole payload as the user object
    ///   when `user` is absent or not an object;
    /// - `premium` / `dni_bloqueado` on the user object or at the top
    ///   level, integer-coerced with a `0` default;
    /// - roles as a single string, a list of strings, or a list of
    ///   objects named under `name`/`role`/`code`/`codigo` (see
    ///   [`RolesField`]); retained names are upper-cased;
    /// - id under `user.id`, `user.user_id`, top-level `user_id`, or
    ///   top-level `id`.
    pub fn apply_login_response(&mut self, data: &Value) {
        let Value::Object(top) = data else { return };

        // Token: keep a previously stored token when this response has none.
        if let Some(token) = first_non_empty_string(&[
            top.get("access_token"),
            top.get("token"),
            top.get("jwt"),
        ]) {
            self.auth_token = Some(token);
        }

        // User object, falling back to the flat top-level payload.
        let mut user: Map<String, Value> = match top.get("user") {
            Some(Value::Object(m)) => m.clone(),
            _ => top.clone(),
        };

        let premium = coerce_int(user.get("premium").or_else(|| top.get("premium")));
        user.insert("premium".to_string(), premium.into());
        self.premium = premium;

        let dni_bloqueado = coerce_int(user.get("dni_bloqueado").or_else(|| top.get("dni_bloqueado")));
        user.insert("dni_bloqueado".to_string(), dni_bloqueado.into());
        self.dni_bloqueado = dni_bloqueado;

        // Roles, then the admin flag derived from the final list.
        let roles = first_roles_source(&user, top)
            .and_then(|v| serde_json::from_value::<RolesField>(v.clone()).ok())
            .map(RolesField::into_names)
            .unwrap_or_default();
        self.is_admin = roles.iter().any(|r| r == ROLE_ADMIN);
        self.roles = roles.clone();
        self.auth_roles = roles;

        // Identity: keep a previously stored id when this response has none.
        if let Some(uid) = [
            user.get("id"),
            user.get("user_id"),
            top.get("user_id"),
            top.get("id"),
        ]
        .into_iter()
        .flatten()
        .find_map(scalar_to_string)
        {
            self.auth_user_id = Some(uid);
        }

        self.auth_user_email = non_empty_str(&user, "email");
        self.auth_user_name = non_empty_str(&user, "nombre").or_else(|| self.auth_user_email.clone());

        self.user = user;
    }
}

/// Role list shapes accepted from the backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RolesField {
    One(String),
    Many(Vec<RoleEntry>),
}

/// One element of a role list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleEntry {
    Name(String),
    Named {
        name: Option<String>,
        role: Option<String>,
        code: Option<String>,
        codigo: Option<String>,
    },
    /// Anything else (numbers, nulls, nested lists); dropped.
    Other(Value),
}

impl RolesField {
    /// Upper-cased role names; elements yielding no name are dropped.
    fn into_names(self) -> Vec<String> {
        match self {
            RolesField::One(name) => vec![name.to_uppercase()],
            RolesField::Many(entries) => entries
                .iter()
                .filter_map(RoleEntry::name)
                .map(str::to_uppercase)
                .collect(),
        }
    }
}

impl RoleEntry {
    /// The role name carried by this element, if any.
    fn name(&self) -> Option<&str> {
        match self {
            RoleEntry::Name(s) => Some(s.as_str()).filter(|s| !s.is_empty()),
            RoleEntry::Named {
                name,
                role,
                code,
                codigo,
            } => [name, role, code, codigo]
                .into_iter()
                .flatten()
                .map(String::as_str)
                .find(|s| !s.is_empty()),
            RoleEntry::Other(_) => None,
        }
    }
}

/// The first role source that is present and non-empty: `user.roles`,
/// `user.role`, then the top-level `roles`.
fn first_roles_source<'a>(user: &'a Map<String, Value>, top: &'a Map<String, Value>) -> Option<&'a Value> {
    [user.get("roles"), user.get("role"), top.get("roles")]
        .into_iter()
        .flatten()
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        })
}

/// First non-empty string among the candidate values.
fn first_non_empty_string(candidates: &[Option<&Value>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a JSON value to an integer, defaulting to `0`.
///
/// Accepts integers, floats (truncated), trimmed decimal strings, and
/// booleans. Everything else, including `null` and absence, is `0`.
fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

/// A scalar rendered as an id string: non-empty strings as-is, numbers
/// stringified.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-empty string field of a JSON object.
fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(data: Value) -> SessionData {
        let mut session = SessionData::default();
        session.apply_login_response(&data);
        session
    }

    #[test]
    fn full_login_response_is_normalized() {
        let session = normalized(json!({
            "access_token": "t1",
            "user": {
                "id": "u1",
                "email": "a@b.com",
                "roles": ["comprador", "admin"],
            }
        }));

        assert_eq!(session.auth_token.as_deref(), Some("t1"));
        assert_eq!(session.roles, vec!["COMPRADOR", "ADMIN"]);
        assert_eq!(session.auth_roles, session.roles);
        assert!(session.is_admin);
        assert_eq!(session.premium, 0);
        assert_eq!(session.dni_bloqueado, 0);
        assert_eq!(session.auth_user_id.as_deref(), Some("u1"));
        assert_eq!(session.auth_user_email.as_deref(), Some("a@b.com"));
        assert_eq!(session.auth_user_name.as_deref(), Some("a@b.com"));
        assert!(session.is_logged_in());
    }

    #[test]
    fn missing_token_keys_leave_session_unauthenticated() {
        let session = normalized(json!({
            "user": { "email": "a@b.com", "roles": ["ADMIN"] }
        }));

        assert_eq!(session.auth_token, None);
        assert!(!session.is_logged_in());
        // The rest of the record is still populated.
        assert!(session.is_admin);
    }

    #[test]
    fn alternative_token_keys_are_accepted() {
        assert_eq!(
            normalized(json!({ "token": "t2" })).auth_token.as_deref(),
            Some("t2")
        );
        assert_eq!(
            normalized(json!({ "jwt": "t3" })).auth_token.as_deref(),
            Some("t3")
        );
        // First present key wins.
        assert_eq!(
            normalized(json!({ "access_token": "a", "jwt": "b" }))
                .auth_token
                .as_deref(),
            Some("a")
        );
        // Empty strings do not count as a token.
        assert_eq!(normalized(json!({ "access_token": "" })).auth_token, None);
    }

    #[test]
    fn non_coercible_flags_default_to_zero() {
        for bad in [json!(null), json!("abc"), json!([1]), json!({"x": 1})] {
            let session = normalized(json!({
                "user": { "premium": bad.clone(), "dni_bloqueado": bad }
            }));
            assert_eq!(session.premium, 0);
            assert_eq!(session.dni_bloqueado, 0);
            assert_eq!(session.user["premium"], json!(0));
            assert_eq!(session.user["dni_bloqueado"], json!(0));
        }
    }

    #[test]
    fn coercible_flags_are_parsed() {
        let session = normalized(json!({
            "user": { "premium": "1", "dni_bloqueado": 2.9 }
        }));
        assert_eq!(session.premium, 1);
        assert_eq!(session.dni_bloqueado, 2);

        let session = normalized(json!({ "user": { "premium": true } }));
        assert_eq!(session.premium, 1);
    }

    #[test]
    fn flags_fall_back_to_top_level() {
        let session = normalized(json!({
            "premium": 1,
            "user": { "email": "a@b.com" }
        }));
        assert_eq!(session.premium, 1);
        assert_eq!(session.user["premium"], json!(1));
    }

    #[test]
    fn role_upper_casing_is_idempotent() {
        let lower = normalized(json!({ "user": { "roles": ["admin"] } }));
        let upper = normalized(json!({ "user": { "roles": ["ADMIN"] } }));
        assert_eq!(lower.roles, upper.roles);
        assert!(lower.is_admin && upper.is_admin);
    }

    #[test]
    fn single_string_role_is_wrapped() {
        let session = normalized(json!({ "user": { "roles": "vendedor" } }));
        assert_eq!(session.roles, vec!["VENDEDOR"]);
        assert!(!session.is_admin);
    }

    #[test]
    fn role_objects_use_first_present_name_key() {
        let session = normalized(json!({
            "user": {
                "roles": [
                    { "name": "admin" },
                    { "role": "comprador" },
                    { "code": "vendedor" },
                    { "codigo": "auditor" },
                    { "descripcion": "no name here" },
                    42,
                ]
            }
        }));
        assert_eq!(session.roles, vec!["ADMIN", "COMPRADOR", "VENDEDOR", "AUDITOR"]);
        assert!(session.is_admin);
    }

    #[test]
    fn role_source_falls_back_through_role_and_top_level() {
        let session = normalized(json!({
            "user": { "role": "admin" }
        }));
        assert_eq!(session.roles, vec!["ADMIN"]);

        let session = normalized(json!({
            "roles": ["comprador"],
            "user": { "email": "a@b.com" }
        }));
        assert_eq!(session.roles, vec!["COMPRADOR"]);
    }

    #[test]
    fn is_admin_is_false_without_admin_role() {
        assert!(!normalized(json!({ "user": { "roles": [] } })).is_admin);
        assert!(!normalized(json!({ "user": { "roles": ["comprador"] } })).is_admin);
        assert!(normalized(json!({ "user": { "roles": [{ "codigo": "admin" }] } })).is_admin);
    }

    #[test]
    fn flat_response_is_treated_as_user_object() {
        let session = normalized(json!({
            "access_token": "t9",
            "email": "flat@b.com",
            "id": 7,
            "premium": "not-a-number",
        }));

        assert_eq!(session.auth_token.as_deref(), Some("t9"));
        assert_eq!(session.auth_user_email.as_deref(), Some("flat@b.com"));
        assert_eq!(session.auth_user_id.as_deref(), Some("7"));
        assert_eq!(session.premium, 0);
        assert_eq!(session.user["premium"], json!(0));
        assert_eq!(session.user["dni_bloqueado"], json!(0));
    }

    #[test]
    fn id_precedence_prefers_the_user_object() {
        let session = normalized(json!({
            "id": "top",
            "user_id": "top-uid",
            "user": { "id": "nested", "user_id": "nested-uid" }
        }));
        assert_eq!(session.auth_user_id.as_deref(), Some("nested"));

        let session = normalized(json!({
            "user_id": "top-uid",
            "user": { "email": "a@b.com" }
        }));
        assert_eq!(session.auth_user_id.as_deref(), Some("top-uid"));
    }

    #[test]
    fn nombre_wins_over_email_for_display_name() {
        let session = normalized(json!({
            "user": { "nombre": "Ana", "email": "ana@b.com" }
        }));
        assert_eq!(session.auth_user_name.as_deref(), Some("Ana"));
        assert_eq!(session.auth_user_email.as_deref(), Some("ana@b.com"));
    }

    #[test]
    fn non_object_payload_is_a_no_op() {
        let mut session = SessionData::default();
        for data in [json!(null), json!("nope"), json!(42), json!([1, 2])] {
            session.apply_login_response(&data);
        }
        assert_eq!(session.auth_token, None);
        assert!(session.user.is_empty());
    }

    #[test]
    fn relogin_recomputes_admin_flag() {
        let mut session = SessionData::default();
        session.apply_login_response(&json!({
            "access_token": "t1",
            "user": { "roles": ["admin"] }
        }));
        assert!(session.is_admin);

        session.apply_login_response(&json!({
            "access_token": "t2",
            "user": { "roles": ["comprador"] }
        }));
        assert!(!session.is_admin);
        assert_eq!(session.auth_token.as_deref(), Some("t2"));
    }
}
