/*
 * Responsibility
 * - The verified "who is calling" value handlers receive
 * - Role flags are fixed fields, never an open-ended map
 */
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Supplier,
    Customer,
}

/// Request-scoped identity rebuilt from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub username: String,
    pub id: i64,
    pub is_admin: bool,
    pub is_supplier: bool,
    pub is_customer: bool,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Supplier => self.is_supplier,
            Role::Customer => self.is_customer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_role_reads_the_matching_flag() {
        let p = Principal {
            username: "bob".into(),
            id: 1,
            is_admin: false,
            is_supplier: true,
            is_customer: false,
        };

        assert!(p.has_role(Role::Supplier));
        assert!(!p.has_role(Role::Admin));
        assert!(!p.has_role(Role::Customer));
    }

    #[test]
    fn serializes_as_flat_object() {
        let p = Principal {
            username: "alice".into(),
            id: 7,
            is_admin: true,
            is_supplier: false,
            is_customer: false,
        };

        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "username": "alice",
                "id": 7,
                "is_admin": true,
                "is_supplier": false,
                "is_customer": false,
            })
        );
    }
}
