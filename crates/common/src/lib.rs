//! Shared building blocks for the catalog workspace: logging setup and
//! small wire types that do not belong to any single layer.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_keeps_text() {
        let m = types::Message::new("Logout successful");
        assert_eq!(m.message, "Logout successful");
    }
}
