use uuid::Uuid;

pub type Id = String;

/// Upper bound on stored tenant ids, enforced by stores on `add`.
pub const MAX_ID_LENGTH: usize = 64;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}
